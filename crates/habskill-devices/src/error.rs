/*!
 * Error types for the mapping engine.
 */
use thiserror::Error;

use habskill_core::error::Error as CoreError;

/// Error type for device mapping operations
#[derive(Error, Debug)]
pub enum DeviceError {
    /// A directive value cannot be converted into a backend command
    #[error("{0}")]
    InvalidValue(String),

    /// The targeted property is not defined on the endpoint
    #[error("{0}")]
    PropertyNotSupported(String),

    /// The endpoint cookie is missing, malformed or of an unknown version
    #[error("Invalid endpoint cookie: {0}")]
    InvalidCookie(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),

    /// Core error
    #[error("Core error: {0}")]
    CoreError(#[from] CoreError),
}

/// Result type for device mapping operations
pub type Result<T> = std::result::Result<T, DeviceError>;

impl DeviceError {
    /// Create a new invalid value error
    pub fn invalid_value<S: AsRef<str>>(msg: S) -> Self {
        DeviceError::InvalidValue(msg.as_ref().to_string())
    }

    /// Create a new property not supported error
    pub fn property_not_supported<S: AsRef<str>>(msg: S) -> Self {
        DeviceError::PropertyNotSupported(msg.as_ref().to_string())
    }

    /// Create a new invalid cookie error
    pub fn invalid_cookie<S: AsRef<str>>(msg: S) -> Self {
        DeviceError::InvalidCookie(msg.as_ref().to_string())
    }

    /// Create a new other error
    pub fn other<S: AsRef<str>>(msg: S) -> Self {
        DeviceError::Other(msg.as_ref().to_string())
    }
}

impl From<serde_json::Error> for DeviceError {
    fn from(err: serde_json::Error) -> Self {
        DeviceError::CoreError(err.into())
    }
}
