/*!
 * Error types for the habskill engine crate.
 *
 * Every error maps to one Alexa error response type. Validation errors raised by
 * the mapping engine keep their message; collaborator failures are wrapped by
 * the handler that issued the call.
 */
use thiserror::Error;

use habskill_devices::DeviceError;

/// Error type for directive handling
#[derive(Error, Debug)]
pub enum Error {
    /// The directive is malformed or not supported
    #[error("{0}")]
    InvalidDirective(String),

    /// A directive value is not valid for the endpoint
    #[error("{0}")]
    InvalidValue(String),

    /// The endpoint state cannot be read
    #[error("{0}")]
    EndpointUnreachable(String),

    /// The openHAB server or binding cannot be reached
    #[error("{0}")]
    BridgeUnreachable(String),

    /// The authorization grant cannot be completed
    #[error("{0}")]
    AcceptGrantFailed(String),

    /// Internal error
    #[error("{0}")]
    Internal(String),
}

/// Result type for directive handling
pub type Result<T> = std::result::Result<T, Error>;

/// Alexa namespace of error responses
pub const ERROR_NAMESPACE: &str = "Alexa";

/// Alexa namespace of authorization error responses
pub const AUTHORIZATION_NAMESPACE: &str = "Alexa.Authorization";

impl Error {
    /// Create a new invalid directive error
    pub fn invalid_directive<S: AsRef<str>>(msg: S) -> Self {
        Error::InvalidDirective(msg.as_ref().to_string())
    }

    /// Create a new invalid value error
    pub fn invalid_value<S: AsRef<str>>(msg: S) -> Self {
        Error::InvalidValue(msg.as_ref().to_string())
    }

    /// Create a new endpoint unreachable error
    pub fn endpoint_unreachable<S: AsRef<str>>(msg: S) -> Self {
        Error::EndpointUnreachable(msg.as_ref().to_string())
    }

    /// Create a new bridge unreachable error
    pub fn bridge_unreachable<S: AsRef<str>>(msg: S) -> Self {
        Error::BridgeUnreachable(msg.as_ref().to_string())
    }

    /// Create a new accept grant failed error
    pub fn accept_grant_failed<S: AsRef<str>>(msg: S) -> Self {
        Error::AcceptGrantFailed(msg.as_ref().to_string())
    }

    /// Create a new internal error
    pub fn internal<S: AsRef<str>>(msg: S) -> Self {
        Error::Internal(msg.as_ref().to_string())
    }

    /// Get the Alexa error type
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidDirective(_) => "INVALID_DIRECTIVE",
            Error::InvalidValue(_) => "INVALID_VALUE",
            Error::EndpointUnreachable(_) => "ENDPOINT_UNREACHABLE",
            Error::BridgeUnreachable(_) => "BRIDGE_UNREACHABLE",
            Error::AcceptGrantFailed(_) => "ACCEPT_GRANT_FAILED",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the namespace of the error response
    pub fn namespace(&self) -> &'static str {
        match self {
            Error::AcceptGrantFailed(_) => AUTHORIZATION_NAMESPACE,
            _ => ERROR_NAMESPACE,
        }
    }
}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::InvalidValue(msg) | DeviceError::PropertyNotSupported(msg) => Error::InvalidValue(msg),
            err @ DeviceError::InvalidCookie(_) => Error::InvalidDirective(err.to_string()),
            err => Error::Internal(err.to_string()),
        }
    }
}

impl From<habskill_core::error::Error> for Error {
    fn from(err: habskill_core::error::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(format!("Serialization error: {}", err))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::invalid_directive("x").kind(), "INVALID_DIRECTIVE");
        assert_eq!(Error::internal("x").kind(), "INTERNAL_ERROR");
        assert_eq!(Error::accept_grant_failed("x").namespace(), "Alexa.Authorization");
        assert_eq!(Error::endpoint_unreachable("x").namespace(), "Alexa");
    }

    #[test]
    fn test_from_device_error() {
        let err: Error = DeviceError::invalid_value("Mode Foo is not supported").into();
        assert_eq!(err.kind(), "INVALID_VALUE");
        assert_eq!(err.to_string(), "Mode Foo is not supported");

        let err: Error = DeviceError::invalid_cookie("missing version").into();
        assert_eq!(err.kind(), "INVALID_DIRECTIVE");

        let err: Error = DeviceError::other("boom").into();
        assert_eq!(err.kind(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_anyhow() {
        let err: Error = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.kind(), "INTERNAL_ERROR");
    }
}
