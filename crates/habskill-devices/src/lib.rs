/*!
 * habskill Devices
 *
 * This crate maps openHAB items to Alexa endpoints: item metadata is parsed
 * into capability properties, bound into capabilities and serialized into
 * discovery descriptors and endpoint cookies.
 */

#![warn(missing_docs)]

// Re-export core types
pub use habskill_core::prelude;

pub mod attribute;
pub mod capability;
pub mod catalog;
pub mod category;
pub mod cookie;
pub mod device_type;
pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod metadata;
pub mod parameter;
pub mod property;
pub mod registry;
pub mod semantics;
pub mod unit;

// Re-export the mapping types
pub use capability::{Capability, CapabilityKind};
pub use category::DisplayCategory;
pub use discovery::{Discoverer, MAX_ENDPOINTS};
pub use endpoint::{Endpoint, ResolvedEndpoint};
pub use error::{DeviceError, Result};
pub use property::{Property, PropertyKind, TemperatureScale};
pub use registry::CapabilityRegistry;

/// habskill devices crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the mapping engine
pub fn init() -> std::result::Result<(), habskill_core::error::Error> {
    tracing::info!("habskill Devices {} initialized", VERSION);
    Ok(())
}
