/*!
 * Prelude module for habskill core.
 *
 * This module re-exports commonly used types and functions from the habskill core crate
 * to make them easier to import.
 */

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export backend data types
pub use crate::types::{
    is_undefined, Item, ItemType, MetadataEntry, RegionalSettings, RuntimeSettings, ServerSettings,
    StateDescription, StateOption,
};

// Re-export config types
pub use crate::config::{ConfigBuilder, SharedConfig, SkillConfig};

// Re-export utility functions
pub use crate::utils::{
    clamp, compare_version, compress_json, decamelize, decompress_json, format_number,
    strip_punctuation,
};

// Re-export logging macros
pub use tracing::{debug, error, info, trace, warn};

// Re-export core initialization
pub use crate::init;
