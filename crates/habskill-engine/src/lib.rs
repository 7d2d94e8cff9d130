/*!
 * habskill Engine
 *
 * This crate handles Alexa Smart Home directives: it parses a directive,
 * resolves its handler and endpoint, converts payloads into openHAB commands
 * and answers with a response event carrying the endpoint state.
 */

#![warn(missing_docs)]

// Re-export core types
pub use habskill_core::prelude;

pub mod backend;
pub mod binding;
pub mod context;
pub mod directive;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod response;

// Re-export main types for convenience
pub use backend::{Backend, CredentialStore, Credentials, MemoryCredentialStore, TokenExchange, UserSettings};
pub use context::HandlerContext;
pub use directive::{Directive, Header};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use handlers::{DirectiveHandler, Outcome};
pub use response::{ContextProperty, Response};

/// habskill engine crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the engine
pub fn init() -> Result<()> {
    tracing::info!("habskill Engine {} initialized", VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
