// Public modules
pub mod app;
pub mod error;
pub mod local_app;
pub mod profile;

// Internal modules - not part of public API
pub(crate) mod keychain;
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
