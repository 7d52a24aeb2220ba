pub mod commands;
pub mod core;
pub mod terminal;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `stratus::profile` instead of `stratus::core::profile`
pub use self::core::*;
pub use self::utils::*;
