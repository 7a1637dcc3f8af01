// Declare all modules
pub mod admin;
pub mod auth;
pub mod encryption;
pub mod host;
pub mod identity;
pub mod security;
pub mod trigger;
pub mod utils;

// No re-exports here as they're handled in lib.rs
