pub mod password;
pub mod store;
pub mod tokens;

// Re-export the main types and functions
pub use password::{generate_strong_password, validate_password, PasswordError};
pub use store::{load_account_store, save_account_store, AccountRecord, AccountStore};
pub use tokens::{generate_auth_token, hash_token, AuthToken, SessionTokenFile};
