mod artifact;
pub mod local;
#[cfg(test)]
pub(crate) mod mock;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

pub use artifact::FileArtifact;
pub use local::{LocalHost, SessionPrincipal};

pub type AccountId = u64;

/// Which half of an identity clashed with an existing account
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionField {
    Username,
    Email,
}

impl fmt::Display for CollisionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionField::Username => write!(f, "username"),
            CollisionField::Email => write!(f, "email"),
        }
    }
}

/// Host-side view of an account, as returned by lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub login: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug)]
pub enum HostError {
    Collision(CollisionField),
    NotFound(String),
    InvalidInput(String),
    Storage(String),
    Io(io::Error),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Collision(field) => write!(f, "an account with this {} already exists", field),
            HostError::NotFound(what) => write!(f, "not found: {}", what),
            HostError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            HostError::Storage(msg) => write!(f, "storage failure: {}", msg),
            HostError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HostError {
    fn from(e: io::Error) -> Self {
        HostError::Io(e)
    }
}

/// The identity system a provisioning run talks to.
///
/// Only these operations are used; storage layout, hashing and session
/// transport stay behind the implementation.
pub trait AccountHost {
    fn account_exists_by_username(&self, username: &str) -> bool;
    fn account_exists_by_email(&self, email: &str) -> bool;

    fn create_account(&mut self, username: &str, password: &str, email: &str) -> Result<AccountId, HostError>;
    fn set_account_role(&mut self, id: AccountId, role: &str) -> Result<(), HostError>;
    /// Only called when `is_multitenant_deployment` is true
    fn grant_network_admin(&mut self, id: AccountId) -> Result<(), HostError>;
    fn is_multitenant_deployment(&self) -> bool;

    fn current_session_is_authenticated(&self) -> bool;
    fn lookup_account_by_username(&self, username: &str) -> Result<Account, HostError>;
    fn establish_session(&mut self, id: AccountId, username: &str) -> Result<(), HostError>;
    fn issue_persistent_auth_token(&mut self, id: AccountId) -> Result<(), HostError>;
    fn emit_login_event(&mut self, username: &str);

    fn generate_strong_password(&mut self) -> String;
    /// Where a successful run sends the operator
    fn admin_url(&self) -> String;
}

/// The entry point that exposes the provisioning capability.
///
/// Deleting it is what stops the capability from being used twice.
pub trait SelfArtifact {
    fn name(&self) -> String;
    fn is_present(&self) -> bool;
    fn is_writable(&self) -> bool;
    fn delete(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_host_error_display() {
        assert_eq!(
            HostError::Collision(CollisionField::Email).to_string(),
            "an account with this email already exists"
        );
        assert_eq!(
            HostError::Storage("disk full".into()).to_string(),
            "storage failure: disk full"
        );
    }

    #[test]
    fn test_io_error_converts_with_source() {
        let err: HostError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, HostError::Io(_)));
        assert!(err.source().is_some());
    }
}
