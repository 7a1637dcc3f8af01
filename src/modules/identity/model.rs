use rand::Rng;
use std::fmt;

use super::generator::{generate_email, generate_username, IdentityError};

/// Username, email and password for the account about to be provisioned.
///
/// Lives for a single run and is never persisted by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Random username and email; the password comes from the host
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        username_length: usize,
        password: String,
    ) -> Result<Self, IdentityError> {
        let username = generate_username(rng, username_length)?;
        let email = generate_email(rng);
        Ok(Self {
            username,
            email,
            password,
        })
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
