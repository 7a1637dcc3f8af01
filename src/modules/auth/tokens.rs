use base64::{engine::general_purpose::URL_SAFE_NO_PAD as base64, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::modules::encryption::generate_random_bytes;
use crate::modules::host::AccountId;

/// Persistent "remember me" token record; only the hash is stored
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub account_id: AccountId,
    pub token_hash: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

impl AuthToken {
    pub fn is_valid_at(&self, current_time: u64) -> bool {
        current_time < self.expires_at
    }
}

/// 32 random bytes, URL-safe base64
pub fn generate_auth_token() -> String {
    base64.encode(generate_random_bytes(32))
}

/// Hex SHA-256 of a raw token
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// File holding the raw token for the current operator, the local analog of
/// an auth cookie
pub struct SessionTokenFile {
    path: PathBuf,
}

impl SessionTokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session has been stored yet
    pub fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok(if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn write(&self, token: &str) -> io::Result<()> {
        fs::write(&self.path, token)
    }
}
