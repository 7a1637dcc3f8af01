use ::keyring::{Entry, Error as KeyringError};
use log::info;
use rand::random;
use std::io;

use crate::KEYRING_SERVICE;

/// Anything that can hand out the 32-byte master key protecting the account store
pub trait KeySource {
    fn master_key(&self) -> io::Result<Vec<u8>>;
}

fn keyring_error(e: KeyringError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

/// Master key kept in the system keyring
pub struct SecureMasterKey {
    keyring: Entry,
}

impl SecureMasterKey {
    /// Open the keyring entry for our service's master key
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            keyring: Entry::new(KEYRING_SERVICE, "master-key").map_err(keyring_error)?,
        })
    }

    /// Store a new master key, hex encoded so the keyring only sees text
    pub fn store_key(&self, key: &[u8]) -> io::Result<()> {
        self.keyring
            .set_password(&hex::encode(key))
            .map_err(keyring_error)
    }

    /// Retrieve the master key as raw bytes
    pub fn get_key(&self) -> io::Result<Vec<u8>> {
        let encoded = self.keyring.get_password().map_err(keyring_error)?;
        hex::decode(encoded).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Generate and store a master key if none exists yet
    pub fn initialize_if_needed(&self) -> io::Result<()> {
        if self.keyring.get_password().is_err() {
            let new_key: Vec<u8> = (0..32).map(|_| random::<u8>()).collect();
            self.store_key(&new_key)?;
            info!("New master key generated and stored in system keyring");
        }
        Ok(())
    }
}

impl KeySource for SecureMasterKey {
    fn master_key(&self) -> io::Result<Vec<u8>> {
        self.initialize_if_needed()?;
        self.get_key()
    }
}

/// Fixed in-memory key, for tests and for hosts that manage the key themselves
pub struct StaticKey(Vec<u8>);

impl StaticKey {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self(key.into())
    }
}

impl KeySource for StaticKey {
    fn master_key(&self) -> io::Result<Vec<u8>> {
        if self.0.len() != 32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("master key must be 32 bytes, got {}", self.0.len()),
            ));
        }
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_key() {
        let key = StaticKey::new(vec![0xAA; 32]);
        assert_eq!(key.master_key().unwrap(), vec![0xAA; 32]);
    }

    #[test]
    fn test_static_key_wrong_length() {
        let key = StaticKey::new(vec![0xAA; 16]);
        let err = key.master_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_key_source_as_trait_object() {
        let sources: Vec<Box<dyn KeySource>> = vec![
            Box::new(StaticKey::new(vec![1; 32])),
            Box::new(StaticKey::new(vec![2; 32])),
        ];
        let keys: Vec<Vec<u8>> = sources.iter().map(|s| s.master_key().unwrap()).collect();
        assert_ne!(keys[0], keys[1]);
    }
}
