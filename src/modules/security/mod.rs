mod keyring;

pub use self::keyring::{KeySource, SecureMasterKey, StaticKey};
