use crate::{HmacSha256, PBKDF2_ROUNDS};
use pbkdf2::pbkdf2;
use rand::Rng;

/// Fill a buffer of `len` bytes from the thread RNG
pub fn generate_random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}

/// Function to generate a random salt for PBKDF2
pub fn generate_random_salt() -> Vec<u8> {
    generate_random_bytes(16)
}

/// Function to generate a random IV for AES encryption
pub fn generate_random_iv() -> Vec<u8> {
    generate_random_bytes(16)
}

/// Function to derive a 32-byte key from the passphrase using PBKDF2
pub fn derive_key_from_passphrase(passphrase: &str, salt: &[u8]) -> Vec<u8> {
    let mut key = vec![0u8; 32];
    pbkdf2::<HmacSha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation() {
        let passphrase = "MySecurePassword123!";
        let salt = generate_random_salt();

        let key = derive_key_from_passphrase(passphrase, &salt);
        assert_eq!(key.len(), 32);

        let key2 = derive_key_from_passphrase(passphrase, &salt);
        assert_eq!(key, key2);

        let key3 = derive_key_from_passphrase("DifferentPassword456!", &salt);
        assert_ne!(key, key3);

        let key4 = derive_key_from_passphrase(passphrase, &generate_random_salt());
        assert_ne!(key, key4);
    }

    #[test]
    fn test_random_generation() {
        let salt1 = generate_random_salt();
        let salt2 = generate_random_salt();
        assert_eq!(salt1.len(), 16);
        assert_ne!(salt1, salt2);

        assert_eq!(generate_random_iv().len(), 16);
        assert_eq!(generate_random_bytes(32).len(), 32);
    }
}
