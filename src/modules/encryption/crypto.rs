use block_modes::BlockMode;
use std::io;

use crate::Aes256Cbc;

fn cipher(encryption_key: &[u8], iv: &[u8]) -> io::Result<Aes256Cbc> {
    Aes256Cbc::new_from_slices(encryption_key, iv)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
}

/// Encrypt the serialized account store using AES-256-CBC
pub fn encrypt_data(data: &str, encryption_key: &[u8], iv: &[u8]) -> io::Result<Vec<u8>> {
    Ok(cipher(encryption_key, iv)?.encrypt_vec(data.as_bytes()))
}

/// Decrypt data previously produced by `encrypt_data`
pub fn decrypt_data(encrypted_data: &[u8], encryption_key: &[u8], iv: &[u8]) -> io::Result<String> {
    let decrypted_data = cipher(encryption_key, iv)?
        .decrypt_vec(encrypted_data)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Decryption failed"))?;

    String::from_utf8(decrypted_data).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "Decrypted data is not valid UTF-8",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypted_store_payload_decrypts() {
        let payload = r#"{"accounts":{},"next_id":1}"#;
        let encryption_key: Vec<u8> = (1..=32).collect();
        let iv: Vec<u8> = (1..=16).collect();

        let encrypted_data = encrypt_data(payload, &encryption_key, &iv).unwrap();
        assert!(!encrypted_data.is_empty());
        assert_ne!(encrypted_data, payload.as_bytes());

        assert_eq!(decrypt_data(&encrypted_data, &encryption_key, &iv).unwrap(), payload);
    }

    #[test]
    fn test_decryption_with_wrong_key() {
        let encryption_key: Vec<u8> = vec![1; 32];
        let iv: Vec<u8> = vec![1; 16];
        let wrong_key: Vec<u8> = vec![2; 32];

        let encrypted_data = encrypt_data("account data", &encryption_key, &iv).unwrap();
        let result = decrypt_data(&encrypted_data, &wrong_key, &iv);

        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_short_key() {
        // AES-256 needs a 32-byte key
        let result = encrypt_data("account data", &[7u8; 16], &[0u8; 16]);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
