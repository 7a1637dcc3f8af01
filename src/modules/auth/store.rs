use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use super::password::validate_password;
use super::tokens::AuthToken;
use crate::modules::encryption::keys::{derive_key_from_passphrase, generate_random_iv, generate_random_salt};
use crate::modules::encryption::{decrypt_data, encrypt_data};
use crate::modules::host::{Account, AccountId, CollisionField, HostError};
use crate::modules::security::KeySource;
use crate::modules::utils::io::is_valid_email;
use crate::modules::utils::time::get_current_timestamp;

/// A single stored account
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountRecord {
    pub id: AccountId,
    pub username: String,            // As supplied, for display and login
    pub username_normalized: String, // Lowercase, used as the map key
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub network_admin: bool,
    pub created_at: u64,
    pub last_login: u64,
}

impl AccountRecord {
    pub fn to_account(&self) -> Account {
        Account {
            id: self.id,
            login: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// All accounts plus the encryption metadata used to persist them
#[derive(Serialize, Deserialize)]
pub struct AccountStore {
    pub accounts: HashMap<String, AccountRecord>,
    pub next_id: AccountId,
    pub salt: Vec<u8>,
    pub iv: Vec<u8>,
    #[serde(default)]
    pub auth_tokens: Vec<AuthToken>,
    #[serde(default)]
    pub network_admins: Vec<AccountId>,
}

fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            next_id: 1,
            salt: generate_random_salt(),
            iv: generate_random_iv(),
            auth_tokens: Vec::new(),
            network_admins: Vec::new(),
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<&AccountRecord> {
        self.accounts.get(&normalize(username))
    }

    /// Case-insensitive, like most mail systems treat the domain
    pub fn find_by_email(&self, email: &str) -> Option<&AccountRecord> {
        let email = email.trim();
        self.accounts
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
    }

    pub fn find_by_id(&self, id: AccountId) -> Option<&AccountRecord> {
        self.accounts.values().find(|account| account.id == id)
    }

    fn find_by_id_mut(&mut self, id: AccountId) -> Result<&mut AccountRecord, HostError> {
        self.accounts
            .values_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| HostError::NotFound(format!("account {}", id)))
    }

    /// Insert a new account, hashing the password with the store's salt
    pub fn add_account(&mut self, username: &str, email: &str, password: &str) -> Result<AccountId, HostError> {
        let original_username = username.trim().to_string();
        let username_normalized = normalize(username);
        let email = email.trim().to_string();

        if original_username.is_empty() {
            return Err(HostError::InvalidInput("username is empty".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(HostError::InvalidInput(format!("malformed email address {:?}", email)));
        }
        validate_password(password).map_err(|e| HostError::InvalidInput(e.to_string()))?;

        if self.accounts.contains_key(&username_normalized) {
            return Err(HostError::Collision(CollisionField::Username));
        }
        if self.find_by_email(&email).is_some() {
            return Err(HostError::Collision(CollisionField::Email));
        }

        let current_time = get_current_timestamp();
        let password_hash = hex::encode(derive_key_from_passphrase(password, &self.salt));
        let id = self.next_id;

        self.accounts.insert(
            username_normalized.clone(),
            AccountRecord {
                id,
                username: original_username,
                username_normalized,
                email,
                password_hash,
                role: None,
                network_admin: false,
                created_at: current_time,
                last_login: 0,
            },
        );
        self.next_id += 1;

        Ok(id)
    }

    /// Drop an account again; used when a freshly added account could not be saved
    pub fn remove_account(&mut self, id: AccountId) -> Option<AccountRecord> {
        let key = self.find_by_id(id)?.username_normalized.clone();
        self.accounts.remove(&key)
    }

    pub fn set_role(&mut self, id: AccountId, role: &str) -> Result<(), HostError> {
        self.find_by_id_mut(id)?.role = Some(role.to_string());
        Ok(())
    }

    pub fn grant_network_admin(&mut self, id: AccountId) -> Result<(), HostError> {
        self.find_by_id_mut(id)?.network_admin = true;
        if !self.network_admins.contains(&id) {
            self.network_admins.push(id);
        }
        Ok(())
    }

    pub fn touch_last_login(&mut self, username: &str, current_time: u64) -> bool {
        match self.accounts.get_mut(&normalize(username)) {
            Some(account) => {
                account.last_login = current_time;
                true
            }
            None => false,
        }
    }

    pub fn verify_password(&self, username: &str, password: &str) -> bool {
        let password_hash = hex::encode(derive_key_from_passphrase(password, &self.salt));
        self.find_by_username(username)
            .map(|account| account.password_hash == password_hash)
            .unwrap_or(false)
    }

    /// Record a token hash, discarding tokens that have already expired
    pub fn store_token(&mut self, token: AuthToken, current_time: u64) {
        self.auth_tokens.retain(|t| t.is_valid_at(current_time));
        self.auth_tokens.push(token);
    }

    pub fn token_is_valid(&self, token_hash: &str, current_time: u64) -> bool {
        self.auth_tokens
            .iter()
            .any(|t| t.token_hash == token_hash && t.is_valid_at(current_time))
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the store as `salt | iv | AES-256-CBC(json)`
pub fn save_account_store(store: &AccountStore, path: &Path, key_source: &dyn KeySource) -> io::Result<()> {
    let master_key = key_source.master_key()?;

    let data = serde_json::to_string_pretty(store)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let encrypted_data = encrypt_data(&data, &master_key, &store.iv)?;

    let mut file_data = Vec::with_capacity(32 + encrypted_data.len());
    file_data.extend_from_slice(&store.salt);
    file_data.extend_from_slice(&store.iv);
    file_data.extend_from_slice(&encrypted_data);

    fs::write(path, file_data)
}

/// Load the store, or start an empty one when the file does not exist.
///
/// An existing but unreadable file is an error; it is never replaced silently.
pub fn load_account_store(path: &Path, key_source: &dyn KeySource) -> io::Result<AccountStore> {
    let file_data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AccountStore::new()),
        Err(e) => return Err(e),
    };

    // salt + iv = 32 bytes
    if file_data.len() < 32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("account store {} is truncated", path.display()),
        ));
    }

    let master_key = key_source.master_key()?;
    let iv = &file_data[16..32];
    let decrypted_data = decrypt_data(&file_data[32..], &master_key, iv)?;

    serde_json::from_str(&decrypted_data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}
