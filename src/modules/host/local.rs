use log::{debug, warn};
use std::fmt;
use std::path::PathBuf;

use super::{Account, AccountHost, AccountId, HostError};
use crate::modules::admin::config::InjectConfig;
use crate::modules::auth::password::generate_strong_password;
use crate::modules::auth::store::{load_account_store, save_account_store, AccountStore};
use crate::modules::auth::tokens::{generate_auth_token, hash_token, AuthToken, SessionTokenFile};
use crate::modules::security::KeySource;
use crate::modules::utils::logging::{log_auth_event, log_data_operation};
use crate::modules::utils::time::{format_timestamp, get_current_timestamp};
use crate::{AUTH_TOKEN_DURATION, GENERATED_PASSWORD_LENGTH};

/// Principal established for this process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    pub account_id: AccountId,
    pub username: String,
}

type LoginObserver = Box<dyn Fn(&str)>;

/// File-backed host: an encrypted account store plus a session token file
pub struct LocalHost {
    store: AccountStore,
    store_path: PathBuf,
    session: SessionTokenFile,
    key_source: Box<dyn KeySource>,
    multisite: bool,
    admin_url: String,
    current: Option<SessionPrincipal>,
    observers: Vec<LoginObserver>,
}

impl fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHost")
            .field("store_path", &self.store_path)
            .field("session", &self.session.path())
            .field("multisite", &self.multisite)
            .field("accounts", &self.store.accounts.len())
            .finish()
    }
}

impl LocalHost {
    /// Load (or start) the account store described by `config`
    pub fn open(config: &InjectConfig, key_source: Box<dyn KeySource>) -> Result<Self, HostError> {
        let store = load_account_store(&config.store_path, key_source.as_ref())?;
        debug!(
            "Opened account store {} with {} accounts",
            config.store_path.display(),
            store.accounts.len()
        );

        Ok(Self {
            store,
            store_path: config.store_path.clone(),
            session: SessionTokenFile::new(&config.session_path),
            key_source,
            multisite: config.multisite,
            admin_url: config.admin_url.clone(),
            current: None,
            observers: Vec::new(),
        })
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn current_principal(&self) -> Option<&SessionPrincipal> {
        self.current.as_ref()
    }

    /// Register a callback fired with the login name on every login event
    pub fn on_login<F: Fn(&str) + 'static>(&mut self, observer: F) {
        self.observers.push(Box::new(observer));
    }

    fn persist(&self) -> Result<(), HostError> {
        save_account_store(&self.store, &self.store_path, self.key_source.as_ref())
            .map_err(|e| HostError::Storage(format!("{}: {}", self.store_path.display(), e)))
    }
}

impl AccountHost for LocalHost {
    fn account_exists_by_username(&self, username: &str) -> bool {
        self.store.find_by_username(username).is_some()
    }

    fn account_exists_by_email(&self, email: &str) -> bool {
        self.store.find_by_email(email).is_some()
    }

    fn create_account(&mut self, username: &str, password: &str, email: &str) -> Result<AccountId, HostError> {
        let id = self.store.add_account(username, email, password)?;

        if let Err(e) = self.persist() {
            // Keep memory consistent with what is on disk
            self.store.remove_account(id);
            log_data_operation("create_account", username, "account_store", false, Some(&e.to_string()));
            return Err(e);
        }

        log_data_operation("create_account", username, "account_store", true, None);
        Ok(id)
    }

    fn set_account_role(&mut self, id: AccountId, role: &str) -> Result<(), HostError> {
        self.store.set_role(id, role)?;
        self.persist()
    }

    fn grant_network_admin(&mut self, id: AccountId) -> Result<(), HostError> {
        self.store.grant_network_admin(id)?;
        self.persist()
    }

    fn is_multitenant_deployment(&self) -> bool {
        self.multisite
    }

    fn current_session_is_authenticated(&self) -> bool {
        if self.current.is_some() {
            return true;
        }
        match self.session.read() {
            Ok(Some(token)) => self
                .store
                .token_is_valid(&hash_token(&token), get_current_timestamp()),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read session file {}: {}", self.session.path().display(), e);
                false
            }
        }
    }

    fn lookup_account_by_username(&self, username: &str) -> Result<Account, HostError> {
        self.store
            .find_by_username(username)
            .map(|record| record.to_account())
            .ok_or_else(|| HostError::NotFound(format!("user {}", username)))
    }

    fn establish_session(&mut self, id: AccountId, username: &str) -> Result<(), HostError> {
        let record = self
            .store
            .find_by_id(id)
            .ok_or_else(|| HostError::NotFound(format!("account {}", id)))?;
        if !record.username.eq_ignore_ascii_case(username) {
            return Err(HostError::InvalidInput(format!(
                "account {} is not {}",
                id, username
            )));
        }

        self.current = Some(SessionPrincipal {
            account_id: id,
            username: record.username.clone(),
        });
        Ok(())
    }

    fn issue_persistent_auth_token(&mut self, id: AccountId) -> Result<(), HostError> {
        let current_time = get_current_timestamp();
        let token = generate_auth_token();
        let expires_at = current_time + AUTH_TOKEN_DURATION;

        self.store.store_token(
            AuthToken {
                account_id: id,
                token_hash: hash_token(&token),
                issued_at: current_time,
                expires_at,
            },
            current_time,
        );
        self.persist()?;
        self.session.write(&token)?;

        debug!(
            "Issued auth token for account {} valid until {}",
            id,
            format_timestamp(expires_at)
        );
        Ok(())
    }

    fn emit_login_event(&mut self, username: &str) {
        if self.store.touch_last_login(username, get_current_timestamp()) {
            if let Err(e) = self.persist() {
                warn!("Failed to record last login: {}", e);
            }
        }

        log_auth_event("login", username, true, Some("automatic login after provisioning"));
        for observer in &self.observers {
            observer(username);
        }
    }

    fn generate_strong_password(&mut self) -> String {
        generate_strong_password(&mut rand::thread_rng(), GENERATED_PASSWORD_LENGTH)
    }

    fn admin_url(&self) -> String {
        self.admin_url.clone()
    }
}
