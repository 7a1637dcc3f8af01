//! Recording test doubles for the host seams.

use std::cell::Cell;

use super::{Account, AccountHost, AccountId, HostError, SelfArtifact};

/// In-memory host that records every call it receives
#[derive(Default)]
pub struct RecordingHost {
    pub existing_usernames: Vec<String>,
    pub existing_emails: Vec<String>,
    pub multisite: bool,
    pub authenticated: bool,
    pub create_error: Option<HostError>,
    pub role_error: Option<HostError>,
    pub session_error: Option<HostError>,
    pub calls: Vec<String>,
    pub accounts: Vec<Account>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls to the named operation
    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| call.split('(').next() == Some(operation))
            .count()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.iter().any(|c| c == call)
    }
}

impl AccountHost for RecordingHost {
    fn account_exists_by_username(&self, username: &str) -> bool {
        self.existing_usernames.iter().any(|u| u == username)
            || self.accounts.iter().any(|a| a.login == username)
    }

    fn account_exists_by_email(&self, email: &str) -> bool {
        self.existing_emails.iter().any(|e| e == email)
            || self.accounts.iter().any(|a| a.email == email)
    }

    fn create_account(&mut self, username: &str, _password: &str, email: &str) -> Result<AccountId, HostError> {
        self.calls.push(format!("create_account({}, {})", username, email));
        if let Some(err) = self.create_error.take() {
            return Err(err);
        }
        let id = self.accounts.len() as AccountId + 1;
        self.accounts.push(Account {
            id,
            login: username.to_string(),
            email: email.to_string(),
            role: None,
        });
        Ok(id)
    }

    fn set_account_role(&mut self, id: AccountId, role: &str) -> Result<(), HostError> {
        self.calls.push(format!("set_account_role({}, {})", id, role));
        if let Some(err) = self.role_error.take() {
            return Err(err);
        }
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == id) {
            account.role = Some(role.to_string());
        }
        Ok(())
    }

    fn grant_network_admin(&mut self, id: AccountId) -> Result<(), HostError> {
        self.calls.push(format!("grant_network_admin({})", id));
        Ok(())
    }

    fn is_multitenant_deployment(&self) -> bool {
        self.multisite
    }

    fn current_session_is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn lookup_account_by_username(&self, username: &str) -> Result<Account, HostError> {
        self.accounts
            .iter()
            .find(|a| a.login == username)
            .cloned()
            .ok_or_else(|| HostError::NotFound(username.to_string()))
    }

    fn establish_session(&mut self, id: AccountId, username: &str) -> Result<(), HostError> {
        self.calls.push(format!("establish_session({}, {})", id, username));
        if let Some(err) = self.session_error.take() {
            return Err(err);
        }
        self.authenticated = true;
        Ok(())
    }

    fn issue_persistent_auth_token(&mut self, id: AccountId) -> Result<(), HostError> {
        self.calls.push(format!("issue_persistent_auth_token({})", id));
        Ok(())
    }

    fn emit_login_event(&mut self, username: &str) {
        self.calls.push(format!("emit_login_event({})", username));
    }

    fn generate_strong_password(&mut self) -> String {
        "Str0ng!Passw0rd".to_string()
    }

    fn admin_url(&self) -> String {
        "/admin/".to_string()
    }
}

/// Artifact whose behaviour is fixed up front
pub struct MockArtifact {
    pub name: String,
    pub present: bool,
    pub writable: bool,
    pub deletable: bool,
    pub writable_checks: Cell<usize>,
    pub delete_calls: usize,
}

impl MockArtifact {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            present: true,
            writable: true,
            deletable: true,
            writable_checks: Cell::new(0),
            delete_calls: 0,
        }
    }
}

impl SelfArtifact for MockArtifact {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn is_writable(&self) -> bool {
        self.writable_checks.set(self.writable_checks.get() + 1);
        self.present && self.writable
    }

    fn delete(&mut self) -> bool {
        self.delete_calls += 1;
        if self.present && self.deletable {
            self.present = false;
            true
        } else {
            false
        }
    }
}
