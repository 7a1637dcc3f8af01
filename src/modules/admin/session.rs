use log::debug;

use crate::modules::host::{AccountHost, HostError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Established,
    AlreadyAuthenticated,
}

/// Log the new account in unless someone already is
pub fn bootstrap_session<H: AccountHost + ?Sized>(host: &mut H, username: &str) -> Result<SessionStatus, HostError> {
    if host.current_session_is_authenticated() {
        debug!("Session already authenticated, leaving it alone");
        return Ok(SessionStatus::AlreadyAuthenticated);
    }

    let account = host.lookup_account_by_username(username)?;
    host.establish_session(account.id, &account.login)?;
    host.issue_persistent_auth_token(account.id)?;
    host.emit_login_event(&account.login);

    Ok(SessionStatus::Established)
}
