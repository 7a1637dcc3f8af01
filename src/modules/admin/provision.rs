use log::{error, info, warn};

use crate::modules::host::{AccountHost, AccountId, CollisionField, HostError};
use crate::modules::utils::logging::log_data_operation;
use crate::ADMINISTRATOR_ROLE;

/// Result of a single provisioning attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    Created(AccountId),
    RejectedCollision(CollisionField),
    Failed(String),
}

impl ProvisioningOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ProvisioningOutcome::Created(_))
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            ProvisioningOutcome::Created(id) => Some(*id),
            _ => None,
        }
    }
}

/// Create an administrator account for the given identity.
///
/// A collision on either field stops before any mutation. Nothing is
/// retried, and privileges already granted are not rolled back.
pub fn provision<H: AccountHost + ?Sized>(
    host: &mut H,
    username: &str,
    email: &str,
    password: &str,
) -> ProvisioningOutcome {
    let collision = if host.account_exists_by_username(username) {
        Some(CollisionField::Username)
    } else if host.account_exists_by_email(email) {
        Some(CollisionField::Email)
    } else {
        None
    };
    if let Some(field) = collision {
        warn!("Refusing to provision: {} already exists", field);
        log_data_operation("provision", username, "accounts", false, Some("identity collision"));
        return ProvisioningOutcome::RejectedCollision(field);
    }

    let id = match host.create_account(username, password, email) {
        Ok(id) => id,
        // Lost a race against another writer after the check
        Err(HostError::Collision(field)) => {
            warn!("Account store reported a {} collision on create", field);
            return ProvisioningOutcome::RejectedCollision(field);
        }
        Err(e) => {
            error!("Account creation failed: {}", e);
            return ProvisioningOutcome::Failed(e.to_string());
        }
    };

    if let Err(e) = host.set_account_role(id, ADMINISTRATOR_ROLE) {
        error!("Account {} created but role assignment failed: {}", id, e);
        return ProvisioningOutcome::Failed(format!("role assignment failed: {}", e));
    }

    if host.is_multitenant_deployment() {
        if let Err(e) = host.grant_network_admin(id) {
            error!("Account {} is an administrator but network grant failed: {}", id, e);
            return ProvisioningOutcome::Failed(format!("network admin grant failed: {}", e));
        }
    }

    info!("Provisioned administrator account {}", id);
    log_data_operation("provision", username, "accounts", true, Some(ADMINISTRATOR_ROLE));
    ProvisioningOutcome::Created(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::host::mock::RecordingHost;

    #[test]
    fn test_clean_identity_is_created_as_administrator() {
        let mut host = RecordingHost::new();

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert_eq!(outcome, ProvisioningOutcome::Created(1));
        assert_eq!(host.count("create_account"), 1);
        assert_eq!(host.count("set_account_role"), 1);
        assert!(host.called("set_account_role(1, administrator)"));
        assert_eq!(host.count("grant_network_admin"), 0);
        assert_eq!(host.accounts[0].role.as_deref(), Some("administrator"));
    }

    #[test]
    fn test_multisite_grants_network_admin_once() {
        let mut host = RecordingHost {
            multisite: true,
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert!(outcome.is_created());
        assert_eq!(host.count("set_account_role"), 1);
        assert_eq!(host.count("grant_network_admin"), 1);
        assert!(host.called("grant_network_admin(1)"));
    }

    #[test]
    fn test_username_collision_makes_no_mutation() {
        let mut host = RecordingHost {
            existing_usernames: vec!["ab12Cd34".to_string()],
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert_eq!(outcome, ProvisioningOutcome::RejectedCollision(CollisionField::Username));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_email_collision_makes_no_mutation() {
        let mut host = RecordingHost {
            existing_emails: vec!["x@y.com".to_string()],
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert_eq!(outcome, ProvisioningOutcome::RejectedCollision(CollisionField::Email));
        assert_eq!(host.count("create_account"), 0);
        assert!(outcome.account_id().is_none());
    }

    #[test]
    fn test_storage_failure_is_terminal() {
        let mut host = RecordingHost {
            create_error: Some(HostError::Storage("disk full".to_string())),
            multisite: true,
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert_eq!(
            outcome,
            ProvisioningOutcome::Failed("storage failure: disk full".to_string())
        );
        assert_eq!(host.count("create_account"), 1);
        assert_eq!(host.count("set_account_role"), 0);
        assert_eq!(host.count("grant_network_admin"), 0);
    }

    #[test]
    fn test_late_collision_from_store() {
        let mut host = RecordingHost {
            create_error: Some(HostError::Collision(CollisionField::Email)),
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert_eq!(outcome, ProvisioningOutcome::RejectedCollision(CollisionField::Email));
        assert_eq!(host.count("set_account_role"), 0);
    }

    #[test]
    fn test_role_failure_is_not_rolled_back() {
        let mut host = RecordingHost {
            role_error: Some(HostError::Storage("locked".to_string())),
            multisite: true,
            ..RecordingHost::default()
        };

        let outcome = provision(&mut host, "ab12Cd34", "x@y.com", "Str0ng!Passw0rd");

        assert!(matches!(outcome, ProvisioningOutcome::Failed(_)));
        assert_eq!(host.accounts.len(), 1);
        assert_eq!(host.count("grant_network_admin"), 0);
    }
}
