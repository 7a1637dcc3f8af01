use log::{debug, error, info, warn};
use rand::Rng;
use std::fmt;

use super::messages::{artifact_not_deleted, escape_html, USER_NOT_CREATED};
use crate::modules::admin::{bootstrap_session, provision, ProvisioningOutcome, SessionStatus};
use crate::modules::host::{AccountHost, HostError, SelfArtifact};
use crate::modules::identity::{Identity, IdentityError};
use crate::modules::utils::logging::format_sensitive;
use crate::DEFAULT_USERNAME_LENGTH;

/// States of a run, visited strictly in this order (Failed only on error)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Start,
    Provisioning,
    SessionBootstrap,
    Failed,
    Cleanup,
    Done,
}

/// What the caller should do once the run is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerExit {
    Redirect(String),
    /// Already HTML-escaped
    Halt(String),
}

impl TriggerExit {
    /// A surviving artifact outranks everything else, then a failed
    /// provisioning, and only a clean run redirects.
    pub fn decide(cleanup: &Result<(), CleanupError>, provisioning_failed: bool, admin_url: String) -> Self {
        match cleanup {
            Err(e) => TriggerExit::Halt(escape_html(&artifact_not_deleted(&e.artifact))),
            Ok(()) if provisioning_failed => TriggerExit::Halt(escape_html(USER_NOT_CREATED)),
            Ok(()) => TriggerExit::Redirect(admin_url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupFailure {
    NotWritable,
    DeleteFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupError {
    pub artifact: String,
    pub reason: CleanupFailure,
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            CleanupFailure::NotWritable => write!(f, "{} is missing or not writable", self.artifact),
            CleanupFailure::DeleteFailed => write!(f, "{} could not be removed", self.artifact),
        }
    }
}

impl std::error::Error for CleanupError {}

/// The entry point is already gone, so this capability was used before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadyConsumed {
    pub artifact: String,
}

impl fmt::Display for AlreadyConsumed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is no longer present; refusing to run again", self.artifact)
    }
}

impl std::error::Error for AlreadyConsumed {}

/// Everything a finished run did
#[derive(Debug)]
pub struct RunReport {
    pub identity: Option<Identity>,
    pub outcome: Option<ProvisioningOutcome>,
    pub session: Option<Result<SessionStatus, HostError>>,
    pub failure: Option<String>,
    pub cleanup: Result<(), CleanupError>,
    pub exit: TriggerExit,
    pub states: Vec<TriggerState>,
}

impl RunReport {
    /// How many times the run entered `state`
    pub fn visited(&self, state: TriggerState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }
}

/// Delete the artifact so the capability cannot be used again
pub fn retire_artifact<A: SelfArtifact + ?Sized>(artifact: &mut A) -> Result<(), CleanupError> {
    let name = artifact.name();

    if !artifact.is_writable() {
        error!("{} is not writable and must be deleted by hand", name);
        return Err(CleanupError {
            artifact: name,
            reason: CleanupFailure::NotWritable,
        });
    }
    if !artifact.delete() {
        error!("{} could not be deleted and must be removed by hand", name);
        return Err(CleanupError {
            artifact: name,
            reason: CleanupFailure::DeleteFailed,
        });
    }

    info!("Removed {}", name);
    Ok(())
}

/// One-shot provisioning run over a host and its entry-point artifact
pub struct Trigger<'a, H: AccountHost + ?Sized, A: SelfArtifact + ?Sized> {
    host: &'a mut H,
    artifact: &'a mut A,
    username_length: usize,
    states: Vec<TriggerState>,
}

impl<'a, H: AccountHost + ?Sized, A: SelfArtifact + ?Sized> Trigger<'a, H, A> {
    pub fn new(host: &'a mut H, artifact: &'a mut A) -> Self {
        Self {
            host,
            artifact,
            username_length: DEFAULT_USERNAME_LENGTH,
            states: Vec::new(),
        }
    }

    pub fn username_length(mut self, length: usize) -> Self {
        self.username_length = length;
        self
    }

    /// Generate a random identity and provision it
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<RunReport, AlreadyConsumed> {
        self.guard()?;
        self.enter(TriggerState::Start);

        let password = self.host.generate_strong_password();
        let identity = Identity::generate(rng, self.username_length, password);
        Ok(self.finish(identity))
    }

    /// Provision a caller-supplied identity
    pub fn run_with_identity(mut self, identity: Identity) -> Result<RunReport, AlreadyConsumed> {
        self.guard()?;
        self.enter(TriggerState::Start);
        Ok(self.finish(Ok(identity)))
    }

    fn guard(&self) -> Result<(), AlreadyConsumed> {
        if self.artifact.is_present() {
            return Ok(());
        }
        let artifact = self.artifact.name();
        warn!("{} is gone; provisioning was already used", artifact);
        Err(AlreadyConsumed { artifact })
    }

    fn enter(&mut self, state: TriggerState) {
        debug!("Trigger state {:?} -> {:?}", self.states.last(), state);
        self.states.push(state);
    }

    fn finish(mut self, identity: Result<Identity, IdentityError>) -> RunReport {
        let mut outcome = None;
        let mut session = None;
        let mut failure = None;

        let identity = match identity {
            Ok(identity) => Some(identity),
            Err(e) => {
                error!("Could not generate identity: {}", e);
                failure = Some(e.to_string());
                None
            }
        };

        if let Some(identity) = &identity {
            info!(
                "Provisioning administrator {} <{}>",
                format_sensitive(&identity.username),
                format_sensitive(&identity.email)
            );
            self.enter(TriggerState::Provisioning);

            let result = provision(
                &mut *self.host,
                &identity.username,
                &identity.email,
                &identity.password,
            );
            match &result {
                ProvisioningOutcome::Created(_) => {
                    self.enter(TriggerState::SessionBootstrap);
                    let status = bootstrap_session(&mut *self.host, &identity.username);
                    match &status {
                        Ok(status) => debug!("Session bootstrap finished: {:?}", status),
                        Err(e) => error!("Account created but automatic login failed: {}", e),
                    }
                    session = Some(status);
                }
                ProvisioningOutcome::RejectedCollision(field) => {
                    failure = Some(format!("generated {} already exists", field));
                }
                ProvisioningOutcome::Failed(reason) => {
                    failure = Some(reason.clone());
                }
            }
            outcome = Some(result);
        }

        if let Some(reason) = &failure {
            warn!("Run failed: {}", reason);
            self.enter(TriggerState::Failed);
        }

        // Runs on every path; a live artifact is itself a hazard
        self.enter(TriggerState::Cleanup);
        let cleanup = retire_artifact(&mut *self.artifact);

        let exit = TriggerExit::decide(&cleanup, failure.is_some(), self.host.admin_url());
        self.enter(TriggerState::Done);

        RunReport {
            identity,
            outcome,
            session,
            failure,
            cleanup,
            exit,
            states: self.states,
        }
    }
}
