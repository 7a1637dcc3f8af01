pub mod config;
mod provision;
mod session;

pub use config::{ConfigError, InjectConfig};
pub use provision::{provision, ProvisioningOutcome};
pub use session::{bootstrap_session, SessionStatus};
