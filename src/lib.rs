// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{admin, auth, encryption, host, identity, security, trigger, utils};

// Re-export commonly used types
pub use modules::admin::config::InjectConfig;
pub use modules::admin::{bootstrap_session, provision, ProvisioningOutcome, SessionStatus};
pub use modules::host::{AccountHost, FileArtifact, HostError, LocalHost, SelfArtifact};
pub use modules::identity::Identity;
pub use modules::trigger::{RunReport, Trigger, TriggerExit, TriggerState};

// Constants
pub const ADMINISTRATOR_ROLE: &str = "administrator";
pub const DEFAULT_USERNAME_LENGTH: usize = 8;
pub const GENERATED_PASSWORD_LENGTH: usize = 24;
pub const AUTH_TOKEN_DURATION: u64 = 14 * 24 * 3600;
pub const PBKDF2_ROUNDS: u32 = 100_000;
pub const KEYRING_SERVICE: &str = "inject-admin";

// Type aliases
pub type HmacSha256 = hmac::Hmac<sha2::Sha256>;
pub type Aes256Cbc = block_modes::Cbc<aes::Aes256, block_modes::block_padding::Pkcs7>;
