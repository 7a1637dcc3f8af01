mod machine;
pub mod messages;

pub use machine::{
    retire_artifact, AlreadyConsumed, CleanupError, CleanupFailure, RunReport, Trigger,
    TriggerExit, TriggerState,
};
pub use messages::{artifact_not_deleted, escape_html, USER_NOT_CREATED};
