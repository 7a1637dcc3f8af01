/// Shown whenever provisioning did not produce an account
pub const USER_NOT_CREATED: &str = "A new user could not be created.";

/// Shown when the entry point survived the run
pub fn artifact_not_deleted(artifact: &str) -> String {
    format!("{} could not be deleted. Please delete it manually.", artifact)
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
