use serde::Deserialize;

use chanban_application::ban::view::BanEditSubmission;

/// Form body of the edit page. Missing fields arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BanEditForm {
    pub expire_at: String,
    pub reason: String,
}

impl From<BanEditForm> for BanEditSubmission {
    fn from(form: BanEditForm) -> Self {
        Self {
            expire_at: form.expire_at,
            reason: form.reason,
        }
    }
}
