use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::ban_store::DynBanStorePort;
use domain::ban::{BanAccessError, BanRecord, EditCapability};

/// Single gate in front of every read or write made through an edit link.
pub struct BanEditAuthorizer {
    ban_store: DynBanStorePort,
}

impl BanEditAuthorizer {
    pub fn new(ban_store: DynBanStorePort) -> Self {
        Self { ban_store }
    }

    /// Revoked and expired bans are still handed out; they remain editable.
    pub async fn authorize(&self, capability: &EditCapability) -> AppResult<BanRecord> {
        let ban = self
            .ban_store
            .get_ban_with_auth(&capability.row_id, &capability.token)
            .await?;

        ban.ok_or_else(|| {
            warn!(
                row_id = %capability.row_id,
                "Rejected edit link: no ban matches row and token"
            );
            AppError::BanAccess(BanAccessError::NotFound)
        })
    }
}
