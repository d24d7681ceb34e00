use std::sync::Arc;
use time::OffsetDateTime;

use crate::error::AppResult;
use domain::ban::{BanRecord, BanRowId, EditToken};

#[async_trait::async_trait]
pub trait BanStorePort: Send + Sync {
    async fn get_active_bans(&self) -> AppResult<Vec<BanRecord>>;

    async fn get_recently_expired_bans(&self) -> AppResult<Vec<BanRecord>>;

    async fn get_all_bans(&self) -> AppResult<Vec<BanRecord>>;

    /// `None` unless `token` is the secret stored for `row_id`.
    async fn get_ban_with_auth(
        &self,
        row_id: &BanRowId,
        token: &EditToken,
    ) -> AppResult<Option<BanRecord>>;

    /// `expire_at = None` marks the ban as never expiring.
    async fn update_ban_by_row_id(
        &self,
        row_id: &BanRowId,
        expire_at: Option<OffsetDateTime>,
        reason: &str,
    ) -> AppResult<()>;
}

pub type DynBanStorePort = Arc<dyn BanStorePort>;
