use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ban::authorizer::BanEditAuthorizer;
use crate::ban::view::{BanEditSubmission, BanEditView, BanListKind, BanListView};
use crate::error::AppResult;
use crate::ports::incoming::ban::{BanEditUseCase, BanListingUseCase};
use crate::ports::outgoing::{ban_store::DynBanStorePort, clock::DynClockPort};
use domain::ban::EditCapability;

pub struct BanService {
    ban_store: DynBanStorePort,
    clock: DynClockPort,
    authorizer: BanEditAuthorizer,
}

impl BanService {
    pub fn new(ban_store: DynBanStorePort, clock: DynClockPort) -> Self {
        let authorizer = BanEditAuthorizer::new(Arc::clone(&ban_store));
        Self {
            ban_store,
            clock,
            authorizer,
        }
    }
}

#[async_trait::async_trait]
impl BanListingUseCase for BanService {
    #[instrument(skip(self))]
    async fn list_active(&self) -> AppResult<BanListView> {
        let bans = self.ban_store.get_active_bans().await?;
        Ok(BanListView::new(BanListKind::Active, bans))
    }

    #[instrument(skip(self))]
    async fn list_recently_expired(&self) -> AppResult<BanListView> {
        let bans = self.ban_store.get_recently_expired_bans().await?;
        Ok(BanListView::new(BanListKind::RecentlyExpired, bans))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<BanListView> {
        let bans = self.ban_store.get_all_bans().await?;
        Ok(BanListView::new(BanListKind::All, bans))
    }
}

#[async_trait::async_trait]
impl BanEditUseCase for BanService {
    #[instrument(skip(self))]
    async fn view_ban(&self, capability: &EditCapability) -> AppResult<BanEditView> {
        let ban = self.authorizer.authorize(capability).await?;
        Ok(BanEditView::unchanged(&ban))
    }

    #[instrument(skip(self, submission))]
    async fn submit_ban_edit(
        &self,
        capability: &EditCapability,
        submission: BanEditSubmission,
    ) -> AppResult<BanEditView> {
        let ban = self.authorizer.authorize(capability).await?;

        let resolved = match ban.resolve_expiration(&submission.expire_at, self.clock.now()) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(row_id = %capability.row_id, "Rejected ban edit: {}", e);
                let message = e.to_string();
                return Ok(BanEditView::rejected(&ban, submission, message));
            }
        };

        self.ban_store
            .update_ban_by_row_id(
                &capability.row_id,
                resolved.into_deadline(),
                &submission.reason,
            )
            .await?;

        info!(
            row_id = %capability.row_id,
            channel = %ban.channel,
            mask = %ban.mask,
            expire_at = %resolved,
            "Ban updated"
        );

        let updated = ban.with_edit(resolved, submission.reason);
        Ok(BanEditView::saved(&updated))
    }
}
