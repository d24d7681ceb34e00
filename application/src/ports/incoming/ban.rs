use crate::ban::view::{BanEditSubmission, BanEditView, BanListView};
use crate::error::AppResult;
use domain::ban::EditCapability;

#[async_trait::async_trait]
pub trait BanListingUseCase: Send + Sync {
    async fn list_active(&self) -> AppResult<BanListView>;

    async fn list_recently_expired(&self) -> AppResult<BanListView>;

    async fn list_all(&self) -> AppResult<BanListView>;
}

#[async_trait::async_trait]
pub trait BanEditUseCase: Send + Sync {
    async fn view_ban(&self, capability: &EditCapability) -> AppResult<BanEditView>;

    async fn submit_ban_edit(
        &self,
        capability: &EditCapability,
        submission: BanEditSubmission,
    ) -> AppResult<BanEditView>;
}
