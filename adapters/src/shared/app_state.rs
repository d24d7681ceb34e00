use std::sync::Arc;

use chanban_application::{
    infrastructure_config::Config,
    ports::incoming::ban::{BanEditUseCase, BanListingUseCase},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ban_listing_use_case: Arc<dyn BanListingUseCase>,
    pub ban_edit_use_case: Arc<dyn BanEditUseCase>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        ban_listing_use_case: Arc<dyn BanListingUseCase>,
        ban_edit_use_case: Arc<dyn BanEditUseCase>,
    ) -> Self {
        Self {
            config,
            ban_listing_use_case,
            ban_edit_use_case,
        }
    }
}
