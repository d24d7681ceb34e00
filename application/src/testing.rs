//! In-memory doubles for the outgoing ports.

use std::sync::{Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::{ban_store::BanStorePort, clock::ClockPort};
use domain::ban::{BanRecord, BanRowId, EditToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCall {
    pub row_id: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub row_id: String,
    pub expire_at: Option<OffsetDateTime>,
    pub reason: String,
}

#[derive(Debug, Default)]
struct Recorded {
    auth_calls: Vec<AuthCall>,
    update_calls: Vec<UpdateCall>,
}

/// Returns canned rows and records every edit-path call it receives.
#[derive(Debug, Default)]
pub struct RecordingBanStore {
    active: Vec<BanRecord>,
    recently_expired: Vec<BanRecord>,
    all: Vec<BanRecord>,
    editable: Option<(String, String, BanRecord)>,
    fail_updates: bool,
    recorded: Mutex<Recorded>,
}

impl RecordingBanStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_active(mut self, bans: Vec<BanRecord>) -> Self {
        self.active = bans;
        self
    }

    #[must_use]
    pub fn with_recently_expired(mut self, bans: Vec<BanRecord>) -> Self {
        self.recently_expired = bans;
        self
    }

    #[must_use]
    pub fn with_all(mut self, bans: Vec<BanRecord>) -> Self {
        self.all = bans;
        self
    }

    /// The only row reachable through `get_ban_with_auth`.
    #[must_use]
    pub fn with_editable(mut self, row_id: &str, token: &str, ban: BanRecord) -> Self {
        self.editable = Some((row_id.to_string(), token.to_string(), ban));
        self
    }

    #[must_use]
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn auth_calls(&self) -> Vec<AuthCall> {
        self.recorded().auth_calls.clone()
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.recorded().update_calls.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl BanStorePort for RecordingBanStore {
    async fn get_active_bans(&self) -> AppResult<Vec<BanRecord>> {
        Ok(self.active.clone())
    }

    async fn get_recently_expired_bans(&self) -> AppResult<Vec<BanRecord>> {
        Ok(self.recently_expired.clone())
    }

    async fn get_all_bans(&self) -> AppResult<Vec<BanRecord>> {
        Ok(self.all.clone())
    }

    async fn get_ban_with_auth(
        &self,
        row_id: &BanRowId,
        token: &EditToken,
    ) -> AppResult<Option<BanRecord>> {
        self.recorded().auth_calls.push(AuthCall {
            row_id: row_id.as_str().to_string(),
            token: token.expose().to_string(),
        });

        Ok(self
            .editable
            .as_ref()
            .filter(|(id, secret, _)| id == row_id.as_str() && secret == token.expose())
            .map(|(_, _, ban)| ban.clone()))
    }

    async fn update_ban_by_row_id(
        &self,
        row_id: &BanRowId,
        expire_at: Option<OffsetDateTime>,
        reason: &str,
    ) -> AppResult<()> {
        self.recorded().update_calls.push(UpdateCall {
            row_id: row_id.as_str().to_string(),
            expire_at,
            reason: reason.to_string(),
        });

        if self.fail_updates {
            return Err(AppError::DatabaseError {
                message: "update rejected by test store".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl ClockPort for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
