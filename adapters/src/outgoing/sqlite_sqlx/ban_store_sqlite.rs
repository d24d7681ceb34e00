use sqlx::SqlitePool;
use subtle::ConstantTimeEq;
use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument};

use chanban_application::{
    error::{AppError, AppResult},
    ports::outgoing::{ban_store::BanStorePort, clock::DynClockPort},
};
use domain::{
    ban::{BanRecord, BanRowId, EditToken},
    error::DomainError,
};

use super::utils::{SqliteExecutor, from_unix, to_unix};

#[derive(sqlx::FromRow)]
struct BanRow {
    channel: String,
    mask: String,
    mode: String,
    set_at: i64,
    set_by: String,
    expire_at: Option<i64>,
    reason: String,
    revoked_at: Option<i64>,
    revoked_by: Option<String>,
}

#[derive(sqlx::FromRow)]
struct AuthorizedBanRow {
    #[sqlx(flatten)]
    ban: BanRow,
    auth_token: String,
}

impl BanRow {
    fn into_record(self) -> AppResult<BanRecord> {
        Ok(BanRecord {
            mode: parse_mode(self.mode)?,
            channel: self.channel,
            mask: self.mask,
            set_at: from_unix(self.set_at)?,
            set_by: self.set_by,
            expire_at: self.expire_at.map(from_unix).transpose()?,
            reason: self.reason,
            revoked_at: self.revoked_at.map(from_unix).transpose()?,
            revoked_by: self.revoked_by,
        })
    }
}

fn parse_mode(mode: String) -> AppResult<char> {
    let mut chars = mode.chars();
    match (chars.next(), chars.next()) {
        (Some(flag), None) => Ok(flag),
        _ => Err(DomainError::InvalidBanMode(mode).into()),
    }
}

fn into_records(rows: Vec<BanRow>) -> AppResult<Vec<BanRecord>> {
    rows.into_iter().map(BanRow::into_record).collect()
}

/// Row ids are SQLite `rowid`s; anything but plain decimal digits matches nothing.
fn parse_row_id(row_id: &BanRowId) -> Option<i64> {
    let raw = row_id.as_str();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn tokens_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

pub struct SqliteBanStoreAdapter {
    pool: SqlitePool,
    executor: SqliteExecutor,
    clock: DynClockPort,
    recently_expired_window: Duration,
}

impl SqliteBanStoreAdapter {
    pub fn new(
        pool: SqlitePool,
        query_timeout_secs: u64,
        clock: DynClockPort,
        recently_expired_window_days: u32,
    ) -> Self {
        Self {
            pool,
            executor: SqliteExecutor::new(query_timeout_secs),
            clock,
            recently_expired_window: Duration::days(i64::from(recently_expired_window_days)),
        }
    }

    fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

#[async_trait::async_trait]
impl BanStorePort for SqliteBanStoreAdapter {
    #[instrument(skip(self))]
    async fn get_active_bans(&self) -> AppResult<Vec<BanRecord>> {
        let now = to_unix(self.now());
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanRow>(
                        r#"
                    SELECT channel, mask, mode, set_at, set_by, expire_at, reason, revoked_at, revoked_by
                    FROM bans
                    WHERE revoked_at IS NULL
                      AND (expire_at IS NULL OR expire_at > ?)
                    ORDER BY set_at DESC, rowid DESC
                    "#,
                    )
                    .bind(now)
                    .fetch_all(&self.pool)
                },
                "Failed to get active bans",
            )
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self))]
    async fn get_recently_expired_bans(&self) -> AppResult<Vec<BanRecord>> {
        let now = self.now();
        let cutoff = now
            .checked_sub(self.recently_expired_window)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let (now, cutoff) = (to_unix(now), to_unix(cutoff));

        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanRow>(
                        r#"
                    SELECT channel, mask, mode, set_at, set_by, expire_at, reason, revoked_at, revoked_by
                    FROM (
                        SELECT *,
                            CASE
                                WHEN revoked_at IS NOT NULL
                                     AND (expire_at IS NULL OR revoked_at < expire_at)
                                    THEN revoked_at
                                ELSE expire_at
                            END AS ended_at
                        FROM bans
                    )
                    WHERE (revoked_at IS NOT NULL OR (expire_at IS NOT NULL AND expire_at <= ?))
                      AND ended_at > ?
                    ORDER BY ended_at DESC
                    "#,
                    )
                    .bind(now)
                    .bind(cutoff)
                    .fetch_all(&self.pool)
                },
                "Failed to get recently expired bans",
            )
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self))]
    async fn get_all_bans(&self) -> AppResult<Vec<BanRecord>> {
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanRow>(
                        r#"
                    SELECT channel, mask, mode, set_at, set_by, expire_at, reason, revoked_at, revoked_by
                    FROM bans
                    ORDER BY set_at DESC, rowid DESC
                    "#,
                    )
                    .fetch_all(&self.pool)
                },
                "Failed to get all bans",
            )
            .await?;

        into_records(rows)
    }

    #[instrument(skip(self, token))]
    async fn get_ban_with_auth(
        &self,
        row_id: &BanRowId,
        token: &EditToken,
    ) -> AppResult<Option<BanRecord>> {
        let Some(rowid) = parse_row_id(row_id) else {
            debug!(row_id = %row_id, "Edit link carries a non-numeric row id");
            return Ok(None);
        };

        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, AuthorizedBanRow>(
                        r#"
                    SELECT channel, mask, mode, set_at, set_by, expire_at, reason, revoked_at, revoked_by, auth_token
                    FROM bans
                    WHERE rowid = ?
                    "#,
                    )
                    .bind(rowid)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to get ban {}", rowid),
            )
            .await?;

        match row {
            Some(row) if tokens_match(&row.auth_token, token.expose()) => {
                row.ban.into_record().map(Some)
            }
            _ => Ok(None),
        }
    }

    #[instrument(skip(self, reason))]
    async fn update_ban_by_row_id(
        &self,
        row_id: &BanRowId,
        expire_at: Option<OffsetDateTime>,
        reason: &str,
    ) -> AppResult<()> {
        let rowid = parse_row_id(row_id).ok_or_else(|| AppError::NotFound {
            message: format!("Ban {} does not exist", row_id),
        })?;
        let expire_at = expire_at.map(to_unix);

        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r#"
                    UPDATE bans
                    SET expire_at = ?, reason = ?
                    WHERE rowid = ?
                    "#,
                    )
                    .bind(expire_at)
                    .bind(reason)
                    .bind(rowid)
                    .execute(&self.pool)
                },
                &format!("Failed to update ban {}", rowid),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                message: format!("Ban {} does not exist", rowid),
            });
        }

        Ok(())
    }
}
