use chanban_application::error::{AppError, AppResult};
use domain::error::DomainError;
use std::{future::Future, time::Duration};
use time::OffsetDateTime;
use tokio::time::timeout;

pub struct SqliteExecutor {
    timeout_secs: u64,
}

impl SqliteExecutor {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    pub async fn execute_with_timeout<T, F, Fut>(
        &self,
        operation: F,
        error_context: &str,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        timeout(Duration::from_secs(self.timeout_secs), operation())
            .await
            .map_err(|_| AppError::DatabaseError {
                message: "DB timeout".to_string(),
            })?
            .map_err(|e| AppError::DatabaseError {
                message: format!("{}: {}", error_context, e),
            })
    }
}

pub fn to_unix(instant: OffsetDateTime) -> i64 {
    instant.unix_timestamp()
}

pub fn from_unix(seconds: i64) -> AppResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|e| {
        AppError::from(DomainError::InvalidTimestamp(format!(
            "{seconds} is not a valid unix timestamp: {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn unix_seconds_round_trip() {
        let instant = datetime!(2018-03-14 15:09:26 UTC);
        assert_eq!(from_unix(to_unix(instant)).unwrap(), instant);
    }

    #[test]
    fn out_of_range_timestamp_is_a_domain_error() {
        assert!(matches!(
            from_unix(i64::MAX),
            Err(AppError::Domain(DomainError::InvalidTimestamp(_)))
        ));
    }

    #[tokio::test]
    async fn sqlx_failure_carries_context() {
        let executor = SqliteExecutor::new(1);
        let result: AppResult<()> = executor
            .execute_with_timeout(
                || async { Err(sqlx::Error::RowNotFound) },
                "Failed to load ban",
            )
            .await;

        match result {
            Err(AppError::DatabaseError { message }) => {
                assert!(message.starts_with("Failed to load ban: "));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
