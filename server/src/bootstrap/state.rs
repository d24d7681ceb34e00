use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use chanban_adapters::outgoing::{
    sqlite_sqlx::{MIGRATOR, ban_store_sqlite::SqliteBanStoreAdapter},
    system_clock::SystemClockAdapter,
};
use chanban_adapters::shared::app_state::AppState as AdaptersAppState;
use chanban_application::{
    ban::service::BanService,
    error::AppError,
    infrastructure_config::Config,
    ports::outgoing::{ban_store::DynBanStorePort, clock::DynClockPort},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_pool: SqlitePool,
    pub ban_service: Arc<BanService>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let db_pool = Self::create_database_pool(&config).await?;
        Self::run_migrations(&db_pool).await?;

        let clock: DynClockPort = Arc::new(SystemClockAdapter::new());
        let ban_store: DynBanStorePort = Arc::new(SqliteBanStoreAdapter::new(
            db_pool.clone(),
            config.db.query_timeout_secs,
            Arc::clone(&clock),
            config.bans.recently_expired_window_days,
        ));
        let ban_service = Arc::new(BanService::new(ban_store, clock));

        Ok(Self {
            config,
            db_pool,
            ban_service,
        })
    }

    async fn create_database_pool(config: &Config) -> Result<SqlitePool, AppError> {
        let options = SqliteConnectOptions::from_str(config.db.database_url())
            .map_err(|e| AppError::ConfigError {
                message: format!("Invalid database URL {}: {}", config.db.redacted_url(), e),
            })?
            .create_if_missing(config.db.create_if_missing);

        SqlitePoolOptions::new()
            .max_connections(config.db.pool_size)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })
    }

    async fn run_migrations(db_pool: &SqlitePool) -> Result<(), AppError> {
        MIGRATOR
            .run(db_pool)
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations applied");
        Ok(())
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.ban_service) as _,
            Arc::clone(&self.ban_service) as _,
        )
    }

    pub async fn close(&self) {
        self.db_pool.close().await;
    }
}
