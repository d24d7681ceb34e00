pub mod ban_store_sqlite;
pub mod utils;

use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
