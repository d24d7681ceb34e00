pub mod sqlite_sqlx;
pub mod system_clock;
