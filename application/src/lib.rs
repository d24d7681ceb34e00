#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "askama"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod ban;
pub mod error;
pub mod infrastructure_config;
pub mod ports;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
