use chanban_application::infrastructure_config::{Config, LogFormat};
use tracing::info;

pub fn print_startup_info(config: &Config) {
    print_page_info(config);
    print_configuration_info(config);
}

fn print_page_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 Pages:");
    info!("  Active bans: {}/bans", base_url);
    info!("  Recently expired: {}/bans/expired", base_url);
    info!("  All bans: {}/bans/all", base_url);
    info!("  Health: {}/health", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    info!("  Environment: {}", config.environment.env);
    info!(
        "  🗄️  Database: {} (pool {}, query timeout {}s)",
        config.db.redacted_url(),
        config.db.pool_size,
        config.db.query_timeout_secs
    );
    info!(
        "  ⏳ Recently expired window: {} days",
        config.bans.recently_expired_window_days
    );
    let format = match config.logging.format {
        LogFormat::Json => "json",
        LogFormat::Pretty => "pretty",
    };
    info!("  📝 Logging: level {}, format {}", config.logging.level, format);
}
