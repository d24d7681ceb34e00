use std::error::Error;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use chanban_server::bootstrap::router::create_router;
use chanban_server::bootstrap::state::AppState;
use chanban_server::config_loader;
use chanban_server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    config_loader::load_env_file()?;

    let config = config_loader::load_config()?;

    observability::tracing::setup_logging(&config)?;

    info!("Starting channel ban server");
    info!("Database URL: {}", config.db.redacted_url());

    let state = AppState::new(config.clone()).await?;
    let app = create_router(&state);

    let listener = TcpListener::bind(&config.server_address()).await?;
    info!("Server listening on http://{}", config.server_address());

    observability::startup_info::print_startup_info(&config);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.close().await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown...");
        },
        () = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        },
    }
}
