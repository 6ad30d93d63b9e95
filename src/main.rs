//! Countdown Timer - A start/pause/cancel countdown controlled over HTTP
//! 
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{presenter_task, spawn_countdown},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s", 
          config.host, config.port, config.duration);

    // Start the countdown event loop
    let (countdown, countdown_task) = spawn_countdown(config.duration);

    // Start the terminal presenter
    let signals = countdown.subscribe();
    let bell = !config.no_bell;
    tokio::spawn(async move {
        presenter_task(signals, bell).await;
    });

    // Create HTTP router with all endpoints
    let state = Arc::new(AppState::new(config.port, config.host.clone(), countdown));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /duration - Select the next countdown length");
    info!("  POST /toggle   - Start, pause or resume the countdown");
    info!("  POST /cancel   - Cancel the current countdown");
    info!("  GET  /status   - Check remaining time and progress");
    info!("  GET  /events   - Stream view signals (SSE)");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    countdown_task.abort();
    info!("Server shutdown complete");
    Ok(())
}
