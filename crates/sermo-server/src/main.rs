mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sermo_api::token::TokenService;
use sermo_api::{AppState, AppStateInner, create_router};

use crate::config::{Config, DEV_SIGNING_SECRET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sermo=debug,sermo_api=debug,sermo_db=info,tower_http=debug".into()),
        )
        .init();

    // Config
    let config = Config::load()?;
    info!("ENV: {}", config.environment.as_str());
    if config.signing_secret == DEV_SIGNING_SECRET {
        warn!("Using the built-in development signing secret; set SIGNING_KEY in the config file");
    }

    // Init database
    let db = sermo_db::Database::open(&config.db_path)?;

    // Shared state
    let app_state: AppState = Arc::new(
        AppStateInner::new(
            db,
            TokenService::new(config.signing_secret.as_bytes()),
            config.environment.as_str(),
        )
        .with_db_timeout(config.db_timeout),
    );

    let app = create_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Sermo server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            warn!("Failed to install SIGTERM handler");
            ctrl_c.await.ok();
            return;
        };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
