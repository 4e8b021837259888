//! API server entry point.

use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use bazaar_db::{Database, DbConfig};

use bazaar_api::auth::JwtManager;
use bazaar_api::config::ApiConfig;
use bazaar_api::payment::SimulatedGateway;
use bazaar_api::{create_app, seed_sample_data, AppState};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bazaar API server");

    let config = ApiConfig::load()?;
    info!(port = config.port, db = %config.database_path, "Configuration loaded");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    seed_sample_data(&db).await?;

    let state = Arc::new(AppState {
        db,
        jwt: JwtManager::new(config.jwt_secret, config.jwt_lifetime_secs),
        gateway: Arc::new(SimulatedGateway::default()),
    });

    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}
