use anyhow::Context;
use axum::{routing::get, Router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vitalsync_ingestor::{auth::UserDirectory, config::Config, metrics, rest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("invalid configuration")?;

    info!("Starting VitalSync ingestor");
    info!("HTTP server: {}", config.http_addr);
    info!(
        "Demo data: {}",
        if config.seed_demo_data { "seeded" } else { "empty" }
    );

    metrics::init_metrics().context("failed to register metrics")?;

    let state = if config.seed_demo_data {
        rest::AppState::seeded(&config.device_api_key)
    } else {
        rest::AppState::new(&config.device_api_key).with_users(UserDirectory::seeded())
    };

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(state));

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.http_addr))?;

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
    Ok(())
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
