use anyhow::Context;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use geofence::{GeoFilter, RawFilterConfig, middleware};
use geofence_env_vars::var_parsed;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geofence::util::tracing::init();

    let config = RawFilterConfig::from_environment()
        .and_then(RawFilterConfig::into_config)
        .context("Failed to load geofence configuration")?;

    info!(
        mode = %config.mode(),
        codes = %config.codes(),
        "Geofence configured"
    );

    let filter = GeoFilter::new(config);

    let app = Router::new()
        .route("/", get(async || "Welcome!"))
        .layer(from_fn_with_state(filter, middleware::middleware));

    let port = var_parsed("PORT")?.unwrap_or(8888);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Listening at http://{}", listener.local_addr()?);

    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has gracefully shutdown!");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}
