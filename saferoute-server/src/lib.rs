//! HTTP service and command line front end of the flood-aware router

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod state;

use std::{net::SocketAddr, time::Duration};

use saferoute_core::{RouteQuery, create_routing_model, plan_route};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{RequestLimits, RouteResponse, build_router},
    config::AppConfig,
    state::AppState,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Installs the global `tracing` subscriber; `RUST_LOG` overrides the default
/// filter. Log records of the core crate are forwarded as well.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the routing model and serves the API until Ctrl+C
///
/// # Errors
///
/// Returns an error if the model cannot be built or the address cannot be bound
pub async fn serve(config: AppConfig, bind: Option<SocketAddr>) -> Result<(), BoxError> {
    let dataset = config.dataset.clone();
    let routing = config.routing;
    let model = tokio::task::spawn_blocking(move || create_routing_model(&dataset, routing)).await??;

    let limits = RequestLimits {
        timeout: Duration::from_secs(config.server.request_timeout_secs),
        concurrency: config.server.concurrency_limit,
    };
    let app = build_router(AppState::new(model, config.places), limits);

    let addr = bind.unwrap_or(config.server.bind);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}

/// Computes one route and renders it as pretty JSON
///
/// # Errors
///
/// Returns an error if the model cannot be built or no route exists
pub fn route_once(config: &AppConfig, query: &RouteQuery, geojson: bool) -> Result<String, BoxError> {
    let model = create_routing_model(&config.dataset, config.routing)?;
    let report = plan_route(&model, query)?;

    let rendered = if geojson {
        serde_json::to_string_pretty(&report.route.to_geojson()?)?
    } else {
        serde_json::to_string_pretty(&RouteResponse::from(report))?
    };
    Ok(rendered)
}
