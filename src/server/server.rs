use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::service::AuthService;
use crate::config::settings::SettingsConfig;
use crate::config::upstream::ServiceConfig;
use crate::lineage::client::LineageClient;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::routes;
use crate::upstream::CatalogClient;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub lineage: LineageClient,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, metrics: &Metrics) -> Self {
        Self {
            lineage: LineageClient::new(auth.clone()),
            auth,
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

/// All routes with CORS and request tracing; unknown paths get the 404 envelope.
pub fn app(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .merge(routes::root::router())
        .merge(routes::auth::router())
        .merge(routes::lineage::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .fallback(routes::root::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(service_config: &ServiceConfig) -> Result<()> {
    let metrics = get_metrics().await;
    let catalog = CatalogClient::new(service_config.upstream.clone())
        .context("failed to build upstream client")?;
    let state = AppState::new(Arc::new(AuthService::new(catalog)), metrics);
    let app = app(state, &service_config.settings);

    let bind_addr = service_config.settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on {}", bind_addr);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated")?;
    metrics.up.set(0);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
