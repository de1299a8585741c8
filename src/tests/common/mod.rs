pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;

use crate::auth::service::AuthService;
use crate::config::settings::{MetricsConfig, ServerConfig, SettingsConfig};
use crate::config::upstream::UpstreamConfig;
use crate::observability::metrics::get_metrics;
use crate::server::server::{app, AppState};
use crate::upstream::CatalogClient;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Upstream authenticating with client credentials; `origin` is `http://host:port`.
pub fn oauth_upstream(origin: &str) -> UpstreamConfig {
    UpstreamConfig {
        api_url: format!("{origin}/api/meta"),
        api_key: None,
        client_id: Some("gateway".into()),
        client_secret: Some("s3cret".into()),
        timeout_ms: Some(2_000),
    }
}

/// Upstream authenticating with a static API key.
pub fn api_key_upstream(origin: &str) -> UpstreamConfig {
    UpstreamConfig {
        api_key: Some("key-123".into()),
        client_id: None,
        client_secret: None,
        ..oauth_upstream(origin)
    }
}

pub fn auth_service(upstream: UpstreamConfig) -> Arc<AuthService> {
    Arc::new(AuthService::new(CatalogClient::new(upstream).expect("catalog client")))
}

pub fn settings() -> SettingsConfig {
    SettingsConfig {
        metrics: MetricsConfig {
            path: "/metrics".into(),
            is_enabled: true,
        },
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: "0".into(),
        },
        logging: None,
    }
}

/// Full gateway in front of `upstream`; returns the gateway base url.
pub async fn spawn_gateway(upstream: UpstreamConfig) -> (JoinHandle<()>, String) {
    let state = AppState::new(auth_service(upstream), get_metrics().await);
    let (handle, addr) = spawn_axum(app(state, &settings())).await;
    (handle, format!("http://{addr}"))
}
