//! Outbound side: the shared HTTP client for the catalog API and its OAuth grants.

pub mod oauth2;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Request, RequestBuilder};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::upstream::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// Shared client for every call to the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: Arc<UpstreamConfig>,
}

impl CatalogClient {
    pub fn new(config: UpstreamConfig) -> GatewayResult<Self> {
        let timeout_ms = config.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Sends the request and decodes a JSON body, recording per-operation metrics.
    ///
    /// Non-2xx answers become [`GatewayError::UpstreamStatus`] carrying the
    /// status and raw body. An empty 2xx body decodes to `null`.
    pub async fn execute(&self, operation: &str, request: RequestBuilder) -> GatewayResult<Value> {
        let metrics = get_metrics().await;
        let start = get_instant();
        let request = request.build()?;

        metrics
            .upstream_requests
            .with_label_values(&[operation, request.method().as_str()])
            .inc();
        debug!("{} {} ({})", request.method(), request.url(), operation);

        let result = self.send(request).await;

        metrics
            .upstream_duration
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics
                .upstream_failures
                .with_label_values(&[operation, e.reason()])
                .inc();
            error!("Failed to {}: {}", operation, e);
        }
        result
    }

    async fn send(&self, request: Request) -> GatewayResult<Value> {
        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
