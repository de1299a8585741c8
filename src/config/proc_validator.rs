//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * server bind address and metrics path
//!   * logging level
//!   * upstream url, credentials mode and timeout

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::upstream::{ServiceConfig, UpstreamConfig};
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_upstream(&cfg.upstream, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

/// UPSTREAM VALIDATION
fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<String>) {
    if upstream.api_url.is_empty() {
        errors.push("upstream.api_url cannot be empty".to_string());
    } else if !(upstream.api_url.starts_with("http://") || upstream.api_url.starts_with("https://")) {
        errors.push(format!(
            "upstream.api_url '{}' must start with http:// or https://",
            upstream.api_url
        ));
    }

    if upstream.api_key.is_none() && !upstream.has_client_credentials() {
        errors.push(
            "upstream: either api_key or both client_id and client_secret must be set".to_string(),
        );
    }

    if upstream.timeout_ms == Some(0) {
        errors.push("upstream.timeout_ms must be > 0".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{LoggingConfig, LogFormat, MetricsConfig, ServerConfig};

    fn service_config(upstream: UpstreamConfig) -> ServiceConfig {
        ServiceConfig {
            settings: SettingsConfig {
                metrics: MetricsConfig::default(),
                server: ServerConfig { host: "127.0.0.1".into(), port: "5000".into() },
                logging: Some(LoggingConfig::new("info".into(), LogFormat::Compact)),
            },
            upstream,
        }
    }

    #[tokio::test]
    async fn api_key_alone_is_enough() {
        let cfg = service_config(UpstreamConfig {
            api_url: "https://tenant.atlan.com/api/meta".into(),
            api_key: Some("key".into()),
            ..Default::default()
        });
        assert!(validate_service_config(&cfg).await.is_ok());
    }

    #[tokio::test]
    async fn client_id_without_secret_is_rejected() {
        let cfg = service_config(UpstreamConfig {
            api_url: "https://tenant.atlan.com/api/meta".into(),
            client_id: Some("id".into()),
            ..Default::default()
        });
        let errors = validate_service_config(&cfg).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("client_secret"));
    }

    #[tokio::test]
    async fn errors_are_aggregated() {
        let mut cfg = service_config(UpstreamConfig {
            api_url: "tenant.atlan.com".into(),
            api_key: Some("key".into()),
            timeout_ms: Some(0),
            ..Default::default()
        });
        cfg.settings.server.port = "http".into();
        cfg.settings.metrics.path = "metrics".into();

        let errors = validate_service_config(&cfg).await.unwrap_err();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }
}
