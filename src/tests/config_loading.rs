// Config file loading: env expansion, defaults and aggregated validation.

#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use crate::config::settings::LogFormat;
    use crate::utils::config_loader;

    const CONFIG: &str = r#"
settings:
  server:
    host: "0.0.0.0"
    port: "${GATEWAY_TEST_PORT:5000}"
  metrics:
    is_enabled: true
upstream:
  api_url: "${GATEWAY_TEST_API_URL}"
  api_key: "${GATEWAY_TEST_API_KEY:}"
  client_id: "gateway"
  client_secret: "${GATEWAY_TEST_SECRET:}"
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    fn clear_env() {
        for var in ["GATEWAY_TEST_PORT", "GATEWAY_TEST_API_URL", "GATEWAY_TEST_API_KEY", "GATEWAY_TEST_SECRET"] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    #[serial]
    async fn env_values_and_defaults_are_applied() {
        clear_env();
        std::env::set_var("GATEWAY_TEST_API_URL", "https://tenant.example.com/api/meta/");
        std::env::set_var("GATEWAY_TEST_API_KEY", "key-123");
        let file = write_config(CONFIG);

        let cfg = config_loader::run(file.path().to_str().unwrap()).await.unwrap();

        assert_eq!(cfg.settings.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.settings.metrics.path, "/metrics");
        let logging = cfg.settings.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);

        assert_eq!(cfg.upstream.api_key.as_deref(), Some("key-123"));
        assert_eq!(cfg.upstream.client_secret, None);
        assert_eq!(cfg.upstream.timeout_ms, Some(10_000));
        assert_eq!(cfg.upstream.token_url(), "https://tenant.example.com/oauth/token");
        assert_eq!(cfg.upstream.endpoint("/lineage"), "https://tenant.example.com/api/meta/lineage");
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn client_credentials_mode_needs_both_values() {
        clear_env();
        std::env::set_var("GATEWAY_TEST_API_URL", "https://tenant.example.com/api/meta");
        std::env::set_var("GATEWAY_TEST_SECRET", "s3cret");
        let file = write_config(CONFIG);

        let cfg = config_loader::run(file.path().to_str().unwrap()).await.unwrap();
        assert!(cfg.upstream.api_key.is_none());
        assert!(cfg.upstream.has_client_credentials());
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn validation_errors_are_aggregated() {
        clear_env();
        std::env::set_var("GATEWAY_TEST_PORT", "not-a-port");
        let file = write_config(CONFIG);

        let err = config_loader::run(file.path().to_str().unwrap()).await.unwrap_err().to_string();

        assert!(err.contains("total errors: 3"), "{err}");
        assert!(err.contains("settings.server.port"));
        assert!(err.contains("upstream.api_url cannot be empty"));
        assert!(err.contains("either api_key or both client_id and client_secret"));
        clear_env();
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_path() {
        let err = config_loader::run("/nonexistent/catalog-gateway.yaml").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog-gateway.yaml"));
    }
}
