use crate::config::settings::LoggingConfig;
use crate::config::upstream::ServiceConfig;
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::default());
    }

    let upstream = &mut config.upstream;
    upstream.api_url = upstream.api_url.trim().to_owned();
    // env expansion leaves `${ATLAN_API_KEY:}` as an empty string
    upstream.api_key = non_blank(upstream.api_key.take());
    upstream.client_id = non_blank(upstream.client_id.take());
    upstream.client_secret = non_blank(upstream.client_secret.take());
    if upstream.timeout_ms.is_none() {
        upstream.timeout_ms = Some(DEFAULT_HTTP_TIMEOUT_MS);
    }

    config
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
