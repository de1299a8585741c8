use serde::Deserialize;

use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub upstream: UpstreamConfig,
}

/// ================================
/// Upstream catalog API
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpstreamConfig {
    /// Base URL of the catalog API, e.g. `https://tenant.atlan.com/api/meta`.
    pub api_url: String,
    /// Static API key; when set, OAuth grants are never used for service calls.
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl UpstreamConfig {
    /// Scheme and host of the API url: everything before the first `/api` path segment.
    pub fn origin(&self) -> &str {
        let url = self.api_url.trim_end_matches('/');
        let path_start = url.find("://").map_or(0, |idx| idx + 3);
        match url[path_start..].find("/api") {
            Some(idx) => &url[..path_start + idx],
            None => url,
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.origin())
    }

    pub fn current_user_url(&self) -> String {
        format!("{}/api/v2/users/current", self.origin())
    }

    /// Absolute URL of a path under the API base url.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn has_client_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(api_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_url: api_url.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn origin_cuts_before_api_segment() {
        let cfg = upstream("https://tenant.atlan.com/api/meta");
        assert_eq!(cfg.origin(), "https://tenant.atlan.com");
        assert_eq!(cfg.token_url(), "https://tenant.atlan.com/oauth/token");
        assert_eq!(cfg.current_user_url(), "https://tenant.atlan.com/api/v2/users/current");
    }

    #[test]
    fn origin_without_api_segment_is_whole_url() {
        let cfg = upstream("http://127.0.0.1:4000/");
        assert_eq!(cfg.origin(), "http://127.0.0.1:4000");
        assert_eq!(cfg.endpoint("/lineage"), "http://127.0.0.1:4000/lineage");
    }

    #[test]
    fn api_host_is_not_an_api_segment() {
        let cfg = upstream("https://api.example.com/api/meta");
        assert_eq!(cfg.origin(), "https://api.example.com");
    }

    #[test]
    fn endpoint_appends_to_base() {
        let cfg = upstream("https://tenant.atlan.com/api/meta/");
        assert_eq!(cfg.endpoint("/assets/abc"), "https://tenant.atlan.com/api/meta/assets/abc");
    }
}
