//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_TOKEN_EXPIRES_IN_SECS: u64 = 3600;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

pub const SERVICE_NAME: &str = "Atlan Integration API";

// Upstream request headers
pub const API_KEY_HEADER: &str = "x-atlan-api-key";
pub const APPLICATION_JSON: &str = "application/json";

// OAuth grant types
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
pub const GRANT_PASSWORD: &str = "password";
