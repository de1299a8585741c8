use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::token_cache::CredentialCache;
use crate::error::{GatewayError, GatewayResult};
use crate::upstream::{oauth2, CatalogClient};
use crate::utils::constants::{API_KEY_HEADER, APPLICATION_JSON};

/// Tokens and profile returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub user: Value,
}

/// Tokens returned by a user refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// Credentials for every call to the catalog API, plus the user-facing auth flows.
#[derive(Debug)]
pub struct AuthService {
    catalog: CatalogClient,
    credentials: CredentialCache,
}

impl AuthService {
    pub fn new(catalog: CatalogClient) -> Self {
        info!("Authentication service initialized");
        Self {
            catalog,
            credentials: CredentialCache::new(),
        }
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    /// JSON headers plus either the static API key or a bearer service token.
    ///
    /// In API-key mode the token cache is never consulted.
    pub async fn get_headers(&self) -> GatewayResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        match &self.catalog.config().api_key {
            Some(api_key) => {
                headers.insert(HeaderName::from_static(API_KEY_HEADER), header_value(API_KEY_HEADER, api_key)?);
            }
            None => {
                let token = self.get_access_token().await?;
                headers.insert(AUTHORIZATION, header_value("authorization", &format!("Bearer {token}"))?);
            }
        }
        Ok(headers)
    }

    /// Cached service token; refreshed or minted when stale.
    pub async fn get_access_token(&self) -> GatewayResult<String> {
        let client = self.catalog.http();
        let cfg = self.catalog.config();
        self.credentials
            .get_or_acquire(
                |refresh_token| async move { oauth2::refresh(client, cfg, &refresh_token).await },
                || oauth2::client_credentials(client, cfg),
            )
            .await
    }

    /// Password grant followed by a profile lookup with the new token.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> GatewayResult<LoginResponse> {
        let grant = oauth2::password(self.catalog.http(), self.catalog.config(), username, password).await?;
        let user = self
            .get_user_info(Some(&grant.access_token))
            .await
            .map_err(|e| GatewayError::Authentication(e.to_string()))?;

        Ok(LoginResponse {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_in: grant.expires_in,
            user,
        })
    }

    /// Refresh grant on behalf of a user; the service credentials are left alone.
    pub async fn refresh_user_token(&self, refresh_token: &str) -> GatewayResult<RefreshResponse> {
        let grant = oauth2::refresh(self.catalog.http(), self.catalog.config(), refresh_token).await?;
        Ok(RefreshResponse {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_in: grant.expires_in,
        })
    }

    /// Profile of the token owner; the service token is used when `token` is `None`.
    pub async fn get_user_info(&self, token: Option<&str>) -> GatewayResult<Value> {
        info!("Getting user information");
        let token = match token {
            Some(token) => token.to_owned(),
            None => self.get_access_token().await?,
        };

        let request = self
            .catalog
            .http()
            .get(self.catalog.config().current_user_url())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .bearer_auth(token);
        self.catalog.execute("get user information", request).await
    }

    /// `true` only when the catalog answers the current-user lookup with 200.
    pub async fn validate_token(&self, token: &str) -> bool {
        let response = self
            .catalog
            .http()
            .get(self.catalog.config().current_user_url())
            .bearer_auth(token)
            .send()
            .await;

        match response {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                warn!("token validation request failed: {}", e);
                false
            }
        }
    }
}

fn header_value(name: &str, value: &str) -> GatewayResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| GatewayError::Validation(format!("{name} header value contains invalid characters")))
}
