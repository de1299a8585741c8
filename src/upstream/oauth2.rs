//! OAuth grants against the catalog token endpoint.

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::cache::token::TokenGrant;
use crate::config::upstream::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{
    DEFAULT_TOKEN_EXPIRES_IN_SECS, GRANT_CLIENT_CREDENTIALS, GRANT_PASSWORD, GRANT_REFRESH_TOKEN,
};

#[derive(Debug, Deserialize)]
struct GrantResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Mints a service token with the configured client id and secret.
pub async fn client_credentials(client: &Client, cfg: &UpstreamConfig) -> GatewayResult<TokenGrant> {
    info!("Getting new access token");
    if !cfg.has_client_credentials() {
        return Err(GatewayError::Authentication(
            "client_id and client_secret are not configured".to_string(),
        ));
    }
    request_grant(client, cfg, GRANT_CLIENT_CREDENTIALS, vec![]).await
}

pub async fn refresh(client: &Client, cfg: &UpstreamConfig, refresh_token: &str) -> GatewayResult<TokenGrant> {
    info!("Refreshing access token");
    request_grant(
        client,
        cfg,
        GRANT_REFRESH_TOKEN,
        vec![("refresh_token", refresh_token.to_owned())],
    )
    .await
}

pub async fn password(
    client: &Client,
    cfg: &UpstreamConfig,
    username: &str,
    password: &str,
) -> GatewayResult<TokenGrant> {
    info!("Authenticating user: {}", username);
    request_grant(
        client,
        cfg,
        GRANT_PASSWORD,
        vec![
            ("username", username.to_owned()),
            ("password", password.to_owned()),
        ],
    )
    .await
}

async fn request_grant(
    client: &Client,
    cfg: &UpstreamConfig,
    grant_type: &'static str,
    mut form: Vec<(&'static str, String)>,
) -> GatewayResult<TokenGrant> {
    let metrics = get_metrics().await;

    form.insert(0, ("grant_type", grant_type.to_owned()));
    if let Some(client_id) = &cfg.client_id {
        form.push(("client_id", client_id.to_owned()));
    }
    if let Some(client_secret) = &cfg.client_secret {
        form.push(("client_secret", client_secret.to_owned()));
    }

    match send_grant(client, &cfg.token_url(), &form).await {
        Ok(grant) => {
            metrics.token_grants.with_label_values(&[grant_type, "success"]).inc();
            Ok(grant)
        }
        Err(e) => {
            metrics.token_grants.with_label_values(&[grant_type, "failure"]).inc();
            error!("{} grant failed: {}", grant_type, e);
            Err(GatewayError::Authentication(e.to_string()))
        }
    }
}

async fn send_grant(client: &Client, url: &str, form: &[(&str, String)]) -> GatewayResult<TokenGrant> {
    let response = client.post(url).form(form).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    let body: GrantResponse = response.json().await?;
    into_grant(body)
}

fn into_grant(body: GrantResponse) -> GatewayResult<TokenGrant> {
    let access_token = body
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GatewayError::Authentication("token response has no access_token".to_string()))?;
    Ok(TokenGrant {
        access_token,
        refresh_token: body.refresh_token,
        expires_in: body.expires_in.unwrap_or(DEFAULT_TOKEN_EXPIRES_IN_SECS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_in_defaults_to_one_hour() {
        let body: GrantResponse = serde_json::from_str(r#"{"access_token":"a1"}"#).unwrap();
        let grant = into_grant(body).unwrap();
        assert_eq!(grant.expires_in, 3600);
        assert_eq!(grant.refresh_token, None);
    }

    #[test]
    fn missing_access_token_is_rejected() {
        let body: GrantResponse = serde_json::from_str(r#"{"refresh_token":"r1","expires_in":60}"#).unwrap();
        assert!(matches!(into_grant(body), Err(GatewayError::Authentication(_))));
    }
}
