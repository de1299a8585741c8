use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::server::error::ApiError;
use crate::server::server::AppState;

/// Profile of the caller, resolved from a bearer token the catalog accepts.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Value);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Token is missing", "Authentication token is required"))?;

        if !state.auth.validate_token(&token).await {
            warn!("rejected request with invalid token");
            return Err(ApiError::unauthorized("Invalid token", "Invalid token"));
        }

        state
            .auth
            .get_user_info(Some(&token))
            .await
            .map(AuthenticatedUser)
            .map_err(|e| ApiError::unauthorized("Invalid token", e.to_string()))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .split_whitespace()
        .next()
        .map(str::to_owned)
}

/// JSON object body; `None` when the body is absent, not JSON, not an object or empty.
#[derive(Debug, Clone, Default)]
pub struct JsonBody(pub Option<Map<String, Value>>);

impl JsonBody {
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.as_ref()?.get(key)?.as_str()
    }

    pub fn into_value(self) -> Option<Value> {
        self.0.map(Value::Object)
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request("Invalid request body", &e.body_text()))?;

        let object = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|value| match value {
                Value::Object(map) if !map.is_empty() => Some(map),
                _ => None,
            });
        Ok(JsonBody(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn str_field_ignores_non_strings() {
        let body = JsonBody(serde_json::from_str(r#"{"username":"ana","password":1}"#).ok());
        assert_eq!(body.str_field("username"), Some("ana"));
        assert_eq!(body.str_field("password"), None);
        assert_eq!(JsonBody::default().str_field("username"), None);
    }
}
