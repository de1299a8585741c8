use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::service::{LoginResponse, RefreshResponse};
use crate::server::error::ApiError;
use crate::server::extract::{AuthenticatedUser, JsonBody};
use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/auth/me", get(current_user))
        .route("/api/auth/validate", post(validate_token))
        .route("/api/auth/logout", post(logout))
}

/// `POST /api/auth/login`: password grant plus user profile.
async fn login(State(state): State<AppState>, body: JsonBody) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(username), Some(password)) = (body.str_field("username"), body.str_field("password")) else {
        return Err(ApiError::bad_request("Missing credentials", "Username and password are required"));
    };

    state
        .auth
        .authenticate_user(username, password)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Login failed: {}", e);
            ApiError::new(StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED", "Authentication failed", e.to_string())
        })
}

/// `POST /api/auth/refresh`: exchange a user refresh token for new tokens.
async fn refresh_token(State(state): State<AppState>, body: JsonBody) -> Result<Json<RefreshResponse>, ApiError> {
    let Some(refresh_token) = body.str_field("refresh_token") else {
        return Err(ApiError::bad_request("Missing refresh token", "Refresh token is required"));
    };

    state
        .auth
        .refresh_user_token(refresh_token)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Token refresh failed: {}", e);
            ApiError::new(StatusCode::UNAUTHORIZED, "REFRESH_FAILED", "Token refresh failed", e.to_string())
        })
}

async fn current_user(AuthenticatedUser(user): AuthenticatedUser) -> Json<Value> {
    Json(user)
}

/// `POST /api/auth/validate`: `{"valid": bool}` for the given token.
async fn validate_token(State(state): State<AppState>, body: JsonBody) -> Result<Json<Value>, ApiError> {
    let Some(token) = body.str_field("token") else {
        return Err(ApiError::bad_request("Missing token", "Token is required"));
    };

    let valid = state.auth.validate_token(token).await;
    Ok(Json(json!({ "valid": valid })))
}

// Tokens are issued by the catalog; there is nothing to revoke locally.
async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> Json<Value> {
    let username = user.get("username").and_then(|name| name.as_str()).unwrap_or("unknown");
    info!("logout for user {}", username);
    Json(json!({ "message": "Logout successful" }))
}
