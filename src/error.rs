//! Errors produced while talking to the upstream catalog API.

use thiserror::Error;

/// Failure modes of the auth service and the domain clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A token grant (mint, login or user refresh) did not yield a token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Network, timeout or body decoding failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered 2xx with a body that is not JSON.
    #[error("invalid upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A local check failed before any call was made.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl GatewayError {
    /// Short label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::Authentication(_) => "authentication",
            GatewayError::UpstreamStatus { status, .. } if *status >= 500 => "upstream_5xx",
            GatewayError::UpstreamStatus { .. } => "upstream_4xx",
            GatewayError::Transport(e) if e.is_timeout() => "timeout",
            GatewayError::Transport(_) => "transport",
            GatewayError::Decode(_) => "decode",
            GatewayError::Validation(_) => "validation",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
