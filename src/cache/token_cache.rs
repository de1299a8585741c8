use std::future::Future;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::token::{CredentialState, TokenGrant, TokenState};
use crate::error::GatewayResult;
use crate::helpers::time::now_i64;
use crate::observability::metrics::get_metrics;

/// Single-flight holder of the service credentials.
///
/// The lock is held across the whole decide-and-fetch step, so callers that
/// observe a stale token while a grant is in flight wait for it and then
/// reuse its result instead of issuing their own grant.
#[derive(Debug, Default)]
pub struct CredentialCache {
    inner: Mutex<CredentialState>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a usable access token: cached, refreshed or freshly minted.
    ///
    /// A failed refresh is logged and falls back to `mint`; a failed mint is
    /// returned to the caller.
    pub async fn get_or_acquire<R, RF, M, MF>(&self, refresh: R, mint: M) -> GatewayResult<String>
    where
        R: FnOnce(String) -> RF,
        RF: Future<Output = GatewayResult<TokenGrant>>,
        M: FnOnce() -> MF,
        MF: Future<Output = GatewayResult<TokenGrant>>,
    {
        let mut state = self.inner.lock().await;

        match state.state(now_i64()) {
            TokenState::Valid(token) => {
                debug!("service token served from cache");
                get_metrics().await.token_cache_hits.inc();
                return Ok(token);
            }
            TokenState::NeedsRefresh(refresh_token) => match refresh(refresh_token).await {
                Ok(grant) => {
                    info!("Successfully refreshed access token");
                    return Ok(state.store(grant, now_i64()));
                }
                Err(e) => warn!("Failed to refresh token: {}", e),
            },
            TokenState::NeedsMint => {}
        }

        let grant = mint().await?;
        info!("Successfully obtained new access token");
        Ok(state.store(grant, now_i64()))
    }

    pub async fn snapshot(&self) -> CredentialState {
        self.inner.lock().await.clone()
    }
}
