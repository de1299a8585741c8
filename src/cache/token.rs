/// Successful result of an OAuth grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// Credential lifecycle decision for the current instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Cached access token is still usable.
    Valid(String),
    /// Access token is missing or expired, a refresh token is available.
    NeedsRefresh(String),
    /// Nothing usable cached, a full credential grant is required.
    NeedsMint,
}

/// Server-to-server credentials held between calls.
#[derive(Debug, Clone, Default)]
pub struct CredentialState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// unix seconds
    pub expires_at: Option<i64>,
}

impl CredentialState {
    pub fn state(&self, now: i64) -> TokenState {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(expires_at)) if now < expires_at => TokenState::Valid(token.to_owned()),
            _ => match &self.refresh_token {
                Some(refresh_token) => TokenState::NeedsRefresh(refresh_token.to_owned()),
                None => TokenState::NeedsMint,
            },
        }
    }

    /// Replaces all three fields with the grant result and returns the new access token.
    ///
    /// Lifetimes beyond `i64` seconds saturate instead of wrapping.
    pub fn store(&mut self, grant: TokenGrant, now: i64) -> String {
        let expires_in = i64::try_from(grant.expires_in).unwrap_or(i64::MAX);
        self.expires_at = Some(now.saturating_add(expires_in));
        self.refresh_token = grant.refresh_token;
        self.access_token = Some(grant.access_token.clone());
        grant.access_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenGrant {
        TokenGrant {
            access_token: access.to_owned(),
            refresh_token: refresh.map(str::to_owned),
            expires_in,
        }
    }

    #[test]
    fn empty_state_needs_mint() {
        assert_eq!(CredentialState::default().state(1_000), TokenState::NeedsMint);
    }

    #[test]
    fn stored_token_is_valid_until_expiry() {
        let mut state = CredentialState::default();
        let token = state.store(grant("a1", Some("r1"), 60), 1_000);
        assert_eq!(token, "a1");
        assert_eq!(state.state(1_000), TokenState::Valid("a1".into()));
        assert_eq!(state.state(1_059), TokenState::Valid("a1".into()));
        assert_eq!(state.state(1_060), TokenState::NeedsRefresh("r1".into()));
    }

    #[test]
    fn expired_without_refresh_token_needs_mint() {
        let mut state = CredentialState::default();
        state.store(grant("a1", None, 0), 1_000);
        assert_eq!(state.state(1_000), TokenState::NeedsMint);
    }

    #[test]
    fn refresh_result_replaces_refresh_token() {
        let mut state = CredentialState::default();
        state.store(grant("a1", Some("r1"), 10), 1_000);
        state.store(grant("a2", None, 10), 1_020);
        assert_eq!(state.refresh_token, None);
        assert_eq!(state.expires_at, Some(1_030));
        assert_eq!(state.state(1_025), TokenState::Valid("a2".into()));
    }

    #[test]
    fn huge_lifetime_saturates_instead_of_wrapping() {
        let mut state = CredentialState::default();
        state.store(grant("a1", None, u64::MAX), 1_000);
        assert_eq!(state.expires_at, Some(i64::MAX));
        assert_eq!(state.state(1_000), TokenState::Valid("a1".into()));

        state.store(grant("a2", None, i64::MAX as u64), 1_000);
        assert_eq!(state.expires_at, Some(i64::MAX));
        assert_eq!(state.state(1_001), TokenState::Valid("a2".into()));
    }
}
