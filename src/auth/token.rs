use std::fmt;

use chrono::Utc;

/// Opaque bearer token returned by the authorization server.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// `Bearer {token}` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Token plus the moment it should be replaced.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token: AccessToken,
    pub exp_unix_ts: i64,
    /// expiration minus safety margin
    pub refresh_at_unix_ts: i64,
}

impl TokenContext {
    pub fn new(token: AccessToken, exp_unix_ts: i64, safety_margin_seconds: u64) -> Self {
        let margin = i64::try_from(safety_margin_seconds).unwrap_or(i64::MAX);
        let refresh_at_unix_ts = exp_unix_ts.saturating_sub(margin).max(0);
        Self {
            token,
            exp_unix_ts,
            refresh_at_unix_ts,
        }
    }

    /// Check if token should be refetched
    pub fn should_update(&self) -> bool {
        Utc::now().timestamp() >= self.refresh_at_unix_ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_and_hidden_debug() {
        let token = AccessToken::new("abc");
        assert_eq!(token.bearer(), "Bearer abc");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
    }

    #[test]
    fn safety_margin_moves_refresh_point() {
        let now = Utc::now().timestamp();
        let fresh = TokenContext::new(AccessToken::new("a"), now + 3600, 60);
        assert_eq!(fresh.refresh_at_unix_ts, now + 3540);
        assert!(!fresh.should_update());

        let stale = TokenContext::new(AccessToken::new("b"), now + 30, 60);
        assert!(stale.should_update());
    }

    #[test]
    fn extreme_expiry_and_margin_saturate() {
        let forever = TokenContext::new(AccessToken::new("a"), i64::MAX, 60);
        assert_eq!(forever.refresh_at_unix_ts, i64::MAX - 60);
        assert!(!forever.should_update());

        let huge_margin = TokenContext::new(AccessToken::new("b"), 1_000, u64::MAX);
        assert_eq!(huge_margin.refresh_at_unix_ts, 0);
        assert!(huge_margin.should_update());
    }
}
