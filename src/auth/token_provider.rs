use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::role::Role;
use crate::auth::token::{AccessToken, TokenContext};
use crate::auth::token_cache::TokenCache;
use crate::config::client::ClientConfig;
use crate::error::{ClientError, Result};
use crate::helpers::time::{get_instant, now_i64};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{DEFAULT_TOKEN_TTL_SECS, OAUTH_TOKEN_PATH};

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// Exchanges a role's client credentials for a bearer token.
///
/// Without a cache every call is a fresh round trip to the authorization
/// server. With `token_cache.enabled` a token is reused per role until it
/// enters the safety margin before its `expires_in`.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    config: Arc<ClientConfig>,
    client: Client,
    cache: Option<TokenCache>,
}

impl TokenProvider {
    pub fn new(config: Arc<ClientConfig>, client: Client) -> Self {
        let cache = config.token_cache().enabled.then(TokenCache::new);
        Self { config, client, cache }
    }

    /// Same as [`TokenProvider::fetch_token`] for a role given by name.
    pub async fn fetch_token_for(&self, role: &str) -> Result<AccessToken> {
        let role: Role = role.parse()?;
        self.fetch_token(role).await
    }

    pub async fn fetch_token(&self, role: Role) -> Result<AccessToken> {
        if let Some(cache) = &self.cache {
            if let Some(ctx) = cache.get(role).await {
                debug!(role = %role, "access token served from cache");
                get_metrics().token_cache_hits.with_label_values(&[role.as_str()]).inc();
                return Ok(ctx.token);
            }
        }

        let (token, expires_in) = self.exchange_with_metrics(role).await?;

        if let Some(cache) = &self.cache {
            let exp = now_i64().saturating_add(i64::try_from(expires_in).unwrap_or(i64::MAX));
            let margin = self.config.token_cache().safety_margin_seconds;
            cache.set(role, TokenContext::new(token.clone(), exp, margin)).await;
        }
        Ok(token)
    }

    pub async fn invalidate(&self, role: Role) {
        if let Some(cache) = &self.cache {
            cache.invalidate(role).await;
        }
    }

    pub async fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    async fn exchange_with_metrics(&self, role: Role) -> Result<(AccessToken, u64)> {
        let metrics = get_metrics();
        let start = get_instant();
        metrics.token_exchanges.with_label_values(&[role.as_str()]).inc();

        let result = self.exchange(role).await;
        metrics
            .token_exchange_duration
            .with_label_values(&[role.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => info!(role = %role, elapsed_ms = start.elapsed().as_millis() as u64, "access token fetched"),
            Err(e) => {
                metrics.token_exchange_failures.with_label_values(&[role.as_str(), e.kind()]).inc();
                warn!(role = %role, error = %e, "access token exchange failed");
            }
        }
        result
    }

    async fn exchange(&self, role: Role) -> Result<(AccessToken, u64)> {
        let pair = self.config.credentials(role);
        let url = format!("{}{}", self.config.oauth_base_url(), OAUTH_TOKEN_PATH);
        debug!(role = %role, client_id = pair.client_id(), url = %url, "exchanging client credentials");

        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", GRANT_TYPE), ("client_id", pair.client_id())])
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(AUTHORIZATION, pair.basic_authorization())
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::from_transport)?;
        if !status.is_success() {
            return Err(ClientError::AuthExchange {
                role,
                reason: format!("token endpoint responded with {}: {}", status.as_u16(), body),
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| ClientError::AuthExchange {
            role,
            reason: format!("malformed token response: {}", e),
        })?;

        match parsed.access_token {
            Some(token) if !token.is_empty() => Ok((
                AccessToken::new(token),
                parsed.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            )),
            _ => Err(ClientError::AuthExchange {
                role,
                reason: "token response has no access_token".to_owned(),
            }),
        }
    }
}
