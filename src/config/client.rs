use std::time::Duration;

use reqwest::Url;

use crate::auth::credentials::{CredentialPair, CredentialTable};
use crate::auth::role::Role;
use crate::config::settings::TokenCacheConfig;
use crate::error::{ClientError, Result};
use crate::utils::constants::{default_api_base_url, DEFAULT_OAUTH_URL, DEFAULT_REQUEST_TIMEOUT_MS};

/// Immutable client configuration.
///
/// Built once through [`ClientConfig::builder`]; rotate credentials by
/// building a new one.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    organization_id: String,
    site_id: String,
    oauth_base_url: String,
    api_base_url: String,
    credentials: CredentialTable,
    request_timeout: Duration,
    token_cache: TokenCacheConfig,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Authorization server root, without trailing slash.
    pub fn oauth_base_url(&self) -> &str {
        &self.oauth_base_url
    }

    /// API root, always ending in `/`.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn credentials(&self, role: Role) -> &CredentialPair {
        self.credentials.get(role)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn token_cache(&self) -> TokenCacheConfig {
        self.token_cache
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    organization_id: Option<String>,
    site_id: Option<String>,
    oauth_base_url: Option<String>,
    api_base_url: Option<String>,
    credentials: [Option<CredentialPair>; 3],
    request_timeout: Option<Duration>,
    token_cache: Option<TokenCacheConfig>,
}

impl ClientConfigBuilder {
    pub fn organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Overrides the Cognito authorization server.
    pub fn oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_base_url = Some(url.into());
        self
    }

    /// Overrides `https://{org}.customer-api.atomic.io/v1/`.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn credentials(mut self, role: Role, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.credentials[role.index()] = Some(CredentialPair::new(client_id, client_secret));
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn token_cache(mut self, token_cache: TokenCacheConfig) -> Self {
        self.token_cache = Some(token_cache);
        self
    }

    /// Validates everything at once and reports all problems together.
    pub fn build(self) -> Result<ClientConfig> {
        let mut errors: Vec<String> = Vec::new();

        let organization_id = required(self.organization_id, "organization_id", &mut errors);
        let site_id = required(self.site_id, "site_id", &mut errors);

        let oauth_base_url = self
            .oauth_base_url
            .unwrap_or_else(|| DEFAULT_OAUTH_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        validate_url("oauth_base_url", &oauth_base_url, &mut errors);

        let mut api_base_url = self
            .api_base_url
            .unwrap_or_else(|| default_api_base_url(&organization_id))
            .trim()
            .to_owned();
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }
        validate_url("api_base_url", &api_base_url, &mut errors);

        let [auth, events, workbench] = self.credentials;
        if auth.is_none() || events.is_none() || workbench.is_none() {
            for (role, pair) in Role::ALL.iter().zip([&auth, &events, &workbench]) {
                if pair.is_none() {
                    errors.push(format!("credentials.{} is missing", role));
                }
            }
        }
        let credentials = CredentialTable::new(
            auth.unwrap_or_else(|| CredentialPair::new("-", "-")),
            events.unwrap_or_else(|| CredentialPair::new("-", "-")),
            workbench.unwrap_or_else(|| CredentialPair::new("-", "-")),
        );
        if let Err(ClientError::Configuration(msg)) = credentials.validate() {
            errors.push(msg);
        }

        let request_timeout = self
            .request_timeout
            .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
        if request_timeout.is_zero() {
            errors.push("request_timeout must be greater than zero".to_owned());
        }

        if !errors.is_empty() {
            return Err(ClientError::Configuration(errors.join("; ")));
        }

        Ok(ClientConfig {
            organization_id,
            site_id,
            oauth_base_url,
            api_base_url,
            credentials,
            request_timeout,
            token_cache: self.token_cache.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &str, errors: &mut Vec<String>) -> String {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            errors.push(format!("{} must not be empty", field));
            String::new()
        }
    }
}

fn validate_url(field: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!("{} must use http or https, got '{}'", field, url.scheme())),
        Err(e) => errors.push(format!("{} '{}' is not a valid URL: {}", field, value, e)),
    }
}
