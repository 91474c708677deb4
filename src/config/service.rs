use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::role::Role;
use crate::config::client::ClientConfig;
use crate::config::settings::SettingsConfig;
use crate::error::Result;

/// ================================
/// Full file configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub organization_id: String,
    pub site_id: String,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    pub identity: Option<IdentityConfig>,
}

/// Overrides for the platform hosts, mostly useful against staging or mocks.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EndpointsConfig {
    pub oauth_url: Option<String>,
    pub api_base_url: Option<String>,
}

/// ================================
/// Credentials, one pair per role
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub auth: CredentialConfig,
    pub events: CredentialConfig,
    pub workbench: CredentialConfig,
}

impl CredentialsConfig {
    pub fn get(&self, role: Role) -> &CredentialConfig {
        match role {
            Role::Auth => &self.auth,
            Role::Events => &self.events,
            Role::Workbench => &self.workbench,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// ================================
/// Identity token (client SDK JWT)
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub issuer: String,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

impl ServiceConfig {
    /// Builds the immutable client configuration out of the file values.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder()
            .organization_id(&self.organization_id)
            .site_id(&self.site_id)
            .request_timeout(Duration::from_millis(self.settings.request_timeout_ms()));

        for role in Role::ALL {
            let pair = self.credentials.get(role);
            builder = builder.credentials(role, &pair.client_id, &pair.client_secret);
        }
        if let Some(url) = &self.endpoints.oauth_url {
            builder = builder.oauth_base_url(url);
        }
        if let Some(url) = &self.endpoints.api_base_url {
            builder = builder.api_base_url(url);
        }
        if let Some(token_cache) = self.settings.token_cache {
            builder = builder.token_cache(token_cache);
        }

        builder.build()
    }
}
