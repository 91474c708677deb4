//! Configuration validation with aggregated errors.
//! - Collects every issue into Vec<String> instead of stopping at the first
//! - Client values (ids, credentials, URLs, timeout) go through the same
//!   checks as `ClientConfig::builder()`
//! - File-only blocks (logging, token cache, identity) are checked here

use tracing::{error, info};

use crate::config::service::{IdentityConfig, ServiceConfig};
use crate::config::settings::{LoggingConfig, TokenCacheConfig};
use crate::error::ClientError;
use crate::utils::constants::{DEFAULT_TOKEN_TTL_SECS, LOG_LEVELS};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if let Err(err) = cfg.client_config() {
        match err {
            ClientError::Configuration(msg) => errors.extend(msg.split("; ").map(str::to_owned)),
            other => errors.push(other.to_string()),
        }
    }

    if let Some(logging) = &cfg.settings.logging {
        validate_logging(logging, &mut errors);
    }
    if let Some(token_cache) = &cfg.settings.token_cache {
        validate_token_cache(token_cache, &mut errors);
    }
    if let Some(identity) = &cfg.identity {
        validate_identity(identity, &mut errors);
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    let level = logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}

fn validate_token_cache(token_cache: &TokenCacheConfig, errors: &mut Vec<String>) {
    if token_cache.enabled && token_cache.safety_margin_seconds >= DEFAULT_TOKEN_TTL_SECS {
        errors.push(format!(
            "settings.token_cache.safety_margin_seconds must be below {}",
            DEFAULT_TOKEN_TTL_SECS
        ));
    }
}

fn validate_identity(identity: &IdentityConfig, errors: &mut Vec<String>) {
    if identity.api_key.trim().is_empty() {
        errors.push("identity.api_key must not be empty".to_owned());
    }
    if identity.issuer.trim().is_empty() {
        errors.push("identity.issuer must not be empty".to_owned());
    }
    for (field, path) in [
        ("private_key_path", &identity.private_key_path),
        ("public_key_path", &identity.public_key_path),
    ] {
        if !path.is_file() {
            errors.push(format!("identity.{} '{}' is not a readable file", field, path.display()));
        }
    }
}
