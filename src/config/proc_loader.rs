use std::path::Path;

use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::service::ServiceConfig;
use crate::config::settings::LoggingConfig;
use crate::error::{ClientError, Result};
use crate::observability::metrics::get_metrics;

/// Load, expand `${VAR}` references and validate a YAML config file.
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ClientError::Configuration(format!("cannot read config '{}': {}", path.display(), e))
    })?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let metrics = get_metrics();
    let mut service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
            metrics.config_errors.inc();
        })
        .map_err(|e| ClientError::Configuration(format!("invalid config format: {}", e)))?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validating config ...");
    proc_validator::validate_service_config(&service_config).map_err(|errors| {
        metrics.config_errors.inc_by(errors.len() as u64);
        ClientError::Configuration(errors.join("; "))
    })?;

    Ok(service_config)
}

/// `${VAR}` is replaced by the variable or an empty string,
/// `${VAR:default}` falls back to `default`.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const CONFIG: &str = r#"
organization_id: acme
site_id: site-1
credentials:
  auth: { client_id: auth-id, client_secret: "${ATOMIC_TEST_AUTH_SECRET}" }
  events: { client_id: events-id, client_secret: "${ATOMIC_TEST_EVENTS_SECRET:fallback}" }
  workbench: { client_id: wb-id, client_secret: wb-secret }
settings:
  request_timeout_ms: 2500
  token_cache:
    enabled: true
"#;

    #[test]
    #[serial]
    fn expands_env_and_defaults() {
        std::env::set_var("ATOMIC_TEST_AUTH_SECRET", "from-env");
        std::env::remove_var("ATOMIC_TEST_EVENTS_SECRET");

        let cfg = parse_config(&expand_env_vars(CONFIG)).unwrap();
        assert_eq!(cfg.credentials.auth.client_secret, "from-env");
        assert_eq!(cfg.credentials.events.client_secret, "fallback");
        assert_eq!(cfg.settings.request_timeout_ms(), 2500);
        assert_eq!(cfg.settings.logging.as_ref().unwrap().level, "info");

        let token_cache = cfg.settings.token_cache.unwrap();
        assert!(token_cache.enabled);
        assert_eq!(token_cache.safety_margin_seconds, 60);

        std::env::remove_var("ATOMIC_TEST_AUTH_SECRET");
    }

    #[tokio::test]
    #[serial]
    async fn loads_from_file() {
        std::env::set_var("ATOMIC_TEST_AUTH_SECRET", "file-secret");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let cfg = file_to_config(file.path()).await.unwrap();
        let client_config = cfg.client_config().unwrap();
        assert_eq!(client_config.api_base_url(), "https://acme.customer-api.atomic.io/v1/");
        assert_eq!(client_config.credentials(crate::Role::Auth).client_secret(), "file-secret");

        std::env::remove_var("ATOMIC_TEST_AUTH_SECRET");
    }

    #[test]
    #[serial]
    fn unset_variable_without_default_fails_validation() {
        std::env::remove_var("ATOMIC_TEST_AUTH_SECRET");
        let err = parse_config(&expand_env_vars(CONFIG)).unwrap_err();
        assert!(err.to_string().contains("credentials.auth.client_secret"));
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let err = file_to_config(Path::new("/definitely/not/here.yaml")).await.unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn malformed_yaml_is_a_configuration_error() {
        let err = parse_config("organization_id: [").unwrap_err();
        assert!(err.to_string().contains("invalid config format"));
    }
}
