use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::operation::{Operation, PathParams, Scope};
use crate::auth::token_provider::TokenProvider;
use crate::config::client::ClientConfig;
use crate::error::{ClientError, Result};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

/// Query string pairs, appended in order.
pub type Query = Vec<(String, String)>;

/// Builds role and site scoped requests, attaches a fresh bearer token and
/// decodes the JSON answer.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    config: Arc<ClientConfig>,
    client: Client,
    tokens: TokenProvider,
}

impl RequestDispatcher {
    pub fn new(config: Arc<ClientConfig>, client: Client, tokens: TokenProvider) -> Self {
        Self { config, client, tokens }
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Resource URL of an operation: `{api_base_url}{site_id}/{path}`, or
    /// `{api_base_url}{path}` for organization scoped operations.
    pub fn resource_url(&self, operation: &Operation, params: &PathParams) -> Result<String> {
        let path = operation.render_path(params)?;
        let url = match operation.scope {
            Scope::Organization => format!("{}{}", self.config.api_base_url(), path),
            Scope::Site => format!("{}{}/{}", self.config.api_base_url(), self.config.site_id(), path),
        };
        Ok(url)
    }

    pub async fn execute(
        &self,
        operation: &Operation,
        params: &PathParams,
        query: Option<&Query>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let metrics = get_metrics();
        let start = get_instant();
        metrics
            .api_requests
            .with_label_values(&[operation.name, operation.method.as_str()])
            .inc();

        let result = self.send(operation, params, query, body).await;
        metrics
            .api_request_duration
            .with_label_values(&[operation.name])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => info!(
                operation = operation.name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "platform request completed"
            ),
            Err(e) => {
                metrics
                    .api_request_failures
                    .with_label_values(&[operation.name, e.kind()])
                    .inc();
                warn!(operation = operation.name, error = %e, "platform request failed");
            }
        }
        result
    }

    async fn send(
        &self,
        operation: &Operation,
        params: &PathParams,
        query: Option<&Query>,
        body: Option<&Value>,
    ) -> Result<Value> {
        check_payload(operation, query, body)?;
        let url = self.resource_url(operation, params)?;

        let token = self.tokens.fetch_token(operation.role).await?;
        debug!(operation = operation.name, method = %operation.method, url = %url, role = %operation.role, "sending platform request");

        let mut request = self
            .client
            .request(operation.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, token.bearer())
            .timeout(self.config.request_timeout());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        decode_body(&text)
    }
}

/// DELETE carries neither query nor body, GET carries no body.
fn check_payload(operation: &Operation, query: Option<&Query>, body: Option<&Value>) -> Result<()> {
    let rejected = if operation.method == Method::DELETE && (query.is_some() || body.is_some()) {
        Some("query or body")
    } else if operation.method == Method::GET && body.is_some() {
        Some("body")
    } else {
        None
    };
    match rejected {
        Some(part) => Err(ClientError::Configuration(format!(
            "{} operation '{}' does not accept a {}",
            operation.method, operation.name, part
        ))),
        None => Ok(()),
    }
}

fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(ClientError::Decode("empty response body".to_owned()));
    }
    serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::operation::{DELETE_CREDENTIALS, LIST_CARDS, LIST_SITES};
    use serde_json::json;

    #[test]
    fn payload_rules_per_verb() {
        let query: Query = vec![("a".into(), "b".into())];
        let body = json!({"a": 1});

        assert!(check_payload(&LIST_CARDS, Some(&query), None).is_ok());
        assert!(check_payload(&LIST_CARDS, None, Some(&body)).is_err());
        assert!(check_payload(&DELETE_CREDENTIALS, Some(&query), None).is_err());
        assert!(check_payload(&DELETE_CREDENTIALS, None, Some(&body)).is_err());
        assert!(check_payload(&DELETE_CREDENTIALS, None, None).is_ok());
        assert!(check_payload(&LIST_SITES, None, None).is_ok());
    }

    #[test]
    fn empty_or_invalid_body_is_a_decode_error() {
        assert!(matches!(decode_body(""), Err(ClientError::Decode(_))));
        assert!(matches!(decode_body("  \n"), Err(ClientError::Decode(_))));
        assert!(matches!(decode_body("<html>"), Err(ClientError::Decode(_))));
        assert_eq!(decode_body(r#"{"ok":true}"#).unwrap(), json!({"ok": true}));
    }
}
