use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::api::dispatcher::{Query, RequestDispatcher};
use crate::api::operation::{self, Operation, PathParams};
use crate::auth::role::Role;
use crate::auth::token::AccessToken;
use crate::auth::token_provider::TokenProvider;
use crate::config::client::ClientConfig;
use crate::error::{ClientError, Result};
use crate::identity::{IdentityTokenIssuer, SignedToken, SigningKeyPair};
use crate::model::{Card, CardQuery, CustomField, Event, User};

/// Client for one site of an Atomic organization.
///
/// Cheap to clone; clones share the configuration, the connection pool and
/// the token cache when one is enabled.
#[derive(Debug, Clone)]
pub struct AtomicClient {
    config: Arc<ClientConfig>,
    dispatcher: RequestDispatcher,
}

impl AtomicClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Use a preconfigured reqwest client (proxy, TLS roots, pool sizes).
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        let config = Arc::new(config);
        let tokens = TokenProvider::new(config.clone(), http.clone());
        let dispatcher = RequestDispatcher::new(config.clone(), http, tokens);
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub async fn access_token(&self, role: Role) -> Result<AccessToken> {
        self.dispatcher.tokens().fetch_token(role).await
    }

    // https://documentation.atomic.io/api/auth?id=full-authentication-example
    pub async fn list_sites(&self) -> Result<Value> {
        self.call(&operation::LIST_SITES, PathParams::new(), None, None).await
    }

    // https://documentation.atomic.io/api/card-creation?id=atomic-events
    pub async fn create_event(&self, event: &Event) -> Result<Value> {
        let body = event.to_request_body();
        self.call(&operation::CREATE_EVENT, PathParams::new(), None, Some(&body)).await
    }

    // https://documentation.atomic.io/api/card-creation?id=card-cancellation
    pub async fn cancel_event(&self, event: &Event) -> Result<Value> {
        let body = event.to_request_body();
        self.call(&operation::CANCEL_EVENT, PathParams::new(), None, Some(&body)).await
    }

    // https://documentation.atomic.io/api/card-api?id=retrieving-cards
    pub async fn list_cards(&self, query: &CardQuery) -> Result<Value> {
        self.call(&operation::LIST_CARDS, PathParams::new(), Some(query.to_query()), None).await
    }

    pub async fn dismiss_cards(&self, query: &CardQuery) -> Result<Value> {
        self.call(&operation::DISMISS_CARDS, PathParams::new(), Some(query.to_query()), None).await
    }

    /// Completes every card of the card's lifecycle.
    pub async fn complete_card(&self, card: &Card) -> Result<Value> {
        self.call(&operation::COMPLETE_CARD, PathParams::new(), Some(card.completion_query()), None).await
    }

    pub async fn fetch_users(&self, query: Option<Query>) -> Result<Value> {
        self.call(&operation::FETCH_USERS, PathParams::new(), query, None).await
    }

    pub async fn create_users(&self, users: &[User]) -> Result<Value> {
        let body = to_body(users)?;
        self.call(&operation::CREATE_USERS, PathParams::new(), None, Some(&body)).await
    }

    pub async fn create_custom_profile_fields(&self, fields: &[CustomField]) -> Result<Value> {
        let body = to_body(fields)?;
        self.call(&operation::CREATE_CUSTOM_PROFILE_FIELDS, PathParams::new(), None, Some(&body)).await
    }

    // https://documentation.atomic.io/api/user-preferences
    /// Payload travels as the JSON request body, not as query parameters.
    pub async fn update_user_preferences(&self, payload: &Value) -> Result<Value> {
        self.call(&operation::UPDATE_USER_PREFERENCES, PathParams::new(), None, Some(payload)).await
    }

    // https://documentation.atomic.io/api/removing-users
    /// Payload travels as the JSON request body, not as query parameters.
    pub async fn delete_users(&self, payload: &Value) -> Result<Value> {
        self.call(&operation::DELETE_USERS, PathParams::new(), None, Some(payload)).await
    }

    // https://documentation.atomic.io/api/api-credentials
    pub async fn create_credentials(&self, payload: &Value) -> Result<Value> {
        self.call(&operation::CREATE_CREDENTIALS, PathParams::new(), None, Some(payload)).await
    }

    pub async fn delete_credentials(&self, client_id: &str) -> Result<Value> {
        let params = PathParams::new().with("client_id", client_id);
        self.call(&operation::DELETE_CREDENTIALS, params, None, None).await
    }

    // https://documentation.atomic.io/api/card-configuration
    pub async fn get_card(&self, card_id: &str) -> Result<Value> {
        let params = PathParams::new().with("card_id", card_id);
        self.call(&operation::GET_CARD, params, None, None).await
    }

    pub async fn create_card(&self, payload: &Value) -> Result<Value> {
        self.call(&operation::CREATE_CARD, PathParams::new(), None, Some(payload)).await
    }

    pub async fn update_card(&self, card_id: &str, payload: &Value) -> Result<Value> {
        let params = PathParams::new().with("card_id", card_id);
        self.call(&operation::UPDATE_CARD, params, None, Some(payload)).await
    }

    pub async fn archive_card(&self, card_id: &str) -> Result<Value> {
        let params = PathParams::new().with("card_id", card_id);
        self.call(&operation::ARCHIVE_CARD, params, None, None).await
    }

    // https://documentation.atomic.io/api/webhooks
    pub async fn subscribe_webhook(&self, payload: &Value) -> Result<Value> {
        self.call(&operation::SUBSCRIBE_WEBHOOK, PathParams::new(), None, Some(payload)).await
    }

    pub async fn list_webhooks(&self) -> Result<Value> {
        self.call(&operation::LIST_WEBHOOKS, PathParams::new(), None, None).await
    }

    /// Sends a sample delivery of the given webhook type.
    pub async fn test_webhook(&self, webhook_type: &str) -> Result<Value> {
        let query = vec![("type".to_owned(), webhook_type.to_owned())];
        self.call(&operation::TEST_WEBHOOK, PathParams::new(), Some(query), None).await
    }

    pub async fn remove_webhook(&self, webhook_id: &str) -> Result<Value> {
        let params = PathParams::new().with("webhook_id", webhook_id);
        self.call(&operation::REMOVE_WEBHOOK, params, None, None).await
    }

    /// Public key used to verify webhook payload signatures.
    pub async fn get_webhook_key(&self) -> Result<Value> {
        self.call(&operation::GET_WEBHOOK_KEY, PathParams::new(), None, None).await
    }

    /// JWT for the client SDK of `subject`. Does not touch the network.
    pub fn identity_token(
        &self,
        subject: &str,
        api_key: &str,
        issuer: &str,
        keys: &SigningKeyPair,
    ) -> Result<SignedToken> {
        IdentityTokenIssuer::new().issue(subject, api_key, issuer, keys)
    }

    async fn call(
        &self,
        operation: &Operation,
        params: PathParams,
        query: Option<Query>,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.dispatcher
            .execute(operation, &params, query.as_ref(), body)
            .await
    }
}

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Validation(format!("cannot encode request body: {}", e)))
}
