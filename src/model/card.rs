use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::dispatcher::Query;

/// Generated card instance as exposed by the Card API.
///
/// Cards can be queried by any combination of event name, lifecycle id,
/// card template id, user id and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub lifecycle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_template_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Card {
    /// Reference to the cards of one lifecycle, enough to complete them.
    pub fn new(lifecycle_id: impl Into<String>) -> Self {
        Self {
            lifecycle_id: lifecycle_id.into(),
            event_name: None,
            event_source: None,
            definition: None,
            payload: None,
            created: None,
            updated: None,
            card_template_id: None,
            user_id: None,
            status: None,
        }
    }

    /// Completes every card of the lifecycle: `lifecycleId` and `multiple=1`.
    pub fn completion_query(&self) -> Query {
        vec![
            ("lifecycleId".to_owned(), self.lifecycle_id.clone()),
            ("multiple".to_owned(), "1".to_owned()),
        ]
    }
}

/// Filter for listing or dismissing cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardQuery {
    event_name: Option<String>,
    lifecycle_id: Option<String>,
    card_template_id: Option<i64>,
    user_id: Option<String>,
    status: Option<String>,
}

impl CardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_name(mut self, value: impl Into<String>) -> Self {
        self.event_name = Some(value.into());
        self
    }

    pub fn lifecycle_id(mut self, value: impl Into<String>) -> Self {
        self.lifecycle_id = Some(value.into());
        self
    }

    pub fn card_template_id(mut self, value: i64) -> Self {
        self.card_template_id = Some(value);
        self
    }

    pub fn user_id(mut self, value: impl Into<String>) -> Self {
        self.user_id = Some(value.into());
        self
    }

    pub fn status(mut self, value: impl Into<String>) -> Self {
        self.status = Some(value.into());
        self
    }

    pub fn to_query(&self) -> Query {
        let mut query = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key.to_owned(), value));
            }
        };
        push("eventName", self.event_name.clone());
        push("lifecycleId", self.lifecycle_id.clone());
        push("cardTemplateId", self.card_template_id.map(|id| id.to_string()));
        push("userId", self.user_id.clone());
        push("status", self.status.clone());
        query
    }
}
