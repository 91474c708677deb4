//! Static catalog of platform operations.
//!
//! Every API capability is one [`Operation`] value; the dispatcher stays
//! generic over all of them.

use std::collections::HashMap;

use http::Method;

use crate::auth::role::Role;
use crate::error::{ClientError, Result};

/// Where the operation path is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `{api_base_url}{path}`, used only to enumerate sites.
    Organization,
    /// `{api_base_url}{site_id}/{path}`
    Site,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: Method,
    /// relative path, `{param}` placeholders are filled from [`PathParams`]
    pub path: &'static str,
    pub role: Role,
    pub scope: Scope,
}

impl Operation {
    const fn site(name: &'static str, method: Method, path: &'static str, role: Role) -> Self {
        Self {
            name,
            method,
            path,
            role,
            scope: Scope::Site,
        }
    }

    /// Fills `{param}` placeholders, percent-encoding each value as one segment.
    pub fn render_path(&self, params: &PathParams) -> Result<String> {
        let mut rendered = Vec::new();
        for segment in self.path.split('/') {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(key) => {
                    let value = params
                        .get(key)
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| {
                            ClientError::Configuration(format!(
                                "operation '{}' requires path parameter '{}'",
                                self.name, key
                            ))
                        })?;
                    rendered.push(urlencoding::encode(value).into_owned());
                }
                None => rendered.push(segment.to_owned()),
            }
        }
        Ok(rendered.join("/"))
    }
}

/// Values for `{param}` placeholders of an operation path.
#[derive(Debug, Clone, Default)]
pub struct PathParams(HashMap<&'static str, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }
}

// https://documentation.atomic.io/api/auth
pub const LIST_SITES: Operation = Operation {
    name: "list_sites",
    method: Method::GET,
    path: "sites",
    role: Role::Auth,
    scope: Scope::Organization,
};

// Events and cards
pub const CREATE_EVENT: Operation = Operation::site("create_event", Method::POST, "event", Role::Events);
pub const CANCEL_EVENT: Operation = Operation::site("cancel_event", Method::POST, "event/cancel", Role::Events);
pub const LIST_CARDS: Operation = Operation::site("list_cards", Method::GET, "cards", Role::Events);
pub const DISMISS_CARDS: Operation = Operation::site("dismiss_cards", Method::PUT, "cards/dismiss", Role::Events);
pub const COMPLETE_CARD: Operation = Operation::site("complete_card", Method::PUT, "cards/complete", Role::Events);

// Users
pub const FETCH_USERS: Operation = Operation::site("fetch_users", Method::GET, "users", Role::Events);
pub const CREATE_USERS: Operation = Operation::site("create_users", Method::POST, "users", Role::Events);
pub const CREATE_CUSTOM_PROFILE_FIELDS: Operation =
    Operation::site("create_custom_profile_fields", Method::PUT, "custom-profile-fields", Role::Events);
pub const UPDATE_USER_PREFERENCES: Operation =
    Operation::site("update_user_preferences", Method::PUT, "userPreferences", Role::Events);
pub const DELETE_USERS: Operation = Operation::site("delete_users", Method::PUT, "deleteUsers", Role::Events);

// API credentials
pub const CREATE_CREDENTIALS: Operation =
    Operation::site("create_credentials", Method::POST, "credentials", Role::Workbench);
pub const DELETE_CREDENTIALS: Operation =
    Operation::site("delete_credentials", Method::DELETE, "credentials/{client_id}", Role::Workbench);

// Card configuration
pub const GET_CARD: Operation = Operation::site("get_card", Method::GET, "card/{card_id}", Role::Events);
pub const CREATE_CARD: Operation = Operation::site("create_card", Method::POST, "card", Role::Events);
pub const UPDATE_CARD: Operation = Operation::site("update_card", Method::PUT, "card/{card_id}", Role::Events);
pub const ARCHIVE_CARD: Operation =
    Operation::site("archive_card", Method::PUT, "card/{card_id}/archive", Role::Events);

// Webhooks
pub const SUBSCRIBE_WEBHOOK: Operation =
    Operation::site("subscribe_webhook", Method::POST, "webhook", Role::Workbench);
pub const LIST_WEBHOOKS: Operation = Operation::site("list_webhooks", Method::GET, "webhook", Role::Workbench);
pub const TEST_WEBHOOK: Operation = Operation::site("test_webhook", Method::POST, "webhook", Role::Workbench);
pub const REMOVE_WEBHOOK: Operation =
    Operation::site("remove_webhook", Method::DELETE, "webhook/{webhook_id}", Role::Workbench);
pub const GET_WEBHOOK_KEY: Operation =
    Operation::site("get_webhook_key", Method::GET, "public-key", Role::Workbench);

pub const ALL: [&Operation; 22] = [
    &LIST_SITES,
    &CREATE_EVENT,
    &CANCEL_EVENT,
    &LIST_CARDS,
    &DISMISS_CARDS,
    &COMPLETE_CARD,
    &FETCH_USERS,
    &CREATE_USERS,
    &CREATE_CUSTOM_PROFILE_FIELDS,
    &UPDATE_USER_PREFERENCES,
    &DELETE_USERS,
    &CREATE_CREDENTIALS,
    &DELETE_CREDENTIALS,
    &GET_CARD,
    &CREATE_CARD,
    &UPDATE_CARD,
    &ARCHIVE_CARD,
    &SUBSCRIBE_WEBHOOK,
    &LIST_WEBHOOKS,
    &TEST_WEBHOOK,
    &REMOVE_WEBHOOK,
    &GET_WEBHOOK_KEY,
];
