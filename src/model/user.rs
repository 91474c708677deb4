use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// User record for the Users API.
///
/// Custom profile fields are flattened next to the standard ones, so they
/// must first be declared through `create_custom_profile_fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    #[serde(flatten)]
    pub custom_fields: BTreeMap<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile: None,
            preferences: None,
            custom_fields: BTreeMap::new(),
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.preferences = Some(UserPreferences {
            notifications_enabled: enabled,
        });
        self
    }

    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub notifications_enabled: bool,
}

/// Custom field declared on user profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
}

impl CustomField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: CustomFieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
        }
    }

    /// Text field labelled with its own name.
    pub fn text(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, CustomFieldType::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Date,
}

impl fmt::Display for CustomFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomFieldType::Text => f.write_str("text"),
            CustomFieldType::Date => f.write_str("date"),
        }
    }
}

impl FromStr for CustomFieldType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(CustomFieldType::Text),
            "date" => Ok(CustomFieldType::Date),
            other => Err(ClientError::Validation(format!(
                "custom field type is '{}', should be one of: text, date",
                other
            ))),
        }
    }
}
