use chrono::DateTime;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Data payload sent to the platform to create cards for the targeted users.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    name: String,
    lifecycle_id: String,
    payload: EventPayload,
}

impl Event {
    /// New event with a random UUIDv4 lifecycle id.
    pub fn new(name: impl Into<String>, payload: EventPayload) -> Result<Self> {
        Self::with_lifecycle_id(name, payload, Uuid::new_v4().to_string())
    }

    pub fn with_lifecycle_id(
        name: impl Into<String>,
        payload: EventPayload,
        lifecycle_id: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let lifecycle_id = lifecycle_id.into();
        if name.trim().is_empty() {
            return Err(ClientError::Validation("event name must not be empty".to_owned()));
        }
        if lifecycle_id.trim().is_empty() {
            return Err(ClientError::Validation("event lifecycleId must not be empty".to_owned()));
        }
        Ok(Self {
            name,
            lifecycle_id,
            payload,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle_id(&self) -> &str {
        &self.lifecycle_id
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// `{"events":[{"name","lifecycleId","payload":{...}}]}`
    pub fn to_request_body(&self) -> Value {
        json!({ "events": [self] })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    metadata: EventMetadata,
    detail: Map<String, Value>,
    target: EventTarget,
}

impl EventPayload {
    /// `target` lists the user ids that will see the resulting cards.
    pub fn new<I, S>(metadata: EventMetadata, detail: Map<String, Value>, target: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metadata,
            detail,
            target: EventTarget {
                users_by_id: target.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    pub fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }

    pub fn target(&self) -> &[String] {
        &self.target.users_by_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EventTarget {
    #[serde(rename = "usersById")]
    users_by_id: Vec<String>,
}

/// Delivery options of an event. Unset values and a false `overwrite` are
/// left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    embargo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_interval: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    overwrite: bool,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards stay hidden until this RFC 3339 date-time.
    pub fn embargo(mut self, embargo: impl Into<String>) -> Result<Self> {
        self.embargo = Some(validate_date_time("embargo", embargo.into())?);
        Ok(self)
    }

    /// Cards expire at this RFC 3339 date-time.
    pub fn expires(mut self, expires: impl Into<String>) -> Result<Self> {
        self.expires = Some(validate_date_time("expires", expires.into())?);
        Ok(self)
    }

    /// Cards expire after this ISO 8601 duration, e.g. `P3D` or `PT12H`.
    pub fn expires_interval(mut self, interval: impl Into<String>) -> Result<Self> {
        self.expires_interval = Some(validate_duration(interval.into())?);
        Ok(self)
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

fn validate_date_time(field: &str, value: String) -> Result<String> {
    DateTime::parse_from_rfc3339(&value)
        .map(|_| value.clone())
        .map_err(|e| ClientError::Validation(format!("invalid {} date-time '{}': {}", field, value, e)))
}

fn validate_duration(value: String) -> Result<String> {
    let re = Regex::new(r"^P(\d+Y)?(\d+M)?(\d+W)?(\d+D)?(T(\d+H)?(\d+M)?(\d+S)?)?$")
        .map_err(|e| ClientError::Validation(e.to_string()))?;
    let has_components = value.len() > 1 && !value.ends_with('T');
    if has_components && re.is_match(&value) {
        Ok(value)
    } else {
        Err(ClientError::Validation(format!("invalid expires_interval duration '{}'", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> Map<String, Value> {
        let mut detail = Map::new();
        detail.insert("orderId".into(), json!("A-1"));
        detail
    }

    #[test]
    fn serializes_to_wire_shape_with_users_by_id() {
        let metadata = EventMetadata::new().expires_interval("P3D").unwrap().overwrite(true);
        let payload = EventPayload::new(metadata, detail(), ["u1", "u2"]);
        let event = Event::with_lifecycle_id("order-shipped", payload, "lc-1").unwrap();

        assert_eq!(
            event.to_request_body(),
            json!({
                "events": [{
                    "name": "order-shipped",
                    "lifecycleId": "lc-1",
                    "payload": {
                        "metadata": { "expires_interval": "P3D", "overwrite": true },
                        "detail": { "orderId": "A-1" },
                        "target": { "usersById": ["u1", "u2"] }
                    }
                }]
            })
        );
    }

    #[test]
    fn empty_metadata_and_false_overwrite_are_omitted() {
        let payload = EventPayload::new(EventMetadata::new(), Map::new(), Vec::<String>::new());
        let event = Event::with_lifecycle_id("e", payload, "lc").unwrap();
        let body = event.to_request_body();
        assert_eq!(body["events"][0]["payload"]["metadata"], json!({}));
        assert_eq!(body["events"][0]["payload"]["target"], json!({"usersById": []}));
    }

    #[test]
    fn lifecycle_id_defaults_to_uuid_v4() {
        let payload = EventPayload::new(EventMetadata::new(), Map::new(), ["u1"]);
        let event = Event::new("e", payload).unwrap();
        let parsed = Uuid::parse_str(event.lifecycle_id()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn rejects_invalid_metadata_and_names() {
        assert!(EventMetadata::new().embargo("2024-01-01T10:00:00+00:00").is_ok());
        assert!(matches!(EventMetadata::new().embargo("tomorrow"), Err(ClientError::Validation(_))));
        assert!(EventMetadata::new().expires("2024-13-01T00:00:00Z").is_err());
        assert!(EventMetadata::new().expires_interval("PT12H").is_ok());
        assert!(EventMetadata::new().expires_interval("P1Y2M10DT2H30M").is_ok());
        assert!(EventMetadata::new().expires_interval("P").is_err());
        assert!(EventMetadata::new().expires_interval("P1DT").is_err());
        assert!(EventMetadata::new().expires_interval("3 days").is_err());

        let payload = EventPayload::new(EventMetadata::new(), Map::new(), ["u1"]);
        assert!(Event::new(" ", payload).is_err());
    }
}
