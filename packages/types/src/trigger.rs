use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TriggerId;

/// One firing of a trigger, as seen by the consumer of the registration channel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TriggerEvent<T> {
    pub trigger_id: TriggerId,
    /// Unique per firing
    pub event_id: String,
    pub payload: T,
}

impl<T> TriggerEvent<T> {
    pub fn new(trigger_id: TriggerId, payload: T) -> Self {
        Self {
            trigger_id,
            event_id: uuid::Uuid::now_v7().to_string(),
            payload,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CronConfig {
    /// Cron expression with seconds, e.g. `*/30 * * * * *`
    pub schedule: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CronPayload {
    pub scheduled_execution_time: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Ecdsa,
}

/// A key that is allowed to submit requests to an http trigger
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthorizedKey {
    #[serde(rename = "type")]
    pub key_type: KeyType,
    /// Hex-encoded public key or address
    pub public_key: String,
}

impl AuthorizedKey {
    pub fn ecdsa(public_key: impl ToString) -> Self {
        Self {
            key_type: KeyType::Ecdsa,
            public_key: public_key.to_string(),
        }
    }

    /// Keys compare case-insensitively, with or without the `0x` prefix
    pub fn matches(&self, other: &AuthorizedKey) -> bool {
        fn normalize(s: &str) -> String {
            s.trim_start_matches("0x").to_ascii_lowercase()
        }
        self.key_type == other.key_type
            && normalize(&self.public_key) == normalize(&other.public_key)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct HttpTriggerConfig {
    /// An empty list accepts any caller
    #[serde(default)]
    pub authorized_keys: Vec<AuthorizedKey>,
}

impl HttpTriggerConfig {
    pub fn is_authorized(&self, key: Option<&AuthorizedKey>) -> bool {
        if self.authorized_keys.is_empty() {
            return true;
        }
        match key {
            Some(key) => self.authorized_keys.iter().any(|k| k.matches(key)),
            None => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HttpPayload {
    pub input: serde_json::Value,
    pub key: Option<AuthorizedKey>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn event_ids_are_unique() {
        let id = TriggerId::new("cron").unwrap();
        let a = TriggerEvent::new(id.clone(), ());
        let b = TriggerEvent::new(id, ());
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn http_authorization() {
        let open = HttpTriggerConfig::default();
        assert!(open.is_authorized(None));

        let config = HttpTriggerConfig {
            authorized_keys: vec![AuthorizedKey::ecdsa("0xABCDEF")],
        };
        assert!(config.is_authorized(Some(&AuthorizedKey::ecdsa("abcdef"))));
        assert!(!config.is_authorized(Some(&AuthorizedKey::ecdsa("0x1234"))));
        assert!(!config.is_authorized(None));
    }

    #[test]
    fn authorized_key_serde() {
        let key: AuthorizedKey =
            serde_json::from_str(r#"{"type":"ecdsa","public_key":"0x01"}"#).unwrap();
        assert_eq!(key, AuthorizedKey::ecdsa("0x01"));
    }
}
