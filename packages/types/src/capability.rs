use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CapabilityIdError {
    #[error("capability id must look like name@version, got {0}")]
    Format(String),
    #[error("capability name must be lowercase alphanumeric with '-', ':' or '.': {0}")]
    Name(String),
    #[error("capability version: {0}")]
    Version(String),
}

/// A capability id of the form `name@semver`, e.g. `evm:chain-1337@1.0.0`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CapabilityId {
    pub name: String,
    pub version: semver::Version,
}

impl CapabilityId {
    pub fn new(name: impl Into<String>, version: semver::Version) -> Result<Self, CapabilityIdError> {
        let name = name.into();
        if name.is_empty()
            || !name.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == ':' || c == '.'
            })
        {
            return Err(CapabilityIdError::Name(name));
        }
        Ok(Self { name, version })
    }
}

impl FromStr for CapabilityId {
    type Err = CapabilityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = s
            .split_once('@')
            .ok_or_else(|| CapabilityIdError::Format(s.to_string()))?;
        let version = semver::Version::parse(version)
            .map_err(|e| CapabilityIdError::Version(e.to_string()))?;
        Self::new(name, version)
    }
}

impl std::fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl Serialize for CapabilityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CapabilityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Pushes events to registered workflows
    Trigger,
    /// Request/reply capability invoked by a workflow step
    Action,
    /// Writes a workflow's result somewhere, e.g. a chain
    Target,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CapabilityInfo {
    pub id: CapabilityId,
    pub kind: CapabilityKind,
    pub description: String,
}

impl CapabilityInfo {
    pub fn new(id: CapabilityId, kind: CapabilityKind, description: impl ToString) -> Self {
        Self {
            id,
            kind,
            description: description.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_capability_id() {
        let id: CapabilityId = "cron-trigger@1.0.0".parse().unwrap();
        assert_eq!(id.name, "cron-trigger");
        assert_eq!(id.version, semver::Version::new(1, 0, 0));
        assert_eq!(id.to_string(), "cron-trigger@1.0.0");

        let id: CapabilityId = "evm:chain-1337@1.2.3-beta".parse().unwrap();
        assert_eq!(id.name, "evm:chain-1337");

        assert!(matches!(
            "cron-trigger".parse::<CapabilityId>(),
            Err(CapabilityIdError::Format(_))
        ));
        assert!(matches!(
            "Cron@1.0.0".parse::<CapabilityId>(),
            Err(CapabilityIdError::Name(_))
        ));
        assert!(matches!(
            "cron@one".parse::<CapabilityId>(),
            Err(CapabilityIdError::Version(_))
        ));
    }

    #[test]
    fn capability_id_serde_is_a_string() {
        let id: CapabilityId = "http-trigger@1.0.0".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"http-trigger@1.0.0\"");
        let back: CapabilityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
