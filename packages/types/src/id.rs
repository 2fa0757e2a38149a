use serde::{Deserialize, Deserializer, Serialize};
use std::{ops::Deref, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum IdError {
    #[error("ID must be between 1 and 128 characters")]
    LengthError,
    #[error("ID must be lowercase alphanumeric, '-' or '_'")]
    CharError,
}

macro_rules! new_id_type {
    ($type_name:ident) => {
        /// A string restricted to `[a-z0-9-_]{1,128}`
        #[derive(Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $type_name(String);

        impl $type_name {
            pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
                let id = id.into();

                if id.is_empty() || id.len() > 128 {
                    return Err(IdError::LengthError);
                }
                if !id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
                {
                    return Err(IdError::CharError);
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $type_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $type_name::new(s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $type_name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $type_name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::fmt::Display for $type_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $type_name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $type_name::new(s)
            }
        }

        impl TryFrom<&str> for $type_name {
            type Error = IdError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                $type_name::new(s)
            }
        }

        impl TryFrom<String> for $type_name {
            type Error = IdError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                $type_name::new(s)
            }
        }

        impl TryFrom<&$type_name> for $type_name {
            type Error = IdError;

            fn try_from(id: &Self) -> Result<Self, Self::Error> {
                Ok(id.clone())
            }
        }
    };
}

// Identifies one registration against a trigger capability
new_id_type!(TriggerId);
