use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret string that is wiped from memory on drop
/// Holds either a BIP-39 mnemonic or a `0x`-prefixed hex private key
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(credential: impl Into<String>) -> Self {
        Self(credential.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this looks like a raw private key rather than a mnemonic
    pub fn is_private_key(&self) -> bool {
        self.0.starts_with("0x")
    }
}

impl AsRef<str> for Credential {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Credential {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl FromStr for Credential {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

// never print the secret itself
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod test {
    use super::Credential;

    #[test]
    fn debug_is_redacted() {
        let credential = Credential::new("0xdeadbeef");
        assert!(credential.is_private_key());
        assert!(!format!("{credential:?}").contains("deadbeef"));
    }
}
