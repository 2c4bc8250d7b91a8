//! Identity value (Nostr public key).
//!
//! The core never interprets the key beyond equality; hex decoding and
//! signature checks belong to the host framework.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BroveError, Result};

/// Maximum stored length (`allowed_pubkeys.pubkey` is `VARCHAR(64)`).
pub const MAX_PUBKEY_LEN: usize = 64;

/// Opaque identity string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKey(String);

impl PubKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject identities that a mutating store operation must never persist.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(BroveError::Validation("pubkey cannot be empty".into()));
        }
        if self.0.len() > MAX_PUBKEY_LEN {
            return Err(BroveError::Validation(format!(
                "pubkey longer than {MAX_PUBKEY_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PubKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PubKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for PubKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
