//! Nostr event (NIP-01 shape).

use serde::{Deserialize, Serialize};

use crate::identity::PubKey;

/// Kind 0: user metadata, content is a JSON object.
pub const KIND_METADATA: u16 = 0;
/// Kind 3: follow list, content is empty or JSON.
pub const KIND_CONTACTS: u16 = 3;

/// Event as delivered to the write hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub pubkey: PubKey,
    #[serde(default)]
    pub created_at: u64,
    pub kind: u16,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sig: String,
}

impl Event {
    /// Minimal event for a given author (used by hosts and tests).
    pub fn new(pubkey: impl Into<PubKey>, kind: u16, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            pubkey: pubkey.into(),
            created_at: 0,
            kind,
            tags: Vec::new(),
            content: content.into(),
            sig: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: &[&str]) -> Self {
        self.tags.push(tag.iter().map(|s| s.to_string()).collect());
        self
    }
}
