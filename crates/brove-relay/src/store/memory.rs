//! In-memory allowlist (dev mode and tests).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use brove_core::error::{BroveError, Result};
use brove_core::PubKey;

use super::{AllowlistEntry, AllowlistStore};

#[derive(Debug, Clone)]
struct Row {
    reason: String,
    created_at: SystemTime,
    created_seq: u64,
}

/// `pubkey -> row`, ordered for listing by an insertion sequence so equal
/// wall-clock timestamps still list in insertion order.
#[derive(Debug)]
pub struct MemoryAllowlist {
    rows: DashMap<PubKey, Row>,
    seq: AtomicU64,
}

impl MemoryAllowlist {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for MemoryAllowlist {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AllowlistStore for MemoryAllowlist {
    async fn add(&self, pubkey: &PubKey, reason: &str) -> Result<()> {
        pubkey.validate()?;
        if let Entry::Vacant(v) = self.rows.entry(pubkey.clone()) {
            let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);
            v.insert(Row {
                reason: reason.to_string(),
                created_at: SystemTime::now(),
                created_seq,
            });
        }
        Ok(())
    }

    async fn remove(&self, pubkey: &PubKey) -> Result<()> {
        pubkey.validate()?;
        self.rows
            .remove(pubkey)
            .map(|_| ())
            .ok_or_else(|| BroveError::NotFound(pubkey.to_string()))
    }

    async fn contains(&self, pubkey: &PubKey) -> Result<bool> {
        if pubkey.is_empty() {
            return Ok(false);
        }
        Ok(self.rows.contains_key(pubkey))
    }

    async fn entries(&self) -> Result<Vec<AllowlistEntry>> {
        let mut rows: Vec<(u64, AllowlistEntry)> = self
            .rows
            .iter()
            .map(|r| {
                let row = r.value();
                (
                    row.created_seq,
                    AllowlistEntry {
                        pubkey: r.key().clone(),
                        reason: row.reason.clone(),
                        created_at: row.created_at,
                    },
                )
            })
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, e)| e).collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(s: &str) -> PubKey {
        PubKey::new(s)
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let store = MemoryAllowlist::new();
        store.add(&pk("alice"), "friend").await.unwrap();
        store.add(&pk("alice"), "again").await.unwrap();

        assert_eq!(store.len(), 1);
        let entries = store.entries().await.unwrap();
        // first insert wins; the second call is a no-op
        assert_eq!(entries[0].reason, "friend");
    }

    #[tokio::test]
    async fn remove_reports_missing_rows() {
        let store = MemoryAllowlist::new();
        let err = store.remove(&pk("dave")).await.unwrap_err();
        assert!(err.is_not_found());

        store.add(&pk("dave"), "").await.unwrap();
        store.remove(&pk("dave")).await.unwrap();
        assert!(!store.contains(&pk("dave")).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_in_insertion_order() {
        let store = MemoryAllowlist::new();
        for name in ["bob", "alice", "carol"] {
            store.add(&pk(name), "").await.unwrap();
        }
        assert_eq!(store.list().await.unwrap(), vec![pk("bob"), pk("alice"), pk("carol")]);
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let store = MemoryAllowlist::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_pubkey() {
        let store = MemoryAllowlist::new();
        assert!(!store.contains(&pk("")).await.unwrap());
        assert_eq!(store.add(&pk(""), "x").await.unwrap_err().code().as_str(), "VALIDATION");
        assert_eq!(store.remove(&pk("")).await.unwrap_err().code().as_str(), "VALIDATION");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn default_matches_new() {
        let store = MemoryAllowlist::default();
        store.add(&pk("a"), "").await.unwrap();
        store.add(&pk("b"), "").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![pk("a"), pk("b")]);
        assert_eq!(store.seq.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn readd_after_remove_moves_to_the_end() {
        let store = MemoryAllowlist::new();
        store.add(&pk("a"), "").await.unwrap();
        store.add(&pk("b"), "").await.unwrap();
        store.remove(&pk("a")).await.unwrap();
        store.add(&pk("a"), "").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![pk("b"), pk("a")]);
    }
}
