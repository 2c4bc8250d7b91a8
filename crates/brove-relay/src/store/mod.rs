//! Allowlist store: the durable set of identities allowed beyond the owner.
//!
//! Every operation is independently atomic against its backend. There is no
//! in-process cache in front of a backend; `contains` and `entries` always
//! read current state.

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;

use brove_core::error::Result;
use brove_core::PubKey;

use crate::config::{StorageBackend, StorageSection};

pub use memory::MemoryAllowlist;
pub use postgres::PgAllowlist;

/// One allowlist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistEntry {
    pub pubkey: PubKey,
    /// Free text, may be empty. Only surfaced in listings.
    pub reason: String,
    pub created_at: SystemTime,
}

/// Backing store contract.
///
/// - `add` is idempotent: re-adding a member succeeds and changes nothing.
/// - `remove` of a non-member fails with `BroveError::NotFound`.
/// - Mutations reject an empty pubkey with `BroveError::Validation` before
///   touching storage; `contains("")` is simply `false`.
/// - Backend failures surface as `BroveError::Connectivity`.
#[async_trait]
pub trait AllowlistStore: Send + Sync {
    async fn add(&self, pubkey: &PubKey, reason: &str) -> Result<()>;

    async fn remove(&self, pubkey: &PubKey) -> Result<()>;

    async fn contains(&self, pubkey: &PubKey) -> Result<bool>;

    /// All rows, ascending by insertion.
    async fn entries(&self) -> Result<Vec<AllowlistEntry>>;

    /// Pubkeys only, ascending by insertion.
    async fn list(&self) -> Result<Vec<PubKey>> {
        Ok(self.entries().await?.into_iter().map(|e| e.pubkey).collect())
    }

    async fn health_check(&self) -> Result<()>;
}

/// Build the configured backend.
pub async fn open(cfg: &StorageSection) -> Result<Arc<dyn AllowlistStore>> {
    match cfg.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory allowlist; entries are lost on restart");
            Ok(Arc::new(MemoryAllowlist::new()))
        }
        StorageBackend::Postgres => {
            let url = cfg.database_url.as_deref().unwrap_or_default();
            Ok(Arc::new(PgAllowlist::connect(url).await?))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use brove_core::BroveError;

    /// Store whose backend is always down.
    pub struct UnreachableStore;

    fn down<T>() -> Result<T> {
        Err(BroveError::Connectivity("connection refused (127.0.0.1:5432)".into()))
    }

    #[async_trait]
    impl AllowlistStore for UnreachableStore {
        async fn add(&self, _: &PubKey, _: &str) -> Result<()> {
            down()
        }
        async fn remove(&self, _: &PubKey) -> Result<()> {
            down()
        }
        async fn contains(&self, _: &PubKey) -> Result<bool> {
            down()
        }
        async fn entries(&self) -> Result<Vec<AllowlistEntry>> {
            down()
        }
        async fn health_check(&self) -> Result<()> {
            down()
        }
    }
}
