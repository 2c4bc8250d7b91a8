//! Identity authority: owner bypass + allowlist membership.
//!
//! The owner is compared first and never touches storage, so the operator
//! keeps access while the store is down. A store failure on any other
//! identity is returned as `Err` (authorization indeterminate); callers must
//! reject on it.

use std::sync::Arc;

use brove_core::error::{BroveError, Result};
use brove_core::PubKey;

use crate::store::{AllowlistEntry, AllowlistStore};

#[derive(Clone)]
pub struct IdentityAuthority {
    owner: PubKey,
    store: Arc<dyn AllowlistStore>,
}

impl IdentityAuthority {
    pub fn new(owner: PubKey, store: Arc<dyn AllowlistStore>) -> Self {
        Self { owner, store }
    }

    pub fn owner(&self) -> &PubKey {
        &self.owner
    }

    /// Strict owner equality. Gates management only.
    pub fn is_owner(&self, pubkey: &PubKey) -> bool {
        !pubkey.is_empty() && *pubkey == self.owner
    }

    /// Owner, or a current allowlist member.
    pub async fn is_authorized(&self, pubkey: &PubKey) -> Result<bool> {
        if self.is_owner(pubkey) {
            return Ok(true);
        }
        self.store.contains(pubkey).await
    }

    /// Adds to the allowlist. The owner is implicit and is never stored.
    pub async fn allow(&self, pubkey: &PubKey, reason: &str) -> Result<()> {
        if self.is_owner(pubkey) {
            tracing::debug!("allow for the owner pubkey ignored");
            return Ok(());
        }
        self.store.add(pubkey, reason).await?;
        tracing::info!(pubkey = %pubkey, "pubkey allowed");
        Ok(())
    }

    /// Removes from the allowlist. The owner is not a row and cannot be banned.
    pub async fn revoke(&self, pubkey: &PubKey) -> Result<()> {
        if self.is_owner(pubkey) {
            return Err(BroveError::Validation("the relay owner cannot be banned".into()));
        }
        self.store.remove(pubkey).await?;
        tracing::info!(pubkey = %pubkey, "pubkey removed from allowlist");
        Ok(())
    }

    pub async fn entries(&self) -> Result<Vec<AllowlistEntry>> {
        self.store.entries().await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}
