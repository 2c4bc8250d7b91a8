//! Shared application state for the brove relay core.
//!
//! Owns the config, the allowlist-backed identity authority, and the
//! compiled policy hooks. Startup errors are returned, not panicked.

use std::sync::Arc;

use brove_core::error::Result;
use brove_core::PubKey;

use crate::authority::IdentityAuthority;
use crate::config::RelayConfig;
use crate::policy::RelayPolicies;
use crate::store::{self, AllowlistStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: RelayConfig,
    authority: IdentityAuthority,
    policies: RelayPolicies,
}

impl AppState {
    /// Open the configured store and compile the policy hooks.
    pub async fn new(cfg: RelayConfig) -> Result<Self> {
        let store = store::open(&cfg.storage).await?;
        Ok(Self::with_store(cfg, store))
    }

    /// Build on an already-open store.
    pub fn with_store(cfg: RelayConfig, store: Arc<dyn AllowlistStore>) -> Self {
        let authority = IdentityAuthority::new(PubKey::new(cfg.owner_pubkey.as_str()), store);
        let policies = RelayPolicies::new(authority.clone(), &cfg.policy);
        Self {
            inner: Arc::new(AppStateInner { cfg, authority, policies }),
        }
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn authority(&self) -> &IdentityAuthority {
        &self.inner.authority
    }

    pub fn policies(&self) -> &RelayPolicies {
        &self.inner.policies
    }
}
