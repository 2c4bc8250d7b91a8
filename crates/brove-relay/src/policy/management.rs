//! Management API: owner-only gate plus the allowlist operations behind it.
//!
//! "Ban" is allowlist removal. There is no separate deny-list, so
//! `listbannedpubkeys` is always empty; an identity is either present
//! (allowed) or absent (not allowed).

use async_trait::async_trait;
use serde_json::{json, Value};

use brove_core::error::{BroveError, Result};
use brove_core::protocol::nip86::SUPPORTED_METHODS;
use brove_core::protocol::{MethodParams, PubKeyReason};
use brove_core::PubKey;

use crate::authority::IdentityAuthority;
use crate::context::ConnContext;

use super::engine::{ManagementPolicy, PolicyDecision};

/// Uniform denial for every method when the caller is not the owner.
pub const MANAGEMENT_DENIED: &str = "go away, intruder";

/// Admits the owner only, regardless of method.
pub struct OwnerOnly {
    authority: IdentityAuthority,
}

impl OwnerOnly {
    pub fn new(authority: IdentityAuthority) -> Self {
        Self { authority }
    }
}

#[async_trait]
impl ManagementPolicy for OwnerOnly {
    fn name(&self) -> &'static str {
        "owner_only"
    }

    async fn check_call(&self, ctx: &ConnContext, _call: &MethodParams) -> PolicyDecision {
        match ctx.authed() {
            Some(pk) if self.authority.is_owner(pk) => PolicyDecision::Pass,
            _ => PolicyDecision::reject(MANAGEMENT_DENIED),
        }
    }
}

/// Allowlist operations. Callers must have passed the management gate;
/// errors are returned verbatim since the only caller is the operator.
#[derive(Clone)]
pub struct ManagementApi {
    authority: IdentityAuthority,
}

impl ManagementApi {
    pub fn new(authority: IdentityAuthority) -> Self {
        Self { authority }
    }

    pub async fn allow_pubkey(&self, pubkey: &PubKey, reason: &str) -> Result<()> {
        self.authority.allow(pubkey, reason).await
    }

    pub async fn ban_pubkey(&self, pubkey: &PubKey, reason: &str) -> Result<()> {
        // the reason is not persisted: there is no ban row to attach it to
        tracing::debug!(pubkey = %pubkey, reason, "ban requested");
        self.authority.revoke(pubkey).await
    }

    pub async fn list_allowed_pubkeys(&self) -> Result<Vec<PubKeyReason>> {
        let entries = self.authority.entries().await?;
        Ok(entries
            .into_iter()
            .map(|e| PubKeyReason { pubkey: e.pubkey, reason: e.reason })
            .collect())
    }

    pub async fn list_banned_pubkeys(&self) -> Result<Vec<PubKeyReason>> {
        Ok(Vec::new())
    }

    /// Run one already-admitted call and produce its `result` value.
    pub async fn dispatch(&self, call: &MethodParams) -> Result<Value> {
        match call {
            MethodParams::SupportedMethods => Ok(json!(SUPPORTED_METHODS)),
            MethodParams::AllowPubKey { pubkey, reason } => {
                self.allow_pubkey(pubkey, reason).await?;
                Ok(Value::Bool(true))
            }
            MethodParams::BanPubKey { pubkey, reason } => {
                self.ban_pubkey(pubkey, reason).await?;
                Ok(Value::Bool(true))
            }
            MethodParams::ListAllowedPubKeys => to_value(self.list_allowed_pubkeys().await?),
            MethodParams::ListBannedPubKeys => to_value(self.list_banned_pubkeys().await?),
        }
    }
}

fn to_value(rows: Vec<PubKeyReason>) -> Result<Value> {
    serde_json::to_value(rows).map_err(|e| BroveError::Internal(format!("encode listing: {e}")))
}
