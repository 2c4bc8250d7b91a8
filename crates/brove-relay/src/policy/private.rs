//! Private-relay identity layers for the write and read paths.
//!
//! Both fail closed: when the allowlist cannot be consulted the request is
//! rejected with a generic message and the storage error is only logged.

use async_trait::async_trait;

use brove_core::protocol::{Event, Filter};
use brove_core::PubKey;

use crate::authority::IdentityAuthority;
use crate::context::ConnContext;

use super::engine::{PolicyDecision, ReadPolicy, WritePolicy, AUTH_REQUIRED_PREFIX};

pub const AUTHORIZATION_ERROR: &str = "error checking authorization";
pub const WRITE_DENIED: &str = "this is a private relay, only authorized users can write here";
pub const READ_DENIED: &str = "this is a private relay, only authorized users can read here";

pub fn auth_required_message() -> String {
    format!("{AUTH_REQUIRED_PREFIX}only authenticated users can read from this relay")
}

async fn decide(authority: &IdentityAuthority, pubkey: &PubKey, denied: &str) -> PolicyDecision {
    match authority.is_authorized(pubkey).await {
        Ok(true) => PolicyDecision::Pass,
        Ok(false) => PolicyDecision::reject(denied),
        Err(e) => {
            tracing::warn!(pubkey = %pubkey, error = %e, "error checking if pubkey is allowed");
            PolicyDecision::reject(AUTHORIZATION_ERROR)
        }
    }
}

/// Only the owner and allowlisted authors may publish.
pub struct AllowlistWrite {
    authority: IdentityAuthority,
}

impl AllowlistWrite {
    pub fn new(authority: IdentityAuthority) -> Self {
        Self { authority }
    }
}

#[async_trait]
impl WritePolicy for AllowlistWrite {
    fn name(&self) -> &'static str {
        "allowlist_write"
    }

    async fn check_event(&self, _ctx: &ConnContext, event: &Event) -> PolicyDecision {
        decide(&self.authority, &event.pubkey, WRITE_DENIED).await
    }
}

/// Only authenticated owner/allowlisted connections may subscribe.
pub struct AllowlistRead {
    authority: IdentityAuthority,
}

impl AllowlistRead {
    pub fn new(authority: IdentityAuthority) -> Self {
        Self { authority }
    }
}

#[async_trait]
impl ReadPolicy for AllowlistRead {
    fn name(&self) -> &'static str {
        "allowlist_read"
    }

    async fn check_filter(&self, ctx: &ConnContext, _filter: &Filter) -> PolicyDecision {
        let Some(pubkey) = ctx.authed() else {
            return PolicyDecision::Reject(auth_required_message());
        };
        tracing::debug!(conn = %ctx.conn_id, pubkey = %pubkey, "request from authenticated pubkey");
        decide(&self.authority, pubkey, READ_DENIED).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::testing::UnreachableStore;
    use crate::store::{AllowlistStore, MemoryAllowlist};

    async fn authority_with(members: &[&str]) -> IdentityAuthority {
        let store = Arc::new(MemoryAllowlist::new());
        for m in members {
            store.add(&PubKey::new(*m), "").await.unwrap();
        }
        IdentityAuthority::new(PubKey::new("owner1"), store)
    }

    #[tokio::test]
    async fn write_by_member_and_owner_passes() {
        let p = AllowlistWrite::new(authority_with(&["alice"]).await);
        let ctx = ConnContext::anonymous("c1");
        for author in ["alice", "owner1"] {
            let d = p.check_event(&ctx, &Event::new(author, 1, "hello")).await;
            assert_eq!(d, PolicyDecision::Pass, "author {author}");
        }
    }

    #[tokio::test]
    async fn write_by_stranger_is_denied() {
        let p = AllowlistWrite::new(authority_with(&["alice"]).await);
        let d = p
            .check_event(&ConnContext::anonymous("c1"), &Event::new("bob", 1, "hello"))
            .await;
        assert_eq!(d.into_pair(), (true, WRITE_DENIED.to_string()));
    }

    #[tokio::test]
    async fn storage_outage_rejects_without_detail() {
        let auth = IdentityAuthority::new(PubKey::new("owner1"), Arc::new(UnreachableStore));
        let w = AllowlistWrite::new(auth.clone());
        let r = AllowlistRead::new(auth);

        let d = w
            .check_event(&ConnContext::anonymous("c1"), &Event::new("alice", 1, ""))
            .await;
        assert_eq!(d.message(), AUTHORIZATION_ERROR);
        assert!(!d.message().contains("5432"));

        let d = r
            .check_filter(&ConnContext::authenticated("c1", "alice"), &Filter::default())
            .await;
        assert_eq!(d.message(), AUTHORIZATION_ERROR);

        // owner bypass does not need storage
        let d = w
            .check_event(&ConnContext::anonymous("c1"), &Event::new("owner1", 1, ""))
            .await;
        assert_eq!(d, PolicyDecision::Pass);
    }

    #[tokio::test]
    async fn unauthenticated_read_asks_for_auth() {
        let p = AllowlistRead::new(authority_with(&["alice"]).await);
        let filters = [
            Filter::default(),
            Filter::default().with_kinds(&[1]),
            Filter::default().with_tag("p", &["alice"]),
        ];
        for f in &filters {
            let d = p.check_filter(&ConnContext::anonymous("c1"), f).await;
            assert!(d.is_reject());
            assert!(d.requires_auth(), "got: {}", d.message());
        }
    }

    #[tokio::test]
    async fn empty_authenticated_identity_asks_for_auth() {
        let p = AllowlistRead::new(authority_with(&["alice"]).await);
        let d = p
            .check_filter(&ConnContext::authenticated("c1", ""), &Filter::default())
            .await;
        assert!(d.requires_auth(), "got: {}", d.message());
    }

    #[tokio::test]
    async fn authenticated_stranger_is_denied_read() {
        let p = AllowlistRead::new(authority_with(&["alice"]).await);
        let d = p
            .check_filter(&ConnContext::authenticated("c1", "bob"), &Filter::default())
            .await;
        assert_eq!(d, PolicyDecision::reject(READ_DENIED));
        assert!(!d.requires_auth());
    }
}
