//! The three hooks a host relay wires into its request pipeline.

use std::sync::Arc;

use brove_core::protocol::{Event, Filter, MethodParams, Response};

use crate::authority::IdentityAuthority;
use crate::config::PolicySection;
use crate::context::ConnContext;

use super::builtin::{NoComplexFilters, PreventLargeTags, ValidateKind};
use super::engine::{ManagementPolicy, PolicyChain, PolicyDecision, ReadPolicy, WritePolicy};
use super::management::{ManagementApi, OwnerOnly};
use super::private::{AllowlistRead, AllowlistWrite};

/// Built once at startup, then shared via Arc.
pub struct RelayPolicies {
    write: PolicyChain<dyn WritePolicy>,
    read: PolicyChain<dyn ReadPolicy>,
    management: PolicyChain<dyn ManagementPolicy>,
    api: ManagementApi,
}

impl RelayPolicies {
    /// Standard private-relay stack: configured validators, then identity.
    pub fn new(authority: IdentityAuthority, cfg: &PolicySection) -> Self {
        let mut write = PolicyChain::<dyn WritePolicy>::new();
        if cfg.validate_kind {
            write.push(Arc::new(ValidateKind));
        }
        if cfg.max_tag_value_len > 0 {
            write.push(Arc::new(PreventLargeTags::new(cfg.max_tag_value_len)));
        }
        write.push(Arc::new(AllowlistWrite::new(authority.clone())));

        let mut read = PolicyChain::<dyn ReadPolicy>::new();
        if cfg.no_complex_filters {
            read.push(Arc::new(NoComplexFilters));
        }
        read.push(Arc::new(AllowlistRead::new(authority.clone())));

        let management =
            PolicyChain::<dyn ManagementPolicy>::new().with(Arc::new(OwnerOnly::new(authority.clone())));

        Self::from_parts(write, read, management, ManagementApi::new(authority))
    }

    pub fn from_parts(
        write: PolicyChain<dyn WritePolicy>,
        read: PolicyChain<dyn ReadPolicy>,
        management: PolicyChain<dyn ManagementPolicy>,
        api: ManagementApi,
    ) -> Self {
        tracing::info!(
            write = ?write.names(),
            read = ?read.names(),
            management = ?management.names(),
            "relay policies compiled"
        );
        Self { write, read, management, api }
    }

    /// Write hook.
    pub async fn reject_event(&self, ctx: &ConnContext, event: &Event) -> PolicyDecision {
        self.write.check_event(ctx, event).await
    }

    /// Read hook.
    pub async fn reject_filter(&self, ctx: &ConnContext, filter: &Filter) -> PolicyDecision {
        self.read.check_filter(ctx, filter).await
    }

    /// Management hook, evaluated before any dispatch.
    pub async fn reject_call(&self, ctx: &ConnContext, call: &MethodParams) -> PolicyDecision {
        self.management.check_call(ctx, call).await
    }

    /// Direct access to the operations; only for callers that already ran
    /// `reject_call`.
    pub fn api(&self) -> &ManagementApi {
        &self.api
    }

    /// Gate then dispatch one management call.
    pub async fn handle_call(&self, ctx: &ConnContext, call: &MethodParams) -> Response {
        if let PolicyDecision::Reject(msg) = self.reject_call(ctx, call).await {
            return Response::error(msg);
        }
        match self.api.dispatch(call).await {
            Ok(result) => Response::ok(result),
            Err(e) => {
                tracing::warn!(method = call.method_name(), error = %e, "management call failed");
                Response::error(e.to_string())
            }
        }
    }
}
