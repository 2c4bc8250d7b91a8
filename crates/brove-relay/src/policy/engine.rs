use std::sync::Arc;

use async_trait::async_trait;

use brove_core::protocol::{Event, Filter, MethodParams};

use crate::context::ConnContext;

/// Prefix the host reads as "send an AUTH challenge, then CLOSED", instead
/// of a terminal denial.
pub const AUTH_REQUIRED_PREFIX: &str = "auth-required: ";

/// Decision from policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Pass,
    Reject(String),
}

impl PolicyDecision {
    pub fn reject(msg: impl Into<String>) -> Self {
        PolicyDecision::Reject(msg.into())
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, PolicyDecision::Reject(_))
    }

    /// Empty on `Pass`.
    pub fn message(&self) -> &str {
        match self {
            PolicyDecision::Pass => "",
            PolicyDecision::Reject(msg) => msg,
        }
    }

    /// True when the host should challenge the client rather than refuse.
    pub fn requires_auth(&self) -> bool {
        self.message().starts_with(AUTH_REQUIRED_PREFIX)
    }

    /// `(reject, message)` as relay frameworks expect from a hook.
    pub fn into_pair(self) -> (bool, String) {
        match self {
            PolicyDecision::Pass => (false, String::new()),
            PolicyDecision::Reject(msg) => (true, msg),
        }
    }
}

/// Admission check for an inbound event, run before persistence.
#[async_trait]
pub trait WritePolicy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check_event(&self, ctx: &ConnContext, event: &Event) -> PolicyDecision;
}

/// Admission check for a subscription filter, run before querying.
#[async_trait]
pub trait ReadPolicy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check_filter(&self, ctx: &ConnContext, filter: &Filter) -> PolicyDecision;
}

/// Admission check for a management call, run before dispatch.
#[async_trait]
pub trait ManagementPolicy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check_call(&self, ctx: &ConnContext, call: &MethodParams) -> PolicyDecision;
}

/// Ordered list of independent layers. Evaluated in order; the first reject
/// wins and later layers are not consulted.
pub struct PolicyChain<P: ?Sized> {
    layers: Vec<Arc<P>>,
}

impl<P: ?Sized> Default for PolicyChain<P> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<P: ?Sized> PolicyChain<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, layer: Arc<P>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Arc<P>) {
        self.layers.push(layer);
    }
}

impl PolicyChain<dyn WritePolicy> {
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub async fn check_event(&self, ctx: &ConnContext, event: &Event) -> PolicyDecision {
        for layer in &self.layers {
            let d = layer.check_event(ctx, event).await;
            if d.is_reject() {
                tracing::debug!(conn = %ctx.conn_id, layer = layer.name(), kind = event.kind, reason = d.message(), "event rejected");
                return d;
            }
        }
        PolicyDecision::Pass
    }
}

impl PolicyChain<dyn ReadPolicy> {
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub async fn check_filter(&self, ctx: &ConnContext, filter: &Filter) -> PolicyDecision {
        for layer in &self.layers {
            let d = layer.check_filter(ctx, filter).await;
            if d.is_reject() {
                tracing::debug!(conn = %ctx.conn_id, layer = layer.name(), reason = d.message(), "filter rejected");
                return d;
            }
        }
        PolicyDecision::Pass
    }
}

impl PolicyChain<dyn ManagementPolicy> {
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub async fn check_call(&self, ctx: &ConnContext, call: &MethodParams) -> PolicyDecision {
        for layer in &self.layers {
            let d = layer.check_call(ctx, call).await;
            if d.is_reject() {
                tracing::debug!(conn = %ctx.conn_id, layer = layer.name(), method = call.method_name(), "management call rejected");
                return d;
            }
        }
        PolicyDecision::Pass
    }
}
