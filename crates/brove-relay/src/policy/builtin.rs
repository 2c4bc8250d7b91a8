//! Structural validators that run ahead of the identity layers.
//!
//! These never look at who is asking; they only reject malformed or
//! overly expensive input.

use async_trait::async_trait;

use brove_core::protocol::event::{KIND_CONTACTS, KIND_METADATA};
use brove_core::protocol::{Event, Filter};

use crate::context::ConnContext;

use super::engine::{PolicyDecision, ReadPolicy, WritePolicy};

/// Content of well-known kinds must parse.
#[derive(Debug, Default)]
pub struct ValidateKind;

#[async_trait]
impl WritePolicy for ValidateKind {
    fn name(&self) -> &'static str {
        "validate_kind"
    }

    async fn check_event(&self, _ctx: &ConnContext, event: &Event) -> PolicyDecision {
        match event.kind {
            KIND_METADATA => {
                let ok = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
                    &event.content,
                )
                .is_ok();
                if !ok {
                    return PolicyDecision::reject("invalid: kind 0 content must be a json object");
                }
            }
            KIND_CONTACTS => {
                if !event.content.is_empty()
                    && serde_json::from_str::<serde_json::Value>(&event.content).is_err()
                {
                    return PolicyDecision::reject("invalid: kind 3 content must be empty or json");
                }
            }
            _ => {}
        }
        PolicyDecision::Pass
    }
}

/// Reject events whose first tag value (`tag[1]`) is longer than
/// `max_value_len` bytes. Later elements such as relay hints are not bounded.
#[derive(Debug)]
pub struct PreventLargeTags {
    max_value_len: usize,
}

impl PreventLargeTags {
    pub fn new(max_value_len: usize) -> Self {
        Self { max_value_len }
    }
}

#[async_trait]
impl WritePolicy for PreventLargeTags {
    fn name(&self) -> &'static str {
        "prevent_large_tags"
    }

    async fn check_event(&self, _ctx: &ConnContext, event: &Event) -> PolicyDecision {
        let too_large = event
            .tags
            .iter()
            .any(|t| t.get(1).is_some_and(|v| v.len() > self.max_value_len));
        if too_large {
            return PolicyDecision::reject("event contains too large tags");
        }
        PolicyDecision::Pass
    }
}

/// Reject filters with many tag conditions on top of many kinds.
#[derive(Debug, Default)]
pub struct NoComplexFilters;

const MAX_FILTER_TAGS: usize = 2;
const MAX_FILTER_ITEMS: usize = 4;

#[async_trait]
impl ReadPolicy for NoComplexFilters {
    fn name(&self) -> &'static str {
        "no_complex_filters"
    }

    async fn check_filter(&self, _ctx: &ConnContext, filter: &Filter) -> PolicyDecision {
        let items = filter.tags.len() + filter.kinds.len();
        if items > MAX_FILTER_ITEMS && filter.tags.len() > MAX_FILTER_TAGS {
            return PolicyDecision::reject("too many things to filter for");
        }
        PolicyDecision::Pass
    }
}
