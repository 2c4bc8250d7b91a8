//! Inputs handed to the policy hooks by the host relay.
//!
//! - `event`: the parts of a Nostr event the write path inspects.
//! - `filter`: a subscription filter as seen by the read path.
//! - `nip86`: management API method-and-params.
//!
//! Parsing is panic-free: malformed input is reported as `BroveError`.
//! Signature and id verification happen in the host before these types are
//! built.

pub mod event;
pub mod filter;
pub mod nip86;

pub use event::Event;
pub use filter::Filter;
pub use nip86::{MethodParams, PubKeyReason, Response};
