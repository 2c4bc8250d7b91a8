//! brove relay library entry.
//!
//! This crate wires the allowlist store, the identity authority, and the
//! write/read/management policy hooks into one stack that a host relay
//! framework calls into. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod authority;
pub mod config;
pub mod context;
pub mod policy;
pub mod router;
pub mod store;
