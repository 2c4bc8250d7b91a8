//! Per-connection context the host relay hands to the policy hooks.
//!
//! The transport owns the authentication state: it moves a connection from
//! `Unauthenticated` to `Authenticated` once a NIP-42 `AUTH` succeeds. The
//! policies only read it.

pub mod session;

pub use session::{ConnContext, SessionAuth};
