//! brove core: transport-agnostic relay primitives, error types, and the
//! shapes of the inputs the host relay hands to the policy hooks.
//!
//! This crate defines the contracts shared by the relay policy layer, the
//! allowlist store, and any host framework adapter. It carries no transport,
//! storage, or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `BroveError`/`Result` so a malformed
//! event or management call can never take the relay down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod identity;
pub mod protocol;

/// Shared result type.
pub use error::{BroveError, Result};
pub use identity::PubKey;
