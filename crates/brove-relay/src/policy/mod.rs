//! Policy layer: the write, read, and management hooks.
//!
//! Each hook is an ordered `PolicyChain` of independent layers. Structural
//! validators come first, then the identity layer backed by
//! `IdentityAuthority`.

pub mod builtin;
pub mod engine;
pub mod management;
pub mod pipeline;
pub mod private;

pub use engine::{
    ManagementPolicy, PolicyChain, PolicyDecision, ReadPolicy, WritePolicy, AUTH_REQUIRED_PREFIX,
};
pub use management::{ManagementApi, OwnerOnly, MANAGEMENT_DENIED};
pub use pipeline::RelayPolicies;
pub use private::{AllowlistRead, AllowlistWrite};
