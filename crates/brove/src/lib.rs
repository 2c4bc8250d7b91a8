//! Top-level facade crate for brove.
//!
//! Re-exports core types and the relay policy library so users can depend on a single crate.

pub mod core {
    pub use brove_core::*;
}

pub mod relay {
    pub use brove_relay::*;
}
