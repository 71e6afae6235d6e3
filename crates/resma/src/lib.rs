//! Top-level facade crate for RESMA.
//!
//! Re-exports the serialization core and the gateway library so users can
//! depend on a single crate.

pub mod core {
    pub use resma_core::*;
}

pub mod gateway {
    pub use resma_gateway::*;
}
