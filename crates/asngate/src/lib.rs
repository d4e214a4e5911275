//! Top-level facade crate for asnGate.
//!
//! Re-exports the decision core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use asngate_core::*;
}

pub mod gateway {
    pub use asngate_gateway::*;
}
