//! asnGate gateway library entry.
//!
//! Wires configuration loading, resolver lifecycle, the admission guard and
//! operational endpoints into an HTTP front door. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
