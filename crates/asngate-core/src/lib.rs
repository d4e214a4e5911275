//! asnGate core: ASN resolution and organization-based admission decisions.
//!
//! This crate owns the decision engine used inline by request pipelines: it
//! resolves a client address to an autonomous-system record and evaluates a
//! two-list (allow/deny) fragment policy against the organization name. It
//! carries no transport or async runtime dependencies so it can be embedded
//! behind any server framework.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Per-request failures are absorbed into a deny decision; only setup and
//! teardown failures surface as `AsnGateError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod address;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod record;
pub mod resolver;

/// Shared result type.
pub use error::{AsnGateError, Result};
pub use matcher::AsnMatcher;
pub use policy::{AdmitReason, DenyReason, PolicyConfig, Verdict};
pub use record::AsnRecord;
pub use resolver::{AsnSource, MmdbResolver, StaticResolver};
