//! Shared error type across asnGate crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, AsnGateError>;

/// Unified error type used by core and gateway.
///
/// Only the setup (`DatabaseOpenFailed`, `BadConfig`) and teardown
/// (`CloseFailed`) variants ever escape to callers. The per-request variants
/// are logged and folded into a deny decision by [`crate::AsnMatcher`].
#[derive(Debug, Error)]
pub enum AsnGateError {
    #[error("cannot open database file {path}: {reason}")]
    DatabaseOpenFailed { path: String, reason: String },
    #[error("cannot split host and port: {0}")]
    AddressSplitFailed(String),
    #[error("cannot parse IP address: {0}")]
    AddressParseFailed(String),
    #[error("cannot lookup IP address: {0}")]
    LookupFailed(String),
    #[error("cannot close database: {0}")]
    CloseFailed(String),
    #[error("bad config: {0}")]
    BadConfig(String),
}
