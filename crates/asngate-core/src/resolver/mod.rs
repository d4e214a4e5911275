//! ASN resolution backends.
//!
//! The matcher only needs "given an IP, return a record or nothing", so the
//! backend sits behind [`AsnSource`]. Two implementations ship:
//! - [`MmdbResolver`]: MaxMind GeoLite2-ASN database loaded into memory.
//! - [`StaticResolver`]: in-memory CIDR table (tests, offline setups).

pub mod mmdb;
pub mod table;

use std::net::IpAddr;

use crate::error::Result;
use crate::record::AsnRecord;

pub use mmdb::MmdbResolver;
pub use table::StaticResolver;

/// Read-only ASN lookup shared across request handlers.
///
/// `Ok(None)` means the address is valid but not covered by the database;
/// `Err` is reserved for read failures.
pub trait AsnSource: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> Result<Option<AsnRecord>>;
}
