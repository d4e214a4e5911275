//! MaxMind DB (`.mmdb`) backed resolver.

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use maxminddb::{geoip2, MaxMindDBError, Reader};

use super::AsnSource;
use crate::error::{AsnGateError, Result};
use crate::record::AsnRecord;

/// Owns the loaded GeoLite2-ASN database.
///
/// The reader is immutable once opened, so one instance serves any number of
/// concurrent lookups. Closing consumes the resolver; there is no way to call
/// `lookup` afterwards.
pub struct MmdbResolver {
    path: String,
    reader: Reader<Vec<u8>>,
}

impl MmdbResolver {
    /// Load the database at `path` into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| AsnGateError::DatabaseOpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.display().to_string(),
            reader,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `database_type` from the file metadata (e.g. `GeoLite2-ASN`).
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }

    /// Build time of the database, seconds since the Unix epoch.
    pub fn build_epoch(&self) -> u64 {
        self.reader.metadata.build_epoch
    }

    /// Release the database.
    pub fn close(self) -> Result<()> {
        let MmdbResolver { path, reader } = self;
        drop(reader);
        tracing::debug!(db_path = %path, "database closed");
        Ok(())
    }

    /// Close a resolver shared through `Arc`.
    /// Fails if any other holder is still alive.
    pub fn close_shared(this: Arc<Self>) -> Result<()> {
        match Arc::try_unwrap(this) {
            Ok(resolver) => resolver.close(),
            Err(still_shared) => Err(AsnGateError::CloseFailed(format!(
                "{} still referenced by {} other holder(s)",
                still_shared.path,
                Arc::strong_count(&still_shared) - 1
            ))),
        }
    }
}

impl AsnSource for MmdbResolver {
    fn lookup(&self, ip: IpAddr) -> Result<Option<AsnRecord>> {
        // `::ffff:a.b.c.d` is looked up as `a.b.c.d`.
        let ip = ip.to_canonical();

        // The reader walks an IPv4-only tree with all 128 bits instead of
        // rejecting the address.
        if ip.is_ipv6() && self.reader.metadata.ip_version == 4 {
            return Err(AsnGateError::LookupFailed(format!(
                "{ip}: IPv6 address looked up in an IPv4-only database"
            )));
        }

        match self.reader.lookup::<geoip2::Asn>(ip) {
            Ok(asn) => Ok(Some(AsnRecord {
                number: asn.autonomous_system_number.unwrap_or(0),
                organization: asn
                    .autonomous_system_organization
                    .unwrap_or_default()
                    .to_string(),
            })),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => Err(AsnGateError::LookupFailed(format!("{ip}: {e}"))),
        }
    }
}

impl std::fmt::Debug for MmdbResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmdbResolver")
            .field("path", &self.path)
            .field("database_type", &self.database_type())
            .finish()
    }
}
