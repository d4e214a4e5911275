//! In-memory CIDR table resolver.

use std::net::IpAddr;

use ipnet::IpNet;

use super::AsnSource;
use crate::error::{AsnGateError, Result};
use crate::record::AsnRecord;

/// Fixed prefix -> record table. The longest matching prefix wins, the same
/// way a MaxMind tree returns its most specific network.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: Vec<(IpNet, AsnRecord)>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a network; `prefix` is CIDR notation (`104.16.0.0/12`).
    pub fn with_network(
        mut self,
        prefix: &str,
        number: u32,
        organization: impl Into<String>,
    ) -> Result<Self> {
        let net: IpNet = prefix
            .parse()
            .map_err(|_| AsnGateError::BadConfig(format!("invalid CIDR prefix: {prefix}")))?;
        self.entries.push((net.trunc(), AsnRecord::new(number, organization)));
        Ok(self)
    }
}

impl AsnSource for StaticResolver {
    fn lookup(&self, ip: IpAddr) -> Result<Option<AsnRecord>> {
        Ok(self
            .entries
            .iter()
            .filter(|(net, _)| net.contains(&ip))
            .max_by_key(|(net, _)| net.prefix_len())
            .map(|(_, rec)| rec.clone()))
    }
}
