//! Client address normalization (`host:port` splitting and IP parsing).
//!
//! Splitting follows the usual socket-address rules: `ip:port` for IPv4 and
//! host names, `[ip]:port` for IPv6. Splitting is allowed to fail; callers
//! fall back to parsing the whole input as a bare address.

use std::net::IpAddr;

use crate::error::{AsnGateError, Result};

/// Split `host:port` / `[host]:port` into its parts.
///
/// The port is not validated beyond being bracket-free.
pub fn split_host_port(raw: &str) -> Result<(&str, &str)> {
    let split_err = |why: &str| AsnGateError::AddressSplitFailed(format!("{raw}: {why}"));

    let colon = raw.rfind(':').ok_or_else(|| split_err("missing port in address"))?;

    let host = if let Some(rest) = raw.strip_prefix('[') {
        let end = rest.find(']').ok_or_else(|| split_err("missing ']' in address"))?;
        // `]` must be immediately followed by the last colon.
        if end + 2 != colon {
            return Err(if end + 2 == raw.len() {
                split_err("missing port in address")
            } else {
                split_err("unexpected characters after ']'")
            });
        }
        &rest[..end]
    } else {
        let host = &raw[..colon];
        if host.contains(':') {
            return Err(split_err("too many colons in address"));
        }
        host
    };

    if host.contains(['[', ']']) {
        return Err(split_err("unexpected bracket in host"));
    }

    let port = &raw[colon + 1..];
    if port.contains(['[', ']']) {
        return Err(split_err("unexpected bracket in port"));
    }

    Ok((host, port))
}

/// Parse a host string into a structured IP address.
pub fn parse_ip(host: &str) -> Result<IpAddr> {
    host.parse::<IpAddr>()
        .map_err(|_| AsnGateError::AddressParseFailed(host.to_string()))
}
