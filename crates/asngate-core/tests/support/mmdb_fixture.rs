//! Minimal GeoLite2-ASN style database writer for tests.
//!
//! Produces an IPv4 database with a single search-tree node:
//! - `0.0.0.0/1`   -> AS15169 "GOOGLE LLC"
//! - `128.0.0.0/1` -> no record
//!
//! Layout: 24-bit records, 16 zero-byte separator, data section,
//! metadata marker, metadata map.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const FOUND_ASN: u32 = 15169;
pub const FOUND_ORG: &str = "GOOGLE LLC";
pub const BUILD_EPOCH: u32 = 1_700_000_000;

const METADATA_MARKER: &[u8] = b"\xab\xcd\xefMaxMind.com";

fn string(out: &mut Vec<u8>, s: &str) {
    let len = s.len();
    assert!(len < 29 + 256, "fixture strings stay short");
    if len < 29 {
        out.push(0x40 | len as u8);
    } else {
        out.push(0x40 | 29);
        out.push((len - 29) as u8);
    }
    out.extend_from_slice(s.as_bytes());
}

fn unsigned(out: &mut Vec<u8>, type_bits: u8, v: u32) {
    let bytes = v.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let payload = &bytes[skip..];
    out.push(type_bits | payload.len() as u8);
    out.extend_from_slice(payload);
}

fn uint16(out: &mut Vec<u8>, v: u16) {
    unsigned(out, 0xA0, v as u32);
}

fn uint32(out: &mut Vec<u8>, v: u32) {
    unsigned(out, 0xC0, v);
}

fn uint64(out: &mut Vec<u8>, v: u32) {
    // extended type 9 (7 + 2)
    out.push(4);
    out.push(2);
    out.extend_from_slice(&v.to_be_bytes());
}

fn map(out: &mut Vec<u8>, entries: u8) {
    out.push(0xE0 | entries);
}

fn array(out: &mut Vec<u8>, items: u8) {
    // extended type 11 (7 + 4)
    out.push(items);
    out.push(4);
}

pub fn database_bytes() -> Vec<u8> {
    let node_count: u32 = 1;
    let mut buf = Vec::new();

    // node 0: left -> data offset 0, right -> "not found" (== node_count)
    let left = node_count + 16;
    buf.extend_from_slice(&left.to_be_bytes()[1..]);
    buf.extend_from_slice(&node_count.to_be_bytes()[1..]);
    buf.extend_from_slice(&[0u8; 16]);

    map(&mut buf, 2);
    string(&mut buf, "autonomous_system_number");
    uint32(&mut buf, FOUND_ASN);
    string(&mut buf, "autonomous_system_organization");
    string(&mut buf, FOUND_ORG);

    buf.extend_from_slice(METADATA_MARKER);
    map(&mut buf, 9);
    string(&mut buf, "binary_format_major_version");
    uint16(&mut buf, 2);
    string(&mut buf, "binary_format_minor_version");
    uint16(&mut buf, 0);
    string(&mut buf, "build_epoch");
    uint64(&mut buf, BUILD_EPOCH);
    string(&mut buf, "database_type");
    string(&mut buf, "Test-ASN");
    string(&mut buf, "description");
    map(&mut buf, 1);
    string(&mut buf, "en");
    string(&mut buf, "asngate test fixture");
    string(&mut buf, "ip_version");
    uint16(&mut buf, 4);
    string(&mut buf, "languages");
    array(&mut buf, 1);
    string(&mut buf, "en");
    string(&mut buf, "node_count");
    uint32(&mut buf, node_count);
    string(&mut buf, "record_size");
    uint16(&mut buf, 24);

    buf
}

/// Write the fixture into `dir` and return its path.
pub fn write_asn_db(dir: &Path) -> PathBuf {
    let path = dir.join("Test-ASN.mmdb");
    fs::write(&path, database_bytes()).unwrap();
    path
}
