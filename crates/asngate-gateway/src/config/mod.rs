//! Gateway config loaders.
//!
//! Two surfaces produce the same [`GatewayConfig`]:
//! - strict YAML (`*.yaml` / `*.yml`)
//! - a `maxmind_asn { ... }` directive block (anything else)

pub mod directive;
pub mod schema;

use std::fs;
use std::path::Path;

use asngate_core::error::{AsnGateError, Result};

pub use schema::{GatewayConfig, GatewaySection, MatcherConfig};

/// Load by extension: YAML for `.yaml`/`.yml`, directive block otherwise.
pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AsnGateError::BadConfig(format!("read config {path} failed: {e}")))?;

    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        load_from_str(&s)
    } else {
        let matcher = directive::parse(&s)?;
        Ok(GatewayConfig::from_matcher(matcher))
    }
}

/// Strict YAML parsing + validation.
pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| AsnGateError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
