use serde::Deserialize;

use asngate_core::error::{AsnGateError, Result};
use asngate_core::PolicyConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub matcher: MatcherConfig,
}

impl GatewayConfig {
    /// Wrap a matcher section (from the directive loader) with gateway defaults.
    pub fn from_matcher(matcher: MatcherConfig) -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            matcher,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AsnGateError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.matcher.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// ASN matcher options, as written by the operator.
/// Fragments are lowercased when compiled into a [`PolicyConfig`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Path of the MaxMind GeoLite2-ASN `.mmdb` file.
    pub db_path: String,

    #[serde(default)]
    pub allow_asos: Vec<String>,

    #[serde(default)]
    pub deny_asos: Vec<String>,
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(AsnGateError::BadConfig("matcher.db_path must not be empty".into()));
        }
        Ok(())
    }

    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig::new(&self.allow_asos, &self.deny_asos)
    }
}
