//! Sealer configuration
//!
//! Loaded from a TOML file:
//! ```toml
//! endpoint = "http://127.0.0.1:12222/api/v0"
//! pool_capacity = 4
//! request_timeout_secs = 1000
//! excluded = []
//! ```

use crate::error::SealError;
use crate::http::HttpSealingClient;
use crate::pool::DEFAULT_CAPACITY;
use crate::Result;
use dagseal_core::{ExclusionSet, NodeId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SealerConfig {
    /// Base URL of the sealing service
    pub endpoint: String,
    /// Maximum concurrently outstanding seal requests per operation
    pub pool_capacity: usize,
    /// Per-request deadline for the sealing service
    pub request_timeout_secs: u64,
    /// Extra node ids never to seal, on top of the built-in placeholders
    pub excluded: Vec<String>,
}

impl Default for SealerConfig {
    fn default() -> Self {
        Self {
            endpoint: HttpSealingClient::DEFAULT_URL.to_string(),
            pool_capacity: DEFAULT_CAPACITY,
            request_timeout_secs: 1000,
            excluded: Vec::new(),
        }
    }
}

impl SealerConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| SealError::Config(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SealError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and excluded ids
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SealError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if !(1..=1024).contains(&self.pool_capacity) {
            return Err(SealError::Config(format!(
                "pool_capacity must be 1-1024, got {}",
                self.pool_capacity
            )));
        }
        if !(1..=86_400).contains(&self.request_timeout_secs) {
            return Err(SealError::Config(format!(
                "request_timeout_secs must be 1-86400, got {}",
                self.request_timeout_secs
            )));
        }
        self.excluded_ids().map(|_| ())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn excluded_ids(&self) -> Result<Vec<NodeId>> {
        self.excluded
            .iter()
            .map(|s| {
                s.parse::<NodeId>()
                    .map_err(|e| SealError::Config(format!("excluded entry '{}': {}", s, e)))
            })
            .collect()
    }

    /// Built-in exclusions plus the configured ones
    pub fn exclusion_set(&self) -> Result<ExclusionSet> {
        Ok(ExclusionSet::with_extra(self.excluded_ids()?))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SealError::Config(e.to_string()))
    }
}

/// Commented example configuration file
pub fn example_config() -> &'static str {
    r#"# dagseal configuration

# Base URL of the sealing service
endpoint = "http://127.0.0.1:12222/api/v0"

# Maximum concurrently outstanding seal requests per sealing operation (1-1024)
pool_capacity = 4

# Per-request deadline for the sealing service, in seconds (1-86400)
request_timeout_secs = 1000

# Extra node ids that must never be sealed (empty placeholders are always excluded)
excluded = []
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagseal_core::DagNode;

    #[test]
    fn test_defaults_are_valid() {
        let config = SealerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pool_capacity, 4);
        assert_eq!(config.request_timeout(), Duration::from_secs(1000));
    }

    #[test]
    fn test_example_parses_to_defaults() {
        assert_eq!(SealerConfig::from_toml(example_config()).unwrap(), SealerConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SealerConfig::from_toml("pool_capacity = 16\n").unwrap();
        assert_eq!(config.pool_capacity, 16);
        assert_eq!(config.endpoint, HttpSealingClient::DEFAULT_URL);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(SealerConfig::from_toml("pool_capacity = 0\n").is_err());
        assert!(SealerConfig::from_toml("pool_capacity = 5000\n").is_err());
        assert!(SealerConfig::from_toml("request_timeout_secs = 0\n").is_err());
        assert!(SealerConfig::from_toml("endpoint = \"ftp://x\"\n").is_err());
        assert!(SealerConfig::from_toml("unknown_key = 1\n").is_err());
    }

    #[test]
    fn test_excluded_ids() {
        let extra = DagNode::leaf(&b"placeholder"[..]).id();
        let config = SealerConfig::from_toml(&format!("excluded = [\"{}\"]\n", extra)).unwrap();
        let set = config.exclusion_set().unwrap();
        assert!(set.contains(&extra));
        assert!(set.contains(&DagNode::leaf(Vec::new()).id()));

        assert!(SealerConfig::from_toml("excluded = [\"nope\"]\n").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SealerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SealerConfig::default());
    }

    #[test]
    fn test_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dagseal.toml");
        std::fs::write(&path, "endpoint = \"http://sealer:8080/api/v0\"\n").unwrap();

        let config = SealerConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "http://sealer:8080/api/v0");

        let rendered = config.to_toml().unwrap();
        assert_eq!(SealerConfig::from_toml(&rendered).unwrap(), config);
    }
}
