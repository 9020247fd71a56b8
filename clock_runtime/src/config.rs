//! Runtime configuration, read from a JSON file.
//!
//! Every field has a default, so `{}` is a valid config and yields the
//! stock blink run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use clock_kernel::bitvec::UNSIGNED_WIDTH_LIMIT;

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Clock edges to run.
    pub cycles: u64,
    /// Width of the demo counter.
    pub counter_width: usize,
    /// Validate all pending updates before any commit.
    pub atomic_edges: bool,
    /// `tracing` filter used when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cycles: 30,
            counter_width: 3,
            atomic_edges: false,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RuntimeConfig =
            serde_json::from_str(&content).map_err(|e| RuntimeError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate(path)?;
        Ok(config)
    }

    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.counter_width == 0 || self.counter_width > UNSIGNED_WIDTH_LIMIT {
            return Err(RuntimeError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "counter_width must be between 1 and {}, got {}",
                    UNSIGNED_WIDTH_LIMIT, self.counter_width
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.validate(Path::new("x.json")).is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"cycles": 8, "counter_width": 4}"#).unwrap();
        assert_eq!(config.cycles, 8);
        assert_eq!(config.counter_width, 4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_rejects_bad_width() {
        let config = RuntimeConfig {
            counter_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(Path::new("x.json")),
            Err(RuntimeError::Config { .. })
        ));
    }

    #[test]
    fn test_rejects_width_above_unsigned_limit() {
        let config = RuntimeConfig {
            counter_width: UNSIGNED_WIDTH_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate(Path::new("x.json")).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<RuntimeConfig>(r#"{"cycle": 3}"#).is_err());
        assert!(serde_json::from_str::<RuntimeConfig>(r#"{"output_dir": "out"}"#).is_err());
    }
}
