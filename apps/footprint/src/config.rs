//! # Configuration
//!
//! Optional TOML file tuning the loader, the pruning acceptor, and input
//! limits. Every section may be omitted; unknown keys are errors.
//!
//! ```toml
//! [loader]
//! intern_strings = false
//!
//! [prune]
//! skip_types = ["char[]"]
//!
//! [limits]
//! max_input_bytes = 104857600
//! ```

use footprint_core::FootprintError;
use serde::Deserialize;
use std::path::Path;

/// Default input size limit (100 MB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// How JSON documents become heap objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Identical strings share one `char[]` object.
    #[serde(default)]
    pub intern_strings: bool,
}

/// Objects the measurement does not explore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    /// Runtime type names the acceptor rejects.
    #[serde(default)]
    pub skip_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest input file accepted, in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_max_input_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

// =============================================================================
// ROOT
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FootprintConfig {
    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub prune: PruneConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

impl FootprintConfig {
    /// Read and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FootprintError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FootprintError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&contents).map_err(|e| match e {
            FootprintError::ConfigError(message) => {
                FootprintError::ConfigError(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(contents: &str) -> Result<Self, FootprintError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| FootprintError::ConfigError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FootprintError> {
        if self.limits.max_input_bytes == 0 {
            return Err(FootprintError::ConfigError(
                "limits.max_input_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(blank) = self.prune.skip_types.iter().find(|name| name.trim().is_empty()) {
            return Err(FootprintError::ConfigError(format!(
                "prune.skip_types contains a blank type name: {:?}",
                blank
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
