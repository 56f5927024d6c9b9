use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings loaded from a TOML file.
///
/// Every key is optional; command-line flags take precedence over the file.
///
/// # Examples
/// ```
/// use ruleshark_core::Config;
///
/// let config = Config::from_toml_str("rule = \"pretty\"\nstrict = true\n")?;
/// assert_eq!(config.rule.as_deref(), Some("pretty"));
/// assert!(config.strict);
/// assert!(config.log.is_none());
/// # Ok::<(), ruleshark_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the built-in rule to evaluate.
    pub rule: Option<String>,
    /// Abort the run on the first rule error.
    pub strict: bool,
    /// `tracing` filter directive, e.g. `"info"` or `"ruleshark_core=debug"`.
    pub log: Option<String>,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}
