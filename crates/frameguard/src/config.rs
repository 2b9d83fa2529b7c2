// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! Supports programmatic, file-based (TOML) and environment configuration.
//!
//! ```toml
//! warnings = "error"
//! ambiguous_strings = "default"
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::warnings::WarningAction;

/// Environment variable overriding [`EngineConfig::warnings`].
pub const ENV_WARNINGS: &str = "FRAMEGUARD_WARNINGS";

/// Environment variable overriding [`EngineConfig::ambiguous_strings`].
pub const ENV_AMBIGUOUS_STRINGS: &str = "FRAMEGUARD_AMBIGUOUS_STRINGS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How string lookups of a bare parameterized family name behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// Fail with `AmbiguousType`.
    #[default]
    Reject,
    /// Resolve `"decimal"` to the default precision and scale.
    /// `"array"` and `"map"` have no default and are still rejected.
    Default,
}

impl FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(AmbiguityPolicy::Reject),
            "default" => Ok(AmbiguityPolicy::Default),
            other => Err(format!("unknown ambiguity policy '{}'", other)),
        }
    }
}

/// Type engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Action taken on compatibility warnings.
    #[serde(default)]
    pub warnings: WarningAction,

    /// String lookup policy for parameterized families.
    #[serde(default)]
    pub ambiguous_strings: AmbiguityPolicy,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Defaults overridden by `FRAMEGUARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment or test map).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_WARNINGS) {
            self.warnings = value
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", ENV_WARNINGS, e)))?;
        }
        if let Some(value) = lookup(ENV_AMBIGUOUS_STRINGS) {
            self.ambiguous_strings = value
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", ENV_AMBIGUOUS_STRINGS, e)))?;
        }
        Ok(self)
    }

    /// Render as TOML (used by `gen-config`).
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.warnings, WarningAction::Warn);
        assert_eq!(config.ambiguous_strings, AmbiguityPolicy::Reject);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "warnings = \"error\"\nambiguous_strings = \"default\"").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.warnings, WarningAction::Error);
        assert_eq!(config.ambiguous_strings, AmbiguityPolicy::Default);
    }

    #[test]
    fn unknown_value_rejected() {
        let err = EngineConfig::from_toml_str("warnings = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn overrides_apply() {
        let config = EngineConfig::default()
            .with_overrides(|key| match key {
                ENV_WARNINGS => Some("ignore".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.warnings, WarningAction::Ignore);
        assert_eq!(config.ambiguous_strings, AmbiguityPolicy::Reject);
    }

    #[test]
    fn invalid_override_rejected() {
        let err = EngineConfig::default()
            .with_overrides(|key| (key == ENV_AMBIGUOUS_STRINGS).then(|| "guess".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_AMBIGUOUS_STRINGS));
    }

    #[test]
    fn toml_roundtrip_of_generated_config() {
        let config = EngineConfig {
            warnings: WarningAction::Error,
            ambiguous_strings: AmbiguityPolicy::Default,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
