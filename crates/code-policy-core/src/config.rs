//! Configuration types for code-policy.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration for code-policy.
///
/// Declarative rule sections (`[[forbidden-import]]`, ...) may share the
/// same file; they are ignored here and loaded by the rules crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "hygiene", "stereotypes", "all", "none").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for test failure (default: "error").
    /// Findings at or above this severity fail the audit.
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analysis configuration.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Resolves `fail_on`, defaulting to [`Severity::Error`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSeverity`] for an unrecognised value.
    pub fn fail_on_severity(&self) -> Result<Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(Severity::Error),
            Some(value) => value.parse().map_err(|_| ConfigError::UnknownSeverity {
                value: value.to_string(),
            }),
        }
    }
}

/// Analysis-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Source roots handed to the model source.
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// Qualified names that resolve even though nothing declares or
    /// imports them.
    #[serde(default)]
    pub known_symbols: Vec<String>,

    /// Simple-name suffixes marking test declarations.
    #[serde(default = "default_test_suffixes")]
    pub test_suffixes: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            known_symbols: Vec::new(),
            test_suffixes: default_test_suffixes(),
        }
    }
}

fn default_roots() -> Vec<String> {
    vec!["main".to_string(), "test".to_string()]
}

fn default_test_suffixes() -> Vec<String> {
    crate::utils::paths::DEFAULT_TEST_SUFFIXES
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string option.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(toml::Value::as_str)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// `fail_on` names no severity.
    #[error("Unknown fail_on severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// The rejected value.
        value: String,
    },
}
