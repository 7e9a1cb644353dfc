//! Runner wiring configuration, presets and declarative rules into one
//! audit.

use code_policy_core::{
    AuditError, AuditReport, Auditor, Config, ConfigError, ModelSource, PolicyRuleBox, Severity,
};
use code_policy_rules::declarative::{load_rules_from_toml, LoadRulesError};
use code_policy_rules::{Preset, PresetError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["code-policy.toml", ".code-policy.toml"];

/// Preset used when neither the options nor the config name one.
const DEFAULT_PRESET: &str = "all";

/// Overrides for a checked audit. Unset fields fall back to the config
/// file, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Preset name (`hygiene`, `stereotypes`, `all`, `none`).
    pub preset: Option<String>,
    /// Config file path, relative to the project root unless absolute.
    pub config_path: Option<String>,
    /// Failure threshold (`error`, `warning`, `info`).
    pub fail_on: Option<String>,
}

impl CheckOptions {
    /// Creates options that defer everything to the config file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preset.
    #[must_use]
    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    /// Sets the config file path.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Sets the failure threshold.
    #[must_use]
    pub fn fail_on(mut self, severity: impl Into<String>) -> Self {
        self.fail_on = Some(severity.into());
        self
    }
}

/// Errors that prevent an audit from producing a report.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Config file could not be read.
    #[error("failed to read config from {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Base configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Preset name or preset options are invalid.
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// Declarative sections are invalid.
    #[error("declarative config error: {0}")]
    Declarative(#[from] LoadRulesError),

    /// The audit itself aborted.
    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Audits `source` against the project's `code-policy.toml`.
///
/// # Panics
///
/// Panics with a formatted report if findings at or above the failure
/// threshold exist, or if the audit cannot run.
pub fn check<S: ModelSource + 'static>(source: S) {
    check_with(source, &CheckOptions::default());
}

/// Audits `source` with explicit overrides.
///
/// # Panics
///
/// Panics with a formatted report if findings at or above the failure
/// threshold exist, or if the audit cannot run.
pub fn check_with<S: ModelSource + 'static>(source: S, options: &CheckOptions) {
    let root = find_project_root();
    let (report, fail_on) = read_config_content(&root, options.config_path.as_deref())
        .and_then(|content| audit(source, &content, options))
        .unwrap_or_else(|e| panic!("code-policy: {e}"));

    if report.has_failures_at(fail_on) {
        panic!("{}", report.format_test_report(fail_on));
    }
}

/// Audits `source` against TOML configuration `content`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the audit aborts.
/// Rule failures are findings in the report, not errors.
pub fn audit_with_config<S: ModelSource + 'static>(
    source: S,
    content: &str,
) -> Result<AuditReport, CheckError> {
    audit(source, content, &CheckOptions::default()).map(|(report, _)| report)
}

/// Audits `source`, reading the config file named by `options` (or the
/// default candidates) under `root`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or is invalid, or
/// if the audit aborts.
pub fn audit_with_options<S: ModelSource + 'static>(
    source: S,
    root: &Path,
    options: &CheckOptions,
) -> Result<AuditReport, CheckError> {
    let content = read_config_content(root, options.config_path.as_deref())?;
    audit(source, &content, options).map(|(report, _)| report)
}

fn audit<S: ModelSource + 'static>(
    source: S,
    content: &str,
    options: &CheckOptions,
) -> Result<(AuditReport, Severity), CheckError> {
    let config = parse_config(content)?;
    let preset = resolve_preset(options.preset.as_deref(), &config)?;
    let fail_on = resolve_fail_on(options.fail_on.as_deref(), &config)?;

    let mut rules = preset.configured_rules(&config)?;
    rules.extend(load_declarative_rules(content)?);
    info!("Auditing with preset {preset:?} and {} rule(s)", rules.len());

    let auditor = Auditor::builder()
        .source(source)
        .config(config)
        .rules(rules)
        .build()?;
    Ok((auditor.audit()?, fail_on))
}

/// Reads the raw TOML content from the config file.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> Result<String, CheckError> {
    let read = |path: PathBuf| {
        std::fs::read_to_string(&path).map_err(|source| CheckError::Io { path, source })
    };

    if let Some(path) = explicit_path {
        let full_path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            root.join(path)
        };
        return read(full_path);
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            debug!("Using config {}", path.display());
            return read(path);
        }
    }

    Ok(String::new())
}

/// Parses a `Config` from TOML content.
fn parse_config(content: &str) -> Result<Config, ConfigError> {
    if content.is_empty() {
        return Ok(Config::default());
    }
    Config::parse(content)
}

/// Loads declarative rules from TOML content.
///
/// Returns an empty vec if no declarative sections are present.
fn load_declarative_rules(content: &str) -> Result<Vec<PolicyRuleBox>, LoadRulesError> {
    if content.is_empty() {
        return Ok(vec![]);
    }
    load_rules_from_toml(content)
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root by walking up from `CARGO_MANIFEST_DIR` to the
/// workspace root.
fn find_project_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves the effective preset: explicit option > config > default.
fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, PresetError> {
    let name = explicit
        .or(config.preset.as_deref())
        .unwrap_or(DEFAULT_PRESET);
    Ok(name.parse::<Preset>()?)
}

/// Resolves the effective `fail_on` severity: explicit option > config >
/// default ("error").
fn resolve_fail_on(explicit: Option<&str>, config: &Config) -> Result<Severity, ConfigError> {
    match explicit {
        Some(value) => value.parse().map_err(|_| ConfigError::UnknownSeverity {
            value: value.to_string(),
        }),
        None => config.fail_on_severity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_all() {
        let config = Config::default();
        assert_eq!(resolve_preset(None, &config).unwrap(), Preset::All);
    }

    #[test]
    fn resolve_preset_explicit_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("none".to_string());
        assert_eq!(resolve_preset(Some("hygiene"), &config).unwrap(), Preset::Hygiene);
    }

    #[test]
    fn resolve_preset_from_config() {
        let mut config = Config::default();
        config.preset = Some("stereotypes".to_string());
        assert_eq!(resolve_preset(None, &config).unwrap(), Preset::Stereotypes);
    }

    #[test]
    fn resolve_preset_invalid() {
        let config = Config::default();
        let err = resolve_preset(Some("nonexistent"), &config).unwrap_err();
        assert!(err.to_string().contains("unknown preset `nonexistent`"));
    }

    #[test]
    fn resolve_fail_on_defaults_to_error() {
        let config = Config::default();
        assert_eq!(resolve_fail_on(None, &config).unwrap(), Severity::Error);
    }

    #[test]
    fn resolve_fail_on_explicit_overrides_config() {
        let mut config = Config::default();
        config.fail_on = Some("info".to_string());
        assert_eq!(resolve_fail_on(None, &config).unwrap(), Severity::Info);
        assert_eq!(resolve_fail_on(Some("warning"), &config).unwrap(), Severity::Warning);
    }

    #[test]
    fn resolve_fail_on_invalid() {
        let config = Config::default();
        assert!(matches!(
            resolve_fail_on(Some("critical"), &config),
            Err(ConfigError::UnknownSeverity { .. })
        ));
    }

    // ── Declarative rules loading ──

    #[test]
    fn load_declarative_rules_empty_content() {
        assert!(load_declarative_rules("").unwrap().is_empty());
    }

    #[test]
    fn load_declarative_rules_next_to_base_config() {
        let toml = r#"
preset = "hygiene"
fail_on = "warning"

[rules.forbid-sql-date]
allow_sources = ["src/legacy/**"]

[[forbidden-import]]
name = "forbid-guava"
prefix = "com.google.common."
"#;
        let rules = load_declarative_rules(toml).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "forbid-guava");

        let config = parse_config(toml).unwrap();
        assert_eq!(config.preset.as_deref(), Some("hygiene"));
    }

    #[test]
    fn missing_explicit_config_is_an_io_error() {
        let root = std::env::temp_dir();
        let result = read_config_content(&root, Some("definitely-missing-code-policy.toml"));
        assert!(matches!(result, Err(CheckError::Io { .. })));
    }

    #[test]
    fn no_candidate_means_empty_config() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
        assert_eq!(read_config_content(&root, None).unwrap(), "");
    }
}
