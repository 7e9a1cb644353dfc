//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw TOML representation of declarative rules.
///
/// Shares the file with the base `Config`; only the sections below are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Named source scopes.
    #[serde(rename = "scopes", default)]
    pub scopes: Vec<ScopeDto>,

    /// Forbidden-import rules.
    #[serde(rename = "forbidden-import", default)]
    pub forbidden_import: Vec<ForbiddenImportDto>,

    /// Layering rules.
    #[serde(rename = "stereotype-location", default)]
    pub stereotype_location: Vec<StereotypeLocationDto>,

    /// Reverse layering by annotation.
    #[serde(rename = "namespace-annotation", default)]
    pub namespace_annotation: Vec<NamespaceAnnotationDto>,

    /// Reverse layering by kind.
    #[serde(rename = "namespace-kind", default)]
    pub namespace_kind: Vec<NamespaceKindDto>,

    /// Stereotype suffix rules.
    #[serde(rename = "stereotype-suffix", default)]
    pub stereotype_suffix: Vec<StereotypeSuffixDto>,

    /// Forbidden symbol usages.
    #[serde(rename = "forbid-usage", default)]
    pub forbid_usage: Vec<ForbidUsageDto>,

    /// Annotation argument shape rules.
    #[serde(rename = "annotation-argument", default)]
    pub annotation_argument: Vec<AnnotationArgumentDto>,
}

/// TOML representation of a named source scope.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeDto {
    /// Scope name (e.g., "legacy").
    pub name: String,
    /// Glob patterns for source file paths.
    pub paths: Vec<String>,
}

/// `[[forbidden-import]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForbiddenImportDto {
    /// Rule name.
    pub name: String,
    /// Banned qualified-name prefix.
    pub prefix: String,
    /// Why the prefix is banned.
    #[serde(default)]
    pub reason: String,
    /// Exempt named scopes.
    #[serde(rename = "allow-scopes", default)]
    pub allow_scopes: Vec<String>,
    /// Exempt source patterns.
    #[serde(rename = "allow-sources", default)]
    pub allow_sources: Vec<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[stereotype-location]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct StereotypeLocationDto {
    /// Rule name.
    pub name: String,
    /// Qualified annotation type.
    pub annotation: String,
    /// Required annotation arguments.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    /// Expected namespace segment.
    pub segment: String,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[namespace-annotation]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceAnnotationDto {
    /// Rule name.
    pub name: String,
    /// Inspected namespace segment.
    pub segment: String,
    /// Required qualified annotation type.
    pub annotation: String,
    /// Required annotation arguments.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    /// Inspected category (default: "class").
    #[serde(default = "default_kind_str")]
    pub kind: String,
    /// Exempting annotation types.
    #[serde(rename = "allow-annotated", default)]
    pub allow_annotated: Vec<String>,
    /// Exempting simple-name suffixes.
    #[serde(rename = "allow-suffixes", default)]
    pub allow_suffixes: Vec<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[namespace-kind]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceKindDto {
    /// Rule name.
    pub name: String,
    /// Inspected namespace segment.
    pub segment: String,
    /// Allowed categories.
    pub kinds: Vec<String>,
    /// Exempting simple-name suffixes.
    #[serde(rename = "allow-suffixes", default)]
    pub allow_suffixes: Vec<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[stereotype-suffix]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct StereotypeSuffixDto {
    /// Rule name.
    pub name: String,
    /// Qualified annotation type.
    pub annotation: String,
    /// Required annotation arguments.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    /// Required simple-name suffix.
    pub suffix: String,
    /// Skip test-named types (default: false).
    #[serde(rename = "exempt-tests", default)]
    pub exempt_tests: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[forbid-usage]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForbidUsageDto {
    /// Rule name.
    pub name: String,
    /// Banned symbol prefixes.
    pub symbols: Vec<String>,
    /// Usage kinds (default: all).
    #[serde(default)]
    pub kinds: Vec<String>,
    /// Violation message.
    pub message: String,
    /// Report each location once.
    #[serde(default)]
    pub distinct: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[annotation-argument]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationArgumentDto {
    /// Rule name.
    pub name: String,
    /// Inspected annotation types.
    pub annotations: Vec<String>,
    /// Argument name.
    pub argument: String,
    /// Forbidden literal; absent means the argument is required.
    #[serde(rename = "forbidden-value", default)]
    pub forbidden_value: Option<String>,
    /// Violation message.
    pub message: String,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_kind_str() -> String {
    "class".to_string()
}
