//! Pure domain model for declarative policy rules.
//!
//! No serde and no I/O here. Invariants are enforced at construction time
//! via validated newtypes and the [`DeclarativeConfig`] aggregate root.

use code_policy_core::predicate::{AnnotationSpec, UsageKind};
use code_policy_core::utils::{GlobPattern, PatternError};
use code_policy_core::{Severity, TypeCategory};
use std::collections::{HashMap, HashSet};
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

fn is_kebab(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// A validated rule name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new rule name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyRuleName);
        }
        if !is_kebab(name) {
            return Err(ModelError::InvalidRuleName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated source-scope name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeName(String);

impl ScopeName {
    /// Creates a new scope name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyScopeName);
        }
        if !is_kebab(name) {
            return Err(ModelError::InvalidScopeName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated dotted name (`org.acme.Type`), optionally ending with a dot
/// when used as a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Creates a qualified name; every segment must be a non-empty
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or malformed.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        Self::validate(name, false)
    }

    /// Creates a qualified-name prefix; a single trailing dot is allowed.
    ///
    /// # Errors
    ///
    /// Returns error if the prefix is empty or malformed.
    pub fn prefix(name: &str) -> Result<Self, ModelError> {
        Self::validate(name, true)
    }

    fn validate(name: &str, allow_trailing_dot: bool) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyQualifiedName);
        }
        let body = if allow_trailing_dot {
            name.strip_suffix('.').unwrap_or(name)
        } else {
            name
        };
        let valid = body.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        });
        if !valid {
            return Err(ModelError::InvalidQualifiedName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated namespace segment (one identifier, no dots).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(String);

impl Segment {
    /// Creates a segment.
    ///
    /// # Errors
    ///
    /// Returns error if the segment is empty or contains a dot.
    pub fn new(segment: &str) -> Result<Self, ModelError> {
        if segment.is_empty() || segment.contains('.') || segment.contains(char::is_whitespace) {
            return Err(ModelError::InvalidSegment {
                segment: segment.to_string(),
            });
        }
        Ok(Self(segment.to_string()))
    }

    /// Returns the segment as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// A named set of source files.
#[derive(Debug, Clone)]
pub struct SourceScope {
    name: ScopeName,
    patterns: Vec<GlobPattern>,
}

impl SourceScope {
    /// Creates a new scope.
    #[must_use]
    pub fn new(name: ScopeName, patterns: Vec<GlobPattern>) -> Self {
        Self { name, patterns }
    }

    /// Returns the scope name.
    #[must_use]
    pub fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Returns the glob patterns.
    #[must_use]
    pub fn patterns(&self) -> &[GlobPattern] {
        &self.patterns
    }
}

/// `[[forbidden-import]]`.
#[derive(Debug, Clone)]
pub struct ForbiddenImportDecl {
    /// Rule name.
    pub name: RuleName,
    /// Banned prefix.
    pub prefix: QualifiedName,
    /// Why the prefix is banned.
    pub reason: String,
    /// Exempt named scopes.
    pub allow_scopes: Vec<ScopeName>,
    /// Exempt inline source patterns.
    pub allow_sources: Vec<GlobPattern>,
    /// Severity.
    pub severity: Severity,
}

/// `[[stereotype-location]]`.
#[derive(Debug, Clone)]
pub struct StereotypeLocationDecl {
    /// Rule name.
    pub name: RuleName,
    /// Stereotype annotation.
    pub annotation: AnnotationSpec,
    /// Expected namespace segment.
    pub segment: Segment,
    /// Severity.
    pub severity: Severity,
}

/// `[[namespace-annotation]]`.
#[derive(Debug, Clone)]
pub struct NamespaceAnnotationDecl {
    /// Rule name.
    pub name: RuleName,
    /// Inspected namespace segment.
    pub segment: Segment,
    /// Required annotation.
    pub annotation: AnnotationSpec,
    /// Inspected category.
    pub category: TypeCategory,
    /// Exempting annotations.
    pub allow_annotated: Vec<AnnotationSpec>,
    /// Exempting name suffixes (case-insensitive).
    pub allow_suffixes: Vec<String>,
    /// Severity.
    pub severity: Severity,
}

/// `[[namespace-kind]]`.
#[derive(Debug, Clone)]
pub struct NamespaceKindDecl {
    /// Rule name.
    pub name: RuleName,
    /// Inspected namespace segment.
    pub segment: Segment,
    /// Allowed categories.
    pub allowed: Vec<TypeCategory>,
    /// Exempting name suffixes (case-insensitive).
    pub allow_suffixes: Vec<String>,
    /// Severity.
    pub severity: Severity,
}

/// `[[stereotype-suffix]]`.
#[derive(Debug, Clone)]
pub struct StereotypeSuffixDecl {
    /// Rule name.
    pub name: RuleName,
    /// Stereotype annotation.
    pub annotation: AnnotationSpec,
    /// Required suffix.
    pub suffix: String,
    /// Whether test-named types are skipped.
    pub exempt_tests: bool,
    /// Severity.
    pub severity: Severity,
}

/// `[[forbid-usage]]`.
#[derive(Debug, Clone)]
pub struct ForbidUsageDecl {
    /// Rule name.
    pub name: RuleName,
    /// Usage kinds; empty means all.
    pub kinds: Vec<UsageKind>,
    /// Banned symbol prefixes.
    pub symbols: Vec<QualifiedName>,
    /// Violation message.
    pub message: String,
    /// Report each location once.
    pub distinct: bool,
    /// Severity.
    pub severity: Severity,
}

/// `[[annotation-argument]]`.
#[derive(Debug, Clone)]
pub struct AnnotationArgumentDecl {
    /// Rule name.
    pub name: RuleName,
    /// Inspected annotation types.
    pub annotations: Vec<QualifiedName>,
    /// Argument name.
    pub argument: String,
    /// When set, the argument must not match this literal; otherwise the
    /// argument must be present.
    pub forbidden_value: Option<String>,
    /// Violation message.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

/// One declared rule.
#[derive(Debug, Clone)]
pub enum RuleDecl {
    /// `[[forbidden-import]]`.
    ForbiddenImport(ForbiddenImportDecl),
    /// `[[stereotype-location]]`.
    StereotypeLocation(StereotypeLocationDecl),
    /// `[[namespace-annotation]]`.
    NamespaceAnnotation(NamespaceAnnotationDecl),
    /// `[[namespace-kind]]`.
    NamespaceKind(NamespaceKindDecl),
    /// `[[stereotype-suffix]]`.
    StereotypeSuffix(StereotypeSuffixDecl),
    /// `[[forbid-usage]]`.
    ForbidUsage(ForbidUsageDecl),
    /// `[[annotation-argument]]`.
    AnnotationArgument(AnnotationArgumentDecl),
}

impl RuleDecl {
    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &RuleName {
        match self {
            Self::ForbiddenImport(d) => &d.name,
            Self::StereotypeLocation(d) => &d.name,
            Self::NamespaceAnnotation(d) => &d.name,
            Self::NamespaceKind(d) => &d.name,
            Self::StereotypeSuffix(d) => &d.name,
            Self::ForbidUsage(d) => &d.name,
            Self::AnnotationArgument(d) => &d.name,
        }
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated declarative configuration.
///
/// Scope references and rule-name uniqueness are verified at construction.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeConfig {
    scopes: HashMap<ScopeName, SourceScope>,
    rules: Vec<RuleDecl>,
}

impl DeclarativeConfig {
    /// Creates a new declarative config with full validation.
    ///
    /// # Errors
    ///
    /// Returns every cross-reference error found.
    pub fn new(scopes: Vec<SourceScope>, rules: Vec<RuleDecl>) -> Result<Self, Vec<ModelError>> {
        let scopes: HashMap<ScopeName, SourceScope> =
            scopes.into_iter().map(|s| (s.name.clone(), s)).collect();
        let mut errors = Vec::new();
        let mut names = HashSet::new();

        for rule in &rules {
            if !names.insert(rule.name().clone()) {
                errors.push(ModelError::DuplicateRuleName {
                    name: rule.name().clone(),
                });
            }
            if let RuleDecl::ForbiddenImport(decl) = rule {
                for scope in &decl.allow_scopes {
                    if !scopes.contains_key(scope) {
                        errors.push(ModelError::UnknownScope {
                            context: format!("forbidden-import '{}'", decl.name),
                            name: scope.clone(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Self { scopes, rules })
        } else {
            Err(errors)
        }
    }

    /// Returns true if no declarative rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the declared rules in declaration order, grouped by section.
    #[must_use]
    pub fn rules(&self) -> &[RuleDecl] {
        &self.rules
    }

    /// Gets a scope by name.
    #[must_use]
    pub fn scope(&self, name: &ScopeName) -> Option<&SourceScope> {
        self.scopes.get(name)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Rule name is empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,

    /// Rule name contains invalid characters.
    #[error("invalid rule name `{name}`: must be [a-z0-9-]")]
    InvalidRuleName {
        /// The invalid name.
        name: String,
    },

    /// Scope name is empty.
    #[error("scope name must not be empty")]
    EmptyScopeName,

    /// Scope name contains invalid characters.
    #[error("invalid scope name `{name}`: must be [a-z0-9-]")]
    InvalidScopeName {
        /// The invalid name.
        name: String,
    },

    /// Qualified name is empty.
    #[error("qualified name must not be empty")]
    EmptyQualifiedName,

    /// Qualified name is malformed.
    #[error("invalid qualified name `{name}`")]
    InvalidQualifiedName {
        /// The invalid name.
        name: String,
    },

    /// Namespace segment is empty or dotted.
    #[error("invalid namespace segment `{segment}`: must be a single non-empty segment")]
    InvalidSegment {
        /// The invalid segment.
        segment: String,
    },

    /// A required list is empty.
    #[error("`{field}` must not be empty")]
    EmptyList {
        /// The empty field.
        field: &'static str,
    },

    /// Glob pattern is invalid.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Two rules share a name.
    #[error("duplicate rule name `{name}`")]
    DuplicateRuleName {
        /// The repeated name.
        name: RuleName,
    },

    /// A scope reference points to an undefined scope.
    #[error("{context}: unknown scope `{name}`")]
    UnknownScope {
        /// Where the reference was found.
        context: String,
        /// The undefined scope name.
        name: ScopeName,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- Newtypes --

    #[test]
    fn rule_name_validation() {
        assert!(RuleName::new("forbid-guava-2").is_ok());
        assert!(matches!(RuleName::new(""), Err(ModelError::EmptyRuleName)));
        assert!(matches!(
            RuleName::new("Forbid_Guava"),
            Err(ModelError::InvalidRuleName { .. })
        ));
    }

    #[test]
    fn qualified_name_and_prefix() {
        assert!(QualifiedName::new("org.junit.Assert").is_ok());
        assert!(QualifiedName::new("org.apache.commons.lang.").is_err());
        assert!(QualifiedName::prefix("org.apache.commons.lang.").is_ok());
        assert!(QualifiedName::prefix("org..junit").is_err());
        assert!(matches!(
            QualifiedName::new(""),
            Err(ModelError::EmptyQualifiedName)
        ));
    }

    #[test]
    fn segment_validation() {
        assert!(Segment::new("controller").is_ok());
        assert!(Segment::new("app.controller").is_err());
        assert!(Segment::new("").is_err());
    }

    // -- Aggregate root --

    fn forbidden(name: &str, scopes: &[&str]) -> RuleDecl {
        RuleDecl::ForbiddenImport(ForbiddenImportDecl {
            name: RuleName::new(name).unwrap(),
            prefix: QualifiedName::prefix("old.").unwrap(),
            reason: String::new(),
            allow_scopes: scopes.iter().map(|s| ScopeName::new(s).unwrap()).collect(),
            allow_sources: Vec::new(),
            severity: Severity::Error,
        })
    }

    #[test]
    fn config_resolves_scopes() {
        let legacy = SourceScope::new(
            ScopeName::new("legacy").unwrap(),
            vec![GlobPattern::new("src/legacy/**").unwrap()],
        );
        let config = DeclarativeConfig::new(vec![legacy], vec![forbidden("no-old", &["legacy"])]).unwrap();
        assert!(!config.is_empty());
        assert_eq!(config.rules().len(), 1);
        assert!(config.scope(&ScopeName::new("legacy").unwrap()).is_some());
    }

    #[test]
    fn config_collects_all_cross_ref_errors() {
        let errors = DeclarativeConfig::new(
            vec![],
            vec![forbidden("no-old", &["missing"]), forbidden("no-old", &[])],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ModelError::UnknownScope { .. }));
        assert!(matches!(errors[1], ModelError::DuplicateRuleName { .. }));
    }

    #[test]
    fn empty_config() {
        assert!(DeclarativeConfig::default().is_empty());
    }
}
