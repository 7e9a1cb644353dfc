//! Violation records and their aggregation into one failure per rule.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One rule-predicate match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that produced the violation.
    pub rule: String,
    /// Human-readable message, already including the location.
    pub message: String,
    /// Rendered location of the offending node.
    pub location: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            location: location.into(),
        }
    }
}

/// Category of an aggregated failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Declaration placed in the wrong namespace.
    BadLocation,
    /// Declaration missing a required annotation.
    BadAnnotation,
    /// Declaration referencing a banned symbol.
    BadImport,
    /// Declaration of a structural kind not allowed where it lives.
    BadKind,
    /// Declaration violating a naming convention.
    BadName,
    /// Any other predicate match.
    Generic,
}

impl FailureKind {
    /// Returns the diagnostic code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::BadLocation => "code_policy::bad_location",
            Self::BadAnnotation => "code_policy::bad_annotation",
            Self::BadImport => "code_policy::bad_import",
            Self::BadKind => "code_policy::bad_kind",
            Self::BadName => "code_policy::bad_name",
            Self::Generic => "code_policy::generic",
        }
    }

    /// Structured kinds join with `". "` and end with a period; generic
    /// failures join with newlines.
    #[must_use]
    pub fn is_structured(self) -> bool {
        self != Self::Generic
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BadLocation => "bad-location",
            Self::BadAnnotation => "bad-annotation",
            Self::BadImport => "bad-import",
            Self::BadKind => "bad-kind",
            Self::BadName => "bad-name",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// All violations of one rule evaluation, reported once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PolicyFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Rule that failed.
    pub rule: String,
    /// Joined message of every violation.
    pub message: String,
    /// The individual violations, never empty.
    pub violations: Vec<Violation>,
    /// Optional remediation hint.
    pub help: Option<String>,
}

impl PolicyFailure {
    /// Joins `violations` into one failure.
    ///
    /// Returns `None` when there is nothing to report.
    #[must_use]
    pub fn from_violations(
        kind: FailureKind,
        rule: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        let message = if kind.is_structured() {
            format!("{}.", messages.join(". "))
        } else {
            messages.join("\n")
        };
        Some(Self {
            kind,
            rule: rule.into(),
            message,
            violations,
            help: None,
        })
    }

    /// Attaches a remediation hint.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl Diagnostic for PolicyFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

/// Succeeds when `violations` is empty, otherwise fails once with all of
/// them.
///
/// # Errors
///
/// Returns the aggregated [`PolicyFailure`] if any violation was collected.
pub fn aggregate(
    kind: FailureKind,
    rule: &str,
    violations: Vec<Violation>,
) -> Result<(), PolicyFailure> {
    match PolicyFailure::from_violations(kind, rule, violations) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}
