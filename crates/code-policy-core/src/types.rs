//! Audit findings and the per-run report.

use crate::failure::{FailureKind, PolicyFailure, Violation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity level of a rule failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the audit.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`, expected: error, warning, info")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// One failed rule of an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule name.
    pub rule: String,
    /// Rule code (e.g., "CP001").
    pub code: String,
    /// Effective severity.
    pub severity: Severity,
    /// Failure category.
    pub kind: FailureKind,
    /// Aggregated message.
    pub message: String,
    /// Individual violations.
    pub violations: Vec<Violation>,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Finding {
    /// Creates a finding from a rule failure.
    #[must_use]
    pub fn from_failure(code: impl Into<String>, severity: Severity, failure: PolicyFailure) -> Self {
        Self {
            rule: failure.rule,
            code: code.into(),
            severity,
            kind: failure.kind,
            message: failure.message,
            violations: failure.violations,
            help: failure.help,
        }
    }
}

/// Result of one audit run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuditReport {
    /// Failed rules, in evaluation order.
    pub findings: Vec<Finding>,
    /// Number of rules evaluated.
    pub rules_checked: usize,
    /// Number of type declarations analysed.
    pub declarations_checked: usize,
}

impl AuditReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any finding meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_failures_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Counts findings by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.findings.iter().filter(|f| f.severity == severity).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats findings as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()`
    /// messages in `cargo test` integration.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Finding> = self
            .findings
            .iter()
            .filter(|f| f.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== code-policy: {} failure(s) ===\n",
            failing.len()
        );

        for f in &failing {
            let _ = writeln!(report, "{} [{}] {}", f.rule, f.code, f.kind);
            for line in f.message.lines() {
                let _ = writeln!(report, "  {}: {line}", f.severity);
            }
            if let Some(help) = &f.help {
                let _ = writeln!(report, "  = help: {help}");
            }
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) from {} rule(s) over {} declaration(s)",
            errors, warnings, infos, self.rules_checked, self.declarations_checked
        );

        report
    }

    /// Serializes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
