//! Rule to forbid references to banned symbols.
//!
//! # Rationale
//!
//! Some libraries have better successors (JUnit 5 over JUnit 4,
//! `java.time` over `java.sql.Date`, commons-lang 3 over 2). Any
//! declaration referencing them, by import or in code, is reported.
//!
//! # Detected Patterns
//!
//! - Declarations whose symbol-index entry contains a type whose qualified
//!   name starts with the banned prefix
//!
//! Declarations whose source file matches one of the allowed source
//! patterns are exempt.

use code_policy_core::utils::GlobPattern;
use code_policy_core::{
    aggregate, AnalysisRun, FailureKind, Node, PolicyFailure, PolicyRule, Severity, Violation,
};

/// Rule code for forbidden-import.
pub const CODE: &str = "CP001";

/// Rule name for forbidden-import.
pub const NAME: &str = "forbidden-import";

/// Forbids referencing types under a banned prefix.
#[derive(Debug, Clone)]
pub struct ForbiddenImport {
    /// Rule instance name.
    pub name: String,
    /// Banned qualified-name prefix.
    pub prefix: String,
    /// Why the prefix is banned.
    pub reason: String,
    /// Source files exempt from the ban.
    pub allow_sources: Vec<GlobPattern>,
    /// Severity level.
    pub severity: Severity,
}

impl ForbiddenImport {
    /// Creates a new rule for `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: NAME.to_string(),
            prefix: prefix.into(),
            reason: reason.into(),
            allow_sources: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Sets the rule instance name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Exempts source files matching `pattern`.
    #[must_use]
    pub fn allow_source(mut self, pattern: GlobPattern) -> Self {
        self.allow_sources.push(pattern);
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl PolicyRule for ForbiddenImport {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids references to types under a banned prefix"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        let program = run.program();
        let mut violations: Vec<Violation> = run
            .index()
            .users_matching(&self.prefix)
            .into_iter()
            .filter(|(banned, user)| banned != user)
            .filter_map(|(banned, user)| {
                let (_, decl) = program.find_type(user)?;
                let file = &decl.spec.position.file;
                if self.allow_sources.iter().any(|p| p.matches(file)) {
                    return None;
                }
                Some(Violation::new(
                    &self.name,
                    format!("{user} class must not import {banned} class"),
                    run.render(&Node::Type(decl)),
                ))
            })
            .collect();
        violations.sort_by(|a, b| a.message.cmp(&b.message));

        aggregate(FailureKind::BadImport, &self.name, violations).map_err(|failure| {
            if self.reason.is_empty() {
                failure
            } else {
                failure.with_help(self.reason.clone())
            }
        })
    }
}
