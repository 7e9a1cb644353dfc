//! Rule requiring stereotyped types to carry a name suffix.
//!
//! # Detected Patterns
//!
//! - `@Service class Billing` where services must be named `*ServiceImpl`
//!
//! Test-named types are checked like any other unless exempted with
//! [`StereotypeSuffix::exempt_tests()`]. The rule succeeds vacuously when the
//! annotation type cannot be resolved.

use code_policy_core::predicate::{annotated, name_ends_with, test_named, AnnotationSpec};
use code_policy_core::{AnalysisRun, FailureKind, PolicyFailure, PolicyRule, Scope, Severity};
use tracing::debug;

/// Rule code for stereotype-suffix.
pub const CODE: &str = "CP005";

/// Rule name for stereotype-suffix.
pub const NAME: &str = "stereotype-suffix";

/// Requires types annotated with a stereotype to end with a suffix.
#[derive(Debug, Clone)]
pub struct StereotypeSuffix {
    /// Rule instance name.
    pub name: String,
    /// The stereotype annotation.
    pub annotation: AnnotationSpec,
    /// Required simple-name suffix.
    pub suffix: String,
    /// Skips test-named types.
    pub exempt_tests: bool,
    /// Severity level.
    pub severity: Severity,
}

impl StereotypeSuffix {
    /// Creates a new rule.
    #[must_use]
    pub fn new(annotation: AnnotationSpec, suffix: impl Into<String>) -> Self {
        Self {
            name: NAME.to_string(),
            annotation,
            suffix: suffix.into(),
            exempt_tests: false,
            severity: Severity::Error,
        }
    }

    /// Sets the rule instance name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Skips types whose name ends with a test suffix.
    #[must_use]
    pub fn exempt_tests(mut self) -> Self {
        self.exempt_tests = true;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl PolicyRule for StereotypeSuffix {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires stereotyped types to end with the stereotype's name suffix"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Err(unresolved) = run.resolve(self.annotation.ty()) {
            debug!("{}: {unresolved}, skipping", self.name);
            return Ok(());
        }

        let mut misnamed = annotated(self.annotation.clone()).and(name_ends_with(&self.suffix).negate());
        if self.exempt_tests {
            misnamed = misnamed.and(test_named(run.test_suffixes().to_vec()).negate());
        }
        let nodes = run.evaluate(&misnamed, &Scope::Forest);
        run.report(FailureKind::BadName, &self.name, &nodes, |node, _| {
            let name = node.as_type().map(|t| t.qualified_name()).unwrap_or_default();
            format!(
                "Class \"{name}\" annotated with \"{}\" should be named \"*{}\"",
                self.annotation, self.suffix
            )
        })
    }
}
