//! Rule to keep stereotyped declarations in their namespace.
//!
//! # Rationale
//!
//! Layered codebases place each stereotype in a namespace named after it:
//! controllers in `*.controller`, entities in `*.entity`, and so on.
//!
//! # Detected Patterns
//!
//! - Types carrying the stereotype annotation whose namespace's last segment
//!   neither starts nor ends with the expected segment
//!
//! The rule succeeds vacuously when the annotation type cannot be resolved.

use code_policy_core::predicate::{annotated, outside_namespace, AnnotationSpec};
use code_policy_core::{AnalysisRun, FailureKind, PolicyFailure, PolicyRule, Scope, Severity};
use tracing::debug;

/// Rule code for stereotype-location.
pub const CODE: &str = "CP002";

/// Rule name for stereotype-location.
pub const NAME: &str = "stereotype-location";

/// Requires types annotated with a stereotype to live in a matching namespace.
#[derive(Debug, Clone)]
pub struct StereotypeLocation {
    /// Rule instance name.
    pub name: String,
    /// The stereotype annotation.
    pub annotation: AnnotationSpec,
    /// Expected namespace segment.
    pub segment: String,
    /// Severity level.
    pub severity: Severity,
}

impl StereotypeLocation {
    /// Creates a new rule.
    #[must_use]
    pub fn new(annotation: AnnotationSpec, segment: impl Into<String>) -> Self {
        Self {
            name: NAME.to_string(),
            annotation,
            segment: segment.into(),
            severity: Severity::Error,
        }
    }

    /// Sets the rule instance name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl PolicyRule for StereotypeLocation {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires stereotyped types to live in the namespace named after the stereotype"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Err(unresolved) = run.resolve(self.annotation.ty()) {
            debug!("{}: {unresolved}, skipping", self.name);
            return Ok(());
        }

        let misplaced = annotated(self.annotation.clone()).and(outside_namespace(&self.segment));
        let nodes = run.evaluate(&misplaced, &Scope::Forest);
        run.report(FailureKind::BadLocation, &self.name, &nodes, |node, _| {
            let (name, namespace) = node
                .as_type()
                .map(|t| (t.qualified_name(), t.namespace_name()))
                .unwrap_or_default();
            format!(
                "Class \"{name}\" located on package \"{namespace}\" should be on a \"*.{}\" package",
                self.segment
            )
        })
    }
}
