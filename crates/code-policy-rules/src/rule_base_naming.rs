//! Rule guarding the policy suite itself.
//!
//! # Rationale
//!
//! Policy rules are written by extending a base type. A class referencing
//! that base is part of the policy suite and must be named like a test, or
//! test runners will not pick it up.
//!
//! # Detected Patterns
//!
//! - Declarations referencing the base type, found through the symbol
//!   index, whose outermost enclosing type does not end with the suffix
//!
//! The base type itself is exempt. The rule succeeds vacuously when the base
//! type cannot be resolved.

use code_policy_core::{AnalysisRun, FailureKind, Node, PolicyFailure, PolicyRule, Severity};
use tracing::debug;

/// Rule code for rule-base-naming.
pub const CODE: &str = "CP008";

/// Rule name for rule-base-naming.
pub const NAME: &str = "rule-base-naming";

/// Default required suffix.
pub const DEFAULT_SUFFIX: &str = "Test";

/// Requires users of a base type to be named with a suffix.
#[derive(Debug, Clone)]
pub struct RuleBaseNaming {
    /// Rule instance name.
    pub name: String,
    /// Qualified name of the base type.
    pub base: String,
    /// Required suffix.
    pub suffix: String,
    /// Severity level.
    pub severity: Severity,
}

impl RuleBaseNaming {
    /// Creates a new rule for users of `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            name: NAME.to_string(),
            base: base.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            severity: Severity::Error,
        }
    }

    /// Sets the rule instance name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the required suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl PolicyRule for RuleBaseNaming {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires declarations built on the policy base type to be named as tests"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        let base = match run.resolve(&self.base) {
            Ok(base) => base,
            Err(unresolved) => {
                debug!("{}: {unresolved}, skipping", self.name);
                return Ok(());
            }
        };

        let program = run.program();
        let nodes: Vec<Node<'_>> = run
            .index()
            .used_by(base)
            .filter(|user| *user != base)
            .filter_map(|user| program.find_type(user))
            .filter(|&(_, decl)| {
                let outermost = program.enclosing_types(decl).first().copied().unwrap_or(decl);
                !outermost.simple_name().ends_with(self.suffix.as_str())
            })
            .map(|(_, decl)| Node::Type(decl))
            .collect();

        run.report(FailureKind::BadName, &self.name, &nodes, |node, _| {
            let name = node.as_type().map(|t| t.qualified_name()).unwrap_or_default();
            format!(
                "Class \"{name}\" uses \"{}\" and must be named \"*{}\"",
                self.base, self.suffix
            )
        })
    }
}
