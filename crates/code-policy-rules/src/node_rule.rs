//! Rule reporting every node accepted by a predicate.
//!
//! The catch-all shape behind the hygiene rules: a [`Predicate`] selects
//! the offending nodes and each is reported as `"<message> in <location>"`.
//!
//! # Detected Patterns
//!
//! Whatever the predicate accepts, e.g.:
//!
//! - `new IllegalArgumentException()` without a message
//! - `System.out.println(..)`
//! - `@SuppressWarnings` anywhere

use code_policy_core::predicate::Predicate;
use code_policy_core::{AnalysisRun, FailureKind, Node, PolicyFailure, PolicyRule, Scope, Severity};
use std::collections::HashSet;
use tracing::debug;

/// Rule code for node rules.
pub const CODE: &str = "CP009";

/// Reports the nodes matching a predicate.
#[derive(Debug, Clone)]
pub struct NodeRule {
    /// Rule instance name.
    pub name: String,
    /// Offending-node predicate.
    pub predicate: Predicate,
    /// Message prefix of every violation.
    pub message: String,
    /// Symbol that must resolve for the rule to apply.
    pub requires: Option<String>,
    /// Collapse violations rendering to the same location.
    pub distinct: bool,
    /// Severity level.
    pub severity: Severity,
}

impl NodeRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(name: impl Into<String>, predicate: Predicate, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicate,
            message: message.into(),
            requires: None,
            distinct: false,
            severity: Severity::Error,
        }
    }

    /// Skips the rule unless `symbol` resolves.
    #[must_use]
    pub fn requires(mut self, symbol: impl Into<String>) -> Self {
        self.requires = Some(symbol.into());
        self
    }

    /// Reports each location once.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl PolicyRule for NodeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports every node matching a forbidden shape"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Some(symbol) = &self.requires {
            if let Err(unresolved) = run.resolve(symbol) {
                debug!("{}: {unresolved}, skipping", self.name);
                return Ok(());
            }
        }

        let mut nodes: Vec<Node<'_>> = run.evaluate(&self.predicate, &Scope::Forest);
        if self.distinct {
            let mut seen = HashSet::new();
            nodes.retain(|node| seen.insert(run.render(node)));
        }
        run.report(FailureKind::Generic, &self.name, &nodes, |_, location| {
            format!("{} in {location}", self.message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;
    use code_policy_core::predicate::{
        annotated, bare_instantiation, forbidden_symbol, AnnotationSpec, UsageKind,
    };

    const JOBS: &str = r#"{
        "file": "src/app/Jobs.java", "namespace": "app",
        "types": [{
            "name": "Jobs", "line": 1,
            "annotations": [{"type": "java.lang.SuppressWarnings", "arguments": {"value": "unchecked"}}],
            "methods": [{"name": "run", "parameters": ["int"], "line": 3,
                "annotations": [{"type": "java.lang.SuppressWarnings"}, {"type": "java.lang.SuppressWarnings"}],
                "body": [
                    {"kind": "new", "type": "java.lang.IllegalArgumentException", "line": 4},
                    {"kind": "new", "type": "java.lang.IllegalArgumentException", "line": 9}
                ]}]
        }]
    }"#;

    #[test]
    fn each_node_is_one_line() {
        let run = run(&[JOBS]);
        let rule = NodeRule::new(
            "no-bare-illegal-argument",
            bare_instantiation(vec!["java.lang.IllegalArgumentException".to_string()]),
            "Don't use java.lang.IllegalArgumentException without message",
        );
        let err = rule.check(&run).unwrap_err();

        assert_eq!(err.kind, FailureKind::Generic);
        assert_eq!(
            err.message,
            "Don't use java.lang.IllegalArgumentException without message in app.Jobs.run(int) Jobs.java:4\n\
             Don't use java.lang.IllegalArgumentException without message in app.Jobs.run(int) Jobs.java:9"
        );
    }

    #[test]
    fn distinct_collapses_same_location() {
        let run = run(&[JOBS]);
        let suppress = forbidden_symbol(&[UsageKind::Annotation], &["java.lang.SuppressWarnings".to_string()]);
        let all = NodeRule::new("no-suppress", suppress.clone(), "Never use @SuppressWarnings");
        assert_eq!(all.check(&run).unwrap_err().violations.len(), 3);

        let distinct = NodeRule::new("no-suppress", suppress, "Never use @SuppressWarnings").distinct();
        assert_eq!(distinct.check(&run).unwrap_err().violations.len(), 2);
    }

    #[test]
    fn required_symbol_gates_the_rule() {
        let run = run(&[JOBS]);
        let rule = NodeRule::new(
            "to-one-optional",
            annotated(AnnotationSpec::new("java.lang.SuppressWarnings")),
            "x",
        )
        .requires("javax.persistence.ManyToOne");
        assert!(rule.check(&run).is_ok());
    }
}
