//! Rule restricting the structural kind of a namespace's declarations.
//!
//! # Rationale
//!
//! A `*.repository` namespace is expected to hold repository interfaces, a
//! `*.entity` namespace concrete entity classes. Any other kind placed there
//! usually means the type belongs elsewhere.
//!
//! # Detected Patterns
//!
//! - Top-level types directly inside a namespace whose last segment starts
//!   or ends with the segment, matching none of the allowed categories
//!
//! Test-named types and allow-listed types are exempt.

use code_policy_core::predicate::{
    directly_in_namespace, kind_not_in, name_ends_with_ignore_case, test_named, Predicate,
};
use code_policy_core::{
    AnalysisRun, FailureKind, PolicyFailure, PolicyRule, Scope, Severity, TypeCategory,
};

/// Rule code for namespace-kind.
pub const CODE: &str = "CP004";

/// Rule name for namespace-kind.
pub const NAME: &str = "namespace-kind";

/// Restricts the categories of the types placed in a namespace.
#[derive(Debug, Clone)]
pub struct NamespaceKind {
    /// Rule instance name.
    pub name: String,
    /// Namespace segment to inspect.
    pub segment: String,
    /// Allowed categories.
    pub allowed: Vec<TypeCategory>,
    /// Exemptions.
    pub allow: Vec<Predicate>,
    /// Severity level.
    pub severity: Severity,
}

impl NamespaceKind {
    /// Creates a new rule.
    #[must_use]
    pub fn new(segment: impl Into<String>, allowed: Vec<TypeCategory>) -> Self {
        Self {
            name: NAME.to_string(),
            segment: segment.into(),
            allowed,
            allow: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Sets the rule instance name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Exempts types matching `predicate`.
    #[must_use]
    pub fn allow(mut self, predicate: Predicate) -> Self {
        self.allow.push(predicate);
        self
    }

    /// Exempts types whose simple name ends with `suffix`, ignoring case.
    #[must_use]
    pub fn allow_name_suffix(self, suffix: impl Into<String>) -> Self {
        self.allow(name_ends_with_ignore_case(suffix))
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn allowed_list(&self) -> String {
        let names: Vec<String> = self.allowed.iter().map(ToString::to_string).collect();
        format!("[{}]", names.join(", "))
    }
}

impl PolicyRule for NamespaceKind {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Restricts the structural kind of the types placed in a namespace"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        let exempt = test_named(run.test_suffixes().to_vec()).or(Predicate::any(self.allow.clone()));
        let wrong_kind = directly_in_namespace(&self.segment)
            .and(kind_not_in(self.allowed.clone()))
            .and(exempt.negate());

        let nodes = run.evaluate(&wrong_kind, &Scope::Forest);
        let allowed = self.allowed_list();
        run.report(FailureKind::BadKind, &self.name, &nodes, |node, _| {
            let (name, namespace) = node
                .as_type()
                .map(|t| (t.qualified_name(), t.namespace_name()))
                .unwrap_or_default();
            format!("Invalid type \"{name}\" in package \"{namespace}\", expected one of {allowed}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;

    const REPOSITORY_PKG: &str = r#"{
        "file": "src/app/repository/Orders.java", "namespace": "app.repository",
        "types": [
            {"name": "OrderRepository", "kind": "interface", "line": 1},
            {"name": "OrderQueries", "line": 5},
            {"name": "OrderDaoImpl", "line": 9},
            {"name": "OrderRepositoryIT", "line": 13},
            {"name": "Status", "kind": "enum", "line": 17}
        ]
    }"#;

    #[test]
    fn wrong_kinds_are_reported() {
        let run = run(&[REPOSITORY_PKG]);
        let rule = NamespaceKind::new("repository", vec![TypeCategory::Interface]);
        let err = rule.check(&run).unwrap_err();

        assert_eq!(err.kind, FailureKind::BadKind);
        let names: Vec<&str> = err.violations.iter().map(|v| v.location.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "app.repository.OrderQueries.",
                "app.repository.OrderDaoImpl.",
                "app.repository.Status.",
            ]
        );
        assert!(err.message.starts_with(
            "Invalid type \"app.repository.OrderQueries\" in package \"app.repository\", expected one of [interface]. "
        ));
    }

    #[test]
    fn allow_list_exempts() {
        let run = run(&[REPOSITORY_PKG]);
        let rule = NamespaceKind::new("repository", vec![TypeCategory::Interface])
            .allow_name_suffix("daoimpl")
            .allow(code_policy_core::predicate::of_category(TypeCategory::Class));
        let err = rule.check(&run).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].location, "app.repository.Status.");
    }

    #[test]
    fn abstract_allowed_explicitly() {
        let run = run(&[r#"{
            "file": "E.java", "namespace": "app.entity",
            "types": [
                {"name": "Base", "modifiers": ["abstract"]},
                {"name": "Order"}
            ]
        }"#]);
        let strict = NamespaceKind::new("entity", vec![TypeCategory::Class]);
        assert_eq!(strict.check(&run).unwrap_err().violations.len(), 1);

        let lenient = NamespaceKind::new("entity", vec![TypeCategory::Class, TypeCategory::Abstract]);
        assert!(lenient.check(&run).is_ok());
    }
}
