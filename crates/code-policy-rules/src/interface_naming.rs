//! Rule correlating implementation namespaces with interface names.
//!
//! # Rationale
//!
//! When a namespace holds annotated implementations (`*ServiceImpl`), the
//! interfaces they implement from that same namespace form its public API
//! and should be recognisable by name (`*Service`).
//!
//! # Detected Patterns
//!
//! - An interface living in a namespace that contains an annotated
//!   implementation, implemented by such an implementation, whose simple
//!   name does not end with the suffix
//!
//! Interfaces from other namespaces are not inspected. Each interface is
//! reported once.

use code_policy_core::predicate::{annotated, AnnotationSpec};
use code_policy_core::utils::paths::{erase_type, last_segment, parent_path};
use code_policy_core::{
    aggregate, AnalysisRun, FailureKind, Node, PolicyFailure, PolicyRule, Scope, Severity,
    TypeDecl, Violation,
};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Rule code for interface-naming.
pub const CODE: &str = "CP007";

/// Rule name for interface-naming.
pub const NAME: &str = "interface-naming";

/// Requires the interfaces of annotated implementations to end with a suffix.
#[derive(Debug, Clone)]
pub struct InterfaceNaming {
    /// Rule instance name.
    pub name: String,
    /// Annotation marking implementations.
    pub annotation: AnnotationSpec,
    /// Required interface suffix.
    pub suffix: String,
    /// Severity level.
    pub severity: Severity,
}

impl InterfaceNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new(annotation: AnnotationSpec, suffix: impl Into<String>) -> Self {
        Self {
            name: NAME.to_string(),
            annotation,
            suffix: suffix.into(),
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

impl PolicyRule for InterfaceNaming {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires interfaces implemented by annotated types of the same namespace to end with a suffix"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Err(unresolved) = run.resolve(self.annotation.ty()) {
            debug!("{}: {unresolved}, skipping", self.name);
            return Ok(());
        }

        let implementations: Vec<&TypeDecl> = run
            .evaluate(&annotated(self.annotation.clone()), &Scope::Forest)
            .iter()
            .filter_map(Node::as_type)
            .filter(|t| !t.spec.interfaces.is_empty())
            .collect();
        let namespaces: BTreeSet<&str> = implementations.iter().map(|t| t.namespace_name()).collect();

        let program = run.program();
        let mut seen = HashSet::new();
        let mut violations = Vec::new();
        for &implementation in &implementations {
            for interface in implementation.spec.interfaces.iter().filter_map(|i| erase_type(i)) {
                let declared = program.find_type(interface).map(|(_, decl)| decl);
                let namespace = declared.map_or_else(|| parent_path(interface), TypeDecl::namespace_name);
                if !namespaces.contains(namespace)
                    || last_segment(interface).ends_with(self.suffix.as_str())
                    || !seen.insert(interface)
                {
                    continue;
                }
                let at = Node::Type(declared.unwrap_or(implementation));
                violations.push(Violation::new(
                    &self.name,
                    format!(
                        "Interface \"{interface}\" implemented by \"{}\" should be named \"*{}\"",
                        implementation.qualified_name(),
                        self.suffix
                    ),
                    run.render(&at),
                ));
            }
        }

        aggregate(FailureKind::BadName, &self.name, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;

    const BILLING: &str = r#"{
        "file": "Billing.java", "namespace": "app.billing",
        "imports": ["lib.Service"],
        "types": [
            {"name": "BillingService", "kind": "interface"},
            {"name": "Billing", "kind": "interface"},
            {"name": "BillingServiceImpl", "annotations": [{"type": "lib.Service"}],
             "interfaces": ["app.billing.BillingService", "app.billing.Billing", "java.io.Serializable"]},
            {"name": "OtherServiceImpl", "annotations": [{"type": "lib.Service"}],
             "interfaces": ["app.billing.Billing"]}
        ]
    }"#;

    #[test]
    fn misnamed_interface_reported_once() {
        let run = run(&[BILLING]);
        let err = InterfaceNaming::new(AnnotationSpec::new("lib.Service"), "Service")
            .check(&run)
            .unwrap_err();

        assert_eq!(err.kind, FailureKind::BadName);
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].location, "app.billing.Billing.");
        assert_eq!(
            err.message,
            "Interface \"app.billing.Billing\" implemented by \"app.billing.BillingServiceImpl\" should be named \"*Service\"."
        );
    }

    #[test]
    fn interfaces_of_other_namespaces_are_ignored() {
        let run = run(&[r#"{
            "file": "A.java", "namespace": "app.api", "imports": ["lib.Service"],
            "types": [{"name": "AServiceImpl", "annotations": [{"type": "lib.Service"}],
                       "interfaces": ["app.contracts.Api"]}]
        }"#]);
        assert!(InterfaceNaming::new(AnnotationSpec::new("lib.Service"), "Service")
            .check(&run)
            .is_ok());
    }

    #[test]
    fn undeclared_interface_located_at_implementation() {
        let run = run(&[r#"{
            "file": "A.java", "namespace": "app.api", "imports": ["lib.Service"],
            "types": [{"name": "AServiceImpl", "annotations": [{"type": "lib.Service"}],
                       "interfaces": ["app.api.Remote"]}]
        }"#]);
        let err = InterfaceNaming::new(AnnotationSpec::new("lib.Service"), "Service")
            .check(&run)
            .unwrap_err();
        assert_eq!(err.violations[0].location, "app.api.AServiceImpl.");
    }
}
