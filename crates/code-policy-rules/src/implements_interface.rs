//! Rule requiring stereotyped types to implement an interface.
//!
//! # Rationale
//!
//! Services are consumed through their interface so that callers can be
//! tested against a double.
//!
//! # Detected Patterns
//!
//! - Annotated types implementing no interface, neither directly nor through
//!   a superclass declared in the analysed program
//!
//! Superclasses outside the program are opaque. Test-named types are exempt.

use code_policy_core::predicate::{annotated, test_named, AnnotationSpec};
use code_policy_core::utils::paths::erase_type;
use code_policy_core::{
    AnalysisRun, FailureKind, Node, PolicyFailure, PolicyRule, Program, Scope, Severity, TypeDecl,
};
use std::collections::HashSet;
use tracing::debug;

/// Rule code for implements-interface.
pub const CODE: &str = "CP006";

/// Rule name for implements-interface.
pub const NAME: &str = "implements-interface";

/// Requires annotated types to implement at least one interface.
#[derive(Debug, Clone)]
pub struct ImplementsInterface {
    /// Rule instance name.
    pub name: String,
    /// The stereotype annotation.
    pub annotation: AnnotationSpec,
    /// Severity level.
    pub severity: Severity,
}

impl ImplementsInterface {
    /// Creates a new rule.
    #[must_use]
    pub fn new(annotation: AnnotationSpec) -> Self {
        Self {
            name: NAME.to_string(),
            annotation,
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

/// Interfaces of `decl`, or of the first superclass in its chain that
/// declares any.
fn implemented_interfaces<'p>(program: &'p Program, decl: &'p TypeDecl) -> &'p [String] {
    let mut visited = HashSet::new();
    let mut current = decl;
    loop {
        if !current.spec.interfaces.is_empty() {
            return &current.spec.interfaces;
        }
        if !visited.insert(current.qualified_name()) {
            return &[];
        }
        let parent = current
            .spec
            .superclass
            .as_deref()
            .and_then(erase_type)
            .and_then(|name| program.find_type(name));
        match parent {
            Some((_, superclass)) => current = superclass,
            None => return &[],
        }
    }
}

impl PolicyRule for ImplementsInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires stereotyped types to implement an interface"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Err(unresolved) = run.resolve(self.annotation.ty()) {
            debug!("{}: {unresolved}, skipping", self.name);
            return Ok(());
        }

        let candidates = annotated(self.annotation.clone())
            .and(test_named(run.test_suffixes().to_vec()).negate());
        let program = run.program();
        let nodes: Vec<Node<'_>> = run
            .evaluate(&candidates, &Scope::Forest)
            .into_iter()
            .filter(|node| {
                node.as_type()
                    .is_some_and(|t| implemented_interfaces(program, t).is_empty())
            })
            .collect();

        run.report(FailureKind::Generic, &self.name, &nodes, |node, _| {
            let name = node.as_type().map(|t| t.qualified_name()).unwrap_or_default();
            format!(
                "Class \"{name}\" annotated with \"{}\" should implement an interface",
                self.annotation
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;

    const SERVICES: &str = r#"{
        "file": "Services.java", "namespace": "app.service",
        "imports": ["lib.Service"],
        "types": [
            {"name": "DirectServiceImpl", "interfaces": ["app.service.DirectService"],
             "annotations": [{"type": "lib.Service"}]},
            {"name": "BaseService", "modifiers": ["abstract"],
             "interfaces": ["app.service.InheritedService"]},
            {"name": "InheritedServiceImpl", "superclass": "app.service.BaseService",
             "annotations": [{"type": "lib.Service"}]},
            {"name": "LoneServiceImpl", "superclass": "lib.External",
             "annotations": [{"type": "lib.Service"}]}
        ]
    }"#;

    #[test]
    fn reports_types_without_interfaces() {
        let run = run(&[SERVICES]);
        let err = ImplementsInterface::new(AnnotationSpec::new("lib.Service"))
            .check(&run)
            .unwrap_err();

        assert_eq!(err.kind, FailureKind::Generic);
        assert_eq!(err.violations.len(), 1);
        assert_eq!(
            err.message,
            "Class \"app.service.LoneServiceImpl\" annotated with \"@Service\" should implement an interface"
        );
    }

    #[test]
    fn superclass_cycle_terminates() {
        let run = run(&[r#"{
            "file": "C.java", "namespace": "app", "imports": ["lib.Service"],
            "types": [
                {"name": "A", "superclass": "app.B", "annotations": [{"type": "lib.Service"}]},
                {"name": "B", "superclass": "app.A"}
            ]
        }"#]);
        let err = ImplementsInterface::new(AnnotationSpec::new("lib.Service"))
            .check(&run)
            .unwrap_err();
        assert_eq!(err.violations[0].location, "app.A.");
    }
}
