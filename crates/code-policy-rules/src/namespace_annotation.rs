//! Rule requiring every declaration of a namespace to carry its stereotype.
//!
//! # Rationale
//!
//! The reverse of stereotype location: a `*.service` namespace should hold
//! services only, so a plain class placed there is a layering leak.
//!
//! # Detected Patterns
//!
//! - Top-level types directly inside a namespace whose last segment starts
//!   or ends with the segment, of the configured category, lacking the
//!   annotation
//!
//! Test-named types and allow-listed types are exempt. The rule succeeds
//! vacuously when the annotation type cannot be resolved.

use code_policy_core::predicate::{
    annotated, directly_in_namespace, name_ends_with_ignore_case, AnnotationPresence,
    AnnotationSpec, Predicate,
};
use code_policy_core::{
    AnalysisRun, FailureKind, PolicyFailure, PolicyRule, Scope, Severity, TypeCategory,
};
use tracing::debug;

/// Rule code for namespace-annotation.
pub const CODE: &str = "CP003";

/// Rule name for namespace-annotation.
pub const NAME: &str = "namespace-annotation";

/// Requires types of a namespace to carry an annotation.
#[derive(Debug, Clone)]
pub struct NamespaceAnnotation {
    /// Rule instance name.
    pub name: String,
    /// Namespace segment to inspect.
    pub segment: String,
    /// Required annotation.
    pub annotation: AnnotationSpec,
    /// Category of the types to inspect.
    pub category: TypeCategory,
    /// Exemptions.
    pub allow: Vec<Predicate>,
    /// Severity level.
    pub severity: Severity,
}

impl NamespaceAnnotation {
    /// Creates a new rule.
    #[must_use]
    pub fn new(segment: impl Into<String>, annotation: AnnotationSpec, category: TypeCategory) -> Self {
        Self {
            name: NAME.to_string(),
            segment: segment.into(),
            annotation,
            category,
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

    /// Exempts types carrying `annotation`.
    #[must_use]
    pub fn allow_annotated(self, annotation: AnnotationSpec) -> Self {
        self.allow(annotated(annotation))
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
}

impl PolicyRule for NamespaceAnnotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the types of a namespace to carry its stereotype annotation"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        if let Err(unresolved) = run.resolve(self.annotation.ty()) {
            debug!("{}: {unresolved}, skipping", self.name);
            return Ok(());
        }

        let lacking = AnnotationPresence::missing(self.annotation.clone())
            .of_category(self.category)
            .test_suffixes(run.test_suffixes().iter().cloned())
            .build();
        let exempt = Predicate::any(self.allow.clone());
        let unannotated = directly_in_namespace(&self.segment)
            .and(lacking)
            .and(exempt.negate());

        let nodes = run.evaluate(&unannotated, &Scope::Forest);
        run.report(FailureKind::BadAnnotation, &self.name, &nodes, |node, _| {
            let (name, namespace) = node
                .as_type()
                .map(|t| (t.qualified_name(), t.namespace_name()))
                .unwrap_or_default();
            format!(
                "Class \"{name}\" located on package \"{namespace}\" should have \"{}\"",
                self.annotation
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;

    const SERVICE_PKG: &str = r#"{
        "file": "src/app/service/Billing.java", "namespace": "app.service",
        "imports": ["lib.Stereotype"],
        "types": [
            {"name": "BillingServiceImpl", "line": 3,
             "annotations": [{"type": "lib.Stereotype", "arguments": {"value": "service"}}]},
            {"name": "BillingService", "kind": "interface", "line": 10},
            {"name": "Helper", "line": 20,
             "nested": [{"name": "Inner", "line": 21}]},
            {"name": "BillingServiceTest", "line": 30},
            {"name": "BillingDao", "line": 40}
        ]
    }"#;

    fn service_rule() -> NamespaceAnnotation {
        NamespaceAnnotation::new(
            "service",
            AnnotationSpec::new("lib.Stereotype").with_argument("value", "service"),
            TypeCategory::Class,
        )
    }

    #[test]
    fn unannotated_classes_are_reported() {
        let run = run(&[SERVICE_PKG]);
        let err = service_rule().check(&run).unwrap_err();

        assert_eq!(err.kind, FailureKind::BadAnnotation);
        assert_eq!(
            err.message,
            "Class \"app.service.Helper\" located on package \"app.service\" should have \"@Stereotype(\"service\")\". \
             Class \"app.service.BillingDao\" located on package \"app.service\" should have \"@Stereotype(\"service\")\"."
        );
    }

    #[test]
    fn allow_list_exempts() {
        let run = run(&[SERVICE_PKG]);
        let rule = service_rule()
            .allow_name_suffix("dao")
            .allow(code_policy_core::predicate::name_ends_with("Helper"));
        assert!(rule.check(&run).is_ok());
    }

    #[test]
    fn only_test_class_unannotated_succeeds() {
        let run = run(&[r#"{
            "file": "src/app/service/S.java", "namespace": "app.service",
            "imports": ["lib.Stereotype"],
            "types": [
                {"name": "SServiceImpl", "annotations": [{"type": "lib.Stereotype", "arguments": {"value": "service"}}]},
                {"name": "SServiceTest"}
            ]
        }"#]);
        assert!(service_rule().check(&run).is_ok());
    }

    #[test]
    fn test_suffix_ignores_case() {
        let run = run(&[r#"{
            "file": "src/app/service/S.java", "namespace": "app.service",
            "imports": ["lib.Stereotype"],
            "types": [
                {"name": "SServiceImpl", "annotations": [{"type": "lib.Stereotype", "arguments": {"value": "service"}}]},
                {"name": "SServicetest"},
                {"name": "SSERVICETEST"}
            ]
        }"#]);
        assert!(service_rule().check(&run).is_ok());
    }

    #[test]
    fn unresolvable_annotation_succeeds() {
        let run = run(&[SERVICE_PKG]);
        let rule = NamespaceAnnotation::new("service", AnnotationSpec::new("lib.Nowhere"), TypeCategory::Class);
        assert!(rule.check(&run).is_ok());
    }
}
