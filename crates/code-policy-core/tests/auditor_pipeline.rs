//! Integration test: snapshot source → analysis run → rules → report.
//!
//! Rules here are written against the public API only, the way a
//! downstream crate would write them.

use code_policy_core::predicate::{forbidden_symbol, Predicate, UsageKind};
use code_policy_core::{
    AnalysisRun, AuditError, Auditor, Config, FailureKind, Node, PolicyFailure, PolicyRule,
    RunError, Scope, Severity, SnapshotSource, SourceError,
};

const JOBS: &str = r#"{
    "file": "src/main/java/app/jobs/Jobs.java", "namespace": "app.jobs",
    "imports": ["old.Legacy"],
    "types": [{
        "name": "Jobs", "line": 3,
        "methods": [{"name": "run", "parameters": ["int"], "line": 5, "body": [
            {"kind": "throw", "type": "java.lang.RuntimeException", "line": 6},
            {"kind": "throw", "type": "java.lang.RuntimeException", "line": 8}
        ]}]
    }]
}"#;

const JOBS_TEST: &str = r#"{
    "file": "src/test/java/app/jobs/JobsTest.java", "namespace": "app.jobs",
    "types": [{"name": "JobsTest", "line": 1,
        "fields": [{"name": "jobs", "type": "app.jobs.Jobs", "line": 2}]}]
}"#;

/// Reports each `throw new RuntimeException(..)`.
struct NoRuntimeThrow;

impl PolicyRule for NoRuntimeThrow {
    fn name(&self) -> &str {
        "no-runtime-throw"
    }

    fn code(&self) -> &'static str {
        "CP900"
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        let predicate = forbidden_symbol(&[UsageKind::Throw], &["java.lang.RuntimeException".to_string()]);
        let nodes = run.evaluate(&predicate, &Scope::Forest);
        run.report(FailureKind::Generic, self.name(), &nodes, |_, location| {
            format!("Don't throw RuntimeException in {location}")
        })
    }
}

/// Reports every user of `old.` types, visiting only index hits.
struct NoLegacyUsers;

impl PolicyRule for NoLegacyUsers {
    fn name(&self) -> &str {
        "no-legacy-users"
    }

    fn code(&self) -> &'static str {
        "CP901"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
        let declarations = Predicate::new("declaration", |node| matches!(node, Node::Type(_)));
        let nodes = run.evaluate(&declarations, &run.users_of("old."));
        run.report(FailureKind::BadImport, self.name(), &nodes, |_, location| {
            format!("{location} uses a legacy type")
        })
    }
}

fn source() -> SnapshotSource {
    SnapshotSource::new()
        .unit("main", JOBS)
        .unit("test", JOBS_TEST)
}

fn auditor(config: Config) -> Auditor {
    Auditor::builder()
        .source(source())
        .config(config)
        .rule(NoRuntimeThrow)
        .rule(NoLegacyUsers)
        .build()
        .expect("auditor should build")
}

#[test]
fn every_rule_reports_once() {
    let report = auditor(Config::default()).audit().expect("audit should run");

    assert_eq!(report.rules_checked, 2);
    assert_eq!(report.declarations_checked, 2);
    assert_eq!(report.findings.len(), 2);

    let throw = &report.findings[0];
    assert_eq!(throw.rule, "no-runtime-throw");
    assert_eq!(throw.severity, Severity::Error);
    assert_eq!(throw.violations.len(), 2);
    assert_eq!(
        throw.message,
        "Don't throw RuntimeException in app.jobs.Jobs.run(int) Jobs.java:6\n\
         Don't throw RuntimeException in app.jobs.Jobs.run(int) Jobs.java:8"
    );

    let legacy = &report.findings[1];
    assert_eq!(legacy.kind, FailureKind::BadImport);
    assert_eq!(legacy.severity, Severity::Warning);
    assert_eq!(legacy.message, "app.jobs.Jobs. uses a legacy type.");
}

#[test]
fn config_disables_and_overrides() {
    let config = Config::parse(
        r#"
[rules.no-runtime-throw]
enabled = false

[rules.no-legacy-users]
severity = "error"
"#,
    )
    .expect("config should parse");
    let report = auditor(config).audit().expect("audit should run");

    assert_eq!(report.rules_checked, 1);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].severity, Severity::Error);
    assert!(report.has_failures_at(Severity::Error));
}

#[test]
fn threshold_filters_the_test_report() {
    let config = Config::parse(
        r#"
[rules.no-runtime-throw]
enabled = false
"#,
    )
    .expect("config should parse");
    let report = auditor(config).audit().expect("audit should run");

    assert!(!report.has_failures_at(Severity::Error));
    assert!(report.has_failures_at(Severity::Warning));
    let text = report.format_test_report(Severity::Warning);
    assert!(text.contains("=== code-policy: 1 failure(s) ==="));
    assert!(text.contains("no-legacy-users [CP901] bad-import"));
}

#[test]
fn configured_roots_select_units() {
    let config = Config::parse(
        r#"
[analysis]
roots = ["main"]
"#,
    )
    .expect("config should parse");
    let report = auditor(config).audit().expect("audit should run");
    assert_eq!(report.declarations_checked, 1);
}

#[test]
fn unknown_root_aborts_the_audit() {
    let auditor = Auditor::builder()
        .source(source())
        .root("integration")
        .rule(NoRuntimeThrow)
        .build()
        .expect("auditor should build");

    assert!(matches!(
        auditor.audit(),
        Err(AuditError::Run(RunError::Source(SourceError::UnknownRoot { .. })))
    ));
}

#[test]
fn missing_model_is_rejected() {
    assert!(matches!(
        Auditor::builder().rule(NoRuntimeThrow).build(),
        Err(AuditError::NoModel)
    ));
}
