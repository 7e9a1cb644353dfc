//! Core auditor orchestrating one policy run.

use crate::config::{Config, ConfigError, RuleConfig};
use crate::model::Program;
use crate::rule::{PolicyRule, PolicyRuleBox};
use crate::run::{AnalysisRun, RunError};
use crate::source::{ModelSource, ModelSourceBox, SourceRoot};
use crate::types::{AuditReport, Finding};

use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort an audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Building or indexing the forest failed.
    #[error("Analysis run failed: {0}")]
    Run(#[from] RunError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Neither a model source nor a program was supplied.
    #[error("No program model: set a model source or a program")]
    NoModel,
}

/// Builder for configuring an [`Auditor`].
#[derive(Default)]
pub struct AuditorBuilder {
    source: Option<ModelSourceBox>,
    program: Option<Program>,
    roots: Vec<SourceRoot>,
    rules: Vec<PolicyRuleBox>,
    config: Option<Config>,
}

impl AuditorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parser collaborator.
    #[must_use]
    pub fn source<S: ModelSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Uses an already built forest instead of a source.
    #[must_use]
    pub fn program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }

    /// Adds a source root; overrides `analysis.roots` of the configuration.
    #[must_use]
    pub fn root(mut self, root: impl Into<SourceRoot>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Adds a rule to the auditor.
    #[must_use]
    pub fn rule<R: PolicyRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the auditor.
    #[must_use]
    pub fn rule_box(mut self, rule: PolicyRuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = PolicyRuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the auditor.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::NoModel`] if neither a source nor a program was
    /// supplied.
    pub fn build(self) -> Result<Auditor, AuditError> {
        let model = match (self.program, self.source) {
            (Some(program), _) => Model::Program(program),
            (None, Some(source)) => Model::Source(source),
            (None, None) => return Err(AuditError::NoModel),
        };
        let config = self.config.unwrap_or_default();
        let roots = if self.roots.is_empty() {
            config
                .analysis
                .roots
                .iter()
                .map(|r| SourceRoot::new(r.as_str()))
                .collect()
        } else {
            self.roots
        };

        Ok(Auditor {
            model,
            roots,
            rules: self.rules,
            config,
        })
    }
}

enum Model {
    Source(ModelSourceBox),
    Program(Program),
}

/// Runs a set of policy rules over one forest.
///
/// Use [`Auditor::builder()`] to construct an instance.
pub struct Auditor {
    model: Model,
    roots: Vec<SourceRoot>,
    rules: Vec<PolicyRuleBox>,
    config: Config,
}

impl Auditor {
    /// Creates a new builder for configuring an auditor.
    #[must_use]
    pub fn builder() -> AuditorBuilder {
        AuditorBuilder::new()
    }

    /// Returns the source roots handed to the model source.
    #[must_use]
    pub fn roots(&self) -> &[SourceRoot] {
        &self.roots
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Builds a fresh analysis run and evaluates every enabled rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest cannot be built or the symbol index
    /// is inconsistent. Rule failures are findings, not errors.
    pub fn audit(&self) -> Result<AuditReport, AuditError> {
        info!(
            "Starting audit over {} root(s) with {} rule(s)",
            self.roots.len(),
            self.rules.len()
        );
        let run = self.prepare()?;
        let report = self.audit_run(&run);
        info!(
            "Audit complete: {} finding(s) from {} rule(s) over {} declaration(s)",
            report.findings.len(),
            report.rules_checked,
            report.declarations_checked
        );
        Ok(report)
    }

    /// Evaluates every enabled rule against an existing run.
    ///
    /// One rule's failure never prevents the others from running.
    #[must_use]
    pub fn audit_run(&self, run: &AnalysisRun) -> AuditReport {
        let mut report = AuditReport::new();
        report.declarations_checked = run.program().type_count();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            report.rules_checked += 1;
            if let Err(failure) = rule.check(run) {
                debug!(
                    "Rule {} failed with {} violation(s)",
                    rule.name(),
                    failure.violations.len()
                );
                let severity = self
                    .config
                    .rule_severity(rule.name())
                    .unwrap_or_else(|| rule.default_severity());
                report
                    .findings
                    .push(Finding::from_failure(rule.code(), severity, failure));
            }
        }
        report
    }

    fn prepare(&self) -> Result<AnalysisRun, AuditError> {
        let run = match &self.model {
            Model::Source(source) => AnalysisRun::build(source.as_ref(), &self.roots)?,
            Model::Program(program) => {
                AnalysisRun::from_program(program.clone()).map_err(RunError::from)?
            }
        };
        let analysis = &self.config.analysis;
        Ok(run
            .with_known_symbols(analysis.known_symbols.iter().cloned())
            .with_test_suffixes(analysis.test_suffixes.iter().cloned()))
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{FailureKind, PolicyFailure};
    use crate::node::Scope;
    use crate::predicate::{forbidden_symbol, UsageKind};
    use crate::source::SnapshotSource;
    use crate::types::Severity;

    struct NoSqlDate;

    impl PolicyRule for NoSqlDate {
        fn name(&self) -> &str {
            "no-sql-date"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
            let usage = forbidden_symbol(&[UsageKind::Instantiation], &["java.sql.Date".to_string()]);
            let nodes = run.evaluate(&usage, &Scope::Forest);
            run.report(FailureKind::Generic, self.name(), &nodes, |_, at| {
                format!("Don't use SQL date in {at}")
            })
        }
    }

    struct AlwaysOk;

    impl PolicyRule for AlwaysOk {
        fn name(&self) -> &str {
            "always-ok"
        }
        fn code(&self) -> &'static str {
            "TEST002"
        }
        fn check(&self, _run: &AnalysisRun) -> Result<(), PolicyFailure> {
            Ok(())
        }
    }

    fn source() -> SnapshotSource {
        SnapshotSource::new().unit(
            "main",
            r#"{"file": "A.java", "namespace": "app", "types": [{"name": "A", "line": 1,
                "methods": [{"name": "m", "line": 2, "body": [
                    {"kind": "new", "type": "java.sql.Date", "line": 3}
                ]}]}]}"#,
        )
    }

    #[test]
    fn test_builder_requires_model() {
        assert!(matches!(
            Auditor::builder().build(),
            Err(AuditError::NoModel)
        ));
    }

    #[test]
    fn test_roots_default_to_config() {
        let auditor = Auditor::builder()
            .source(source())
            .build()
            .expect("Failed to build auditor");
        assert_eq!(
            auditor.roots(),
            &[SourceRoot::new("main"), SourceRoot::new("test")]
        );
    }

    #[test]
    fn test_audit_collects_findings() {
        let auditor = Auditor::builder()
            .source(source())
            .root("main")
            .rule(NoSqlDate)
            .rule(AlwaysOk)
            .build()
            .expect("Failed to build auditor");

        let report = auditor.audit().expect("audit");
        assert_eq!(report.rules_checked, 2);
        assert_eq!(report.declarations_checked, 1);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].severity, Severity::Warning);
        assert_eq!(report.findings[0].message, "Don't use SQL date in app.A.m() A.java:3");
    }

    #[test]
    fn test_disabled_rule_and_severity_override() {
        let config = Config::parse(
            r#"
[rules.always-ok]
enabled = false

[rules.no-sql-date]
severity = "error"
"#,
        )
        .unwrap();
        let auditor = Auditor::builder()
            .source(source())
            .root("main")
            .rule(NoSqlDate)
            .rule(AlwaysOk)
            .config(config)
            .build()
            .unwrap();

        let report = auditor.audit().unwrap();
        assert_eq!(report.rules_checked, 1);
        assert_eq!(report.findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_unknown_root_aborts() {
        let auditor = Auditor::builder()
            .source(source())
            .root("missing")
            .rule(AlwaysOk)
            .build()
            .unwrap();
        assert!(matches!(auditor.audit(), Err(AuditError::Run(_))));
    }
}
