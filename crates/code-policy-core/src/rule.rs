//! Rule trait for policy checks.

use crate::failure::PolicyFailure;
use crate::run::AnalysisRun;
use crate::types::Severity;

/// A policy rule evaluated against one analysis run.
///
/// A rule reports all of its violations at once: it returns `Ok(())` when
/// nothing matched and one aggregated [`PolicyFailure`] otherwise. Rules are
/// independent; the run they receive is read-only.
///
/// # Example
///
/// ```ignore
/// use code_policy_core::{AnalysisRun, FailureKind, PolicyFailure, PolicyRule, Scope};
/// use code_policy_core::predicate::{forbidden_symbol, UsageKind};
///
/// pub struct NoThreadStop;
///
/// impl PolicyRule for NoThreadStop {
///     fn name(&self) -> &str { "no-thread-stop" }
///     fn code(&self) -> &'static str { "CP900" }
///
///     fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure> {
///         let stop = forbidden_symbol(&[UsageKind::Invocation], &["java.lang.Thread".into()]);
///         let nodes = run.evaluate(&stop, &Scope::Forest);
///         run.report(FailureKind::Generic, self.name(), &nodes, |_, at| {
///             format!("Don't call Thread methods in {at}")
///         })
///     }
/// }
/// ```
pub trait PolicyRule: Send + Sync {
    /// Returns the kebab-case name of this rule instance.
    fn name(&self) -> &str;

    /// Returns the rule code (e.g., "CP001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for failures of this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Evaluates the rule.
    ///
    /// # Errors
    ///
    /// Returns the aggregated failure when any violation is found.
    fn check(&self, run: &AnalysisRun) -> Result<(), PolicyFailure>;
}

/// Type alias for boxed `PolicyRule` trait objects.
pub type PolicyRuleBox = Box<dyn PolicyRule>;
