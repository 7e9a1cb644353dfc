//! # code-policy-core
//!
//! Core engine for auditing a parsed codebase against architectural and
//! hygiene policies.
//!
//! This crate provides:
//!
//! - the program model ([`Program`]) and its JSON snapshot loader
//! - the [`SymbolIndex`] (who references what, and the inverse)
//! - the [`LocationRenderer`] for diagnostics
//! - composable node [`Predicate`]s
//! - the rule engine ([`AnalysisRun`]) and failure aggregation
//! - the [`PolicyRule`] trait and the [`Auditor`] that runs rules
//!
//! ## Example
//!
//! ```ignore
//! use code_policy_core::{Auditor, SnapshotSource};
//!
//! let source = SnapshotSource::new().unit("main", include_str!("model/Foo.json"));
//! let auditor = Auditor::builder()
//!     .source(source)
//!     .root("main")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = auditor.audit()?;
//! println!("{}", report.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auditor;
mod category;
mod config;
mod failure;
mod index;
mod location;
mod node;
mod rule;
mod run;
mod source;
mod symbols;
mod types;

pub mod model;
pub mod predicate;
pub mod snapshot;
/// Utility modules for rule implementations.
pub mod utils;

pub use auditor::{AuditError, Auditor, AuditorBuilder};
pub use category::{TypeCategory, UnknownCategory};
pub use config::{AnalysisConfig, Config, ConfigError, RuleConfig};
pub use failure::{aggregate, FailureKind, PolicyFailure, Violation};
pub use index::{IndexError, ReferenceFault, ReferenceModel, SymbolIndex};
pub use location::{LocationRenderer, PathStep};
pub use model::{ModelError, Program, ProgramBuilder, TypeDecl};
pub use node::{walk, AnnotationTarget, ExprSite, Node, Scope};
pub use predicate::Predicate;
pub use rule::{PolicyRule, PolicyRuleBox};
pub use run::{AnalysisRun, RunError};
pub use source::{ModelSource, ModelSourceBox, SnapshotSource, SourceError, SourceRoot};
pub use symbols::{SymbolRegistry, UnresolvedSymbol, WELL_KNOWN_SYMBOLS};
pub use types::{AuditReport, Finding, Severity, UnknownSeverity};
