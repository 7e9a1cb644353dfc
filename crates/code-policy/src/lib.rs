//! # code-policy
//!
//! Policy-conformance auditor for a parsed codebase.
//!
//! This is the main facade crate that re-exports the engine and the rule
//! catalog, and wires configuration, presets and declarative rules into one
//! call.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! code-policy = "0.4"
//! ```
//!
//! ```rust,ignore
//! // tests/policies.rs
//! #[test]
//! fn policies() {
//!     let source = code_policy::SnapshotSource::new()
//!         .unit("main", include_str!("model/Orders.json"));
//!     code_policy::check(source);
//! }
//! ```
//!
//! This audits the model as part of `cargo test`. Configure via
//! `code-policy.toml` at the workspace root.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use code_policy::{audit_with_config, SnapshotSource};
//!
//! let report = audit_with_config(source, r#"preset = "hygiene""#)?;
//! println!("{}", report.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use code_policy_core::*;

/// Built-in rules, presets and the declarative loader.
pub mod rules {
    pub use code_policy_rules::*;
}

mod runner;

pub use runner::{audit_with_config, audit_with_options, check, check_with, CheckError, CheckOptions};
