//! # code-policy-rules
//!
//! Built-in policy rules for code-policy.
//!
//! This crate provides the rule catalog: hygiene rules that ban dangerous
//! API shapes, stereotype rules that keep annotated types in their layer,
//! and a declarative TOML loader for project-specific rules.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CP001 | `forbidden-import` | Forbids references to types under a banned prefix |
//! | CP002 | `stereotype-location` | Requires annotated types to live in a named namespace segment |
//! | CP003 | `namespace-annotation` | Requires types in a namespace segment to carry an annotation |
//! | CP004 | `namespace-kind` | Restricts the type categories allowed in a namespace segment |
//! | CP005 | `stereotype-suffix` | Requires annotated types to carry a name suffix |
//! | CP006 | `implements-interface` | Requires annotated types to implement an interface |
//! | CP007 | `interface-naming` | Requires interfaces of annotated types to carry a name suffix |
//! | CP008 | `rule-base-naming` | Requires users of a policy base type to be named as tests |
//! | CP009 | (instance name) | Reports every node matching a predicate |
//!
//! ## Usage
//!
//! ```ignore
//! use code_policy_core::{Auditor, SnapshotSource};
//! use code_policy_rules::Preset;
//!
//! let auditor = Auditor::builder()
//!     .source(SnapshotSource::new().unit("main", json))
//!     .root("main")
//!     .rules(Preset::All.rules())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod forbidden_import;
mod implements_interface;
mod interface_naming;
mod namespace_annotation;
mod namespace_kind;
mod node_rule;
mod presets;
mod rule_base_naming;
mod stereotype_location;
mod stereotype_suffix;

pub mod declarative;

#[cfg(test)]
mod test_support;

pub use forbidden_import::ForbiddenImport;
pub use implements_interface::ImplementsInterface;
pub use interface_naming::InterfaceNaming;
pub use namespace_annotation::NamespaceAnnotation;
pub use namespace_kind::NamespaceKind;
pub use node_rule::NodeRule;
pub use presets::{
    all_rules, hygiene_rules, stereotype_rules, Preset, PresetError, UnknownPreset,
    DEFAULT_POLICY_BASE,
};
pub use rule_base_naming::RuleBaseNaming;
pub use stereotype_location::StereotypeLocation;
pub use stereotype_suffix::StereotypeSuffix;

/// Re-export core types for convenience.
pub use code_policy_core::{PolicyRule, Severity, Violation};
