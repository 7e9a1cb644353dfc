//! Declarative policy rules driven by TOML configuration.
//!
//! Lets a project add forbidden imports, layering constraints and node
//! shapes without writing Rust rule code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! DeclarativeConfig (pure domain model)
//!   ↓ create_rules()
//! Vec<PolicyRuleBox>
//! ```

use crate::{
    ForbiddenImport, NamespaceAnnotation, NamespaceKind, NodeRule, StereotypeLocation,
    StereotypeSuffix,
};
use code_policy_core::predicate::{forbidden_argument, forbidden_symbol, missing_argument};
use code_policy_core::PolicyRuleBox;
use model::{DeclarativeConfig, QualifiedName, RuleDecl};
use tracing::debug;

pub mod config_dto;
pub mod loader;
pub mod model;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and creates all declared rules.
///
/// Returns `Ok(vec![])` if no declarative sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<PolicyRuleBox>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    let config = loader::load(dto)?;
    Ok(create_rules(&config))
}

/// Creates one rule per declaration in a validated [`DeclarativeConfig`].
#[must_use]
pub fn create_rules(config: &DeclarativeConfig) -> Vec<PolicyRuleBox> {
    let rules: Vec<PolicyRuleBox> = config
        .rules()
        .iter()
        .map(|decl| create_rule(config, decl))
        .collect();
    debug!("created {} declarative rules", rules.len());
    rules
}

fn create_rule(config: &DeclarativeConfig, decl: &RuleDecl) -> PolicyRuleBox {
    match decl {
        RuleDecl::ForbiddenImport(d) => {
            let scoped = d
                .allow_scopes
                .iter()
                .filter_map(|name| config.scope(name))
                .flat_map(|scope| scope.patterns().iter().cloned());
            let rule = scoped
                .chain(d.allow_sources.iter().cloned())
                .fold(
                    ForbiddenImport::new(d.prefix.as_str(), d.reason.as_str()),
                    ForbiddenImport::allow_source,
                )
                .named(d.name.as_str())
                .severity(d.severity);
            Box::new(rule)
        }
        RuleDecl::StereotypeLocation(d) => Box::new(
            StereotypeLocation::new(d.annotation.clone(), d.segment.as_str())
                .named(d.name.as_str())
                .severity(d.severity),
        ),
        RuleDecl::NamespaceAnnotation(d) => {
            let rule = NamespaceAnnotation::new(d.segment.as_str(), d.annotation.clone(), d.category)
                .named(d.name.as_str())
                .severity(d.severity);
            let rule = d
                .allow_annotated
                .iter()
                .cloned()
                .fold(rule, NamespaceAnnotation::allow_annotated);
            Box::new(
                d.allow_suffixes
                    .iter()
                    .fold(rule, |rule, suffix| rule.allow_name_suffix(suffix.as_str())),
            )
        }
        RuleDecl::NamespaceKind(d) => {
            let rule = NamespaceKind::new(d.segment.as_str(), d.allowed.clone())
                .named(d.name.as_str())
                .severity(d.severity);
            Box::new(
                d.allow_suffixes
                    .iter()
                    .fold(rule, |rule, suffix| rule.allow_name_suffix(suffix.as_str())),
            )
        }
        RuleDecl::StereotypeSuffix(d) => {
            let rule = StereotypeSuffix::new(d.annotation.clone(), d.suffix.as_str())
                .named(d.name.as_str())
                .severity(d.severity);
            Box::new(if d.exempt_tests { rule.exempt_tests() } else { rule })
        }
        RuleDecl::ForbidUsage(d) => {
            let predicate = forbidden_symbol(&d.kinds, &names(&d.symbols));
            let rule = NodeRule::new(d.name.as_str(), predicate, d.message.as_str()).severity(d.severity);
            Box::new(if d.distinct { rule.distinct() } else { rule })
        }
        RuleDecl::AnnotationArgument(d) => {
            let annotations = names(&d.annotations);
            let predicate = match &d.forbidden_value {
                Some(literal) => forbidden_argument(annotations, d.argument.as_str(), literal.as_str()),
                None => missing_argument(annotations, d.argument.as_str()),
            };
            Box::new(
                NodeRule::new(d.name.as_str(), predicate, d.message.as_str())
                    .distinct()
                    .severity(d.severity),
            )
        }
    }
}

fn names(names: &[QualifiedName]) -> Vec<String> {
    names.iter().map(|n| n.as_str().to_string()).collect()
}
