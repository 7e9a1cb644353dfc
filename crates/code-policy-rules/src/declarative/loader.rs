//! DTO → Domain model conversion with validation.

use super::config_dto::{
    AnnotationArgumentDto, DeclarativeConfigDto, ForbidUsageDto, ForbiddenImportDto,
    NamespaceAnnotationDto, NamespaceKindDto, ScopeDto, StereotypeLocationDto, StereotypeSuffixDto,
};
use super::model::{
    AnnotationArgumentDecl, DeclarativeConfig, ForbidUsageDecl, ForbiddenImportDecl, ModelError,
    NamespaceAnnotationDecl, NamespaceKindDecl, QualifiedName, RuleDecl, RuleName, ScopeName,
    Segment, SourceScope, StereotypeLocationDecl, StereotypeSuffixDecl,
};
use code_policy_core::predicate::{AnnotationSpec, UnknownUsageKind, UsageKind};
use code_policy_core::utils::GlobPattern;
use code_policy_core::{Severity, TypeCategory, UnknownCategory};
use std::collections::BTreeMap;

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "forbidden-import[0].prefix").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown type category.
    #[error("{context}: {source}")]
    UnknownCategory {
        /// Where the error occurred.
        context: String,
        /// The underlying error.
        source: UnknownCategory,
    },

    /// Unknown usage kind.
    #[error("{context}: {source}")]
    UnknownUsageKind {
        /// Where the error occurred.
        context: String,
        /// The underlying error.
        source: UnknownUsageKind,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `DeclarativeConfigDto` to a validated `DeclarativeConfig`.
///
/// Rules keep section order: forbidden imports, stereotype locations,
/// namespace annotations, namespace kinds, stereotype suffixes, forbidden
/// usages, annotation arguments.
///
/// # Errors
///
/// Returns the first field error encountered, or every cross-reference
/// error at once.
pub fn load(dto: DeclarativeConfigDto) -> Result<DeclarativeConfig, LoadError> {
    let scopes = dto
        .scopes
        .iter()
        .enumerate()
        .map(|(i, s)| convert_scope(s, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rules = Vec::new();
    for (i, d) in dto.forbidden_import.into_iter().enumerate() {
        rules.push(RuleDecl::ForbiddenImport(convert_forbidden_import(d, i)?));
    }
    for (i, d) in dto.stereotype_location.into_iter().enumerate() {
        rules.push(RuleDecl::StereotypeLocation(convert_stereotype_location(d, i)?));
    }
    for (i, d) in dto.namespace_annotation.into_iter().enumerate() {
        rules.push(RuleDecl::NamespaceAnnotation(convert_namespace_annotation(d, i)?));
    }
    for (i, d) in dto.namespace_kind.into_iter().enumerate() {
        rules.push(RuleDecl::NamespaceKind(convert_namespace_kind(d, i)?));
    }
    for (i, d) in dto.stereotype_suffix.into_iter().enumerate() {
        rules.push(RuleDecl::StereotypeSuffix(convert_stereotype_suffix(d, i)?));
    }
    for (i, d) in dto.forbid_usage.into_iter().enumerate() {
        rules.push(RuleDecl::ForbidUsage(convert_forbid_usage(d, i)?));
    }
    for (i, d) in dto.annotation_argument.into_iter().enumerate() {
        rules.push(RuleDecl::AnnotationArgument(convert_annotation_argument(d, i)?));
    }

    DeclarativeConfig::new(scopes, rules).map_err(LoadError::CrossRef)
}

fn validation(context: impl Into<String>) -> impl FnOnce(ModelError) -> LoadError {
    let context = context.into();
    move |source| LoadError::Validation { context, source }
}

fn convert_scope(dto: &ScopeDto, index: usize) -> Result<SourceScope, LoadError> {
    let ctx = format!("scopes[{index}]");
    let name = ScopeName::new(&dto.name).map_err(validation(format!("{ctx}.name")))?;
    let patterns = globs(&dto.paths, &format!("{ctx}.paths"))?;
    Ok(SourceScope::new(name, patterns))
}

fn globs(patterns: &[String], ctx: &str) -> Result<Vec<GlobPattern>, LoadError> {
    patterns
        .iter()
        .enumerate()
        .map(|(j, p)| {
            GlobPattern::new(p)
                .map_err(ModelError::from)
                .map_err(validation(format!("{ctx}[{j}]")))
        })
        .collect()
}

fn rule_name(name: &str, ctx: &str) -> Result<RuleName, LoadError> {
    RuleName::new(name).map_err(validation(format!("{ctx}.name")))
}

fn segment(segment: &str, ctx: &str) -> Result<Segment, LoadError> {
    Segment::new(segment).map_err(validation(format!("{ctx}.segment")))
}

fn annotation(
    ty: &str,
    arguments: BTreeMap<String, String>,
    ctx: &str,
) -> Result<AnnotationSpec, LoadError> {
    let ty = QualifiedName::new(ty).map_err(validation(format!("{ctx}.annotation")))?;
    Ok(arguments
        .into_iter()
        .fold(AnnotationSpec::new(ty.as_str()), |spec, (name, literal)| {
            spec.with_argument(name, literal)
        }))
}

fn non_empty<T>(items: Vec<T>, field: &'static str, ctx: &str) -> Result<Vec<T>, LoadError> {
    if items.is_empty() {
        return Err(validation(format!("{ctx}.{field}"))(ModelError::EmptyList { field }));
    }
    Ok(items)
}

fn convert_forbidden_import(dto: ForbiddenImportDto, index: usize) -> Result<ForbiddenImportDecl, LoadError> {
    let ctx = format!("forbidden-import[{index}]");
    let allow_scopes = dto
        .allow_scopes
        .iter()
        .enumerate()
        .map(|(j, s)| ScopeName::new(s).map_err(validation(format!("{ctx}.allow-scopes[{j}]"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForbiddenImportDecl {
        name: rule_name(&dto.name, &ctx)?,
        prefix: QualifiedName::prefix(&dto.prefix).map_err(validation(format!("{ctx}.prefix")))?,
        reason: dto.reason,
        allow_scopes,
        allow_sources: globs(&dto.allow_sources, &format!("{ctx}.allow-sources"))?,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_stereotype_location(
    dto: StereotypeLocationDto,
    index: usize,
) -> Result<StereotypeLocationDecl, LoadError> {
    let ctx = format!("stereotype-location[{index}]");
    Ok(StereotypeLocationDecl {
        name: rule_name(&dto.name, &ctx)?,
        annotation: annotation(&dto.annotation, dto.arguments, &ctx)?,
        segment: segment(&dto.segment, &ctx)?,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_namespace_annotation(
    dto: NamespaceAnnotationDto,
    index: usize,
) -> Result<NamespaceAnnotationDecl, LoadError> {
    let ctx = format!("namespace-annotation[{index}]");
    let allow_annotated = dto
        .allow_annotated
        .iter()
        .map(|ty| annotation(ty, BTreeMap::new(), &format!("{ctx}.allow-annotated")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NamespaceAnnotationDecl {
        name: rule_name(&dto.name, &ctx)?,
        segment: segment(&dto.segment, &ctx)?,
        annotation: annotation(&dto.annotation, dto.arguments, &ctx)?,
        category: parse_category(&dto.kind, &format!("{ctx}.kind"))?,
        allow_annotated,
        allow_suffixes: dto.allow_suffixes,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_namespace_kind(dto: NamespaceKindDto, index: usize) -> Result<NamespaceKindDecl, LoadError> {
    let ctx = format!("namespace-kind[{index}]");
    let allowed = dto
        .kinds
        .iter()
        .enumerate()
        .map(|(j, k)| parse_category(k, &format!("{ctx}.kinds[{j}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NamespaceKindDecl {
        name: rule_name(&dto.name, &ctx)?,
        segment: segment(&dto.segment, &ctx)?,
        allowed: non_empty(allowed, "kinds", &ctx)?,
        allow_suffixes: dto.allow_suffixes,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_stereotype_suffix(
    dto: StereotypeSuffixDto,
    index: usize,
) -> Result<StereotypeSuffixDecl, LoadError> {
    let ctx = format!("stereotype-suffix[{index}]");
    if dto.suffix.is_empty() {
        return Err(validation(format!("{ctx}.suffix"))(ModelError::EmptyList { field: "suffix" }));
    }
    Ok(StereotypeSuffixDecl {
        name: rule_name(&dto.name, &ctx)?,
        annotation: annotation(&dto.annotation, dto.arguments, &ctx)?,
        suffix: dto.suffix,
        exempt_tests: dto.exempt_tests,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_forbid_usage(dto: ForbidUsageDto, index: usize) -> Result<ForbidUsageDecl, LoadError> {
    let ctx = format!("forbid-usage[{index}]");
    let symbols = dto
        .symbols
        .iter()
        .enumerate()
        .map(|(j, s)| QualifiedName::prefix(s).map_err(validation(format!("{ctx}.symbols[{j}]"))))
        .collect::<Result<Vec<_>, _>>()?;
    let kinds = dto
        .kinds
        .iter()
        .enumerate()
        .map(|(j, k)| {
            k.parse::<UsageKind>().map_err(|source| LoadError::UnknownUsageKind {
                context: format!("{ctx}.kinds[{j}]"),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForbidUsageDecl {
        name: rule_name(&dto.name, &ctx)?,
        kinds,
        symbols: non_empty(symbols, "symbols", &ctx)?,
        message: dto.message,
        distinct: dto.distinct,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn convert_annotation_argument(
    dto: AnnotationArgumentDto,
    index: usize,
) -> Result<AnnotationArgumentDecl, LoadError> {
    let ctx = format!("annotation-argument[{index}]");
    let annotations = dto
        .annotations
        .iter()
        .enumerate()
        .map(|(j, a)| QualifiedName::new(a).map_err(validation(format!("{ctx}.annotations[{j}]"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnnotationArgumentDecl {
        name: rule_name(&dto.name, &ctx)?,
        annotations: non_empty(annotations, "annotations", &ctx)?,
        argument: dto.argument,
        forbidden_value: dto.forbidden_value,
        message: dto.message,
        severity: parse_severity(&dto.severity, &ctx)?,
    })
}

fn parse_category(value: &str, context: &str) -> Result<TypeCategory, LoadError> {
    value.parse().map_err(|source| LoadError::UnknownCategory {
        context: context.to_string(),
        source,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    value.parse().map_err(|_| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_and_load(toml_str: &str) -> Result<DeclarativeConfig, LoadError> {
        let dto: DeclarativeConfigDto = toml::from_str(toml_str).unwrap();
        load(dto)
    }

    // -- Happy path --

    #[test]
    fn load_empty_config() {
        let config = parse_and_load("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn load_keeps_section_order() {
        let config = parse_and_load(
            r#"
[[scopes]]
name = "legacy"
paths = ["src/legacy/**"]

[[annotation-argument]]
name = "to-one-optional"
annotations = ["javax.persistence.ManyToOne"]
argument = "optional"
message = "You must set ToOne with optional"

[[forbidden-import]]
name = "forbid-guava"
prefix = "com.google.common."
allow-scopes = ["legacy"]
severity = "warning"

[[namespace-kind]]
name = "api-kind"
segment = "api"
kinds = ["interface", "abstract"]
"#,
        )
        .unwrap();

        let names: Vec<&str> = config.rules().iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["forbid-guava", "api-kind", "to-one-optional"]);
        let RuleDecl::ForbiddenImport(decl) = &config.rules()[0] else {
            panic!("expected a forbidden import");
        };
        assert_eq!(decl.severity, Severity::Warning);
        assert_eq!(decl.prefix.as_str(), "com.google.common.");
    }

    #[test]
    fn load_annotation_arguments() {
        let config = parse_and_load(
            r#"
[[stereotype-location]]
name = "controller-location"
annotation = "lib.Stereotype"
arguments = { value = "controller" }
segment = "controller"
"#,
        )
        .unwrap();
        let RuleDecl::StereotypeLocation(decl) = &config.rules()[0] else {
            panic!("expected a stereotype location");
        };
        assert_eq!(decl.annotation.to_string(), "@Stereotype(\"controller\")");
    }

    #[test]
    fn load_stereotype_suffix_test_exemption() {
        let config = parse_and_load(
            r#"
[[stereotype-suffix]]
name = "service-suffix"
annotation = "lib.Service"
suffix = "ServiceImpl"

[[stereotype-suffix]]
name = "lenient-service-suffix"
annotation = "lib.Service"
suffix = "ServiceImpl"
exempt-tests = true
"#,
        )
        .unwrap();
        let exemptions: Vec<bool> = config
            .rules()
            .iter()
            .map(|rule| match rule {
                RuleDecl::StereotypeSuffix(decl) => decl.exempt_tests,
                _ => panic!("expected a stereotype suffix"),
            })
            .collect();
        assert_eq!(exemptions, vec![false, true]);
    }

    // -- Error cases --

    #[test]
    fn load_rejects_invalid_rule_name() {
        let result = parse_and_load(
            r#"
[[forbidden-import]]
name = "Forbid Guava"
prefix = "com.google."
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Validation { ref context, .. }) if context == "forbidden-import[0].name"
        ));
    }

    #[test]
    fn load_rejects_dotted_segment() {
        let result = parse_and_load(
            r#"
[[namespace-kind]]
name = "k"
segment = "app.api"
kinds = ["interface"]
"#,
        );
        assert!(matches!(result, Err(LoadError::Validation { .. })));
    }

    #[test]
    fn load_rejects_unknown_severity() {
        let result = parse_and_load(
            r#"
[[stereotype-suffix]]
name = "s"
annotation = "lib.Service"
suffix = "ServiceImpl"
severity = "critical"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownSeverity { .. })));
    }

    #[test]
    fn load_rejects_unknown_category_and_usage_kind() {
        let category = parse_and_load(
            r#"
[[namespace-annotation]]
name = "n"
segment = "service"
annotation = "lib.Service"
kind = "record"
"#,
        );
        assert!(matches!(category, Err(LoadError::UnknownCategory { .. })));

        let usage = parse_and_load(
            r#"
[[forbid-usage]]
name = "u"
symbols = ["java.lang.Thread"]
kinds = ["catch"]
message = "m"
"#,
        );
        assert!(matches!(usage, Err(LoadError::UnknownUsageKind { .. })));
    }

    #[test]
    fn load_rejects_empty_symbol_list() {
        let result = parse_and_load(
            r#"
[[forbid-usage]]
name = "u"
symbols = []
message = "m"
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Validation { source: ModelError::EmptyList { field: "symbols" }, .. })
        ));
    }

    #[test]
    fn load_rejects_invalid_glob() {
        let result = parse_and_load(
            r#"
[[forbidden-import]]
name = "f"
prefix = "old."
allow-sources = [""]
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Validation { source: ModelError::Pattern(_), .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_scope_ref() {
        let result = parse_and_load(
            r#"
[[forbidden-import]]
name = "f"
prefix = "old."
allow-scopes = ["nonexistent"]
"#,
        );
        assert!(matches!(result, Err(LoadError::CrossRef(_))));
    }
}
