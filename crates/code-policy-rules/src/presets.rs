//! Rule presets: the built-in vocabulary of the rule catalog.

use crate::{
    ForbiddenImport, ImplementsInterface, InterfaceNaming, NamespaceAnnotation, NamespaceKind,
    NodeRule, RuleBaseNaming, StereotypeLocation, StereotypeSuffix,
};
use code_policy_core::predicate::{
    annotated, bare_instantiation, forbidden_argument, forbidden_symbol, invocation,
    missing_argument, name_ends_with_ignore_case, receiver_field, AnnotationSpec, UsageKind,
};
use code_policy_core::utils::{GlobPattern, PatternError};
use code_policy_core::{Config, PolicyRuleBox, TypeCategory};
use std::str::FromStr;

/// Base type of policy suites checked by `rule-base-naming`.
pub const DEFAULT_POLICY_BASE: &str = "code.policy.PolicySuite";

const CONTROLLER: &str = "org.springframework.stereotype.Controller";
const SERVICE: &str = "org.springframework.stereotype.Service";
const REPOSITORY: &str = "org.springframework.stereotype.Repository";
const ENTITY: &str = "javax.persistence.Entity";
const REST_CONTROLLER: &str = "org.springframework.web.bind.annotation.RestController";
const MAPPED_SUPERCLASS: &str = "javax.persistence.MappedSuperclass";

/// `(rule name, banned prefix, reason)`.
const FORBIDDEN_IMPORTS: &[(&str, &str, &str)] = &[
    ("forbid-junit-assert", "org.junit.Assert", "Don't use old Junit Assert"),
    ("forbid-junit-runner", "org.junit.runner", "Don't use old Junit Runner"),
    ("forbid-junit-test", "org.junit.Test", "Don't use old Junit Test"),
    ("forbid-junit-framework", "junit.framework", "Don't use Junit internal classes"),
    ("forbid-sql-date", "java.sql.Date", "Don't use SQL date"),
    ("forbid-commons-lang2", "org.apache.commons.lang.", "Use commons lang 3"),
    ("forbid-commons-collections3", "org.apache.commons.collections.", "Use commons collection 4"),
];

/// Preset configurations for code-policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Code hygiene: forbidden shapes and outdated libraries.
    Hygiene,
    /// Spring stereotype layering and naming.
    Stereotypes,
    /// Every built-in rule.
    All,
    /// No built-in rule; declarative rules only.
    None,
}

/// Unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}`, expected: hygiene, stereotypes, all, none")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hygiene" => Ok(Self::Hygiene),
            "stereotypes" => Ok(Self::Stereotypes),
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

/// Errors building a preset from configuration.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// `preset` names no preset.
    #[error(transparent)]
    Unknown(#[from] UnknownPreset),

    /// An `allow_sources` entry is not a valid glob.
    #[error("[rules.{rule}]: {source}")]
    Pattern {
        /// Rule whose options are invalid.
        rule: String,
        /// Underlying error.
        source: PatternError,
    },
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<PolicyRuleBox> {
        match self {
            Self::Hygiene => hygiene_rules(),
            Self::Stereotypes => stereotype_rules(),
            Self::All => all_rules(),
            Self::None => Vec::new(),
        }
    }

    /// Returns the rules for this preset with `[rules.<name>]` options
    /// applied (`allow_sources` for forbidden imports, `base` and `suffix`
    /// for `rule-base-naming`).
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::Pattern`] for an invalid source pattern.
    pub fn configured_rules(self, config: &Config) -> Result<Vec<PolicyRuleBox>, PresetError> {
        let hygiene = || configured_hygiene(config);
        Ok(match self {
            Self::Hygiene => hygiene()?,
            Self::Stereotypes => stereotype_rules(),
            Self::All => {
                let mut rules = hygiene()?;
                rules.extend(stereotype_rules());
                rules
            }
            Self::None => Vec::new(),
        })
    }
}

/// Returns the hygiene rules.
///
/// Includes:
/// - eight node rules (`no-bare-illegal-argument`, `no-system-streams`,
///   `no-print-stack-trace`, `to-one-optional`, `to-many-not-eager`,
///   `no-suppress-warnings`, `no-throw-runtime-exception`,
///   `no-throw-null-pointer-exception`)
/// - forbidden imports of old JUnit, `java.sql.Date`, commons-lang 2 and
///   commons-collections 3
/// - `rule-base-naming` over [`DEFAULT_POLICY_BASE`]
#[must_use]
pub fn hygiene_rules() -> Vec<PolicyRuleBox> {
    let mut rules = node_rules();
    rules.extend(
        FORBIDDEN_IMPORTS
            .iter()
            .map(|&(name, prefix, reason)| boxed(ForbiddenImport::new(prefix, reason).named(name))),
    );
    rules.push(boxed(RuleBaseNaming::new(DEFAULT_POLICY_BASE)));
    rules
}

fn configured_hygiene(config: &Config) -> Result<Vec<PolicyRuleBox>, PresetError> {
    let mut rules = node_rules();
    for &(name, prefix, reason) in FORBIDDEN_IMPORTS {
        let mut rule = ForbiddenImport::new(prefix, reason).named(name);
        if let Some(options) = config.rules.get(name) {
            for pattern in options.get_str_array("allow_sources") {
                let glob = GlobPattern::new(&pattern).map_err(|source| PresetError::Pattern {
                    rule: name.to_string(),
                    source,
                })?;
                rule = rule.allow_source(glob);
            }
        }
        rules.push(boxed(rule));
    }

    let options = config.rules.get(crate::rule_base_naming::NAME);
    let base = options
        .and_then(|o| o.get_str("base"))
        .unwrap_or(DEFAULT_POLICY_BASE);
    let mut base_naming = RuleBaseNaming::new(base);
    if let Some(suffix) = options.and_then(|o| o.get_str("suffix")) {
        base_naming = base_naming.suffix(suffix);
    }
    rules.push(boxed(base_naming));
    Ok(rules)
}

fn node_rules() -> Vec<PolicyRuleBox> {
    let strings = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
    let throw_message = "Never use RuntimeException (use InternalErrorException instead)";

    vec![
        boxed(NodeRule::new(
            "no-bare-illegal-argument",
            bare_instantiation(strings(&["java.lang.IllegalArgumentException"])),
            "Don't use java.lang.IllegalArgumentException without message",
        )),
        boxed(NodeRule::new(
            "no-system-streams",
            receiver_field("java.lang.System", strings(&["out", "err"])),
            "Don't use sys.out/sys.err",
        )),
        boxed(NodeRule::new(
            "no-print-stack-trace",
            invocation(
                strings(&["java.lang.Throwable"]),
                "printStackTrace",
                strings(&["PrintStream", "PrintWriter"]),
            ),
            "Don't use printStackTrace",
        )),
        boxed(
            NodeRule::new(
                "to-one-optional",
                missing_argument(
                    strings(&["javax.persistence.ManyToOne", "javax.persistence.OneToOne"]),
                    "optional",
                ),
                "You must set ToOne with optional",
            )
            .distinct(),
        ),
        boxed(
            NodeRule::new(
                "to-many-not-eager",
                forbidden_argument(
                    strings(&["javax.persistence.OneToMany", "javax.persistence.ManyToMany"]),
                    "fetch",
                    "EAGER",
                ),
                "You must set ToMany with not EAGER",
            )
            .distinct(),
        ),
        boxed(
            NodeRule::new(
                "no-suppress-warnings",
                forbidden_symbol(&[UsageKind::Annotation], &strings(&["java.lang.SuppressWarnings"])),
                "Never use @SuppressWarnings",
            )
            .distinct(),
        ),
        boxed(NodeRule::new(
            "no-throw-runtime-exception",
            forbidden_symbol(&[UsageKind::Throw], &strings(&["java.lang.RuntimeException"])),
            throw_message,
        )),
        boxed(NodeRule::new(
            "no-throw-null-pointer-exception",
            forbidden_symbol(&[UsageKind::Throw], &strings(&["java.lang.NullPointerException"])),
            throw_message,
        )),
    ]
}

/// Returns the stereotype rules.
///
/// For each of controller, entity, repository and service: layering
/// (`<s>-location`), reverse layering by annotation (`<s>-namespace-annotation`)
/// and by kind (`<s>-namespace-kind`). Services additionally get
/// `service-suffix` (`*ServiceImpl`), `service-implements-interface` and
/// `service-interface-naming` (`*Service`).
#[must_use]
pub fn stereotype_rules() -> Vec<PolicyRuleBox> {
    let spec = AnnotationSpec::new;
    let layering = [
        ("controller", CONTROLLER),
        ("entity", ENTITY),
        ("repository", REPOSITORY),
        ("service", SERVICE),
    ];

    let mut rules: Vec<PolicyRuleBox> = layering
        .iter()
        .map(|&(segment, annotation)| {
            boxed(StereotypeLocation::new(spec(annotation), segment).named(format!("{segment}-location")))
        })
        .collect();

    rules.extend([
        boxed(
            NamespaceAnnotation::new("controller", spec(CONTROLLER), TypeCategory::Class)
                .named("controller-namespace-annotation")
                .allow_annotated(spec(REST_CONTROLLER)),
        ),
        boxed(
            NamespaceAnnotation::new("entity", spec(ENTITY), TypeCategory::Class)
                .named("entity-namespace-annotation")
                .allow_annotated(spec(MAPPED_SUPERCLASS)),
        ),
        boxed(
            NamespaceAnnotation::new("repository", spec(REPOSITORY), TypeCategory::Interface)
                .named("repository-namespace-annotation")
                .allow_name_suffix("dao"),
        ),
        boxed(
            NamespaceAnnotation::new("service", spec(SERVICE), TypeCategory::Class)
                .named("service-namespace-annotation"),
        ),
    ]);

    rules.extend([
        boxed(
            NamespaceKind::new("controller", vec![TypeCategory::Class])
                .named("controller-namespace-kind"),
        ),
        boxed(
            NamespaceKind::new("entity", vec![TypeCategory::Class, TypeCategory::Abstract])
                .named("entity-namespace-kind"),
        ),
        boxed(
            NamespaceKind::new("repository", vec![TypeCategory::Interface])
                .named("repository-namespace-kind")
                .allow(annotated(spec(REPOSITORY)).and(name_ends_with_ignore_case("daoimpl"))),
        ),
        boxed(
            NamespaceKind::new(
                "service",
                vec![TypeCategory::Interface, TypeCategory::Class, TypeCategory::Abstract],
            )
            .named("service-namespace-kind"),
        ),
    ]);

    rules.extend([
        boxed(StereotypeSuffix::new(spec(SERVICE), "ServiceImpl").named("service-suffix")),
        boxed(ImplementsInterface::new(spec(SERVICE)).named("service-implements-interface")),
        boxed(InterfaceNaming::new(spec(SERVICE), "Service").named("service-interface-naming")),
    ]);
    rules
}

/// Returns all built-in rules.
#[must_use]
pub fn all_rules() -> Vec<PolicyRuleBox> {
    let mut rules = hygiene_rules();
    rules.extend(stereotype_rules());
    rules
}

fn boxed<R: code_policy_core::PolicyRule + 'static>(rule: R) -> PolicyRuleBox {
    Box::new(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(rules: &[PolicyRuleBox]) -> Vec<String> {
        rules.iter().map(|r| r.name().to_string()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Hygiene.rules().len(), 16);
        assert_eq!(Preset::Stereotypes.rules().len(), 15);
        assert_eq!(Preset::All.rules().len(), 31);
        assert!(Preset::None.rules().is_empty());
    }

    #[test]
    fn test_rule_names_are_unique() {
        let all = names(&all_rules());
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.contains(&"forbid-sql-date".to_string()));
        assert!(all.contains(&"service-interface-naming".to_string()));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("stereotypes".parse::<Preset>(), Ok(Preset::Stereotypes));
        assert_eq!(
            "strict".parse::<Preset>(),
            Err(UnknownPreset("strict".to_string()))
        );
    }

    #[test]
    fn test_configured_rules_apply_options() {
        let config = Config::parse(
            r#"
[rules.forbid-sql-date]
allow_sources = ["src/legacy/**"]

[rules.rule-base-naming]
base = "acme.ArchRules"
"#,
        )
        .unwrap();
        let rules = Preset::Hygiene.configured_rules(&config).unwrap();
        assert_eq!(names(&rules), names(&hygiene_rules()));
    }

    #[test]
    fn test_configured_rules_reject_bad_glob() {
        let config = Config::parse(
            r#"
[rules.forbid-sql-date]
allow_sources = ["src/[legacy"]
"#,
        )
        .unwrap();
        let err = Preset::All.configured_rules(&config).err().expect("expected an error");
        assert!(matches!(err, PresetError::Pattern { rule, .. } if rule == "forbid-sql-date"));
    }
}
