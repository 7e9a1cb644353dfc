//! Composable node predicates.
//!
//! A [`Predicate`] is a labelled, pure `Node -> bool` closure. Every family
//! below answers `false` for node categories it does not apply to, so
//! predicates can be combined freely with [`Predicate::and`],
//! [`Predicate::or`] and [`Predicate::negate`].

use crate::category::TypeCategory;
use crate::model::{Annotation, ExpressionKind, Parent};
use crate::node::Node;
use crate::utils::paths::{self, last_segment, segment_contains};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type TestFn = dyn Fn(&Node<'_>) -> bool + Send + Sync;

/// A labelled node predicate.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    test: Arc<TestFn>,
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Predicate {
    /// Wraps a closure.
    pub fn new<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Node<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn test(&self, node: &Node<'_>) -> bool {
        (self.test)(node)
    }

    /// Both predicates hold.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let label = format!("({} and {})", self.label, other.label);
        Self::new(label, move |n| self.test(n) && other.test(n))
    }

    /// Either predicate holds.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let label = format!("({} or {})", self.label, other.label);
        Self::new(label, move |n| self.test(n) || other.test(n))
    }

    /// The predicate does not hold.
    #[must_use]
    pub fn negate(self) -> Self {
        let label = format!("not {}", self.label);
        Self::new(label, move |n| !self.test(n))
    }

    /// At least one of `predicates` holds; false when empty.
    #[must_use]
    pub fn any(predicates: Vec<Self>) -> Self {
        let label = join_labels(&predicates, " or ");
        Self::new(label, move |n| predicates.iter().any(|p| p.test(n)))
    }

    /// All of `predicates` hold; true when empty.
    #[must_use]
    pub fn all(predicates: Vec<Self>) -> Self {
        let label = join_labels(&predicates, " and ");
        Self::new(label, move |n| predicates.iter().all(|p| p.test(n)))
    }
}

fn join_labels(predicates: &[Predicate], separator: &str) -> String {
    let labels: Vec<&str> = predicates.iter().map(Predicate::label).collect();
    format!("({})", labels.join(separator))
}

// ────────────────────────────────────────────
// Forbidden-symbol usage
// ────────────────────────────────────────────

/// Node categories that mention a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    /// Constructor call of the symbol.
    Instantiation,
    /// Invocation of a member declared by the symbol.
    Invocation,
    /// `throw` of the symbol.
    Throw,
    /// Bare type reference to the symbol.
    TypeReference,
    /// Read of a field owned by the symbol.
    FieldAccess,
    /// Annotation usage of the symbol.
    Annotation,
}

impl UsageKind {
    /// Every usage kind.
    pub const ALL: [Self; 6] = [
        Self::Instantiation,
        Self::Invocation,
        Self::Throw,
        Self::TypeReference,
        Self::FieldAccess,
        Self::Annotation,
    ];

    /// Classifies a node and returns the symbol it mentions.
    #[must_use]
    pub fn of<'p>(node: &Node<'p>) -> Option<(Self, &'p str)> {
        match *node {
            Node::Expression { expr, .. } => {
                let kind = match expr.kind {
                    ExpressionKind::Instantiation { .. } => Self::Instantiation,
                    ExpressionKind::Invocation { .. } => Self::Invocation,
                    ExpressionKind::Throw { .. } => Self::Throw,
                    ExpressionKind::TypeReference { .. } => Self::TypeReference,
                    ExpressionKind::FieldAccess(_) => Self::FieldAccess,
                };
                Some((kind, expr.referenced_type()))
            }
            Node::Annotation { annotation, .. } => Some((Self::Annotation, &annotation.ty)),
            _ => None,
        }
    }
}

/// Unknown usage kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown usage kind `{0}`, expected: instantiation, invocation, throw, type-reference, field-access, annotation"
)]
pub struct UnknownUsageKind(pub String);

impl FromStr for UsageKind {
    type Err = UnknownUsageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instantiation" => Ok(Self::Instantiation),
            "invocation" => Ok(Self::Invocation),
            "throw" => Ok(Self::Throw),
            "type-reference" => Ok(Self::TypeReference),
            "field-access" => Ok(Self::FieldAccess),
            "annotation" => Ok(Self::Annotation),
            other => Err(UnknownUsageKind(other.to_string())),
        }
    }
}

/// Usage nodes of the given kinds whose symbol equals or starts with one of
/// `prefixes`. An empty `kinds` slice means every kind.
#[must_use]
pub fn forbidden_symbol(kinds: &[UsageKind], prefixes: &[String]) -> Predicate {
    let kinds: Vec<UsageKind> = if kinds.is_empty() {
        UsageKind::ALL.to_vec()
    } else {
        kinds.to_vec()
    };
    let prefixes = prefixes.to_vec();
    let label = format!("forbidden-symbol({})", prefixes.join(", "));
    Predicate::new(label, move |node| {
        UsageKind::of(node).is_some_and(|(kind, symbol)| {
            kinds.contains(&kind) && prefixes.iter().any(|p| symbol.starts_with(p.as_str()))
        })
    })
}

// ────────────────────────────────────────────
// Annotations
// ────────────────────────────────────────────

/// An annotation type with optional required argument literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpec {
    ty: String,
    arguments: Vec<(String, String)>,
}

impl AnnotationSpec {
    /// Matches any usage of `ty`.
    #[must_use]
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            arguments: Vec::new(),
        }
    }

    /// Additionally requires argument `name` to match `literal`.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.arguments.push((name.into(), literal.into()));
        self
    }

    /// Returns the qualified annotation type.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Tests one annotation usage.
    #[must_use]
    pub fn matches(&self, annotation: &Annotation) -> bool {
        annotation.ty == self.ty
            && self.arguments.iter().all(|(name, literal)| {
                annotation
                    .argument(name)
                    .is_some_and(|v| v.matches_literal(literal))
            })
    }

    /// Tests whether any of `annotations` matches.
    #[must_use]
    pub fn present_on(&self, annotations: &[Annotation]) -> bool {
        annotations.iter().any(|a| self.matches(a))
    }
}

impl fmt::Display for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", last_segment(&self.ty))?;
        match self.arguments.as_slice() {
            [] => Ok(()),
            [(name, literal)] if name == "value" => write!(f, "(\"{literal}\")"),
            args => {
                let parts: Vec<String> = args
                    .iter()
                    .map(|(name, literal)| format!("{name}=\"{literal}\""))
                    .collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// Declarations (types, methods, fields) carrying a matching annotation.
#[must_use]
pub fn annotated(spec: AnnotationSpec) -> Predicate {
    let label = format!("annotated({spec})");
    Predicate::new(label, move |node| spec.present_on(node.annotations()))
}

/// Builder for the annotation-presence family.
///
/// Test-named declarations are excluded unless [`include_tests`] is called.
///
/// [`include_tests`]: AnnotationPresence::include_tests
#[derive(Debug, Clone)]
pub struct AnnotationPresence {
    spec: AnnotationSpec,
    missing: bool,
    category: Option<TypeCategory>,
    test_suffixes: Vec<String>,
}

impl AnnotationPresence {
    /// Declarations lacking the annotation.
    #[must_use]
    pub fn missing(spec: AnnotationSpec) -> Self {
        Self::with(spec, true)
    }

    /// Declarations having the annotation.
    #[must_use]
    pub fn present(spec: AnnotationSpec) -> Self {
        Self::with(spec, false)
    }

    fn with(spec: AnnotationSpec, missing: bool) -> Self {
        Self {
            spec,
            missing,
            category: None,
            test_suffixes: paths::DEFAULT_TEST_SUFFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Restricts to type declarations of one category.
    #[must_use]
    pub fn of_category(mut self, category: TypeCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Replaces the test suffixes.
    #[must_use]
    pub fn test_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps test-named declarations.
    #[must_use]
    pub fn include_tests(mut self) -> Self {
        self.test_suffixes.clear();
        self
    }

    /// Finishes the predicate.
    #[must_use]
    pub fn build(self) -> Predicate {
        let label = format!(
            "{}({})",
            if self.missing { "lacks" } else { "has" },
            self.spec
        );
        Predicate::new(label, move |node| {
            let Some(name) = declaration_name(node) else {
                return false;
            };
            if let Some(category) = self.category {
                if !node.as_type().is_some_and(|t| category.matches(t)) {
                    return false;
                }
            }
            if paths::is_test_name(name, &self.test_suffixes) {
                return false;
            }
            self.spec.present_on(node.annotations()) != self.missing
        })
    }
}

fn declaration_name<'p>(node: &Node<'p>) -> Option<&'p str> {
    match node {
        Node::Type(_) | Node::Method { .. } | Node::Field { .. } => node.simple_name(),
        _ => None,
    }
}

// ────────────────────────────────────────────
// Namespaces, kinds, names
// ────────────────────────────────────────────

/// Types whose namespace's last segment neither starts nor ends with
/// `segment`.
#[must_use]
pub fn outside_namespace(segment: impl Into<String>) -> Predicate {
    let segment = segment.into();
    let label = format!("outside-namespace(*{segment})");
    Predicate::new(label, move |node| {
        node.as_type().is_some_and(|t| {
            !segment_contains(t.namespace_name(), &segment)
        })
    })
}

/// Top-level types directly inside a namespace whose last segment starts or
/// ends with `segment`. Nested types never match.
#[must_use]
pub fn directly_in_namespace(segment: impl Into<String>) -> Predicate {
    let segment = segment.into();
    let label = format!("in-namespace(*{segment})");
    Predicate::new(label, move |node| {
        node.as_type().is_some_and(|t| {
            matches!(t.parent(), Parent::Namespace(_))
                && segment_contains(t.namespace_name(), &segment)
        })
    })
}

/// Type declarations of `category`.
#[must_use]
pub fn of_category(category: TypeCategory) -> Predicate {
    Predicate::new(format!("category({category})"), move |node| {
        node.as_type().is_some_and(|t| category.matches(t))
    })
}

/// Type declarations matching none of `allowed`.
#[must_use]
pub fn kind_not_in(allowed: Vec<TypeCategory>) -> Predicate {
    let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    let label = format!("kind-not-in({})", names.join(", "));
    Predicate::new(label, move |node| {
        node.as_type()
            .is_some_and(|t| !TypeCategory::any_matches(&allowed, t))
    })
}

/// Declarations whose simple name ends with `suffix`.
#[must_use]
pub fn name_ends_with(suffix: impl Into<String>) -> Predicate {
    let suffix = suffix.into();
    Predicate::new(format!("name-ends-with({suffix})"), move |node| {
        declaration_name(node).is_some_and(|n| n.ends_with(suffix.as_str()))
    })
}

/// Declarations whose simple name ends with `suffix`, ignoring ASCII case.
#[must_use]
pub fn name_ends_with_ignore_case(suffix: impl Into<String>) -> Predicate {
    let suffix = suffix.into().to_ascii_lowercase();
    Predicate::new(format!("name-ends-with-ignore-case({suffix})"), move |node| {
        declaration_name(node).is_some_and(|n| n.to_ascii_lowercase().ends_with(suffix.as_str()))
    })
}

/// Declarations whose simple name ends with one of the test suffixes.
#[must_use]
pub fn test_named(suffixes: Vec<String>) -> Predicate {
    Predicate::new("test-named", move |node| {
        declaration_name(node).is_some_and(|n| paths::is_test_name(n, &suffixes))
    })
}

/// Types whose qualified name matches a dotted pattern (`*`, `**`).
#[must_use]
pub fn qualified_name_matches(pattern: impl Into<String>) -> Predicate {
    let pattern = pattern.into();
    Predicate::new(format!("name-matches({pattern})"), move |node| {
        node.as_type()
            .is_some_and(|t| paths::path_matches(t.qualified_name(), &pattern))
    })
}

// ────────────────────────────────────────────
// Argument shape
// ────────────────────────────────────────────

/// Usages of the annotation types that do not set argument `argument`.
#[must_use]
pub fn missing_argument(annotation_types: Vec<String>, argument: impl Into<String>) -> Predicate {
    let argument = argument.into();
    let label = format!("missing-argument({}: {argument})", annotation_types.join(", "));
    Predicate::new(label, move |node| match node {
        Node::Annotation { annotation, .. } => {
            annotation_types.contains(&annotation.ty) && annotation.argument(&argument).is_none()
        }
        _ => false,
    })
}

/// Usages of the annotation types whose argument `argument` matches
/// `literal`.
#[must_use]
pub fn forbidden_argument(
    annotation_types: Vec<String>,
    argument: impl Into<String>,
    literal: impl Into<String>,
) -> Predicate {
    let argument = argument.into();
    let literal = literal.into();
    let label = format!(
        "forbidden-argument({}: {argument}={literal})",
        annotation_types.join(", ")
    );
    Predicate::new(label, move |node| match node {
        Node::Annotation { annotation, .. } => {
            annotation_types.contains(&annotation.ty)
                && annotation
                    .argument(&argument)
                    .is_some_and(|v| v.matches_literal(&literal))
        }
        _ => false,
    })
}

// ────────────────────────────────────────────
// Expression shape
// ────────────────────────────────────────────

/// Constructor calls of `types` without arguments.
#[must_use]
pub fn bare_instantiation(types: Vec<String>) -> Predicate {
    let label = format!("bare-instantiation({})", types.join(", "));
    Predicate::new(label, move |node| match node {
        Node::Expression { expr, .. } => matches!(
            &expr.kind,
            ExpressionKind::Instantiation { ty, arguments } if arguments.is_empty() && types.contains(ty)
        ),
        _ => false,
    })
}

/// Invocations of `method` declared by one of `declaring_types`, unless the
/// first argument's simple name is one of `allowed_first_arguments`
/// (case-insensitive).
///
/// The declaring type is compared exactly. Snapshots record the type that
/// declares the invoked method, not the receiver's static type, so
/// `e.printStackTrace()` on a `java.lang.Exception` carries
/// `java.lang.Throwable`.
#[must_use]
pub fn invocation(
    declaring_types: Vec<String>,
    method: impl Into<String>,
    allowed_first_arguments: Vec<String>,
) -> Predicate {
    let method = method.into();
    let label = format!("invocation({}#{method})", declaring_types.join(", "));
    Predicate::new(label, move |node| {
        let Node::Expression { expr, .. } = node else {
            return false;
        };
        let ExpressionKind::Invocation {
            declaring_type,
            method: invoked,
            arguments,
            ..
        } = &expr.kind
        else {
            return false;
        };
        if *invoked != method || !declaring_types.contains(declaring_type) {
            return false;
        }
        arguments.first().map_or(true, |first| {
            let simple = last_segment(first);
            !allowed_first_arguments
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(simple))
        })
    })
}

/// Invocations whose receiver is field `owner.field` for one of `fields`.
#[must_use]
pub fn receiver_field(owner: impl Into<String>, fields: Vec<String>) -> Predicate {
    let owner = owner.into();
    let label = format!("receiver({owner}.{{{}}})", fields.join(", "));
    Predicate::new(label, move |node| match node {
        Node::Expression { expr, .. } => matches!(
            &expr.kind,
            ExpressionKind::Invocation { receiver: Some(r), .. }
                if r.owner == owner && fields.contains(&r.field)
        ),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Program;
    use crate::node::{walk, Scope};
    use crate::snapshot;

    fn program() -> Program {
        let units = [
            r#"{"file": "OrderController.java", "namespace": "app.controller", "types": [{
                "name": "OrderController", "line": 3,
                "annotations": [{"type": "lib.Stereotype", "arguments": {"value": "controller"}}],
                "methods": [{"name": "run", "line": 5, "body": [
                    {"kind": "new", "type": "java.lang.IllegalArgumentException", "line": 6},
                    {"kind": "new", "type": "java.lang.IllegalArgumentException", "arguments": ["java.lang.String"], "line": 7},
                    {"kind": "call", "declaring": "java.lang.Throwable", "method": "printStackTrace", "line": 8},
                    {"kind": "call", "declaring": "java.lang.Throwable", "method": "printStackTrace", "arguments": ["java.io.PrintWriter"], "line": 9},
                    {"kind": "call", "declaring": "java.io.PrintStream", "method": "println",
                     "receiver": {"owner": "java.lang.System", "field": "err"}, "line": 10},
                    {"kind": "throw", "type": "java.lang.RuntimeException", "line": 11}
                ]}]
            }]}"#,
            r#"{"file": "Order.java", "namespace": "app.entity", "types": [{
                "name": "Order", "line": 3,
                "fields": [
                    {"name": "customer", "type": "app.entity.Customer", "line": 5,
                     "annotations": [{"type": "javax.persistence.ManyToOne"}]},
                    {"name": "lines", "type": "java.util.List", "line": 7,
                     "annotations": [{"type": "javax.persistence.OneToMany",
                        "arguments": {"fetch": {"enum": "javax.persistence.FetchType", "constant": "EAGER"}}}]}
                ],
                "nested": [{"name": "Key", "line": 20}]
            }, {
                "name": "OrderTest", "line": 30
            }, {
                "name": "Base", "modifiers": ["abstract"], "line": 40
            }]}"#,
        ];
        snapshot::assemble(units.iter().map(|u| snapshot::parse_unit(u).unwrap())).unwrap()
    }

    fn count(program: &Program, predicate: &Predicate) -> usize {
        let mut n = 0;
        walk(program, &Scope::Forest, &mut |node| {
            if predicate.test(&node) {
                n += 1;
            }
        });
        n
    }

    fn type_names(program: &Program, predicate: &Predicate) -> Vec<String> {
        let mut out = Vec::new();
        walk(program, &Scope::Forest, &mut |node| {
            if predicate.test(&node) {
                if let Some(t) = node.as_type() {
                    out.push(t.qualified_name().to_string());
                }
            }
        });
        out
    }

    #[test]
    fn forbidden_symbol_matches_prefix_and_kind() {
        let program = program();
        let throws = forbidden_symbol(&[UsageKind::Throw], &["java.lang.Runtime".to_string()]);
        assert_eq!(count(&program, &throws), 1);

        let any_lang = forbidden_symbol(&[], &["java.lang.IllegalArgument".to_string()]);
        assert_eq!(count(&program, &any_lang), 2);
    }

    #[test]
    fn usage_kind_names() {
        assert_eq!("type-reference".parse::<UsageKind>(), Ok(UsageKind::TypeReference));
        assert_eq!(
            "catch".parse::<UsageKind>(),
            Err(UnknownUsageKind("catch".to_string()))
        );
    }

    #[test]
    fn annotated_with_argument() {
        let program = program();
        let controller = annotated(AnnotationSpec::new("lib.Stereotype").with_argument("value", "controller"));
        assert_eq!(type_names(&program, &controller), vec!["app.controller.OrderController"]);

        let service = annotated(AnnotationSpec::new("lib.Stereotype").with_argument("value", "service"));
        assert_eq!(count(&program, &service), 0);
    }

    #[test]
    fn annotation_spec_display() {
        assert_eq!(
            AnnotationSpec::new("lib.Stereotype")
                .with_argument("value", "controller")
                .to_string(),
            "@Stereotype(\"controller\")"
        );
        assert_eq!(AnnotationSpec::new("lib.Service").to_string(), "@Service");
    }

    #[test]
    fn presence_excludes_tests_and_filters_category() {
        let program = program();
        let lacking = AnnotationPresence::missing(AnnotationSpec::new("javax.persistence.Entity"))
            .of_category(TypeCategory::Class)
            .build();
        let names = type_names(&program, &lacking.and(directly_in_namespace("entity")));
        assert_eq!(names, vec!["app.entity.Order"]);

        let with_tests = AnnotationPresence::missing(AnnotationSpec::new("javax.persistence.Entity"))
            .of_category(TypeCategory::Class)
            .include_tests()
            .build();
        let names = type_names(&program, &with_tests.and(directly_in_namespace("entity")));
        assert_eq!(names, vec!["app.entity.Order", "app.entity.OrderTest"]);
    }

    #[test]
    fn namespace_predicates() {
        let program = program();
        let outside = outside_namespace("controller").and(annotated(AnnotationSpec::new("lib.Stereotype")));
        assert_eq!(count(&program, &outside), 0);

        let nested_excluded = directly_in_namespace("entity");
        assert!(!type_names(&program, &nested_excluded).contains(&"app.entity.Order.Key".to_string()));
    }

    #[test]
    fn kind_not_in_reports_abstract() {
        let program = program();
        let bad = kind_not_in(vec![TypeCategory::Class]).and(directly_in_namespace("entity"));
        assert_eq!(type_names(&program, &bad), vec!["app.entity.Base"]);
    }

    #[test]
    fn argument_shapes() {
        let program = program();
        let to_one = missing_argument(
            vec![
                "javax.persistence.ManyToOne".to_string(),
                "javax.persistence.OneToOne".to_string(),
            ],
            "optional",
        );
        assert_eq!(count(&program, &to_one), 1);

        let eager = forbidden_argument(
            vec!["javax.persistence.OneToMany".to_string()],
            "fetch",
            "EAGER",
        );
        assert_eq!(count(&program, &eager), 1);
    }

    #[test]
    fn expression_shapes() {
        let program = program();
        let bare = bare_instantiation(vec!["java.lang.IllegalArgumentException".to_string()]);
        assert_eq!(count(&program, &bare), 1);

        let print = invocation(
            vec!["java.lang.Throwable".to_string()],
            "printStackTrace",
            vec!["PrintStream".to_string(), "PrintWriter".to_string()],
        );
        assert_eq!(count(&program, &print), 1);

        let sys = receiver_field("java.lang.System", vec!["out".to_string(), "err".to_string()]);
        assert_eq!(count(&program, &sys), 1);
    }

    #[test]
    fn invocation_matches_the_declaring_type_exactly() {
        let unit = snapshot::parse_unit(
            r#"{"file": "Jobs.java", "namespace": "app", "types": [{"name": "Jobs", "methods": [
                {"name": "run", "body": [
                    {"kind": "call", "declaring": "java.lang.Throwable", "method": "printStackTrace", "line": 3},
                    {"kind": "call", "declaring": "app.JobError", "method": "printStackTrace", "line": 4}
                ]}]}]}"#,
        )
        .unwrap();
        let program = snapshot::assemble([unit]).unwrap();

        let throwable = invocation(vec!["java.lang.Throwable".to_string()], "printStackTrace", vec![]);
        assert_eq!(count(&program, &throwable), 1);

        let both = invocation(
            vec!["java.lang.Throwable".to_string(), "app.JobError".to_string()],
            "printStackTrace",
            vec![],
        );
        assert_eq!(count(&program, &both), 2);
    }

    #[test]
    fn combinators() {
        let program = program();
        let yes = Predicate::new("yes", |node| node.as_type().is_some());
        let no = yes.clone().negate();
        assert_eq!(count(&program, &yes.clone().and(no.clone())), 0);
        assert_eq!(count(&program, &Predicate::any(vec![])), 0);
        assert_eq!(
            count(&program, &Predicate::all(vec![yes.clone(), name_ends_with("Test")])),
            1
        );
        assert_eq!(yes.or(no).label(), "(yes or not yes)");
    }
}
