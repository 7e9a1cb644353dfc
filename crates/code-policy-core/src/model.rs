//! In-memory program model: namespaces, declarations, members and expressions.
//!
//! The model is an arena. Namespaces and type declarations live in flat
//! vectors and point at each other through [`NamespaceId`] and [`TypeId`].
//! [`ProgramBuilder`] enforces the uniqueness invariants while the forest is
//! assembled; a finished [`Program`] is never mutated.

use crate::utils::paths::{last_segment, referenced_types};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// ────────────────────────────────────────────
// Identifiers and positions
// ────────────────────────────────────────────

/// Index of a namespace inside a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceId(usize);

/// Index of a type declaration inside a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(usize);

/// Source position of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    /// Source file path as reported by the parser.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl SourcePosition {
    /// Creates a new position.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Returns the last path component of the file.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file.file_name().map_or_else(
            || self.file.to_string_lossy().into_owned(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_name(), self.line)
    }
}

// ────────────────────────────────────────────
// Declarations
// ────────────────────────────────────────────

/// Structural kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// A class (abstract or not, see [`Modifiers::is_abstract`]).
    #[default]
    Class,
    /// An interface.
    Interface,
    /// An enumeration.
    Enum,
    /// An annotation type declaration.
    Annotation,
    /// Anything else the parser reports (records, ...).
    Other,
}

/// Declaration modifiers the structural categories consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Declared `abstract`.
    pub is_abstract: bool,
    /// Declared `static`.
    pub is_static: bool,
    /// Declared `private`.
    pub is_private: bool,
    /// Anonymous class body.
    pub is_anonymous: bool,
    /// Declared inside a method body.
    pub is_local: bool,
    /// Synthesized by the compiler.
    pub is_implicit: bool,
}

/// Value of an annotation argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// String literal.
    Str(String),
    /// Enum constant, e.g. `FetchType.EAGER`.
    Enum {
        /// Qualified enum type.
        ty: String,
        /// Constant name.
        constant: String,
    },
    /// Class literal, e.g. `String.class`.
    Class(String),
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Array of values.
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Tests whether this value denotes `literal`.
    ///
    /// Enum constants match by constant name, class literals by qualified or
    /// simple name, arrays when any element matches.
    #[must_use]
    pub fn matches_literal(&self, literal: &str) -> bool {
        match self {
            Self::Str(s) => s == literal,
            Self::Enum { constant, .. } => constant == literal,
            Self::Class(ty) => ty == literal || last_segment(ty) == literal,
            Self::Bool(b) => b.to_string() == literal,
            Self::Int(i) => i.to_string() == literal,
            Self::Array(items) => items.iter().any(|v| v.matches_literal(literal)),
        }
    }

    fn collect_types<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Enum { ty, .. } | Self::Class(ty) => out.push(ty),
            Self::Array(items) => items.iter().for_each(|v| v.collect_types(out)),
            Self::Str(_) | Self::Bool(_) | Self::Int(_) => {}
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Enum { ty, constant } => write!(f, "{}.{constant}", last_segment(ty)),
            Self::Class(ty) => write!(f, "{}.class", last_segment(ty)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// An annotation usage attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Qualified annotation type.
    pub ty: String,
    /// Named arguments.
    pub arguments: BTreeMap<String, AnnotationValue>,
    /// Where the annotation is written.
    pub position: SourcePosition,
}

impl Annotation {
    /// Creates an annotation without arguments.
    #[must_use]
    pub fn new(ty: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            ty: ty.into(),
            arguments: BTreeMap::new(),
            position,
        }
    }

    /// Adds a named argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Returns the argument called `name`.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments.get(name)
    }

    fn collect_types<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.ty);
        for value in self.arguments.values() {
            value.collect_types(out);
        }
    }
}

/// A static field read such as `System.out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Qualified declaring type of the field.
    pub owner: String,
    /// Field name.
    pub field: String,
}

/// Expression node categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Constructor call.
    Instantiation {
        /// Instantiated type.
        ty: String,
        /// Argument types, in order.
        arguments: Vec<String>,
    },
    /// Member invocation.
    Invocation {
        /// Type declaring the invoked method.
        declaring_type: String,
        /// Method name.
        method: String,
        /// Argument types, in order.
        arguments: Vec<String>,
        /// Receiver, when it is a field read.
        receiver: Option<FieldRef>,
    },
    /// `throw` statement.
    Throw {
        /// Thrown type.
        ty: String,
    },
    /// Field read.
    FieldAccess(FieldRef),
    /// Bare type reference (class literal, cast target, ...).
    TypeReference {
        /// Referenced type.
        ty: String,
    },
}

/// An expression inside a method body, a field initializer or an
/// initializer block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Category and payload.
    pub kind: ExpressionKind,
    /// Where the expression starts.
    pub position: SourcePosition,
}

impl Expression {
    /// Creates an expression.
    #[must_use]
    pub fn new(kind: ExpressionKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// Returns the symbol this expression is about.
    ///
    /// For an invocation this is the declaring type, for a field access
    /// the owner.
    #[must_use]
    pub fn referenced_type(&self) -> &str {
        match &self.kind {
            ExpressionKind::Instantiation { ty, .. }
            | ExpressionKind::Throw { ty }
            | ExpressionKind::TypeReference { ty } => ty,
            ExpressionKind::Invocation { declaring_type, .. } => declaring_type,
            ExpressionKind::FieldAccess(field) => &field.owner,
        }
    }

    fn collect_types<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.referenced_type());
        match &self.kind {
            ExpressionKind::Instantiation { arguments, .. } => {
                out.extend(arguments.iter().map(String::as_str));
            }
            ExpressionKind::Invocation {
                arguments,
                receiver,
                ..
            } => {
                out.extend(arguments.iter().map(String::as_str));
                if let Some(receiver) = receiver {
                    out.push(&receiver.owner);
                }
            }
            ExpressionKind::Throw { .. }
            | ExpressionKind::FieldAccess(_)
            | ExpressionKind::TypeReference { .. } => {}
        }
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: String,
    /// Attached annotations.
    pub annotations: Vec<Annotation>,
    /// Initializer expressions.
    pub initializer: Vec<Expression>,
    /// Declaration position.
    pub position: SourcePosition,
}

impl Field {
    /// Creates a field without annotations or initializer.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
            initializer: Vec::new(),
            position,
        }
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Parameter types, in order.
    pub parameters: Vec<String>,
    /// Return type, `None` for constructors.
    pub return_type: Option<String>,
    /// Declared thrown types.
    pub throws: Vec<String>,
    /// Attached annotations.
    pub annotations: Vec<Annotation>,
    /// Expressions of the body, in source order.
    pub body: Vec<Expression>,
    /// Declaration position.
    pub position: SourcePosition,
}

impl Method {
    /// Creates a method with an empty body.
    #[must_use]
    pub fn new(name: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            throws: Vec::new(),
            annotations: Vec::new(),
            body: Vec::new(),
            position,
        }
    }

    /// Returns `name(Param1,Param2)`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameters.join(","))
    }
}

/// Declared content of a type, as handed to [`ProgramBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSpec {
    /// Simple name.
    pub name: String,
    /// Structural kind.
    pub kind: TypeKind,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attached annotations.
    pub annotations: Vec<Annotation>,
    /// Superclass reference.
    pub superclass: Option<String>,
    /// Implemented (or extended, for interfaces) interfaces.
    pub interfaces: Vec<String>,
    /// Fields.
    pub fields: Vec<Field>,
    /// Methods and constructors.
    pub methods: Vec<Method>,
    /// Expressions of initializer blocks.
    pub initializers: Vec<Expression>,
    /// Imports of the compilation unit (top-level types only).
    pub imports: Vec<String>,
    /// Declaration position.
    pub position: SourcePosition,
}

impl TypeSpec {
    /// Creates an empty spec of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            ..Self::default()
        }
    }
}

/// Where a type declaration is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top-level type in a namespace.
    Namespace(NamespaceId),
    /// Nested type.
    Type(TypeId),
}

/// A type declaration placed in the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared content.
    pub spec: TypeSpec,
    qualified_name: String,
    namespace: NamespaceId,
    namespace_name: String,
    parent: Parent,
    nested: Vec<TypeId>,
}

impl TypeDecl {
    /// Returns the simple name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.spec.name
    }

    /// Returns the qualified name (`ns.Outer.Inner`).
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the enclosing namespace (for nested types, the one of the
    /// outermost type).
    #[must_use]
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Returns the qualified name of [`TypeDecl::namespace`].
    #[must_use]
    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    /// Returns the direct parent.
    #[must_use]
    pub fn parent(&self) -> Parent {
        self.parent
    }

    /// Returns nested type declarations in declaration order.
    #[must_use]
    pub fn nested(&self) -> &[TypeId] {
        &self.nested
    }

    /// Checks for an annotation of the given qualified type.
    #[must_use]
    pub fn has_annotation(&self, ty: &str) -> bool {
        self.spec.annotations.iter().any(|a| a.ty == ty)
    }

    /// Returns every type mention of this declaration, one entry per
    /// occurrence, erased to raw type names. Generic type arguments count as
    /// mentions of their own.
    ///
    /// Nested declarations report their own references.
    #[must_use]
    pub fn reference_occurrences(&self) -> Vec<&str> {
        let spec = &self.spec;
        let mut raw: Vec<&str> = Vec::new();
        raw.extend(spec.imports.iter().map(String::as_str));
        raw.extend(spec.superclass.as_deref());
        raw.extend(spec.interfaces.iter().map(String::as_str));
        for annotation in &spec.annotations {
            annotation.collect_types(&mut raw);
        }
        for field in &spec.fields {
            raw.push(&field.ty);
            for annotation in &field.annotations {
                annotation.collect_types(&mut raw);
            }
            for expr in &field.initializer {
                expr.collect_types(&mut raw);
            }
        }
        for method in &spec.methods {
            raw.extend(method.parameters.iter().map(String::as_str));
            raw.extend(method.return_type.as_deref());
            raw.extend(method.throws.iter().map(String::as_str));
            for annotation in &method.annotations {
                annotation.collect_types(&mut raw);
            }
            for expr in &method.body {
                expr.collect_types(&mut raw);
            }
        }
        for expr in &spec.initializers {
            expr.collect_types(&mut raw);
        }
        raw.into_iter().flat_map(referenced_types).collect()
    }
}

/// A namespace (package) of the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    qualified_name: String,
    parent: Option<NamespaceId>,
    children: Vec<NamespaceId>,
    types: Vec<TypeId>,
}

impl Namespace {
    /// Returns the last segment (empty for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dot-separated qualified name (empty for the root).
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the parent namespace, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NamespaceId> {
        self.parent
    }

    /// Returns sub-namespaces sorted by name.
    #[must_use]
    pub fn children(&self) -> &[NamespaceId] {
        &self.children
    }

    /// Returns top-level types in declaration order.
    #[must_use]
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    /// Returns true for the unnamed root namespace.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// ────────────────────────────────────────────
// Program
// ────────────────────────────────────────────

/// The parsed forest of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    namespaces: Vec<Namespace>,
    types: Vec<TypeDecl>,
    namespaces_by_name: BTreeMap<String, NamespaceId>,
    types_by_name: BTreeMap<String, TypeId>,
}

impl Default for Program {
    fn default() -> Self {
        Self {
            namespaces: vec![Namespace {
                name: String::new(),
                qualified_name: String::new(),
                parent: None,
                children: Vec::new(),
                types: Vec::new(),
            }],
            types: Vec::new(),
            namespaces_by_name: BTreeMap::from([(String::new(), NamespaceId(0))]),
            types_by_name: BTreeMap::new(),
        }
    }
}

impl Program {
    /// Returns the root namespace id.
    #[must_use]
    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    /// Returns a namespace by id.
    #[must_use]
    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    /// Returns a type declaration by id.
    #[must_use]
    pub fn type_decl(&self, id: TypeId) -> &TypeDecl {
        &self.types[id.0]
    }

    /// Iterates all type declarations (nested included) in insertion order.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDecl)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    /// Iterates all namespaces, root first.
    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(i, n)| (NamespaceId(i), n))
    }

    /// Looks up a declaration by qualified name.
    #[must_use]
    pub fn find_type(&self, qualified_name: &str) -> Option<(TypeId, &TypeDecl)> {
        self.types_by_name
            .get(qualified_name)
            .map(|&id| (id, self.type_decl(id)))
    }

    /// Looks up a namespace by qualified name.
    #[must_use]
    pub fn find_namespace(&self, qualified_name: &str) -> Option<NamespaceId> {
        self.namespaces_by_name.get(qualified_name).copied()
    }

    /// Returns the namespace a declaration lives in.
    #[must_use]
    pub fn namespace_of(&self, decl: &TypeDecl) -> &Namespace {
        self.namespace(decl.namespace)
    }

    /// Returns the chain of enclosing types, outermost first, ending with
    /// `decl` itself.
    #[must_use]
    pub fn enclosing_types<'p>(&'p self, decl: &'p TypeDecl) -> Vec<&'p TypeDecl> {
        let mut chain = vec![decl];
        let mut current = decl;
        while let Parent::Type(outer) = current.parent {
            current = self.type_decl(outer);
            chain.push(current);
        }
        chain.reverse();
        chain
    }

    /// Returns the chain of named namespaces from the root to `id`, root
    /// excluded.
    #[must_use]
    pub fn namespace_chain(&self, id: NamespaceId) -> Vec<&Namespace> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(ns_id) = current {
            let ns = self.namespace(ns_id);
            if ns.is_root() {
                break;
            }
            chain.push(ns);
            current = ns.parent;
        }
        chain.reverse();
        chain
    }

    /// Returns the number of type declarations.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the forest holds no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────

/// Errors raised while assembling a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two declarations share a qualified name.
    #[error("declaration `{name}` is declared more than once")]
    DuplicateDeclaration {
        /// The duplicated qualified name.
        name: String,
    },

    /// A namespace name has an empty segment.
    #[error("invalid namespace `{name}`: empty segment")]
    InvalidNamespace {
        /// The offending namespace.
        name: String,
    },

    /// A declaration has an empty or dotted simple name.
    #[error("invalid declaration name `{name}` in `{context}`")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Enclosing namespace or type.
        context: String,
    },
}

/// Assembles a [`Program`] while enforcing uniqueness of namespaces and
/// declarations.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    /// Creates a builder holding only the root namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the namespace with this qualified name, creating it and its
    /// ancestors when missing. `""` is the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the name has an empty segment.
    pub fn namespace(&mut self, qualified_name: &str) -> Result<NamespaceId, ModelError> {
        if let Some(id) = self.program.find_namespace(qualified_name) {
            return Ok(id);
        }
        let mut current = self.program.root();
        let mut qualified = String::new();
        for segment in qualified_name.split('.') {
            if segment.is_empty() {
                return Err(ModelError::InvalidNamespace {
                    name: qualified_name.to_string(),
                });
            }
            if !qualified.is_empty() {
                qualified.push('.');
            }
            qualified.push_str(segment);
            current = match self.program.find_namespace(&qualified) {
                Some(id) => id,
                None => self.insert_namespace(current, segment, &qualified),
            };
        }
        Ok(current)
    }

    fn insert_namespace(&mut self, parent: NamespaceId, name: &str, qualified: &str) -> NamespaceId {
        let id = NamespaceId(self.program.namespaces.len());
        self.program.namespaces.push(Namespace {
            name: name.to_string(),
            qualified_name: qualified.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            types: Vec::new(),
        });
        self.program
            .namespaces_by_name
            .insert(qualified.to_string(), id);

        let names: Vec<&str> = self.program.namespaces[parent.0]
            .children
            .iter()
            .map(|c| self.program.namespaces[c.0].name.as_str())
            .collect();
        let slot = names.partition_point(|existing| *existing < name);
        self.program.namespaces[parent.0].children.insert(slot, id);
        id
    }

    /// Adds a top-level type to a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already declared.
    pub fn add_type(&mut self, namespace: NamespaceId, spec: TypeSpec) -> Result<TypeId, ModelError> {
        let prefix = self.program.namespace(namespace).qualified_name.clone();
        let id = self.insert_type(&prefix, namespace, Parent::Namespace(namespace), spec)?;
        self.program.namespaces[namespace.0].types.push(id);
        Ok(id)
    }

    /// Adds a type nested in `outer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already declared.
    pub fn add_nested(&mut self, outer: TypeId, spec: TypeSpec) -> Result<TypeId, ModelError> {
        let outer_decl = self.program.type_decl(outer);
        let prefix = outer_decl.qualified_name.clone();
        let namespace = outer_decl.namespace;
        let id = self.insert_type(&prefix, namespace, Parent::Type(outer), spec)?;
        self.program.types[outer.0].nested.push(id);
        Ok(id)
    }

    fn insert_type(
        &mut self,
        prefix: &str,
        namespace: NamespaceId,
        parent: Parent,
        spec: TypeSpec,
    ) -> Result<TypeId, ModelError> {
        if spec.name.is_empty() || spec.name.contains('.') {
            return Err(ModelError::InvalidName {
                name: spec.name,
                context: prefix.to_string(),
            });
        }
        let qualified_name = if prefix.is_empty() {
            spec.name.clone()
        } else {
            format!("{prefix}.{}", spec.name)
        };
        if self.program.types_by_name.contains_key(&qualified_name) {
            return Err(ModelError::DuplicateDeclaration {
                name: qualified_name,
            });
        }

        let id = TypeId(self.program.types.len());
        let namespace_name = self.program.namespace(namespace).qualified_name.clone();
        self.program
            .types_by_name
            .insert(qualified_name.clone(), id);
        self.program.types.push(TypeDecl {
            spec,
            qualified_name,
            namespace,
            namespace_name,
            parent,
            nested: Vec::new(),
        });
        Ok(id)
    }

    /// Finishes the forest.
    #[must_use]
    pub fn build(self) -> Program {
        self.program
    }
}
