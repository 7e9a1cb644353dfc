//! Borrowed views over the forest and structural traversal.

use crate::model::{
    Annotation, Expression, Field, Method, Namespace, NamespaceId, Program, SourcePosition,
    TypeDecl, TypeId,
};

/// Where an expression lives inside its owning type.
#[derive(Debug, Clone, Copy)]
pub enum ExprSite<'p> {
    /// Method or constructor body.
    Method(&'p Method),
    /// Field initializer.
    Field(&'p Field),
    /// Initializer block of the type.
    Initializer,
}

/// What an annotation is attached to.
#[derive(Debug, Clone, Copy)]
pub enum AnnotationTarget<'p> {
    /// The owning type itself.
    Type,
    /// A method of the owning type.
    Method(&'p Method),
    /// A field of the owning type.
    Field(&'p Field),
}

/// A node of the forest, of any category.
#[derive(Debug, Clone, Copy)]
pub enum Node<'p> {
    /// A named namespace.
    Namespace(&'p Namespace),
    /// A type declaration.
    Type(&'p TypeDecl),
    /// A method of `owner`.
    Method {
        /// Owning type.
        owner: &'p TypeDecl,
        /// The method.
        method: &'p Method,
    },
    /// A field of `owner`.
    Field {
        /// Owning type.
        owner: &'p TypeDecl,
        /// The field.
        field: &'p Field,
    },
    /// An expression inside `owner`.
    Expression {
        /// Owning type.
        owner: &'p TypeDecl,
        /// Enclosing member.
        site: ExprSite<'p>,
        /// The expression.
        expr: &'p Expression,
    },
    /// An annotation usage inside `owner`.
    Annotation {
        /// Owning type.
        owner: &'p TypeDecl,
        /// Annotated element.
        target: AnnotationTarget<'p>,
        /// The annotation.
        annotation: &'p Annotation,
    },
}

impl<'p> Node<'p> {
    /// Returns the type declaration the node belongs to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&'p TypeDecl> {
        match *self {
            Self::Namespace(_) => None,
            Self::Type(decl) => Some(decl),
            Self::Method { owner, .. }
            | Self::Field { owner, .. }
            | Self::Expression { owner, .. }
            | Self::Annotation { owner, .. } => Some(owner),
        }
    }

    /// Returns the node's own source position; namespaces have none.
    #[must_use]
    pub fn position(&self) -> Option<&'p SourcePosition> {
        match *self {
            Self::Namespace(_) => None,
            Self::Type(decl) => Some(&decl.spec.position),
            Self::Method { method, .. } => Some(&method.position),
            Self::Field { field, .. } => Some(&field.position),
            Self::Expression { expr, .. } => Some(&expr.position),
            Self::Annotation { annotation, .. } => Some(&annotation.position),
        }
    }

    /// Returns the type declaration when the node is one.
    #[must_use]
    pub fn as_type(&self) -> Option<&'p TypeDecl> {
        match *self {
            Self::Type(decl) => Some(decl),
            _ => None,
        }
    }

    /// Returns the annotations carried by a declaration node.
    #[must_use]
    pub fn annotations(&self) -> &'p [Annotation] {
        match *self {
            Self::Type(decl) => &decl.spec.annotations,
            Self::Method { method, .. } => &method.annotations,
            Self::Field { field, .. } => &field.annotations,
            Self::Namespace(_) | Self::Expression { .. } | Self::Annotation { .. } => &[],
        }
    }

    /// Returns the simple name of a declaration node.
    #[must_use]
    pub fn simple_name(&self) -> Option<&'p str> {
        match *self {
            Self::Namespace(ns) => Some(ns.name()),
            Self::Type(decl) => Some(decl.simple_name()),
            Self::Method { method, .. } => Some(&method.name),
            Self::Field { field, .. } => Some(&field.name),
            Self::Expression { .. } | Self::Annotation { .. } => None,
        }
    }
}

/// Portion of the forest a traversal covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every namespace and declaration.
    Forest,
    /// A namespace and everything below it.
    Namespace(NamespaceId),
    /// The listed declarations and their nested types, in list order.
    Declarations(Vec<TypeId>),
}

/// Visits every node of `scope` depth-first.
///
/// Order: a namespace, its types in declaration order, then its
/// sub-namespaces by name. Within a type: the type, its annotations, fields
/// (each with annotations and initializer), methods (each with annotations
/// and body), initializer blocks, then nested types.
pub fn walk<'p, F>(program: &'p Program, scope: &Scope, visit: &mut F)
where
    F: FnMut(Node<'p>),
{
    match scope {
        Scope::Forest => walk_namespace(program, program.root(), visit),
        Scope::Namespace(id) => walk_namespace(program, *id, visit),
        Scope::Declarations(ids) => {
            for id in ids {
                walk_type(program, *id, visit);
            }
        }
    }
}

fn walk_namespace<'p, F>(program: &'p Program, id: NamespaceId, visit: &mut F)
where
    F: FnMut(Node<'p>),
{
    let namespace = program.namespace(id);
    if !namespace.is_root() {
        visit(Node::Namespace(namespace));
    }
    for ty in namespace.types() {
        walk_type(program, *ty, visit);
    }
    for child in namespace.children() {
        walk_namespace(program, *child, visit);
    }
}

fn walk_type<'p, F>(program: &'p Program, id: TypeId, visit: &mut F)
where
    F: FnMut(Node<'p>),
{
    let owner = program.type_decl(id);
    visit(Node::Type(owner));
    for annotation in &owner.spec.annotations {
        visit(Node::Annotation {
            owner,
            target: AnnotationTarget::Type,
            annotation,
        });
    }
    for field in &owner.spec.fields {
        visit(Node::Field { owner, field });
        for annotation in &field.annotations {
            visit(Node::Annotation {
                owner,
                target: AnnotationTarget::Field(field),
                annotation,
            });
        }
        for expr in &field.initializer {
            visit(Node::Expression {
                owner,
                site: ExprSite::Field(field),
                expr,
            });
        }
    }
    for method in &owner.spec.methods {
        visit(Node::Method { owner, method });
        for annotation in &method.annotations {
            visit(Node::Annotation {
                owner,
                target: AnnotationTarget::Method(method),
                annotation,
            });
        }
        for expr in &method.body {
            visit(Node::Expression {
                owner,
                site: ExprSite::Method(method),
                expr,
            });
        }
    }
    for expr in &owner.spec.initializers {
        visit(Node::Expression {
            owner,
            site: ExprSite::Initializer,
            expr,
        });
    }
    for nested in owner.nested() {
        walk_type(program, *nested, visit);
    }
}
