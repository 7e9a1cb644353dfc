//! Human-readable locations built from a node's structural path.
//!
//! Rendering walks from the forest root down to the node and concatenates
//! one string per step:
//!
//! | Step | Rendering |
//! |------|-----------|
//! | namespace, type | `name.` |
//! | method | `signature file:line` |
//! | field | `name (file:line)` |
//! | structural role (body, annotation) | nothing |
//! | anything else | `text ` |
//!
//! `file:line` always comes from the rendered node's own position, so an
//! expression inside a method renders the method signature with the
//! expression's line. Locations are for diagnostics only.

use crate::model::{Program, SourcePosition, TypeDecl};
use crate::node::{AnnotationTarget, ExprSite, Node};

/// One step of a structural path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// A namespace segment.
    Namespace(String),
    /// A (possibly nested) type.
    Type(String),
    /// A method, by signature.
    Method(String),
    /// A field, by name.
    Field(String),
    /// A structural role without a name of its own.
    Role,
    /// Any other step, by its textual form.
    Other(String),
}

/// Renders node locations for one program.
#[derive(Debug, Clone, Copy)]
pub struct LocationRenderer<'p> {
    program: &'p Program,
}

impl<'p> LocationRenderer<'p> {
    /// Creates a renderer.
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    /// Returns the structural path from the root to `node`.
    #[must_use]
    pub fn path(&self, node: &Node<'p>) -> Vec<PathStep> {
        let mut steps = Vec::new();
        match *node {
            Node::Namespace(ns) => {
                if let Some(id) = self.program.find_namespace(ns.qualified_name()) {
                    self.push_namespaces(&mut steps, id);
                }
            }
            Node::Type(decl) => self.push_type(&mut steps, decl),
            Node::Method { owner, method } => {
                self.push_type(&mut steps, owner);
                steps.push(PathStep::Method(method.signature()));
            }
            Node::Field { owner, field } => {
                self.push_type(&mut steps, owner);
                steps.push(PathStep::Field(field.name.clone()));
            }
            Node::Expression { owner, site, .. } => {
                self.push_type(&mut steps, owner);
                match site {
                    ExprSite::Method(method) => steps.push(PathStep::Method(method.signature())),
                    ExprSite::Field(field) => steps.push(PathStep::Field(field.name.clone())),
                    ExprSite::Initializer => steps.push(PathStep::Other("initializer".to_string())),
                }
                steps.push(PathStep::Role);
            }
            Node::Annotation { owner, target, .. } => {
                self.push_type(&mut steps, owner);
                match target {
                    AnnotationTarget::Type => {}
                    AnnotationTarget::Method(method) => {
                        steps.push(PathStep::Method(method.signature()));
                    }
                    AnnotationTarget::Field(field) => {
                        steps.push(PathStep::Field(field.name.clone()));
                    }
                }
                steps.push(PathStep::Role);
            }
        }
        steps
    }

    /// Renders the location string of `node`.
    #[must_use]
    pub fn render(&self, node: &Node<'p>) -> String {
        let position = node.position();
        self.path(node)
            .iter()
            .map(|step| render_step(step, position))
            .collect()
    }

    fn push_namespaces(&self, steps: &mut Vec<PathStep>, id: crate::model::NamespaceId) {
        steps.extend(
            self.program
                .namespace_chain(id)
                .into_iter()
                .map(|ns| PathStep::Namespace(ns.name().to_string())),
        );
    }

    fn push_type(&self, steps: &mut Vec<PathStep>, decl: &TypeDecl) {
        self.push_namespaces(steps, decl.namespace());
        steps.extend(
            self.program
                .enclosing_types(decl)
                .into_iter()
                .map(|t| PathStep::Type(t.simple_name().to_string())),
        );
    }
}

fn render_step(step: &PathStep, position: Option<&SourcePosition>) -> String {
    let at = position.map_or_else(String::new, ToString::to_string);
    match step {
        PathStep::Namespace(name) | PathStep::Type(name) => format!("{name}."),
        PathStep::Method(signature) => format!("{signature} {at}"),
        PathStep::Field(name) => format!("{name} ({at})"),
        PathStep::Role => String::new(),
        PathStep::Other(text) => format!("{text} "),
    }
}
