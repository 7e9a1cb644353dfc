//! Structural type categories used by kind filters.

use crate::model::{TypeDecl, TypeKind};
use std::fmt;
use std::str::FromStr;

/// Structural category of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// A plain, concrete, top-level-style class.
    Class,
    /// Like [`TypeCategory::Class`] but abstract.
    Abstract,
    /// An interface.
    Interface,
}

impl TypeCategory {
    /// Tests whether a declaration falls into this category.
    ///
    /// Classes and abstract classes exclude anonymous, local, private,
    /// static and implicit declarations.
    #[must_use]
    pub fn matches(self, decl: &TypeDecl) -> bool {
        let spec = &decl.spec;
        match self {
            Self::Class | Self::Abstract => {
                let m = spec.modifiers;
                spec.kind == TypeKind::Class
                    && m.is_abstract == (self == Self::Abstract)
                    && !m.is_anonymous
                    && !m.is_local
                    && !m.is_private
                    && !m.is_static
                    && !m.is_implicit
            }
            Self::Interface => spec.kind == TypeKind::Interface,
        }
    }

    /// Tests whether a declaration falls into any of `categories`.
    #[must_use]
    pub fn any_matches(categories: &[Self], decl: &TypeDecl) -> bool {
        categories.iter().any(|c| c.matches(decl))
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Abstract => write!(f, "abstract"),
            Self::Interface => write!(f, "interface"),
        }
    }
}

/// Unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type category `{0}`, expected: class, abstract, interface")]
pub struct UnknownCategory(pub String);

impl FromStr for TypeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "abstract" => Ok(Self::Abstract),
            "interface" => Ok(Self::Interface),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, ProgramBuilder, SourcePosition, TypeSpec};

    fn decl_with(kind: TypeKind, modifiers: Modifiers) -> TypeDecl {
        let mut spec = TypeSpec::new("T", kind, SourcePosition::new("T.java", 1));
        spec.modifiers = modifiers;
        let mut builder = ProgramBuilder::new();
        let ns = builder.namespace("p").unwrap();
        let id = builder.add_type(ns, spec).unwrap();
        builder.build().type_decl(id).clone()
    }

    #[test]
    fn class_excludes_abstract_and_static() {
        let plain = decl_with(TypeKind::Class, Modifiers::default());
        let abstract_class = decl_with(
            TypeKind::Class,
            Modifiers {
                is_abstract: true,
                ..Modifiers::default()
            },
        );
        let static_class = decl_with(
            TypeKind::Class,
            Modifiers {
                is_static: true,
                ..Modifiers::default()
            },
        );

        assert!(TypeCategory::Class.matches(&plain));
        assert!(!TypeCategory::Class.matches(&abstract_class));
        assert!(TypeCategory::Abstract.matches(&abstract_class));
        assert!(!TypeCategory::Class.matches(&static_class));
        assert!(!TypeCategory::Abstract.matches(&static_class));
    }

    #[test]
    fn enums_are_no_category() {
        let e = decl_with(TypeKind::Enum, Modifiers::default());
        assert!(!TypeCategory::any_matches(
            &[TypeCategory::Class, TypeCategory::Abstract, TypeCategory::Interface],
            &e
        ));
    }

    #[test]
    fn interface_matches_interface_kind() {
        let i = decl_with(TypeKind::Interface, Modifiers::default());
        assert!(TypeCategory::Interface.matches(&i));
        assert!(!TypeCategory::Class.matches(&i));
    }

    #[test]
    fn parses_names() {
        assert_eq!("abstract".parse::<TypeCategory>(), Ok(TypeCategory::Abstract));
        assert!("record".parse::<TypeCategory>().is_err());
    }
}
