//! Symbol resolution for rule preconditions.
//!
//! Some rules only make sense when a symbol (an annotation type, a base
//! class) is available to the analysed codebase. A [`SymbolRegistry`]
//! answers that question from the program itself, a fixed list of
//! well-known platform names, and names declared known by configuration.

use crate::model::Program;
use std::collections::BTreeSet;

/// Platform names that always resolve.
pub const WELL_KNOWN_SYMBOLS: &[&str] = &[
    "java.lang.Object",
    "java.lang.String",
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.RuntimeException",
    "java.lang.IllegalArgumentException",
    "java.lang.NullPointerException",
    "java.lang.System",
    "java.lang.Override",
    "java.lang.Deprecated",
    "java.lang.SuppressWarnings",
    "java.lang.FunctionalInterface",
    "java.lang.SafeVarargs",
];

/// A symbol that cannot be resolved in the current run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("symbol `{name}` cannot be resolved")]
pub struct UnresolvedSymbol {
    /// The qualified name that failed to resolve.
    pub name: String,
}

/// Set of resolvable qualified names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolRegistry {
    known: BTreeSet<String>,
}

impl SymbolRegistry {
    /// Creates a registry with only the well-known names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            known: WELL_KNOWN_SYMBOLS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Creates a registry for a program: well-known names, every declared
    /// type and every type a declaration references (imports, annotations,
    /// members, type arguments).
    #[must_use]
    pub fn for_program(program: &Program) -> Self {
        let mut registry = Self::new();
        for (_, decl) in program.types() {
            registry.known.insert(decl.qualified_name().to_string());
            registry
                .known
                .extend(decl.reference_occurrences().into_iter().map(str::to_string));
        }
        registry
    }

    /// Adds names declared known by configuration.
    #[must_use]
    pub fn with_known<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.extend(names.into_iter().map(Into::into));
        self
    }

    /// Resolves a qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedSymbol`] if the name is unknown.
    pub fn resolve<'a>(&self, name: &'a str) -> Result<&'a str, UnresolvedSymbol> {
        if self.known.contains(name) {
            Ok(name)
        } else {
            Err(UnresolvedSymbol {
                name: name.to_string(),
            })
        }
    }

    /// Returns true if the name resolves.
    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot;

    #[test]
    fn well_known_names_resolve() {
        let registry = SymbolRegistry::new();
        assert!(registry.resolve("java.lang.SuppressWarnings").is_ok());
        assert!(registry.resolve("org.springframework.stereotype.Service").is_err());
    }

    #[test]
    fn program_declarations_and_imports_resolve() {
        let unit = snapshot::parse_unit(
            r#"{"file": "A.java", "namespace": "app", "imports": ["lib.Stereotype"], "types": [{"name": "A"}]}"#,
        )
        .unwrap();
        let program = snapshot::assemble([unit]).unwrap();
        let registry = SymbolRegistry::for_program(&program);

        assert!(registry.is_known("app.A"));
        assert!(registry.is_known("lib.Stereotype"));
        assert_eq!(
            registry.resolve("lib.Missing").unwrap_err().name,
            "lib.Missing"
        );
    }

    #[test]
    fn unimported_referenced_names_resolve() {
        let unit = snapshot::parse_unit(
            r#"{"file": "A.java", "namespace": "app", "types": [{"name": "A",
                "annotations": [{"type": "lib.Stereotype"}],
                "fields": [{"name": "xs", "type": "java.util.Set<lib.Item>"}]}]}"#,
        )
        .unwrap();
        let program = snapshot::assemble([unit]).unwrap();
        let registry = SymbolRegistry::for_program(&program);

        assert!(registry.is_known("lib.Stereotype"));
        assert!(registry.is_known("lib.Item"));
        assert!(!registry.is_known("lib.Missing"));
    }

    #[test]
    fn configured_names_resolve() {
        let registry = SymbolRegistry::new().with_known(["javax.persistence.Entity"]);
        assert!(registry.is_known("javax.persistence.Entity"));
    }
}
