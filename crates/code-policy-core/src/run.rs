//! One analysis run: the forest, its symbol index and symbol registry.
//!
//! An [`AnalysisRun`] is built once, is read-only afterwards, and is handed
//! to every rule. It is also the rule engine: [`AnalysisRun::evaluate`]
//! filters nodes of a scope with a predicate, and [`AnalysisRun::report`]
//! turns matches into one aggregated failure.

use crate::failure::{aggregate, FailureKind, PolicyFailure, Violation};
use crate::index::{IndexError, SymbolIndex};
use crate::location::LocationRenderer;
use crate::model::Program;
use crate::node::{walk, Node, Scope};
use crate::predicate::Predicate;
use crate::source::{ModelSource, SourceError, SourceRoot};
use crate::symbols::{SymbolRegistry, UnresolvedSymbol};
use crate::utils::paths::DEFAULT_TEST_SUFFIXES;
use tracing::debug;

/// Errors that abort a run before any rule is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The model source could not build the forest.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The symbol index failed its consistency gate.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Immutable per-run analysis state.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    program: Program,
    index: SymbolIndex,
    symbols: SymbolRegistry,
    test_suffixes: Vec<String>,
}

impl AnalysisRun {
    /// Builds the forest for `roots` and indexes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or the index is inconsistent.
    pub fn build(source: &dyn ModelSource, roots: &[SourceRoot]) -> Result<Self, RunError> {
        let program = source.build_model(roots)?;
        Ok(Self::from_program(program)?)
    }

    /// Indexes an already built forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is inconsistent.
    pub fn from_program(program: Program) -> Result<Self, IndexError> {
        let index = SymbolIndex::build(&program)?;
        let symbols = SymbolRegistry::for_program(&program);
        debug!(
            "Analysis run ready: {} type(s), {} indexed declaration(s)",
            program.type_count(),
            index.declaration_count()
        );
        Ok(Self {
            program,
            index,
            symbols,
            test_suffixes: DEFAULT_TEST_SUFFIXES.iter().map(ToString::to_string).collect(),
        })
    }

    /// Adds names that resolve although nothing declares them.
    #[must_use]
    pub fn with_known_symbols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = self.symbols.with_known(names);
        self
    }

    /// Replaces the suffixes that mark test declarations.
    #[must_use]
    pub fn with_test_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the forest.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the symbol index.
    #[must_use]
    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// Returns the symbol registry.
    #[must_use]
    pub fn symbols(&self) -> &SymbolRegistry {
        &self.symbols
    }

    /// Returns the test suffixes.
    #[must_use]
    pub fn test_suffixes(&self) -> &[String] {
        &self.test_suffixes
    }

    /// Returns a location renderer over the forest.
    #[must_use]
    pub fn renderer(&self) -> LocationRenderer<'_> {
        LocationRenderer::new(&self.program)
    }

    /// Resolves a qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedSymbol`] if the name is unknown to this run.
    pub fn resolve<'a>(&self, name: &'a str) -> Result<&'a str, UnresolvedSymbol> {
        self.symbols.resolve(name)
    }

    /// Returns the nodes of `scope` accepted by `predicate`, in traversal
    /// order.
    #[must_use]
    pub fn evaluate(&self, predicate: &Predicate, scope: &Scope) -> Vec<Node<'_>> {
        let mut matches = Vec::new();
        walk(&self.program, scope, &mut |node| {
            if predicate.test(&node) {
                matches.push(node);
            }
        });
        debug!(
            "Predicate {} matched {} node(s)",
            predicate.label(),
            matches.len()
        );
        matches
    }

    /// Scope of the declarations referencing any type whose qualified name
    /// starts with `prefix`, looked up in the index.
    #[must_use]
    pub fn users_of(&self, prefix: &str) -> Scope {
        let mut users: Vec<&str> = self
            .index
            .users_matching(prefix)
            .into_iter()
            .map(|(_, user)| user)
            .collect();
        users.sort_unstable();
        users.dedup();
        self.declarations(users)
    }

    /// Scope of the named declarations; unknown names are ignored.
    #[must_use]
    pub fn declarations<'a, I>(&self, names: I) -> Scope
    where
        I: IntoIterator<Item = &'a str>,
    {
        Scope::Declarations(
            names
                .into_iter()
                .filter_map(|name| self.program.find_type(name).map(|(id, _)| id))
                .collect(),
        )
    }

    /// Renders the location of `node`.
    #[must_use]
    pub fn render(&self, node: &Node<'_>) -> String {
        self.renderer().render(node)
    }

    /// Aggregates `nodes` into one failure, or succeeds when empty.
    ///
    /// `message` receives each node and its rendered location.
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`PolicyFailure`] if `nodes` is not empty.
    pub fn report<'s, F>(
        &'s self,
        kind: FailureKind,
        rule: &str,
        nodes: &[Node<'s>],
        message: F,
    ) -> Result<(), PolicyFailure>
    where
        F: Fn(&Node<'s>, &str) -> String,
    {
        let renderer = self.renderer();
        let violations = nodes
            .iter()
            .map(|node| {
                let location = renderer.render(node);
                Violation::new(rule, message(node, &location), location)
            })
            .collect();
        aggregate(kind, rule, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{forbidden_symbol, UsageKind};
    use crate::source::SnapshotSource;

    const UNIT: &str = r#"{
        "file": "src/app/Jobs.java", "namespace": "app",
        "imports": ["lib.Legacy"],
        "types": [{
            "name": "Jobs", "line": 1,
            "methods": [{"name": "run", "line": 3, "body": [
                {"kind": "throw", "type": "java.lang.RuntimeException", "line": 4},
                {"kind": "throw", "type": "java.lang.RuntimeException", "line": 5},
                {"kind": "throw", "type": "java.lang.RuntimeException", "line": 6}
            ]}]
        }, {
            "name": "Clean", "line": 10
        }]
    }"#;

    fn run() -> AnalysisRun {
        let source = SnapshotSource::new().unit("main", UNIT);
        AnalysisRun::build(&source, &[SourceRoot::new("main")]).unwrap()
    }

    #[test]
    fn three_matches_aggregate_into_one_failure() {
        let run = run();
        let throws = forbidden_symbol(&[UsageKind::Throw], &["java.lang.RuntimeException".to_string()]);
        let nodes = run.evaluate(&throws, &Scope::Forest);
        assert_eq!(nodes.len(), 3);

        let err = run
            .report(FailureKind::Generic, "no-runtime-exception", &nodes, |_, at| {
                format!("Never throw RuntimeException in {at}")
            })
            .unwrap_err();
        assert_eq!(err.violations.len(), 3);
        for line in 4..=6 {
            assert!(err.message.contains(&format!("app.Jobs.run() Jobs.java:{line}")));
        }
    }

    #[test]
    fn empty_match_reports_success() {
        let run = run();
        let none = forbidden_symbol(&[], &["nothing.".to_string()]);
        let nodes = run.evaluate(&none, &Scope::Forest);
        assert!(run
            .report(FailureKind::Generic, "r", &nodes, |_, at| at.to_string())
            .is_ok());
    }

    #[test]
    fn index_driven_scope_visits_only_users() {
        let run = run();
        let Scope::Declarations(ids) = run.users_of("java.lang.Runtime") else {
            panic!("expected a declaration scope");
        };
        assert_eq!(ids.len(), 1);
        assert_eq!(run.program().type_decl(ids[0]).qualified_name(), "app.Jobs");
    }

    #[test]
    fn unknown_root_aborts() {
        let source = SnapshotSource::new();
        let err = AnalysisRun::build(&source, &[SourceRoot::new("missing")]).unwrap_err();
        assert!(matches!(err, RunError::Source(SourceError::UnknownRoot { .. })));
    }

    #[test]
    fn known_symbols_extend_resolution() {
        let run = run().with_known_symbols(["javax.persistence.Entity"]);
        assert!(run.resolve("javax.persistence.Entity").is_ok());
        assert!(run.resolve("lib.Legacy").is_ok());
        assert!(run.resolve("lib.Unknown").is_err());
    }
}
