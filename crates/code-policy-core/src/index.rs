//! Symbol index: which declaration references which types, and the inverse.
//!
//! The index is built once per run from a [`ReferenceModel`] and is
//! read-only afterwards. Reference iteration in the underlying model may
//! raise per-element faults; the builder skips them and then checks that the
//! number of distinct references it collected matches what the model
//! reported. A mismatch is a correctness fault and aborts the build.

use crate::model::Program;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A transient failure while reading one reference of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ReferenceFault {
    /// What went wrong.
    pub message: String,
}

impl ReferenceFault {
    /// Creates a fault.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from building the symbol index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Fewer (or more) distinct references were collected than reported.
    #[error(
        "inconsistent reference collection for `{declaration}`: collected {collected} distinct reference(s), model reported {reported}"
    )]
    InconsistentReferenceCount {
        /// Qualified name of the declaration.
        declaration: String,
        /// Distinct references actually collected.
        collected: usize,
        /// Distinct references the model reported up front.
        reported: usize,
    },
}

/// Reference view of a parsed program.
pub trait ReferenceModel {
    /// Returns the qualified names of all declarations to index.
    fn declarations(&self) -> Vec<String>;

    /// Returns the number of distinct types `declaration` references.
    fn reported_reference_count(&self, declaration: &str) -> usize;

    /// Iterates the referenced types of `declaration`, one item per
    /// occurrence. Items may be faults.
    fn references<'a>(
        &'a self,
        declaration: &'a str,
    ) -> Box<dyn Iterator<Item = Result<String, ReferenceFault>> + 'a>;
}

impl ReferenceModel for Program {
    fn declarations(&self) -> Vec<String> {
        self.types()
            .map(|(_, decl)| decl.qualified_name().to_string())
            .collect()
    }

    fn reported_reference_count(&self, declaration: &str) -> usize {
        self.find_type(declaration).map_or(0, |(_, decl)| {
            decl.reference_occurrences()
                .into_iter()
                .collect::<BTreeSet<_>>()
                .len()
        })
    }

    fn references<'a>(
        &'a self,
        declaration: &'a str,
    ) -> Box<dyn Iterator<Item = Result<String, ReferenceFault>> + 'a> {
        let occurrences = self
            .find_type(declaration)
            .map(|(_, decl)| decl.reference_occurrences())
            .unwrap_or_default();
        Box::new(occurrences.into_iter().map(|name| Ok(name.to_string())))
    }
}

/// Forward and inverse type-usage maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    forward: BTreeMap<String, BTreeSet<String>>,
    used_by: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolIndex {
    /// Builds the index from a reference model.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InconsistentReferenceCount`] if the distinct
    /// references collected for a declaration differ from the count the
    /// model reports.
    pub fn build<M: ReferenceModel + ?Sized>(model: &M) -> Result<Self, IndexError> {
        let mut forward = BTreeMap::new();

        for declaration in model.declarations() {
            let mut collected = BTreeSet::new();
            for item in model.references(&declaration) {
                match item {
                    Ok(referenced) => {
                        collected.insert(referenced);
                    }
                    Err(fault) => {
                        warn!("Skipping faulty reference of {declaration}: {fault}");
                    }
                }
            }

            let reported = model.reported_reference_count(&declaration);
            if collected.len() != reported {
                return Err(IndexError::InconsistentReferenceCount {
                    declaration,
                    collected: collected.len(),
                    reported,
                });
            }
            forward.insert(declaration, collected);
        }

        let mut used_by: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (declaration, referenced) in &forward {
            for ty in referenced {
                used_by
                    .entry(ty.clone())
                    .or_default()
                    .insert(declaration.clone());
            }
        }

        debug!(
            "Symbol index built: {} declaration(s), {} referenced type(s)",
            forward.len(),
            used_by.len()
        );
        Ok(Self { forward, used_by })
    }

    /// Returns the types referenced by `declaration`.
    pub fn references_of<'a>(&'a self, declaration: &str) -> impl Iterator<Item = &'a str> {
        self.forward
            .get(declaration)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Returns the declarations referencing `ty`.
    pub fn used_by<'a>(&'a self, ty: &str) -> impl Iterator<Item = &'a str> {
        self.used_by
            .get(ty)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Returns `(referenced type, user)` pairs for every referenced type
    /// whose qualified name starts with `prefix`, sorted.
    #[must_use]
    pub fn users_matching(&self, prefix: &str) -> Vec<(&str, &str)> {
        self.used_by
            .iter()
            .filter(|(ty, _)| ty.starts_with(prefix))
            .flat_map(|(ty, users)| users.iter().map(move |user| (ty.as_str(), user.as_str())))
            .collect()
    }

    /// Returns the forward map.
    #[must_use]
    pub fn forward(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.forward
    }

    /// Returns the inverse map.
    #[must_use]
    pub fn inverse(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.used_by
    }

    /// Returns the number of indexed declarations.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.forward.len()
    }
}
