//! Parser collaborator seam.
//!
//! A [`ModelSource`] turns opaque source-root identifiers into a
//! [`Program`]. Parsing itself happens outside this crate; the bundled
//! [`SnapshotSource`] serves JSON model snapshots registered per root.

use crate::model::{ModelError, Program, ProgramBuilder};
use crate::snapshot;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Opaque identifier of a source root, passed through to the parser.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRoot(String);

impl SourceRoot {
    /// Creates a root identifier.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRoot {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}

/// Errors from building a program out of source roots.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source knows nothing about this root.
    #[error("unknown source root `{root}`")]
    UnknownRoot {
        /// The requested root.
        root: SourceRoot,
    },

    /// A snapshot document is not valid JSON for the schema.
    #[error("invalid model snapshot in `{root}` (unit #{unit}): {source}")]
    Snapshot {
        /// Root the document belongs to.
        root: SourceRoot,
        /// Position of the document within the root.
        unit: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The assembled forest breaks a model invariant.
    #[error("invalid program model: {0}")]
    Model(#[from] ModelError),
}

/// Builds the parsed forest for a set of source roots.
///
/// Implementations must be idempotent: the same roots yield the same
/// program.
pub trait ModelSource: Send + Sync {
    /// Builds the program for `roots`.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is unknown or its content is invalid.
    fn build_model(&self, roots: &[SourceRoot]) -> Result<Program, SourceError>;
}

/// Boxed [`ModelSource`].
pub type ModelSourceBox = Box<dyn ModelSource>;

/// A [`ModelSource`] over in-memory JSON snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    units: BTreeMap<SourceRoot, Vec<String>>,
}

impl SnapshotSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one compilation-unit snapshot under `root`.
    #[must_use]
    pub fn unit(mut self, root: impl Into<SourceRoot>, json: impl Into<String>) -> Self {
        self.units.entry(root.into()).or_default().push(json.into());
        self
    }

    /// Registers a root with no units.
    #[must_use]
    pub fn empty_root(mut self, root: impl Into<SourceRoot>) -> Self {
        self.units.entry(root.into()).or_default();
        self
    }
}

impl ModelSource for SnapshotSource {
    fn build_model(&self, roots: &[SourceRoot]) -> Result<Program, SourceError> {
        let mut builder = ProgramBuilder::new();
        for root in roots {
            let units = self.units.get(root).ok_or_else(|| SourceError::UnknownRoot {
                root: root.clone(),
            })?;
            debug!("Loading {} snapshot unit(s) from {root}", units.len());
            for (i, json) in units.iter().enumerate() {
                let unit = snapshot::parse_unit(json).map_err(|e| SourceError::Snapshot {
                    root: root.clone(),
                    unit: i,
                    source: e,
                })?;
                snapshot::add_unit(&mut builder, unit)?;
            }
        }
        Ok(builder.build())
    }
}
