//! Source-file glob patterns.

use std::path::Path;

/// Invalid glob pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern is empty.
    #[error("glob pattern must not be empty")]
    Empty,

    /// The pattern does not compile.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    Invalid {
        /// The rejected pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// A validated glob pattern for source file paths.
///
/// The glob is compiled once at construction and reused for all match calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
}

impl GlobPattern {
    /// Creates a new glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let compiled = glob::Pattern::new(pattern).map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether a source file path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if self.compiled.matches(&path_str) {
            return true;
        }
        // `dir/**` also matches anything below `dir/`.
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if path_str.starts_with(normalized)
                && path_str
                    .as_bytes()
                    .get(normalized.len())
                    .is_some_and(|&b| b == b'/')
            {
                return true;
            }
        }
        false
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_prefix() {
        let pattern = GlobPattern::new("src/legacy/**").unwrap();
        assert!(pattern.matches(Path::new("src/legacy/OldDao.java")));
        assert!(pattern.matches(Path::new("src/legacy/deep/Old.java")));
        assert!(!pattern.matches(Path::new("src/legacyx/Old.java")));
        assert!(!pattern.matches(Path::new("src/main/Old.java")));
    }

    #[test]
    fn test_file_wildcard() {
        let pattern = GlobPattern::new("**/*Migration.java").unwrap();
        assert!(pattern.matches(Path::new("src/db/V1Migration.java")));
        assert_eq!(pattern.as_str(), "**/*Migration.java");
    }

    #[test]
    fn test_rejects_invalid() {
        assert_eq!(GlobPattern::new(""), Err(PatternError::Empty));
        assert!(matches!(
            GlobPattern::new("src/[oops"),
            Err(PatternError::Invalid { .. })
        ));
    }
}
