//! Utility functions for rule implementations.

pub mod paths;
pub mod patterns;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use paths::{is_test_name, last_segment, path_matches, segment_contains};
#[doc(inline)]
pub use patterns::{GlobPattern, PatternError};
