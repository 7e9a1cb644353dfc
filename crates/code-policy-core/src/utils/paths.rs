//! Dot-separated qualified-name utilities.

/// Suffixes that mark a declaration as test code.
pub const DEFAULT_TEST_SUFFIXES: &[&str] = &["Test", "IT", "UT", "TT"];

/// Type names that never denote a declaration.
const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Checks if a qualified name matches a pattern.
///
/// Supports wildcards:
/// - `*` matches any single segment
/// - `**` matches any number of segments
///
/// # Examples
///
/// ```ignore
/// assert!(path_matches("org.junit.Assert", "org.junit.*"));
/// assert!(path_matches("org.junit.runner.Runner", "org.**"));
/// assert!(!path_matches("org.junit.Assert", "java.*"));
/// ```
#[must_use]
pub fn path_matches(path: &str, pattern: &str) -> bool {
    let path_parts: Vec<&str> = path.split('.').collect();
    let pattern_parts: Vec<&str> = pattern.split('.').collect();

    match_parts(&path_parts, &pattern_parts)
}

fn match_parts(path: &[&str], pattern: &[&str]) -> bool {
    let Some((&first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match first {
        "**" => (0..=path.len()).any(|i| match_parts(&path[i..], rest)),
        "*" => !path.is_empty() && match_parts(&path[1..], rest),
        literal => path.first() == Some(&literal) && match_parts(&path[1..], rest),
    }
}

/// Extracts the last segment from a qualified name.
#[must_use]
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Returns everything before the last segment, or `""` for a bare name.
#[must_use]
pub fn parent_path(path: &str) -> &str {
    path.rfind('.').map_or("", |dot| &path[..dot])
}

/// Checks whether the last segment of a namespace starts or ends with `searched`.
///
/// A namespace without dots is compared as a whole.
#[must_use]
pub fn segment_contains(namespace: &str, searched: &str) -> bool {
    let segment = last_segment(namespace);
    segment.starts_with(searched) || segment.ends_with(searched)
}

/// Suffix compared without regard to ASCII case (`FooTest`, `Footest`,
/// `FOOTEST`). Other suffixes match exactly.
const CASE_INSENSITIVE_TEST_SUFFIX: &str = "Test";

/// Checks whether a simple name ends with one of the test suffixes.
#[must_use]
pub fn is_test_name<S: AsRef<str>>(simple_name: &str, suffixes: &[S]) -> bool {
    suffixes.iter().any(|suffix| {
        let suffix = suffix.as_ref();
        if suffix == CASE_INSENSITIVE_TEST_SUFFIX {
            ends_with_ignore_ascii_case(simple_name, suffix)
        } else {
            simple_name.ends_with(suffix)
        }
    })
}

fn ends_with_ignore_ascii_case(name: &str, suffix: &str) -> bool {
    name.len()
        .checked_sub(suffix.len())
        .and_then(|start| name.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Strips generic arguments, array brackets and varargs from a type name.
///
/// Returns `None` for primitives and empty names.
#[must_use]
pub fn erase_type(raw: &str) -> Option<&str> {
    let base = raw.split('<').next().unwrap_or(raw).trim();
    let mut erased = base.trim_end_matches("...");
    while let Some(stripped) = erased.strip_suffix("[]") {
        erased = stripped.trim_end();
    }
    if erased.is_empty() || PRIMITIVES.contains(&erased) {
        None
    } else {
        Some(erased)
    }
}

/// Splits a type name into its base and every type argument, nested ones
/// included, each erased. Wildcards contribute their bound.
///
/// `java.util.Map<K, java.util.List<V>>` yields `java.util.Map`, `K`,
/// `java.util.List` and `V`.
#[must_use]
pub fn referenced_types<'a>(raw: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    raw.split(|c: char| matches!(c, '<' | '>' | ','))
        .map(|part| {
            let part = part.trim();
            part.strip_prefix("? extends ")
                .or_else(|| part.strip_prefix("? super "))
                .unwrap_or(part)
        })
        .filter(|part| *part != "?")
        .filter_map(erase_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matches_literal() {
        assert!(path_matches("java.sql.Date", "java.sql.Date"));
        assert!(!path_matches("java.sql.Date", "java.sql.Time"));
    }

    #[test]
    fn test_path_matches_wildcard() {
        assert!(path_matches("org.junit.Assert", "org.junit.*"));
        assert!(!path_matches("org.junit.runner.Runner", "org.junit.*"));
    }

    #[test]
    fn test_path_matches_globstar() {
        assert!(path_matches("org.junit.runner.Runner", "org.**"));
        assert!(path_matches("com.acme.legacy.OldDao", "**.legacy.*"));
        assert!(!path_matches("com.acme.OldDao", "**.legacy.*"));
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("com.acme.service"), "service");
        assert_eq!(last_segment("service"), "service");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("com.acme.Foo"), "com.acme");
        assert_eq!(parent_path("Foo"), "");
    }

    #[test]
    fn test_segment_contains() {
        assert!(segment_contains("com.acme.controller", "controller"));
        assert!(segment_contains("com.acme.restcontroller", "controller"));
        assert!(segment_contains("com.acme.controllers", "controller"));
        assert!(!segment_contains("com.controller.acme", "controller"));
        assert!(segment_contains("controller", "controller"));
    }

    #[test]
    fn test_is_test_name() {
        assert!(is_test_name("FooTest", DEFAULT_TEST_SUFFIXES));
        assert!(is_test_name("FooIT", DEFAULT_TEST_SUFFIXES));
        assert!(!is_test_name("Foo", DEFAULT_TEST_SUFFIXES));
        assert!(is_test_name("Footest", DEFAULT_TEST_SUFFIXES));
        assert!(is_test_name("FOOTEST", DEFAULT_TEST_SUFFIXES));
        assert!(!is_test_name("FooIt", DEFAULT_TEST_SUFFIXES));
        assert!(!is_test_name("Testimony", DEFAULT_TEST_SUFFIXES));
        assert!(!is_test_name("Tes", DEFAULT_TEST_SUFFIXES));
    }

    #[test]
    fn test_erase_type() {
        assert_eq!(erase_type("java.util.List<java.lang.String>"), Some("java.util.List"));
        assert_eq!(erase_type("java.lang.String[][]"), Some("java.lang.String"));
        assert_eq!(erase_type("java.lang.Object..."), Some("java.lang.Object"));
        assert_eq!(erase_type("int"), None);
        assert_eq!(erase_type("int[]"), None);
        assert_eq!(erase_type(""), None);
    }

    #[test]
    fn test_referenced_types_include_arguments() {
        let types: Vec<&str> =
            referenced_types("java.util.Map<java.lang.String, java.util.List<old.unsafe.Thing>>")
                .collect();
        assert_eq!(
            types,
            vec!["java.util.Map", "java.lang.String", "java.util.List", "old.unsafe.Thing"]
        );
    }

    #[test]
    fn test_referenced_types_wildcards_and_arrays() {
        let types: Vec<&str> =
            referenced_types("java.util.List<? extends app.Shape>[]").collect();
        assert_eq!(types, vec!["java.util.List", "app.Shape"]);
        assert_eq!(referenced_types("java.util.List<?>").count(), 1);
        assert_eq!(referenced_types("int").count(), 0);
    }
}
