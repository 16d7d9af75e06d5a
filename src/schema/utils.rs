// Utility functions for the schema module
//
// Shared helpers for building dotted name paths.

/// Folds a path segment for case-insensitive lookup. Only ASCII letters
/// are folded.
pub fn fold_case(segment: &str) -> String {
    segment.to_ascii_lowercase()
}

/// Appends `name` to the dotted `prefix`, folding the new segment when the
/// index is case-insensitive.
pub fn build_path(prefix: &str, name: &str, case_sensitive: bool) -> String {
    let segment = if case_sensitive {
        name.to_string()
    } else {
        fold_case(name)
    };

    if prefix.is_empty() {
        segment
    } else {
        let mut path = String::with_capacity(prefix.len() + 1 + segment.len());
        path.push_str(prefix);
        path.push('.');
        path.push_str(&segment);
        path
    }
}

/// Returns true if the requested names are exactly the select-all wildcard
pub fn is_select_all<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() == 1 && names[0].as_ref() == "*"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_path() {
        assert_eq!(build_path("", "a", true), "a");
        assert_eq!(build_path("a", "B", true), "a.B");
        assert_eq!(build_path("a", "B", false), "a.b");
        // The prefix is already folded by whoever built it.
        assert_eq!(build_path("A", "B", false), "A.b");
    }

    #[test]
    fn test_fold_case_is_ascii_only() {
        assert_eq!(fold_case("ValUE"), "value");
        assert_eq!(fold_case("Ärger"), "Ärger");
    }

    #[test]
    fn test_is_select_all() {
        assert!(is_select_all(&["*"]));
        assert!(!is_select_all(&["*", "a"]));
        assert!(!is_select_all::<&str>(&[]));
        assert!(!is_select_all(&["a.*"]));
    }
}
