//! Shared utility functions for identifier handling.

/// Whether `c` may start an identifier (letters, `_` and `$`).
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Whether `c` may appear after the first character of an identifier.
pub fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_numeric()
}

/// Check that `s` is a non-empty identifier in the JVM sense.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_part),
        None => false,
    }
}

/// Convert a package name to a relative directory path (e.g., "com.example" -> "com/example")
pub fn package_to_path(package: &str) -> String {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
