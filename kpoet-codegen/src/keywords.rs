//! Reserved words of the target language.

/// A reserved-word table handed to allocators and escaping.
///
/// Tables are plain data: each [`NameAllocator`](crate::NameAllocator) copies
/// the words it is constructed with, so several tables can be in use at once.
#[derive(Debug, Clone, Copy)]
pub struct Keywords {
    /// Words that cannot be used as bare identifiers
    pub words: &'static [&'static str],
}

impl Keywords {
    /// Kotlin hard, soft and modifier keywords.
    pub const KOTLIN: Self = Self {
        words: KOTLIN_WORDS,
    };

    /// Check if a name is reserved.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.words.contains(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.words.iter().copied()
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self::KOTLIN
    }
}

// https://kotlinlang.org/docs/keyword-reference.html
const KOTLIN_WORDS: &[&str] = &[
    // Hard keywords
    "as",
    "break",
    "class",
    "continue",
    "do",
    "else",
    "false",
    "for",
    "fun",
    "if",
    "in",
    "interface",
    "is",
    "null",
    "object",
    "package",
    "return",
    "super",
    "this",
    "throw",
    "true",
    "try",
    "typealias",
    "typeof",
    "val",
    "var",
    "when",
    "while",
    // Soft keywords
    "by",
    "catch",
    "constructor",
    "delegate",
    "dynamic",
    "field",
    "file",
    "finally",
    "get",
    "import",
    "init",
    "param",
    "property",
    "receiver",
    "set",
    "setparam",
    "where",
    // Modifier keywords
    "actual",
    "abstract",
    "annotation",
    "companion",
    "const",
    "crossinline",
    "data",
    "enum",
    "expect",
    "external",
    "final",
    "infix",
    "inline",
    "inner",
    "internal",
    "lateinit",
    "noinline",
    "open",
    "operator",
    "out",
    "override",
    "private",
    "protected",
    "public",
    "reified",
    "sealed",
    "suspend",
    "tailrec",
    "value",
    "vararg",
    // Reserved for future use
    "header",
    "impl",
    "yield",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kotlin_reserved() {
        assert!(Keywords::KOTLIN.is_reserved("when"));
        assert!(Keywords::KOTLIN.is_reserved("property"));
        assert!(Keywords::KOTLIN.is_reserved("yield"));
        assert!(!Keywords::KOTLIN.is_reserved("taco"));
        assert!(!Keywords::KOTLIN.is_reserved("When"));
    }

    #[test]
    fn test_custom_table() {
        let table = Keywords {
            words: &["select", "from"],
        };
        assert!(table.is_reserved("select"));
        assert!(!table.is_reserved("when"));
        assert_eq!(table.iter().count(), 2);
    }
}
