//! Indentation configuration for generated code.

use std::fmt;

use serde::Deserialize;

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 2-space indentation, the Kotlin convention.
    pub const KOTLIN: Self = Self::Spaces(2);

    /// 4-space indentation.
    pub const WIDE: Self = Self::Spaces(4);

    /// The string for one indent level.
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(width) => " ".repeat(usize::from(*width)),
            Self::Tab => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::KOTLIN
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_unit() {
        assert_eq!(Indent::Spaces(2).unit(), "  ");
        assert_eq!(Indent::Spaces(3).unit(), "   ");
        assert_eq!(Indent::Spaces(0).unit(), "");
        assert_eq!(Indent::Tab.unit(), "\t");
    }

    #[test]
    fn test_default() {
        assert_eq!(Indent::default(), Indent::KOTLIN);
        assert_eq!(Indent::WIDE, Indent::Spaces(4));
    }
}
