//! Rendered Kotlin sources wrapped as compilation units.

use std::path::{Path, PathBuf};

use crate::{
    file::{FileRules, GeneratedFile},
    utils::package_to_path,
};

/// File extension of Kotlin sources.
pub const KOTLIN_EXTENSION: &str = "kt";

/// Classification of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A regular source file.
    Source,
}

/// A rendered source file addressed by package and declared name.
///
/// The location is the package path joined with `/`, followed by
/// `<name>.kt`. Content accessors return exactly the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    location: String,
    content: String,
    rules: FileRules,
}

impl SourceUnit {
    /// Wrap rendered `content` declared as `name` in `package`.
    pub fn new(package: &str, name: &str, content: impl Into<String>) -> Self {
        let dir = package_to_path(package);
        let location = if dir.is_empty() {
            format!("{name}.{KOTLIN_EXTENSION}")
        } else {
            format!("{dir}/{name}.{KOTLIN_EXTENSION}")
        };
        Self {
            location,
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Use custom write rules.
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Relative location, e.g. `com/example/Taco.kt`.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn kind(&self) -> SourceKind {
        SourceKind::Source
    }

    /// Character content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// UTF-8 byte content.
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

impl GeneratedFile for SourceUnit {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.location)
    }

    fn rules(&self) -> FileRules {
        self.rules
    }

    fn render(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{Overwrite, WriteResult};

    #[test]
    fn test_location_joins_package_and_name() {
        let unit = SourceUnit::new("com.example.tacos", "Taco", "class Taco\n");
        assert_eq!(unit.location(), "com/example/tacos/Taco.kt");
        assert_eq!(unit.kind(), SourceKind::Source);
    }

    #[test]
    fn test_location_default_package() {
        let unit = SourceUnit::new("", "Main", "");
        assert_eq!(unit.location(), "Main.kt");
    }

    #[test]
    fn test_content_accessors_agree() {
        let unit = SourceUnit::new("a", "B", "val s = \"ünïcödé\"\n");
        assert_eq!(unit.bytes(), unit.content().as_bytes());
        assert_eq!(
            String::from_utf8(unit.bytes().to_vec()).unwrap(),
            unit.content()
        );
    }

    #[test]
    fn test_write_below_base() {
        let temp = TempDir::new().unwrap();
        let unit = SourceUnit::new("com.example", "Taco", "class Taco\n");

        assert_eq!(unit.write(temp.path()).unwrap(), WriteResult::Written);
        assert_eq!(
            fs::read_to_string(temp.path().join("com/example/Taco.kt")).unwrap(),
            "class Taco\n"
        );
    }

    #[test]
    fn test_write_respects_rules() {
        let temp = TempDir::new().unwrap();
        SourceUnit::new("p", "A", "first").write(temp.path()).unwrap();

        let unit = SourceUnit::new("p", "A", "second").with_rules(FileRules {
            overwrite: Overwrite::IfMissing,
        });
        assert_eq!(unit.write(temp.path()).unwrap(), WriteResult::Skipped);
        assert_eq!(fs::read_to_string(temp.path().join("p/A.kt")).unwrap(), "first");
    }
}
