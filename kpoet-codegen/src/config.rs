//! Formatting options, loadable from TOML.
//!
//! ```toml
//! column_limit = 120
//! indent = { spaces = 4 }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{
    Indent,
    error::{Error, Result},
};

/// Column limit used when none is configured.
pub const DEFAULT_COLUMN_LIMIT: usize = 100;

/// Layout settings for one render.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    pub indent: Indent,
    /// Lines are wrapped at wrap points beyond this column.
    pub column_limit: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: Indent::KOTLIN,
            column_limit: DEFAULT_COLUMN_LIMIT,
        }
    }
}

impl FormatOptions {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_column_limit(mut self, column_limit: usize) -> Self {
        self.column_limit = column_limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert_eq!(options.indent, Indent::Spaces(2));
        assert_eq!(options.column_limit, 100);
    }

    #[test]
    fn test_parse_partial() {
        let options = FormatOptions::from_toml_str("column_limit = 80").unwrap();
        assert_eq!(options.column_limit, 80);
        assert_eq!(options.indent, Indent::KOTLIN);

        let options = FormatOptions::from_toml_str("indent = { spaces = 4 }").unwrap();
        assert_eq!(options.indent, Indent::Spaces(4));
        assert_eq!(options.column_limit, DEFAULT_COLUMN_LIMIT);

        let options = FormatOptions::from_toml_str("indent = \"tab\"").unwrap();
        assert_eq!(options.indent, Indent::Tab);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = FormatOptions::from_toml_str("columns = 80").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "column_limit = 60").unwrap();

        let options = FormatOptions::load(file.path()).unwrap();
        assert_eq!(options.column_limit, 60);

        let err = FormatOptions::load(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
