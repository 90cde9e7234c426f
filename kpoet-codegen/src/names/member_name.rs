use std::fmt;

use super::ClassName;
use crate::{error::Result, escape::escape_segments_if_necessary, writer::CodeWriter};

/// A function or property that can be referenced with `%M`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberName {
    package: String,
    enclosing_class: Option<ClassName>,
    simple_name: String,
    is_extension: bool,
}

impl MemberName {
    /// A top-level member of `package`.
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            enclosing_class: None,
            simple_name: simple_name.into(),
            is_extension: false,
        }
    }

    /// A member declared inside `enclosing`, e.g. a companion function.
    pub fn in_class(enclosing: &ClassName, simple_name: impl Into<String>) -> Self {
        Self {
            package: enclosing.package_name().to_string(),
            enclosing_class: Some(enclosing.undecorated()),
            simple_name: simple_name.into(),
            is_extension: false,
        }
    }

    /// A copy marked as an extension member. Extensions are always imported,
    /// even when a function of the same name is declared nearby.
    pub fn with_extension(&self, is_extension: bool) -> Self {
        Self {
            is_extension,
            ..self.clone()
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn enclosing_class(&self) -> Option<&ClassName> {
        self.enclosing_class.as_ref()
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn is_extension(&self) -> bool {
        self.is_extension
    }

    pub fn canonical_name(&self) -> String {
        match &self.enclosing_class {
            Some(enclosing) => format!("{}.{}", enclosing.canonical_name(), self.simple_name),
            None if self.package.is_empty() => self.simple_name.clone(),
            None => format!("{}.{}", self.package, self.simple_name),
        }
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        let name = out.lookup_member(self);
        out.emit(&escape_segments_if_necessary(&name)?)?;
        Ok(())
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(MemberName::new("com.example", "createTaco").canonical_name(), "com.example.createTaco");
        assert_eq!(MemberName::new("", "createTaco").canonical_name(), "createTaco");

        let taco = ClassName::new("com.example", "Taco");
        let member = MemberName::in_class(&taco.nested_class("Companion"), "create");
        assert_eq!(member.canonical_name(), "com.example.Taco.Companion.create");
        assert_eq!(member.package_name(), "com.example");
    }

    #[test]
    fn test_extension_flag_changes_identity() {
        let member = MemberName::new("kotlin.text", "trimIndent");
        let extension = member.with_extension(true);
        assert!(extension.is_extension());
        assert_ne!(member, extension);
    }

    #[test]
    fn test_enclosing_class_is_undecorated() {
        let taco = ClassName::new("com.example", "Taco").with_nullable(true);
        let member = MemberName::in_class(&taco, "create");
        assert!(!member.enclosing_class().is_some_and(ClassName::is_nullable));
    }
}
