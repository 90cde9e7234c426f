use std::{cmp::Ordering, fmt};

use super::{Decorations, TypeName, type_name::ParameterizedTypeName};
use crate::{
    error::{Error, Result},
    writer::CodeWriter,
};

/// A fully-qualified class name, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    package: String,
    /// Top-level class first, then each nested class. Never empty.
    simple_names: Vec<String>,
    pub(crate) decorations: Decorations,
}

decorated!(ClassName);

impl ClassName {
    /// A top-level class in `package` (empty for the default package).
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
            decorations: Decorations::default(),
        }
    }

    /// A class nested through `simple_names`, outermost first.
    pub fn nested(package: impl Into<String>, simple_names: &[&str]) -> Result<Self> {
        if simple_names.is_empty() || simple_names.iter().any(|name| name.is_empty()) {
            return Err(Error::invalid_spec(format!(
                "simple names must be non-empty: {simple_names:?}"
            )));
        }
        Ok(Self {
            package: package.into(),
            simple_names: simple_names.iter().map(|name| name.to_string()).collect(),
            decorations: Decorations::default(),
        })
    }

    /// Guess the package and nesting of a dotted name, treating lowercase
    /// segments as the package and capitalized segments as classes.
    pub fn best_guess(name: &str) -> Result<Self> {
        let guess_error = || Error::invalid_spec(format!("couldn't make a guess for {name}"));

        let segments: Vec<&str> = name.split('.').collect();
        let split = segments
            .iter()
            .position(|segment| segment.chars().next().is_some_and(char::is_uppercase))
            .ok_or_else(guess_error)?;

        let (package, classes) = segments.split_at(split);
        if package.iter().any(|segment| segment.is_empty())
            || classes
                .iter()
                .any(|segment| !segment.chars().next().is_some_and(char::is_uppercase))
        {
            return Err(guess_error());
        }

        Self::nested(package.join("."), classes)
    }

    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    /// Dotted name including the package, e.g. `kotlin.collections.Map.Entry`.
    pub fn canonical_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_names.join(".")
        } else {
            format!("{}.{}", self.package, self.simple_names.join("."))
        }
    }

    /// A class nested in this one.
    pub fn nested_class(&self, name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(name.into());
        Self {
            package: self.package.clone(),
            simple_names,
            decorations: Decorations::default(),
        }
    }

    /// A class with the same enclosing class or package.
    pub fn peer_class(&self, name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.pop();
        simple_names.push(name.into());
        Self {
            package: self.package.clone(),
            simple_names,
            decorations: Decorations::default(),
        }
    }

    pub fn enclosing_class_name(&self) -> Option<Self> {
        if self.simple_names.len() == 1 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
            decorations: Decorations::default(),
        })
    }

    pub fn top_level_class_name(&self) -> Self {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..1].to_vec(),
            decorations: Decorations::default(),
        }
    }

    /// This class applied to `arguments`, e.g. `List<String>`.
    pub fn parameterized_by(&self, arguments: impl IntoIterator<Item = TypeName>) -> TypeName {
        TypeName::Parameterized(ParameterizedTypeName::new(self.clone(), arguments))
    }

    /// Whether both names address the same class, ignoring decorations.
    pub(crate) fn same_class(&self, other: &Self) -> bool {
        self.package == other.package && self.simple_names == other.simple_names
    }

    /// The bare class, without nullability, annotations or tags.
    pub(crate) fn undecorated(&self) -> Self {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names.clone(),
            decorations: Decorations::default(),
        }
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        let name = out.lookup_name(self);
        out.emit(&crate::escape::escape_segments_if_necessary(&name)?)?;
        Ok(())
    }
}

impl PartialOrd for ClassName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.package
            .cmp(&other.package)
            .then_with(|| self.simple_names.cmp(&other.simple_names))
            .then_with(|| self.decorations.nullable.cmp(&other.decorations.nullable))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::Class(self.clone()).fmt(f)
    }
}
