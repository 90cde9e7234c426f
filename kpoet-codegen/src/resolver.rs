//! Import collection and resolution.
//!
//! A collecting render pass records every class and member that could be
//! shortened through an import, keyed by simple name, plus the simple names
//! that already resolved locally. [`ImportCollector::resolve`] then decides
//! which references are imported.

use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::names::{ClassName, MemberName};

/// Candidates for imports, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    types: IndexMap<String, IndexSet<ClassName>>,
    members: IndexMap<String, IndexSet<MemberName>>,
    /// Simple names that resolved without an import (same package or an
    /// enclosing type). These are never imported.
    referenced: HashSet<String>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `class` as importable through its top-level class, unless a
    /// member with the same simple name was seen first.
    pub fn add_type(&mut self, class: &ClassName) {
        let top_level = class.top_level_class_name();
        let simple_name = top_level.simple_name().to_string();
        if !self.members.contains_key(&simple_name) {
            self.types.entry(simple_name).or_default().insert(top_level);
        }
    }

    /// Record `member` as importable. Members of the default package and
    /// names already claimed by a type are skipped.
    pub fn add_member(&mut self, member: &MemberName) {
        if member.package_name().is_empty() {
            return;
        }
        let simple_name = member.simple_name().to_string();
        if !self.types.contains_key(&simple_name) {
            self.members.entry(simple_name).or_default().insert(member.clone());
        }
    }

    pub fn mark_referenced(&mut self, simple_name: &str) {
        if !self.referenced.contains(simple_name) {
            self.referenced.insert(simple_name.to_string());
        }
    }

    pub fn is_referenced(&self, simple_name: &str) -> bool {
        self.referenced.contains(simple_name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.members.is_empty()
    }

    /// Import every simple name with exactly one candidate. Collided names
    /// stay fully qualified.
    pub fn resolve(&self) -> Resolution {
        let mut resolution = Resolution::default();

        for (simple_name, candidates) in &self.types {
            if self.referenced.contains(simple_name) {
                continue;
            }
            match single(candidates) {
                Some(class) => {
                    debug!(name = %simple_name, import = %class.canonical_name(), "resolve.import");
                    resolution.types.insert(simple_name.clone(), class.clone());
                }
                None => debug!(name = %simple_name, candidates = candidates.len(), "resolve.collision"),
            }
        }

        for (simple_name, candidates) in &self.members {
            if self.referenced.contains(simple_name) {
                continue;
            }
            match single(candidates) {
                Some(member) => {
                    debug!(name = %simple_name, import = %member.canonical_name(), "resolve.import");
                    resolution.members.insert(simple_name.clone(), member.clone());
                }
                None => debug!(name = %simple_name, candidates = candidates.len(), "resolve.collision"),
            }
        }

        resolution
    }
}

fn single<T>(candidates: &IndexSet<T>) -> Option<&T> {
    if candidates.len() == 1 { candidates.first() } else { None }
}

/// The outcome of import resolution for one file.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    types: IndexMap<String, ClassName>,
    members: IndexMap<String, MemberName>,
}

impl Resolution {
    /// The class imported under `simple_name`, if any.
    pub fn imported_type(&self, simple_name: &str) -> Option<&ClassName> {
        self.types.get(simple_name)
    }

    /// The member imported under `simple_name`, if any.
    pub fn imported_member(&self, simple_name: &str) -> Option<&MemberName> {
        self.members.get(simple_name)
    }

    /// Canonical names of every import, sorted.
    pub fn imports(&self) -> BTreeSet<String> {
        self.types
            .values()
            .map(ClassName::canonical_name)
            .chain(self.members.values().map(MemberName::canonical_name))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_candidate_is_imported() {
        let mut collector = ImportCollector::new();
        let entry = ClassName::nested("kotlin.collections", &["Map", "Entry"]).unwrap();
        collector.add_type(&entry);
        collector.add_type(&entry);

        let resolution = collector.resolve();
        let map = resolution.imported_type("Map").unwrap();
        assert_eq!(map.canonical_name(), "kotlin.collections.Map");
        assert_eq!(
            resolution.imports().into_iter().collect::<Vec<_>>(),
            vec!["kotlin.collections.Map"]
        );
    }

    #[test]
    fn test_collision_stays_qualified() {
        let mut collector = ImportCollector::new();
        collector.add_type(&ClassName::new("java.util", "Date"));
        collector.add_type(&ClassName::new("java.sql", "Date"));
        collector.add_type(&ClassName::new("kotlin", "String"));

        let resolution = collector.resolve();
        assert!(resolution.imported_type("Date").is_none());
        assert!(resolution.imported_type("String").is_some());
        assert_eq!(resolution.imports().len(), 1);
    }

    #[test]
    fn test_referenced_names_suppress_imports() {
        let mut collector = ImportCollector::new();
        collector.add_type(&ClassName::new("com.other", "Taco"));
        collector.mark_referenced("Taco");

        let resolution = collector.resolve();
        assert!(resolution.is_empty());
        assert!(collector.is_referenced("Taco"));
    }

    #[test]
    fn test_members_and_types_do_not_share_names() {
        let mut collector = ImportCollector::new();
        collector.add_member(&MemberName::new("com.example", "Taco"));
        collector.add_type(&ClassName::new("com.example", "Taco"));
        collector.add_member(&MemberName::new("", "local"));

        let resolution = collector.resolve();
        assert!(resolution.imported_type("Taco").is_none());
        assert!(resolution.imported_member("Taco").is_some());
        assert!(resolution.imported_member("local").is_none());
    }

    #[test]
    fn test_imports_are_sorted() {
        let mut collector = ImportCollector::new();
        collector.add_type(&ClassName::new("kotlin", "String"));
        collector.add_member(&MemberName::new("com.example", "createTaco"));
        collector.add_type(&ClassName::new("com.example", "Taco"));

        let imports: Vec<String> = collector.resolve().imports().into_iter().collect();
        assert_eq!(imports, vec!["com.example.Taco", "com.example.createTaco", "kotlin.String"]);
    }
}
