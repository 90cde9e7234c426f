//! Collision-free identifier allocation.

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use kpoet_core::{is_identifier_part, is_identifier_start};

use crate::{
    error::{Error, Result},
    keywords::Keywords,
};

/// Assigns identifier names to avoid collisions, reserved words and invalid
/// characters.
///
/// Each allocation can be bound to a tag so the name can be looked up later:
///
/// ```
/// use kpoet_codegen::NameAllocator;
///
/// let mut names = NameAllocator::<&str>::new();
/// let column = names.new_name_with_tag("column name", "column").unwrap();
/// let other = names.new_name("column_name");
///
/// assert_eq!(column, "column_name");
/// assert_eq!(other, "column_name_");
/// assert_eq!(names.get(&"column").unwrap(), "column_name");
/// ```
///
/// Use [`copy`](Self::copy) to fork an allocator for a nested scope: the
/// fork starts from every name allocated so far and diverges afterwards.
#[derive(Debug, Clone)]
pub struct NameAllocator<T = String> {
    allocated: HashSet<String>,
    tag_to_name: HashMap<T, String>,
    /// Suggested names keyed like `tag_to_name`, reported on tag reuse
    tag_to_suggestion: HashMap<T, String>,
}

impl<T> NameAllocator<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Create an allocator with the Kotlin keywords reserved.
    pub fn new() -> Self {
        Self::with_keywords(&Keywords::KOTLIN)
    }

    /// Create an allocator with `keywords` reserved.
    pub fn with_keywords(keywords: &Keywords) -> Self {
        let mut allocator = Self::unreserved();
        allocator
            .allocated
            .extend(keywords.iter().map(str::to_string));
        allocator
    }

    /// Create an allocator without reserved words.
    pub fn unreserved() -> Self {
        Self {
            allocated: HashSet::new(),
            tag_to_name: HashMap::new(),
            tag_to_suggestion: HashMap::new(),
        }
    }

    /// Allocate a name for `suggestion` that cannot be looked up later.
    pub fn new_name(&mut self, suggestion: &str) -> String {
        self.allocate(suggestion)
    }

    /// Allocate a name for `suggestion` and bind it to `tag`.
    ///
    /// Fails without allocating if `tag` is already bound.
    pub fn new_name_with_tag(&mut self, suggestion: &str, tag: T) -> Result<String> {
        if let Some(existing) = self.tag_to_suggestion.get(&tag) {
            return Err(Error::TagAlreadyBound {
                tag: format!("{tag:?}"),
                existing: existing.clone(),
                requested: suggestion.to_string(),
            });
        }

        let name = self.allocate(suggestion);
        self.tag_to_suggestion.insert(tag.clone(), suggestion.to_string());
        self.tag_to_name.insert(tag, name.clone());
        Ok(name)
    }

    /// Name previously allocated for `tag`.
    pub fn get(&self, tag: &T) -> Result<&str> {
        self.try_get(tag)
            .ok_or_else(|| Error::UnknownTag(format!("{tag:?}")))
    }

    /// Name previously allocated for `tag`, if any.
    pub fn try_get(&self, tag: &T) -> Option<&str> {
        self.tag_to_name.get(tag).map(String::as_str)
    }

    pub fn contains(&self, tag: &T) -> bool {
        self.tag_to_name.contains_key(tag)
    }

    /// Fork this allocator; allocations on either side stay independent.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn allocate(&mut self, suggestion: &str) -> String {
        let mut name = to_identifier(suggestion);
        while self.allocated.contains(&name) {
            name.push('_');
        }
        self.allocated.insert(name.clone());
        tracing::trace!(suggestion, name = %name, "names.allocate");
        name
    }
}

impl<T> Default for NameAllocator<T>
where
    T: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize `suggestion` into an identifier.
pub fn to_identifier(suggestion: &str) -> String {
    let mut result = String::with_capacity(suggestion.len() + 1);
    for (i, c) in suggestion.chars().enumerate() {
        if i == 0 && !is_identifier_start(c) && is_identifier_part(c) {
            result.push('_');
        }
        result.push(if is_identifier_part(c) { c } else { '_' });
    }
    result
}
