//! Caller-defined metadata attached to references and specs.

use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use crate::error::{Error, Result};

/// A tag payload.
#[derive(Clone)]
pub enum TagValue {
    Text(String),
    Int(i64),
    Bool(bool),
    /// Any other shareable value, retrieved with [`Tags::downcast`].
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl TagValue {
    /// Wrap an arbitrary value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Debug for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Tags keyed by a caller-chosen discriminator.
///
/// Tags never take part in equality or hashing of the value carrying them.
#[derive(Debug, Clone, Default)]
pub struct Tags {
    map: BTreeMap<String, TagValue>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `key`, returning the value it replaces.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Option<TagValue> {
        self.map.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.map.remove(key)
    }

    /// The tag under `key`, if attached.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.map.get(key)
    }

    /// The tag under `key`; fails if it was never attached.
    pub fn require(&self, key: &str) -> Result<&TagValue> {
        self.get(key).ok_or_else(|| Error::MissingTag(key.to_string()))
    }

    /// The opaque payload under `key`, if it has type `T`.
    pub fn downcast<T: Any>(&self, key: &str) -> Option<&T> {
        match self.get(key)? {
            TagValue::Opaque(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.map.iter().map(|(key, value)| (key.as_str(), value))
    }
}
