//! Immutable references to types and members.
//!
//! Every reference carries a nullability flag, type annotations and
//! [`Tags`]. Equality and hashing cover everything except the tags. Values
//! are never mutated: `with_*` methods return modified copies.

/// Accessors and copy-with methods over a `decorations` field.
macro_rules! decorated {
    ($ty:ty) => {
        impl $ty {
            pub fn is_nullable(&self) -> bool {
                self.decorations.nullable
            }

            /// Whether this reference carries type annotations.
            pub fn is_annotated(&self) -> bool {
                !self.decorations.annotations.is_empty()
            }

            pub fn annotations(&self) -> &[$crate::names::AnnotationSpec] {
                &self.decorations.annotations
            }

            pub fn tags(&self) -> &$crate::names::Tags {
                &self.decorations.tags
            }

            /// A copy with `nullable` replaced.
            pub fn with_nullable(&self, nullable: bool) -> Self {
                let mut copy = self.clone();
                copy.decorations.nullable = nullable;
                copy
            }

            /// A copy with the annotation list replaced.
            pub fn with_annotations(&self, annotations: Vec<$crate::names::AnnotationSpec>) -> Self {
                let mut copy = self.clone();
                copy.decorations.annotations = annotations;
                copy
            }

            /// A copy with `annotation` appended.
            pub fn annotated(&self, annotation: $crate::names::AnnotationSpec) -> Self {
                let mut copy = self.clone();
                copy.decorations.annotations.push(annotation);
                copy
            }

            /// A copy with the tags replaced.
            pub fn with_tags(&self, tags: $crate::names::Tags) -> Self {
                let mut copy = self.clone();
                copy.decorations.tags = tags;
                copy
            }
        }
    };
}

pub(crate) use decorated;

mod annotation;
mod class_name;
pub mod kotlin;
mod member_name;
mod tags;
mod type_name;

use std::hash::{Hash, Hasher};

pub use annotation::{AnnotationSpec, AnnotationSpecBuilder, UseSiteTarget};
pub use class_name::ClassName;
pub use member_name::MemberName;
pub use tags::{TagValue, Tags};
pub use type_name::{LambdaTypeName, ParameterizedTypeName, TypeName, TypeVariableName, Variance, WildcardTypeName};

/// Decorations shared by all references.
#[derive(Debug, Clone, Default)]
pub(crate) struct Decorations {
    pub(crate) nullable: bool,
    pub(crate) annotations: Vec<AnnotationSpec>,
    pub(crate) tags: Tags,
}

impl PartialEq for Decorations {
    fn eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable && self.annotations == other.annotations
    }
}

impl Eq for Decorations {}

impl Hash for Decorations {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nullable.hash(state);
        self.annotations.hash(state);
    }
}
