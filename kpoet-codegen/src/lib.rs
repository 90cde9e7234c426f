//! Rendering pipeline for kpoet, a Kotlin source generator.
//!
//! This crate turns immutable code values into formatted Kotlin text. The
//! model layer (`kpoet`) builds on it.
//!
//! # Module Organization
//!
//! - [`name_allocator`] - Collision-free identifier allocation (NameAllocator, Keywords)
//! - [`line_wrapper`] - Column-aware wrapping at `♢` markers (LineWrapper)
//! - [`names`] - Type and member references (ClassName, TypeName, MemberName, AnnotationSpec)
//! - [`code_block`] - Templates with typed placeholders (CodeBlock, Arg)
//! - [`escape`] - String literal and identifier escaping
//! - [`resolver`] - Import collection and resolution (ImportCollector, Resolution)
//! - [`writer`] - The emission engine (CodeWriter, TypeScope)
//! - [`config`] - Formatting options (FormatOptions, Indent)

pub mod code_block;
pub mod config;
mod emit;
pub mod error;
pub mod escape;
mod indent;
mod keywords;
pub mod line_wrapper;
pub mod name_allocator;
pub mod names;
pub mod resolver;
pub mod writer;

pub use code_block::{Arg, CodeBlock, CodeBlockBuilder};
pub use config::{DEFAULT_COLUMN_LIMIT, FormatOptions};
pub use emit::Emit;
pub use error::{Error, Result};
pub use indent::Indent;
pub use keywords::Keywords;
pub use line_wrapper::{LineWrapper, NON_BREAKING_SPACE, WRAP};
pub use name_allocator::NameAllocator;
pub use names::{
    AnnotationSpec, AnnotationSpecBuilder, ClassName, LambdaTypeName, MemberName,
    ParameterizedTypeName, TagValue, Tags, TypeName, TypeVariableName, UseSiteTarget, Variance,
    WildcardTypeName,
};
pub use writer::{CodeWriter, TypeScope};
