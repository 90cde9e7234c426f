//! Core utilities and types for the kpoet Kotlin source generator.
//!
//! This crate provides the file-level types shared by the rendering
//! pipeline and the model layer.

mod file;
mod source;
mod utils;

// File operations
pub use file::{FileRules, GeneratedFile, Overwrite, WriteResult};
// Compilation units
pub use source::{KOTLIN_EXTENSION, SourceKind, SourceUnit};
// Identifier utilities
pub use utils::{is_identifier, is_identifier_part, is_identifier_start, package_to_path};
