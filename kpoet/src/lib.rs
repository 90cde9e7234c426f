//! Builders for Kotlin source files.
//!
//! Every declaration is an immutable spec made by a builder. Specs render
//! through [`kpoet_codegen::CodeWriter`]; a [`FileSpec`] adds the package
//! header and the imports its members need.
//!
//! ```
//! use kpoet::{FileSpec, FunSpec, TypeSpec};
//! use kpoet::names::kotlin;
//!
//! let mut greet = FunSpec::builder("greet");
//! greet.returns(kotlin::string(), None)?.add_statement("return %S", &["hello".into()])?;
//!
//! let mut greeter = TypeSpec::class_builder("Greeter");
//! greeter.add_function(greet.build()?);
//!
//! let file = FileSpec::get("com.example", greeter.build()?)?;
//! assert!(file.render()?.contains("import kotlin.String"));
//! # Ok::<(), kpoet::Error>(())
//! ```

mod file;
mod fun;
mod modifier;
mod parameter;
mod property;
mod type_alias;
mod type_spec;

pub use file::{FileMember, FileSpec, FileSpecBuilder};
pub use fun::{Delegation, FunSpec, FunSpecBuilder};
pub use modifier::{KModifier, Modifiers};
pub use parameter::{ParameterSpec, ParameterSpecBuilder};
pub use property::{PropertySpec, PropertySpecBuilder};
pub use type_alias::{TypeAliasSpec, TypeAliasSpecBuilder};
pub use type_spec::{EnumConstant, EnumConstantBuilder, TypeKind, TypeSpec, TypeSpecBuilder};

pub use kpoet_codegen::{
    AnnotationSpec, Arg, ClassName, CodeBlock, CodeBlockBuilder, Emit, Error, FormatOptions, Indent, LambdaTypeName,
    MemberName, NameAllocator, ParameterizedTypeName, Result, TypeName, TypeVariableName, UseSiteTarget, Variance,
    WildcardTypeName, code_block, names,
};
pub use kpoet_core::{SourceUnit, WriteResult};
