//! Kotlin source files: package, imports and top-level members.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use kpoet_codegen::{
    AnnotationSpec, Arg, ClassName, CodeBlock, CodeBlockBuilder, CodeWriter, Error, FormatOptions, Result,
    UseSiteTarget, code_block, escape::escape_segments_if_necessary,
};
use kpoet_core::{GeneratedFile, SourceUnit, WriteResult};

use crate::{
    fun::FunSpec,
    modifier::{self, KModifier},
    property::{PropertySpec, PropertyStyle},
    type_alias::TypeAliasSpec,
    type_spec::TypeSpec,
};

/// Packages Kotlin imports implicitly on every platform.
const KOTLIN_DEFAULT_IMPORTS: [&str; 8] = [
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMember {
    Type(TypeSpec),
    Function(FunSpec),
    Property(PropertySpec),
    TypeAlias(TypeAliasSpec),
}

impl FileMember {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        let public = modifier::set([KModifier::Public]);
        match self {
            Self::Type(spec) => spec.emit_with(out, &Default::default(), false),
            Self::Function(spec) => spec.emit_with(out, &public, true),
            Self::Property(spec) => spec.emit_with(out, &public, PropertyStyle::MEMBER),
            Self::TypeAlias(spec) => kpoet_codegen::Emit::emit(spec, out),
        }
    }
}

/// A `.kt` file. Rendering runs twice over the members: once to collect
/// references and choose imports, once to write the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    package: String,
    name: String,
    comment: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    members: Vec<FileMember>,
    default_imports: IndexSet<String>,
    options: FormatOptions,
}

impl FileSpec {
    pub fn builder(package: impl Into<String>, name: impl Into<String>) -> FileSpecBuilder {
        FileSpecBuilder {
            package: package.into(),
            name: name.into(),
            comment: CodeBlock::builder(),
            annotations: Vec::new(),
            members: Vec::new(),
            default_imports: IndexSet::new(),
            options: FormatOptions::default(),
        }
    }

    /// A builder for the file that declares the top-level class `class`.
    pub fn builder_for(class: &ClassName) -> Result<FileSpecBuilder> {
        if class.simple_names().len() != 1 {
            return Err(Error::invalid_spec(format!(
                "nested types can't be used to name a file: {}",
                class.simple_names().join(".")
            )));
        }
        Ok(Self::builder(class.package_name(), class.simple_name()))
    }

    /// A file holding just `type_spec`, named after it.
    pub fn get(package: impl Into<String>, type_spec: TypeSpec) -> Result<Self> {
        let mut builder = Self::builder(package, type_spec.name());
        builder.add_type(type_spec);
        builder.build()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[FileMember] {
        &self.members
    }

    pub fn default_imports(&self) -> &IndexSet<String> {
        &self.default_imports
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Path below an output root, always with `/` separators.
    pub fn relative_path(&self) -> String {
        self.to_source_unit_with(String::new()).location().to_string()
    }

    pub fn to_builder(&self) -> FileSpecBuilder {
        FileSpecBuilder {
            package: self.package.clone(),
            name: self.name.clone(),
            comment: self.comment.to_builder(),
            annotations: self.annotations.clone(),
            members: self.members.clone(),
            default_imports: self.default_imports.clone(),
            options: self.options.clone(),
        }
    }

    /// Render the complete file text.
    pub fn render(&self) -> Result<String> {
        let default_imports = self
            .default_imports
            .iter()
            .map(|package| escape_segments_if_necessary(package))
            .collect::<Result<Vec<_>>>()?;
        CodeWriter::render_file(&self.options, |out| self.emit(out, &default_imports))
    }

    pub fn write_to(&self, sink: &mut impl fmt::Write) -> Result<()> {
        let text = self.render()?;
        sink.write_str(&text)?;
        Ok(())
    }

    /// The rendered file as a compilation unit at
    /// `<package path>/<name>.kt`.
    pub fn to_source_unit(&self) -> Result<SourceUnit> {
        Ok(self.to_source_unit_with(self.render()?))
    }

    fn to_source_unit_with(&self, content: String) -> SourceUnit {
        SourceUnit::new(&self.package, &self.name, content)
    }

    /// Write below `directory` using the package directory layout and
    /// return the path of the written file.
    pub fn write_to_dir(&self, directory: impl AsRef<Path>) -> eyre::Result<PathBuf> {
        let directory = directory.as_ref();
        eyre::ensure!(
            !directory.exists() || directory.is_dir(),
            "path {} exists but is not a directory",
            directory.display()
        );
        let unit = self.to_source_unit()?;
        let path = unit.path(directory);
        let result = unit.write(directory)?;
        tracing::debug!(path = %path.display(), written = (result == WriteResult::Written), "file.spec");
        Ok(path)
    }

    fn emit(&self, out: &mut CodeWriter, default_imports: &[String]) -> Result<()> {
        if !self.comment.is_empty() {
            out.emit_comment(&self.comment)?;
        }
        if !self.annotations.is_empty() {
            out.emit_annotations(&self.annotations, false)?;
            out.emit("\n")?;
        }

        out.push_package(&self.package)?;
        let package = escape_segments_if_necessary(&self.package)?;
        if !package.is_empty() {
            out.emit_code(&code_block!("package %L\n", package)?)?;
            out.emit("\n")?;
        }

        let mut imports = Vec::new();
        for import in out.imports() {
            let import = escape_segments_if_necessary(&import)?;
            let package = import.rsplit_once('.').map_or("", |(package, _)| package);
            if !default_imports.iter().any(|default| default == package) {
                imports.push(import);
            }
        }
        if !imports.is_empty() {
            for import in &imports {
                out.emit_code(&code_block!("import %L", import)?)?;
                out.emit("\n")?;
            }
            out.emit("\n")?;
        }

        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                out.emit("\n")?;
            }
            member.emit(out)?;
        }
        out.pop_package()
    }
}

impl fmt::Display for FileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Clone)]
pub struct FileSpecBuilder {
    package: String,
    name: String,
    comment: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    members: Vec<FileMember>,
    default_imports: IndexSet<String>,
    options: FormatOptions,
}

impl FileSpecBuilder {
    /// Add to the `//` comment at the top of the file.
    pub fn add_file_comment(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.comment.add(format, args)?;
        Ok(self)
    }

    pub fn clear_comment(&mut self) -> &mut Self {
        self.comment.clear();
        self
    }

    /// Add an `@file:` annotation. Annotations without a use-site target are
    /// retargeted to the file.
    pub fn add_annotation(&mut self, annotation: AnnotationSpec) -> Result<&mut Self> {
        let annotation = match annotation.use_site_target() {
            Some(UseSiteTarget::File) => annotation,
            None => annotation.to_builder().use_site_target(UseSiteTarget::File).build(),
            Some(other) => {
                return Err(Error::invalid_spec(format!(
                    "use-site target {} not supported for file annotations",
                    other.keyword()
                )));
            }
        };
        self.annotations.push(annotation);
        Ok(self)
    }

    pub fn add_type(&mut self, type_spec: TypeSpec) -> &mut Self {
        self.members.push(FileMember::Type(type_spec));
        self
    }

    pub fn add_function(&mut self, function: FunSpec) -> Result<&mut Self> {
        if function.is_constructor() || function.is_accessor() {
            return Err(Error::invalid_spec(format!(
                "cannot add {} to file {}",
                function.name(),
                self.name
            )));
        }
        self.members.push(FileMember::Function(function));
        Ok(self)
    }

    pub fn add_property(&mut self, property: PropertySpec) -> &mut Self {
        self.members.push(FileMember::Property(property));
        self
    }

    pub fn add_type_alias(&mut self, alias: TypeAliasSpec) -> &mut Self {
        self.members.push(FileMember::TypeAlias(alias));
        self
    }

    /// Treat `package` as implicitly imported: its types are referenced by
    /// simple name without an import line.
    pub fn add_default_package_import(&mut self, package: impl Into<String>) -> &mut Self {
        self.default_imports.insert(package.into());
        self
    }

    /// Add the packages every Kotlin file imports implicitly.
    pub fn add_kotlin_default_imports(&mut self) -> &mut Self {
        self.default_imports
            .extend(KOTLIN_DEFAULT_IMPORTS.iter().map(|package| package.to_string()));
        self
    }

    pub fn format_options(&mut self, options: FormatOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn build(&self) -> Result<FileSpec> {
        if self.name.is_empty() {
            return Err(Error::invalid_spec("file name must not be empty"));
        }
        Ok(FileSpec {
            package: self.package.clone(),
            name: self.name.clone(),
            comment: self.comment.build(),
            annotations: self.annotations.clone(),
            members: self.members.clone(),
            default_imports: self.default_imports.clone(),
            options: self.options.clone(),
        })
    }
}
