use std::fmt;

use kpoet_codegen::{
    AnnotationSpec, Arg, CodeBlock, CodeBlockBuilder, CodeWriter, Emit, Result, TypeName, code_block,
};

use crate::modifier::{self, KModifier, Modifiers};

const ALLOWED_MODIFIERS: [KModifier; 3] = [KModifier::Vararg, KModifier::Noinline, KModifier::Crossinline];

/// A function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    name: String,
    type_name: TypeName,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    default_value: Option<CodeBlock>,
}

impl ParameterSpec {
    /// A plain `name: Type` parameter.
    pub fn of(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kdoc: CodeBlock::default(),
            annotations: Vec::new(),
            modifiers: Modifiers::new(),
            default_value: None,
        }
    }

    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> ParameterSpecBuilder {
        ParameterSpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: Modifiers::new(),
            default_value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn kdoc(&self) -> &CodeBlock {
        &self.kdoc
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn default_value(&self) -> Option<&CodeBlock> {
        self.default_value.as_ref()
    }

    pub fn to_builder(&self) -> ParameterSpecBuilder {
        ParameterSpecBuilder {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            kdoc: self.kdoc.to_builder(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            default_value: self.default_value.clone(),
        }
    }

    pub(crate) fn emit_with(&self, out: &mut CodeWriter, include_type: bool, inline_annotations: bool) -> Result<()> {
        out.emit_annotations(&self.annotations, inline_annotations)?;
        modifier::emit_modifiers(out, &self.modifiers, &Modifiers::new())?;
        if !self.name.is_empty() {
            out.emit_code(&code_block!("%N", self.name.as_str())?)?;
            if include_type {
                out.emit(": ")?;
            }
        }
        if include_type {
            out.emit_type(&self.type_name)?;
        }
        self.emit_default_value(out)
    }

    pub(crate) fn emit_default_value(&self, out: &mut CodeWriter) -> Result<()> {
        if let Some(default_value) = &self.default_value {
            let format = if default_value.has_statements() {
                " = %L"
            } else {
                " = «%L»"
            };
            out.emit_code(&code_block!(format, default_value)?)?;
        }
        Ok(())
    }
}

impl Emit for ParameterSpec {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        self.emit_with(out, true, true)
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_standalone().map_err(|_| fmt::Error)?)
    }
}

/// Write a parenthesized parameter list. More than two parameters, or
/// `force_newlines`, put one parameter per line with trailing commas.
pub(crate) fn emit_parameters<F>(
    out: &mut CodeWriter,
    parameters: &[ParameterSpec],
    force_newlines: bool,
    mut emit_one: F,
) -> Result<()>
where
    F: FnMut(&mut CodeWriter, &ParameterSpec) -> Result<()>,
{
    out.emit("(")?;
    if !parameters.is_empty() {
        let newlines = parameters.len() > 2 || force_newlines;
        if newlines {
            out.emit("\n")?;
            out.indent(1);
        }
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                out.emit(if newlines { "\n" } else { ", " })?;
            }
            emit_one(out, parameter)?;
            if newlines {
                out.emit(",")?;
            }
        }
        if newlines {
            out.unindent(1)?;
            out.emit("\n")?;
        }
    }
    out.emit(")")
}

#[derive(Debug, Clone)]
pub struct ParameterSpecBuilder {
    name: String,
    type_name: TypeName,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    default_value: Option<CodeBlock>,
}

impl ParameterSpecBuilder {
    pub fn add_kdoc(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.kdoc.add(format, args)?;
        Ok(self)
    }

    pub fn add_annotation(&mut self, annotation: AnnotationSpec) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = KModifier>) -> &mut Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn default_value(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.default_value = Some(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn default_value_code(&mut self, code: CodeBlock) -> &mut Self {
        self.default_value = Some(code);
        self
    }

    pub fn build(&self) -> Result<ParameterSpec> {
        modifier::require_allowed("parameters", &self.modifiers, &ALLOWED_MODIFIERS)?;
        Ok(ParameterSpec {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            kdoc: self.kdoc.build(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            default_value: self.default_value.clone(),
        })
    }
}
