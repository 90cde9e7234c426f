use std::fmt;

use indexmap::IndexMap;
use kpoet_codegen::{
    AnnotationSpec, Arg, CodeBlock, CodeBlockBuilder, CodeWriter, Emit, Error, Result, TypeName,
    TypeVariableName, code_block, names::kotlin,
};

use crate::{
    modifier::{self, KModifier, Modifiers},
    parameter::{ParameterSpec, emit_parameters},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum FunKind {
    Named(String),
    Constructor,
    Getter,
    Setter,
}

/// The constructor a secondary constructor delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    This,
    Super,
}

impl Delegation {
    fn keyword(self) -> &'static str {
        match self {
            Self::This => "this",
            Self::Super => "super",
        }
    }
}

/// A function, constructor or property accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunSpec {
    kind: FunKind,
    kdoc: CodeBlock,
    receiver_kdoc: CodeBlock,
    return_kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    receiver_type: Option<TypeName>,
    return_type: TypeName,
    parameters: Vec<ParameterSpec>,
    delegation: Option<(Delegation, Vec<CodeBlock>)>,
    body: CodeBlock,
}

impl FunSpec {
    pub fn builder(name: impl Into<String>) -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Named(name.into()))
    }

    pub fn constructor_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Constructor)
    }

    pub fn getter_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Getter)
    }

    pub fn setter_builder() -> FunSpecBuilder {
        FunSpecBuilder::new(FunKind::Setter)
    }

    /// The declared name; `constructor`, `get` and `set` for the special
    /// kinds.
    pub fn name(&self) -> &str {
        match &self.kind {
            FunKind::Named(name) => name,
            FunKind::Constructor => "constructor",
            FunKind::Getter => "get",
            FunKind::Setter => "set",
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == FunKind::Constructor
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, FunKind::Getter | FunKind::Setter)
    }

    pub(crate) fn is_getter(&self) -> bool {
        self.kind == FunKind::Getter
    }

    pub(crate) fn is_setter(&self) -> bool {
        self.kind == FunKind::Setter
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

    pub fn type_variables(&self) -> &[TypeVariableName] {
        &self.type_variables
    }

    pub fn receiver_type(&self) -> Option<&TypeName> {
        self.receiver_type.as_ref()
    }

    pub fn return_type(&self) -> &TypeName {
        &self.return_type
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|parameter| parameter.name() == name)
    }

    pub fn body(&self) -> &CodeBlock {
        &self.body
    }

    pub fn to_builder(&self) -> FunSpecBuilder {
        FunSpecBuilder {
            kind: self.kind.clone(),
            kdoc: self.kdoc.to_builder(),
            receiver_kdoc: self.receiver_kdoc.clone(),
            return_kdoc: self.return_kdoc.clone(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            receiver_type: self.receiver_type.clone(),
            return_type: self.return_type.clone(),
            parameters: self.parameters.clone(),
            delegation: self.delegation.clone(),
            body: self.body.to_builder(),
        }
    }

    fn is_empty_setter(&self) -> bool {
        self.is_setter() && self.parameters.is_empty()
    }

    fn is_external_getter(&self) -> bool {
        self.is_getter() && self.modifiers.contains(&KModifier::External)
    }

    /// Write the function. `implicit` holds the modifiers the enclosing
    /// declaration implies; `include_kdoc_tags` appends `@receiver`,
    /// `@param` and `@return` sections.
    pub(crate) fn emit_with(&self, out: &mut CodeWriter, implicit: &Modifiers, include_kdoc_tags: bool) -> Result<()> {
        if include_kdoc_tags {
            out.emit_kdoc(&self.kdoc_with_tags()?)?;
        } else {
            out.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        }
        out.emit_annotations(&self.annotations, false)?;
        modifier::emit_modifiers(out, &self.modifiers, implicit)?;

        if let FunKind::Named(_) = self.kind {
            out.emit("fun ")?;
        }
        if !self.type_variables.is_empty() {
            out.emit_type_variables(&self.type_variables)?;
            out.emit(" ")?;
        }
        self.emit_signature(out)?;
        out.emit_where_block(&self.type_variables)?;

        if self.should_omit_body(implicit)? {
            return out.emit("\n");
        }
        if self.is_empty_setter() {
            return out.emit("\n");
        }
        out.emit(" {\n")?;
        out.indent(1);
        out.emit_code_with(&self.body, false, true)?;
        out.unindent(1)?;
        out.emit("}\n")
    }

    fn should_omit_body(&self, implicit: &Modifiers) -> Result<bool> {
        let has = |modifier: KModifier| self.modifiers.contains(&modifier) || implicit.contains(&modifier);
        if self.modifiers.contains(&KModifier::Abstract) || has(KModifier::Expect) {
            if !self.body.is_empty() {
                return Err(Error::invalid_spec(format!("function {} cannot have code", self.name())));
            }
            return Ok(true);
        }
        let can_omit = self.is_constructor() || has(KModifier::External);
        Ok(can_omit && self.body.is_empty())
    }

    fn emit_signature(&self, out: &mut CodeWriter) -> Result<()> {
        match &self.kind {
            FunKind::Constructor => out.emit("constructor")?,
            FunKind::Getter => out.emit("get")?,
            FunKind::Setter => out.emit("set")?,
            FunKind::Named(name) => {
                if let Some(receiver) = &self.receiver_type {
                    let format = if matches!(receiver, TypeName::Lambda(_)) { "(%T)." } else { "%T." };
                    out.emit_code(&code_block!(format, receiver)?)?;
                }
                out.emit_code(&code_block!("%N", name.as_str())?)?;
            }
        }

        if !self.is_empty_setter() && !self.is_external_getter() {
            let include_type = !self.is_setter();
            emit_parameters(out, &self.parameters, false, |out, parameter| {
                parameter.emit_with(out, include_type, true)
            })?;
        }

        if self.return_type != TypeName::from(kotlin::unit()) {
            out.emit_code(&code_block!(": %T", &self.return_type)?)?;
        }

        if let Some((delegation, arguments)) = &self.delegation {
            let prefix = format!(" : {}(", delegation.keyword());
            out.emit_code(&CodeBlock::join(arguments.iter().cloned(), ", ", &prefix, ")"))?;
        }
        Ok(())
    }

    fn kdoc_with_tags(&self) -> Result<CodeBlock> {
        let mut kdoc = self.kdoc.ensure_ends_with_newline().to_builder();
        let has_kdoc = !kdoc.is_empty();
        let mut separated = false;

        if !self.receiver_kdoc.is_empty() {
            if has_kdoc {
                kdoc.add("\n", &[])?;
                separated = true;
            }
            kdoc.add("@receiver %L", &[self.receiver_kdoc.ensure_ends_with_newline().into()])?;
        }
        for (i, parameter) in self.parameters.iter().enumerate() {
            if parameter.kdoc().is_empty() {
                continue;
            }
            if !separated && i == 0 && has_kdoc {
                kdoc.add("\n", &[])?;
                separated = true;
            }
            kdoc.add(
                "@param %L %L",
                &[parameter.name().into(), parameter.kdoc().ensure_ends_with_newline().into()],
            )?;
        }
        if !self.return_kdoc.is_empty() {
            if !separated && has_kdoc {
                kdoc.add("\n", &[])?;
            }
            kdoc.add("@return %L", &[self.return_kdoc.ensure_ends_with_newline().into()])?;
        }
        Ok(kdoc.build())
    }
}

impl Emit for FunSpec {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        self.emit_with(out, &modifier::set([KModifier::Public]), true)
    }
}

impl fmt::Display for FunSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_standalone().map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Clone)]
pub struct FunSpecBuilder {
    kind: FunKind,
    kdoc: CodeBlockBuilder,
    receiver_kdoc: CodeBlock,
    return_kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    receiver_type: Option<TypeName>,
    return_type: TypeName,
    parameters: Vec<ParameterSpec>,
    delegation: Option<(Delegation, Vec<CodeBlock>)>,
    body: CodeBlockBuilder,
}

impl FunSpecBuilder {
    fn new(kind: FunKind) -> Self {
        Self {
            kind,
            kdoc: CodeBlock::builder(),
            receiver_kdoc: CodeBlock::default(),
            return_kdoc: CodeBlock::default(),
            annotations: Vec::new(),
            modifiers: Modifiers::new(),
            type_variables: Vec::new(),
            receiver_type: None,
            return_type: kotlin::unit().into(),
            parameters: Vec::new(),
            delegation: None,
            body: CodeBlock::builder(),
        }
    }

    fn name(&self) -> &str {
        match &self.kind {
            FunKind::Named(name) => name,
            FunKind::Constructor => "constructor",
            FunKind::Getter => "get",
            FunKind::Setter => "set",
        }
    }

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

    pub fn add_type_variable(&mut self, type_variable: TypeVariableName) -> &mut Self {
        self.type_variables.push(type_variable);
        self
    }

    /// Make this an extension function on `receiver`.
    pub fn receiver(&mut self, receiver: impl Into<TypeName>, kdoc: Option<CodeBlock>) -> Result<&mut Self> {
        if !matches!(self.kind, FunKind::Named(_)) {
            return Err(Error::invalid_spec(format!("{} cannot have a receiver type", self.name())));
        }
        self.receiver_type = Some(receiver.into());
        self.receiver_kdoc = kdoc.unwrap_or_default();
        Ok(self)
    }

    pub fn returns(&mut self, return_type: impl Into<TypeName>, kdoc: Option<CodeBlock>) -> Result<&mut Self> {
        if !matches!(self.kind, FunKind::Named(_)) {
            return Err(Error::invalid_spec(format!("{} cannot have a return type", self.name())));
        }
        self.return_type = return_type.into();
        self.return_kdoc = kdoc.unwrap_or_default();
        Ok(self)
    }

    pub fn add_parameter(&mut self, parameter: ParameterSpec) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_parameters(&mut self, parameters: impl IntoIterator<Item = ParameterSpec>) -> &mut Self {
        self.parameters.extend(parameters);
        self
    }

    /// Delegate to another constructor of this class.
    pub fn call_this_constructor(&mut self, arguments: impl IntoIterator<Item = CodeBlock>) -> Result<&mut Self> {
        self.delegate(Delegation::This, arguments)
    }

    /// Delegate to a constructor of the superclass.
    pub fn call_super_constructor(&mut self, arguments: impl IntoIterator<Item = CodeBlock>) -> Result<&mut Self> {
        self.delegate(Delegation::Super, arguments)
    }

    fn delegate(&mut self, delegation: Delegation, arguments: impl IntoIterator<Item = CodeBlock>) -> Result<&mut Self> {
        if self.kind != FunKind::Constructor {
            return Err(Error::invalid_spec("only constructors can delegate to other constructors"));
        }
        self.delegation = Some((delegation, arguments.into_iter().collect()));
        Ok(self)
    }

    pub fn add_code(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.body.add(format, args)?;
        Ok(self)
    }

    pub fn add_named_code(&mut self, format: &str, args: &IndexMap<String, Arg>) -> Result<&mut Self> {
        self.body.add_named(format, args)?;
        Ok(self)
    }

    pub fn add_code_block(&mut self, code: &CodeBlock) -> &mut Self {
        self.body.add_code(code);
        self
    }

    /// Add a `//` comment line. Spaces in `format` never wrap.
    pub fn add_comment(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.body.add(&format!("//·{}\n", format.replace(' ', "·")), args)?;
        Ok(self)
    }

    pub fn add_statement(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.body.add_statement(format, args)?;
        Ok(self)
    }

    pub fn begin_control_flow(&mut self, control_flow: &str, args: &[Arg]) -> Result<&mut Self> {
        self.body.begin_control_flow(control_flow, args)?;
        Ok(self)
    }

    pub fn next_control_flow(&mut self, control_flow: &str, args: &[Arg]) -> Result<&mut Self> {
        self.body.next_control_flow(control_flow, args)?;
        Ok(self)
    }

    pub fn end_control_flow(&mut self) -> &mut Self {
        self.body.end_control_flow();
        self
    }

    pub fn build(&self) -> Result<FunSpec> {
        let name = self.name();
        modifier::require_single_visibility(&format!("function {name}"), &self.modifiers)?;

        let body_forbidden = self.modifiers.contains(&KModifier::Abstract) || self.modifiers.contains(&KModifier::Expect);
        if body_forbidden && !self.body.is_empty() {
            return Err(Error::invalid_spec(format!("abstract or expect function {name} cannot have code")));
        }
        match self.kind {
            FunKind::Getter => {
                if self.modifiers.contains(&KModifier::External) && !self.body.is_empty() {
                    return Err(Error::invalid_spec("external getter cannot have code"));
                }
                if !self.parameters.is_empty() {
                    return Err(Error::invalid_spec("get cannot have parameters"));
                }
            }
            FunKind::Setter => {
                if self.parameters.len() > 1 {
                    return Err(Error::invalid_spec("set can have at most one parameter"));
                }
                if self.parameters.is_empty() && !self.body.is_empty() {
                    return Err(Error::invalid_spec("parameterless setter cannot have code"));
                }
            }
            FunKind::Named(_) | FunKind::Constructor => {}
        }
        if matches!(self.kind, FunKind::Getter | FunKind::Setter) && !self.type_variables.is_empty() {
            return Err(Error::invalid_spec(format!("{name} cannot have type variables")));
        }
        if !self.modifiers.contains(&KModifier::Inline) && self.type_variables.iter().any(|variable| variable.is_reified()) {
            return Err(Error::invalid_spec("only type parameters of inline functions can be reified"));
        }

        Ok(FunSpec {
            kind: self.kind.clone(),
            kdoc: self.kdoc.build(),
            receiver_kdoc: self.receiver_kdoc.clone(),
            return_kdoc: self.return_kdoc.clone(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            receiver_type: self.receiver_type.clone(),
            return_type: self.return_type.clone(),
            parameters: self.parameters.clone(),
            delegation: self.delegation.clone(),
            body: self.body.build(),
        })
    }
}
