use std::fmt;

use kpoet_codegen::{
    AnnotationSpec, Arg, CodeBlock, CodeBlockBuilder, CodeWriter, Emit, Error, Result, TypeName,
    TypeVariableName, code_block,
};

use crate::{
    fun::FunSpec,
    modifier::{self, KModifier, Modifiers},
    parameter::ParameterSpec,
};

/// A `val` or `var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    name: String,
    type_name: TypeName,
    mutable: bool,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    initializer: Option<CodeBlock>,
    delegated: bool,
    getter: Option<FunSpec>,
    setter: Option<FunSpec>,
    receiver_type: Option<TypeName>,
}

/// How a property is written in a particular position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PropertyStyle {
    pub with_initializer: bool,
    pub emit_kdoc: bool,
    pub inline: bool,
    pub inline_annotations: bool,
}

impl PropertyStyle {
    pub const MEMBER: Self = Self {
        with_initializer: true,
        emit_kdoc: true,
        inline: false,
        inline_annotations: false,
    };

    /// Inside a primary constructor parameter list.
    pub const CONSTRUCTOR: Self = Self {
        with_initializer: false,
        emit_kdoc: true,
        inline: true,
        inline_annotations: false,
    };
}

impl PropertySpec {
    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> PropertySpecBuilder {
        PropertySpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            mutable: false,
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: Modifiers::new(),
            type_variables: Vec::new(),
            initializer: None,
            delegated: false,
            getter: None,
            setter: None,
            receiver_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
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

    pub fn initializer(&self) -> Option<&CodeBlock> {
        self.initializer.as_ref()
    }

    pub fn is_delegated(&self) -> bool {
        self.delegated
    }

    pub fn getter(&self) -> Option<&FunSpec> {
        self.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&FunSpec> {
        self.setter.as_ref()
    }

    pub fn to_builder(&self) -> PropertySpecBuilder {
        PropertySpecBuilder {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            mutable: self.mutable,
            kdoc: self.kdoc.to_builder(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            initializer: self.initializer.clone(),
            delegated: self.delegated,
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            receiver_type: self.receiver_type.clone(),
        }
    }

    pub(crate) fn has_accessors(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }

    /// This property declared through a primary constructor `parameter`.
    pub(crate) fn from_constructor_parameter(&self, parameter: &ParameterSpec) -> Self {
        let mut property = self.clone();
        property.annotations.extend(parameter.annotations().iter().cloned());
        property.modifiers.extend(parameter.modifiers().iter().copied());
        if property.kdoc.is_empty() {
            property.kdoc = parameter.kdoc().clone();
        }
        property
    }

    fn is_inline(&self) -> bool {
        let inline = |accessor: &Option<FunSpec>| {
            accessor
                .as_ref()
                .is_some_and(|accessor| accessor.modifiers().contains(&KModifier::Inline))
        };
        inline(&self.getter) && (!self.mutable || inline(&self.setter))
    }

    pub(crate) fn emit_with(&self, out: &mut CodeWriter, implicit: &Modifiers, style: PropertyStyle) -> Result<()> {
        let is_inline = self.is_inline();
        let mut modifiers = self.modifiers.clone();
        if is_inline {
            modifiers.insert(KModifier::Inline);
        }

        if style.emit_kdoc {
            out.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        }
        out.emit_annotations(&self.annotations, style.inline_annotations)?;
        modifier::emit_modifiers(out, &modifiers, implicit)?;
        out.emit(if self.mutable { "var " } else { "val " })?;
        if !self.type_variables.is_empty() {
            out.emit_type_variables(&self.type_variables)?;
            out.emit("♢")?;
        }
        if let Some(receiver) = &self.receiver_type {
            let format = if matches!(receiver, TypeName::Lambda(_)) { "(%T)." } else { "%T." };
            out.emit_code(&code_block!(format, receiver)?)?;
        }
        out.emit_code(&code_block!("%N:♢%T", self.name.as_str(), &self.type_name)?)?;

        if style.with_initializer
            && let Some(initializer) = &self.initializer
        {
            out.emit(if self.delegated { "♢by♢" } else { "♢=♢" })?;
            let format = if initializer.has_statements() { "%L" } else { "«%L»" };
            let constant = self.modifiers.contains(&KModifier::Const);
            out.emit_code_with(&code_block!(format, initializer.trim_trailing_newline())?, constant, false)?;
        }
        out.emit_where_block(&self.type_variables)?;
        if !style.inline {
            out.emit("\n")?;
        }

        let mut accessor_modifiers: Modifiers = implicit
            .iter()
            .copied()
            .filter(|modifier| !modifier.is_visibility())
            .collect();
        if is_inline {
            accessor_modifiers.insert(KModifier::Inline);
        }
        for accessor in [&self.getter, &self.setter].into_iter().flatten() {
            out.indent(1);
            accessor.emit_with(out, &accessor_modifiers, false)?;
            out.unindent(1)?;
        }
        Ok(())
    }
}

impl Emit for PropertySpec {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        self.emit_with(out, &modifier::set([KModifier::Public]), PropertyStyle::MEMBER)
    }
}

impl fmt::Display for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_standalone().map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Clone)]
pub struct PropertySpecBuilder {
    name: String,
    type_name: TypeName,
    mutable: bool,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    initializer: Option<CodeBlock>,
    delegated: bool,
    getter: Option<FunSpec>,
    setter: Option<FunSpec>,
    receiver_type: Option<TypeName>,
}

impl PropertySpecBuilder {
    /// Declare with `var` instead of `val`.
    pub fn mutable(&mut self, mutable: bool) -> &mut Self {
        self.mutable = mutable;
        self
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

    pub fn receiver(&mut self, receiver: impl Into<TypeName>) -> &mut Self {
        self.receiver_type = Some(receiver.into());
        self
    }

    pub fn initializer(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        Ok(self.initializer_code(CodeBlock::of(format, args)?))
    }

    pub fn initializer_code(&mut self, code: CodeBlock) -> &mut Self {
        self.initializer = Some(code);
        self.delegated = false;
        self
    }

    /// Delegate the property, as in `val x by lazy { ... }`.
    pub fn delegate(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        Ok(self.delegate_code(CodeBlock::of(format, args)?))
    }

    pub fn delegate_code(&mut self, code: CodeBlock) -> &mut Self {
        self.initializer = Some(code);
        self.delegated = true;
        self
    }

    pub fn getter(&mut self, getter: FunSpec) -> Result<&mut Self> {
        if !getter.is_getter() {
            return Err(Error::invalid_spec(format!("{} is not a getter", getter.name())));
        }
        self.getter = Some(getter);
        Ok(self)
    }

    pub fn setter(&mut self, setter: FunSpec) -> Result<&mut Self> {
        if !setter.is_setter() {
            return Err(Error::invalid_spec(format!("{} is not a setter", setter.name())));
        }
        self.setter = Some(setter);
        Ok(self)
    }

    pub fn build(&self) -> Result<PropertySpec> {
        let owner = format!("property {}", self.name);
        modifier::require_single_visibility(&owner, &self.modifiers)?;
        if self.mutable && self.modifiers.contains(&KModifier::Const) {
            return Err(Error::invalid_spec(format!("const {owner} cannot be a var")));
        }
        if !self.mutable && self.setter.is_some() {
            return Err(Error::invalid_spec("only a mutable property can have a setter"));
        }
        let inline_accessor = |accessor: &Option<FunSpec>| {
            accessor
                .as_ref()
                .is_none_or(|accessor| accessor.modifiers().contains(&KModifier::Inline))
        };
        let reifiable = (self.getter.is_some() || self.setter.is_some())
            && inline_accessor(&self.getter)
            && inline_accessor(&self.setter);
        if !reifiable && self.type_variables.iter().any(|variable| variable.is_reified()) {
            return Err(Error::invalid_spec(
                "only type parameters of properties with inline getters and/or setters can be reified",
            ));
        }

        Ok(PropertySpec {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            mutable: self.mutable,
            kdoc: self.kdoc.build(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            initializer: self.initializer.clone(),
            delegated: self.delegated,
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            receiver_type: self.receiver_type.clone(),
        })
    }
}
