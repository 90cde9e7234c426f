//! Classes, objects, interfaces and their members.

use std::fmt;

use indexmap::IndexMap;
use kpoet_codegen::{
    AnnotationSpec, Arg, CodeBlock, CodeBlockBuilder, CodeWriter, Emit, Error, Result, TypeName, TypeScope,
    TypeVariableName, code_block, escape::escape_if_necessary,
};

use crate::{
    fun::FunSpec,
    modifier::{self, KModifier, Modifiers},
    parameter::emit_parameters,
    property::{PropertySpec, PropertyStyle},
    type_alias::TypeAliasSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Object,
    Interface,
}

impl TypeKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Object => "object",
            Self::Interface => "interface",
        }
    }

    fn defaults(self) -> Modifiers {
        match self {
            Self::Class | Self::Object => modifier::set([KModifier::Public]),
            Self::Interface => modifier::set([KModifier::Public, KModifier::Abstract]),
        }
    }

    /// `expect` and `external` carry over to members.
    fn inherited(modifiers: &Modifiers) -> Option<KModifier> {
        if modifiers.contains(&KModifier::Expect) {
            Some(KModifier::Expect)
        } else if modifiers.contains(&KModifier::External) {
            Some(KModifier::External)
        } else {
            None
        }
    }

    fn implicit_property_modifiers(self, modifiers: &Modifiers) -> Modifiers {
        let mut implicit = self.defaults();
        if !modifiers.contains(&KModifier::Annotation) {
            implicit.extend(Self::inherited(modifiers));
        }
        implicit
    }

    fn implicit_function_modifiers(self, modifiers: &Modifiers) -> Modifiers {
        let mut implicit = self.defaults();
        implicit.extend(Self::inherited(modifiers));
        implicit
    }

    fn implicit_type_modifiers(modifiers: &Modifiers) -> Modifiers {
        Self::inherited(modifiers).into_iter().collect()
    }
}

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    kind: TypeKind,
    name: String,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    primary_constructor: Option<FunSpec>,
    superclass: Option<TypeName>,
    superclass_constructor_parameters: Vec<CodeBlock>,
    superinterfaces: IndexMap<TypeName, Option<CodeBlock>>,
    enum_constants: IndexMap<String, EnumConstant>,
    properties: Vec<PropertySpec>,
    initializer_block: CodeBlock,
    initializer_index: Option<usize>,
    functions: Vec<FunSpec>,
    types: Vec<TypeSpec>,
    type_aliases: Vec<TypeAliasSpec>,
}

impl TypeSpec {
    pub fn class_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Class, name.into(), [])
    }

    pub fn object_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Object, name.into(), [])
    }

    /// A companion object. Without `name` it takes Kotlin's default name
    /// `Companion`, which is left out of the declaration.
    pub fn companion_object_builder(name: Option<&str>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(
            TypeKind::Object,
            name.unwrap_or("Companion").to_string(),
            [KModifier::Companion],
        )
    }

    pub fn interface_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Interface, name.into(), [])
    }

    pub fn fun_interface_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Interface, name.into(), [KModifier::Fun])
    }

    pub fn enum_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Class, name.into(), [KModifier::Enum])
    }

    pub fn annotation_builder(name: impl Into<String>) -> TypeSpecBuilder {
        TypeSpecBuilder::new(TypeKind::Class, name.into(), [KModifier::Annotation])
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn primary_constructor(&self) -> Option<&FunSpec> {
        self.primary_constructor.as_ref()
    }

    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn functions(&self) -> &[FunSpec] {
        &self.functions
    }

    pub fn types(&self) -> &[TypeSpec] {
        &self.types
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Class && self.modifiers.contains(&KModifier::Enum)
    }

    pub fn is_companion(&self) -> bool {
        self.kind == TypeKind::Object && self.modifiers.contains(&KModifier::Companion)
    }

    pub fn to_builder(&self) -> TypeSpecBuilder {
        TypeSpecBuilder {
            kind: self.kind,
            name: self.name.clone(),
            kdoc: self.kdoc.to_builder(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            primary_constructor: self.primary_constructor.clone(),
            superclass: self.superclass.clone(),
            superclass_constructor_parameters: self.superclass_constructor_parameters.clone(),
            superinterfaces: self.superinterfaces.clone(),
            enum_constants: self.enum_constants.clone(),
            properties: self.properties.clone(),
            initializer_block: self.initializer_block.to_builder(),
            initializer_index: self.initializer_index,
            functions: self.functions.clone(),
            types: self.types.clone(),
            type_aliases: self.type_aliases.clone(),
        }
    }

    fn scope(&self) -> TypeScope {
        TypeScope {
            name: self.name.clone(),
            nested_type_names: self.types.iter().map(|nested| nested.name.clone()).collect(),
            function_names: self
                .functions
                .iter()
                .filter(|function| !function.is_constructor())
                .map(|function| function.name().to_string())
                .collect(),
            enum_constants: self.enum_constants.keys().cloned().collect(),
            is_inner: self.modifiers.contains(&KModifier::Inner),
        }
    }

    fn has_initializer(&self) -> bool {
        self.initializer_index.is_some() && !self.initializer_block.is_empty()
    }

    /// Properties declared inline as `val`/`var` primary constructor
    /// parameters: no accessors, a parameter with the same name and type,
    /// and an initializer that is exactly that parameter.
    fn constructor_properties(&self) -> Result<IndexMap<String, PropertySpec>> {
        let mut result = IndexMap::new();
        let Some(constructor) = &self.primary_constructor else {
            return Ok(result);
        };
        let candidates = match self.initializer_index {
            Some(index) if self.has_initializer() => &self.properties[..index],
            _ => &self.properties[..],
        };
        for property in candidates {
            if property.has_accessors() {
                continue;
            }
            let Some(parameter) = constructor.parameter(property.name()) else {
                continue;
            };
            if parameter.type_name() != property.type_name() {
                continue;
            }
            let Some(initializer) = property.initializer() else {
                continue;
            };
            let parameter_name = escape_if_necessary(parameter.name())?;
            let initializer = initializer.render_standalone()?;
            let escaped_initializer = escape_if_necessary(&initializer).unwrap_or_else(|_| initializer.clone());
            if parameter_name == initializer || parameter_name == escaped_initializer {
                result.insert(property.name().to_string(), property.from_constructor_parameter(parameter));
            }
        }
        Ok(result)
    }

    fn has_no_body(&self, constructor_properties: &IndexMap<String, PropertySpec>) -> bool {
        self.properties
            .iter()
            .all(|property| constructor_properties.contains_key(property.name()))
            && self.enum_constants.is_empty()
            && self.initializer_block.is_empty()
            && self
                .primary_constructor
                .as_ref()
                .is_none_or(|constructor| constructor.body().is_empty())
            && self.functions.is_empty()
            && self.types.is_empty()
            && self.type_aliases.is_empty()
    }

    /// Class KDoc followed by `@constructor` and `@param` sections taken from
    /// the primary constructor.
    fn kdoc_with_constructor_docs(&self) -> Result<CodeBlock> {
        let class_kdoc = self.kdoc.ensure_ends_with_newline();
        let mut constructor_kdoc = CodeBlock::builder();
        if let Some(constructor) = &self.primary_constructor {
            if !constructor.kdoc().is_empty() {
                constructor_kdoc.add("@constructor %L", &[constructor.kdoc().ensure_ends_with_newline().into()])?;
            }
            for parameter in constructor.parameters() {
                if !parameter.kdoc().is_empty() {
                    constructor_kdoc.add(
                        "@param %L %L",
                        &[parameter.name().into(), parameter.kdoc().ensure_ends_with_newline().into()],
                    )?;
                }
            }
        }
        let sections = [class_kdoc, constructor_kdoc.build()]
            .into_iter()
            .filter(|section| !section.is_empty());
        Ok(CodeBlock::join(sections, "\n", "", ""))
    }

    /// Write the declaration. Nested types interrupt statement wrapping, so
    /// the statement state is stashed while this type is written.
    pub(crate) fn emit_with(&self, out: &mut CodeWriter, implicit: &Modifiers, nested_external: bool) -> Result<()> {
        let statement_line = out.statement_line();
        out.set_statement_line(None);
        let result = self.emit_declaration(out, implicit, nested_external);
        out.set_statement_line(statement_line);
        result
    }

    fn emit_declaration(&self, out: &mut CodeWriter, implicit: &Modifiers, nested_external: bool) -> Result<()> {
        let external = self.modifiers.contains(&KModifier::External) || nested_external;
        let constructor_properties = self.constructor_properties()?;

        out.emit_kdoc(&self.kdoc_with_constructor_docs()?)?;
        out.emit_annotations(&self.annotations, false)?;
        let header_implicit = if nested_external {
            modifier::set([KModifier::Public, KModifier::External])
        } else {
            modifier::set([KModifier::Public])
        };
        modifier::emit_modifiers(out, &self.modifiers, &header_implicit)?;
        out.emit(self.kind.keyword())?;
        if !(self.is_companion() && self.name == "Companion") {
            out.emit_code(&code_block!(" %N", self.name.as_str())?)?;
        }
        out.emit_type_variables(&self.type_variables)?;

        let mut wrap_supertypes = false;
        if let Some(constructor) = &self.primary_constructor {
            out.push_type(self.scope());
            let result = self.emit_primary_constructor(out, constructor, &constructor_properties);
            out.pop_type();
            result?;
            wrap_supertypes = !constructor.parameters().is_empty();
        }

        self.emit_supertypes(out, external, wrap_supertypes)?;
        out.emit_where_block(&self.type_variables)?;

        if self.has_no_body(&constructor_properties) {
            return out.emit("\n");
        }
        out.emit(" {\n")?;

        out.push_type(self.scope());
        out.indent(1);
        let result = self.emit_body(out, implicit, external, &constructor_properties);
        out.pop_type();
        result?;
        out.unindent(1)?;
        out.emit("}\n")
    }

    fn emit_primary_constructor(
        &self,
        out: &mut CodeWriter,
        constructor: &FunSpec,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> Result<()> {
        let has_annotations = !constructor.annotations().is_empty();
        let has_modifiers = !constructor.modifiers().is_empty();
        if has_annotations {
            out.emit(" ")?;
            out.emit_annotations(constructor.annotations(), true)?;
        }
        if has_modifiers {
            if !has_annotations {
                out.emit(" ")?;
            }
            modifier::emit_modifiers(out, constructor.modifiers(), &Modifiers::new())?;
        }
        if has_annotations || has_modifiers {
            out.emit("constructor")?;
        }

        let public = modifier::set([KModifier::Public]);
        emit_parameters(out, constructor.parameters(), true, |out, parameter| {
            match constructor_properties.get(parameter.name()) {
                Some(property) => {
                    property.emit_with(out, &public, PropertyStyle::CONSTRUCTOR)?;
                    parameter.emit_default_value(out)
                }
                None => parameter.emit_with(out, true, false),
            }
        })
    }

    fn emit_supertypes(&self, out: &mut CodeWriter, external: bool, wrap: bool) -> Result<()> {
        let mut supertypes = Vec::new();
        if let Some(superclass) = &self.superclass {
            let calls_constructor = self.primary_constructor.is_some()
                || !self.functions.iter().any(FunSpec::is_constructor);
            if calls_constructor && !external && !self.modifiers.contains(&KModifier::Expect) {
                let arguments = CodeBlock::join(self.superclass_constructor_parameters.iter().cloned(), ", ", "", "");
                supertypes.push(code_block!("%T(%L)", superclass, arguments)?);
            } else {
                supertypes.push(code_block!("%T", superclass)?);
            }
        }
        for (superinterface, delegate) in &self.superinterfaces {
            supertypes.push(match delegate {
                Some(delegate) => code_block!("%T by %L", superinterface, delegate)?,
                None => code_block!("%T", superinterface)?,
            });
        }
        if supertypes.is_empty() {
            return Ok(());
        }
        let separator = if wrap { ",\n    " } else { ",♢" };
        out.emit_code(&CodeBlock::join(supertypes, separator, " : ", ""))
    }

    fn emit_body(
        &self,
        out: &mut CodeWriter,
        implicit: &Modifiers,
        external: bool,
        constructor_properties: &IndexMap<String, PropertySpec>,
    ) -> Result<()> {
        let mut first_member = true;
        for constant in self.enum_constants.values() {
            if !first_member {
                out.emit("\n")?;
            }
            constant.emit(out)?;
            out.emit(",")?;
            first_member = false;
        }
        if self.is_enum() {
            if !first_member {
                out.emit("\n")?;
            }
            let has_members = !self.properties.is_empty()
                || !self.functions.is_empty()
                || !self.types.is_empty()
                || !self.initializer_block.is_empty();
            if has_members {
                out.emit(";\n")?;
            }
        }

        let mut initializer_emitted = false;
        let mut emit_initializer = |out: &mut CodeWriter, first_member: &mut bool| -> Result<()> {
            if initializer_emitted {
                return Ok(());
            }
            initializer_emitted = true;
            if self.has_initializer() {
                if !*first_member {
                    out.emit("\n")?;
                }
                out.emit_code(&self.initializer_block)?;
                *first_member = false;
            }
            Ok(())
        };

        let mut member_modifiers = self.modifiers.clone();
        member_modifiers.extend(implicit.iter().copied());

        let property_modifiers = self.kind.implicit_property_modifiers(&member_modifiers);
        for (index, property) in self.properties.iter().enumerate() {
            if Some(index) == self.initializer_index {
                emit_initializer(out, &mut first_member)?;
            }
            if constructor_properties.contains_key(property.name()) {
                continue;
            }
            if !first_member {
                out.emit("\n")?;
            }
            property.emit_with(out, &property_modifiers, PropertyStyle::MEMBER)?;
            first_member = false;
        }
        emit_initializer(out, &mut first_member)?;

        if let Some(constructor) = &self.primary_constructor
            && !constructor.body().is_empty()
        {
            out.emit("init {\n")?;
            out.indent(1);
            out.emit_code(constructor.body())?;
            out.unindent(1)?;
            out.emit("}\n")?;
        }

        let function_modifiers = self.kind.implicit_function_modifiers(&member_modifiers);

        let constructors = self.functions.iter().filter(|function| function.is_constructor());
        let functions = self.functions.iter().filter(|function| !function.is_constructor());
        for (function, include_kdoc_tags) in constructors.map(|f| (f, false)).chain(functions.map(|f| (f, true))) {
            if !first_member {
                out.emit("\n")?;
            }
            function.emit_with(out, &function_modifiers, include_kdoc_tags)?;
            first_member = false;
        }

        let type_modifiers = TypeKind::implicit_type_modifiers(&member_modifiers);
        for nested in &self.types {
            if !first_member {
                out.emit("\n")?;
            }
            nested.emit_with(out, &type_modifiers, external)?;
            first_member = false;
        }

        for alias in &self.type_aliases {
            if !first_member {
                out.emit("\n")?;
            }
            alias.emit(out)?;
            first_member = false;
        }
        Ok(())
    }
}

impl Emit for TypeSpec {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        self.emit_with(out, &Modifiers::new(), false)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_standalone().map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Clone)]
pub struct TypeSpecBuilder {
    kind: TypeKind,
    name: String,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
    primary_constructor: Option<FunSpec>,
    superclass: Option<TypeName>,
    superclass_constructor_parameters: Vec<CodeBlock>,
    superinterfaces: IndexMap<TypeName, Option<CodeBlock>>,
    enum_constants: IndexMap<String, EnumConstant>,
    properties: Vec<PropertySpec>,
    initializer_block: CodeBlockBuilder,
    initializer_index: Option<usize>,
    functions: Vec<FunSpec>,
    types: Vec<TypeSpec>,
    type_aliases: Vec<TypeAliasSpec>,
}

impl TypeSpecBuilder {
    fn new<const N: usize>(kind: TypeKind, name: String, modifiers: [KModifier; N]) -> Self {
        Self {
            kind,
            name,
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: modifier::set(modifiers),
            type_variables: Vec::new(),
            primary_constructor: None,
            superclass: None,
            superclass_constructor_parameters: Vec::new(),
            superinterfaces: IndexMap::new(),
            enum_constants: IndexMap::new(),
            properties: Vec::new(),
            initializer_block: CodeBlock::builder(),
            initializer_index: None,
            functions: Vec::new(),
            types: Vec::new(),
            type_aliases: Vec::new(),
        }
    }

    fn is_enum(&self) -> bool {
        self.kind == TypeKind::Class && self.modifiers.contains(&KModifier::Enum)
    }

    fn is_annotation(&self) -> bool {
        self.kind == TypeKind::Class && self.modifiers.contains(&KModifier::Annotation)
    }

    fn is_simple_class(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_enum() && !self.is_annotation()
    }

    fn require_superclass_allowed(&self) -> Result<()> {
        if !self.is_simple_class() && self.kind != TypeKind::Object {
            return Err(Error::invalid_spec(format!(
                "only classes can have super classes, not {} {}",
                self.kind.keyword(),
                self.name
            )));
        }
        Ok(())
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

    pub fn primary_constructor(&mut self, constructor: FunSpec) -> Result<&mut Self> {
        if self.kind != TypeKind::Class {
            return Err(Error::invalid_spec(format!(
                "{} can't have a primary constructor",
                self.kind.keyword()
            )));
        }
        if !constructor.is_constructor() {
            return Err(Error::invalid_spec(format!(
                "expected a constructor but was {}",
                constructor.name()
            )));
        }
        self.primary_constructor = Some(constructor);
        Ok(self)
    }

    pub fn superclass(&mut self, superclass: impl Into<TypeName>) -> Result<&mut Self> {
        self.require_superclass_allowed()?;
        if let Some(existing) = &self.superclass {
            return Err(Error::invalid_spec(format!("superclass already set to {existing}")));
        }
        self.superclass = Some(superclass.into());
        Ok(self)
    }

    pub fn add_superclass_constructor_parameter(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.require_superclass_allowed()?;
        self.superclass_constructor_parameters.push(CodeBlock::of(format, args)?);
        Ok(self)
    }

    /// Implement `superinterface`, optionally delegating to `delegate` with
    /// `by`.
    pub fn add_superinterface(&mut self, superinterface: impl Into<TypeName>, delegate: Option<CodeBlock>) -> Result<&mut Self> {
        let superinterface = superinterface.into();
        let Some(delegate) = delegate.filter(|delegate| !delegate.is_empty()) else {
            self.superinterfaces.insert(superinterface, None);
            return Ok(self);
        };
        if !self.is_simple_class() && self.kind != TypeKind::Object {
            return Err(Error::invalid_spec(format!(
                "delegation only allowed for classes and objects (found {} '{}')",
                self.kind.keyword(),
                self.name
            )));
        }
        if superinterface.is_nullable() {
            return Err(Error::invalid_spec(format!(
                "expected non-nullable type but was '{superinterface}'"
            )));
        }
        if let Some(Some(existing)) = self.superinterfaces.get(&superinterface) {
            return Err(Error::invalid_spec(format!(
                "'{}' can not delegate to {superinterface} by {delegate} with existing declaration by {existing}",
                self.name
            )));
        }
        self.superinterfaces.insert(superinterface, Some(delegate));
        Ok(self)
    }

    pub fn add_enum_constant(&mut self, constant: EnumConstant) -> &mut Self {
        self.enum_constants.insert(constant.name.clone(), constant);
        self
    }

    pub fn add_property(&mut self, property: PropertySpec) -> Result<&mut Self> {
        if self.modifiers.contains(&KModifier::Expect) {
            if property.initializer().is_some() {
                return Err(Error::invalid_spec("properties in expect classes can't have initializers"));
            }
            if property.has_accessors() {
                return Err(Error::invalid_spec(
                    "properties in expect classes can't have getters and setters",
                ));
            }
        }
        if self.is_enum() && matches!(property.name(), "name" | "ordinal") {
            return Err(Error::invalid_spec(format!(
                "{} is a final supertype member and can't be redeclared or overridden",
                property.name()
            )));
        }
        self.properties.push(property);
        Ok(self)
    }

    /// Add an `init { ... }` block after the properties added so far.
    pub fn add_initializer_block(&mut self, block: &CodeBlock) -> Result<&mut Self> {
        if !self.is_simple_class() && !self.is_enum() && self.kind != TypeKind::Object {
            return Err(Error::invalid_spec(format!(
                "{} can't have initializer blocks",
                self.kind.keyword()
            )));
        }
        if self.modifiers.contains(&KModifier::Expect) {
            return Err(Error::invalid_spec("expect types can't have initializer blocks"));
        }
        self.initializer_index = Some(self.properties.len());
        self.initializer_block
            .add("init {\n", &[])?
            .indent()
            .add_code(block)
            .unindent()
            .add("}\n", &[])?;
        Ok(self)
    }

    pub fn add_function(&mut self, function: FunSpec) -> &mut Self {
        self.functions.push(function);
        self
    }

    pub fn add_type(&mut self, nested: TypeSpec) -> &mut Self {
        self.types.push(nested);
        self
    }

    pub fn add_type_alias(&mut self, alias: TypeAliasSpec) -> &mut Self {
        self.type_aliases.push(alias);
        self
    }

    pub fn build(&self) -> Result<TypeSpec> {
        let name = &self.name;
        modifier::require_single_visibility(&format!("type {name}"), &self.modifiers)?;

        if !self.enum_constants.is_empty() && !self.is_enum() {
            return Err(Error::invalid_spec(format!(
                "{name} is not an enum and cannot have enum constants"
            )));
        }
        if !self.superclass_constructor_parameters.is_empty() && self.modifiers.contains(&KModifier::External) {
            return Err(Error::invalid_spec(
                "delegated constructor call in external class is not allowed",
            ));
        }

        let is_abstract = self.modifiers.contains(&KModifier::Abstract)
            || self.modifiers.contains(&KModifier::Sealed)
            || self.kind == TypeKind::Interface
            || self.is_enum();
        for function in &self.functions {
            if !is_abstract && function.modifiers().contains(&KModifier::Abstract) {
                return Err(Error::invalid_spec(format!(
                    "non-abstract type {name} cannot declare abstract function {}",
                    function.name()
                )));
            }
            if self.kind == TypeKind::Interface {
                let modifiers = function.modifiers();
                if modifiers.contains(&KModifier::Internal) || modifiers.contains(&KModifier::Protected) {
                    return Err(Error::invalid_spec(format!(
                        "interface function {} can't be internal or protected",
                        function.name()
                    )));
                }
                if modifiers.contains(&KModifier::Abstract) && modifiers.contains(&KModifier::Private) {
                    return Err(Error::invalid_spec(format!(
                        "interface function {} can't be both abstract and private",
                        function.name()
                    )));
                }
            } else if self.is_annotation() {
                return Err(Error::invalid_spec(format!(
                    "annotation class {name} cannot declare member function {}",
                    function.name()
                )));
            } else if self.modifiers.contains(&KModifier::Expect) && !function.body().is_empty() {
                return Err(Error::invalid_spec("functions in expect classes can't have bodies"));
            }
        }
        for property in &self.properties {
            if !is_abstract && property.modifiers().contains(&KModifier::Abstract) {
                return Err(Error::invalid_spec(format!(
                    "non-abstract type {name} cannot declare abstract property {}",
                    property.name()
                )));
            }
        }

        if self.primary_constructor.is_none()
            && self.functions.iter().any(FunSpec::is_constructor)
            && !self.superclass_constructor_parameters.is_empty()
        {
            return Err(Error::invalid_spec(
                "types without a primary constructor cannot specify secondary constructors and superclass constructor parameters",
            ));
        }

        if self.kind == TypeKind::Interface && self.modifiers.contains(&KModifier::Fun) && self.superinterfaces.is_empty() {
            let abstract_functions = self
                .functions
                .iter()
                .filter(|function| function.modifiers().contains(&KModifier::Abstract))
                .count();
            if abstract_functions != 1 {
                return Err(Error::invalid_spec(format!(
                    "functional interfaces must have exactly one abstract function, {name} has {abstract_functions}"
                )));
            }
        }

        match self.types.iter().filter(|nested| nested.is_companion()).count() {
            0 => {}
            1 => {
                if !self.is_simple_class() && self.kind != TypeKind::Interface && !self.is_enum() && !self.is_annotation() {
                    return Err(Error::invalid_spec(format!(
                        "{} types can't have a companion object",
                        self.kind.keyword()
                    )));
                }
            }
            _ => {
                return Err(Error::invalid_spec(
                    "multiple companion objects are present but only one is allowed",
                ));
            }
        }

        Ok(TypeSpec {
            kind: self.kind,
            name: self.name.clone(),
            kdoc: self.kdoc.build(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
            primary_constructor: self.primary_constructor.clone(),
            superclass: self.superclass.clone(),
            superclass_constructor_parameters: self.superclass_constructor_parameters.clone(),
            superinterfaces: self.superinterfaces.clone(),
            enum_constants: self.enum_constants.clone(),
            properties: self.properties.clone(),
            initializer_block: self.initializer_block.build(),
            initializer_index: self.initializer_index,
            functions: self.functions.clone(),
            types: self.types.clone(),
            type_aliases: self.type_aliases.clone(),
        })
    }
}

/// One constant of an enum class, with optional constructor arguments and
/// a body of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    name: String,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    arguments: Vec<CodeBlock>,
    properties: Vec<PropertySpec>,
    functions: Vec<FunSpec>,
}

impl EnumConstant {
    pub fn of(name: impl Into<String>) -> Result<Self> {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> EnumConstantBuilder {
        EnumConstantBuilder {
            name: name.into(),
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            arguments: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        out.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        out.emit_annotations(&self.annotations, false)?;
        out.emit_code(&code_block!("%N", self.name.as_str())?)?;
        if !self.arguments.is_empty() {
            out.emit_code(&CodeBlock::join(self.arguments.iter().cloned(), ", ", "(", ")"))?;
        }
        if self.properties.is_empty() && self.functions.is_empty() {
            return Ok(());
        }
        out.emit(" {\n")?;

        let mut scope = TypeScope::new(self.name.as_str());
        scope.function_names = self.functions.iter().map(|function| function.name().to_string()).collect();
        out.push_type(scope);
        out.indent(1);
        let result = self.emit_body(out);
        out.pop_type();
        result?;
        out.unindent(1)?;
        out.emit("}")
    }

    fn emit_body(&self, out: &mut CodeWriter) -> Result<()> {
        let public = modifier::set([KModifier::Public]);
        let mut first_member = true;
        for property in &self.properties {
            if !first_member {
                out.emit("\n")?;
            }
            property.emit_with(out, &public, PropertyStyle::MEMBER)?;
            first_member = false;
        }
        for function in &self.functions {
            if !first_member {
                out.emit("\n")?;
            }
            function.emit_with(out, &public, true)?;
            first_member = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EnumConstantBuilder {
    name: String,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    arguments: Vec<CodeBlock>,
    properties: Vec<PropertySpec>,
    functions: Vec<FunSpec>,
}

impl EnumConstantBuilder {
    pub fn add_kdoc(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.kdoc.add(format, args)?;
        Ok(self)
    }

    pub fn add_annotation(&mut self, annotation: AnnotationSpec) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a constructor argument, as in `RED(0xff0000)`.
    pub fn add_argument(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.arguments.push(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn add_property(&mut self, property: PropertySpec) -> &mut Self {
        self.properties.push(property);
        self
    }

    pub fn add_function(&mut self, function: FunSpec) -> &mut Self {
        self.functions.push(function);
        self
    }

    pub fn build(&self) -> Result<EnumConstant> {
        if matches!(self.name.as_str(), "name" | "ordinal") {
            return Err(Error::invalid_spec(format!(
                "constant with name \"{}\" conflicts with a supertype member with the same name",
                self.name
            )));
        }
        Ok(EnumConstant {
            name: self.name.clone(),
            kdoc: self.kdoc.build(),
            annotations: self.annotations.clone(),
            arguments: self.arguments.clone(),
            properties: self.properties.clone(),
            functions: self.functions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use kpoet_codegen::{ClassName, names::kotlin};

    use super::*;
    use crate::parameter::ParameterSpec;

    fn property(name: &str, type_name: ClassName, initializer: &str) -> PropertySpec {
        let mut builder = PropertySpec::builder(name, type_name);
        builder.initializer(initializer, &[]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_empty_class_has_no_braces() {
        let spec = TypeSpec::class_builder("Taco").build().unwrap();
        assert_eq!(spec.to_string(), "public class Taco\n");
    }

    #[test]
    fn test_data_class_with_constructor_properties() {
        let mut constructor = FunSpec::constructor_builder();
        constructor
            .add_parameter(ParameterSpec::of("name", kotlin::string()))
            .add_parameter(ParameterSpec::of("count", kotlin::int()));

        let mut builder = TypeSpec::class_builder("Order");
        builder
            .add_modifiers([KModifier::Data])
            .primary_constructor(constructor.build().unwrap())
            .unwrap()
            .add_property(property("name", kotlin::string(), "name"))
            .unwrap()
            .add_property(property("count", kotlin::int(), "count"))
            .unwrap();

        assert_eq!(
            builder.build().unwrap().to_string(),
            "public data class Order(\n  public val name: kotlin.String,\n  public val count: kotlin.Int,\n)\n"
        );
    }

    #[test]
    fn test_constructor_kdoc_moves_to_header() {
        let mut constructor = FunSpec::constructor_builder();
        constructor.add_kdoc("Construct a thing!", &[]).unwrap();
        for name in ["first", "second"] {
            let mut parameter = ParameterSpec::builder(name, kotlin::int());
            parameter.add_kdoc("the %L thing", &[name.into()]).unwrap();
            constructor.add_parameter(parameter.build().unwrap());
        }

        let mut builder = TypeSpec::class_builder("MyType");
        builder
            .add_kdoc("This is a thing for stuff.", &[])
            .unwrap()
            .primary_constructor(constructor.build().unwrap())
            .unwrap()
            .add_property(property("first", kotlin::int(), "first"))
            .unwrap();

        assert_eq!(
            builder.build().unwrap().to_string(),
            "/**\n * This is a thing for stuff.\n *\n * @constructor Construct a thing!\n * @param first the first thing\n * @param second the second thing\n */\npublic class MyType(\n  /**\n   * the first thing\n   */\n  public val first: kotlin.Int,\n  second: kotlin.Int,\n)\n"
        );
    }

    #[test]
    fn test_supertypes_and_members() {
        let base = ClassName::new("com.example", "Base");
        let runnable = ClassName::new("java.lang", "Runnable");

        let mut run = FunSpec::builder("run");
        run.add_modifiers([KModifier::Override]).add_statement("println(%S)", &["run".into()]).unwrap();

        let mut builder = TypeSpec::class_builder("Task");
        builder
            .superclass(base)
            .unwrap()
            .add_superclass_constructor_parameter("%S", &["task".into()])
            .unwrap()
            .add_superinterface(runnable, None)
            .unwrap()
            .add_property(property("id", kotlin::int(), "0"))
            .unwrap()
            .add_function(run.build().unwrap());

        assert_eq!(
            builder.build().unwrap().to_string(),
            "public class Task : com.example.Base(\"task\"), java.lang.Runnable {\n  public val id: kotlin.Int = 0\n\n  override fun run() {\n    println(\"run\")\n  }\n}\n"
        );
    }

    #[test]
    fn test_enum_with_constants_and_members() {
        let mut constructor = FunSpec::constructor_builder();
        constructor.add_parameter(ParameterSpec::of("rgb", kotlin::int()));

        let mut red = EnumConstant::builder("RED");
        red.add_argument("%L", &[0xff0000.into()]).unwrap();
        let mut green = EnumConstant::builder("GREEN");
        green.add_argument("%L", &[0x00ff00.into()]).unwrap();

        let mut builder = TypeSpec::enum_builder("Color");
        builder
            .primary_constructor(constructor.build().unwrap())
            .unwrap()
            .add_enum_constant(red.build().unwrap())
            .add_enum_constant(green.build().unwrap())
            .add_property(property("rgb", kotlin::int(), "rgb"))
            .unwrap()
            .add_function(FunSpec::builder("describe").build().unwrap());

        assert_eq!(
            builder.build().unwrap().to_string(),
            "public enum class Color(\n  public val rgb: kotlin.Int,\n) {\n  RED(16_711_680),\n  GREEN(65_280),\n  ;\n\n  public fun describe() {\n  }\n}\n"
        );
    }

    #[test]
    fn test_enum_constant_rules() {
        assert!(EnumConstant::of("ordinal").is_err());

        let mut builder = TypeSpec::class_builder("NotEnum");
        builder.add_enum_constant(EnumConstant::of("A").unwrap());
        let err = builder.build().unwrap_err();
        assert_eq!(err.to_string(), "NotEnum is not an enum and cannot have enum constants");
    }

    #[test]
    fn test_interface_members_are_implicitly_abstract() {
        let mut greet = FunSpec::builder("greet");
        greet.add_modifiers([KModifier::Abstract]);
        let name = PropertySpec::builder("name", kotlin::string()).build().unwrap();

        let mut builder = TypeSpec::interface_builder("Greeter");
        builder.add_property(name).unwrap().add_function(greet.build().unwrap());
        assert_eq!(
            builder.build().unwrap().to_string(),
            "public interface Greeter {\n  public val name: kotlin.String\n\n  public fun greet()\n}\n"
        );
    }

    #[test]
    fn test_abstract_function_requires_abstract_type() {
        let mut greet = FunSpec::builder("greet");
        greet.add_modifiers([KModifier::Abstract]);
        let mut builder = TypeSpec::class_builder("Concrete");
        builder.add_function(greet.build().unwrap());
        assert!(matches!(builder.build(), Err(Error::InvalidSpec(_))));

        builder.add_modifiers([KModifier::Abstract]);
        assert_eq!(
            builder.build().unwrap().to_string(),
            "public abstract class Concrete {\n  public abstract fun greet()\n}\n"
        );
    }

    #[test]
    fn test_companion_and_nested_scopes() {
        let outer = ClassName::new("com.example", "Outer");
        let nested = outer.nested_class("Nested");

        let mut create = FunSpec::builder("create");
        create.returns(nested.clone(), None).unwrap().add_statement("return %T()", &[nested.into()]).unwrap();
        let mut companion = TypeSpec::companion_object_builder(None);
        companion.add_function(create.build().unwrap());

        let mut builder = TypeSpec::class_builder("Outer");
        builder
            .add_type(TypeSpec::class_builder("Nested").build().unwrap())
            .add_type(companion.build().unwrap());

        let text = CodeWriter::render_standalone(|out| {
            out.push_package("com.example")?;
            builder.build()?.emit(out)?;
            out.pop_package()
        })
        .unwrap();
        assert_eq!(
            text,
            "public class Outer {\n  public class Nested\n\n  public companion object {\n    public fun create(): Nested {\n      return Nested()\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn test_single_companion() {
        let mut builder = TypeSpec::class_builder("A");
        builder
            .add_type(TypeSpec::companion_object_builder(None).build().unwrap())
            .add_type(TypeSpec::companion_object_builder(Some("Other")).build().unwrap());
        assert!(matches!(builder.build(), Err(Error::InvalidSpec(_))));
    }

    #[test]
    fn test_initializer_block_position() {
        let mut builder = TypeSpec::class_builder("Counter");
        builder
            .add_property(property("a", kotlin::int(), "1"))
            .unwrap()
            .add_initializer_block(&code_block!("println(a)\n").unwrap())
            .unwrap()
            .add_property(property("b", kotlin::int(), "2"))
            .unwrap();
        assert_eq!(
            builder.build().unwrap().to_string(),
            "public class Counter {\n  public val a: kotlin.Int = 1\n\n  init {\n    println(a)\n  }\n\n  public val b: kotlin.Int = 2\n}\n"
        );
    }

    #[test]
    fn test_superinterface_delegation() {
        let list = ClassName::new("kotlin.collections", "List");
        let mut builder = TypeSpec::class_builder("Wrapper");
        builder
            .add_superinterface(list.clone(), Some(code_block!("items").unwrap()))
            .unwrap();
        assert_eq!(
            builder.build().unwrap().to_string(),
            "public class Wrapper : kotlin.collections.List by items\n"
        );

        let mut interface = TypeSpec::interface_builder("I");
        let err = interface
            .add_superinterface(list, Some(code_block!("items").unwrap()))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));
    }

    #[test]
    fn test_primary_constructor_only_on_classes() {
        let mut builder = TypeSpec::object_builder("Singleton");
        let err = builder
            .primary_constructor(FunSpec::constructor_builder().build().unwrap())
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.to_string(), "object can't have a primary constructor");
    }

    #[test]
    fn test_defensive_copy() {
        let mut builder = TypeSpec::class_builder("A");
        let built = builder.build().unwrap();
        builder.add_function(FunSpec::builder("f").build().unwrap());
        assert!(built.functions().is_empty());
        assert_eq!(built.to_builder().build().unwrap(), built);
    }
}
