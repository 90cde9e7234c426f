use std::fmt;

use kpoet_codegen::{
    AnnotationSpec, Arg, CodeBlock, CodeBlockBuilder, CodeWriter, Emit, Result, TypeName, TypeVariableName,
    code_block,
};

use crate::modifier::{self, KModifier, Modifiers};

const ALLOWED_MODIFIERS: [KModifier; 4] = [KModifier::Public, KModifier::Internal, KModifier::Private, KModifier::Actual];

/// `typealias Name<T> = Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasSpec {
    name: String,
    type_name: TypeName,
    kdoc: CodeBlock,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
}

impl TypeAliasSpec {
    pub fn builder(name: impl Into<String>, type_name: impl Into<TypeName>) -> TypeAliasSpecBuilder {
        TypeAliasSpecBuilder {
            name: name.into(),
            type_name: type_name.into(),
            kdoc: CodeBlock::builder(),
            annotations: Vec::new(),
            modifiers: Modifiers::new(),
            type_variables: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn type_variables(&self) -> &[TypeVariableName] {
        &self.type_variables
    }
}

impl Emit for TypeAliasSpec {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        out.emit_kdoc(&self.kdoc.ensure_ends_with_newline())?;
        out.emit_annotations(&self.annotations, false)?;
        modifier::emit_modifiers(out, &self.modifiers, &modifier::set([KModifier::Public]))?;
        out.emit_code(&code_block!("typealias %N", self.name.as_str())?)?;
        out.emit_type_variables(&self.type_variables)?;
        out.emit_code(&code_block!(" = %T", &self.type_name)?)?;
        out.emit("\n")
    }
}

impl fmt::Display for TypeAliasSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_standalone().map_err(|_| fmt::Error)?)
    }
}

#[derive(Debug, Clone)]
pub struct TypeAliasSpecBuilder {
    name: String,
    type_name: TypeName,
    kdoc: CodeBlockBuilder,
    annotations: Vec<AnnotationSpec>,
    modifiers: Modifiers,
    type_variables: Vec<TypeVariableName>,
}

impl TypeAliasSpecBuilder {
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

    pub fn build(&self) -> Result<TypeAliasSpec> {
        modifier::require_allowed("type aliases", &self.modifiers, &ALLOWED_MODIFIERS)?;
        modifier::require_single_visibility(&format!("typealias {}", self.name), &self.modifiers)?;
        Ok(TypeAliasSpec {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            kdoc: self.kdoc.build(),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            type_variables: self.type_variables.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use kpoet_codegen::{Error, LambdaTypeName, ParameterizedTypeName, names::kotlin};

    use super::*;

    #[test]
    fn test_generic_alias() {
        let k = TypeVariableName::new("K");
        let alias_type = ParameterizedTypeName::new(
            kotlin::map(),
            [TypeName::from(k.clone()), TypeName::from(kotlin::string())],
        );
        let mut builder = TypeAliasSpec::builder("Registry", alias_type);
        builder
            .add_type_variable(k)
            .add_kdoc("Lookup by key.", &[])
            .unwrap();
        assert_eq!(
            builder.build().unwrap().to_string(),
            "/**\n * Lookup by key.\n */\npublic typealias Registry<K> = kotlin.collections.Map<K, kotlin.String>\n"
        );
    }

    #[test]
    fn test_lambda_alias_with_visibility() {
        let handler = LambdaTypeName::new([TypeName::from(kotlin::string())], kotlin::unit());
        let mut builder = TypeAliasSpec::builder("Handler", handler);
        builder.add_modifiers([KModifier::Internal]);
        assert_eq!(
            builder.build().unwrap().to_string(),
            "internal typealias Handler = (kotlin.String) -> kotlin.Unit\n"
        );
    }

    #[test]
    fn test_rejects_other_modifiers() {
        let mut builder = TypeAliasSpec::builder("A", kotlin::int());
        builder.add_modifiers([KModifier::Open]);
        assert!(matches!(builder.build(), Err(Error::InvalidSpec(_))));
    }
}
