use std::fmt;

use super::{AnnotationSpec, ClassName, Decorations, Tags, kotlin};
use crate::{error::Result, writer::CodeWriter};

/// Any type that can appear in a declaration or a `%T` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class(ClassName),
    Parameterized(ParameterizedTypeName),
    Variable(TypeVariableName),
    Lambda(LambdaTypeName),
    Wildcard(WildcardTypeName),
}

macro_rules! each_variant {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            TypeName::Class($inner) => $body,
            TypeName::Parameterized($inner) => $body,
            TypeName::Variable($inner) => $body,
            TypeName::Lambda($inner) => $body,
            TypeName::Wildcard($inner) => $body,
        }
    };
}

macro_rules! map_variant {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            TypeName::Class($inner) => TypeName::Class($body),
            TypeName::Parameterized($inner) => TypeName::Parameterized($body),
            TypeName::Variable($inner) => TypeName::Variable($body),
            TypeName::Lambda($inner) => TypeName::Lambda($body),
            TypeName::Wildcard($inner) => TypeName::Wildcard($body),
        }
    };
}

impl TypeName {
    pub fn is_nullable(&self) -> bool {
        each_variant!(self, inner => inner.is_nullable())
    }

    pub fn is_annotated(&self) -> bool {
        each_variant!(self, inner => inner.is_annotated())
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        each_variant!(self, inner => inner.annotations())
    }

    pub fn tags(&self) -> &Tags {
        each_variant!(self, inner => inner.tags())
    }

    pub fn with_nullable(&self, nullable: bool) -> Self {
        map_variant!(self, inner => inner.with_nullable(nullable))
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> Self {
        map_variant!(self, inner => inner.with_annotations(annotations))
    }

    pub fn annotated(&self, annotation: AnnotationSpec) -> Self {
        map_variant!(self, inner => inner.annotated(annotation))
    }

    pub fn with_tags(&self, tags: Tags) -> Self {
        map_variant!(self, inner => inner.with_tags(tags))
    }

    /// The class this type refers to, if it is a plain class reference.
    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Write the type without its annotations and nullability marker.
    pub(crate) fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        match self {
            Self::Class(class) => class.emit(out),
            Self::Parameterized(parameterized) => {
                parameterized.raw_type.emit(out)?;
                if !parameterized.type_arguments.is_empty() {
                    out.emit("<")?;
                    for (i, argument) in parameterized.type_arguments.iter().enumerate() {
                        if i > 0 {
                            out.emit(",♢")?;
                        }
                        out.emit_type(argument)?;
                    }
                    out.emit(">")?;
                }
                Ok(())
            }
            Self::Variable(variable) => {
                out.emit(&variable.name)?;
                Ok(())
            }
            Self::Lambda(lambda) => lambda.emit(out),
            Self::Wildcard(wildcard) => wildcard.emit(out),
        }
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        Self::Class(class)
    }
}

impl From<&ClassName> for TypeName {
    fn from(class: &ClassName) -> Self {
        Self::Class(class.clone())
    }
}

impl From<ParameterizedTypeName> for TypeName {
    fn from(parameterized: ParameterizedTypeName) -> Self {
        Self::Parameterized(parameterized)
    }
}

impl From<TypeVariableName> for TypeName {
    fn from(variable: TypeVariableName) -> Self {
        Self::Variable(variable)
    }
}

impl From<LambdaTypeName> for TypeName {
    fn from(lambda: LambdaTypeName) -> Self {
        Self::Lambda(lambda)
    }
}

impl From<WildcardTypeName> for TypeName {
    fn from(wildcard: WildcardTypeName) -> Self {
        Self::Wildcard(wildcard)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = CodeWriter::render_standalone(|out| out.emit_type(self)).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// A generic class applied to type arguments, e.g. `List<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedTypeName {
    raw_type: ClassName,
    type_arguments: Vec<TypeName>,
    pub(crate) decorations: Decorations,
}

decorated!(ParameterizedTypeName);

impl ParameterizedTypeName {
    pub fn new(raw_type: ClassName, type_arguments: impl IntoIterator<Item = TypeName>) -> Self {
        Self {
            raw_type: raw_type.undecorated(),
            type_arguments: type_arguments.into_iter().collect(),
            decorations: Decorations::default(),
        }
    }

    pub fn raw_type(&self) -> &ClassName {
        &self.raw_type
    }

    pub fn type_arguments(&self) -> &[TypeName] {
        &self.type_arguments
    }
}

/// Declaration-site variance of a type variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    In,
    Out,
}

impl Variance {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// A type variable such as `T`, optionally bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariableName {
    name: String,
    bounds: Vec<TypeName>,
    variance: Option<Variance>,
    reified: bool,
    pub(crate) decorations: Decorations,
}

decorated!(TypeVariableName);

impl TypeVariableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
            variance: None,
            reified: false,
            decorations: Decorations::default(),
        }
    }

    /// A copy with `bound` added.
    pub fn bounded_by(&self, bound: impl Into<TypeName>) -> Self {
        let mut copy = self.clone();
        copy.bounds.push(bound.into());
        copy
    }

    pub fn with_variance(&self, variance: Variance) -> Self {
        let mut copy = self.clone();
        copy.variance = Some(variance);
        copy
    }

    pub fn with_reified(&self, reified: bool) -> Self {
        let mut copy = self.clone();
        copy.reified = reified;
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[TypeName] {
        &self.bounds
    }

    pub fn variance(&self) -> Option<Variance> {
        self.variance
    }

    pub fn is_reified(&self) -> bool {
        self.reified
    }
}

/// A function type, e.g. `suspend String.(Int) -> Unit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LambdaTypeName {
    receiver: Option<Box<TypeName>>,
    parameters: Vec<TypeName>,
    return_type: Box<TypeName>,
    suspending: bool,
    pub(crate) decorations: Decorations,
}

decorated!(LambdaTypeName);

impl LambdaTypeName {
    pub fn new(parameters: impl IntoIterator<Item = TypeName>, return_type: impl Into<TypeName>) -> Self {
        Self {
            receiver: None,
            parameters: parameters.into_iter().collect(),
            return_type: Box::new(return_type.into()),
            suspending: false,
            decorations: Decorations::default(),
        }
    }

    pub fn with_receiver(&self, receiver: impl Into<TypeName>) -> Self {
        let mut copy = self.clone();
        copy.receiver = Some(Box::new(receiver.into()));
        copy
    }

    pub fn with_suspending(&self, suspending: bool) -> Self {
        let mut copy = self.clone();
        copy.suspending = suspending;
        copy
    }

    pub fn receiver(&self) -> Option<&TypeName> {
        self.receiver.as_deref()
    }

    pub fn parameters(&self) -> &[TypeName] {
        &self.parameters
    }

    pub fn return_type(&self) -> &TypeName {
        &self.return_type
    }

    pub fn is_suspending(&self) -> bool {
        self.suspending
    }

    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        if self.is_nullable() {
            out.emit("(")?;
        }
        if self.suspending {
            out.emit("suspend ")?;
        }
        if let Some(receiver) = &self.receiver {
            let parenthesize = receiver.is_annotated() || matches!(**receiver, TypeName::Lambda(_));
            if parenthesize {
                out.emit("(")?;
            }
            out.emit_type(receiver)?;
            out.emit(if parenthesize { ")." } else { "." })?;
        }
        out.emit("(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                out.emit(", ")?;
            }
            out.emit_type(parameter)?;
        }
        out.emit(") -> ")?;
        if let TypeName::Lambda(_) = *self.return_type {
            out.emit("(")?;
            out.emit_type(&self.return_type)?;
            out.emit(")")?;
        } else {
            out.emit_type(&self.return_type)?;
        }
        if self.is_nullable() {
            out.emit(")")?;
        }
        Ok(())
    }
}

/// A use-site type projection: `*`, `out T` or `in T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardTypeName {
    out_type: Box<TypeName>,
    in_type: Option<Box<TypeName>>,
    pub(crate) decorations: Decorations,
}

decorated!(WildcardTypeName);

impl WildcardTypeName {
    /// The star projection, `*`.
    pub fn star() -> Self {
        Self::producer_of(kotlin::any().with_nullable(true))
    }

    /// `out T`: values of the projected type are only read.
    pub fn producer_of(out_type: impl Into<TypeName>) -> Self {
        Self {
            out_type: Box::new(out_type.into()),
            in_type: None,
            decorations: Decorations::default(),
        }
    }

    /// `in T`: values of the projected type are only written.
    pub fn consumer_of(in_type: impl Into<TypeName>) -> Self {
        Self {
            out_type: Box::new(kotlin::any().into()),
            in_type: Some(Box::new(in_type.into())),
            decorations: Decorations::default(),
        }
    }

    pub fn out_type(&self) -> &TypeName {
        &self.out_type
    }

    pub fn in_type(&self) -> Option<&TypeName> {
        self.in_type.as_deref()
    }

    pub fn is_star(&self) -> bool {
        self.in_type.is_none() && *self.out_type == TypeName::from(kotlin::any().with_nullable(true))
    }

    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        if let Some(in_type) = &self.in_type {
            out.emit("in ")?;
            out.emit_type(in_type)
        } else if self.is_star() {
            out.emit("*")
        } else {
            out.emit("out ")?;
            out.emit_type(&self.out_type)
        }
    }
}
