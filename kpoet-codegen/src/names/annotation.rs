use std::{
    fmt,
    hash::{Hash, Hasher},
};

use super::{ClassName, TagValue, Tags, TypeName};
use crate::{
    code_block::{Arg, CodeBlock},
    error::Result,
    writer::CodeWriter,
};

/// The element an annotation applies to when a declaration has several,
/// written as `@get:Name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseSiteTarget {
    File,
    Property,
    Field,
    Get,
    Set,
    Receiver,
    Param,
    SetParam,
    Delegate,
}

impl UseSiteTarget {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Property => "property",
            Self::Field => "field",
            Self::Get => "get",
            Self::Set => "set",
            Self::Receiver => "receiver",
            Self::Param => "param",
            Self::SetParam => "setparam",
            Self::Delegate => "delegate",
        }
    }
}

/// An annotation with its member values, e.g. `@Column(name = "id")`.
#[derive(Debug, Clone)]
pub struct AnnotationSpec {
    type_name: ClassName,
    members: Vec<CodeBlock>,
    use_site_target: Option<UseSiteTarget>,
    tags: Tags,
}

impl AnnotationSpec {
    /// An annotation without members.
    pub fn of(type_name: ClassName) -> Self {
        Self::builder(type_name).build()
    }

    pub fn builder(type_name: ClassName) -> AnnotationSpecBuilder {
        AnnotationSpecBuilder {
            type_name,
            members: Vec::new(),
            use_site_target: None,
            tags: Tags::new(),
        }
    }

    pub fn type_name(&self) -> &ClassName {
        &self.type_name
    }

    pub fn members(&self) -> &[CodeBlock] {
        &self.members
    }

    pub fn use_site_target(&self) -> Option<UseSiteTarget> {
        self.use_site_target
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn to_builder(&self) -> AnnotationSpecBuilder {
        AnnotationSpecBuilder {
            type_name: self.type_name.clone(),
            members: self.members.clone(),
            use_site_target: self.use_site_target,
            tags: self.tags.clone(),
        }
    }

    /// Write the annotation. Inline annotations keep their members on one
    /// line; otherwise several members go one per line with trailing commas.
    /// As a parameter (an annotation nested in another) there is no `@`.
    pub fn emit(&self, out: &mut CodeWriter, inline: bool, as_parameter: bool) -> Result<()> {
        if !as_parameter {
            out.emit("@")?;
        }
        if let Some(target) = self.use_site_target {
            out.emit(target.keyword())?;
            out.emit(":")?;
        }
        out.emit_type(&TypeName::Class(self.type_name.clone()))?;

        if self.members.is_empty() && !as_parameter {
            return Ok(());
        }

        let multi_line = !inline && self.members.len() > 1;
        let whitespace = if inline { "" } else { "\n" };
        let separator = if inline { ", " } else { ",\n" };
        let suffix = if multi_line { "," } else { "" };

        out.emit("(")?;
        if self.members.len() > 1 {
            out.emit(whitespace)?;
            out.indent(1);
        }
        let members = self.members.iter().map(|member| {
            if inline {
                member.without_indents()
            } else {
                member.clone()
            }
        });
        out.emit_code_with(&CodeBlock::join(members, separator, "", suffix), true, false)?;
        if self.members.len() > 1 {
            out.unindent(1)?;
            out.emit(whitespace)?;
        }
        out.emit(")")
    }
}

impl PartialEq for AnnotationSpec {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.members == other.members
            && self.use_site_target == other.use_site_target
    }
}

impl Eq for AnnotationSpec {}

impl Hash for AnnotationSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.members.hash(state);
        self.use_site_target.hash(state);
    }
}

impl fmt::Display for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = CodeWriter::render_standalone(|out| self.emit(out, true, false)).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationSpecBuilder {
    type_name: ClassName,
    members: Vec<CodeBlock>,
    use_site_target: Option<UseSiteTarget>,
    tags: Tags,
}

impl AnnotationSpecBuilder {
    /// Add a member value such as `name = %S`.
    pub fn add_member(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        self.members.push(CodeBlock::of(format, args)?);
        Ok(self)
    }

    pub fn add_member_code(&mut self, code: CodeBlock) -> &mut Self {
        self.members.push(code);
        self
    }

    pub fn use_site_target(&mut self, target: UseSiteTarget) -> &mut Self {
        self.use_site_target = Some(target);
        self
    }

    /// Attach a tag, replacing any previous value under `key`.
    pub fn tag(&mut self, key: impl Into<String>, value: impl Into<TagValue>) -> &mut Self {
        self.tags.insert(key, value);
        self
    }

    pub fn build(&self) -> AnnotationSpec {
        AnnotationSpec {
            type_name: self.type_name.clone(),
            members: self.members.clone(),
            use_site_target: self.use_site_target,
            tags: self.tags.clone(),
        }
    }
}
