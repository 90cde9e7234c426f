//! The emission engine.
//!
//! [`CodeWriter`] interprets [`CodeBlock`]s against a [`LineWrapper`],
//! tracking indentation, statements, KDoc and comment modes, and the
//! package and type scopes used to shorten names. A file is rendered twice
//! by [`CodeWriter::render_file`]: once to collect importable references and
//! once, with the resolved imports, to produce the text.

use std::mem;

use tracing::debug;

use crate::{
    FormatOptions,
    code_block::{CodeArg, CodeBlock, Part},
    error::{Error, Result},
    escape::{escape_kdoc, string_literal_with_quotes},
    line_wrapper::LineWrapper,
    names::{AnnotationSpec, ClassName, MemberName, TypeName, TypeVariableName, kotlin},
    resolver::{ImportCollector, Resolution},
};

/// Indent used by standalone renders such as `Display`.
const STANDALONE_INDENT: &str = "  ";

/// Names visible inside a type declaration while its body is emitted.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    pub name: String,
    pub nested_type_names: Vec<String>,
    pub function_names: Vec<String>,
    pub enum_constants: Vec<String>,
    /// Inner classes also see the functions of their outer class.
    pub is_inner: bool,
}

impl TypeScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct CodeWriter {
    out: LineWrapper<String>,
    indent: String,
    indent_level: usize,
    kdoc: bool,
    comment: bool,
    package: Option<String>,
    type_stack: Vec<TypeScope>,
    trailing_newline: bool,
    /// Line of the statement being written, `None` outside statements.
    /// Continuation lines of a statement are indented twice.
    statement_line: Option<usize>,
    collector: ImportCollector,
    resolution: Resolution,
}

impl CodeWriter {
    pub fn new(indent: impl Into<String>, column_limit: usize) -> Self {
        Self::with_resolution(indent, column_limit, Resolution::default())
    }

    fn with_resolution(indent: impl Into<String>, column_limit: usize, resolution: Resolution) -> Self {
        let indent = indent.into();
        Self {
            out: LineWrapper::new(String::new(), indent.clone(), column_limit),
            indent,
            indent_level: 0,
            kdoc: false,
            comment: false,
            package: None,
            type_stack: Vec::new(),
            trailing_newline: false,
            statement_line: None,
            collector: ImportCollector::new(),
            resolution,
        }
    }

    /// Render a whole file: collect references, resolve imports, then emit.
    ///
    /// `emit_step` runs once per pass and must be deterministic.
    pub fn render_file<F>(options: &FormatOptions, mut emit_step: F) -> Result<String>
    where
        F: FnMut(&mut CodeWriter) -> Result<()>,
    {
        let indent = options.indent.unit();

        let mut collecting = Self::new(indent.clone(), usize::MAX);
        emit_step(&mut collecting)?;
        let resolution = collecting.collector.resolve();
        debug!(imports = resolution.imports().len(), "render.collect");

        let mut writer = Self::with_resolution(indent, options.column_limit, resolution);
        emit_step(&mut writer)?;
        let text = writer.finish()?;
        debug!(bytes = text.len(), "render.emit");
        Ok(text)
    }

    /// Render without imports or a column limit.
    pub fn render_standalone<F>(emit_step: F) -> Result<String>
    where
        F: FnOnce(&mut CodeWriter) -> Result<()>,
    {
        let mut writer = Self::new(STANDALONE_INDENT, usize::MAX);
        emit_step(&mut writer)?;
        writer.finish()
    }

    /// Flush pending text and return the output.
    pub fn finish(self) -> Result<String> {
        self.out.into_inner()
    }

    /// Sorted canonical names this file imports.
    pub fn imports(&self) -> Vec<String> {
        self.resolution.imports().into_iter().collect()
    }

    pub fn statement_line(&self) -> Option<usize> {
        self.statement_line
    }

    pub fn set_statement_line(&mut self, statement_line: Option<usize>) {
        self.statement_line = statement_line;
    }

    pub fn indent(&mut self, levels: usize) {
        self.indent_level += levels;
    }

    pub fn unindent(&mut self, levels: usize) -> Result<()> {
        if levels > self.indent_level {
            return Err(Error::Unindent {
                levels,
                current: self.indent_level,
            });
        }
        self.indent_level -= levels;
        Ok(())
    }

    pub fn push_package(&mut self, package: &str) -> Result<()> {
        if let Some(current) = &self.package {
            return Err(Error::PackageState(format!("package already set to '{current}'")));
        }
        self.package = Some(package.to_string());
        Ok(())
    }

    pub fn pop_package(&mut self) -> Result<()> {
        if self.package.take().is_none() {
            return Err(Error::PackageState("no package to pop".to_string()));
        }
        Ok(())
    }

    pub fn push_type(&mut self, scope: TypeScope) {
        self.type_stack.push(scope);
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    /// Emit text, which may wrap at `♢` markers.
    pub fn emit(&mut self, s: &str) -> Result<()> {
        self.emit_text(s, false)
    }

    /// Emit text that never wraps.
    pub fn emit_non_wrapping(&mut self, s: &str) -> Result<()> {
        self.emit_text(s, true)
    }

    // Indentation is written lazily, when a line gets its first text, so blank
    // lines carry no trailing whitespace.
    fn emit_text(&mut self, s: &str, non_wrapping: bool) -> Result<()> {
        let escaped;
        let s = if self.kdoc {
            escaped = escape_kdoc(s);
            escaped.as_str()
        } else {
            s
        };

        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                if (self.kdoc || self.comment) && self.trailing_newline {
                    self.emit_indentation()?;
                    self.out.append_non_wrapping(if self.kdoc { " *" } else { "//" })?;
                }
                self.out.newline()?;
                self.trailing_newline = true;
                if let Some(line) = self.statement_line {
                    if line == 0 {
                        self.indent(2);
                    }
                    self.statement_line = Some(line + 1);
                }
            }

            if line.is_empty() {
                continue;
            }

            if self.trailing_newline {
                self.emit_indentation()?;
                if self.kdoc {
                    self.out.append_non_wrapping(" * ")?;
                } else if self.comment {
                    self.out.append_non_wrapping("// ")?;
                }
            }

            if non_wrapping {
                self.out.append_non_wrapping(line)?;
            } else if self.kdoc {
                self.out.append(line, Some(self.indent_level), " * ")?;
            } else {
                self.out.append(line, Some(self.indent_level + 2), "")?;
            }
            self.trailing_newline = false;
        }
        Ok(())
    }

    fn emit_indentation(&mut self) -> Result<()> {
        for _ in 0..self.indent_level {
            self.out.append_non_wrapping(&self.indent)?;
        }
        Ok(())
    }

    pub fn emit_code(&mut self, code: &CodeBlock) -> Result<()> {
        self.emit_code_with(code, false, false)
    }

    /// Emit `code`. In constant context strings never use the multi-line
    /// form. With `ensure_trailing_newline`, an unterminated last line is
    /// ended.
    pub fn emit_code_with(
        &mut self,
        code: &CodeBlock,
        constant_context: bool,
        ensure_trailing_newline: bool,
    ) -> Result<()> {
        for part in &code.parts {
            match part {
                Part::Text(text) => self.emit(text)?,
                Part::Arg(arg) => self.emit_arg(arg, constant_context)?,
                Part::Percent => self.emit("%")?,
                Part::Indent => self.indent(1),
                Part::Unindent => self.unindent(1)?,
                Part::StatementBegin => {
                    if self.statement_line.is_some() {
                        return Err(Error::StatementAlreadyOpen);
                    }
                    self.statement_line = Some(0);
                }
                Part::StatementEnd => {
                    match self.statement_line {
                        None => return Err(Error::StatementNotOpen),
                        Some(line) if line > 0 => self.unindent(2)?,
                        Some(_) => {}
                    }
                    self.statement_line = None;
                }
            }
        }
        if ensure_trailing_newline && self.out.has_pending_segments() {
            self.emit("\n")?;
        }
        Ok(())
    }

    fn emit_arg(&mut self, arg: &CodeArg, constant_context: bool) -> Result<()> {
        match arg {
            CodeArg::Literal(text) | CodeArg::Name(text) => self.emit(text),
            CodeArg::Code(code) => self.emit_code_with(code, constant_context, false),
            CodeArg::Str(value) => {
                let literal = match value {
                    Some(value) => string_literal_with_quotes(value, false, constant_context),
                    None => "null".to_string(),
                };
                self.emit_non_wrapping(&literal)
            }
            CodeArg::Template(value) => {
                let literal = match value {
                    Some(value) => string_literal_with_quotes(value, true, constant_context),
                    None => "null".to_string(),
                };
                self.emit_non_wrapping(&literal)
            }
            CodeArg::TemplateCode(code) => {
                let rendered = self.render_nested(code)?;
                self.emit_non_wrapping(&string_literal_with_quotes(&rendered, true, constant_context))
            }
            CodeArg::Type(type_name) => self.emit_type(type_name),
            CodeArg::Member(member) => member.emit(self),
        }
    }

    /// Render `code` into a string with the current scopes and imports. The
    /// nested text starts at indent 0 outside any statement, and the layout
    /// state of this writer is restored afterwards.
    fn render_nested(&mut self, code: &CodeBlock) -> Result<String> {
        let nested = LineWrapper::new(String::new(), self.indent.clone(), usize::MAX);
        let out = mem::replace(&mut self.out, nested);
        let indent_level = mem::take(&mut self.indent_level);
        let statement_line = self.statement_line.take();
        let trailing_newline = mem::replace(&mut self.trailing_newline, false);
        let kdoc = mem::replace(&mut self.kdoc, false);
        let comment = mem::replace(&mut self.comment, false);

        let result = self.emit_code(code);

        let nested = mem::replace(&mut self.out, out);
        self.indent_level = indent_level;
        self.statement_line = statement_line;
        self.trailing_newline = trailing_newline;
        self.kdoc = kdoc;
        self.comment = comment;
        result?;
        nested.into_inner()
    }

    /// Emit a type reference with its annotations and nullability marker.
    pub fn emit_type(&mut self, type_name: &TypeName) -> Result<()> {
        for annotation in type_name.annotations() {
            annotation.emit(self, true, false)?;
            self.emit(" ")?;
        }
        type_name.emit(self)?;
        if type_name.is_nullable() {
            self.emit("?")?;
        }
        Ok(())
    }

    /// Emit a comment; every line is prefixed with `//`.
    pub fn emit_comment(&mut self, code: &CodeBlock) -> Result<()> {
        self.trailing_newline = true;
        self.comment = true;
        let result = self.emit_code(code).and_then(|_| self.emit("\n"));
        self.comment = false;
        result
    }

    /// Emit a `/** ... */` block. Comment delimiters in the text are escaped.
    pub fn emit_kdoc(&mut self, kdoc: &CodeBlock) -> Result<()> {
        if kdoc.is_empty() {
            return Ok(());
        }
        self.emit("/**\n")?;
        self.kdoc = true;
        let result = self.emit_code_with(kdoc, false, true);
        self.kdoc = false;
        result?;
        self.emit(" */\n")
    }

    pub fn emit_annotations(&mut self, annotations: &[AnnotationSpec], inline: bool) -> Result<()> {
        for annotation in annotations {
            annotation.emit(self, inline, false)?;
            self.emit(if inline { " " } else { "\n" })?;
        }
        Ok(())
    }

    /// Emit `<T : Bound, ...>` for declarations. Variables with several
    /// bounds get theirs in a where block instead.
    pub fn emit_type_variables(&mut self, type_variables: &[TypeVariableName]) -> Result<()> {
        if type_variables.is_empty() {
            return Ok(());
        }
        let nullable_any = TypeName::from(kotlin::any().with_nullable(true));

        self.emit("<")?;
        for (i, variable) in type_variables.iter().enumerate() {
            if i > 0 {
                self.emit(", ")?;
            }
            if let Some(variance) = variable.variance() {
                self.emit(variance.keyword())?;
                self.emit(" ")?;
            }
            if variable.is_reified() {
                self.emit("reified ")?;
            }
            self.emit(variable.name())?;
            if let [bound] = variable.bounds()
                && *bound != nullable_any
            {
                self.emit(" : ")?;
                self.emit_type(bound)?;
            }
        }
        self.emit(">")
    }

    pub fn emit_where_block(&mut self, type_variables: &[TypeVariableName]) -> Result<()> {
        let mut first = true;
        for variable in type_variables.iter().filter(|variable| variable.bounds().len() > 1) {
            for bound in variable.bounds() {
                self.emit(if first { " where " } else { ", " })?;
                self.emit(variable.name())?;
                self.emit(" : ")?;
                self.emit_type(bound)?;
                first = false;
            }
        }
        Ok(())
    }

    /// The shortest name that refers to `class` here, using enclosing types,
    /// the package and imports. Unresolved classes are recorded as
    /// importable.
    pub fn lookup_name(&mut self, class: &ClassName) -> String {
        let mut name_resolved = false;
        let mut current = Some(class.undecorated());
        while let Some(candidate) = current {
            let resolved = self.resolve(candidate.simple_name());
            name_resolved = resolved.is_some();

            if resolved.is_some_and(|resolved| resolved.same_class(&candidate)) {
                self.collector
                    .mark_referenced(class.top_level_class_name().simple_name());
                let nested = &class.simple_names()[candidate.simple_names().len()..];
                return std::iter::once(candidate.simple_name())
                    .chain(nested.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(".");
            }
            current = candidate.enclosing_class_name();
        }

        // A different class owns the simple name.
        if name_resolved {
            return class.canonical_name();
        }

        if self.package.as_deref() == Some(class.package_name()) {
            self.collector
                .mark_referenced(class.top_level_class_name().simple_name());
            return class.simple_names().join(".");
        }

        if !self.kdoc {
            self.collector.add_type(class);
        }
        class.canonical_name()
    }

    /// The shortest name that refers to `member` here.
    pub fn lookup_member(&mut self, member: &MemberName) -> String {
        let simple_name = member.simple_name();
        match self.resolution.imported_member(simple_name).map(|imported| imported == member) {
            Some(true) => return simple_name.to_string(),
            Some(false) => {
                if let Some(enclosing) = member.enclosing_class() {
                    let enclosing = self.lookup_name(enclosing);
                    return format!("{enclosing}.{simple_name}");
                }
            }
            None => {}
        }

        if self.package.as_deref() == Some(member.package_name()) && member.enclosing_class().is_none() {
            self.collector.mark_referenced(simple_name);
            return simple_name.to_string();
        }

        if !self.kdoc && (member.is_extension() || !self.is_function_in_scope(simple_name)) {
            self.collector.add_member(member);
        }
        member.canonical_name()
    }

    fn is_function_in_scope(&self, simple_name: &str) -> bool {
        for scope in self.type_stack.iter().rev() {
            if scope.function_names.iter().any(|name| name == simple_name) {
                return true;
            }
            if !scope.is_inner {
                break;
            }
        }
        false
    }

    /// The class or enum constant that `simple_name` refers to here.
    fn resolve(&self, simple_name: &str) -> Option<ClassName> {
        for (depth, scope) in self.type_stack.iter().enumerate().rev() {
            if scope.nested_type_names.iter().any(|name| name == simple_name) {
                return Some(self.stack_class_name(depth).nested_class(simple_name));
            }
        }

        if let Some(top) = self.type_stack.first() {
            let package = self.package.as_deref().unwrap_or_default();
            if top.name == simple_name {
                return Some(ClassName::new(package, simple_name));
            }
            if top.enum_constants.iter().any(|name| name == simple_name) {
                return Some(ClassName::new(package, &top.name).nested_class(simple_name));
            }
        }

        self.resolution.imported_type(simple_name).cloned()
    }

    /// The class declared at `depth` of the type stack.
    fn stack_class_name(&self, depth: usize) -> ClassName {
        let package = self.package.as_deref().unwrap_or_default();
        let mut class = ClassName::new(package, self.type_stack[0].name.as_str());
        for scope in &self.type_stack[1..=depth] {
            class = class.nested_class(scope.name.as_str());
        }
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{code_block, names::kotlin};

    fn render(code: &CodeBlock, column_limit: usize) -> String {
        let mut writer = CodeWriter::new("  ", column_limit);
        writer.emit_code(code).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_statement_continuation_indent() {
        let mut builder = CodeBlock::builder();
        builder
            .add_statement("val total = %L♢+♢%L♢+♢%L", &["first".into(), "second".into(), "third".into()])
            .unwrap();
        builder.add_statement("val next = 1", &[]).unwrap();

        assert_eq!(
            render(&builder.build(), 20),
            "val total = first +\n    second + third\nval next = 1\n"
        );
    }

    #[test]
    fn test_multi_line_template_ignores_outer_layout() {
        let mut builder = CodeBlock::builder();
        builder
            .add("fun f() {\n⇥", &[])
            .unwrap()
            .add_statement("val s = %P", &[code_block!("a\nb").unwrap().into()])
            .unwrap()
            .add_statement("val t = 1", &[])
            .unwrap()
            .add("⇤}\n", &[])
            .unwrap();

        assert_eq!(
            render(&builder.build(), 100),
            "fun f() {\n  val s = \"\"\"\n      |a\n      |b\n      \"\"\".trimMargin()\n  val t = 1\n}\n"
        );
    }

    #[test]
    fn test_unbalanced_statements() {
        let mut writer = CodeWriter::new("  ", 100);
        let err = writer.emit_code(&code_block!("«a«b»»").unwrap()).unwrap_err();
        assert!(matches!(err, Error::StatementAlreadyOpen));

        let mut writer = CodeWriter::new("  ", 100);
        let err = writer.emit_code(&code_block!("a»").unwrap()).unwrap_err();
        assert!(matches!(err, Error::StatementNotOpen));
    }

    #[test]
    fn test_unindent_below_zero() {
        let mut writer = CodeWriter::new("  ", 100);
        let err = writer.emit_code(&code_block!("⇤").unwrap()).unwrap_err();
        assert!(matches!(err, Error::Unindent { levels: 1, current: 0 }));
    }

    #[test]
    fn test_indentation_is_lazy() {
        let code = code_block!("class A {\n⇥\nval a = 1\n⇤}\n").unwrap();
        assert_eq!(render(&code, 100), "class A {\n\n  val a = 1\n}\n");
    }

    #[test]
    fn test_kdoc_escapes_comment_delimiters() {
        let mut writer = CodeWriter::new("  ", 100);
        writer
            .emit_kdoc(&code_block!("Nested /* start\n\nend */ and %L", "*/").unwrap())
            .unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "/**\n * Nested /&#42; start\n *\n * end &#42;/ and &#42;/\n */\n"
        );
    }

    #[test]
    fn test_empty_kdoc_is_skipped() {
        let mut writer = CodeWriter::new("  ", 100);
        writer.emit_kdoc(&CodeBlock::default()).unwrap();
        assert_eq!(writer.finish().unwrap(), "");
    }

    #[test]
    fn test_comment() {
        let mut writer = CodeWriter::new("  ", 100);
        writer.indent(1);
        writer.emit_comment(&code_block!("first\n\nsecond").unwrap()).unwrap();
        assert_eq!(writer.finish().unwrap(), "  // first\n  //\n  // second\n");
    }

    #[test]
    fn test_kdoc_wraps_with_prefix() {
        let mut writer = CodeWriter::new("  ", 20);
        writer
            .emit_kdoc(&code_block!("one♢two♢three♢four♢five").unwrap())
            .unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            "/**\n * one two three\n * four five\n */\n"
        );
    }

    #[test]
    fn test_same_package_is_short() {
        let mut writer = CodeWriter::new("  ", 100);
        writer.push_package("com.example").unwrap();
        let taco = ClassName::new("com.example", "Taco");
        let other = ClassName::new("com.other", "Taco");
        writer.emit_code(&code_block!("%T %T", &taco, &other).unwrap()).unwrap();
        writer.pop_package().unwrap();
        assert_eq!(writer.finish().unwrap(), "Taco com.other.Taco");
    }

    #[test]
    fn test_package_state() {
        let mut writer = CodeWriter::new("  ", 100);
        assert!(matches!(writer.pop_package(), Err(Error::PackageState(_))));
        writer.push_package("a").unwrap();
        assert!(matches!(writer.push_package("b"), Err(Error::PackageState(_))));
    }

    #[test]
    fn test_nested_types_resolve_from_scope() {
        let mut writer = CodeWriter::new("  ", 100);
        writer.push_package("com.example").unwrap();
        let mut scope = TypeScope::new("Outer");
        scope.nested_type_names.push("Inner".to_string());
        writer.push_type(scope);

        let inner = ClassName::new("com.example", "Outer").nested_class("Inner");
        let deep = inner.nested_class("Deep");
        writer.emit_code(&code_block!("%T %T", &inner, &deep).unwrap()).unwrap();
        writer.pop_type();
        assert_eq!(writer.finish().unwrap(), "Inner Inner.Deep");
    }

    #[test]
    fn test_render_file_imports_once() {
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.example")?;
            for import in out.imports() {
                out.emit(&format!("import {import}\n"))?;
            }
            out.emit_code(&code_block!("val a: %T = %T()\n", kotlin::list(), kotlin::string())?)?;
            out.pop_package()
        })
        .unwrap();

        assert_eq!(
            text,
            "import kotlin.String\nimport kotlin.collections.List\nval a: List = String()\n"
        );
    }

    #[test]
    fn test_render_file_collision() {
        let sql = ClassName::new("java.sql", "Date");
        let util = ClassName::new("java.util", "Date");
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.example")?;
            let imports = out.imports();
            assert!(imports.is_empty());
            out.emit_code(&code_block!("%T, %T", &sql, &util)?)?;
            out.pop_package()
        })
        .unwrap();
        assert_eq!(text, "java.sql.Date, java.util.Date");
    }

    #[test]
    fn test_kdoc_references_are_not_imported() {
        let random = ClassName::new("java.util", "Random");
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.example")?;
            for import in out.imports() {
                out.emit(&format!("import {import}\n"))?;
            }
            out.emit_kdoc(&code_block!("[%T]", &random)?)?;
            out.pop_package()
        })
        .unwrap();
        assert_eq!(text, "/**\n * [java.util.Random]\n */\n");
    }

    #[test]
    fn test_member_lookup() {
        let create = MemberName::new("com.example", "createTaco");
        let max = MemberName::in_class(&kotlin::int().nested_class("Companion"), "MAX_VALUE");
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.other")?;
            for import in out.imports() {
                out.emit(&format!("import {import}\n"))?;
            }
            out.emit_code(&code_block!("%M(%M)", &create, &max)?)?;
            out.pop_package()
        })
        .unwrap();
        assert_eq!(
            text,
            "import com.example.createTaco\nimport kotlin.Int.Companion.MAX_VALUE\ncreateTaco(MAX_VALUE)"
        );
    }

    #[test]
    fn test_member_in_scope_is_not_imported() {
        let create = MemberName::new("com.example", "create");
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.other")?;
            assert!(out.imports().is_empty());
            let mut scope = TypeScope::new("Factory");
            scope.function_names.push("create".to_string());
            out.push_type(scope);
            out.emit_code(&code_block!("%M()", &create)?)?;
            out.pop_type();
            out.pop_package()
        })
        .unwrap();
        assert_eq!(text, "com.example.create()");
    }

    #[test]
    fn test_type_variables_and_where_block() {
        let t = TypeVariableName::new("T").bounded_by(kotlin::string());
        let r = TypeVariableName::new("R")
            .with_variance(crate::names::Variance::Out)
            .bounded_by(kotlin::any())
            .bounded_by(kotlin::string().with_nullable(true));
        let u = TypeVariableName::new("U")
            .with_reified(true)
            .bounded_by(kotlin::any().with_nullable(true));

        let text = CodeWriter::render_standalone(|out| {
            out.emit_type_variables(&[t.clone(), r.clone(), u.clone()])?;
            out.emit_where_block(&[t.clone(), r.clone(), u.clone()])
        })
        .unwrap();
        assert_eq!(
            text,
            "<T : kotlin.String, out R, reified U> where R : kotlin.Any, R : kotlin.String?"
        );
    }

    #[test]
    fn test_template_code_is_rendered_with_imports() {
        let text = CodeWriter::render_file(&FormatOptions::default(), |out| {
            out.push_package("com.example")?;
            for import in out.imports() {
                out.emit(&format!("import {import}\n"))?;
            }
            let inner = code_block!("${%T.MAX_VALUE}", kotlin::int())?;
            out.emit_code(&code_block!("val s = %P", inner)?)?;
            out.pop_package()
        })
        .unwrap();
        assert_eq!(text, "import kotlin.Int\nval s = \"\"\"${Int.MAX_VALUE}\"\"\"");
    }
}
