//! Templates: format strings with typed placeholders, parsed once at
//! construction.
//!
//! | token   | argument                                        |
//! |---------|-------------------------------------------------|
//! | `%L`    | literal, emitted as is; a nested block renders recursively |
//! | `%N`    | name, backtick-escaped when needed              |
//! | `%S`    | string, escaped so templates are inert          |
//! | `%P`    | string template, `$` stays live                 |
//! | `%T`    | type, shortened through imports                 |
//! | `%M`    | member, shortened through imports               |
//! | `%%`    | a percent sign                                  |
//! | `⇥` `⇤` | indent / unindent                               |
//! | `«` `»` | begin / end a statement                         |
//!
//! Arguments are relative (`%L`), positional (`%2L`), or named (`%food:L`
//! with [`CodeBlockBuilder::add_named`]).

use std::fmt;

use indexmap::IndexMap;

use crate::{
    error::{Error, Result},
    escape::{character_literal_without_quotes, escape_if_necessary},
    names::{ClassName, MemberName, TypeName},
    writer::CodeWriter,
};

const PLACEHOLDERS: [char; 6] = ['L', 'N', 'S', 'P', 'T', 'M'];

/// A value supplied for a placeholder.
#[derive(Debug, Clone)]
pub enum Arg {
    Null,
    Str(String),
    Int(i128),
    Float(f64),
    Float32(f32),
    Bool(bool),
    Char(char),
    Code(CodeBlock),
    Type(TypeName),
    Member(MemberName),
}

impl Arg {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "a string",
            Self::Int(_) | Self::Float(_) | Self::Float32(_) => "a number",
            Self::Bool(_) => "a boolean",
            Self::Char(_) => "a char",
            Self::Code(_) => "a code block",
            Self::Type(_) => "a type",
            Self::Member(_) => "a member",
        }
    }

    /// Plain text of a scalar argument.
    fn display(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Str(s) => s.clone(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Float32(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Code(code) => code.to_string(),
            Self::Type(type_name) => type_name.to_string(),
            Self::Member(member) => member.canonical_name(),
        }
    }

    fn into_part(self, placeholder: char) -> Result<CodeArg> {
        let wrong_kind = |arg: &Arg, expected| Error::argument_kind(expected, placeholder, arg.kind());
        let part = match placeholder {
            'N' => match &self {
                Self::Str(name) => CodeArg::Name(escape_if_necessary(name)?),
                Self::Member(member) => CodeArg::Name(escape_if_necessary(member.simple_name())?),
                _ => return Err(wrong_kind(&self, "a name")),
            },
            'L' => match self {
                Self::Code(code) => CodeArg::Code(code),
                Self::Int(value) => CodeArg::Literal(group_digits(&value.to_string())),
                Self::Float(value) => CodeArg::Literal(format_float(value.to_string())),
                Self::Float32(value) => CodeArg::Literal(format_float(value.to_string())),
                Self::Char(c) => CodeArg::Literal(format!("'{}'", character_literal_without_quotes(c))),
                other => CodeArg::Literal(other.display()),
            },
            'S' => match self {
                Self::Null => CodeArg::Str(None),
                other => CodeArg::Str(Some(other.display())),
            },
            'P' => match self {
                Self::Null => CodeArg::Template(None),
                Self::Code(code) => CodeArg::TemplateCode(code),
                other => CodeArg::Template(Some(other.display())),
            },
            'T' => match self {
                Self::Type(type_name) => CodeArg::Type(type_name),
                other => return Err(wrong_kind(&other, "a type")),
            },
            'M' => match self {
                Self::Member(member) => CodeArg::Member(member),
                other => return Err(wrong_kind(&other, "a member")),
            },
            _ => return Err(wrong_kind(&self, "a known placeholder")),
        };
        Ok(part)
    }
}

/// Group the integer digits of a decimal with `_`, e.g. `1_000_000`.
fn group_digits(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Shortest decimal form with grouped integer digits and at least one
/// fraction digit, e.g. `1_234.5` or `10.0`.
fn format_float(repr: String) -> String {
    match repr.as_str() {
        "NaN" => return "Double.NaN".to_string(),
        "inf" => return "Double.POSITIVE_INFINITY".to_string(),
        "-inf" => return "Double.NEGATIVE_INFINITY".to_string(),
        _ => {}
    }
    match repr.split_once('.') {
        Some((whole, fraction)) => format!("{}.{fraction}", group_digits(whole)),
        None => format!("{}.0", group_digits(&repr)),
    }
}

macro_rules! arg_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

arg_from! {
    &str => |v| Arg::Str(v.to_string()),
    String => |v| Arg::Str(v),
    &String => |v| Arg::Str(v.clone()),
    bool => |v| Arg::Bool(v),
    char => |v| Arg::Char(v),
    i8 => |v| Arg::Int(v.into()),
    i16 => |v| Arg::Int(v.into()),
    i32 => |v| Arg::Int(v.into()),
    i64 => |v| Arg::Int(v.into()),
    u8 => |v| Arg::Int(v.into()),
    u16 => |v| Arg::Int(v.into()),
    u32 => |v| Arg::Int(v.into()),
    u64 => |v| Arg::Int(v.into()),
    usize => |v| Arg::Int(v as i128),
    f32 => |v| Arg::Float32(v),
    f64 => |v| Arg::Float(v),
    CodeBlock => |v| Arg::Code(v),
    &CodeBlock => |v| Arg::Code(v.clone()),
    TypeName => |v| Arg::Type(v),
    &TypeName => |v| Arg::Type(v.clone()),
    ClassName => |v| Arg::Type(TypeName::Class(v)),
    &ClassName => |v| Arg::Type(TypeName::Class(v.clone())),
    MemberName => |v| Arg::Member(v),
    &MemberName => |v| Arg::Member(v.clone()),
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// An argument after conversion, ready to emit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CodeArg {
    Literal(String),
    Code(CodeBlock),
    Name(String),
    Str(Option<String>),
    Template(Option<String>),
    TemplateCode(CodeBlock),
    Type(TypeName),
    Member(MemberName),
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Part {
    Text(String),
    Arg(CodeArg),
    Percent,
    Indent,
    Unindent,
    StatementBegin,
    StatementEnd,
}

impl Part {
    fn control(c: char) -> Option<Self> {
        match c {
            '⇥' => Some(Self::Indent),
            '⇤' => Some(Self::Unindent),
            '«' => Some(Self::StatementBegin),
            '»' => Some(Self::StatementEnd),
            _ => None,
        }
    }

    fn is_control(&self) -> bool {
        matches!(
            self,
            Self::Indent | Self::Unindent | Self::StatementBegin | Self::StatementEnd
        )
    }
}

fn is_placeholder_start(c: char) -> bool {
    matches!(c, '%' | '«' | '»' | '⇥' | '⇤')
}

fn next_placeholder(format: &str, from: usize) -> Option<usize> {
    format[from..]
        .char_indices()
        .find(|&(_, c)| is_placeholder_start(c))
        .map(|(i, _)| from + i)
}

/// An immutable, parsed template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeBlock {
    pub(crate) parts: Vec<Part>,
}

impl CodeBlock {
    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::default()
    }

    /// Parse `format` against `args`.
    pub fn of(format: &str, args: &[Arg]) -> Result<Self> {
        let mut builder = Self::builder();
        builder.add(format, args)?;
        Ok(builder.build())
    }

    /// Join blocks with `separator`, wrapped in `prefix` and `suffix`.
    pub fn join(
        blocks: impl IntoIterator<Item = CodeBlock>,
        separator: &str,
        prefix: &str,
        suffix: &str,
    ) -> Self {
        let mut parts = Vec::new();
        push_text(&mut parts, prefix);
        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 {
                push_text(&mut parts, separator);
            }
            parts.push(Part::Arg(CodeArg::Code(block)));
        }
        push_text(&mut parts, suffix);
        Self { parts }
    }

    pub fn to_builder(&self) -> CodeBlockBuilder {
        CodeBlockBuilder {
            parts: self.parts.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether the block opens at least one statement.
    pub fn has_statements(&self) -> bool {
        self.parts.iter().any(|part| matches!(part, Part::StatementBegin))
    }

    /// A copy with `⇥` and `⇤` removed.
    pub fn without_indents(&self) -> Self {
        Self {
            parts: self
                .parts
                .iter()
                .filter(|part| !matches!(part, Part::Indent | Part::Unindent))
                .cloned()
                .collect(),
        }
    }

    /// A copy without leading and trailing control tokens.
    pub fn trim(&self) -> Self {
        let start = self.parts.iter().take_while(|part| part.is_control()).count();
        let end = self.parts.len() - self.parts[start..].iter().rev().take_while(|part| part.is_control()).count();
        Self {
            parts: self.parts[start..end].to_vec(),
        }
    }

    /// A copy whose last text does not end with a newline. Control tokens
    /// after the newline are kept.
    pub fn trim_trailing_newline(&self) -> Self {
        let mut parts = self.parts.clone();
        if let Some(index) = parts.iter().rposition(|part| !part.is_control())
            && let Part::Text(text) = &mut parts[index]
            && text.ends_with('\n')
        {
            text.pop();
            if text.is_empty() {
                parts.remove(index);
            }
        }
        Self { parts }
    }

    /// A copy that ends with a newline.
    pub fn ensure_ends_with_newline(&self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        let ends_with_newline = self
            .parts
            .iter()
            .rev()
            .find(|part| !part.is_control())
            .is_some_and(|part| matches!(part, Part::Text(text) if text.ends_with('\n')));
        if ends_with_newline {
            return self.clone();
        }
        let mut parts = self.parts.clone();
        parts.push(Part::Text("\n".to_string()));
        Self { parts }
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = CodeWriter::render_standalone(|out| out.emit_code(self)).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

fn push_text(parts: &mut Vec<Part>, text: &str) {
    if !text.is_empty() {
        parts.push(Part::Text(text.to_string()));
    }
}

/// Bookkeeping for relative and positional arguments during one `add`.
struct ArgumentUse {
    relative: usize,
    indexed: Vec<usize>,
    has_relative: bool,
    has_indexed: bool,
}

impl ArgumentUse {
    fn new(count: usize) -> Self {
        Self {
            relative: 0,
            indexed: vec![0; count],
            has_relative: false,
            has_indexed: false,
        }
    }

    fn finish(self, received: usize) -> Result<()> {
        if !self.has_indexed && self.relative < received {
            return Err(Error::UnusedArguments {
                expected: self.relative,
                received,
            });
        }
        if self.has_indexed {
            let unused: Vec<String> = self
                .indexed
                .iter()
                .enumerate()
                .filter(|&(_, uses)| *uses == 0)
                .map(|(i, _)| format!("%{}", i + 1))
                .collect();
            if !unused.is_empty() {
                return Err(Error::UnusedIndexedArguments { unused });
            }
        }
        Ok(())
    }
}

/// Accumulates a [`CodeBlock`]. A failed call leaves the builder unchanged.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockBuilder {
    parts: Vec<Part>,
}

impl CodeBlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Add `format` with relative or positional arguments.
    pub fn add(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        let parts = parse(format, args)?;
        self.parts.extend(parts);
        Ok(self)
    }

    /// Add `format` with named arguments such as `%food:L`.
    pub fn add_named(&mut self, format: &str, args: &IndexMap<String, Arg>) -> Result<&mut Self> {
        let parts = parse_named(format, args)?;
        self.parts.extend(parts);
        Ok(self)
    }

    /// Add `format` as one statement terminated by a newline.
    pub fn add_statement(&mut self, format: &str, args: &[Arg]) -> Result<&mut Self> {
        let parts = parse(format, args)?;
        self.parts.push(Part::StatementBegin);
        self.parts.extend(parts);
        self.parts.push(Part::Text("\n".to_string()));
        self.parts.push(Part::StatementEnd);
        Ok(self)
    }

    pub fn add_code(&mut self, code: &CodeBlock) -> &mut Self {
        self.parts.extend(code.parts.iter().cloned());
        self
    }

    /// Open a braced block such as `if (x) {`. A brace is added unless the
    /// header already opens one.
    pub fn begin_control_flow(&mut self, control_flow: &str, args: &[Arg]) -> Result<&mut Self> {
        let mut parts = parse(control_flow, args)?;
        let opens_brace = control_flow
            .chars()
            .rev()
            .find(|&c| c == '{' || c == '}')
            .is_some_and(|c| c == '{');
        parts.push(Part::Text(if opens_brace { "\n" } else { " {\n" }.to_string()));
        parts.push(Part::Indent);
        self.parts.extend(parts);
        Ok(self)
    }

    /// Close the current block and open the next, as in `} else {`.
    pub fn next_control_flow(&mut self, control_flow: &str, args: &[Arg]) -> Result<&mut Self> {
        let parts = parse(control_flow, args)?;
        self.parts.push(Part::Unindent);
        self.parts.push(Part::Text("} ".to_string()));
        self.parts.extend(parts);
        self.parts.push(Part::Text(" {\n".to_string()));
        self.parts.push(Part::Indent);
        Ok(self)
    }

    pub fn end_control_flow(&mut self) -> &mut Self {
        self.parts.push(Part::Unindent);
        self.parts.push(Part::Text("}\n".to_string()));
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.parts.push(Part::Indent);
        self
    }

    pub fn unindent(&mut self) -> &mut Self {
        self.parts.push(Part::Unindent);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.parts.clear();
        self
    }

    pub fn build(&self) -> CodeBlock {
        CodeBlock {
            parts: self.parts.clone(),
        }
    }
}

fn parse(format: &str, args: &[Arg]) -> Result<Vec<Part>> {
    let mut parts = Vec::new();
    let mut uses = ArgumentUse::new(args.len());
    let mut p = 0;

    while let Some(c) = format[p..].chars().next() {
        if let Some(control) = Part::control(c) {
            parts.push(control);
            p += c.len_utf8();
            continue;
        }

        if c != '%' {
            let end = next_placeholder(format, p + c.len_utf8()).unwrap_or(format.len());
            push_text(&mut parts, &format[p..end]);
            p = end;
            continue;
        }

        p += 1;
        let index_start = p;
        let placeholder = loop {
            let Some(c) = format[p..].chars().next() else {
                return Err(Error::DanglingFormat(format.to_string()));
            };
            p += c.len_utf8();
            if !c.is_ascii_digit() {
                break c;
            }
        };
        let index_end = p - placeholder.len_utf8();

        if placeholder == '%' {
            if index_start != index_end {
                return Err(Error::IndexedPercent);
            }
            parts.push(Part::Percent);
            continue;
        }

        if !PLACEHOLDERS.contains(&placeholder) {
            return Err(Error::UnknownPlaceholder {
                placeholder,
                index: index_end,
                format: format.to_string(),
            });
        }

        let out_of_range = |index: usize| Error::IndexOutOfRange {
            index,
            placeholder: format[index_start - 1..p].to_string(),
            count: args.len(),
        };

        let index = if index_start < index_end {
            uses.has_indexed = true;
            let written = format[index_start..index_end].parse::<usize>().unwrap_or(usize::MAX);
            let index = written
                .checked_sub(1)
                .filter(|&index| index < args.len())
                .ok_or_else(|| out_of_range(written))?;
            uses.indexed[index] += 1;
            index
        } else {
            uses.has_relative = true;
            uses.relative += 1;
            let index = uses.relative - 1;
            if index >= args.len() {
                return Err(out_of_range(index + 1));
            }
            index
        };

        if uses.has_indexed && uses.has_relative {
            return Err(Error::MixedArguments);
        }

        parts.push(Part::Arg(args[index].clone().into_part(placeholder)?));
    }

    uses.finish(args.len())?;
    Ok(parts)
}

/// Argument names start with a lowercase ASCII letter and continue with
/// letters, digits or `_`.
fn is_valid_argument_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Match `%name:X` at the start of `rest`, returning the name, the
/// placeholder and the matched length.
fn match_named(rest: &str) -> Option<(&str, char, usize)> {
    let body = rest.strip_prefix('%')?;
    let colon = body.find(':')?;
    let name = &body[..colon];
    if name.is_empty() || !name.chars().all(is_word_char) {
        return None;
    }
    let placeholder = body[colon + 1..].chars().next().filter(|&c| is_word_char(c))?;
    Some((name, placeholder, 1 + colon + 1 + placeholder.len_utf8()))
}

fn parse_named(format: &str, args: &IndexMap<String, Arg>) -> Result<Vec<Part>> {
    if let Some(name) = args.keys().find(|name| !is_valid_argument_name(name)) {
        return Err(Error::InvalidArgumentName(name.clone()));
    }

    let mut parts = Vec::new();
    let mut p = 0;

    while p < format.len() {
        let Some(next) = next_placeholder(format, p) else {
            push_text(&mut parts, &format[p..]);
            break;
        };
        push_text(&mut parts, &format[p..next]);
        p = next;

        if let Some((name, placeholder, len)) = match_named(&format[p..]) {
            let arg = args
                .get(name)
                .ok_or_else(|| Error::MissingNamedArgument(name.to_string()))?;
            if !PLACEHOLDERS.contains(&placeholder) {
                return Err(Error::UnknownPlaceholder {
                    placeholder,
                    index: p + len - placeholder.len_utf8(),
                    format: format.to_string(),
                });
            }
            parts.push(Part::Arg(arg.clone().into_part(placeholder)?));
            p += len;
            continue;
        }

        let Some(c) = format[p..].chars().next() else {
            break;
        };
        if let Some(control) = Part::control(c) {
            parts.push(control);
            p += c.len_utf8();
            continue;
        }

        let Some(following) = format[p + 1..].chars().next() else {
            return Err(Error::DanglingFormat(format.to_string()));
        };
        if following != '%' {
            return Err(Error::UnknownPlaceholder {
                placeholder: following,
                index: p + 1,
                format: format.to_string(),
            });
        }
        parts.push(Part::Percent);
        p += 2;
    }

    Ok(parts)
}

/// Build a [`CodeBlock`] from a format string and arguments of any type
/// convertible to [`Arg`].
///
/// ```
/// use kpoet_codegen::code_block;
///
/// let block = code_block!("val %N = %L", "total", 1000).unwrap();
/// assert_eq!(block.to_string(), "val total = 1_000");
/// ```
#[macro_export]
macro_rules! code_block {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::CodeBlock::of($format, &[$($crate::Arg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::kotlin;

    fn named(pairs: &[(&str, Arg)]) -> IndexMap<String, Arg> {
        pairs
            .iter()
            .map(|(name, arg)| (name.to_string(), arg.clone()))
            .collect()
    }

    #[test]
    fn test_relative_arguments() {
        let block = CodeBlock::of("%L and %S", &["taco".into(), "chips".into()]).unwrap();
        assert_eq!(block.to_string(), "taco and \"chips\"");
    }

    #[test]
    fn test_positional_arguments_may_repeat() {
        let block = CodeBlock::of("%1L %2L %1L", &["a".into(), "b".into()]).unwrap();
        assert_eq!(block.to_string(), "a b a");
    }

    #[test]
    fn test_named_arguments() {
        let args = named(&[("food", "tacos".into()), ("count", 3.into())]);
        let mut builder = CodeBlock::builder();
        builder.add_named("I ate %count:L %food:L", &args).unwrap();
        assert_eq!(builder.build().to_string(), "I ate 3 tacos");
    }

    #[test]
    fn test_named_argument_with_percent_and_colon() {
        let args = named(&[("text", "tacos".into())]);
        let mut builder = CodeBlock::builder();
        builder.add_named("%% of %text:L: good", &args).unwrap();
        assert_eq!(builder.build().to_string(), "% of tacos: good");
    }

    #[test]
    fn test_named_argument_errors() {
        let mut builder = CodeBlock::builder();

        let err = builder
            .add_named("%food:L", &named(&[("Food", "x".into())]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentName(ref name) if name == "Food"));

        let err = builder
            .add_named("%food:L", &named(&[("drink", "x".into())]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing named argument for %food");

        let err = builder.add_named("%food:Q", &named(&[("food", "x".into())])).unwrap_err();
        assert!(matches!(err, Error::UnknownPlaceholder { placeholder: 'Q', .. }));

        let err = builder.add_named("tail %", &named(&[])).unwrap_err();
        assert!(matches!(err, Error::DanglingFormat(_)));

        assert!(builder.is_empty());
    }

    #[test]
    fn test_dangling_format() {
        let err = CodeBlock::of("%", &[]).unwrap_err();
        assert!(matches!(err, Error::DanglingFormat(_)));
        let err = CodeBlock::of("%1", &["a".into()]).unwrap_err();
        assert!(matches!(err, Error::DanglingFormat(_)));
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = CodeBlock::of("%X", &["a".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown format %X at 1 in '%X'");
    }

    #[test]
    fn test_indexed_percent() {
        let err = CodeBlock::of("%1%", &[]).unwrap_err();
        assert!(matches!(err, Error::IndexedPercent));
        assert_eq!(CodeBlock::of("100%%", &[]).unwrap().to_string(), "100%");
    }

    #[test]
    fn test_index_out_of_range() {
        let err = CodeBlock::of("%2L", &["a".into()]).unwrap_err();
        assert_eq!(err.to_string(), "index 2 for '%2L' not in range (received 1 arguments)");

        let err = CodeBlock::of("%0L", &["a".into()]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 0, .. }));

        let err = CodeBlock::of("%L %L", &["a".into()]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_mixed_arguments() {
        let err = CodeBlock::of("%L %2L", &["a".into(), "b".into()]).unwrap_err();
        assert!(matches!(err, Error::MixedArguments));
    }

    #[test]
    fn test_unused_arguments() {
        let err = CodeBlock::of("%L", &["a".into(), "b".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unused arguments: expected 1, received 2");

        let err = CodeBlock::of("%2L", &["a".into(), "b".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unused argument: %1");

        let err = CodeBlock::of("%3L", &["a".into(), "b".into(), "c".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unused arguments: %1, %2");

        let err = CodeBlock::of("no placeholders", &["a".into()]).unwrap_err();
        assert!(matches!(err, Error::UnusedArguments { expected: 0, received: 1 }));
    }

    #[test]
    fn test_argument_kinds() {
        let err = CodeBlock::of("%T", &["String".into()]).unwrap_err();
        assert_eq!(err.to_string(), "expected a type for %T but was a string");

        let err = CodeBlock::of("%M", &[kotlin::string().into()]).unwrap_err();
        assert!(matches!(err, Error::ArgumentKind { placeholder: 'M', .. }));

        let err = CodeBlock::of("%N", &[1.into()]).unwrap_err();
        assert!(matches!(err, Error::ArgumentKind { placeholder: 'N', .. }));
    }

    #[test]
    fn test_failed_add_leaves_builder_unchanged() {
        let mut builder = CodeBlock::builder();
        builder.add("val a = 1\n", &[]).unwrap();
        let before = builder.build();

        assert!(builder.add("%L %L", &["only".into()]).is_err());
        assert_eq!(builder.build(), before);
    }

    #[test]
    fn test_name_escaping() {
        let block = CodeBlock::of("val %N = %N", &["when".into(), "taco".into()]).unwrap();
        assert_eq!(block.to_string(), "val `when` = taco");

        let err = CodeBlock::of("%N", &["a.b".into()]).unwrap_err();
        assert!(matches!(err, Error::IllegalIdentifier { .. }));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(code_block!("%L", 1_000_000).unwrap().to_string(), "1_000_000");
        assert_eq!(code_block!("%L", -12345).unwrap().to_string(), "-12_345");
        assert_eq!(code_block!("%L", 999).unwrap().to_string(), "999");
        assert_eq!(code_block!("%L", 1234.5).unwrap().to_string(), "1_234.5");
        assert_eq!(code_block!("%L", 10.0).unwrap().to_string(), "10.0");
        assert_eq!(code_block!("%L", 0.1f32).unwrap().to_string(), "0.1");
        assert_eq!(code_block!("%S", 1000).unwrap().to_string(), "\"1000\"");
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(code_block!("%L", 'a').unwrap().to_string(), "'a'");
        assert_eq!(code_block!("%L", '\'').unwrap().to_string(), "'\\''");
        assert_eq!(code_block!("%L", '\n').unwrap().to_string(), "'\\n'");
        assert_eq!(code_block!("%S", 'a').unwrap().to_string(), "\"a\"");
    }

    #[test]
    fn test_null_arguments() {
        let none: Option<&str> = None;
        assert_eq!(code_block!("%S", none).unwrap().to_string(), "null");
        assert_eq!(code_block!("%L", none).unwrap().to_string(), "null");
        assert_eq!(code_block!("%S", Some("x")).unwrap().to_string(), "\"x\"");
    }

    #[test]
    fn test_template_string() {
        let block = code_block!("%P", "Hello, ${name}!").unwrap();
        assert_eq!(block.to_string(), "\"\"\"Hello, ${name}!\"\"\"");

        let block = code_block!("%S", "Hello, ${name}!").unwrap();
        assert_eq!(block.to_string(), "\"Hello, ${'$'}{name}!\"");
    }

    #[test]
    fn test_template_string_with_code() {
        let inner = code_block!("${%T.MAX_VALUE}", kotlin::int()).unwrap();
        let block = code_block!("%P", inner).unwrap();
        assert_eq!(block.to_string(), "\"\"\"${kotlin.Int.MAX_VALUE}\"\"\"");
    }

    #[test]
    fn test_nested_code_literal() {
        let inner = code_block!("%S", "x").unwrap();
        let block = code_block!("println(%L)", inner).unwrap();
        assert_eq!(block.to_string(), "println(\"x\")");
    }

    #[test]
    fn test_control_flow() {
        let mut builder = CodeBlock::builder();
        builder
            .begin_control_flow("if (%N > 0)", &["count".into()])
            .unwrap()
            .add_statement("println(%S)", &["positive".into()])
            .unwrap()
            .next_control_flow("else", &[])
            .unwrap()
            .add_statement("println(%S)", &["other".into()])
            .unwrap()
            .end_control_flow();
        builder
            .begin_control_flow("list.forEach { item ->", &[])
            .unwrap()
            .add_statement("println(item)", &[])
            .unwrap()
            .end_control_flow();

        assert_eq!(
            builder.build().to_string(),
            "if (count > 0) {\n  println(\"positive\")\n} else {\n  println(\"other\")\n}\n\
             list.forEach { item ->\n  println(item)\n}\n"
        );
    }

    #[test]
    fn test_join() {
        let blocks = ["a", "b", "c"].map(|name| code_block!("%N", name).unwrap());
        let joined = CodeBlock::join(blocks, ", ", "listOf(", ")");
        assert_eq!(joined.to_string(), "listOf(a, b, c)");
        assert!(CodeBlock::join([], ", ", "", "").is_empty());
    }

    #[test]
    fn test_statement_helpers() {
        let mut builder = CodeBlock::builder();
        builder.add_statement("val x = 1", &[]).unwrap();
        let block = builder.build();
        assert!(block.has_statements());
        assert!(!code_block!("x").unwrap().has_statements());

        assert_eq!(block.trim_trailing_newline().to_string(), "val x = 1");
        assert_eq!(code_block!("a").unwrap().ensure_ends_with_newline().to_string(), "a\n");
        assert_eq!(code_block!("a\n").unwrap().ensure_ends_with_newline().to_string(), "a\n");
        assert!(!block.trim().has_statements());
        assert_eq!(block.trim().to_string(), "val x = 1\n");
    }

    #[test]
    fn test_without_indents() {
        let block = code_block!("⇥a⇤").unwrap();
        assert_eq!(block.without_indents(), code_block!("a").unwrap());
    }

    #[test]
    fn test_defensive_copy() {
        let mut builder = CodeBlock::builder();
        builder.add("a", &[]).unwrap();
        let built = builder.build();
        builder.add("b", &[]).unwrap();
        assert_eq!(built.to_string(), "a");
        assert_eq!(builder.build().to_string(), "ab");
    }

    #[test]
    fn test_equality_is_structural() {
        let block = code_block!("val a = %L", 1).unwrap();
        assert_eq!(block, block.to_builder().build());
        assert_eq!(code_block!("%T", kotlin::int()).unwrap(), code_block!("%T", kotlin::int()).unwrap());
        assert_ne!(code_block!("%S", "a").unwrap(), code_block!("%L", "a").unwrap());
    }
}
