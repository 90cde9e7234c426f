//! Escaping of string literals, identifiers and documentation text.

use kpoet_core::is_identifier;

use crate::{
    error::{Error, Result},
    keywords::Keywords,
};

/// Replacement for `$` inside a string literal, so it is never interpolated.
const DOLLAR: &str = "${'$'}";

/// Characters that backticks cannot make legal in a name.
const ILLEGAL_IN_NAME: [char; 9] = ['.', ';', '[', ']', '/', '<', '>', ':', '\\'];

/// Quote `value` as a Kotlin string literal.
///
/// Values containing a newline (outside constant context) become a raw
/// multi-line literal with a `|` margin. Inside a raw string (`%P`), `$`
/// is left alone so templates stay live.
pub fn string_literal_with_quotes(value: &str, inside_raw_string: bool, constant_context: bool) -> String {
    let mut result = String::with_capacity(value.len() + 32);

    if !constant_context && value.contains('\n') {
        result.push_str("\"\"\"\n|");
        let mut rest = value;
        while let Some(c) = rest.chars().next() {
            if rest.starts_with("\"\"\"") {
                result.push_str("\"\"${'\"'}");
                rest = &rest[3..];
                continue;
            }
            match c {
                '\n' => result.push_str("\n|"),
                '$' if !inside_raw_string => result.push_str(DOLLAR),
                _ => result.push(c),
            }
            rest = &rest[c.len_utf8()..];
        }
        if !value.ends_with('\n') {
            result.push('\n');
        }
        result.push_str("\"\"\".trimMargin()");
        return result;
    }

    let quote = if inside_raw_string { "\"\"\"" } else { "\"" };
    result.push_str(quote);
    for c in value.chars() {
        match c {
            '\'' => result.push('\''),
            '"' if !inside_raw_string => result.push_str("\\\""),
            '$' if !inside_raw_string => result.push_str(DOLLAR),
            _ if inside_raw_string => result.push(c),
            _ => push_char_escape(&mut result, c),
        }
    }
    result.push_str(quote);
    result
}

/// The body of a character literal for `c`, without the surrounding quotes.
pub fn character_literal_without_quotes(c: char) -> String {
    let mut out = String::new();
    match c {
        '"' => out.push('"'),
        '\'' => out.push_str("\\'"),
        _ => push_char_escape(&mut out, c),
    }
    out
}

fn push_char_escape(out: &mut String, c: char) {
    match c {
        '\u{8}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c if is_iso_control(c) => out.push_str(&format!("\\u{:04x}", u32::from(c))),
        c => out.push(c),
    }
}

fn is_iso_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

fn already_escaped(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('`') && name.ends_with('`')
}

fn backticked(name: &str) -> String {
    format!("`{name}`")
}

/// Wrap `name` in backticks when it is not usable as a bare identifier:
/// keywords, non-identifiers, names containing `$`, and names made only of
/// underscores.
pub fn escape_if_necessary(name: &str) -> Result<String> {
    let mut escaped = name.to_string();

    if !already_escaped(&escaped)
        && (!is_identifier(&escaped)
            || Keywords::KOTLIN.is_reserved(&escaped)
            || escaped.contains('$')
            || escaped.chars().all(|c| c == '_'))
    {
        escaped = backticked(&escaped);
    }

    if !already_escaped(name) {
        let illegal: String = ILLEGAL_IN_NAME.iter().filter(|c| name.contains(**c)).collect();
        if !illegal.is_empty() {
            return Err(Error::IllegalIdentifier {
                name: escaped,
                illegal,
            });
        }
    }

    Ok(escaped)
}

/// Escape each `.`-separated segment of a qualified name.
pub fn escape_segments_if_necessary(name: &str) -> Result<String> {
    let segments = name
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(escape_if_necessary)
        .collect::<Result<Vec<_>>>()?;
    Ok(segments.join("."))
}

/// Neutralize comment delimiters inside KDoc text.
pub fn escape_kdoc(text: &str) -> String {
    text.replace("/*", "/&#42;").replace("*/", "&#42;/")
}
