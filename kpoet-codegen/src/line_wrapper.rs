//! Column-aware line wrapping.
//!
//! Callers mark the places where a line may break with [`WRAP`]. Text between
//! two markers forms a segment; a completed line joins its segments with a
//! space, or starts a continuation line when the next segment would cross the
//! column limit.

use std::fmt::Write;

use crate::error::{Error, Result};

/// A space that may be replaced by a line break.
pub const WRAP: char = '♢';

/// A space that never breaks.
pub const NON_BREAKING_SPACE: char = '·';

/// Writes text to a sink, breaking lines at [`WRAP`] markers when they would
/// exceed the column limit.
///
/// Widths are counted in Unicode scalar values. A run without markers is
/// never split, even if it is longer than the limit.
#[derive(Debug)]
pub struct LineWrapper<W> {
    out: W,
    indent: String,
    column_limit: isize,
    closed: bool,
    /// Segments of the current line, separated by wrap markers. Never empty.
    segments: Vec<String>,
    /// Continuation indent of the current line, -1 when no marker was seen.
    indent_level: isize,
    line_prefix: String,
}

impl<W: Write> LineWrapper<W> {
    pub fn new(out: W, indent: impl Into<String>, column_limit: usize) -> Self {
        Self {
            out,
            indent: indent.into(),
            column_limit: isize::try_from(column_limit).unwrap_or(isize::MAX),
            closed: false,
            segments: vec![String::new()],
            indent_level: -1,
            line_prefix: String::new(),
        }
    }

    /// Whether there is text that has not been flushed to the sink yet.
    pub fn has_pending_segments(&self) -> bool {
        self.segments.len() != 1 || !self.segments[0].is_empty()
    }

    /// Emit `s`. Wrapped continuation lines are indented `indent_level`
    /// times and start with `line_prefix`.
    pub fn append(&mut self, s: &str, indent_level: Option<usize>, line_prefix: &str) -> Result<()> {
        self.check_open()?;

        let mut rest = s;
        while !rest.is_empty() {
            let Some((i, c)) = rest
                .char_indices()
                .find(|&(_, c)| matches!(c, ' ' | '\n' | WRAP | NON_BREAKING_SPACE))
            else {
                self.push_to_last(rest);
                break;
            };

            self.push_to_last(&rest[..i]);
            match c {
                ' ' | NON_BREAKING_SPACE => self.push_to_last(" "),
                '\n' => self.newline()?,
                _ => {
                    self.indent_level = indent_level.map_or(-1, |level| level as isize);
                    self.line_prefix = line_prefix.to_string();
                    self.segments.push(String::new());
                }
            }
            rest = &rest[i + c.len_utf8()..];
        }
        Ok(())
    }

    /// Emit `s` as part of the current segment. It never wraps.
    pub fn append_non_wrapping(&mut self, s: &str) -> Result<()> {
        self.check_open()?;
        if s.contains('\n') {
            return Err(Error::NewlineInNonWrapping(s.to_string()));
        }
        self.push_to_last(s);
        Ok(())
    }

    /// Flush the current line and start a new one.
    pub fn newline(&mut self) -> Result<()> {
        self.check_open()?;
        self.emit_current_line()?;
        self.out.write_char('\n')?;
        self.indent_level = -1;
        Ok(())
    }

    /// Flush any remaining text. Further writes fail.
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.emit_current_line()?;
            self.closed = true;
        }
        Ok(())
    }

    /// Close the wrapper and return its sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.close()?;
        Ok(self.out)
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::WrapperClosed);
        }
        Ok(())
    }

    fn push_to_last(&mut self, s: &str) {
        if let Some(last) = self.segments.last_mut() {
            last.push_str(s);
        }
    }

    fn emit_current_line(&mut self) -> Result<()> {
        let mut start = 0;
        let mut column = width(&self.segments[0]);

        for i in 1..self.segments.len() {
            let segment_width = width(&self.segments[i]);
            let new_column = column + 1 + segment_width;

            if new_column > self.column_limit {
                self.emit_segment_range(start, i)?;
                start = i;
                column = segment_width + self.indent.chars().count() as isize * self.indent_level;
                continue;
            }

            column = new_column;
        }

        self.emit_segment_range(start, self.segments.len())?;

        self.segments.clear();
        self.segments.push(String::new());
        Ok(())
    }

    fn emit_segment_range(&mut self, start: usize, end: usize) -> Result<()> {
        if start > 0 {
            self.out.write_char('\n')?;
            for _ in 0..self.indent_level.max(0) {
                self.out.write_str(&self.indent)?;
            }
            self.out.write_str(&self.line_prefix)?;
        }

        self.out.write_str(&self.segments[start])?;
        for segment in &self.segments[start + 1..end] {
            self.out.write_char(' ')?;
            self.out.write_str(segment)?;
        }
        Ok(())
    }
}

fn width(s: &str) -> isize {
    s.chars().count() as isize
}
