//! The seam between model values and the writer.

use crate::{error::Result, writer::CodeWriter};

/// A value that writes itself through a [`CodeWriter`].
///
/// Implementations must be deterministic: a file is emitted twice, once to
/// collect imports and once to produce text.
pub trait Emit {
    fn emit(&self, out: &mut CodeWriter) -> Result<()>;

    /// Render without imports or a column limit.
    fn render_standalone(&self) -> Result<String> {
        CodeWriter::render_standalone(|out| self.emit(out))
    }
}

/// Blanket implementation for references.
impl<T: Emit + ?Sized> Emit for &T {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        (**self).emit(out)
    }
}

/// Blanket implementation for Box.
impl<T: Emit + ?Sized> Emit for Box<T> {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        (**self).emit(out)
    }
}

impl Emit for crate::CodeBlock {
    fn emit(&self, out: &mut CodeWriter) -> Result<()> {
        out.emit_code(self)
    }
}
