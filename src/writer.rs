//! XML Writer
//!
//! Serializes elements back to text. Nothing is escaped: names, values
//! and text are written exactly as held.

use crate::error::Result;
use crate::reader::events::Element;
use std::io::Write;

const INDENT: &[u8] = b"  ";

/// Writes elements to a byte sink
pub struct Writer<W> {
    inner: W,
    depth: usize,
}

impl<W: Write> Writer<W> {
    /// Create a writer over `inner`
    pub fn new(inner: W) -> Self {
        Writer { inner, depth: 0 }
    }

    /// Write the element's canonical text
    pub fn write(&mut self, element: Element<'_>) -> Result<()> {
        element.write_to(&mut self.inner)?;
        Ok(())
    }

    /// Write the element on its own line, indented two spaces per open
    /// element.
    ///
    /// This is a pretty-printer, not an exact inverse of the reader:
    /// text gets its own line and source spacing is not kept.
    pub fn write_indent(&mut self, element: Element<'_>) -> Result<()> {
        if element.is_end() {
            self.depth = self.depth.saturating_sub(1);
        }

        for _ in 0..self.depth {
            self.inner.write_all(INDENT)?;
        }
        element.write_to(&mut self.inner)?;
        self.inner.write_all(b"\n")?;

        if let Element::Start(start) = element {
            if !start.has_end() {
                self.depth += 1;
            }
        }
        Ok(())
    }

    /// Current indent depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}
