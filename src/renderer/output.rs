//! Output buffering and stateful cell rendering.
//!
//! A frame is assembled in an [`OutputBuffer`] and written with one call.
//! [`StatefulCellRenderer`] remembers the cursor, colours and attributes it
//! last emitted and only writes escape codes for what changed.

use std::borrow::Cow;
use std::io::{self, Write};

use super::ansi;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// OutputBuffer
// =============================================================================

/// One frame's worth of escape codes and glyphs, written in a single call.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Append the glyph of a cell. Codepoints that are not valid chars are
    /// dropped.
    pub fn push_glyph(&mut self, codepoint: u32) {
        if let Some(ch) = char::from_u32(codepoint) {
            let mut utf8 = [0u8; 4];
            self.push_str(ch.encode_utf8(&mut utf8));
        }
    }

    /// Hand the frame to `writer`, flush it and start over.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.bytes.is_empty() {
            writer.write_all(&self.bytes)?;
            self.bytes.clear();
        }
        writer.flush()
    }

    /// Lossy text view, for inspection.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Emits cells, skipping cursor moves and SGR codes the terminal already
/// has in effect.
#[derive(Debug)]
pub struct StatefulCellRenderer {
    /// Column and row of the last cell written; `-1` before the first.
    cursor: (i32, i32),
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Attr,
}

impl StatefulCellRenderer {
    pub fn new() -> Self {
        Self {
            cursor: (-1, -1),
            fg: None,
            bg: None,
            attrs: Attr::NONE,
        }
    }

    /// Forget everything; the next cell re-emits position and style.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Render one cell at (`x`, `y`), moving the cursor only when the cell
    /// does not directly follow the previous one.
    pub fn render_cell(&mut self, output: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let here = (x as i32, y as i32);
        if cell.char != 0 {
            let (last_x, last_y) = self.cursor;
            if here != (last_x + 1, last_y) {
                // Writes into OutputBuffer cannot fail.
                let _ = ansi::cursor_to(output, x, y);
            }
            self.style(output, cell);
            output.push_glyph(cell.char);
        }
        self.cursor = here;
    }

    /// Render a cell for sequential output without cursor positioning.
    /// Continuations are skipped; the wide character before them already
    /// covers that column.
    pub fn render_cell_inline(&mut self, output: &mut OutputBuffer, cell: &Cell) {
        if cell.char == 0 {
            return;
        }
        self.style(output, cell);
        output.push_glyph(cell.char);
    }

    fn style(&mut self, output: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.attrs {
            // A reset is the only way to clear attributes; colours go with it.
            let _ = ansi::reset(output);
            let _ = ansi::attrs(output, cell.attrs);
            self.attrs = cell.attrs;
            self.fg = None;
            self.bg = None;
        }
        if self.fg.replace(cell.fg) != Some(cell.fg) {
            let _ = ansi::fg(output, cell.fg);
        }
        if self.bg.replace(cell.bg) != Some(cell.bg) {
            let _ = ansi::bg(output, cell.bg);
        }
    }
}

impl Default for StatefulCellRenderer {
    fn default() -> Self {
        Self::new()
    }
}
