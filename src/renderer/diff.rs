//! Differential renderer for fullscreen mode.
//!
//! Compares each frame to the previous one and writes only the cells that
//! changed, wrapped in a synchronized-output block and flushed in one write.

use std::io::{self, Write};

use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Keeps the previous frame so the next one can be diffed against it.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the cells of `buffer` that differ from the previous frame.
    /// A size change redraws everything.
    ///
    /// Returns the number of cells written.
    pub fn render<W: Write>(&mut self, buffer: &FrameBuffer, out: &mut W) -> io::Result<usize> {
        let previous = self
            .previous
            .take()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        if previous.is_none() {
            ansi::clear_screen(&mut self.output)?;
        }
        ansi::begin_sync(&mut self.output)?;
        self.cell_renderer.reset();

        let mut changed = 0;
        for (x, y, cell) in buffer.iter() {
            let same = previous
                .as_ref()
                .and_then(|prev| prev.get(x, y))
                .is_some_and(|prev| prev == cell);
            if !same {
                changed += 1;
                self.cell_renderer.render_cell(&mut self.output, x, y, cell);
            }
        }

        ansi::reset(&mut self.output)?;
        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(out)?;

        self.previous = Some(buffer.clone());
        Ok(changed)
    }

    /// Drop the previous frame; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    #[test]
    fn test_first_frame_writes_everything() {
        let mut renderer = DiffRenderer::new();
        let buffer = FrameBuffer::new(3, 2);
        let mut out = Vec::new();
        assert_eq!(renderer.render(&buffer, &mut out).unwrap(), 6);
        assert!(renderer.has_previous());
        assert!(String::from_utf8_lossy(&out).starts_with("\x1b[2J"));
    }

    #[test]
    fn test_unchanged_frame_writes_no_cells() {
        let mut renderer = DiffRenderer::new();
        let mut buffer = FrameBuffer::new(4, 1);
        let mut out = Vec::new();
        renderer.render(&buffer, &mut out).unwrap();
        assert_eq!(renderer.render(&buffer, &mut out).unwrap(), 0);

        buffer.put_char(2, 0, 'x', Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        out.clear();
        assert_eq!(renderer.render(&buffer, &mut out).unwrap(), 1);
        assert!(String::from_utf8_lossy(&out).contains("\x1b[1;3H"));
    }

    #[test]
    fn test_resize_and_invalidate_redraw() {
        let mut renderer = DiffRenderer::new();
        let mut out = Vec::new();
        renderer.render(&FrameBuffer::new(2, 2), &mut out).unwrap();
        assert_eq!(renderer.render(&FrameBuffer::new(3, 2), &mut out).unwrap(), 6);

        renderer.invalidate();
        assert!(!renderer.has_previous());
        assert_eq!(renderer.render(&FrameBuffer::new(3, 2), &mut out).unwrap(), 6);
    }
}
