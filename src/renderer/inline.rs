//! Inline renderer for normal terminal mode.
//!
//! Writes into the normal screen below the prompt instead of the alternate
//! screen. Each frame moves back over the previous one, erases it and
//! writes every row again, so scrollback above stays intact.

use std::io::{self, Write};

use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

#[derive(Debug, Default)]
pub struct InlineRenderer {
    output: OutputBuffer,
    cell_renderer: StatefulCellRenderer,
    previous_height: u16,
}

impl InlineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the previously written frame with `buffer`.
    pub fn render<W: Write>(&mut self, buffer: &FrameBuffer, out: &mut W) -> io::Result<()> {
        ansi::begin_sync(&mut self.output)?;
        self.erase_previous()?;
        self.cell_renderer.reset();

        let height = buffer.height();
        for y in 0..height {
            for x in 0..buffer.width() {
                if let Some(cell) = buffer.get(x, y) {
                    self.cell_renderer.render_cell_inline(&mut self.output, cell);
                }
            }
            ansi::reset(&mut self.output)?;
            self.cell_renderer.reset();
            if y + 1 < height {
                self.output.push_str("\r\n");
            }
        }

        ansi::end_sync(&mut self.output)?;
        self.output.flush_to(out)?;
        // The cursor is left on the last row.
        self.previous_height = height.saturating_sub(1);
        Ok(())
    }

    /// Erase whatever was written and forget it.
    pub fn clear<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.erase_previous()?;
        self.output.flush_to(out)?;
        self.previous_height = 0;
        Ok(())
    }

    fn erase_previous(&mut self) -> io::Result<()> {
        ansi::cursor_up(&mut self.output, self.previous_height)?;
        ansi::cursor_column_zero(&mut self.output)?;
        ansi::erase_down(&mut self.output)
    }

    /// Rows above the cursor that belong to the last frame.
    pub fn previous_height(&self) -> u16 {
        self.previous_height
    }
}
