//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is the painted image of one frame: a grid of cells in
//! row-major order. Painting works in signed surface coordinates because
//! offsets can push content past the top-left edge; anything outside the
//! buffer or the clip is dropped.
//!
//! Wide characters occupy two cells. The second cell is a continuation
//! with `char == 0` so output stays aligned.

use crate::layout::char_width;
use crate::types::{Attr, BorderStyle, Cell, ClipRect, Rect, Rgba};

/// A 2D buffer of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer as a clip.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            ((i % width) as u16, (i / width) as u16, cell)
        })
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Visible cell at signed coordinates, honouring the clip.
    fn target(&mut self, x: i32, y: i32, clip: Option<&ClipRect>) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x > u16::MAX as i32 || y > u16::MAX as i32 {
            return None;
        }
        let (x, y) = (x as u16, y as u16);
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return None;
            }
        }
        self.get_mut(x, y)
    }

    /// Set one cell. A non-opaque background blends over what is there, so
    /// `Rgba::TRANSPARENT` keeps the existing background.
    ///
    /// Returns true if the cell was inside the buffer and clip.
    pub fn put_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        let Some(cell) = self.target(x, y, clip) else {
            return false;
        };
        cell.char = ch as u32;
        cell.fg = fg;
        cell.bg = Rgba::blend(bg, cell.bg);
        cell.attrs = attrs;
        true
    }

    /// Fill `rect` with spaces on `bg`.
    pub fn fill_rect(&mut self, rect: Rect, bg: Rgba, clip: Option<&ClipRect>) {
        let Some(mut area) = rect.visible(self.width, self.height) else {
            return;
        };
        if let Some(clip) = clip {
            match area.intersect(clip) {
                Some(inner) => area = inner,
                None => return,
            }
        }

        for row in area.y..area.y + area.height {
            let start = self.index(area.x, row);
            let end = start + area.width as usize;
            for cell in &mut self.cells[start..end] {
                cell.char = b' ' as u32;
                cell.bg = Rgba::blend(bg, cell.bg);
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw one line of text starting at (`x`, `y`). Zero-width characters
    /// are skipped.
    ///
    /// Returns the number of columns advanced.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col >= self.width as i32 {
                break;
            }
            if self.put_char(col, y, ch, fg, bg, attrs, clip) && w == 2 {
                if let Some(next) = self.target(col + 1, y, clip) {
                    next.char = 0;
                    next.fg = fg;
                    next.bg = Rgba::blend(bg, next.bg);
                    next.attrs = attrs;
                }
            }
            col += w as i32;
        }
        (col - x).clamp(0, u16::MAX as i32) as u16
    }

    /// Draw a box outline along the edge of `rect`. Interior cells are left
    /// untouched.
    pub fn draw_border(
        &mut self,
        rect: Rect,
        style: BorderStyle,
        color: Rgba,
        clip: Option<&ClipRect>,
    ) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let bg = Rgba::TRANSPARENT;
        let (x1, y1) = (rect.x, rect.y);
        let (x2, y2) = (rect.right() - 1, rect.bottom() - 1);

        self.put_char(x1, y1, tl, color, bg, Attr::NONE, clip);
        self.put_char(x2, y1, tr, color, bg, Attr::NONE, clip);
        self.put_char(x2, y2, br, color, bg, Attr::NONE, clip);
        self.put_char(x1, y2, bl, color, bg, Attr::NONE, clip);

        for col in (x1 + 1)..x2 {
            self.put_char(col, y1, horiz, color, bg, Attr::NONE, clip);
            self.put_char(col, y2, horiz, color, bg, Attr::NONE, clip);
        }
        for row in (y1 + 1)..y2 {
            self.put_char(x1, row, vert, color, bg, Attr::NONE, clip);
            self.put_char(x2, row, vert, color, bg, Attr::NONE, clip);
        }
    }

    // =========================================================================
    // Text snapshots
    // =========================================================================

    /// Characters of row `y`, trailing spaces removed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let mut line = String::with_capacity(self.width as usize);
        for x in 0..self.width {
            let cell = &self.cells[self.index(x, y)];
            if cell.char == 0 {
                continue;
            }
            line.push(char::from_u32(cell.char).unwrap_or(' '));
        }
        line.truncate(line.trim_end_matches(' ').len());
        line
    }

    /// The whole buffer as text, one line per row, trailing blank rows
    /// removed.
    pub fn to_text(&self) -> String {
        let mut rows: Vec<String> = (0..self.height).map(|y| self.row_text(y)).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buf = FrameBuffer::new(80, 24);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 24);
        assert_eq!(buf.cells().len(), 80 * 24);
        assert_eq!(buf.to_text(), "");
    }

    #[test]
    fn test_put_char_outside_is_dropped() {
        let mut buf = FrameBuffer::new(4, 2);
        assert!(!buf.put_char(-1, 0, 'x', Rgba::WHITE, Rgba::BLACK, Attr::NONE, None));
        assert!(!buf.put_char(4, 0, 'x', Rgba::WHITE, Rgba::BLACK, Attr::NONE, None));
        assert!(buf.put_char(3, 1, 'x', Rgba::WHITE, Rgba::BLACK, Attr::NONE, None));
        assert_eq!(buf.row_text(1), "   x");
    }

    #[test]
    fn test_transparent_bg_keeps_existing() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.fill_rect(Rect::new(0, 0, 3, 1), Rgba::BLUE, None);
        buf.draw_text(0, 0, "ab", Rgba::WHITE, Rgba::TRANSPARENT, Attr::NONE, None);
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(Rgba::BLUE));
        assert_eq!(buf.get(0, 0).map(|c| c.char), Some('a' as u32));
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buf = FrameBuffer::new(5, 5);
        let clip = ClipRect::new(1, 1, 2, 2);
        buf.fill_rect(Rect::new(-3, -3, 20, 20), Rgba::RED, Some(&clip));
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(Rgba::TERMINAL_DEFAULT));
        assert_eq!(buf.get(1, 1).map(|c| c.bg), Some(Rgba::RED));
        assert_eq!(buf.get(2, 2).map(|c| c.bg), Some(Rgba::RED));
        assert_eq!(buf.get(3, 3).map(|c| c.bg), Some(Rgba::TERMINAL_DEFAULT));
    }

    #[test]
    fn test_draw_text_wide_char_continuation() {
        let mut buf = FrameBuffer::new(6, 1);
        let advanced = buf.draw_text(0, 0, "한a", Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        assert_eq!(advanced, 3);
        assert_eq!(buf.get(1, 0).map(|c| c.char), Some(0));
        assert_eq!(buf.row_text(0), "한a");
    }

    #[test]
    fn test_draw_text_negative_start() {
        let mut buf = FrameBuffer::new(5, 1);
        buf.draw_text(-2, 0, "hello", Rgba::WHITE, Rgba::TRANSPARENT, Attr::NONE, None);
        assert_eq!(buf.row_text(0), "llo");
    }

    #[test]
    fn test_draw_border() {
        let mut buf = FrameBuffer::new(4, 3);
        buf.draw_border(Rect::new(0, 0, 4, 3), BorderStyle::Single, Rgba::WHITE, None);
        assert_eq!(buf.to_text(), "┌──┐\n│  │\n└──┘");
    }

    #[test]
    fn test_draw_border_too_small() {
        let mut buf = FrameBuffer::new(4, 3);
        buf.draw_border(Rect::new(0, 0, 1, 3), BorderStyle::Single, Rgba::WHITE, None);
        assert_eq!(buf.to_text(), "");
    }

    #[test]
    fn test_resize_clears() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.put_char(0, 0, 'x', Rgba::WHITE, Rgba::BLACK, Attr::NONE, None);
        buf.resize(3, 1);
        assert_eq!(buf.cells().len(), 3);
        assert_eq!(buf.to_text(), "");
    }
}
