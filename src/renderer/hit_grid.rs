//! Coordinate to click target lookup.

use crate::types::ClipRect;

const EMPTY: usize = usize::MAX;

/// One slot per surface cell holding the index of the click target painted
/// there last, so later (topmost) regions win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Point every cell of `area` at target `index`. Cells outside the grid
    /// are ignored.
    pub fn fill_rect(&mut self, area: ClipRect, index: usize) {
        self.fill(area, index);
    }

    /// Remove targets under `area`; used where an overlay hides what is
    /// beneath it.
    pub fn erase_rect(&mut self, area: ClipRect) {
        self.fill(area, EMPTY);
    }

    fn fill(&mut self, area: ClipRect, value: usize) {
        let x_end = area.x.saturating_add(area.width).min(self.width);
        let y_end = area.y.saturating_add(area.height).min(self.height);
        for y in area.y..y_end {
            let row = y as usize * self.width as usize;
            for x in area.x..x_end {
                self.cells[row + x as usize] = value;
            }
        }
    }

    /// Target index at a position.
    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.cells[y as usize * self.width as usize + x as usize] {
            EMPTY => None,
            index => Some(index),
        }
    }
}
