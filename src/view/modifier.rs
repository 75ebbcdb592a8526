//! Modifier chains.
//!
//! A [`Modifier`] is an ordered list of decorations applied outer to inner.
//! Order matters: each padding insets everything after it, each border or
//! background paints the bounds reached so far, and each offset moves the
//! rest of the chain and the content without changing the layout size.
//!
//! ```ignore
//! Modifier::new()
//!     .background(Rgba::GREEN)
//!     .fill_max_height(0.5)
//!     .fill_max_width(1.0)
//!     .border(Rgba::MAGENTA)
//!     .padding(1)
//!     .border(Rgba::BLUE)
//!     .padding(1)
//! ```
//!
//! Size elements (`width`, `fill_max_*`, `aspect_ratio`, ...) are taken from
//! the first occurrence per axis; later ones are ignored, matching how an
//! outer constraint wins over an inner one.

use super::node::Handler;
use crate::types::{BorderStyle, Rect, Rgba};

/// Per-side spacing in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Edges {
    pub const ZERO: Edges = Edges::all(0);

    pub const fn all(n: u16) -> Self {
        Self {
            left: n,
            top: n,
            right: n,
            bottom: n,
        }
    }

    /// Start/top/end/bottom order, as padding is usually written.
    pub const fn new(start: u16, top: u16, end: u16, bottom: u16) -> Self {
        Self {
            left: start,
            top,
            right: end,
            bottom,
        }
    }

    pub fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }

    fn saturating_add(self, other: Edges) -> Edges {
        Edges {
            left: self.left.saturating_add(other.left),
            top: self.top.saturating_add(other.top),
            right: self.right.saturating_add(other.right),
            bottom: self.bottom.saturating_add(other.bottom),
        }
    }

    /// Shrink `rect` by these edges.
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.inset(self.left, self.top, self.right, self.bottom)
    }
}

/// Size request on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeRequest {
    Cells(u16),
    /// Fraction of the parent's size, `0.0..=1.0`.
    Fraction(f32),
}

/// One link of a modifier chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierElement {
    Padding(Edges),
    Offset { x: i16, y: i16 },
    Border { style: BorderStyle, color: Rgba },
    Background(Rgba),
    Width(SizeRequest),
    Height(SizeRequest),
    AspectRatio(f32),
    Clickable(Handler),
}

/// Ordered decoration chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modifier {
    elements: Vec<ModifierElement>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[ModifierElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn push(mut self, element: ModifierElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Append another chain after this one.
    pub fn then(mut self, other: Modifier) -> Self {
        self.elements.extend(other.elements);
        self
    }

    pub fn padding(self, all: u16) -> Self {
        self.push(ModifierElement::Padding(Edges::all(all)))
    }

    pub fn padding_each(self, start: u16, top: u16, end: u16, bottom: u16) -> Self {
        self.push(ModifierElement::Padding(Edges::new(start, top, end, bottom)))
    }

    pub fn offset(self, x: i16, y: i16) -> Self {
        self.push(ModifierElement::Offset { x, y })
    }

    /// Single-line border in `color`.
    pub fn border(self, color: Rgba) -> Self {
        self.border_style(BorderStyle::Single, color)
    }

    pub fn border_style(self, style: BorderStyle, color: Rgba) -> Self {
        self.push(ModifierElement::Border { style, color })
    }

    pub fn background(self, color: Rgba) -> Self {
        self.push(ModifierElement::Background(color))
    }

    pub fn width(self, cells: u16) -> Self {
        self.push(ModifierElement::Width(SizeRequest::Cells(cells)))
    }

    pub fn height(self, cells: u16) -> Self {
        self.push(ModifierElement::Height(SizeRequest::Cells(cells)))
    }

    pub fn size(self, width: u16, height: u16) -> Self {
        self.width(width).height(height)
    }

    pub fn fill_max_width(self, fraction: f32) -> Self {
        self.push(ModifierElement::Width(SizeRequest::Fraction(fraction.clamp(0.0, 1.0))))
    }

    pub fn fill_max_height(self, fraction: f32) -> Self {
        self.push(ModifierElement::Height(SizeRequest::Fraction(fraction.clamp(0.0, 1.0))))
    }

    pub fn fill_max_size(self) -> Self {
        self.fill_max_width(1.0).fill_max_height(1.0)
    }

    /// Width / height ratio.
    pub fn aspect_ratio(self, ratio: f32) -> Self {
        self.push(ModifierElement::AspectRatio(ratio))
    }

    pub fn clickable(self, on_click: impl Fn() + 'static) -> Self {
        self.push(ModifierElement::Clickable(Handler::new(on_click)))
    }

    pub(crate) fn clickable_handler(self, handler: Handler) -> Self {
        self.push(ModifierElement::Clickable(handler))
    }

    // =========================================================================
    // Derived values for layout
    // =========================================================================

    /// Sum of every padding in the chain.
    pub fn total_padding(&self) -> Edges {
        self.elements.iter().fold(Edges::ZERO, |acc, element| match element {
            ModifierElement::Padding(edges) => acc.saturating_add(*edges),
            _ => acc,
        })
    }

    /// Sum of every offset in the chain.
    pub fn total_offset(&self) -> (i32, i32) {
        self.elements.iter().fold((0, 0), |(x, y), element| match element {
            ModifierElement::Offset { x: dx, y: dy } => (x + *dx as i32, y + *dy as i32),
            _ => (x, y),
        })
    }

    pub fn width_request(&self) -> Option<SizeRequest> {
        self.elements.iter().find_map(|element| match element {
            ModifierElement::Width(request) => Some(*request),
            _ => None,
        })
    }

    pub fn height_request(&self) -> Option<SizeRequest> {
        self.elements.iter().find_map(|element| match element {
            ModifierElement::Height(request) => Some(*request),
            _ => None,
        })
    }

    pub fn aspect_ratio_request(&self) -> Option<f32> {
        self.elements.iter().find_map(|element| match element {
            ModifierElement::AspectRatio(ratio) if *ratio > 0.0 => Some(*ratio),
            _ => None,
        })
    }

    pub fn is_clickable(&self) -> bool {
        self.elements
            .iter()
            .any(|element| matches!(element, ModifierElement::Clickable(_)))
    }

    /// Bounds reached at the end of the chain, starting from `outer`.
    pub fn content_rect(&self, outer: Rect) -> Rect {
        let mut rect = outer;
        for element in &self.elements {
            match element {
                ModifierElement::Padding(edges) => rect = edges.apply(rect),
                ModifierElement::Offset { x, y } => rect = rect.translate(*x as i32, *y as i32),
                _ => {}
            }
        }
        rect
    }
}
