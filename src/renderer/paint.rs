//! Painting a laid-out view tree into a frame.
//!
//! The modifier chain is walked outer to inner with a running rectangle that
//! starts at the node's layout bounds:
//!
//! - `padding` shrinks it, `offset` moves it
//! - `background` fills it
//! - `border` is drawn along it after the node's content, so it sits on top
//! - `clickable` registers it as a click target
//!
//! The node's own content is drawn into whatever rectangle remains. Framed
//! kinds (card, button, dialog) draw their frame on that rectangle too.
//!
//! Dialog subtrees are set aside and painted after everything else, in the
//! order they were found. Each one hides the click targets beneath it.

use tracing::trace;

use super::buffer::FrameBuffer;
use super::hit_grid::HitGrid;
use crate::layout::{LayoutNode, char_width, text_lines};
use crate::types::{Attr, BorderStyle, ClipRect, Rect, Rgba};
use crate::view::{Handler, ImageShape, ImageStyle, ModifierElement, NodeKind, TextStyle, ViewNode};

/// Where an open dialog was painted and how to ask it to close.
#[derive(Debug, Clone)]
pub struct DialogRegion {
    pub rect: Rect,
    pub on_dismiss: Handler,
}

/// A painted frame with its click targets.
#[derive(Debug, Clone)]
pub struct Frame {
    buffer: FrameBuffer,
    hits: HitGrid,
    handlers: Vec<Handler>,
    dialogs: Vec<DialogRegion>,
}

impl Frame {
    /// An empty frame of the given size.
    pub fn blank(width: u16, height: u16) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height),
            hits: HitGrid::new(width, height),
            handlers: Vec::new(),
            dialogs: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Topmost click target at a cell.
    pub fn handler_at(&self, x: u16, y: u16) -> Option<&Handler> {
        self.hits.get(x, y).and_then(|index| self.handlers.get(index))
    }

    /// Dialogs in paint order; the last one is on top.
    pub fn dialogs(&self) -> &[DialogRegion] {
        &self.dialogs
    }

    pub fn topmost_dialog(&self) -> Option<&DialogRegion> {
        self.dialogs.last()
    }

    pub fn to_text(&self) -> String {
        self.buffer.to_text()
    }
}

/// Paint `tree` laid out as `layout` onto a `width` x `height` frame.
pub fn paint(tree: &ViewNode, layout: &LayoutNode, width: u16, height: u16) -> Frame {
    let mut painter = Painter {
        frame: Frame::blank(width, height),
        clip: ClipRect::new(0, 0, width, height),
        overlays: Vec::new(),
    };

    painter.node(tree, layout);

    let mut next = 0;
    while next < painter.overlays.len() {
        let (node, laid) = painter.overlays[next];
        next += 1;
        if let Some(area) = laid.rect.visible(width, height) {
            painter.frame.hits.erase_rect(area);
        }
        painter.contents(node, laid);
    }

    trace!(
        width,
        height,
        targets = painter.frame.handlers.len(),
        dialogs = painter.frame.dialogs.len(),
        "frame painted"
    );
    painter.frame
}

struct Painter<'a> {
    frame: Frame,
    clip: ClipRect,
    overlays: Vec<(&'a ViewNode, &'a LayoutNode)>,
}

impl<'a> Painter<'a> {
    fn node(&mut self, node: &'a ViewNode, layout: &'a LayoutNode) {
        if layout.overlay {
            self.overlays.push((node, layout));
            return;
        }
        self.contents(node, layout);
    }

    fn contents(&mut self, node: &'a ViewNode, layout: &'a LayoutNode) {
        let mut rect = layout.rect;
        let mut borders: Vec<(Rect, BorderStyle, Rgba)> = Vec::new();

        for element in node.modifier.elements() {
            match element {
                ModifierElement::Padding(edges) => rect = edges.apply(rect),
                ModifierElement::Offset { x, y } => rect = rect.translate(*x as i32, *y as i32),
                ModifierElement::Background(color) => self.fill(rect, *color),
                ModifierElement::Border { style, color } => borders.push((rect, *style, *color)),
                ModifierElement::Clickable(handler) => self.click_target(rect, handler),
                ModifierElement::Width(_)
                | ModifierElement::Height(_)
                | ModifierElement::AspectRatio(_) => {}
            }
        }

        match &node.kind {
            NodeKind::Text { content, style } => self.text(rect, content, style),
            NodeKind::Surface { color } => self.fill(rect, *color),
            NodeKind::Card(style) => {
                self.fill(rect, style.background);
                borders.push((rect, style.border, style.border_color));
            }
            NodeKind::Button => {
                borders.push((rect, BorderStyle::Rounded, Rgba::TERMINAL_DEFAULT));
            }
            NodeKind::Dialog(props) => {
                self.fill(rect, props.background);
                borders.push((rect, BorderStyle::Rounded, Rgba::TERMINAL_DEFAULT));
                self.frame.dialogs.push(DialogRegion {
                    rect,
                    on_dismiss: props.on_dismiss.clone(),
                });
            }
            NodeKind::Image(style) => self.image(rect, style),
            NodeKind::Root
            | NodeKind::Column(_)
            | NodeKind::Row(_)
            | NodeKind::Box(_)
            | NodeKind::Spacer
            | NodeKind::LazyColumn(_)
            | NodeKind::Scope(_) => {}
        }

        for (child, child_layout) in node.children.iter().zip(&layout.children) {
            self.node(child, child_layout);
        }

        for (rect, style, color) in borders {
            self.frame.buffer.draw_border(rect, style, color, Some(&self.clip));
        }
    }

    fn fill(&mut self, rect: Rect, color: Rgba) {
        self.frame.buffer.fill_rect(rect, color, Some(&self.clip));
    }

    fn click_target(&mut self, rect: Rect, handler: &Handler) {
        let Some(area) = rect.visible(self.frame.width(), self.frame.height()) else {
            return;
        };
        let index = self.frame.handlers.len();
        self.frame.handlers.push(handler.clone());
        self.frame.hits.fill_rect(area, index);
    }

    fn text(&mut self, rect: Rect, content: &str, style: &TextStyle) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let Some(clip) = rect.visible(self.frame.width(), self.frame.height()) else {
            return;
        };

        let fg = style.color.unwrap_or(Rgba::TERMINAL_DEFAULT);
        let lines = text_lines(content, rect.width, style);
        for (row, line) in lines.iter().take(rect.height as usize).enumerate() {
            self.frame.buffer.draw_text(
                rect.x,
                rect.y + row as i32,
                line,
                fg,
                Rgba::TRANSPARENT,
                style.attrs,
                Some(&clip),
            );
        }
    }

    fn image(&mut self, rect: Rect, style: &ImageStyle) {
        let area = if style.outline.is_some() {
            rect.inset(1, 1, 1, 1)
        } else {
            rect
        };
        let step = char_width(style.glyph).max(1);
        let cut_corners =
            style.shape == ImageShape::Circle && style.outline.is_none() && area.width >= 2 && area.height >= 2;

        for row in 0..area.height {
            let mut col = 0;
            while col + step <= area.width {
                let corner = (row == 0 || row + 1 == area.height)
                    && (col == 0 || col + step >= area.width);
                if !(cut_corners && corner) {
                    let mut glyph = [0u8; 4];
                    self.frame.buffer.draw_text(
                        area.x + col as i32,
                        area.y + row as i32,
                        style.glyph.encode_utf8(&mut glyph),
                        style.color,
                        Rgba::TRANSPARENT,
                        Attr::NONE,
                        Some(&self.clip),
                    );
                }
                col += step;
            }
        }

        if let Some(color) = style.outline {
            let border = match style.shape {
                ImageShape::Circle => BorderStyle::Rounded,
                ImageShape::Rect => BorderStyle::Single,
            };
            self.frame.buffer.draw_border(rect, border, color, Some(&self.clip));
        }
    }
}
