//! View nodes - the immutable output of a view function.
//!
//! A node is a kind (with its props), a modifier chain, an optional key and
//! children. Nodes are never edited after a view returns; each evaluation
//! builds fresh ones and the host compares them against the previous tree.

use std::fmt;
use std::rc::Rc;

use super::modifier::Modifier;
use crate::reactive::{Key, ScopeId};
use crate::types::{Attr, BorderStyle, Rgba};

// =============================================================================
// Handler
// =============================================================================

/// Event callback stored in a node.
///
/// Handlers never take part in equality: two nodes that differ only in their
/// closures compare equal, so re-creating a closure on every evaluation does
/// not count as a change.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn()>);

impl Handler {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl PartialEq for Handler {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}

// =============================================================================
// Props
// =============================================================================

/// What happens when text does not fit its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOverflow {
    #[default]
    Clip,
    Ellipsis,
}

/// Text appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// `None` inherits the terminal default.
    pub color: Option<Rgba>,
    pub attrs: Attr,
    pub max_lines: Option<u16>,
    pub overflow: TextOverflow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: None,
            attrs: Attr::NONE,
            max_lines: None,
            overflow: TextOverflow::Clip,
        }
    }
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            attrs: Attr::BOLD,
            ..Default::default()
        }
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn attrs(mut self, attrs: Attr) -> Self {
        self.attrs |= attrs;
        self
    }

    /// One line, ending with an ellipsis when cut.
    pub fn single_line_ellipsis(mut self) -> Self {
        self.max_lines = Some(1);
        self.overflow = TextOverflow::Ellipsis;
        self
    }

    pub fn max_lines(mut self, lines: u16) -> Self {
        self.max_lines = Some(lines);
        self
    }

    pub fn overflow(mut self, overflow: TextOverflow) -> Self {
        self.overflow = overflow;
        self
    }
}

/// Main-axis distribution of children in a row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    /// Fixed gap between children, packed at the start.
    SpacedBy(u16),
}

/// Cross-axis placement of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

/// Row/column layout props.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stack {
    pub arrangement: Arrangement,
    pub alignment: Alignment,
}

impl Stack {
    pub fn new(arrangement: Arrangement, alignment: Alignment) -> Self {
        Self {
            arrangement,
            alignment,
        }
    }

    pub fn spaced_by(gap: u16) -> Self {
        Self {
            arrangement: Arrangement::SpacedBy(gap),
            ..Default::default()
        }
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn arrangement(mut self, arrangement: Arrangement) -> Self {
        self.arrangement = arrangement;
        self
    }
}

/// Card frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardStyle {
    pub background: Rgba,
    pub border: BorderStyle,
    pub border_color: Rgba,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: Rgba::LIGHT_GRAY,
            border: BorderStyle::Rounded,
            border_color: Rgba::GRAY,
        }
    }
}

impl CardStyle {
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }
}

/// Clip shape for images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageShape {
    #[default]
    Rect,
    /// Corners are left unpainted.
    Circle,
}

/// Placeholder image: a glyph repeated over the image bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStyle {
    pub glyph: char,
    pub color: Rgba,
    pub shape: ImageShape,
    /// Outline drawn along the clip shape.
    pub outline: Option<Rgba>,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            glyph: '▓',
            color: Rgba::GRAY,
            shape: ImageShape::Rect,
            outline: None,
        }
    }
}

/// Props of a dialog overlay. Content lives in the node's children.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogProps {
    pub on_dismiss: Handler,
    pub background: Rgba,
}

// =============================================================================
// ViewNode
// =============================================================================

/// Node kind and its props.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Top of a resolved tree.
    Root,
    Text { content: String, style: TextStyle },
    Column(Stack),
    Row(Stack),
    /// Plain container; children are aligned on both axes.
    Box(Alignment),
    Surface { color: Rgba },
    Card(CardStyle),
    Button,
    Spacer,
    Image(ImageStyle),
    Dialog(DialogProps),
    LazyColumn(Stack),
    /// Placeholder for a child scope's output; never present after resolve.
    Scope(ScopeId),
}

impl NodeKind {
    /// Short kind name for logs and debug dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Text { .. } => "text",
            NodeKind::Column(_) => "column",
            NodeKind::Row(_) => "row",
            NodeKind::Box(_) => "box",
            NodeKind::Surface { .. } => "surface",
            NodeKind::Card(_) => "card",
            NodeKind::Button => "button",
            NodeKind::Spacer => "spacer",
            NodeKind::Image(_) => "image",
            NodeKind::Dialog(_) => "dialog",
            NodeKind::LazyColumn(_) => "lazy_column",
            NodeKind::Scope(_) => "scope",
        }
    }

    /// Kinds that draw a one-cell frame inside their modifier bounds.
    pub fn has_frame(&self) -> bool {
        matches!(self, NodeKind::Card(_) | NodeKind::Button | NodeKind::Dialog(_))
    }
}

/// Immutable view node.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub kind: NodeKind,
    pub modifier: Modifier,
    pub key: Option<Key>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            modifier: Modifier::new(),
            key: None,
            children: Vec::new(),
        }
    }

    pub fn root(children: Vec<ViewNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Root)
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ViewNode>) -> Self {
        self.children = children;
        self
    }

    /// Text content if this is a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Depth-first pre-order visit.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ViewNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Every text in the subtree, in pre-order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Some(text) = node.text() {
                out.push(text);
            }
        });
        out
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }

    /// Number of nodes in the subtree for which `pred` holds.
    pub fn count(&self, pred: impl Fn(&ViewNode) -> bool) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if pred(node) {
                n += 1;
            }
        });
        n
    }

    /// Total nodes in the subtree, self included; never zero.
    pub fn node_count(&self) -> usize {
        self.count(|_| true)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
