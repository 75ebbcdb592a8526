//! Layout output.

use crate::types::Rect;

/// Computed bounds for one view node, mirroring the resolved tree.
///
/// `rect` is the node's outer box in absolute surface cells, with every
/// ancestor's offset already applied. The node's own modifier chain
/// (paddings, its own offsets) is applied by the painter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutNode {
    pub rect: Rect,
    /// Laid out on its own and centred on the surface.
    pub overlay: bool,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Node at `path` (child indices from this node).
    pub fn at(&self, path: &[usize]) -> Option<&LayoutNode> {
        let mut node = self;
        for &index in path {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Width and height covered by this node's subtree, measured from the
    /// origin. Inline rendering uses it to size the frame.
    pub fn extent(&self) -> (u16, u16) {
        let mut right = self.rect.right().max(0);
        let mut bottom = self.rect.bottom().max(0);
        for child in &self.children {
            if child.overlay {
                continue;
            }
            let (w, h) = child.extent();
            right = right.max(w as i32);
            bottom = bottom.max(h as i32);
        }
        (right.min(u16::MAX as i32) as u16, bottom.min(u16::MAX as i32) as u16)
    }
}
