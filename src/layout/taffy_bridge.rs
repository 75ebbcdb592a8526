//! Taffy Bridge - resolved view tree to taffy and back.
//!
//! Every view node becomes one taffy node. Modifier chains contribute their
//! total padding and their first size request per axis; framed kinds (card,
//! button, dialog) add one cell of padding on each side for the frame.
//! Borders from modifiers never take space.
//!
//! Dialog nodes are not attached to their parent. Each is laid out as its
//! own root, at a width derived from the surface, and centred.

use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, JustifyContent,
    LengthPercentage, NodeId, Rect as TaffyRect, Size, Style, TaffyError, TaffyTree,
};
use tracing::trace;

use super::text_measure::{max_line_width, min_content_width, string_width, text_lines};
use super::types::LayoutNode;
use crate::types::Rect;
use crate::view::{
    Alignment, Arrangement, Modifier, NodeKind, SizeRequest, Stack, TextStyle, ViewNode,
};

/// Measure context attached to text leaves.
#[derive(Debug, Clone)]
struct TextContext {
    content: String,
    style: TextStyle,
}

/// Taffy ids mirroring the view tree.
struct Built {
    id: NodeId,
    overlay: bool,
    children: Vec<Built>,
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn to_dimension(request: Option<SizeRequest>) -> Dimension {
    match request {
        None => Dimension::Auto,
        Some(SizeRequest::Cells(n)) => Dimension::Length(n as f32),
        Some(SizeRequest::Fraction(f)) => Dimension::Percent(f),
    }
}

fn to_align_items(alignment: Alignment) -> AlignItems {
    match alignment {
        Alignment::Start => AlignItems::FlexStart,
        Alignment::Center => AlignItems::Center,
        Alignment::End => AlignItems::FlexEnd,
    }
}

fn to_justify(arrangement: Arrangement) -> (JustifyContent, f32) {
    match arrangement {
        Arrangement::Start => (JustifyContent::FlexStart, 0.0),
        Arrangement::Center => (JustifyContent::Center, 0.0),
        Arrangement::End => (JustifyContent::FlexEnd, 0.0),
        Arrangement::SpaceBetween => (JustifyContent::SpaceBetween, 0.0),
        Arrangement::SpaceAround => (JustifyContent::SpaceAround, 0.0),
        Arrangement::SpaceEvenly => (JustifyContent::SpaceEvenly, 0.0),
        Arrangement::SpacedBy(gap) => (JustifyContent::FlexStart, gap as f32),
    }
}

fn stack_style(style: &mut Style, direction: FlexDirection, stack: Stack) {
    let (justify, gap) = to_justify(stack.arrangement);
    style.flex_direction = direction;
    style.justify_content = Some(justify);
    style.align_items = Some(to_align_items(stack.alignment));
    let gap = LengthPercentage::Length(gap);
    style.gap = match direction {
        FlexDirection::Row | FlexDirection::RowReverse => Size {
            width: gap,
            height: LengthPercentage::Length(0.0),
        },
        _ => Size {
            width: LengthPercentage::Length(0.0),
            height: gap,
        },
    };
}

fn padding_for(modifier: &Modifier, frame: bool) -> TaffyRect<LengthPercentage> {
    let edges = modifier.total_padding();
    let extra = if frame { 1.0 } else { 0.0 };
    TaffyRect {
        left: LengthPercentage::Length(edges.left as f32 + extra),
        right: LengthPercentage::Length(edges.right as f32 + extra),
        top: LengthPercentage::Length(edges.top as f32 + extra),
        bottom: LengthPercentage::Length(edges.bottom as f32 + extra),
    }
}

/// Width given to dialogs on a surface `surface_width` cells wide.
pub fn dialog_width(surface_width: u16) -> u16 {
    let wanted = (surface_width as u32 * 4 / 5) as u16;
    wanted.clamp(1.min(surface_width), 60)
}

/// Build the taffy style for one node.
fn build_style(node: &ViewNode, surface: (u16, u16), constrain_height: bool) -> Style {
    let modifier = &node.modifier;
    let mut style = Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        align_items: Some(AlignItems::FlexStart),
        padding: padding_for(modifier, node.kind.has_frame()),
        size: Size {
            width: to_dimension(modifier.width_request()),
            height: to_dimension(modifier.height_request()),
        },
        aspect_ratio: modifier.aspect_ratio_request(),
        ..Default::default()
    };

    match &node.kind {
        NodeKind::Root => {
            style.size.width = Dimension::Length(surface.0 as f32);
            style.size.height = if constrain_height {
                Dimension::Length(surface.1 as f32)
            } else {
                Dimension::Auto
            };
        }
        NodeKind::Column(stack) | NodeKind::LazyColumn(stack) => {
            stack_style(&mut style, FlexDirection::Column, *stack);
        }
        NodeKind::Row(stack) => {
            stack_style(&mut style, FlexDirection::Row, *stack);
        }
        NodeKind::Box(alignment) => {
            style.align_items = Some(to_align_items(*alignment));
            style.justify_content = Some(match alignment {
                Alignment::Start => JustifyContent::FlexStart,
                Alignment::Center => JustifyContent::Center,
                Alignment::End => JustifyContent::FlexEnd,
            });
        }
        NodeKind::Spacer => {
            style.flex_shrink = 0.0;
        }
        NodeKind::Image(_) => {
            style.flex_shrink = 0.0;
            if modifier.width_request().is_none() {
                style.size.width = Dimension::Length(2.0);
            }
            if modifier.height_request().is_none() {
                style.size.height = Dimension::Length(1.0);
            }
        }
        NodeKind::Dialog(_) => {
            style.size.width = Dimension::Length(dialog_width(surface.0) as f32);
        }
        NodeKind::Text { .. }
        | NodeKind::Surface { .. }
        | NodeKind::Card(_)
        | NodeKind::Button
        | NodeKind::Scope(_) => {}
    }

    style
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_text(
    context: &TextContext,
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
) -> Size<f32> {
    if context.content.is_empty() {
        return Size::ZERO;
    }

    let wrap_width = match known.width {
        Some(w) => w.max(0.0) as u16,
        None => match available.width {
            AvailableSpace::Definite(w) => (w.max(0.0) as u16).min(max_line_width(&context.content)),
            AvailableSpace::MinContent => min_content_width(&context.content),
            AvailableSpace::MaxContent => max_line_width(&context.content),
        },
    };

    let lines = text_lines(&context.content, wrap_width.max(1), &context.style);
    let width = lines.iter().map(|line| string_width(line)).max().unwrap_or(0);

    Size {
        width: known.width.unwrap_or(width as f32),
        height: known.height.unwrap_or(lines.len() as f32),
    }
}

fn measure(
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
    _node: NodeId,
    context: Option<&mut TextContext>,
    _style: &Style,
) -> Size<f32> {
    match context {
        Some(context) => measure_text(context, known, available),
        None => Size::ZERO,
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn build(
    tree: &mut TaffyTree<TextContext>,
    node: &ViewNode,
    surface: (u16, u16),
    constrain_height: bool,
) -> Result<Built, TaffyError> {
    let style = build_style(node, surface, constrain_height);

    if let NodeKind::Text { content, style: text_style } = &node.kind {
        let id = tree.new_leaf_with_context(
            style,
            TextContext {
                content: content.clone(),
                style: text_style.clone(),
            },
        )?;
        return Ok(Built {
            id,
            overlay: false,
            children: Vec::new(),
        });
    }

    let children = node
        .children
        .iter()
        .map(|child| build(tree, child, surface, constrain_height))
        .collect::<Result<Vec<_>, _>>()?;
    let attached: Vec<NodeId> = children
        .iter()
        .filter(|child| !child.overlay)
        .map(|child| child.id)
        .collect();

    let id = tree.new_with_children(style, &attached)?;
    Ok(Built {
        id,
        overlay: matches!(node.kind, NodeKind::Dialog(_)),
        children,
    })
}

fn extract(
    tree: &mut TaffyTree<TextContext>,
    built: &Built,
    node: &ViewNode,
    origin: (i32, i32),
    surface: (u16, u16),
) -> Result<LayoutNode, TaffyError> {
    let layout = *tree.layout(built.id)?;
    let rect = Rect::new(
        origin.0 + layout.location.x.round() as i32,
        origin.1 + layout.location.y.round() as i32,
        layout.size.width.round().max(0.0) as u16,
        layout.size.height.round().max(0.0) as u16,
    );

    let (dx, dy) = node.modifier.total_offset();
    let child_origin = (rect.x + dx, rect.y + dy);

    let mut children = Vec::with_capacity(built.children.len());
    for (child_built, child_node) in built.children.iter().zip(&node.children) {
        let child = if child_built.overlay {
            layout_overlay(tree, child_built, child_node, surface)?
        } else {
            extract(tree, child_built, child_node, child_origin, surface)?
        };
        children.push(child);
    }

    Ok(LayoutNode {
        rect,
        overlay: false,
        children,
    })
}

fn layout_overlay(
    tree: &mut TaffyTree<TextContext>,
    built: &Built,
    node: &ViewNode,
    surface: (u16, u16),
) -> Result<LayoutNode, TaffyError> {
    let available = Size {
        width: AvailableSpace::Definite(surface.0 as f32),
        height: AvailableSpace::MaxContent,
    };
    tree.compute_layout_with_measure(built.id, available, measure)?;
    let size = tree.layout(built.id)?.size;

    let x = (surface.0 as i32 - size.width.round() as i32).max(0) / 2;
    let y = (surface.1 as i32 - size.height.round() as i32).max(0) / 2;

    let mut laid = extract(tree, built, node, (x, y), surface)?;
    laid.overlay = true;
    trace!(x, y, width = laid.rect.width, height = laid.rect.height, "overlay placed");
    Ok(laid)
}

/// Lay out a resolved tree on a `width` x `height` surface.
///
/// With `constrain_height` false the root grows to its content (inline
/// rendering); otherwise it is exactly the surface.
pub fn compute_layout(
    root: &ViewNode,
    width: u16,
    height: u16,
    constrain_height: bool,
) -> Result<LayoutNode, TaffyError> {
    let surface = (width, height);
    let mut tree: TaffyTree<TextContext> = TaffyTree::new();
    let built = build(&mut tree, root, surface, constrain_height)?;

    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: if constrain_height {
            AvailableSpace::Definite(height as f32)
        } else {
            AvailableSpace::MaxContent
        },
    };
    tree.compute_layout_with_measure(built.id, available, measure)?;

    extract(&mut tree, &built, root, (0, 0), surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;
    use crate::view::{CardStyle, DialogProps, Handler};

    fn text(content: &str) -> ViewNode {
        ViewNode::new(NodeKind::Text {
            content: content.into(),
            style: TextStyle::default(),
        })
    }

    fn column(stack: Stack, modifier: Modifier, children: Vec<ViewNode>) -> ViewNode {
        ViewNode::new(NodeKind::Column(stack))
            .with_modifier(modifier)
            .with_children(children)
    }

    #[test]
    fn test_sized_box_fills_width() {
        let root = ViewNode::root(vec![ViewNode::new(NodeKind::Box(Alignment::Start))
            .with_modifier(Modifier::new().height(5).fill_max_width(1.0).background(Rgba::BLUE))]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        assert_eq!(layout.rect, Rect::new(0, 0, 40, 20));
        assert_eq!(layout.children[0].rect, Rect::new(0, 0, 40, 5));
    }

    #[test]
    fn test_column_stacks_and_spacer_takes_height() {
        let root = ViewNode::root(vec![column(
            Stack::default(),
            Modifier::new(),
            vec![
                text("Hello"),
                ViewNode::new(NodeKind::Spacer).with_modifier(Modifier::new().height(3)),
                text("World"),
            ],
        )]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        let column = &layout.children[0];
        assert_eq!(column.children[0].rect, Rect::new(0, 0, 5, 1));
        assert_eq!(column.children[1].rect.y, 1);
        assert_eq!(column.children[2].rect, Rect::new(0, 4, 5, 1));
    }

    #[test]
    fn test_padding_insets_children_but_border_does_not() {
        let root = ViewNode::root(vec![column(
            Stack::default(),
            Modifier::new().border(Rgba::RED).padding(2).border(Rgba::BLUE),
            vec![text("x")],
        )]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        let column = &layout.children[0];
        assert_eq!(column.rect.width, 5);
        assert_eq!(column.children[0].rect, Rect::new(2, 2, 1, 1));
    }

    #[test]
    fn test_offset_moves_children_not_size() {
        let root = ViewNode::root(vec![column(
            Stack::default(),
            Modifier::new().offset(3, 1),
            vec![text("abc")],
        )]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        let column = &layout.children[0];
        assert_eq!(column.rect, Rect::new(0, 0, 3, 1));
        assert_eq!(column.children[0].rect, Rect::new(3, 1, 3, 1));
    }

    #[test]
    fn test_spaced_by_and_centered() {
        let root = ViewNode::root(vec![column(
            Stack::spaced_by(2).centered(),
            Modifier::new().width(10),
            vec![text("ab"), text("abcd")],
        )]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        let column = &layout.children[0];
        assert_eq!(column.children[0].rect, Rect::new(4, 0, 2, 1));
        assert_eq!(column.children[1].rect, Rect::new(3, 3, 4, 1));
    }

    #[test]
    fn test_text_wraps_inside_narrow_parent() {
        let root = ViewNode::root(vec![column(
            Stack::default(),
            Modifier::new().width(5),
            vec![text("hello world")],
        )]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        assert_eq!(layout.children[0].children[0].rect.height, 2);
    }

    #[test]
    fn test_card_frame_takes_one_cell() {
        let root = ViewNode::root(vec![
            ViewNode::new(NodeKind::Card(CardStyle::default())).with_children(vec![text("hi")]),
        ]);
        let layout = compute_layout(&root, 40, 20, true).unwrap();
        let card = &layout.children[0];
        assert_eq!(card.rect, Rect::new(0, 0, 4, 3));
        assert_eq!(card.children[0].rect, Rect::new(1, 1, 2, 1));
    }

    #[test]
    fn test_dialog_is_centred_overlay() {
        let dialog = ViewNode::new(NodeKind::Dialog(DialogProps {
            on_dismiss: Handler::new(|| {}),
            background: Rgba::TERMINAL_DEFAULT,
        }))
        .with_children(vec![text("hi")]);
        let root = ViewNode::root(vec![column(Stack::default(), Modifier::new(), vec![
            text("under"),
            dialog,
        ])]);
        let layout = compute_layout(&root, 40, 21, true).unwrap();
        let column = &layout.children[0];
        // The dialog does not take space in the column.
        assert_eq!(column.rect.height, 1);

        let overlay = &column.children[1];
        assert!(overlay.overlay);
        assert_eq!(overlay.rect.width, dialog_width(40));
        assert_eq!(overlay.rect.height, 3);
        assert_eq!(overlay.rect.x, (40 - 32) / 2);
        assert_eq!(overlay.rect.y, (21 - 3) / 2);
    }

    #[test]
    fn test_inline_root_grows_with_content() {
        let root = ViewNode::root(vec![text("a"), text("b")]);
        let layout = compute_layout(&root, 40, 20, false).unwrap();
        assert_eq!(layout.rect.height, 2);
        assert_eq!(layout.extent(), (40, 2));
    }

    #[test]
    fn test_dialog_width_bounds() {
        assert_eq!(dialog_width(40), 32);
        assert_eq!(dialog_width(200), 60);
        assert_eq!(dialog_width(0), 0);
    }
}
