//! Taffy Bridge - Integration with the Taffy layout engine
//!
//! Converts node declarations and layout styles to Taffy styles, runs the
//! computation per screen, and extracts absolute areas into a
//! `ComputedLayout`.
//!
//! Children of a container without layout, and children flagged
//! `IGNORE_LAYOUT`, are absolutely positioned in Taffy so they do not take
//! part in the flow. Their final position comes from their `Align` and
//! offsets over the parent's content box.

use taffy::prelude::*;
use taffy::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems,
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection as TaffyFlexDirection,
    FlexWrap as TaffyFlexWrap, GridPlacement, JustifyContent as TaffyJustifyContent,
    LengthPercentage, Line, NodeId as TaffyNodeId, NonRepeatedTrackSizingFunction,
    Position as TaffyPosition, Rect, Size, Style, TaffyTree, TrackSizingFunction,
};

use crate::engine::{Context, Node, NodeId, StyleProp, StyleValue};
use crate::error::{EngineError, Result};
use crate::types::{Area, Dimension, ObjFlags};

use super::types::{
    ComputedLayout, FlexAlign, FlexFlow, GridAlign, GridTemplate, GridTrack, LayoutKind,
};

/// Measure context: intrinsic size of a leaf.
type Tree = TaffyTree<(i32, i32)>;

// =============================================================================
// STYLE READS
// =============================================================================

fn layout_kind(node: &Node) -> LayoutKind {
    match node.style(StyleProp::Layout) {
        StyleValue::Layout(kind) => kind,
        _ => LayoutKind::None,
    }
}

fn flex_flow(node: &Node) -> FlexFlow {
    match node.style(StyleProp::FlexFlow) {
        StyleValue::FlexFlow(flow) => flow,
        _ => FlexFlow::Row,
    }
}

fn flex_align(node: &Node, prop: StyleProp) -> FlexAlign {
    match node.style(prop) {
        StyleValue::FlexAlign(align) => align,
        _ => FlexAlign::Start,
    }
}

fn grid_align(node: &Node, prop: StyleProp) -> GridAlign {
    match node.style(prop) {
        StyleValue::GridAlign(align) => align,
        _ => GridAlign::Start,
    }
}

fn template(node: &Node, prop: StyleProp) -> GridTemplate {
    match node.style(prop) {
        StyleValue::Template(t) => t,
        _ => GridTemplate::default(),
    }
}

/// Border plus padding on each side: (left, top, right, bottom).
fn content_inset(node: &Node) -> (i32, i32, i32, i32) {
    let border = node.style_int(StyleProp::BorderWidth);
    (
        border + node.style_int(StyleProp::PadLeft),
        border + node.style_int(StyleProp::PadTop),
        border + node.style_int(StyleProp::PadRight),
        border + node.style_int(StyleProp::PadBottom),
    )
}

// =============================================================================
// CONVERSIONS
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Content => TaffyDimension::Auto,
        Dimension::Px(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flow(flow: FlexFlow) -> (TaffyFlexDirection, TaffyFlexWrap) {
    let direction = match (flow.is_column(), flow.is_reverse()) {
        (false, false) => TaffyFlexDirection::Row,
        (false, true) => TaffyFlexDirection::RowReverse,
        (true, false) => TaffyFlexDirection::Column,
        (true, true) => TaffyFlexDirection::ColumnReverse,
    };
    let wrap = if flow.is_wrap() {
        TaffyFlexWrap::Wrap
    } else {
        TaffyFlexWrap::NoWrap
    };
    (direction, wrap)
}

fn to_taffy_justify_content(align: FlexAlign) -> TaffyJustifyContent {
    match align {
        FlexAlign::Start => TaffyJustifyContent::FlexStart,
        FlexAlign::End => TaffyJustifyContent::FlexEnd,
        FlexAlign::Center => TaffyJustifyContent::Center,
        FlexAlign::SpaceEvenly => TaffyJustifyContent::SpaceEvenly,
        FlexAlign::SpaceAround => TaffyJustifyContent::SpaceAround,
        FlexAlign::SpaceBetween => TaffyJustifyContent::SpaceBetween,
    }
}

/// Cross placement of items inside their line. Items never stretch here.
fn to_taffy_align_items(align: FlexAlign) -> TaffyAlignItems {
    match align {
        FlexAlign::End => TaffyAlignItems::FlexEnd,
        FlexAlign::Center => TaffyAlignItems::Center,
        _ => TaffyAlignItems::FlexStart,
    }
}

fn to_taffy_grid_tracks(align: GridAlign) -> TaffyAlignContent {
    match align {
        GridAlign::Start => TaffyAlignContent::Start,
        GridAlign::Center => TaffyAlignContent::Center,
        GridAlign::End => TaffyAlignContent::End,
        GridAlign::Stretch => TaffyAlignContent::Stretch,
        GridAlign::SpaceEvenly => TaffyAlignContent::SpaceEvenly,
        GridAlign::SpaceAround => TaffyAlignContent::SpaceAround,
        GridAlign::SpaceBetween => TaffyAlignContent::SpaceBetween,
    }
}

fn to_taffy_cell_align(align: GridAlign) -> TaffyAlignItems {
    match align {
        GridAlign::Center => TaffyAlignItems::Center,
        GridAlign::End => TaffyAlignItems::End,
        GridAlign::Stretch => TaffyAlignItems::Stretch,
        _ => TaffyAlignItems::Start,
    }
}

fn to_taffy_track(track: GridTrack) -> TrackSizingFunction {
    TrackSizingFunction::Single(match track {
        GridTrack::Px(n) => NonRepeatedTrackSizingFunction::from_length(n as f32),
        GridTrack::Fr(x) => NonRepeatedTrackSizingFunction::from_flex(x as f32),
        GridTrack::Content => NonRepeatedTrackSizingFunction::AUTO,
    })
}

fn gap(node: &Node) -> Size<LengthPercentage> {
    Size {
        width: LengthPercentage::Length(node.style_int(StyleProp::PadColumn) as f32),
        height: LengthPercentage::Length(node.style_int(StyleProp::PadRow) as f32),
    }
}

fn layout_error(err: taffy::TaffyError) -> EngineError {
    EngineError::Layout(format!("{err:?}"))
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// How the parent places a node.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Root,
    /// Positioned by `Align` and offsets, outside the parent's flow.
    Free,
    FlexItem,
    GridItem { columns: usize, rows: usize },
}

fn placement_of(node: &Node, parent: Option<&Node>) -> Placement {
    let Some(parent) = parent else {
        return Placement::Root;
    };
    if node.flags.contains(ObjFlags::IGNORE_LAYOUT) {
        return Placement::Free;
    }
    match layout_kind(parent) {
        LayoutKind::None => Placement::Free,
        LayoutKind::Flex => Placement::FlexItem,
        LayoutKind::Grid => Placement::GridItem {
            columns: template(parent, StyleProp::GridColumnTemplate).len(),
            rows: template(parent, StyleProp::GridRowTemplate).len(),
        },
    }
}

/// Grid line placement of one axis, checked against the template length.
fn grid_line(id: NodeId, axis: &str, pos: i32, span: i32, tracks: usize) -> Result<Line<GridPlacement>> {
    if pos < 0 || span < 1 || i64::from(pos) + i64::from(span) > tracks as i64 {
        return Err(EngineError::configuration(format!(
            "node {id}: grid {axis} {pos} with span {span} is outside the {tracks} track template"
        )));
    }
    Ok(Line {
        start: GridPlacement::from_line_index((pos + 1) as i16),
        end: GridPlacement::from_span(span as u16),
    })
}

fn build_style(id: NodeId, node: &Node, placement: Placement) -> Result<Style> {
    let border = node.style_int(StyleProp::BorderWidth) as f32;

    let mut style = Style {
        display: if node.is_hidden() {
            Display::None
        } else {
            Display::Flex
        },
        size: Size {
            width: to_taffy_dimension(node.width),
            height: to_taffy_dimension(node.height),
        },
        padding: Rect {
            top: LengthPercentage::Length(node.style_int(StyleProp::PadTop) as f32),
            right: LengthPercentage::Length(node.style_int(StyleProp::PadRight) as f32),
            bottom: LengthPercentage::Length(node.style_int(StyleProp::PadBottom) as f32),
            left: LengthPercentage::Length(node.style_int(StyleProp::PadLeft) as f32),
        },
        border: Rect {
            top: LengthPercentage::Length(border),
            right: LengthPercentage::Length(border),
            bottom: LengthPercentage::Length(border),
            left: LengthPercentage::Length(border),
        },
        flex_shrink: 0.0,
        ..Default::default()
    };

    // Container side
    match layout_kind(node) {
        LayoutKind::None => {}
        LayoutKind::Flex => {
            let (direction, wrap) = to_taffy_flow(flex_flow(node));
            style.flex_direction = direction;
            style.flex_wrap = wrap;
            style.justify_content =
                Some(to_taffy_justify_content(flex_align(node, StyleProp::FlexMainPlace)));
            style.align_items =
                Some(to_taffy_align_items(flex_align(node, StyleProp::FlexCrossPlace)));
            style.align_content = Some(to_taffy_justify_content(flex_align(
                node,
                StyleProp::FlexTrackPlace,
            )));
            style.gap = gap(node);
        }
        LayoutKind::Grid => {
            if !node.is_hidden() {
                style.display = Display::Grid;
            }
            style.grid_template_columns = template(node, StyleProp::GridColumnTemplate)
                .tracks()
                .iter()
                .map(|&t| to_taffy_track(t))
                .collect();
            style.grid_template_rows = template(node, StyleProp::GridRowTemplate)
                .tracks()
                .iter()
                .map(|&t| to_taffy_track(t))
                .collect();
            style.justify_content =
                Some(to_taffy_grid_tracks(grid_align(node, StyleProp::GridColumnAlign)));
            style.align_content =
                Some(to_taffy_grid_tracks(grid_align(node, StyleProp::GridRowAlign)));
            style.gap = gap(node);
        }
    }

    // Item side
    match placement {
        Placement::Root => {}
        Placement::Free => style.position = TaffyPosition::Absolute,
        Placement::FlexItem => {
            let grow = node.style_int(StyleProp::FlexGrow);
            if grow > 0 {
                style.flex_grow = grow as f32;
                style.flex_basis = TaffyDimension::Length(0.0);
            }
        }
        Placement::GridItem { columns, rows } => {
            style.grid_column = grid_line(
                id,
                "column",
                node.style_int(StyleProp::GridCellColumnPos),
                node.style_int(StyleProp::GridCellColumnSpan),
                columns,
            )?;
            style.grid_row = grid_line(
                id,
                "row",
                node.style_int(StyleProp::GridCellRowPos),
                node.style_int(StyleProp::GridCellRowSpan),
                rows,
            )?;

            let x_align = grid_align(node, StyleProp::GridCellXAlign);
            let y_align = grid_align(node, StyleProp::GridCellYAlign);
            style.justify_self = Some(to_taffy_cell_align(x_align));
            style.align_self = Some(to_taffy_cell_align(y_align));
            if x_align == GridAlign::Stretch {
                style.size.width = TaffyDimension::Auto;
            }
            if y_align == GridAlign::Stretch {
                style.size.height = TaffyDimension::Auto;
            }
        }
    }

    Ok(style)
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Add `id` and its subtree to the Taffy tree, recording nodes in pre-order.
fn build_subtree(
    ctx: &Context,
    tree: &mut Tree,
    id: NodeId,
    parent: Option<&Node>,
    order: &mut Vec<(NodeId, TaffyNodeId)>,
) -> Result<TaffyNodeId> {
    let node = ctx.node(id)?;
    let style = build_style(id, node, placement_of(node, parent))?;

    let taffy_id = match node.content_size {
        Some(size) if node.children.is_empty() => tree.new_leaf_with_context(style, size),
        _ => tree.new_leaf(style),
    }
    .map_err(layout_error)?;
    order.push((id, taffy_id));

    for &child in &node.children {
        let child_id = build_subtree(ctx, tree, child, Some(node), order)?;
        tree.add_child(taffy_id, child_id).map_err(layout_error)?;
    }

    Ok(taffy_id)
}

/// Intrinsic size of a measured leaf.
fn measure_leaf(known: Size<Option<f32>>, content: Option<&mut (i32, i32)>) -> Size<f32> {
    match content {
        Some(&mut (w, h)) => Size {
            width: known.width.unwrap_or(w as f32),
            height: known.height.unwrap_or(h as f32),
        },
        None => Size::ZERO,
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute absolute areas for every node of every screen.
///
/// Nothing in the context is modified; the caller commits the result.
pub(crate) fn compute_layout(ctx: &Context) -> Result<ComputedLayout> {
    let mut result = ComputedLayout::new();

    for &screen in ctx.screens() {
        let mut tree: Tree = TaffyTree::new();
        let mut order = Vec::new();
        let root = build_subtree(ctx, &mut tree, screen, None, &mut order)?;

        let display = &ctx.config().display;
        let available = Size {
            width: AvailableSpace::Definite(display.width as f32),
            height: AvailableSpace::Definite(display.height as f32),
        };
        tree.compute_layout_with_measure(
            root,
            available,
            |known, _available, _node_id, context, _style| measure_leaf(known, context),
        )
        .map_err(layout_error)?;

        for (id, taffy_id) in order {
            let layout = tree.layout(taffy_id).map_err(layout_error)?;
            let node = ctx.node(id)?;
            let width = layout.size.width.round() as i32;
            let height = layout.size.height.round() as i32;

            let parent = node.parent.and_then(|p| result.get(p).zip(ctx.node(p).ok()));
            let area = match parent {
                None => Area::new(0, 0, width, height),
                Some((parent_area, parent_node)) => {
                    let (rel_x, rel_y) = match placement_of(node, Some(parent_node)) {
                        Placement::Free => {
                            let (left, top, right, bottom) = content_inset(parent_node);
                            let (ax, ay) = node.align.offset(
                                parent_area.width - left - right,
                                parent_area.height - top - bottom,
                                width,
                                height,
                            );
                            (left + ax + node.x, top + ay + node.y)
                        }
                        _ => (
                            layout.location.x.round() as i32,
                            layout.location.y.round() as i32,
                        ),
                    };
                    Area::new(parent_area.x + rel_x, parent_area.y + rel_y, width, height)
                }
            };
            result.push(id, area);
        }
    }

    Ok(result)
}
