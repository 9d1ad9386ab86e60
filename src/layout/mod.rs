//! Layout Module - Flex and grid placement of nodes.
//!
//! Containers choose a strategy with the `Layout` style. The declaration
//! helpers below only write styles, so layout declarations can be
//! state-selected like any other style.
//!
//! # Passes
//!
//! 1. Build a Taffy tree per screen from declarations and styles
//! 2. Compute the whole tree (nothing is committed on error)
//! 3. Commit absolute areas to every node
//! 4. Send `SizeChanged` to nodes whose size changed
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::layout::{GridAlign, LayoutKind, GRID_TEMPLATE_LAST};
//!
//! ctx.set_layout(cont, LayoutKind::Grid)?;
//! ctx.set_style_grid_column_dsc_array(cont, &[70, 70, 70, GRID_TEMPLATE_LAST], StateFlags::DEFAULT)?;
//! ctx.set_style_grid_row_dsc_array(cont, &[50, 50, 50, GRID_TEMPLATE_LAST], StateFlags::DEFAULT)?;
//! ctx.set_grid_cell(button, GridAlign::Stretch, 1, 1, GridAlign::Stretch, 2, 1)?;
//! ctx.update_layout()?;
//! ```

mod taffy_bridge;
mod types;

use std::rc::Rc;

pub use types::*;

use crate::engine::{Context, NodeId, StyleProp, StyleValue};
use crate::error::Result;
use crate::event::EventCode;
use crate::types::StateFlags;

const DEFAULT: StateFlags = StateFlags::DEFAULT;

impl Context {
    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn set_layout(&mut self, node: NodeId, kind: LayoutKind) -> Result<()> {
        self.set_style(node, StyleProp::Layout, StyleValue::Layout(kind), DEFAULT)
    }

    /// Set the flow and switch the node to flex layout.
    pub fn set_flex_flow(&mut self, node: NodeId, flow: FlexFlow) -> Result<()> {
        self.set_style(node, StyleProp::FlexFlow, StyleValue::FlexFlow(flow), DEFAULT)?;
        self.set_layout(node, LayoutKind::Flex)
    }

    /// Main axis placement of items, cross placement of items in their line,
    /// and placement of the lines themselves.
    pub fn set_flex_align(
        &mut self,
        node: NodeId,
        main_place: FlexAlign,
        cross_place: FlexAlign,
        track_place: FlexAlign,
    ) -> Result<()> {
        self.set_style(node, StyleProp::FlexMainPlace, StyleValue::FlexAlign(main_place), DEFAULT)?;
        self.set_style(node, StyleProp::FlexCrossPlace, StyleValue::FlexAlign(cross_place), DEFAULT)?;
        self.set_style(node, StyleProp::FlexTrackPlace, StyleValue::FlexAlign(track_place), DEFAULT)
    }

    /// Share of the free main-axis space the item takes. 0 disables growing.
    pub fn set_flex_grow(&mut self, node: NodeId, grow: i32) -> Result<()> {
        self.set_style(node, StyleProp::FlexGrow, StyleValue::Int(grow), DEFAULT)
    }

    /// Placement of the column and row tracks inside the grid container.
    pub fn set_grid_align(&mut self, node: NodeId, column_align: GridAlign, row_align: GridAlign) -> Result<()> {
        self.set_style(node, StyleProp::GridColumnAlign, StyleValue::GridAlign(column_align), DEFAULT)?;
        self.set_style(node, StyleProp::GridRowAlign, StyleValue::GridAlign(row_align), DEFAULT)
    }

    /// Place a grid item. Positions are 0-based track indices.
    ///
    /// The cell is only checked against the templates during layout.
    #[allow(clippy::too_many_arguments)]
    pub fn set_grid_cell(
        &mut self,
        node: NodeId,
        column_align: GridAlign,
        column: i32,
        column_span: i32,
        row_align: GridAlign,
        row: i32,
        row_span: i32,
    ) -> Result<()> {
        self.set_style(node, StyleProp::GridCellXAlign, StyleValue::GridAlign(column_align), DEFAULT)?;
        self.set_style(node, StyleProp::GridCellColumnPos, StyleValue::Int(column), DEFAULT)?;
        self.set_style(node, StyleProp::GridCellColumnSpan, StyleValue::Int(column_span), DEFAULT)?;
        self.set_style(node, StyleProp::GridCellYAlign, StyleValue::GridAlign(row_align), DEFAULT)?;
        self.set_style(node, StyleProp::GridCellRowPos, StyleValue::Int(row), DEFAULT)?;
        self.set_style(node, StyleProp::GridCellRowSpan, StyleValue::Int(row_span), DEFAULT)
    }

    /// Column tracks from a descriptor array ending in [`GRID_TEMPLATE_LAST`].
    pub fn set_style_grid_column_dsc_array(
        &mut self,
        node: NodeId,
        dsc: &[i32],
        selector: StateFlags,
    ) -> Result<()> {
        let template = GridTemplate::from_descriptor(dsc)?;
        self.set_style(node, StyleProp::GridColumnTemplate, StyleValue::Template(template), selector)
    }

    /// Row tracks from a descriptor array ending in [`GRID_TEMPLATE_LAST`].
    pub fn set_style_grid_row_dsc_array(
        &mut self,
        node: NodeId,
        dsc: &[i32],
        selector: StateFlags,
    ) -> Result<()> {
        let template = GridTemplate::from_descriptor(dsc)?;
        self.set_style(node, StyleProp::GridRowTemplate, StyleValue::Template(template), selector)
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Compute areas for the current tree without committing them.
    pub fn compute_layout(&self) -> Result<ComputedLayout> {
        taffy_bridge::compute_layout(self)
    }

    /// Recompute if anything changed since the last pass.
    ///
    /// Returns whether a pass ran.
    pub fn update_layout(&mut self) -> Result<bool> {
        if !self.layout_dirty {
            return Ok(false);
        }
        self.force_layout()?;
        Ok(true)
    }

    /// Recompute and commit the layout of every screen.
    pub fn force_layout(&mut self) -> Result<()> {
        let computed = self.compute_layout()?;

        let mut resized = Vec::new();
        for &(id, area) in computed.iter() {
            if let Some(node) = self.nodes.get_mut(id) {
                let previous = node.coords;
                node.coords = area;
                if !previous.same_size(&area) {
                    resized.push((id, previous));
                }
            }
        }
        self.layout_dirty = false;

        tracing::debug!(
            nodes = computed.len(),
            resized = resized.len(),
            "layout committed"
        );

        // Every resized node is notified; the first handler error is
        // reported afterwards.
        let mut first_error = None;
        for (id, previous) in resized {
            if self.is_alive(id) {
                if let Err(e) = self.send_event(id, EventCode::SizeChanged, Some(Rc::new(previous))) {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::event::Event;
    use crate::types::{Align, Area, ObjFlags};
    use std::cell::RefCell;

    fn grid_container(ctx: &mut Context) -> NodeId {
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 300, 220).unwrap();
        ctx.set_layout(cont, LayoutKind::Grid).unwrap();
        ctx.set_style_grid_column_dsc_array(cont, &[70, 70, 70, GRID_TEMPLATE_LAST], DEFAULT)
            .unwrap();
        ctx.set_style_grid_row_dsc_array(cont, &[50, 50, 50, GRID_TEMPLATE_LAST], DEFAULT)
            .unwrap();
        cont
    }

    #[test]
    fn test_grid_cell_box() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_grid_cell(item, GridAlign::Stretch, 1, 1, GridAlign::Stretch, 2, 1)
            .unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(70, 100, 70, 50));
    }

    #[test]
    fn test_grid_span_changes_one_axis() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_grid_cell(item, GridAlign::Stretch, 1, 2, GridAlign::Stretch, 2, 1)
            .unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(70, 100, 140, 50));
    }

    #[test]
    fn test_grid_cell_align_keeps_declared_size() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_size(item, 20, 10).unwrap();
        ctx.set_grid_cell(item, GridAlign::End, 0, 1, GridAlign::Center, 0, 1)
            .unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(50, 20, 20, 10));
    }

    #[test]
    fn test_grid_fr_tracks_share_free_space() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 400, 100).unwrap();
        ctx.set_layout(cont, LayoutKind::Grid).unwrap();
        ctx.set_style_grid_column_dsc_array(
            cont,
            &[100, grid_fr(1), grid_fr(2), GRID_TEMPLATE_LAST],
            DEFAULT,
        )
        .unwrap();
        ctx.set_style_grid_row_dsc_array(cont, &[grid_fr(1), GRID_TEMPLATE_LAST], DEFAULT)
            .unwrap();

        let mut cells = Vec::new();
        for col in 0..3 {
            let item = ctx.create_child(cont).unwrap();
            ctx.set_grid_cell(item, GridAlign::Stretch, col, 1, GridAlign::Stretch, 0, 1)
                .unwrap();
            cells.push(item);
        }
        ctx.update_layout().unwrap();

        let widths: Vec<i32> = cells
            .iter()
            .map(|&c| ctx.coords(c).unwrap().width)
            .collect();
        assert_eq!(widths, vec![100, 100, 200]);
        assert_eq!(ctx.coords(cells[0]).unwrap().height, 100);
    }

    #[test]
    fn test_grid_cell_out_of_range() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_grid_cell(item, GridAlign::Stretch, 2, 2, GridAlign::Stretch, 0, 1)
            .unwrap();

        let before = ctx.coords(item).unwrap();
        let err = ctx.update_layout().unwrap_err();

        assert!(matches!(err, EngineError::Configuration(_)));
        assert_eq!(ctx.coords(item).unwrap(), before);
        assert!(ctx.is_layout_dirty());
    }

    #[test]
    fn test_grid_zero_span_rejected() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_grid_cell(item, GridAlign::Start, 0, 0, GridAlign::Start, 0, 1)
            .unwrap();

        assert!(matches!(ctx.update_layout(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_missing_sentinel_rejected() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        assert!(matches!(
            ctx.set_style_grid_column_dsc_array(screen, &[70, 70], DEFAULT),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_containers() {
        let mut ctx = Context::default();
        let grid = grid_container(&mut ctx);
        let screen = ctx.screen_active().unwrap();
        let flex = ctx.create_child(screen).unwrap();
        ctx.set_layout(flex, LayoutKind::Flex).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.coords(grid).unwrap(), Area::new(0, 0, 300, 220));
        assert_eq!(ctx.coords(flex).unwrap().width, 0);
    }

    #[test]
    fn test_flex_row_wrap_counts_per_row() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_width(cont, 290).unwrap();
        ctx.set_layout(cont, LayoutKind::Flex).unwrap();
        ctx.set_flex_flow(cont, FlexFlow::RowWrap).unwrap();

        let items: Vec<NodeId> = (0..30)
            .map(|_| {
                let item = ctx.create_child(cont).unwrap();
                ctx.set_size(item, 70, 40).unwrap();
                item
            })
            .collect();
        ctx.update_layout().unwrap();

        let first_row = ctx.coords(items[0]).unwrap().y;
        let in_first_row = items
            .iter()
            .filter(|&&i| ctx.coords(i).unwrap().y == first_row)
            .count();
        assert_eq!(in_first_row, 4);
        assert_eq!(ctx.relative_coords(items[4]).unwrap(), Area::new(0, 40, 70, 40));
        // 8 lines of 40, content sized
        assert_eq!(ctx.coords(cont).unwrap().height, 320);
    }

    #[test]
    fn test_flex_gap_and_grow() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 300, 50).unwrap();
        ctx.set_layout(cont, LayoutKind::Flex).unwrap();
        ctx.set_style_pad_column(cont, 10, DEFAULT).unwrap();

        let fixed = ctx.create_child(cont).unwrap();
        ctx.set_size(fixed, 50, 20).unwrap();
        let grow = ctx.create_child(cont).unwrap();
        ctx.set_height(grow, 20).unwrap();
        ctx.set_flex_grow(grow, 1).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(grow).unwrap(), Area::new(60, 0, 240, 20));
    }

    #[test]
    fn test_flex_center_alignment() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 100, 100).unwrap();
        ctx.set_layout(cont, LayoutKind::Flex).unwrap();
        ctx.set_flex_flow(cont, FlexFlow::Column).unwrap();
        ctx.set_flex_align(cont, FlexAlign::Center, FlexAlign::Center, FlexAlign::Start)
            .unwrap();
        let item = ctx.create_child(cont).unwrap();
        ctx.set_size(item, 20, 40).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(40, 30, 20, 40));
    }

    #[test]
    fn test_hidden_and_ignored_children_leave_flow() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 200, 50).unwrap();
        ctx.set_layout(cont, LayoutKind::Flex).unwrap();

        let hidden = ctx.create_child(cont).unwrap();
        ctx.set_size(hidden, 30, 30).unwrap();
        ctx.add_flag(hidden, ObjFlags::HIDDEN).unwrap();
        let floating = ctx.create_child(cont).unwrap();
        ctx.set_size(floating, 30, 30).unwrap();
        ctx.add_flag(floating, ObjFlags::IGNORE_LAYOUT).unwrap();
        ctx.set_align(floating, Align::BottomRight).unwrap();
        let visible = ctx.create_child(cont).unwrap();
        ctx.set_size(visible, 30, 30).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.coords(hidden).unwrap().width, 0);
        assert_eq!(ctx.relative_coords(visible).unwrap(), Area::new(0, 0, 30, 30));
        assert_eq!(ctx.relative_coords(floating).unwrap(), Area::new(170, 20, 30, 30));
    }

    #[test]
    fn test_align_inside_padded_parent() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_size(cont, 100, 100).unwrap();
        ctx.set_style_pad_all(cont, 10, DEFAULT).unwrap();
        ctx.set_style_border_width(cont, 2, DEFAULT).unwrap();
        let item = ctx.create_child(cont).unwrap();
        ctx.set_size(item, 20, 20).unwrap();
        ctx.align(item, Align::TopLeft, 5, 3).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(17, 15, 20, 20));

        ctx.center(item).unwrap();
        ctx.update_layout().unwrap();
        assert_eq!(ctx.relative_coords(item).unwrap(), Area::new(40, 40, 20, 20));
    }

    #[test]
    fn test_content_size_leaf() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        ctx.set_layout(cont, LayoutKind::Flex).unwrap();
        let label = ctx.create_child(cont).unwrap();
        ctx.set_content_size(label, 42, 16).unwrap();

        ctx.update_layout().unwrap();

        assert_eq!(ctx.coords(label).unwrap(), Area::new(0, 0, 42, 16));
        assert_eq!(ctx.coords(cont).unwrap(), Area::new(0, 0, 42, 16));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut ctx = Context::default();
        let cont = grid_container(&mut ctx);
        let item = ctx.create_child(cont).unwrap();
        ctx.set_grid_cell(item, GridAlign::Center, 0, 3, GridAlign::End, 1, 2)
            .unwrap();
        ctx.set_content_size(item, 33, 17).unwrap();

        let first = ctx.compute_layout().unwrap();
        ctx.force_layout().unwrap();
        let second = ctx.compute_layout().unwrap();

        assert_eq!(first, second);
        assert!(!ctx.update_layout().unwrap());
    }

    #[test]
    fn test_size_changed_carries_previous_area() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let box_ = ctx.create_child(screen).unwrap();
        ctx.set_size(box_, 10, 10).unwrap();
        ctx.update_layout().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        ctx.add_event_cb(
            box_,
            EventCode::SizeChanged,
            move |e: &mut Event, ctx: &mut Context| {
                let previous = *e.param::<Area>()?;
                seen_clone.borrow_mut().push((previous, ctx.coords(e.target())?));
                Ok(())
            },
            None,
        )
        .unwrap();

        ctx.set_pos(box_, 5, 5).unwrap();
        ctx.update_layout().unwrap();
        assert!(seen.borrow().is_empty());

        ctx.set_width(box_, 25).unwrap();
        ctx.update_layout().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![(Area::new(5, 5, 10, 10), Area::new(5, 5, 25, 10))]
        );
    }

    #[test]
    fn test_size_changed_error_still_notifies_siblings() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let a = ctx.create_child(screen).unwrap();
        let b = ctx.create_child(screen).unwrap();
        ctx.set_size(a, 10, 10).unwrap();
        ctx.set_size(b, 10, 10).unwrap();

        ctx.add_event_cb(
            a,
            EventCode::SizeChanged,
            |_: &mut Event, _: &mut Context| Err(EngineError::programming("resize rejected")),
            None,
        )
        .unwrap();
        let b_hits = Rc::new(RefCell::new(0));
        let b_hits_clone = b_hits.clone();
        ctx.add_event_cb(
            b,
            EventCode::SizeChanged,
            move |_: &mut Event, _: &mut Context| {
                *b_hits_clone.borrow_mut() += 1;
                Ok(())
            },
            None,
        )
        .unwrap();

        assert!(matches!(ctx.update_layout(), Err(EngineError::Programming(_))));
        assert_eq!(*b_hits.borrow(), 1);
        assert_eq!(ctx.coords(b).unwrap().width, 10);
        assert!(!ctx.update_layout().unwrap());
    }

    #[test]
    fn test_update_layout_skips_clean_tree() {
        let mut ctx = Context::default();
        assert!(ctx.update_layout().unwrap());
        assert!(!ctx.update_layout().unwrap());

        let screen = ctx.screen_active().unwrap();
        ctx.set_style_bg_color(screen, crate::types::Rgba::BLACK, DEFAULT)
            .unwrap();
        assert!(!ctx.update_layout().unwrap());
    }
}
