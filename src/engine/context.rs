//! Context - The node tree and its screens.
//!
//! Replaces a global "active screen" with an explicit object. Everything the
//! engine knows lives here: the node arena, the list of screens, the layout
//! dirty bit, and the bookkeeping of in-flight event dispatches.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::{Context, EngineConfig};
//!
//! let mut ctx = Context::new(EngineConfig::default());
//! let screen = ctx.screen_active()?;
//! let cont = ctx.create_child(screen)?;
//! ctx.set_size(cont, 290, 200)?;
//! ctx.center(cont)?;
//! ```

use std::rc::Rc;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::event::EventCode;
use crate::types::{Align, Area, Dimension, ObjFlags, StateFlags};

use super::node::Node;
use super::registry::{NodeArena, NodeId};

pub struct Context {
    pub(crate) nodes: NodeArena,
    screens: Vec<NodeId>,
    active_screen: Option<NodeId>,
    config: EngineConfig,

    pub(crate) layout_dirty: bool,
    pub(crate) next_registration: u64,

    /// Current propagation node of each in-flight dispatch, outermost first.
    pub(crate) dispatch_stack: Vec<NodeId>,
    /// Nodes whose destruction waits for the outermost dispatch to finish.
    pub(crate) pending_destroy: Vec<NodeId>,
    /// Nesting depth of subtree teardown. Deferred destroys are not flushed
    /// while a teardown is still sending `Delete`.
    pub(crate) destroy_depth: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Context {
    /// Create a context with one screen, which becomes the active screen.
    pub fn new(config: EngineConfig) -> Self {
        let mut ctx = Self {
            nodes: NodeArena::new(),
            screens: Vec::new(),
            active_screen: None,
            config,
            layout_dirty: true,
            next_registration: 0,
            dispatch_stack: Vec::new(),
            pending_destroy: Vec::new(),
            destroy_depth: 0,
        };
        let screen = ctx.create_screen();
        ctx.active_screen = Some(screen);
        ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(EngineError::UseAfterFree(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(EngineError::UseAfterFree(id))
    }

    pub(crate) fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    /// Whether the handle refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live nodes, screens included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether a layout pass is needed before geometry can be trusted.
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    // =========================================================================
    // Screens
    // =========================================================================

    /// Create a new root node sized to the display.
    pub fn create_screen(&mut self) -> NodeId {
        let mut node = Node::new(None);
        node.width = Dimension::Px(self.config.display.width);
        node.height = Dimension::Px(self.config.display.height);

        let id = self.nodes.insert(node);
        self.screens.push(id);
        self.invalidate_layout();
        tracing::debug!(screen = %id, "screen created");
        id
    }

    /// The screen input is routed to.
    pub fn screen_active(&self) -> Result<NodeId> {
        self.active_screen
            .ok_or_else(|| EngineError::programming("no active screen"))
    }

    /// Make `screen` the active screen.
    pub fn load_screen(&mut self, screen: NodeId) -> Result<()> {
        if self.node(screen)?.parent.is_some() {
            return Err(EngineError::programming(format!(
                "node {screen} is not a screen"
            )));
        }
        self.active_screen = Some(screen);
        Ok(())
    }

    pub fn screens(&self) -> &[NodeId] {
        &self.screens
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Create a node as the last child of `parent`.
    ///
    /// If a `ChildCreated` handler fails, the new node is destroyed again and
    /// the handler's error is returned.
    pub fn create_child(&mut self, parent: NodeId) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.nodes.insert(Node::new(Some(parent)));
        self.node_mut(parent)?.children.push(id);
        self.invalidate_layout();

        if let Err(e) = self.send_event(parent, EventCode::ChildCreated, Some(Rc::new(id))) {
            if self.is_alive(id) {
                if let Err(cleanup) = self.destroy(id) {
                    tracing::debug!(node = %id, error = %cleanup, "rollback of failed create");
                }
            }
            return Err(e);
        }
        Ok(id)
    }

    /// Destroy a node and all of its descendants.
    ///
    /// If the node or one of its descendants is the current propagation node
    /// of an in-flight dispatch, destruction is deferred until the outermost
    /// dispatch completes. Destroying a node that is already scheduled for
    /// destruction is a no-op.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.pending_delete {
            return Ok(());
        }

        if self.is_busy(id) {
            tracing::debug!(node = %id, "deferring destroy until dispatch completes");
            self.node_mut(id)?.pending_delete = true;
            self.pending_destroy.push(id);
            return Ok(());
        }

        self.destroy_now(id)
    }

    /// True when `id` or one of its descendants is being dispatched to.
    fn is_busy(&self, id: NodeId) -> bool {
        self.dispatch_stack
            .iter()
            .any(|&current| self.is_ancestor_or_self(id, current))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Subtree of `id` in pre-order.
    pub(crate) fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub(crate) fn destroy_now(&mut self, id: NodeId) -> Result<()> {
        self.destroy_depth += 1;
        let subtree = self.collect_subtree(id);
        for &node in &subtree {
            if let Some(n) = self.nodes.get_mut(node) {
                n.pending_delete = true;
            }
        }

        // Delete handlers run on every node before anything is freed. The
        // first error is reported once the subtree is gone.
        let mut first_error = None;
        for &node in &subtree {
            if self.nodes.contains(node) {
                if let Err(e) = self.send_event(node, EventCode::Delete, None) {
                    first_error.get_or_insert(e);
                }
            }
        }

        let parent = self.nodes.get(id).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.retain(|&c| c != id);
        }

        // Dropping a node drops its registrations
        for node in &subtree {
            self.nodes.remove(*node);
        }

        self.screens.retain(|&s| s != id);
        if self.active_screen == Some(id) {
            self.active_screen = None;
        }
        self.invalidate_layout();
        self.destroy_depth -= 1;
        tracing::debug!(node = %id, freed = subtree.len(), "node destroyed");

        if let Some(p) = parent.filter(|&p| self.is_alive(p)) {
            if let Err(e) = self.send_event(p, EventCode::ChildDeleted, Some(Rc::new(id))) {
                first_error.get_or_insert(e);
            }
        }

        // Destroys requested by Delete handlers run once the subtree is gone
        if self.destroy_depth == 0 && self.dispatch_stack.is_empty() {
            if let Err(e) = self.flush_pending_destroy() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Destroy everything that was deferred during dispatch.
    pub(crate) fn flush_pending_destroy(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_destroy);
        let mut first_error = None;
        for id in pending {
            if self.is_alive(id) {
                if let Err(e) = self.destroy_now(id) {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.children.len())
    }

    /// Child at `index` in creation order.
    pub fn child(&self, id: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.children.get(index).copied())
    }

    // =========================================================================
    // Geometry declarations
    // =========================================================================

    pub fn set_size(
        &mut self,
        id: NodeId,
        width: impl Into<Dimension>,
        height: impl Into<Dimension>,
    ) -> Result<()> {
        let node = self.node_mut(id)?;
        node.width = width.into();
        node.height = height.into();
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_width(&mut self, id: NodeId, width: impl Into<Dimension>) -> Result<()> {
        self.node_mut(id)?.width = width.into();
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_height(&mut self, id: NodeId, height: impl Into<Dimension>) -> Result<()> {
        self.node_mut(id)?.height = height.into();
        self.invalidate_layout();
        Ok(())
    }

    /// Offset from the aligned position. Ignored for nodes placed by a layout.
    pub fn set_pos(&mut self, id: NodeId, x: i32, y: i32) -> Result<()> {
        let node = self.node_mut(id)?;
        node.x = x;
        node.y = y;
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_align(&mut self, id: NodeId, align: Align) -> Result<()> {
        self.node_mut(id)?.align = align;
        self.invalidate_layout();
        Ok(())
    }

    /// Set alignment and offset in one call.
    pub fn align(&mut self, id: NodeId, align: Align, x: i32, y: i32) -> Result<()> {
        let node = self.node_mut(id)?;
        node.align = align;
        node.x = x;
        node.y = y;
        self.invalidate_layout();
        Ok(())
    }

    /// Center the node in its parent's content box.
    pub fn center(&mut self, id: NodeId) -> Result<()> {
        self.align(id, Align::Center, 0, 0)
    }

    /// Intrinsic size reported for `Content` dimensions of a childless node.
    pub fn set_content_size(&mut self, id: NodeId, width: i32, height: i32) -> Result<()> {
        self.node_mut(id)?.content_size = Some((width, height));
        self.invalidate_layout();
        Ok(())
    }

    /// Absolute screen area from the last layout pass.
    pub fn coords(&self, id: NodeId) -> Result<Area> {
        Ok(self.node(id)?.coords)
    }

    /// Area relative to the parent's top-left corner.
    pub fn relative_coords(&self, id: NodeId) -> Result<Area> {
        let node = self.node(id)?;
        let area = node.coords;
        match node.parent {
            Some(parent) => {
                let origin = self.node(parent)?.coords;
                Ok(area.translate(-origin.x, -origin.y))
            }
            None => Ok(area),
        }
    }

    // =========================================================================
    // Flags and states
    // =========================================================================

    pub fn add_flag(&mut self, id: NodeId, flags: ObjFlags) -> Result<()> {
        self.node_mut(id)?.flags.insert(flags);
        if flags.intersects(ObjFlags::HIDDEN | ObjFlags::IGNORE_LAYOUT) {
            self.invalidate_layout();
        }
        Ok(())
    }

    pub fn clear_flag(&mut self, id: NodeId, flags: ObjFlags) -> Result<()> {
        self.node_mut(id)?.flags.remove(flags);
        if flags.intersects(ObjFlags::HIDDEN | ObjFlags::IGNORE_LAYOUT) {
            self.invalidate_layout();
        }
        Ok(())
    }

    pub fn has_flag(&self, id: NodeId, flags: ObjFlags) -> Result<bool> {
        Ok(self.node(id)?.flags.contains(flags))
    }

    pub fn flags(&self, id: NodeId) -> Result<ObjFlags> {
        Ok(self.node(id)?.flags)
    }

    /// Styles may depend on state, so state changes invalidate layout.
    pub fn add_state(&mut self, id: NodeId, state: StateFlags) -> Result<()> {
        self.node_mut(id)?.state.insert(state);
        self.invalidate_layout();
        Ok(())
    }

    pub fn clear_state(&mut self, id: NodeId, state: StateFlags) -> Result<()> {
        self.node_mut(id)?.state.remove(state);
        self.invalidate_layout();
        Ok(())
    }

    pub fn has_state(&self, id: NodeId, state: StateFlags) -> Result<bool> {
        Ok(self.node(id)?.state.contains(state))
    }

    pub fn state(&self, id: NodeId) -> Result<StateFlags> {
        Ok(self.node(id)?.state)
    }
}
