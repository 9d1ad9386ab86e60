//! Node - A visual element in the tree.
//!
//! A node owns its children (by handle), its style entries, and its event
//! registrations. The parent handle is a back-reference only; it never keeps
//! the parent alive.

use crate::event::Registration;
use crate::types::{Align, Area, Dimension, ObjFlags, Rgba, StateFlags};

use super::registry::NodeId;
use super::style::{StyleList, StyleProp, StyleValue};

pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    // Declared geometry
    pub(crate) width: Dimension,
    pub(crate) height: Dimension,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) align: Align,
    /// Intrinsic size used when a dimension is `Content` and there are no children.
    pub(crate) content_size: Option<(i32, i32)>,

    pub(crate) styles: StyleList,
    pub(crate) state: StateFlags,
    pub(crate) flags: ObjFlags,
    pub(crate) handlers: Vec<Registration>,

    /// Absolute screen coordinates from the last committed layout pass.
    pub(crate) coords: Area,

    /// Destruction was requested while the node was busy in a dispatch.
    pub(crate) pending_delete: bool,
}

impl Node {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            width: Dimension::Content,
            height: Dimension::Content,
            x: 0,
            y: 0,
            align: Align::TopLeft,
            content_size: None,
            styles: StyleList::default(),
            state: StateFlags::DEFAULT,
            flags: ObjFlags::CLICKABLE,
            handlers: Vec::new(),
            coords: Area::default(),
            pending_delete: false,
        }
    }

    // =========================================================================
    // Resolved style reads (against the current state)
    // =========================================================================

    pub(crate) fn style(&self, prop: StyleProp) -> StyleValue {
        self.styles
            .resolve(prop, self.state)
            .cloned()
            .unwrap_or_else(|| prop.default_value())
    }

    pub(crate) fn style_int(&self, prop: StyleProp) -> i32 {
        match self.style(prop) {
            StyleValue::Int(v) => v,
            _ => 0,
        }
    }

    pub(crate) fn style_color(&self, prop: StyleProp) -> Rgba {
        match self.style(prop) {
            StyleValue::Color(c) => c,
            _ => Rgba::TRANSPARENT,
        }
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.flags.contains(ObjFlags::HIDDEN)
    }
}
