//! Style store - Per-node style entries resolved against node state.
//!
//! Each entry is `(property, value, selector)`. The selector is a set of
//! states; an entry applies when all of its states are active on the node.
//! Among applicable entries the one with the most selector states wins, ties
//! going to the most recently set entry.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::{palette_main, Palette, StateFlags};
//!
//! ctx.set_style_bg_color(button, palette_main(Palette::Blue), StateFlags::DEFAULT)?;
//! ctx.set_style_bg_color(button, palette_main(Palette::Red), StateFlags::PRESSED)?;
//! ```

use crate::error::{EngineError, Result};
use crate::layout::{FlexAlign, FlexFlow, GridAlign, GridTemplate, LayoutKind};
use crate::types::{Rgba, StateFlags, OPA_COVER};

use super::context::Context;
use super::registry::NodeId;

// =============================================================================
// PROPERTIES
// =============================================================================

/// Style properties understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProp {
    // Appearance (consumed by the renderer)
    BgColor,
    BgOpa,

    // Box model
    BorderWidth,
    PadTop,
    PadBottom,
    PadLeft,
    PadRight,
    PadRow,
    PadColumn,

    // Container layout
    Layout,
    FlexFlow,
    FlexMainPlace,
    FlexCrossPlace,
    FlexTrackPlace,
    GridColumnTemplate,
    GridRowTemplate,
    GridColumnAlign,
    GridRowAlign,

    // Item layout
    FlexGrow,
    GridCellColumnPos,
    GridCellColumnSpan,
    GridCellXAlign,
    GridCellRowPos,
    GridCellRowSpan,
    GridCellYAlign,
}

/// Shape of a style value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Opa,
    Int,
    Layout,
    FlexFlow,
    FlexAlign,
    GridAlign,
    Template,
}

impl StyleProp {
    /// The value shape this property accepts.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::BgColor => ValueKind::Color,
            Self::BgOpa => ValueKind::Opa,
            Self::BorderWidth
            | Self::PadTop
            | Self::PadBottom
            | Self::PadLeft
            | Self::PadRight
            | Self::PadRow
            | Self::PadColumn
            | Self::FlexGrow
            | Self::GridCellColumnPos
            | Self::GridCellColumnSpan
            | Self::GridCellRowPos
            | Self::GridCellRowSpan => ValueKind::Int,
            Self::Layout => ValueKind::Layout,
            Self::FlexFlow => ValueKind::FlexFlow,
            Self::FlexMainPlace | Self::FlexCrossPlace | Self::FlexTrackPlace => {
                ValueKind::FlexAlign
            }
            Self::GridColumnTemplate | Self::GridRowTemplate => ValueKind::Template,
            Self::GridColumnAlign
            | Self::GridRowAlign
            | Self::GridCellXAlign
            | Self::GridCellYAlign => ValueKind::GridAlign,
        }
    }

    /// Value used when no entry applies.
    pub fn default_value(&self) -> StyleValue {
        match self {
            Self::BgColor => StyleValue::Color(Rgba::WHITE),
            Self::BgOpa => StyleValue::Opa(OPA_COVER),
            Self::GridCellColumnSpan | Self::GridCellRowSpan => StyleValue::Int(1),
            Self::Layout => StyleValue::Layout(LayoutKind::None),
            Self::FlexFlow => StyleValue::FlexFlow(FlexFlow::Row),
            Self::FlexMainPlace | Self::FlexCrossPlace | Self::FlexTrackPlace => {
                StyleValue::FlexAlign(FlexAlign::Start)
            }
            Self::GridColumnTemplate | Self::GridRowTemplate => {
                StyleValue::Template(GridTemplate::default())
            }
            Self::GridColumnAlign
            | Self::GridRowAlign
            | Self::GridCellXAlign
            | Self::GridCellYAlign => StyleValue::GridAlign(GridAlign::Start),
            _ => StyleValue::Int(0),
        }
    }

    /// Whether changing this property can move or resize anything.
    pub const fn affects_layout(&self) -> bool {
        !matches!(self, Self::BgColor | Self::BgOpa)
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// A typed style value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Color(Rgba),
    Opa(u8),
    Int(i32),
    Layout(LayoutKind),
    FlexFlow(FlexFlow),
    FlexAlign(FlexAlign),
    GridAlign(GridAlign),
    Template(GridTemplate),
}

impl StyleValue {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Color(_) => ValueKind::Color,
            Self::Opa(_) => ValueKind::Opa,
            Self::Int(_) => ValueKind::Int,
            Self::Layout(_) => ValueKind::Layout,
            Self::FlexFlow(_) => ValueKind::FlexFlow,
            Self::FlexAlign(_) => ValueKind::FlexAlign,
            Self::GridAlign(_) => ValueKind::GridAlign,
            Self::Template(_) => ValueKind::Template,
        }
    }
}

// =============================================================================
// STYLE LIST
// =============================================================================

#[derive(Debug, Clone)]
struct StyleEntry {
    prop: StyleProp,
    value: StyleValue,
    selector: StateFlags,
}

/// Ordered style entries of one node. Later entries are more recent.
#[derive(Debug, Clone, Default)]
pub struct StyleList {
    entries: Vec<StyleEntry>,
}

impl StyleList {
    /// Set a property under a selector, replacing an entry with the same pair.
    pub(crate) fn set(&mut self, prop: StyleProp, value: StyleValue, selector: StateFlags) {
        self.remove(prop, selector);
        self.entries.push(StyleEntry {
            prop,
            value,
            selector,
        });
    }

    pub(crate) fn remove(&mut self, prop: StyleProp, selector: StateFlags) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.prop == prop && e.selector == selector));
        self.entries.len() != before
    }

    /// Most specific applicable entry for `state`.
    pub(crate) fn resolve(&self, prop: StyleProp, state: StateFlags) -> Option<&StyleValue> {
        // max_by_key keeps the last maximum, which is the most recent entry
        self.entries
            .iter()
            .filter(|e| e.prop == prop && state.contains(e.selector))
            .max_by_key(|e| e.selector.bits().count_ones())
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// CONTEXT API
// =============================================================================

impl Context {
    /// Set a style property on `node`, applied while the node is in all
    /// states of `selector`.
    ///
    /// A value of the wrong shape for `prop` is a programming error.
    pub fn set_style(
        &mut self,
        node: NodeId,
        prop: StyleProp,
        value: StyleValue,
        selector: StateFlags,
    ) -> Result<()> {
        if prop.kind() != value.kind() {
            return Err(EngineError::programming(format!(
                "style {prop:?} expects a {:?} value, got {:?}",
                prop.kind(),
                value.kind()
            )));
        }

        self.node_mut(node)?.styles.set(prop, value, selector);
        if prop.affects_layout() {
            self.invalidate_layout();
        }
        Ok(())
    }

    /// Remove a previously set style entry. Returns whether one existed.
    pub fn remove_style(&mut self, node: NodeId, prop: StyleProp, selector: StateFlags) -> Result<bool> {
        let removed = self.node_mut(node)?.styles.remove(prop, selector);
        if removed && prop.affects_layout() {
            self.invalidate_layout();
        }
        Ok(removed)
    }

    /// Value of `prop` for the node's current state.
    pub fn style_value(&self, node: NodeId, prop: StyleProp) -> Result<StyleValue> {
        Ok(self.node(node)?.style(prop))
    }

    /// Resolved background color.
    pub fn bg_color(&self, node: NodeId) -> Result<Rgba> {
        Ok(self.node(node)?.style_color(StyleProp::BgColor))
    }

    pub fn set_style_bg_color(&mut self, node: NodeId, color: Rgba, selector: StateFlags) -> Result<()> {
        self.set_style(node, StyleProp::BgColor, StyleValue::Color(color), selector)
    }

    pub fn set_style_bg_opa(&mut self, node: NodeId, opa: u8, selector: StateFlags) -> Result<()> {
        self.set_style(node, StyleProp::BgOpa, StyleValue::Opa(opa), selector)
    }

    pub fn set_style_border_width(&mut self, node: NodeId, width: i32, selector: StateFlags) -> Result<()> {
        self.set_style(node, StyleProp::BorderWidth, StyleValue::Int(width), selector)
    }

    /// Set all four paddings.
    pub fn set_style_pad_all(&mut self, node: NodeId, pad: i32, selector: StateFlags) -> Result<()> {
        for prop in [
            StyleProp::PadTop,
            StyleProp::PadBottom,
            StyleProp::PadLeft,
            StyleProp::PadRight,
        ] {
            self.set_style(node, prop, StyleValue::Int(pad), selector)?;
        }
        Ok(())
    }

    /// Gap between rows (flex lines or grid rows).
    pub fn set_style_pad_row(&mut self, node: NodeId, pad: i32, selector: StateFlags) -> Result<()> {
        self.set_style(node, StyleProp::PadRow, StyleValue::Int(pad), selector)
    }

    /// Gap between columns (flex items in a row or grid columns).
    pub fn set_style_pad_column(&mut self, node: NodeId, pad: i32, selector: StateFlags) -> Result<()> {
        self.set_style(node, StyleProp::PadColumn, StyleValue::Int(pad), selector)
    }
}
