//! Layout Types
//!
//! Declaration enums for containers and items, grid templates, and the
//! output of a layout pass.

use std::collections::HashMap;

use crate::engine::NodeId;
use crate::error::{EngineError, Result};
use crate::types::Area;

// =============================================================================
// CONTAINER KINDS
// =============================================================================

/// Strategy a container uses to place its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    /// Children are placed by their own `Align` and offsets.
    #[default]
    None,
    Flex,
    Grid,
}

/// Primary axis, wrapping and direction of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexFlow {
    #[default]
    Row,
    Column,
    RowWrap,
    RowReverse,
    RowWrapReverse,
    ColumnWrap,
    ColumnReverse,
    ColumnWrapReverse,
}

impl FlexFlow {
    pub const fn is_column(&self) -> bool {
        matches!(
            self,
            Self::Column | Self::ColumnWrap | Self::ColumnReverse | Self::ColumnWrapReverse
        )
    }

    pub const fn is_wrap(&self) -> bool {
        matches!(
            self,
            Self::RowWrap | Self::RowWrapReverse | Self::ColumnWrap | Self::ColumnWrapReverse
        )
    }

    pub const fn is_reverse(&self) -> bool {
        matches!(
            self,
            Self::RowReverse
                | Self::RowWrapReverse
                | Self::ColumnReverse
                | Self::ColumnWrapReverse
        )
    }
}

/// Placement of items or tracks along a flex axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexAlign {
    #[default]
    Start,
    End,
    Center,
    SpaceEvenly,
    SpaceAround,
    SpaceBetween,
}

/// Placement of tracks in a grid, or of an item inside its cell.
///
/// The `Space*` variants only make sense for tracks; on a cell they fall back
/// to `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAlign {
    #[default]
    Start,
    Center,
    End,
    Stretch,
    SpaceEvenly,
    SpaceAround,
    SpaceBetween,
}

// =============================================================================
// GRID TEMPLATES
// =============================================================================

/// Largest coordinate value. Descriptor sentinels live just below it.
pub const COORD_MAX: i32 = (1 << 29) - 1;

/// Terminates a grid descriptor array.
pub const GRID_TEMPLATE_LAST: i32 = COORD_MAX;

/// Track sized to its largest item.
pub const GRID_CONTENT: i32 = COORD_MAX - 101;

const GRID_FR_BASE: i32 = COORD_MAX - 100;

/// Fractional track taking `x` shares of the leftover space.
pub const fn grid_fr(x: u8) -> i32 {
    GRID_FR_BASE + x as i32
}

/// Size of one grid track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTrack {
    /// Fixed size in pixels.
    Px(i32),
    /// Share of the space left after fixed and content tracks.
    Fr(u8),
    /// Size of the largest item in the track.
    Content,
}

impl GridTrack {
    fn from_descriptor(value: i32) -> Result<Self> {
        match value {
            GRID_CONTENT => Ok(Self::Content),
            v if (GRID_FR_BASE..COORD_MAX).contains(&v) => Ok(Self::Fr((v - GRID_FR_BASE) as u8)),
            v if (0..GRID_CONTENT).contains(&v) => Ok(Self::Px(v)),
            v => Err(EngineError::configuration(format!(
                "invalid grid track descriptor {v}"
            ))),
        }
    }
}

/// Ordered column or row tracks of a grid container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridTemplate(Vec<GridTrack>);

impl GridTemplate {
    pub fn new(tracks: Vec<GridTrack>) -> Self {
        Self(tracks)
    }

    /// Parse a descriptor array terminated by [`GRID_TEMPLATE_LAST`].
    ///
    /// Values after the sentinel are ignored. A missing sentinel is a
    /// configuration error.
    pub fn from_descriptor(dsc: &[i32]) -> Result<Self> {
        let end = dsc
            .iter()
            .position(|&v| v == GRID_TEMPLATE_LAST)
            .ok_or_else(|| {
                EngineError::configuration("grid descriptor is missing GRID_TEMPLATE_LAST")
            })?;

        dsc[..end]
            .iter()
            .map(|&v| GridTrack::from_descriptor(v))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn tracks(&self) -> &[GridTrack] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Result of one layout pass: absolute areas in tree pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    areas: Vec<(NodeId, Area)>,
    index: HashMap<NodeId, usize>,
}

impl ComputedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: NodeId, area: Area) {
        self.index.insert(id, self.areas.len());
        self.areas.push((id, area));
    }

    /// Area computed for `id`, if it was part of the pass.
    pub fn get(&self, id: NodeId) -> Option<Area> {
        self.index.get(&id).map(|&i| self.areas[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NodeId, Area)> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
