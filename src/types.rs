//! Core types for spark-ui.
//!
//! Colors, geometry, and the state/behavior bitsets every node carries.
//! Layout and event vocabularies live with their modules.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque color from a packed `0xRRGGBB` integer.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        )
    }

    /// Parse `#rrggbb`, `#rgb`, or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            8 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
                channel(hex.get(6..8)?)?,
            )),
            _ => None,
        }
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

/// Fully transparent opacity.
pub const OPA_TRANSP: u8 = 0;
/// Fully opaque opacity.
pub const OPA_COVER: u8 = 255;

/// Material palette used by the default look of widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Red,
    Pink,
    Purple,
    DeepPurple,
    Indigo,
    Blue,
    LightBlue,
    Cyan,
    Teal,
    Green,
    LightGreen,
    Lime,
    Yellow,
    Amber,
    Orange,
    DeepOrange,
    Brown,
    BlueGrey,
    Grey,
}

/// Main shade of a palette color.
pub const fn palette_main(palette: Palette) -> Rgba {
    Rgba::from_rgb_int(match palette {
        Palette::Red => 0xF44336,
        Palette::Pink => 0xE91E63,
        Palette::Purple => 0x9C27B0,
        Palette::DeepPurple => 0x673AB7,
        Palette::Indigo => 0x3F51B5,
        Palette::Blue => 0x2196F3,
        Palette::LightBlue => 0x03A9F4,
        Palette::Cyan => 0x00BCD4,
        Palette::Teal => 0x009688,
        Palette::Green => 0x4CAF50,
        Palette::LightGreen => 0x8BC34A,
        Palette::Lime => 0xCDDC39,
        Palette::Yellow => 0xFFEB3B,
        Palette::Amber => 0xFFC107,
        Palette::Orange => 0xFF9800,
        Palette::DeepOrange => 0xFF5722,
        Palette::Brown => 0x795548,
        Palette::BlueGrey => 0x607D8B,
        Palette::Grey => 0x9E9E9E,
    })
}

// =============================================================================
// Geometry
// =============================================================================

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Check whether a point lies inside (right and bottom edges exclusive).
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Same area moved by an offset.
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub const fn same_size(&self, other: &Area) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Declared size along one axis.
///
/// ```
/// use spark_ui::types::Dimension;
///
/// let width = Dimension::Px(70);
/// let height = Dimension::Percent(100.0); // Full parent content height
/// let auto = Dimension::Content;          // Sized by children or intrinsic size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Absolute size in pixels.
    Px(i32),
    /// Percentage of the parent's content size (0-100).
    Percent(f32),
    /// Size from content.
    #[default]
    Content,
}

impl From<i32> for Dimension {
    fn from(value: i32) -> Self {
        Self::Px(value)
    }
}

/// Placement of a node relative to its parent's content box.
///
/// Only used when the parent has no layout or the node ignores layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    TopLeft,
    TopMid,
    TopRight,
    LeftMid,
    Center,
    RightMid,
    BottomLeft,
    BottomMid,
    BottomRight,
}

impl Align {
    /// Offset of a child of `child` size inside a box of `outer` size.
    pub const fn offset(&self, outer_w: i32, outer_h: i32, child_w: i32, child_h: i32) -> (i32, i32) {
        let left = 0;
        let mid_x = (outer_w - child_w) / 2;
        let right = outer_w - child_w;
        let top = 0;
        let mid_y = (outer_h - child_h) / 2;
        let bottom = outer_h - child_h;

        match self {
            Self::TopLeft => (left, top),
            Self::TopMid => (mid_x, top),
            Self::TopRight => (right, top),
            Self::LeftMid => (left, mid_y),
            Self::Center => (mid_x, mid_y),
            Self::RightMid => (right, mid_y),
            Self::BottomLeft => (left, bottom),
            Self::BottomMid => (mid_x, bottom),
            Self::BottomRight => (right, bottom),
        }
    }
}

// =============================================================================
// State and behavior flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Interaction state of a node. Also used as the selector of style entries.
    ///
    /// Combine with bitwise OR: `StateFlags::CHECKED | StateFlags::DISABLED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u16 {
        const DEFAULT = 0;
        const CHECKED = 1 << 0;
        const FOCUSED = 1 << 1;
        const FOCUS_KEY = 1 << 2;
        const EDITED = 1 << 3;
        const HOVERED = 1 << 4;
        const PRESSED = 1 << 5;
        const SCROLLED = 1 << 6;
        const DISABLED = 1 << 7;
    }
}

bitflags::bitflags! {
    /// Behavior switches of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjFlags: u16 {
        const NONE = 0;
        /// Not drawn, not hit, excluded from layout.
        const HIDDEN = 1 << 0;
        /// Receives pointer input.
        const CLICKABLE = 1 << 1;
        /// Toggles `CHECKED` when clicked.
        const CHECKABLE = 1 << 2;
        /// Forward events to the parent after local handlers ran.
        const EVENT_BUBBLE = 1 << 3;
        /// Positioned by align/offset even inside a layout container.
        const IGNORE_LAYOUT = 1 << 4;
    }
}
