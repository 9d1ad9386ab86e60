//! # spark-ui
//!
//! Minimal retained-mode GUI core: a node tree, an event dispatcher with
//! opt-in bubbling, and a flex/grid layout engine.
//!
//! ## Architecture
//!
//! All state lives in one [`Context`]. Nodes are arena slots named by
//! generational [`NodeId`] handles, so a handle to a destroyed node is
//! detected instead of dangling. Handlers receive the context by `&mut` and
//! may mutate the tree while an event is being dispatched.
//!
//! ```text
//! Context ─┬─ NodeArena (nodes: geometry, styles, flags, handlers)
//!          ├─ screens / active screen
//!          └─ dispatch stack + pending destruction
//! ```
//!
//! Layout is computed with [Taffy](https://github.com/DioxusLabs/taffy) and
//! committed as absolute areas that a renderer reads back with
//! [`Context::coords`] and the style queries.
//!
//! ## Modules
//!
//! - [`types`] - Colors, geometry, state and behavior flags
//! - [`engine`] - Node arena, tree operations, style store
//! - [`event`] - Handler registry and bubbling dispatch
//! - [`layout`] - Flex and grid declarations and layout passes
//! - [`input`] - Pointer hit testing and terminal mouse input
//! - [`config`] - TOML engine configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod layout;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{DisplayConfig, EngineConfig, InputConfig};
pub use engine::{Context, NodeId, StyleProp, StyleValue};
pub use error::{EngineError, Result};
pub use event::{Dispatch, Event, EventCode, EventFilter, EventHandler, EventRegistration, Phase};
pub use input::{PointerEvent, PointerInput, PointerKind};
pub use layout::{
    grid_fr, ComputedLayout, FlexAlign, FlexFlow, GridAlign, GridTemplate, GridTrack,
    LayoutKind, GRID_CONTENT, GRID_TEMPLATE_LAST,
};
