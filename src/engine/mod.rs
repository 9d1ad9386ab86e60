//! UI Engine - Node arena, tree structure, and style store.
//!
//! The engine manages the core data structures:
//! - Registry: Generational arena with free index reuse
//! - Node: Declared geometry, flags, state, styles, handlers
//! - Context: Screens, tree operations, deferred destruction
//! - Style: State-selected style entries
//!
//! # Architecture
//!
//! Nodes are NOT referenced by pointer. They live in one arena and are named
//! by [`NodeId`] handles:
//!
//! ```text
//! #0v0: Screen (parent=None, children=[#1v0])
//! #1v0: Cont   (parent=#0v0, children=[#2v0, #3v0], layout=Flex)
//! #2v0: Button (parent=#1v0, flags=CLICKABLE|EVENT_BUBBLE)
//! ```
//!
//! The parent handle is non-owning, so the tree has no ownership cycles, and
//! a destroyed node's handle is detected as stale instead of dangling.

mod context;
mod node;
mod registry;
pub mod style;

pub use context::Context;
pub use registry::NodeId;
pub use style::{StyleProp, StyleValue, ValueKind};

pub(crate) use node::Node;
