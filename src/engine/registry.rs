//! Node Registry - Generational arena for node storage.
//!
//! Manages the lifecycle of node slots:
//! - Free index pool for O(1) reuse
//! - Generation counter per slot so stale handles are detected
//! - Stable iteration in index order

use std::fmt;

use super::node::Node;

// =============================================================================
// Handles
// =============================================================================

/// Non-owning handle to a node.
///
/// A handle stays valid until its node is destroyed. After that the slot may
/// be reused, but the generation differs, so the old handle never aliases the
/// new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index (for diagnostics and stable ordering).
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Arena
// =============================================================================

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Storage for every node of a [`Context`](super::Context).
#[derive(Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    /// Pool of freed indices for reuse.
    free: Vec<u32>,
    len: usize,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its handle. Reuses a freed slot if available.
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Remove a node, invalidating every outstanding handle to it.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
