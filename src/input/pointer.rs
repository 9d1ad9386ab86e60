//! Pointer - Hit testing and press/release tracking.
//!
//! Turns raw pointer events into node events:
//!
//! - Press: `PRESSED` state + `Pressed` on the hit node
//! - Release: `PRESSED` cleared + `Released` on the pressed node, then
//!   `Clicked` if released over the same node
//! - Click on a `CHECKABLE` node: `CHECKED` toggles + `ValueChanged`
//! - Move: `HOVERED` state follows the pointer

use crate::engine::{Context, NodeId};
use crate::error::Result;
use crate::event::{Dispatch, EventCode};
use crate::types::{ObjFlags, Point, StateFlags};

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Move,
}

/// One pointer sample in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub point: Point,
}

impl PointerEvent {
    pub fn press(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Press,
            point: Point::new(x, y),
        }
    }

    pub fn release(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Release,
            point: Point::new(x, y),
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Move,
            point: Point::new(x, y),
        }
    }
}

// =============================================================================
// HIT TESTING
// =============================================================================

impl Context {
    /// Topmost node of the active screen under `point`.
    ///
    /// Hidden subtrees are skipped. Later children are on top of earlier
    /// ones. A node that is not `CLICKABLE` passes the hit to its nearest
    /// clickable ancestor.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let screen = self.screen_active().ok()?;
        let mut hit = self.deepest_at(screen, point)?;

        loop {
            let node = self.nodes.get(hit)?;
            if node.flags.contains(ObjFlags::CLICKABLE) {
                return Some(hit);
            }
            hit = node.parent?;
        }
    }

    fn deepest_at(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.is_hidden() || !node.coords.contains(point) {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.deepest_at(child, point))
            .or(Some(id))
    }
}

// =============================================================================
// POINTER STATE
// =============================================================================

/// Press and hover tracking for one pointer device.
#[derive(Debug, Default)]
pub struct PointerInput {
    pressed: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node currently held down, if any.
    pub fn pressed(&self) -> Option<NodeId> {
        self.pressed
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Process one pointer event. Returns the node under the pointer.
    ///
    /// Pending layout is applied first so hit testing sees current geometry.
    pub fn feed(&mut self, ctx: &mut Context, event: PointerEvent) -> Result<Option<NodeId>> {
        ctx.update_layout()?;
        let hit = ctx.hit_test(event.point);
        tracing::trace!(kind = ?event.kind, x = event.point.x, y = event.point.y, ?hit, "pointer");

        match event.kind {
            PointerKind::Move => self.update_hover(ctx, hit)?,
            PointerKind::Press => {
                self.update_hover(ctx, hit)?;
                if let Some(target) = hit {
                    if !ctx.has_state(target, StateFlags::DISABLED)? {
                        ctx.add_state(target, StateFlags::PRESSED)?;
                        self.pressed = Some(target);
                        ctx.send_event(target, EventCode::Pressed, None)?;
                    }
                }
            }
            PointerKind::Release => {
                if let Some(pressed) = self.pressed.take().filter(|&p| ctx.is_alive(p)) {
                    ctx.clear_state(pressed, StateFlags::PRESSED)?;
                    ctx.send_event(pressed, EventCode::Released, None)?;

                    if hit == Some(pressed) && ctx.is_alive(pressed) {
                        self.click(ctx, pressed)?;
                    }
                }
            }
        }

        Ok(hit)
    }

    fn click(&mut self, ctx: &mut Context, target: NodeId) -> Result<()> {
        if ctx.send_event(target, EventCode::Clicked, None)? == Dispatch::Ignored {
            return Ok(());
        }
        if !ctx.is_alive(target) || !ctx.has_flag(target, ObjFlags::CHECKABLE)? {
            return Ok(());
        }

        if ctx.has_state(target, StateFlags::CHECKED)? {
            ctx.clear_state(target, StateFlags::CHECKED)?;
        } else {
            ctx.add_state(target, StateFlags::CHECKED)?;
        }
        ctx.send_event(target, EventCode::ValueChanged, None)?;
        Ok(())
    }

    fn update_hover(&mut self, ctx: &mut Context, hit: Option<NodeId>) -> Result<()> {
        if self.hovered == hit {
            return Ok(());
        }
        if let Some(previous) = self.hovered.filter(|&h| ctx.is_alive(h)) {
            ctx.clear_state(previous, StateFlags::HOVERED)?;
        }
        if let Some(current) = hit {
            ctx.add_state(current, StateFlags::HOVERED)?;
        }
        self.hovered = hit;
        Ok(())
    }
}
