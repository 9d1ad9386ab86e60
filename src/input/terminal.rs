//! Terminal - crossterm mouse events as pointer events.
//!
//! Terminal cells are mapped to screen pixels with the configured cell size;
//! a cell maps to its center pixel.

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use crate::config::InputConfig;
use crate::error::Result;
use crate::types::Point;

use super::pointer::{PointerEvent, PointerKind};

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Only the left button acts as the pointer;
/// scrolling and other buttons yield `None`.
pub fn convert_mouse_event(event: CrosstermMouseEvent, input: &InputConfig) -> Option<PointerEvent> {
    let kind = match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => PointerKind::Press,
        MouseEventKind::Up(CrosstermMouseButton::Left) => PointerKind::Release,
        MouseEventKind::Drag(CrosstermMouseButton::Left) | MouseEventKind::Moved => {
            PointerKind::Move
        }
        _ => return None,
    };

    Some(PointerEvent {
        kind,
        point: cell_to_point(event.column, event.row, input),
    })
}

/// Center pixel of a terminal cell.
pub fn cell_to_point(column: u16, row: u16, input: &InputConfig) -> Point {
    Point::new(
        column as i32 * input.cell_width + input.cell_width / 2,
        row as i32 * input.cell_height + input.cell_height / 2,
    )
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a pointer event with timeout.
///
/// Returns `None` on timeout and for events that are not pointer events.
pub fn poll_pointer(timeout: Duration, input: &InputConfig) -> Result<Option<PointerEvent>> {
    if !poll(timeout)? {
        return Ok(None);
    }
    match read()? {
        CrosstermEvent::Mouse(mouse) => Ok(convert_mouse_event(mouse, input)),
        _ => Ok(None),
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

pub fn enable_mouse() -> Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    Ok(())
}

pub fn disable_mouse() -> Result<()> {
    execute!(stdout(), DisableMouseCapture)?;
    Ok(())
}
