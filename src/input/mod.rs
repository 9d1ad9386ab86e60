//! Input Module - Pointer hit testing and terminal event conversion.
//!
//! # API
//!
//! - `Context::hit_test(point)` - Topmost clickable node under a point
//! - `PointerInput::feed(ctx, event)` - Turn press/release/move into node events
//! - `terminal::convert_mouse_event` - crossterm mouse event to `PointerEvent`
//! - `terminal::poll_pointer` - Non-blocking read of the next pointer event
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::input::{terminal, PointerInput};
//! use std::time::Duration;
//!
//! let mut pointer = PointerInput::new();
//! terminal::enable_mouse()?;
//! loop {
//!     if let Some(ev) = terminal::poll_pointer(Duration::from_millis(16), &ctx.config().input)? {
//!         pointer.feed(&mut ctx, ev)?;
//!     }
//! }
//! ```

mod pointer;
pub mod terminal;

pub use pointer::{PointerEvent, PointerInput, PointerKind};
