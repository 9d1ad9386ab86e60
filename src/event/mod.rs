//! Event Module - Handler registry and bubbling dispatch.
//!
//! # API
//!
//! - `Context::add_event_cb(node, filter, handler, user_data)` - Register a closure
//! - `Context::add_event_handler(node, filter, handler, user_data)` - Register a trait object
//! - `Context::remove_event_cb(registration)` - Deregister
//! - `Context::send_event(node, code, param)` - Dispatch with bubbling
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::{palette_main, Context, Event, EventCode, Palette, StateFlags};
//!
//! ctx.add_event_cb(cont, EventCode::Clicked, |e: &mut Event, ctx: &mut Context| {
//!     // The container itself was clicked
//!     if e.target() == e.current_target() {
//!         return Ok(());
//!     }
//!     ctx.set_style_bg_color(e.target(), palette_main(Palette::Red), StateFlags::DEFAULT)
//! }, None)?;
//! ```

mod dispatch;
mod types;

pub use dispatch::Dispatch;
pub use types::*;
pub(crate) use types::Registration;
