//! Event Bubbling - One handler on a container serves 30 buttons
//!
//! Each button opts in to bubbling, so its clicks reach the container's
//! handler. Clicked buttons turn red; clicks on the container itself are
//! ignored.
//!
//! Run with: cargo run --example event_bubbling

use spark_ui::{
    palette_main, Context, Event, EventCode, FlexFlow, ObjFlags, Palette, PointerEvent,
    PointerInput, StateFlags,
};

fn main() -> spark_ui::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut ctx = Context::default();
    let screen = ctx.screen_active()?;

    let cont = ctx.create_child(screen)?;
    ctx.set_size(cont, 290, 200)?;
    ctx.center(cont)?;
    ctx.set_flex_flow(cont, FlexFlow::RowWrap)?;

    let mut buttons = Vec::new();
    for _ in 0..30 {
        let button = ctx.create_child(cont)?;
        ctx.set_size(button, 70, 50)?;
        ctx.add_flag(button, ObjFlags::EVENT_BUBBLE)?;

        let label = ctx.create_child(button)?;
        ctx.set_content_size(label, 16, 12)?;
        ctx.clear_flag(label, ObjFlags::CLICKABLE)?;
        ctx.center(label)?;
        buttons.push(button);
    }

    ctx.add_event_cb(
        cont,
        EventCode::Clicked,
        |e: &mut Event, ctx: &mut Context| {
            // The container itself was clicked
            if e.target() == e.current_target() {
                return Ok(());
            }
            ctx.set_style_bg_color(e.target(), palette_main(Palette::Red), StateFlags::DEFAULT)
        },
        None,
    )?;

    ctx.update_layout()?;

    // Click the middle of a few buttons, then the container's bottom edge
    let mut pointer = PointerInput::new();
    for &index in &[0usize, 5, 29] {
        let area = ctx.coords(buttons[index])?;
        let (x, y) = (area.x + area.width / 2, area.y + area.height / 2);
        pointer.feed(&mut ctx, PointerEvent::press(x, y))?;
        pointer.feed(&mut ctx, PointerEvent::release(x, y))?;
    }
    let area = ctx.coords(cont)?;
    pointer.feed(&mut ctx, PointerEvent::press(area.x + 1, area.y + area.height - 1))?;
    pointer.feed(&mut ctx, PointerEvent::release(area.x + 1, area.y + area.height - 1))?;

    for (index, &button) in buttons.iter().enumerate() {
        let color = ctx.bg_color(button)?;
        if color == palette_main(Palette::Red) {
            tracing::info!(button = index, ?color, "clicked");
        }
    }
    tracing::info!(container = ?ctx.bg_color(cont)?, "container untouched");
    Ok(())
}
