//! Switch - Four checkable toggles in a centered column
//!
//! The first switch bubbles its events to the screen. The last two are
//! disabled and ignore clicks.
//!
//! Run with: cargo run --example switch

use spark_ui::{
    Context, Event, EventCode, EventFilter, FlexAlign, FlexFlow, ObjFlags, PointerEvent,
    PointerInput, StateFlags,
};

fn event_handler(e: &mut Event, ctx: &mut Context) -> spark_ui::Result<()> {
    if e.code() == EventCode::ValueChanged {
        let on = ctx.has_state(e.target(), StateFlags::CHECKED)?;
        println!("State: {}", if on { "On" } else { "Off" });
    }
    Ok(())
}

fn main() -> spark_ui::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut ctx = Context::default();
    let screen = ctx.screen_active()?;
    ctx.set_flex_flow(screen, FlexFlow::Column)?;
    ctx.set_flex_align(screen, FlexAlign::Center, FlexAlign::Center, FlexAlign::Center)?;

    let states = [
        StateFlags::DEFAULT,
        StateFlags::CHECKED,
        StateFlags::DISABLED,
        StateFlags::CHECKED | StateFlags::DISABLED,
    ];

    let mut switches = Vec::new();
    for (i, state) in states.into_iter().enumerate() {
        let sw = ctx.create_child(screen)?;
        ctx.set_size(sw, 50, 25)?;
        ctx.add_flag(sw, ObjFlags::CHECKABLE)?;
        ctx.add_state(sw, state)?;
        ctx.add_event_cb(sw, EventFilter::All, event_handler, None)?;
        if i == 0 {
            ctx.add_flag(sw, ObjFlags::EVENT_BUBBLE)?;
        }
        switches.push(sw);
    }

    ctx.update_layout()?;

    // Click every switch once
    let mut pointer = PointerInput::new();
    for &sw in &switches {
        let area = ctx.coords(sw)?;
        let (x, y) = (area.x + area.width / 2, area.y + area.height / 2);
        pointer.feed(&mut ctx, PointerEvent::press(x, y))?;
        pointer.feed(&mut ctx, PointerEvent::release(x, y))?;
    }

    for (i, &sw) in switches.iter().enumerate() {
        tracing::info!(
            switch = i,
            checked = ctx.has_state(sw, StateFlags::CHECKED)?,
            disabled = ctx.has_state(sw, StateFlags::DISABLED)?,
            "final state"
        );
    }
    Ok(())
}
