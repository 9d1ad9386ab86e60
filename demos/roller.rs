//! Roller - An infinite month picker built from plain nodes
//!
//! The roller shows four rows. Clicking a row selects the month shown there
//! and scrolls it to the top; the selection wraps around the year. Rows bubble
//! their clicks to the roller, which announces the new selection with
//! `ValueChanged`.
//!
//! Run with: cargo run --example roller

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use spark_ui::{
    Context, Event, EventCode, EventFilter, FlexFlow, NodeId, ObjFlags, PointerEvent,
    PointerInput,
};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const VISIBLE_ROWS: usize = 4;
const ROW_HEIGHT: i32 = 20;

/// Month shown in the top row.
struct Roller {
    top: Cell<usize>,
}

impl Roller {
    fn month_at(&self, row: usize) -> usize {
        (self.top.get() + row) % MONTHS.len()
    }
}

fn event_handler(e: &mut Event, _ctx: &mut Context) -> spark_ui::Result<()> {
    if e.code() == EventCode::ValueChanged {
        let selected = *e.param::<usize>()?;
        println!("Selected month: {}", MONTHS[selected]);
    }
    Ok(())
}

fn create_roller(ctx: &mut Context, parent: NodeId) -> spark_ui::Result<(NodeId, Vec<NodeId>)> {
    let roller = ctx.create_child(parent)?;
    ctx.set_size(roller, 120, ROW_HEIGHT * VISIBLE_ROWS as i32)?;
    ctx.set_flex_flow(roller, FlexFlow::Column)?;

    let mut rows = Vec::new();
    for _ in 0..VISIBLE_ROWS {
        let row = ctx.create_child(roller)?;
        ctx.set_size(row, 120, ROW_HEIGHT)?;
        ctx.add_flag(row, ObjFlags::EVENT_BUBBLE)?;
        rows.push(row);
    }

    let state: Rc<dyn Any> = Rc::new(Roller { top: Cell::new(0) });
    let row_ids = rows.clone();
    ctx.add_event_cb(
        roller,
        EventCode::Clicked,
        move |e: &mut Event, ctx: &mut Context| {
            let roller = e.user_data::<Roller>()?;
            let Some(row) = row_ids.iter().position(|&r| r == e.target()) else {
                return Ok(());
            };
            let selected = roller.month_at(row);
            roller.top.set(selected);
            ctx.send_event(e.current_target(), EventCode::ValueChanged, Some(Rc::new(selected)))?;
            Ok(())
        },
        Some(state),
    )?;

    Ok((roller, rows))
}

fn main() -> spark_ui::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut ctx = Context::default();
    let screen = ctx.screen_active()?;

    let (roller, rows) = create_roller(&mut ctx, screen)?;
    ctx.center(roller)?;
    ctx.add_event_cb(roller, EventFilter::All, event_handler, None)?;

    ctx.update_layout()?;

    // Pick the bottom row three times: April, July, October
    let mut pointer = PointerInput::new();
    for _ in 0..3 {
        let area = ctx.coords(rows[VISIBLE_ROWS - 1])?;
        let (x, y) = (area.x + area.width / 2, area.y + area.height / 2);
        pointer.feed(&mut ctx, PointerEvent::press(x, y))?;
        pointer.feed(&mut ctx, PointerEvent::release(x, y))?;
    }

    // Wrapping past December
    for _ in 0..2 {
        let area = ctx.coords(rows[VISIBLE_ROWS - 1])?;
        pointer.feed(&mut ctx, PointerEvent::press(area.x + 1, area.y + 1))?;
        pointer.feed(&mut ctx, PointerEvent::release(area.x + 1, area.y + 1))?;
    }
    Ok(())
}
