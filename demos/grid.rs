//! Grid - A simple 3x3 grid of stretched buttons
//!
//! Run with: cargo run --example grid

use spark_ui::{Context, GridAlign, LayoutKind, StateFlags, GRID_TEMPLATE_LAST};

fn main() -> spark_ui::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let col_dsc = [70, 70, 70, GRID_TEMPLATE_LAST];
    let row_dsc = [50, 50, 50, GRID_TEMPLATE_LAST];

    let mut ctx = Context::default();
    let screen = ctx.screen_active()?;

    let cont = ctx.create_child(screen)?;
    ctx.set_style_grid_column_dsc_array(cont, &col_dsc, StateFlags::DEFAULT)?;
    ctx.set_style_grid_row_dsc_array(cont, &row_dsc, StateFlags::DEFAULT)?;
    ctx.set_size(cont, 300, 220)?;
    ctx.center(cont)?;
    ctx.set_layout(cont, LayoutKind::Grid)?;

    let mut cells = Vec::new();
    for i in 0..9 {
        let (col, row) = (i % 3, i / 3);

        let button = ctx.create_child(cont)?;
        // Stretch the cell in both directions, one track each
        ctx.set_grid_cell(button, GridAlign::Stretch, col, 1, GridAlign::Stretch, row, 1)?;

        let label = ctx.create_child(button)?;
        ctx.set_content_size(label, 32, 12)?;
        ctx.center(label)?;
        cells.push((col, row, button, label));
    }

    ctx.update_layout()?;

    for (col, row, button, label) in cells {
        let area = ctx.relative_coords(button)?;
        let label_area = ctx.relative_coords(label)?;
        println!(
            "c{col}r{row}: x={:>3} y={:>3} {}x{}  label at ({}, {})",
            area.x, area.y, area.width, area.height, label_area.x, label_area.y
        );
    }
    Ok(())
}
