//! Minimal top-down map editor for the text map format.
//!
//! ```bash
//! cargo run --bin wolfgrid -- --size 24 --out map.txt
//! ```
//!
//! `P` places walls, `D` deletes them, left mouse paints, `S` saves.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use wolfgrid::world::GridMap;

const WINDOW: usize = 768;

const COLOR_EMPTY: u32 = 0xFF_FF_FF_FF;
const COLOR_WALL: u32 = 0xFF_10_10_10;
const COLOR_LINE: u32 = 0xFF_80_80_80;

#[derive(Parser, Debug)]
#[command(about = "Top-down editor for wolfgrid text maps")]
struct Args {
    /// Cells per map side for a fresh map
    #[arg(long, default_value_t = 24)]
    size: usize,

    /// Existing map to edit
    #[arg(long)]
    map: Option<PathBuf>,

    /// Where `S` saves the map
    #[arg(long, default_value = "map.txt")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // ─────────── load or start blank ───────
    let mut grid = match &args.map {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading map {}", path.display()))?;
            GridMap::from_text(&text).with_context(|| format!("parsing map {}", path.display()))?
        }
        None => GridMap::from_text(&blank_text(args.size))?,
    };

    let size = grid.size();
    let cell_px = (WINDOW / size).max(2);
    let side = cell_px * size;

    let mut buffer = vec![COLOR_EMPTY; side * side];
    let mut window = Window::new("wolfgrid map editor", side, side, WindowOptions::default())?;
    window.set_target_fps(30);

    let mut placing = true; // P = place walls, D = delete

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            placing = true;
        }
        if window.is_key_pressed(Key::D, KeyRepeat::No) {
            placing = false;
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            std::fs::write(&args.out, grid.to_text())
                .with_context(|| format!("saving map {}", args.out.display()))?;
            log::info!("map saved to {}", args.out.display());
        }

        // paint while the button is held
        if window.get_mouse_down(MouseButton::Left) {
            if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Discard) {
                let ix = (mx as usize / cell_px) as i64;
                let iy = (my as usize / cell_px) as i64;
                grid.set_cell(ix, iy, if placing { 1 } else { 0 });
            }
        }

        // ─────────── rasterise the grid ────────────
        for iy in 0..size {
            for ix in 0..size {
                let fill = if grid.cell(ix as i64, iy as i64) > 0 {
                    COLOR_WALL
                } else {
                    COLOR_EMPTY
                };
                for py in 0..cell_px {
                    for px in 0..cell_px {
                        let on_edge = px == 0 || py == 0;
                        buffer[(iy * cell_px + py) * side + ix * cell_px + px] =
                            if on_edge { COLOR_LINE } else { fill };
                    }
                }
            }
        }

        window.set_title(&format!(
            "wolfgrid map editor — {} (S saves to {})",
            if placing { "placing" } else { "deleting" },
            args.out.display()
        ));
        window.update_with_buffer(&buffer, side, side)?;
    }
    Ok(())
}

/// Text for an all-empty square map.
fn blank_text(size: usize) -> String {
    let mut row = "0".repeat(size);
    row.push('\n');
    row.repeat(size)
}
