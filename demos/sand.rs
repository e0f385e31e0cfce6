//! # Falling Sand Example
//!
//! Runs the sand simulation over a 16x16 grid in the terminal, with a
//! rotating color cycle around the edge. Press Ctrl+C to stop.
//!
//! ## Run it
//! ```sh
//! cargo run --example sand
//! ```
//!
//! ## Rust concepts introduced
//! - Struct update syntax (`..SandSimParams::default()`)
//! - `.into()` to turn a concrete mode into `Mode`

use matrix_clock::display::{self, Display, RunOptions};
use matrix_clock::modes::{CycleColors, SandSim, SandSimParams};
use matrix_clock::render::TerminalRenderer;
use matrix_clock::{BLACK, BLUE, Color, GridSize, RED, WHITE, setup_signal_handler};
use std::time::Duration;

fn main() {
    let grid = GridSize::default();
    let palette = vec![
        BLACK,
        Color::new(230, 255, 0),
        Color::new(180, 255, 0),
        Color::new(140, 255, 0),
    ];
    let params = SandSimParams {
        drop_interval: 3,
        random_at_end: true,
        ..SandSimParams::default()
    };
    let edge = grid.edge_coords().expect("a 16x16 grid has an edge");

    let mut screen = Display::new(
        grid,
        vec![
            SandSim::new(grid.all_coords(), palette, params).into(),
            CycleColors::new(edge, vec![RED, WHITE, BLUE], false).into(),
        ],
    );
    let mut renderer = TerminalRenderer::new(std::io::stdout()).with_brightness(80);
    let running = setup_signal_handler().expect("Failed to install the Ctrl+C handler");
    let options = RunOptions {
        interval: Duration::from_millis(50),
        ..RunOptions::default()
    };

    let ticks = display::run(&mut screen, &mut renderer, &options, &running).expect("tick failed");
    println!("\nShutting down cleanly after {ticks} ticks.");
}
