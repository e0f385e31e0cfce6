//! # Word Clock Example
//!
//! Spells the time on the square word face with a seconds marker running
//! around the edge. The clock starts at a fixed time and runs a minute
//! ahead every tick, so a whole morning goes by in a few seconds.
//!
//! ## Run it
//! ```sh
//! cargo run --example clock
//! ```
//!
//! ## Rust concepts introduced
//! - Building modes from the same presets the binary uses
//! - `Option<u64>` to bound a loop that would otherwise run forever

use chrono::NaiveTime;
use matrix_clock::clock::ClockSettings;
use matrix_clock::config::{BuildContext, DisplayConfig};
use matrix_clock::display::{self, Display, RunOptions};
use matrix_clock::render::TerminalRenderer;
use matrix_clock::{GridSize, setup_signal_handler};
use std::time::Duration;

fn main() {
    let ctx = BuildContext {
        clock: ClockSettings {
            fixed: NaiveTime::from_hms_opt(6, 0, 0),
            offset_minutes: 0,
            step_minutes: 1,
        },
        ..BuildContext::new(GridSize::default())
    };
    let config = DisplayConfig::preset("clock").expect("clock is a built-in preset");
    let modes = config.build_modes(&ctx).expect("the square face fits a 16x16 grid");

    let mut screen = Display::new(ctx.grid, modes);
    let mut renderer = TerminalRenderer::new(std::io::stdout());
    let running = setup_signal_handler().expect("Failed to install the Ctrl+C handler");
    let options = RunOptions {
        interval: Duration::from_millis(100),
        // Six hours, one minute per tick.
        max_ticks: Some(6 * 60),
        rotate_every: None,
    };

    let ticks = display::run(&mut screen, &mut renderer, &options, &running).expect("tick failed");
    println!("\nShowed {ticks} minutes.");
}
