//! Matrix clock display runner
//!
//! Builds a mode list from a built-in preset or a JSON file and runs the
//! tick loop, painting each frame to the terminal or to a (mock) LED strip.
//!
//! ## Rust concepts
//! - `clap` derive for argument parsing, `ValueEnum` for `--output`
//! - `Box<dyn Renderer>` to pick an output at runtime
//! - `ExitCode` instead of `process::exit` so destructors still run
//!
//! ## Usage
//! ```sh
//! matrix-clock --preset sand-sim --rows 16 --cols 16 --interval-ms 50
//! matrix-clock --preset clock --time 09:58 --step-minutes 1 --interval-ms 200
//! RUST_LOG=debug matrix-clock --config my-preset.json --output strip --ticks 100
//! ```

use chrono::NaiveTime;
use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};
use matrix_clock::clock::ClockSettings;
use matrix_clock::config::{BuildContext, DisplayConfig, PRESET_NAMES};
use matrix_clock::display::{self, Display, RunOptions};
use matrix_clock::render::{MockStrip, NullRenderer, Renderer, StripRenderer, TerminalRenderer};
use matrix_clock::{GridSize, setup_signal_handler};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Truecolor glyphs on stdout
    Terminal,
    /// Serpentine-mapped pushes to an in-memory strip (logged at debug)
    Strip,
    /// Compute frames without showing them
    None,
}

/// Word-clock matrix display runner
#[derive(Parser, Debug)]
#[command(name = "matrix-clock")]
#[command(about = "Run light-grid display modes in a terminal or on a mock LED strip")]
#[command(version)]
struct Args {
    /// Built-in preset to run
    #[arg(
        long,
        default_value = "clock",
        value_parser = PossibleValuesParser::new(PRESET_NAMES.iter().copied())
    )]
    preset: String,

    /// JSON preset file; takes precedence over --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rows on the grid
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,

    /// Number of columns on the grid
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Milliseconds between ticks
    #[arg(long, default_value = "100")]
    interval_ms: u64,

    /// Where frames go
    #[arg(long, value_enum, default_value_t = Output::Terminal)]
    output: Output,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for the sand simulations
    #[arg(long)]
    seed: Option<u64>,

    /// Root directory relative image paths are resolved against
    #[arg(long, default_value = ".")]
    media_dir: PathBuf,

    /// Show this time (HH:MM or HH:MM:SS) instead of the local clock
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    /// Minutes added to the clock reading
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    offset_minutes: i64,

    /// Minutes the clock runs ahead each tick, to preview a day quickly
    #[arg(long, default_value = "0")]
    step_minutes: i64,

    /// Output brightness (0-100)
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u8).range(0..=100))]
    brightness: u8,
}

fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
}

fn main() -> ExitCode {
    // Logs go to stderr so the terminal renderer owns stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let grid = GridSize::new(args.rows, args.cols);
    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading preset file {}", path.display());
            DisplayConfig::from_file(path)?
        }
        None => {
            tracing::info!("Using built-in preset {}", args.preset);
            DisplayConfig::preset(&args.preset)?
        }
    };

    let media_dir = args.media_dir.canonicalize().unwrap_or_else(|_| {
        tracing::warn!("Could not canonicalize media dir, using as-is");
        args.media_dir.clone()
    });

    tracing::info!("Matrix clock v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Grid: {}x{}", grid.rows, grid.cols);
    tracing::info!("Media dir: {}", media_dir.display());

    let clock = ClockSettings {
        fixed: args.time,
        offset_minutes: args.offset_minutes,
        step_minutes: args.step_minutes,
    };
    if let Some(time) = clock.fixed {
        tracing::info!("Clock starts at {time}");
    }

    let ctx = BuildContext {
        grid,
        media_dir,
        seed: args.seed,
        clock,
    };
    let mut display =
        Display::new(grid, config.build_modes(&ctx)?).with_rotation(config.build_rotation(&ctx)?);

    let mut renderer: Box<dyn Renderer> = match args.output {
        Output::Terminal => {
            Box::new(TerminalRenderer::new(std::io::stdout()).with_brightness(args.brightness))
        }
        Output::Strip => Box::new(
            StripRenderer::new(MockStrip::new(grid.light_count()), grid)?
                .with_brightness(args.brightness),
        ),
        Output::None => Box::new(NullRenderer),
    };
    renderer.clear()?;

    let running = setup_signal_handler()?;
    let options = RunOptions {
        interval: Duration::from_millis(args.interval_ms),
        max_ticks: args.ticks,
        rotate_every: config.rotate_every,
    };
    display::run(&mut display, renderer.as_mut(), &options, &running)?;
    Ok(())
}
