//! Matrix display engine for a word clock.
//!
//! The crate is built bottom-up:
//! - [`geometry`]: coordinate lists (rows, columns, rings, boxes) and
//!   serpentine strip addressing
//! - [`lights`]: the addressable light grid
//! - [`modes`]: per-tick behaviors that paint the grid
//! - [`clock`] and [`face`]: the time in words and the letter layouts that
//!   spell it
//! - [`sand`]: the falling-sand cellular automaton behind the sand mode
//! - [`display`] and [`render`]: the tick pipeline and its outputs
//! - [`config`] and [`media`]: building mode lists from presets and images
//!
//! It also holds the small value types everything else shares: grid size,
//! coordinates and colors.

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod face;
pub mod geometry;
pub mod lights;
pub mod media;
pub mod modes;
pub mod render;
pub mod sand;

pub use error::{Error, Result};

use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Grid size ──────────────────────────────────────────────────────

/// Dimensions of a light grid.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s).
/// `PartialEq, Eq` let us compare sizes in tests and when validating
/// configuration against the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of lights in the grid.
    pub fn light_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self { rows: 16, cols: 16 }
    }
}

// ── Coordinates ────────────────────────────────────────────────────

/// A `(row, col)` position on the grid.
///
/// Components are signed so that callers can ask about positions like
/// `(-1, 0)` and get a proper error back instead of a wrapped index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// An RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Color = Color::new(255, 255, 255);
pub const BLACK: Color = Color::new(0, 0, 0);
pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const ORANGE: Color = Color::new(255, 165, 0);
pub const YELLOW: Color = Color::new(255, 255, 0);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a hue value (0-360), with full saturation and brightness.
    ///
    /// # Rust concept: match expressions
    /// Rust's `match` is exhaustive, so the compiler checks every sector is handled.
    pub fn from_hue(hue: u16) -> Self {
        let hue = hue % 360;
        let sector = hue / 60;
        let fraction = ((hue % 60) as f32) / 60.0;
        let rising = (fraction * 255.0) as u8;
        let falling = ((1.0 - fraction) * 255.0) as u8;

        match sector {
            0 => Self::new(255, rising, 0),
            1 => Self::new(falling, 255, 0),
            2 => Self::new(0, 255, rising),
            3 => Self::new(0, falling, 255),
            4 => Self::new(rising, 0, 255),
            5 => Self::new(255, 0, falling),
            _ => Self::new(255, 0, 0),
        }
    }

    /// Convert hue, saturation and lightness (all in `0.0..=1.0`) to RGB.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        if saturation == 0.0 {
            let v = channel(lightness);
            return Self::new(v, v, v);
        }
        let m2 = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let m1 = 2.0 * lightness - m2;
        Self::new(
            channel(hue_to_channel(m1, m2, hue + 1.0 / 3.0)),
            channel(hue_to_channel(m1, m2, hue)),
            channel(hue_to_channel(m1, m2, hue - 1.0 / 3.0)),
        )
    }

    /// Convert to `(hue, saturation, lightness)`, each in `0.0..=1.0`.
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, lightness);
        }
        let delta = max - min;
        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let hue = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        ((hue / 6.0).rem_euclid(1.0), saturation, lightness)
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Apply brightness scaling (0-100) to this color.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness >= 100 {
            return self;
        }
        Self {
            r: ((self.r as u16 * brightness as u16) / 100) as u8,
            g: ((self.g as u16 * brightness as u16) / 100) as u8,
            b: ((self.b as u16 * brightness as u16) / 100) as u8,
        }
    }
}

fn hue_to_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

// ── Triadic palettes ───────────────────────────────────────────────

/// Three colors 120° apart on the hue wheel, starting at `hue`.
pub fn triadic_from_hsl(hue: f64, saturation: f64, lightness: f64) -> [Color; 3] {
    [0.0, 1.0 / 3.0, 2.0 / 3.0]
        .map(|offset| Color::from_hsl((hue + offset).rem_euclid(1.0), saturation, lightness))
}

/// A random triadic palette with saturation in `[0.5, 1.0]` and lightness
/// in `[0.4, 0.7]`.
///
/// # Rust concept: generic over `Rng`
/// Taking `&mut R` instead of calling `thread_rng()` inside lets tests pass
/// a seeded generator and get the same palette every time.
pub fn random_triadic<R: Rng + ?Sized>(rng: &mut R) -> [Color; 3] {
    let hue = rng.gen_range(0.0..1.0);
    let saturation = rng.gen_range(0.5..=1.0);
    let lightness = rng.gen_range(0.4..=0.7);
    triadic_from_hsl(hue, saturation, lightness)
}

// ── Shutdown signal ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// We need to share the `running` flag between the tick loop and the
/// signal handler. `Arc` lets multiple owners share data. `AtomicBool` is a
/// thread-safe boolean, so a single flag needs no mutex.
pub fn setup_signal_handler() -> std::result::Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the tick loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
