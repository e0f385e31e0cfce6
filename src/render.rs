//! Outputs: paint the light grid to a terminal or push it to an LED strip.
//!
//! Renderers only read the [`LightStore`]; the display runs every mode for
//! a tick first, then hands the finished grid to exactly one renderer.
//!
//! ## Rust concepts
//! - Traits as the seam between the tick loop and its outputs
//! - Generic structs (`TerminalRenderer<W: Write>`) so tests render into a
//!   `Vec<u8>` instead of stdout
//! - `crossterm::queue!` to batch escape sequences before a single flush

use crate::lights::LightStore;
use crate::{BLACK, Color, Coord, GridSize};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{self, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

const GLYPH: &str = "■";

pub trait Renderer {
    /// Show the grid's current colors.
    fn render(&mut self, lights: &LightStore) -> io::Result<()>;

    /// Blank the output.
    fn clear(&mut self) -> io::Result<()>;
}

/// Discards every frame; used for `--output none` runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _lights: &LightStore) -> io::Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Terminal ─────────────────────────────────────────────────────────

/// Paints one `■` per light with a truecolor foreground, one grid row per
/// terminal line, redrawing from the top-left corner every frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    brightness: u8,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            brightness: 100,
        }
    }

    /// Scale every painted color (0-100).
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness.min(100);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn terminal_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, lights: &LightStore) -> io::Result<()> {
        for (row, line) in lights.rows().enumerate() {
            queue!(self.out, MoveTo(0, row as u16))?;
            for light in line {
                let color = light.shown_color().apply_brightness(self.brightness);
                queue!(
                    self.out,
                    SetForegroundColor(terminal_color(color)),
                    Print(GLYPH),
                    Print(' ')
                )?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()
    }
}

// ── LED strip ────────────────────────────────────────────────────────

/// A physical strip of individually addressable LEDs.
///
/// Colors set with [`set_led_color`](LedStrip::set_led_color) are buffered
/// until [`update_strip`](LedStrip::update_strip) pushes them out.
pub trait LedStrip {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer a color for LED `index`; returns false if there is no such LED.
    fn set_led_color(&mut self, index: usize, color: Color) -> bool;

    /// Buffer every LED as off.
    fn clear_strip(&mut self);

    /// Push the buffered colors to the LEDs.
    fn update_strip(&mut self) -> io::Result<()>;
}

/// An in-memory strip that records what would have been shown.
#[derive(Clone, Debug)]
pub struct MockStrip {
    pending: Vec<Color>,
    shown: Vec<Color>,
    updates: usize,
}

impl MockStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pending: vec![BLACK; len],
            shown: vec![BLACK; len],
            updates: 0,
        }
    }

    /// Colors as of the last [`update_strip`](LedStrip::update_strip).
    pub fn shown(&self) -> &[Color] {
        &self.shown
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl LedStrip for MockStrip {
    fn len(&self) -> usize {
        self.pending.len()
    }

    fn set_led_color(&mut self, index: usize, color: Color) -> bool {
        match self.pending.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    fn clear_strip(&mut self) {
        self.pending.fill(BLACK);
    }

    fn update_strip(&mut self) -> io::Result<()> {
        self.shown.clone_from(&self.pending);
        self.updates += 1;
        let lit: Vec<usize> = self
            .shown
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != BLACK)
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(update = self.updates, ?lit, "strip pushed");
        Ok(())
    }
}

/// Maps each light to its serpentine strip index and pushes the frame.
pub struct StripRenderer<S: LedStrip> {
    strip: S,
    order: Vec<Coord>,
    brightness: u8,
}

impl<S: LedStrip> StripRenderer<S> {
    /// Fails if the strip is shorter than the grid.
    pub fn new(strip: S, size: GridSize) -> io::Result<Self> {
        if strip.len() < size.light_count() {
            return Err(io::Error::other(format!(
                "strip has {} LEDs but a {}x{} grid needs {}",
                strip.len(),
                size.rows,
                size.cols,
                size.light_count()
            )));
        }
        Ok(Self {
            strip,
            order: size.serpentine_order(),
            brightness: 100,
        })
    }

    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness.min(100);
        self
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }
}

impl<S: LedStrip> Renderer for StripRenderer<S> {
    fn render(&mut self, lights: &LightStore) -> io::Result<()> {
        for (index, &coord) in self.order.iter().enumerate() {
            let color = lights
                .shown_color(coord)
                .map_err(io::Error::other)?
                .apply_brightness(self.brightness);
            if !self.strip.set_led_color(index, color) {
                return Err(io::Error::other(format!("no LED at strip index {index}")));
            }
        }
        self.strip.update_strip()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.strip.clear_strip();
        self.strip.update_strip()
    }
}
