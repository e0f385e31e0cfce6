//! Modes: per-tick behaviors that paint the light grid.
//!
//! Each mode owns an ordered list of target coordinates, fixed when it is
//! built, and repaints those lights every time [`Mode::update`] runs. The
//! display applies its modes in list order, so a later mode overwrites any
//! cell an earlier one touched.
//!
//! ## Rust concepts
//! - An `enum` of structs instead of a class hierarchy: `match` dispatches
//!   `update` and the compiler checks every variant is handled
//! - `const fn` so capability flags are fixed per kind at compile time
//! - `From` impls so `CycleColors::new(..).into()` yields a `Mode`

mod cycle;
mod edge;
mod sand_sim;
mod show_image;
mod words;

pub use cycle::CycleColors;
pub use edge::{EdgeSeconds, TestEdge};
pub use sand_sim::{SandSim, SandSimParams};
pub use show_image::ShowImage;
pub use words::{ClockFace, FlashWords, PlacedFace, TestWords};

use crate::lights::LightStore;
use crate::{Color, Coord, Result};

/// What part of the clock a mode draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeKind {
    /// Replaces the whole face.
    Face,
    /// Decorates the border or a region on top of the face.
    Edge,
    /// Diagnostic patterns.
    Test,
}

/// Capabilities that come with a [`ModeKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeFlags {
    /// May be picked when the display rotates through dynamic modes.
    pub include_as_dynamic: bool,
    /// Keeps the current face modes underneath when it becomes active.
    pub overlays_face: bool,
}

impl ModeKind {
    pub const fn flags(self) -> ModeFlags {
        match self {
            ModeKind::Face => ModeFlags {
                include_as_dynamic: true,
                overlays_face: false,
            },
            ModeKind::Edge => ModeFlags {
                include_as_dynamic: true,
                overlays_face: true,
            },
            ModeKind::Test => ModeFlags {
                include_as_dynamic: false,
                overlays_face: false,
            },
        }
    }
}

/// Paints one color over every target each tick.
///
/// With `on: false` it blanks its region instead.
#[derive(Clone, Debug)]
pub struct Fill {
    coords: Vec<Coord>,
    color: Color,
    on: bool,
}

impl Fill {
    pub fn new(coords: Vec<Coord>, color: Color, on: bool) -> Self {
        Self { coords, color, on }
    }

    fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        for &coord in &self.coords {
            lights.set_color(coord, self.color, Some(self.on))?;
        }
        Ok(())
    }
}

pub enum Mode {
    CycleColors(CycleColors),
    ShowImage(ShowImage),
    SandSim(SandSim),
    ClockFace(ClockFace),
    EdgeSeconds(EdgeSeconds),
    TestEdge(TestEdge),
    FlashWords(FlashWords),
    TestWords(TestWords),
    Fill(Fill),
}

impl Mode {
    /// Paint this tick's frame into `lights`.
    pub fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        match self {
            Mode::CycleColors(mode) => mode.update(lights),
            Mode::ShowImage(mode) => mode.update(lights),
            Mode::SandSim(mode) => mode.update(lights),
            Mode::ClockFace(mode) => mode.update(lights),
            Mode::EdgeSeconds(mode) => mode.update(lights),
            Mode::TestEdge(mode) => mode.update(lights),
            Mode::FlashWords(mode) => mode.update(lights),
            Mode::TestWords(mode) => mode.update(lights),
            Mode::Fill(mode) => mode.update(lights),
        }
    }

    pub fn coords(&self) -> &[Coord] {
        match self {
            Mode::CycleColors(mode) => mode.coords(),
            Mode::ShowImage(mode) => mode.coords(),
            Mode::SandSim(mode) => mode.coords(),
            Mode::ClockFace(mode) => mode.coords(),
            Mode::EdgeSeconds(mode) => mode.coords(),
            Mode::TestEdge(mode) => mode.coords(),
            Mode::FlashWords(mode) => mode.coords(),
            Mode::TestWords(mode) => mode.coords(),
            Mode::Fill(mode) => &mode.coords,
        }
    }

    pub const fn kind(&self) -> ModeKind {
        match self {
            Mode::CycleColors(_) | Mode::EdgeSeconds(_) => ModeKind::Edge,
            Mode::ShowImage(_) | Mode::SandSim(_) | Mode::ClockFace(_) => ModeKind::Face,
            Mode::TestEdge(_) | Mode::FlashWords(_) | Mode::TestWords(_) | Mode::Fill(_) => {
                ModeKind::Test
            }
        }
    }

    pub const fn flags(&self) -> ModeFlags {
        self.kind().flags()
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Mode::CycleColors(_) => "CycleColors",
            Mode::ShowImage(_) => "ShowImage",
            Mode::SandSim(_) => "SandSim",
            Mode::ClockFace(_) => "ClockFace",
            Mode::EdgeSeconds(_) => "EdgeSeconds",
            Mode::TestEdge(_) => "TestEdge",
            Mode::FlashWords(_) => "FlashWords",
            Mode::TestWords(_) => "TestWords",
            Mode::Fill(_) => "Fill",
        }
    }
}

impl std::fmt::Debug for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.name())
            .field("kind", &self.kind())
            .field("targets", &self.coords().len())
            .finish()
    }
}

impl From<CycleColors> for Mode {
    fn from(mode: CycleColors) -> Self {
        Mode::CycleColors(mode)
    }
}

impl From<ShowImage> for Mode {
    fn from(mode: ShowImage) -> Self {
        Mode::ShowImage(mode)
    }
}

impl From<SandSim> for Mode {
    fn from(mode: SandSim) -> Self {
        Mode::SandSim(mode)
    }
}

impl From<ClockFace> for Mode {
    fn from(mode: ClockFace) -> Self {
        Mode::ClockFace(mode)
    }
}

impl From<EdgeSeconds> for Mode {
    fn from(mode: EdgeSeconds) -> Self {
        Mode::EdgeSeconds(mode)
    }
}

impl From<TestEdge> for Mode {
    fn from(mode: TestEdge) -> Self {
        Mode::TestEdge(mode)
    }
}

impl From<FlashWords> for Mode {
    fn from(mode: FlashWords) -> Self {
        Mode::FlashWords(mode)
    }
}

impl From<TestWords> for Mode {
    fn from(mode: TestWords) -> Self {
        Mode::TestWords(mode)
    }
}

impl From<Fill> for Mode {
    fn from(mode: Fill) -> Self {
        Mode::Fill(mode)
    }
}
