//! The tick pipeline: run every mode in order, then render the grid.
//!
//! A [`Display`] owns the light grid, its configured ("home") modes and an
//! optional rotation of dynamic modes. Stepping the rotation makes the next
//! dynamic mode active: an overlaying mode (edge decorations) runs on top of
//! the home modes, any other mode replaces them until the next step.
//!
//! ## Rust concepts
//! - `VecDeque` as a round-robin queue (`pop_front` then `push_back`)
//! - `std::mem::replace` to hand back the old mode list without cloning
//! - Generic `run<R: Renderer + ?Sized>` so it accepts `&mut dyn Renderer`

use crate::lights::LightStore;
use crate::modes::Mode;
use crate::render::Renderer;
use crate::{GridSize, is_running};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Mode(#[from] crate::Error),
    #[error("render failed: {0}")]
    Render(#[from] io::Error),
}

pub struct Display {
    lights: LightStore,
    modes: Vec<Mode>,
    dynamic: Option<Mode>,
    rotation: VecDeque<Mode>,
    ticks: u64,
}

impl Display {
    pub fn new(size: GridSize, modes: Vec<Mode>) -> Self {
        Self {
            lights: LightStore::new(size),
            modes,
            dynamic: None,
            rotation: VecDeque::new(),
            ticks: 0,
        }
    }

    /// Add the modes [`next_dynamic_mode`](Self::next_dynamic_mode) steps
    /// through. Modes not meant for rotation are left out.
    pub fn with_rotation(mut self, rotation: Vec<Mode>) -> Self {
        for mode in rotation {
            if mode.flags().include_as_dynamic {
                self.rotation.push_back(mode);
            } else {
                tracing::warn!(
                    "{} is not a dynamic mode, leaving it out of the rotation",
                    mode.name()
                );
            }
        }
        self
    }

    pub fn lights(&self) -> &LightStore {
        &self.lights
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Ticks computed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The dynamic mode currently active, if any.
    pub fn dynamic_mode(&self) -> Option<&Mode> {
        self.dynamic.as_ref()
    }

    /// Names of the modes the next tick runs, in order.
    pub fn active_modes(&self) -> Vec<&'static str> {
        self.pipeline().map(Mode::name).collect()
    }

    fn runs_home_modes(&self) -> bool {
        self.dynamic
            .as_ref()
            .is_none_or(|mode| mode.flags().overlays_face)
    }

    fn pipeline(&self) -> impl Iterator<Item = &Mode> + '_ {
        let home: &[Mode] = if self.runs_home_modes() { &self.modes } else { &[] };
        home.iter().chain(self.dynamic.as_ref())
    }

    /// Compute the next frame. Stops at the first mode that fails; earlier
    /// modes keep what they painted.
    pub fn tick(&mut self) -> crate::Result<()> {
        if self.runs_home_modes() {
            for mode in &mut self.modes {
                mode.update(&mut self.lights)?;
            }
        }
        if let Some(mode) = &mut self.dynamic {
            mode.update(&mut self.lights)?;
        }
        self.ticks += 1;
        Ok(())
    }

    /// Replace the home modes between cycles and return the old ones.
    pub fn swap_modes(&mut self, modes: Vec<Mode>) -> Vec<Mode> {
        self.lights.clear();
        std::mem::replace(&mut self.modes, modes)
    }

    /// Make the next mode in the rotation active, returning its name.
    ///
    /// The previously active dynamic mode goes to the back of the queue.
    /// With an empty rotation nothing changes.
    pub fn next_dynamic_mode(&mut self) -> Option<&'static str> {
        if let Some(previous) = self.dynamic.take() {
            self.rotation.push_back(previous);
        }
        self.dynamic = self.rotation.pop_front();
        let name = self.dynamic.as_ref().map(Mode::name);
        if let Some(name) = name {
            self.lights.clear();
            tracing::info!(mode = name, active = ?self.active_modes(), "switched dynamic mode");
        }
        name
    }
}

/// How [`run`] paces and bounds the tick loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub interval: Duration,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Step the dynamic rotation every this many ticks.
    pub rotate_every: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_ticks: None,
            rotate_every: None,
        }
    }
}

/// Tick and render until `running` is cleared or `max_ticks` is reached,
/// then blank the output. Returns the number of ticks computed.
pub fn run<R: Renderer + ?Sized>(
    screen: &mut Display,
    renderer: &mut R,
    options: &RunOptions,
    running: &AtomicBool,
) -> Result<u64, RunError> {
    let rotate_every = options.rotate_every.filter(|&every| every > 0);
    let active = screen.active_modes();
    tracing::info!(
        interval_ms = options.interval.as_millis() as u64,
        modes = ?active,
        "tick loop started"
    );

    while is_running(running) {
        if options.max_ticks.is_some_and(|max| screen.ticks() >= max) {
            break;
        }
        screen.tick()?;
        renderer.render(screen.lights())?;

        if rotate_every.is_some_and(|every| screen.ticks() % every == 0) {
            screen.next_dynamic_mode();
        }
        thread::sleep(options.interval);
    }

    renderer.clear()?;
    let ticks = screen.ticks();
    tracing::info!(ticks, "tick loop stopped");
    Ok(ticks)
}
