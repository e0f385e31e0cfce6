//! Falling-sand cellular automaton.
//!
//! The grid is `height × width` small integers: `0` is empty and `1..=N`
//! names a sand type. Each step lets every grain fall one cell, sometimes
//! sliding diagonally off a pile, then drops new grains in at the top on a
//! fixed cadence.
//!
//! ## Rust concepts
//! - Owning a seedable RNG (`StdRng`) so tests can replay exact runs
//! - `Vec<Vec<u8>>` indexed `[row][col]`, mutated in place
//! - `(a..b).rev()` to scan bottom-up

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tuning knobs for the automaton.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SandSettings {
    /// Chance that a grain resting on another still tries to slide diagonally.
    pub probability_of_cascading: f64,
    /// Chance after each injected grain that the next grain uses the next type.
    pub probability_of_switching: f64,
    /// Number of distinct sand types; types run `1..=max_sand_types`.
    pub max_sand_types: u8,
}

impl Default for SandSettings {
    fn default() -> Self {
        Self {
            probability_of_cascading: 0.8,
            probability_of_switching: 0.05,
            max_sand_types: 3,
        }
    }
}

fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

pub struct SandSimulation {
    width: usize,
    height: usize,
    grid: Vec<Vec<u8>>,
    settings: SandSettings,
    current_sand_type: u8,
    rng: StdRng,
}

impl SandSimulation {
    pub fn new(width: usize, height: usize, settings: SandSettings) -> Self {
        Self::with_rng(width, height, settings, StdRng::from_entropy())
    }

    /// Same as [`SandSimulation::new`] but reproducible: one seed, one run.
    pub fn with_seed(width: usize, height: usize, settings: SandSettings, seed: u64) -> Self {
        Self::with_rng(width, height, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, settings: SandSettings, rng: StdRng) -> Self {
        let settings = SandSettings {
            probability_of_cascading: probability(settings.probability_of_cascading),
            probability_of_switching: probability(settings.probability_of_switching),
            max_sand_types: settings.max_sand_types.max(1),
        };
        Self {
            width,
            height,
            grid: vec![vec![0; width]; height],
            settings,
            current_sand_type: 1,
            rng,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn settings(&self) -> SandSettings {
        self.settings
    }

    /// The sand type the next injected grain will have.
    pub fn current_sand_type(&self) -> u8 {
        self.current_sand_type
    }

    pub fn grid(&self) -> &[Vec<u8>] {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        self.grid.get(row)?.get(col).copied()
    }

    /// Put a grain of `sand_type` (or `0` to clear) at `(row, col)`.
    ///
    /// Returns `false` if the position is outside the grid.
    pub fn place(&mut self, row: usize, col: usize, sand_type: u8) -> bool {
        match self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = sand_type;
                true
            }
            None => false,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&t| t != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_count() == 0
    }

    /// Empty the grid.
    pub fn reset(&mut self) {
        for row in &mut self.grid {
            row.fill(0);
        }
    }

    /// Advance one step.
    ///
    /// Grains move first. Then, when `iteration` is a multiple of
    /// `drop_interval`, `drop_count` grains are dropped into random columns
    /// of the top row; a drop onto an occupied cell is skipped.
    pub fn update(&mut self, iteration: usize, drop_interval: usize, drop_count: usize) {
        self.settle();
        if drop_interval > 0 && iteration % drop_interval == 0 {
            self.inject(drop_count);
        }
    }

    // The bottom row is the floor. Scanning upward means a grain that
    // just moved into row r+1 is never visited again this step.
    fn settle(&mut self) {
        for row in (0..self.height.saturating_sub(1)).rev() {
            for col in 0..self.width {
                let sand_type = self.grid[row][col];
                if sand_type == 0 {
                    continue;
                }
                let below = row + 1;
                let target = if self.grid[below][col] == 0 {
                    Some(col)
                } else if self.rng.gen_bool(self.settings.probability_of_cascading) {
                    self.diagonal_target(below, col)
                } else {
                    None
                };
                if let Some(target) = target {
                    self.grid[below][target] = sand_type;
                    self.grid[row][col] = 0;
                }
            }
        }
    }

    fn diagonal_target(&mut self, below: usize, col: usize) -> Option<usize> {
        let left = col > 0 && self.grid[below][col - 1] == 0;
        let right = col + 1 < self.width && self.grid[below][col + 1] == 0;
        match (left, right) {
            (true, true) => Some(if self.rng.gen_bool(0.5) { col - 1 } else { col + 1 }),
            (true, false) => Some(col - 1),
            (false, true) => Some(col + 1),
            (false, false) => None,
        }
    }

    fn inject(&mut self, drop_count: usize) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for _ in 0..drop_count {
            let col = self.rng.gen_range(0..self.width);
            if self.grid[0][col] == 0 {
                self.grid[0][col] = self.current_sand_type;
            }
            if self.rng.gen_bool(self.settings.probability_of_switching) {
                self.current_sand_type = self.current_sand_type % self.settings.max_sand_types + 1;
            }
        }
    }
}
