use crate::geometry::bounding_box;
use crate::lights::LightStore;
use crate::sand::{SandSettings, SandSimulation};
use crate::{Color, Coord, Error, GridSize, Result, random_triadic};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// How a [`SandSim`] mode drops grains and how long each run lasts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SandSimParams {
    /// Ticks between drops.
    pub drop_interval: usize,
    /// Grains attempted per drop.
    pub drop_count: usize,
    /// Ticks before the grid is emptied and the run starts over.
    pub max_sim_length: usize,
    /// Pick a new drop interval and palette every time a run ends.
    pub random_at_end: bool,
    pub settings: SandSettings,
    pub seed: Option<u64>,
}

impl Default for SandSimParams {
    fn default() -> Self {
        Self {
            drop_interval: 5,
            drop_count: 1,
            max_sim_length: 600,
            random_at_end: false,
            settings: SandSettings::default(),
            seed: None,
        }
    }
}

/// Runs a falling-sand simulation over a region of the display.
///
/// The simulation is sized to the bounding box of the target coordinates
/// and each grid value is drawn with the palette color of that sand type
/// (`palette[0]` is empty space).
pub struct SandSim {
    coords: Vec<Coord>,
    origin: Coord,
    simulation: SandSimulation,
    palette: Vec<Color>,
    drop_interval: usize,
    drop_count: usize,
    max_sim_length: usize,
    initial_drop_interval: usize,
    initial_max_sim_length: usize,
    random_at_end: bool,
    iteration: usize,
    rng: StdRng,
}

impl SandSim {
    pub fn new(coords: Vec<Coord>, palette: Vec<Color>, params: SandSimParams) -> Self {
        let (origin, size) =
            bounding_box(&coords).unwrap_or((Coord::new(0, 0), GridSize::new(0, 0)));
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let simulation = SandSimulation::with_seed(
            size.cols as usize,
            size.rows as usize,
            params.settings,
            rng.next_u64(),
        );
        Self {
            coords,
            origin,
            simulation,
            palette,
            drop_interval: params.drop_interval,
            drop_count: params.drop_count,
            max_sim_length: params.max_sim_length,
            initial_drop_interval: params.drop_interval,
            initial_max_sim_length: params.max_sim_length,
            random_at_end: params.random_at_end,
            iteration: 0,
            rng,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn simulation(&self) -> &SandSimulation {
        &self.simulation
    }

    /// Ticks since the current run started.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn drop_interval(&self) -> usize {
        self.drop_interval
    }

    pub fn max_sim_length(&self) -> usize {
        self.max_sim_length
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    fn update_error(reason: String) -> Error {
        Error::ModeUpdate {
            mode: "SandSim",
            reason,
        }
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        if self.drop_interval == 0 {
            return Err(Self::update_error("drop interval must be at least 1".to_string()));
        }
        let needed = self.simulation.settings().max_sand_types as usize + 1;
        if self.palette.len() < needed {
            return Err(Self::update_error(format!(
                "palette has {} colors but {needed} sand types (including empty) need one",
                self.palette.len()
            )));
        }

        self.simulation.update(self.iteration, self.drop_interval, self.drop_count);

        for &coord in &self.coords {
            let row = (coord.row - self.origin.row) as usize;
            let col = (coord.col - self.origin.col) as usize;
            let sand_type = self
                .simulation
                .cell(row, col)
                .ok_or_else(|| Self::update_error(format!("{coord} is outside the simulation")))?;
            let color = *self
                .palette
                .get(sand_type as usize)
                .ok_or_else(|| Self::update_error(format!("no color for sand type {sand_type}")))?;
            lights.set_color(coord, color, Some(true))?;
        }

        self.iteration += 1;
        if self.iteration >= self.max_sim_length {
            self.restart();
        }
        Ok(())
    }

    fn restart(&mut self) {
        tracing::debug!(
            grains = self.simulation.particle_count(),
            ticks = self.iteration,
            "sand run finished, emptying the grid"
        );
        self.simulation.reset();
        self.iteration = 0;
        if self.random_at_end {
            self.randomize();
        }
    }

    // Rescaling the run length with the interval keeps the number of
    // drops per run roughly constant.
    fn randomize(&mut self) {
        let initial = self.initial_drop_interval.max(1);
        self.drop_interval = self.rng.gen_range(1..2 * initial);
        self.max_sim_length = (self.initial_max_sim_length * self.drop_interval / initial).max(1);

        let triad = random_triadic(&mut self.rng);
        for (slot, color) in self.palette.iter_mut().skip(1).zip(triad) {
            *slot = color;
        }
        tracing::debug!(
            drop_interval = self.drop_interval,
            max_sim_length = self.max_sim_length,
            palette = ?&self.palette[1..],
            "sand run re-randomized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLACK;
    use pretty_assertions::assert_eq;

    fn palette() -> Vec<Color> {
        vec![
            BLACK,
            Color::new(230, 255, 0),
            Color::new(180, 255, 0),
            Color::new(140, 255, 0),
        ]
    }

    fn params(drop_interval: usize, max_sim_length: usize, seed: u64) -> SandSimParams {
        SandSimParams {
            drop_interval,
            drop_count: 1,
            max_sim_length,
            seed: Some(seed),
            ..SandSimParams::default()
        }
    }

    fn full_grid(size: GridSize) -> Vec<Coord> {
        size.box_coords(Coord::new(0, 0), size).unwrap()
    }

    #[test]
    fn run_resets_when_it_reaches_max_length() {
        let size = GridSize::new(16, 16);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(full_grid(size), palette(), params(5, 10, 1));

        for _ in 0..9 {
            mode.update(&mut lights).unwrap();
        }
        assert_eq!(mode.iteration(), 9);
        assert!(mode.simulation().particle_count() > 0);

        mode.update(&mut lights).unwrap();
        assert_eq!(mode.iteration(), 0);
        assert!(mode.simulation().is_empty());
    }

    #[test]
    fn first_tick_drops_a_grain_and_paints_it() {
        let size = GridSize::new(8, 8);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(full_grid(size), palette(), params(5, 100, 2));
        mode.update(&mut lights).unwrap();

        let grid = mode.simulation().grid();
        let col = grid[0].iter().position(|&t| t == 1).unwrap();
        assert_eq!(lights.shown_color(Coord::new(0, col as i32)).unwrap(), palette()[1]);
        let empty = (col + 1) % 8;
        let light = lights.get(Coord::new(0, empty as i32)).unwrap();
        assert!(light.on);
        assert_eq!(light.color, BLACK);
    }

    #[test]
    fn simulation_is_sized_to_the_region() {
        let size = GridSize::new(10, 10);
        let coords = size.box_coords(Coord::new(2, 3), GridSize::new(4, 6)).unwrap();
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(coords, palette(), params(1, 100, 3));
        assert_eq!(mode.simulation().width(), 6);
        assert_eq!(mode.simulation().height(), 4);

        mode.update(&mut lights).unwrap();
        let col = mode.simulation().grid()[0].iter().position(|&t| t != 0).unwrap();
        assert_eq!(
            lights.shown_color(Coord::new(2, 3 + col as i32)).unwrap(),
            palette()[1]
        );
        assert!(!lights.get(Coord::new(0, 0)).unwrap().on);
    }

    #[test]
    fn random_restart_rescales_the_run_and_palette() {
        let size = GridSize::new(16, 16);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(
            full_grid(size),
            palette(),
            SandSimParams {
                random_at_end: true,
                ..params(5, 10, 4)
            },
        );
        for _ in 0..10 {
            mode.update(&mut lights).unwrap();
        }

        assert_eq!(mode.iteration(), 0);
        let interval = mode.drop_interval();
        assert!((1..10).contains(&interval));
        assert_eq!(mode.max_sim_length(), (10 * interval / 5).max(1));
        assert_eq!(mode.palette()[0], BLACK);
        assert_ne!(mode.palette()[1..], palette()[1..]);

        let hues: Vec<f64> = mode.palette()[1..].iter().map(|c| c.to_hsl().0).collect();
        let apart = (hues[1] - hues[0]).rem_euclid(1.0) * 360.0;
        assert!((apart - 120.0).abs() < 2.0, "hues {hues:?}");
    }

    #[test]
    fn plain_restart_keeps_the_configuration() {
        let size = GridSize::new(4, 4);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(full_grid(size), palette(), params(2, 3, 5));
        for _ in 0..3 {
            mode.update(&mut lights).unwrap();
        }
        assert_eq!(mode.drop_interval(), 2);
        assert_eq!(mode.max_sim_length(), 3);
        assert_eq!(mode.palette(), &palette()[..]);
    }

    #[test]
    fn short_palette_is_an_update_error() {
        let size = GridSize::new(4, 4);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(full_grid(size), vec![BLACK, BLACK], params(2, 3, 6));
        let err = mode.update(&mut lights).unwrap_err();
        assert!(matches!(err, Error::ModeUpdate { mode: "SandSim", .. }));
    }

    #[test]
    fn zero_drop_interval_is_an_update_error() {
        let size = GridSize::new(4, 4);
        let mut lights = LightStore::new(size);
        let mut mode = SandSim::new(full_grid(size), palette(), params(0, 3, 7));
        assert!(mode.update(&mut lights).is_err());
    }
}
