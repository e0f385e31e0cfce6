use crate::clock::Clock;
use crate::lights::LightStore;
use crate::{Color, Coord, Result};
use chrono::Timelike;

/// A single marker that walks around its targets once a minute.
///
/// The current second picks the lit target, spread evenly over the list,
/// so on a 16x16 edge (60 lights) each second has its own light. Every
/// other target is turned off.
#[derive(Clone, Debug)]
pub struct EdgeSeconds {
    coords: Vec<Coord>,
    color: Color,
    clock: Clock,
}

impl EdgeSeconds {
    pub fn new(coords: Vec<Coord>, color: Color, clock: Clock) -> Self {
        Self {
            coords,
            color,
            clock,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        let second = self.clock.tick().second().min(59) as usize;
        let marker = second * self.coords.len() / 60;
        for (i, &coord) in self.coords.iter().enumerate() {
            if i == marker {
                lights.set_color(coord, self.color, Some(true))?;
            } else {
                lights.turn_off(coord)?;
            }
        }
        Ok(())
    }
}

/// Lights every target, then blanks them, on alternate ticks.
#[derive(Clone, Debug)]
pub struct TestEdge {
    coords: Vec<Coord>,
    color: Color,
    on: bool,
}

impl TestEdge {
    pub fn new(coords: Vec<Coord>, color: Color) -> Self {
        Self {
            coords,
            color,
            on: true,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        for &coord in &self.coords {
            lights.set_color(coord, self.color, Some(self.on))?;
        }
        self.on = !self.on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLUE, GREEN, GridSize};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lit(lights: &LightStore) -> Vec<Coord> {
        lights
            .iter()
            .filter(|(_, light)| light.on)
            .map(|(coord, _)| coord)
            .collect()
    }

    #[rstest]
    #[case(0, Coord::new(0, 0))]
    #[case(15, Coord::new(0, 15))]
    #[case(16, Coord::new(1, 15))]
    #[case(30, Coord::new(15, 15))]
    #[case(45, Coord::new(15, 0))]
    #[case(59, Coord::new(1, 0))]
    fn seconds_walk_the_square_edge(#[case] second: u32, #[case] expected: Coord) {
        let size = GridSize::new(16, 16);
        let mut lights = LightStore::new(size);
        let clock = Clock::fixed(NaiveTime::from_hms_opt(10, 30, second).unwrap());
        let mut mode = EdgeSeconds::new(size.edge_coords().unwrap(), BLUE, clock);

        mode.update(&mut lights).unwrap();
        assert_eq!(lit(&lights), vec![expected]);
        assert_eq!(lights.shown_color(expected).unwrap(), BLUE);
    }

    #[test]
    fn seconds_spread_over_a_shorter_edge() {
        let size = GridSize::new(4, 4);
        let mut lights = LightStore::new(size);
        let edge = size.edge_coords().unwrap();
        let clock = Clock::fixed(NaiveTime::from_hms_opt(0, 0, 30).unwrap());
        let mut mode = EdgeSeconds::new(edge.clone(), BLUE, clock);

        mode.update(&mut lights).unwrap();
        assert_eq!(lit(&lights), vec![edge[6]]);
    }

    #[test]
    fn seconds_clear_the_previous_marker() {
        let size = GridSize::new(16, 16);
        let mut lights = LightStore::new(size);
        lights.set_color(Coord::new(0, 3), GREEN, Some(true)).unwrap();
        let clock = Clock::fixed(NaiveTime::from_hms_opt(0, 0, 5).unwrap());
        EdgeSeconds::new(size.edge_coords().unwrap(), BLUE, clock)
            .update(&mut lights)
            .unwrap();
        assert_eq!(lit(&lights), vec![Coord::new(0, 5)]);
    }

    #[test]
    fn test_edge_alternates_on_and_off() {
        let size = GridSize::new(5, 5);
        let mut lights = LightStore::new(size);
        let edge = size.edge_coords().unwrap();
        let mut mode = TestEdge::new(edge.clone(), GREEN);

        mode.update(&mut lights).unwrap();
        assert!(edge.iter().all(|&c| lights.shown_color(c).unwrap() == GREEN));
        assert!(!lights.get(Coord::new(2, 2)).unwrap().on);

        mode.update(&mut lights).unwrap();
        assert!(lit(&lights).is_empty());

        mode.update(&mut lights).unwrap();
        assert_eq!(lit(&lights).len(), edge.len());
    }
}
