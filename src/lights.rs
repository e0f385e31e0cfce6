//! The addressable light grid.
//!
//! A [`LightStore`] owns a fixed `rows × cols` matrix of [`Light`]s. Modes
//! write to it once per tick and renderers read the shown colors back out.

use crate::{BLACK, Color, Coord, Error, GridSize, Result, WHITE};

/// A single light: an on/off flag and the color it shows when on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Light {
    pub on: bool,
    pub color: Color,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            on: false,
            color: WHITE,
        }
    }
}

impl Light {
    /// Set the color; `on: None` leaves the on/off state as it was.
    pub fn set_color(&mut self, color: Color, on: Option<bool>) {
        self.color = color;
        if let Some(on) = on {
            self.on = on;
        }
    }

    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    /// The color actually displayed: black while the light is off.
    pub fn shown_color(&self) -> Color {
        if self.on { self.color } else { BLACK }
    }
}

/// A `rows × cols` matrix of lights whose dimensions never change.
///
/// # Rust concept: private fields
/// `lights` is private, so nothing outside this module can push or pop a
/// row. Every access goes through [`LightStore::index`], which is where the
/// bounds check lives.
#[derive(Clone, Debug)]
pub struct LightStore {
    size: GridSize,
    lights: Vec<Light>,
}

impl LightStore {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            lights: vec![Light::default(); size.light_count()],
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Total number of lights (`rows * cols`).
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    // Negative components must be rejected here rather than wrapped.
    fn index(&self, coord: Coord) -> Result<usize> {
        if !self.size.contains(coord) {
            return Err(Error::NoSuchLight(coord));
        }
        Ok(coord.row as usize * self.size.cols as usize + coord.col as usize)
    }

    pub fn get(&self, coord: Coord) -> Result<&Light> {
        let i = self.index(coord)?;
        Ok(&self.lights[i])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Result<&mut Light> {
        let i = self.index(coord)?;
        Ok(&mut self.lights[i])
    }

    pub fn set_color(&mut self, coord: Coord, color: Color, on: Option<bool>) -> Result<()> {
        self.get_mut(coord)?.set_color(color, on);
        Ok(())
    }

    pub fn turn_on(&mut self, coord: Coord) -> Result<()> {
        self.get_mut(coord)?.turn_on();
        Ok(())
    }

    pub fn turn_off(&mut self, coord: Coord) -> Result<()> {
        self.get_mut(coord)?.turn_off();
        Ok(())
    }

    pub fn toggle(&mut self, coord: Coord) -> Result<()> {
        self.get_mut(coord)?.toggle();
        Ok(())
    }

    pub fn shown_color(&self, coord: Coord) -> Result<Color> {
        Ok(self.get(coord)?.shown_color())
    }

    /// Turn every light off and restore the default color.
    pub fn clear(&mut self) {
        self.lights.fill(Light::default());
    }

    /// Iterate over `(coordinate, light)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Light)> + '_ {
        let cols = self.size.cols as usize;
        self.lights.iter().enumerate().map(move |(i, light)| {
            (Coord::new((i / cols) as i32, (i % cols) as i32), light)
        })
    }

    /// Iterate over the lights one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Light]> + '_ {
        self.lights.chunks(self.size.cols.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RED;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn light() -> Light {
        Light::default()
    }

    // ── Light tests ────────────────────────────────────────────────

    #[rstest]
    fn light_default_is_off_and_white(light: Light) {
        assert!(!light.on);
        assert_eq!(light.color, WHITE);
    }

    #[rstest]
    fn light_can_be_turned_on_off_and_toggled(mut light: Light) {
        light.turn_on();
        assert!(light.on);
        light.turn_off();
        assert!(!light.on);
        light.toggle();
        assert!(light.on);
        light.toggle();
        assert!(!light.on);
    }

    #[rstest]
    fn set_color_can_switch_the_light(mut light: Light) {
        light.set_color(RED, Some(true));
        assert_eq!(light.color, RED);
        assert!(light.on);
        light.set_color(BLACK, Some(false));
        assert_eq!(light.color, BLACK);
        assert!(!light.on);
    }

    #[rstest]
    fn set_color_without_state_keeps_on_off(mut light: Light) {
        light.turn_on();
        light.set_color(RED, None);
        assert!(light.on);
        light.turn_off();
        light.set_color(WHITE, None);
        assert!(!light.on);
    }

    #[rstest]
    fn shown_color_is_black_when_off(mut light: Light) {
        light.turn_on();
        assert_eq!(light.shown_color(), WHITE);
        light.turn_off();
        assert_eq!(light.shown_color(), BLACK);
    }

    // ── LightStore tests ───────────────────────────────────────────

    #[test]
    fn store_has_one_light_per_cell() {
        let store = LightStore::new(GridSize::new(10, 12));
        assert_eq!(store.len(), 120);
        assert_eq!(store.rows().count(), 10);
        assert!(store.rows().all(|row| row.len() == 12));
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, -1)]
    #[case(-3, -3)]
    #[case(10, 0)]
    #[case(0, 12)]
    fn get_outside_the_grid_is_no_such_light(#[case] row: i32, #[case] col: i32) {
        let store = LightStore::new(GridSize::new(10, 12));
        let coord = Coord::new(row, col);
        assert_eq!(store.get(coord).unwrap_err(), Error::NoSuchLight(coord));
    }

    #[test]
    fn store_operations_address_a_single_light() {
        let mut store = LightStore::new(GridSize::new(3, 3));
        let target = Coord::new(1, 2);
        store.set_color(target, RED, Some(true)).unwrap();

        assert_eq!(store.shown_color(target).unwrap(), RED);
        assert_eq!(store.shown_color(Coord::new(2, 1)).unwrap(), BLACK);

        store.toggle(target).unwrap();
        assert_eq!(store.shown_color(target).unwrap(), BLACK);
        store.turn_on(target).unwrap();
        assert!(store.get(target).unwrap().on);
        store.turn_off(target).unwrap();
        assert!(!store.get(target).unwrap().on);
    }

    #[test]
    fn iter_is_row_major() {
        let store = LightStore::new(GridSize::new(2, 3));
        let order: Vec<Coord> = store.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(1, 0),
                Coord::new(1, 1),
                Coord::new(1, 2),
            ]
        );
    }

    #[test]
    fn clear_resets_every_light() {
        let mut store = LightStore::new(GridSize::new(2, 2));
        store.set_color(Coord::new(0, 0), RED, Some(true)).unwrap();
        store.clear();
        assert!(store.iter().all(|(_, light)| *light == Light::default()));
    }
}
