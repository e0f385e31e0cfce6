use crate::lights::LightStore;
use crate::{Color, Coord, Error, Result};

/// Rotates a palette over a set of lights.
///
/// Unsynchronized, coordinate `i` gets the color `i` places after the
/// current head, so the palette travels along the coordinate list.
/// Synchronized, every coordinate shows the head color. Either way the head
/// advances by one after each tick.
#[derive(Clone, Debug)]
pub struct CycleColors {
    coords: Vec<Coord>,
    palette: Vec<Color>,
    head: usize,
    synchronized: bool,
}

impl CycleColors {
    pub fn new(coords: Vec<Coord>, palette: Vec<Color>, synchronized: bool) -> Self {
        Self {
            coords,
            palette,
            head: 0,
            synchronized,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn synchronized(&self) -> bool {
        self.synchronized
    }

    /// The palette in its current rotation, head first.
    pub fn palette(&self) -> Vec<Color> {
        let (front, back) = self.palette.split_at(self.head);
        back.iter().chain(front).copied().collect()
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        let len = self.palette.len();
        if len == 0 {
            return Err(Error::ModeUpdate {
                mode: "CycleColors",
                reason: "there are no colors in the palette".to_string(),
            });
        }

        for (i, &coord) in self.coords.iter().enumerate() {
            let step = if self.synchronized { 0 } else { i };
            let color = self.palette[(self.head + step) % len];
            lights.set_color(coord, color, Some(true))?;
        }

        self.head = (self.head + 1) % len;
        Ok(())
    }
}
