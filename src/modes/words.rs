use crate::clock::{Clock, Wording, time_to_words};
use crate::face::WordFace;
use crate::lights::LightStore;
use crate::{Color, Coord, Error, Result};

/// A word face laid over the grid with its top-left letter at `origin`.
#[derive(Clone, Debug)]
pub struct PlacedFace {
    face: WordFace,
    origin: Coord,
    cells: Vec<Coord>,
}

impl PlacedFace {
    pub fn new(face: WordFace, origin: Coord) -> Self {
        let cells = (0..face.words().len())
            .flat_map(|i| word_cells(&face, origin, i))
            .collect();
        Self {
            face,
            origin,
            cells,
        }
    }

    pub fn face(&self) -> &WordFace {
        &self.face
    }

    /// Every letter cell, word by word in reading order.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    fn word(&self, index: usize) -> impl Iterator<Item = Coord> + '_ {
        word_cells(&self.face, self.origin, index)
    }

    fn paint(&self, lights: &mut LightStore, index: usize, color: Color, on: bool) -> Result<()> {
        for coord in self.word(index) {
            lights.set_color(coord, color, Some(on))?;
        }
        Ok(())
    }
}

fn word_cells(face: &WordFace, origin: Coord, index: usize) -> impl Iterator<Item = Coord> + '_ {
    face.words()[index]
        .coords()
        .map(move |c| Coord::new(origin.row + c.row, origin.col + c.col))
}

/// Spells the time on a word face.
///
/// Every letter is blanked first, then the words of the phrase are lit.
/// A phrase the face cannot spell fails the tick and leaves the previous
/// frame showing.
#[derive(Clone, Debug)]
pub struct ClockFace {
    placed: PlacedFace,
    color: Color,
    wording: Wording,
    it_is: bool,
    clock: Clock,
}

impl ClockFace {
    /// `it_is` prefixes every phrase with "It is".
    pub fn new(
        placed: PlacedFace,
        color: Color,
        wording: Wording,
        it_is: bool,
        clock: Clock,
    ) -> Self {
        Self {
            placed,
            color,
            wording,
            it_is,
            clock,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        self.placed.cells()
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        let mut wording = self.wording;
        wording.simple |= self.placed.face().is_simple();
        let phrase = time_to_words(self.clock.tick(), wording);
        let text = if self.it_is {
            format!("It is {phrase}")
        } else {
            phrase
        };

        let face = self.placed.face();
        let found = face
            .find_words(&text)
            .map_err(|word| Error::ModeUpdate {
                mode: "ClockFace",
                reason: format!("the {} face cannot spell {word:?} in {text:?}", face.name()),
            })?;
        for &coord in self.placed.cells() {
            lights.turn_off(coord)?;
        }
        for index in found {
            self.placed.paint(lights, index, self.color, true)?;
        }
        Ok(())
    }
}

/// Flashes the face's words on and off together.
///
/// With an empty `only` list every vocabulary word flashes; otherwise just
/// the words named there.
#[derive(Clone, Debug)]
pub struct FlashWords {
    placed: PlacedFace,
    color: Color,
    selected: Vec<usize>,
    on: bool,
}

impl FlashWords {
    pub fn new(placed: PlacedFace, color: Color, only: &[String]) -> Self {
        let selected = placed
            .face()
            .words()
            .iter()
            .enumerate()
            .filter(|(_, w)| w.used)
            .filter(|(_, w)| only.is_empty() || only.iter().any(|o| w.matches(o)))
            .map(|(i, _)| i)
            .collect();
        Self {
            placed,
            color,
            selected,
            on: true,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        self.placed.cells()
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        for &index in &self.selected {
            self.placed.paint(lights, index, self.color, self.on)?;
        }
        self.on = !self.on;
        Ok(())
    }
}

/// Lights one vocabulary word per tick, in reading order, wrapping round.
#[derive(Clone, Debug)]
pub struct TestWords {
    placed: PlacedFace,
    color: Color,
    used: Vec<usize>,
    current: Option<usize>,
}

impl TestWords {
    pub fn new(placed: PlacedFace, color: Color) -> Self {
        let used = placed
            .face()
            .words()
            .iter()
            .enumerate()
            .filter(|(_, w)| w.used)
            .map(|(i, _)| i)
            .collect();
        Self {
            placed,
            color,
            used,
            current: None,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        self.placed.cells()
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        if self.used.is_empty() {
            return Ok(());
        }
        let next = match self.current {
            Some(current) => {
                self.placed.paint(lights, self.used[current], self.color, false)?;
                (current + 1) % self.used.len()
            }
            None => 0,
        };
        self.placed.paint(lights, self.used[next], self.color, true)?;
        self.current = Some(next);
        Ok(())
    }
}
