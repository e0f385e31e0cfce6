//! Word faces: the letter layouts printed over the light grid.
//!
//! A face is a list of letter rows. Each row is a run of words packed edge
//! to edge, so every letter sits over exactly one light. Filler words keep
//! the rows full-width and are never lit by the time words.

use crate::{Coord, GridSize};

/// Words that can be spelled out by the clock; everything else is filler.
const VOCABULARY: &[&str] = &[
    "it", "is", "a", "am", "pm", "quarter", "twenty", "five", "half", "ten", "to", "past", "one",
    "two", "three", "four", "six", "seven", "eight", "nine", "eleven", "twelve", "oclock",
];

/// 16x16 face with the words centred inside a blank border.
const SQUARE: &[&[&str]] = &[
    &[],
    &[],
    &[],
    &["xx", "It", "l", "is", "as", "AM", "y", "PM", "xx"],
    &["xx", "y", "a", "c", "quarter", "dc", "xx"],
    &["xx", "twenty", "y", "five", "r", "xx"],
    &["xx", "half", "sy", "ten", "f", "to", "xx"],
    &["xx", "past", "eruy", "nine", "xx"],
    &["xx", "one", "six", "y", "three", "xx"],
    &["xx", "four", "five", "y", "two", "xx"],
    &["xx", "eight", "y", "eleven", "xx"],
    &["xx", "seven", "y", "twelve", "xx"],
    &["xx", "ten", "sy", "oclock", "X", "xx"],
    &[],
    &[],
    &[],
];

const FULL: &[&[&str]] = &[
    &["It", "l", "is", "as", "AM", "PM"],
    &["a", "c", "quarter", "dc"],
    &["twenty", "five", "x"],
    &["half", "s", "ten", "f", "to"],
    &["past", "eru", "nine"],
    &["one", "six", "three"],
    &["four", "five", "two"],
    &["eight", "eleven"],
    &["seven", "twelve"],
    &["ten", "s", "oclock", "X"],
];

/// Quarter-hour face; it has no "it is".
const SIMPLE: &[&[&str]] = &[
    &["quarter", "half", "past"],
    &["to", "x", "nine", "one", "three"],
    &["two", "eight", "five", "six"],
    &["seven", "twelve", "four"],
    &["eleven", "ten", "oclock"],
];

pub const FACE_NAMES: &[&str] = &["square", "full", "simple"];

/// One word of a face and where its letters sit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: &'static str,
    pub row: i32,
    pub col: i32,
    /// Part of the clock's vocabulary rather than filler.
    pub used: bool,
}

impl Word {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The light under each letter, left to right.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.len() as i32).map(move |i| Coord::new(self.row, self.col + i))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordFace {
    name: &'static str,
    size: GridSize,
    words: Vec<Word>,
    simple: bool,
}

impl WordFace {
    /// One of the faces in [`FACE_NAMES`].
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "square" => Some(Self::from_layout("square", SQUARE, false)),
            "full" => Some(Self::from_layout("full", FULL, false)),
            "simple" => Some(Self::from_layout("simple", SIMPLE, true)),
            _ => None,
        }
    }

    fn from_layout(name: &'static str, layout: &[&[&'static str]], simple: bool) -> Self {
        let mut words = Vec::new();
        let mut cols = 0;
        for (row, line) in layout.iter().enumerate() {
            let mut col = 0;
            for &text in *line {
                words.push(Word {
                    text,
                    row: row as i32,
                    col,
                    used: VOCABULARY.iter().any(|v| v.eq_ignore_ascii_case(text)),
                });
                col += text.len() as i32;
            }
            cols = cols.max(col as u32);
        }
        Self {
            name,
            size: GridSize::new(layout.len() as u32, cols),
            words,
            simple,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Whether the face can only say quarter hours.
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Every word in reading order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn has_word(&self, text: &str) -> bool {
        self.words.iter().any(|w| w.matches(text))
    }

    /// Indices of the words spelling `text`, found in reading order.
    ///
    /// Each word of `text` is looked up after the previous match, so a
    /// repeated word ("five past five") lands on a later copy. On failure
    /// the word that could not be placed is returned.
    pub fn find_words<'t>(&self, text: &'t str) -> Result<Vec<usize>, &'t str> {
        let mut next = 0;
        let mut found = Vec::new();
        for wanted in text.split_whitespace() {
            let offset = self.words[next..]
                .iter()
                .position(|w| w.matches(wanted))
                .ok_or(wanted)?;
            found.push(next + offset);
            next += offset + 1;
        }
        Ok(found)
    }
}
