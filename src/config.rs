//! Mode presets: which modes run, over which region, with which settings.
//!
//! A preset is a JSON document describing a list of modes, applied in
//! order every tick, and an optional rotation pool the display steps
//! through between cycles:
//!
//! ```json
//! {
//!   "modes": [
//!     { "type": "cycle_colors", "region": "edge", "colors": ["#ff0000", [0, 0, 255]] },
//!     { "type": "sand_sim", "region": "all", "palette": [[0, 0, 0], [230, 255, 0]] }
//!   ],
//!   "rotation": [],
//!   "rotate_every": 300
//! }
//! ```
//!
//! ## Rust concepts
//! - `#[serde(tag = "type")]` for internally-tagged enums
//! - `#[serde(untagged)]` to accept either `[r, g, b]` or `"#rrggbb"`
//! - `#[serde(default = "...")]` for optional fields with non-zero defaults

use crate::clock::{Clock, ClockSettings, Wording};
use crate::face::{FACE_NAMES, WordFace};
use crate::media::{self, MediaError};
use crate::modes::{
    ClockFace, CycleColors, EdgeSeconds, Fill, FlashWords, Mode, PlacedFace, SandSim,
    SandSimParams, ShowImage, TestEdge, TestWords,
};
use crate::sand::SandSettings;
use crate::{BLACK, BLUE, Color, Coord, GREEN, GridSize, ORANGE, RED, WHITE, YELLOW, geometry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid preset: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Geometry(#[from] crate::Error),
    #[error("unknown preset {0:?}, expected one of: {names}", names = PRESET_NAMES.join(", "))]
    UnknownPreset(String),
    #[error("unknown face {0:?}, expected one of: {names}", names = FACE_NAMES.join(", "))]
    UnknownFace(String),
    #[error("invalid color {0:?}, expected \"#rrggbb\"")]
    InvalidColor(String),
    #[error("{0}")]
    Invalid(String),
}

// ── Colors and regions ───────────────────────────────────────────────

/// A color written either as `[r, g, b]` or as `"#rrggbb"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgb([u8; 3]),
    Hex(String),
}

impl ColorSpec {
    pub fn to_color(&self) -> Result<Color, ConfigError> {
        match self {
            ColorSpec::Rgb([r, g, b]) => Ok(Color::new(*r, *g, *b)),
            ColorSpec::Hex(hex) => {
                Color::from_hex(hex).ok_or_else(|| ConfigError::InvalidColor(hex.clone()))
            }
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(c: Color) -> Self {
        ColorSpec::Rgb([c.r, c.g, c.b])
    }
}

fn colors(specs: &[ColorSpec]) -> Result<Vec<Color>, ConfigError> {
    specs.iter().map(ColorSpec::to_color).collect()
}

/// The set of lights a mode targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    All,
    Edge,
    Ring(i32),
    Row(i32),
    Col(i32),
    Box { top_left: Coord, size: GridSize },
}

impl Region {
    pub fn coords(&self, grid: GridSize) -> crate::Result<Vec<Coord>> {
        match self {
            Region::All => Ok(grid.all_coords()),
            Region::Edge => grid.edge_coords(),
            Region::Ring(distance) => grid.ring_coords(*distance),
            Region::Row(row) => grid.row_coords(*row),
            Region::Col(col) => grid.col_coords(*col),
            Region::Box { top_left, size } => grid.box_coords(*top_left, *size),
        }
    }
}

// ── Modes ────────────────────────────────────────────────────────────

fn default_on() -> bool {
    true
}

fn default_drop_interval() -> usize {
    5
}

fn default_drop_count() -> usize {
    1
}

fn default_max_sim_length() -> usize {
    600
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModeConfig {
    CycleColors {
        region: Region,
        colors: Vec<ColorSpec>,
        #[serde(default)]
        synchronized: bool,
    },
    ShowImage {
        region: Region,
        /// Image, GIF or frame directory; relative paths start at the media dir.
        path: PathBuf,
    },
    SandSim {
        region: Region,
        /// Color per sand type; entry 0 is empty space.
        palette: Vec<ColorSpec>,
        #[serde(default = "default_drop_interval")]
        drop_interval: usize,
        #[serde(default = "default_drop_count")]
        drop_count: usize,
        #[serde(default = "default_max_sim_length")]
        max_sim_length: usize,
        #[serde(default)]
        random_at_end: bool,
        #[serde(default)]
        probability_of_cascading: Option<f64>,
        #[serde(default)]
        probability_of_switching: Option<f64>,
    },
    /// The time in words on one of the built-in faces.
    ClockFace {
        face: String,
        /// Grid position of the face's top-left letter.
        #[serde(default)]
        at: Coord,
        color: ColorSpec,
        #[serde(default)]
        wording: Wording,
        #[serde(default = "default_on")]
        it_is: bool,
    },
    EdgeSeconds {
        region: Region,
        color: ColorSpec,
    },
    TestEdge {
        region: Region,
        color: ColorSpec,
    },
    FlashWords {
        face: String,
        #[serde(default)]
        at: Coord,
        color: ColorSpec,
        /// Flash only these words; all of them when empty.
        #[serde(default)]
        words: Vec<String>,
    },
    TestWords {
        face: String,
        #[serde(default)]
        at: Coord,
        color: ColorSpec,
    },
    Fill {
        region: Region,
        color: ColorSpec,
        #[serde(default = "default_on")]
        on: bool,
    },
}

/// What building a mode needs to know beyond its own configuration.
#[derive(Clone, Debug)]
pub struct BuildContext {
    pub grid: GridSize,
    pub media_dir: PathBuf,
    pub seed: Option<u64>,
    /// Time source for the clock modes.
    pub clock: ClockSettings,
}

impl BuildContext {
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            media_dir: PathBuf::from("."),
            seed: None,
            clock: ClockSettings::default(),
        }
    }
}

/// A named face placed with its top-left letter at `at`, checked to fit.
fn place_face(name: &str, at: Coord, grid: GridSize) -> Result<PlacedFace, ConfigError> {
    let face = WordFace::named(name).ok_or_else(|| ConfigError::UnknownFace(name.to_string()))?;
    grid.box_coords(at, face.size())?;
    Ok(PlacedFace::new(face, at))
}

impl ModeConfig {
    /// The region a mode targets; word modes cover their face instead.
    pub fn region(&self) -> Option<&Region> {
        match self {
            ModeConfig::CycleColors { region, .. }
            | ModeConfig::ShowImage { region, .. }
            | ModeConfig::SandSim { region, .. }
            | ModeConfig::EdgeSeconds { region, .. }
            | ModeConfig::TestEdge { region, .. }
            | ModeConfig::Fill { region, .. } => Some(region),
            ModeConfig::ClockFace { .. }
            | ModeConfig::FlashWords { .. }
            | ModeConfig::TestWords { .. } => None,
        }
    }

    /// Build the mode, loading any images it needs now rather than per tick.
    ///
    /// `index` distinguishes seeds when several sand modes share one preset.
    pub fn build(&self, ctx: &BuildContext, index: usize) -> Result<Mode, ConfigError> {
        let coords = match self.region() {
            Some(region) => region.coords(ctx.grid)?,
            None => Vec::new(),
        };
        let mode = match self {
            ModeConfig::CycleColors {
                colors: specs,
                synchronized,
                ..
            } => CycleColors::new(coords, colors(specs)?, *synchronized).into(),

            ModeConfig::ShowImage { path, .. } => {
                let Some((_, size)) = geometry::bounding_box(&coords) else {
                    return Err(ConfigError::Invalid("image region is empty".to_string()));
                };
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    ctx.media_dir.join(path)
                };
                ShowImage::new(coords, media::load_frames(&path, size)?).into()
            }

            ModeConfig::SandSim {
                palette,
                drop_interval,
                drop_count,
                max_sim_length,
                random_at_end,
                probability_of_cascading,
                probability_of_switching,
                ..
            } => {
                let palette = colors(palette)?;
                if palette.len() < 2 {
                    return Err(ConfigError::Invalid(
                        "sand palette needs an empty color and at least one sand color"
                            .to_string(),
                    ));
                }
                let defaults = SandSettings::default();
                let settings = SandSettings {
                    probability_of_cascading: probability_of_cascading
                        .unwrap_or(defaults.probability_of_cascading),
                    probability_of_switching: probability_of_switching
                        .unwrap_or(defaults.probability_of_switching),
                    max_sand_types: (palette.len() - 1).min(u8::MAX as usize) as u8,
                };
                let params = SandSimParams {
                    drop_interval: *drop_interval,
                    drop_count: *drop_count,
                    max_sim_length: *max_sim_length,
                    random_at_end: *random_at_end,
                    settings,
                    seed: ctx.seed.map(|seed| seed.wrapping_add(index as u64)),
                };
                SandSim::new(coords, palette, params).into()
            }

            ModeConfig::ClockFace {
                face,
                at,
                color,
                wording,
                it_is,
            } => {
                let placed = place_face(face, *at, ctx.grid)?;
                let clock = Clock::new(ctx.clock);
                ClockFace::new(placed, color.to_color()?, *wording, *it_is, clock).into()
            }

            ModeConfig::EdgeSeconds { color, .. } => {
                EdgeSeconds::new(coords, color.to_color()?, Clock::new(ctx.clock)).into()
            }

            ModeConfig::TestEdge { color, .. } => TestEdge::new(coords, color.to_color()?).into(),

            ModeConfig::FlashWords {
                face,
                at,
                color,
                words,
            } => FlashWords::new(place_face(face, *at, ctx.grid)?, color.to_color()?, words).into(),

            ModeConfig::TestWords { face, at, color } => {
                TestWords::new(place_face(face, *at, ctx.grid)?, color.to_color()?).into()
            }

            ModeConfig::Fill { color, on, .. } => Fill::new(coords, color.to_color()?, *on).into(),
        };
        Ok(mode)
    }
}

// ── Presets ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub modes: Vec<ModeConfig>,
    /// Modes the display rotates through between cycles.
    #[serde(default)]
    pub rotation: Vec<ModeConfig>,
    /// Ticks between rotations; no rotation when absent.
    #[serde(default)]
    pub rotate_every: Option<u64>,
}

pub const PRESET_NAMES: &[&str] = &[
    "clock", "colors", "sand-sim", "weather", "rainbow", "word-test",
];

impl DisplayConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// One of the built-in presets listed in [`PRESET_NAMES`].
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let config = match name {
            "clock" => Self {
                modes: vec![
                    ModeConfig::ClockFace {
                        face: "square".to_string(),
                        at: Coord::default(),
                        color: WHITE.into(),
                        wording: Wording::default(),
                        it_is: true,
                    },
                    ModeConfig::EdgeSeconds {
                        region: Region::Edge,
                        color: BLUE.into(),
                    },
                ],
                rotation: vec![cycle(Region::Edge, &[RED, WHITE, BLUE], false)],
                rotate_every: Some(600),
            },
            "colors" => Self {
                modes: vec![
                    cycle(Region::Edge, &[RED, BLUE, GREEN], false),
                    cycle(Region::Ring(1), &[ORANGE, YELLOW], false),
                    cycle(
                        Region::Box {
                            top_left: Coord::new(3, 4),
                            size: GridSize::new(2, 4),
                        },
                        &[YELLOW, WHITE],
                        true,
                    ),
                ],
                rotation: Vec::new(),
                rotate_every: None,
            },
            "sand-sim" => Self {
                modes: vec![sand(false)],
                rotation: Vec::new(),
                rotate_every: None,
            },
            "weather" => Self {
                modes: vec![ModeConfig::ShowImage {
                    region: Region::All,
                    path: PathBuf::from("images").join("cloudy_weather.gif"),
                }],
                rotation: Vec::new(),
                rotate_every: None,
            },
            "rainbow" => {
                let hues: Vec<Color> = (0..12).map(|i| Color::from_hue(i * 30)).collect();
                Self {
                    modes: vec![cycle(Region::All, &hues, false)],
                    rotation: vec![
                        sand(true),
                        cycle(Region::Edge, &[RED, WHITE, BLUE], false),
                        cycle(Region::Ring(1), &[ORANGE, YELLOW], true),
                    ],
                    rotate_every: Some(200),
                }
            }
            "word-test" => Self {
                modes: vec![
                    ModeConfig::TestWords {
                        face: "square".to_string(),
                        at: Coord::default(),
                        color: GREEN.into(),
                    },
                    ModeConfig::TestEdge {
                        region: Region::Edge,
                        color: RED.into(),
                    },
                ],
                rotation: Vec::new(),
                rotate_every: None,
            },
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        Ok(config)
    }

    pub fn build_modes(&self, ctx: &BuildContext) -> Result<Vec<Mode>, ConfigError> {
        build_all(&self.modes, ctx, 0)
    }

    pub fn build_rotation(&self, ctx: &BuildContext) -> Result<Vec<Mode>, ConfigError> {
        build_all(&self.rotation, ctx, self.modes.len())
    }
}

fn build_all(
    configs: &[ModeConfig],
    ctx: &BuildContext,
    first_index: usize,
) -> Result<Vec<Mode>, ConfigError> {
    configs
        .iter()
        .enumerate()
        .map(|(i, config)| config.build(ctx, first_index + i))
        .collect()
}

fn cycle(region: Region, palette: &[Color], synchronized: bool) -> ModeConfig {
    ModeConfig::CycleColors {
        region,
        colors: palette.iter().copied().map(ColorSpec::from).collect(),
        synchronized,
    }
}

fn sand(random_at_end: bool) -> ModeConfig {
    ModeConfig::SandSim {
        region: Region::All,
        palette: [
            BLACK,
            Color::new(230, 255, 0),
            Color::new(180, 255, 0),
            Color::new(140, 255, 0),
        ]
        .map(ColorSpec::from)
        .to_vec(),
        drop_interval: 5,
        drop_count: 1,
        max_sim_length: 600,
        random_at_end,
        probability_of_cascading: None,
        probability_of_switching: None,
    }
}
