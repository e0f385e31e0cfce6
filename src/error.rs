//! Error kinds raised by the display engine.
//!
//! All of these are local conditions the caller can recover from: the engine
//! never retries or silently clamps a bad request.

use crate::Coord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A geometry request fell outside the grid.
    #[error("{what} is out of range for a {rows}x{cols} grid")]
    OutOfRange { what: String, rows: u32, cols: u32 },

    /// A light was addressed outside the light store, including negative indices.
    #[error("no light found at {0}")]
    NoSuchLight(Coord),

    /// A mode was asked to run with an unusable configuration.
    #[error("{mode} mode cannot update: {reason}")]
    ModeUpdate { mode: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
