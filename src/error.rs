use std::path::PathBuf;
use crate::position::PosError;
use crate::session::GameState;

/// Errors that can occur when building a board from a fixed layout.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("tile type {tile} is outside the palette of {palette_size} types")]
    TileOutsidePalette { tile: u8, palette_size: u8 },

    #[error("a board needs at least 2 tile types, got {0}")]
    PaletteTooSmall(u8),
}

/// Errors returned by the mutating entry points of a game session.
///
/// A swap that does not create a match is not an error. It is reported as
/// a rejected swap instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    OutOfRange(#[from] PosError),

    #[error("cells {first:?} and {second:?} are not adjacent")]
    InvalidMove {
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("operation not allowed while the session is {0}")]
    NotReady(GameState),

    #[error("no board with a legal move found after {0} attempts")]
    NoPlayableBoard(u32),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
