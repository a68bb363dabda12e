//! Error types shared across the crate.
//!
//! Each fallible surface gets its own enum so callers can match on exactly the
//! failures that surface can produce:
//! - `ConfigError`: an unusable `Config` (bad bounds, empty palette, unreadable file).
//! - `EncodeError`: a grid that cannot be turned into a share code.
//! - `DecodeError`: a share code that cannot be turned back into a grid.
//! - `SwapError`: a swap request the session refuses.
//!
//! Broken internal invariants (a plan that does not sum to the board area, a color
//! sequence of the wrong length) are not represented here; they are bugs and panic.

use crate::config::Color;
use thiserror::Error;

/// Failure to parse a `#rrggbb` / `#rrggbbaa` color string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#', found {0:?}")]
    MissingHash(String),
    #[error("color must have 6 or 8 hex digits, found {0}")]
    InvalidLength(usize),
    #[error("invalid hex digits in color {0:?}")]
    InvalidHex(String),
}

/// A configuration that cannot drive board generation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be between 2 and {max}, found {size}")]
    InvalidGridSize { size: usize, max: usize },
    #[error("invalid group size bounds [{min}, {max}]: need min >= 2 and max >= 2 * min - 1")]
    InvalidGroupBounds { min: usize, max: usize },
    #[error("a {cells}-cell board cannot hold a single group of at least {min} cells")]
    BoardTooSmall { cells: usize, min: usize },
    #[error("swap duration must be a finite number of seconds in [0, {max}], found {value}")]
    InvalidSwapDuration { value: f64, max: f64 },
    #[error("palette is empty")]
    EmptyPalette,
    #[error("palette lists {0} more than once")]
    DuplicateColor(Color),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A grid that cannot be turned into a share code.
///
/// None of these are fatal to play; the session simply has no code to offer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("palette has {colors} colors but the share alphabet only has {symbols} symbols")]
    PaletteTooLarge { colors: usize, symbols: usize },
    #[error("cell ({row}, {col}) is empty")]
    EmptyCell { row: usize, col: usize },
    #[error("cell ({row}, {col}) has color {color} which is not in the palette")]
    UnknownColor { row: usize, col: usize, color: Color },
}

/// A share code that cannot be turned back into a grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("share code has {found} symbols, expected {expected}")]
    InvalidLength { expected: usize, found: usize },
    #[error("symbol {symbol:?} at position {position} does not map to a palette color")]
    UnknownSymbol { position: usize, symbol: char },
    #[error("palette has {colors} colors but the share alphabet only has {symbols} symbols")]
    PaletteTooLarge { colors: usize, symbols: usize },
}

/// A swap request the session refuses. The session state is unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    #[error("a swap is already in progress")]
    SwapInFlight,
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("cannot swap a cell with itself")]
    SameCell,
    #[error("cells ({0:?}) and ({1:?}) are not adjacent")]
    NotAdjacent((usize, usize), (usize, usize)),
}
