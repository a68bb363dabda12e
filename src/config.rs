//! Game configuration: palette, accent colors, board dimensions and generation bounds.
//!
//! A `Config` is an immutable value handed by reference to every component that
//! needs it. It can be built from `Config::default()` or loaded from a JSON file in
//! which any field may be omitted:
//!
//! ```json
//! { "grid_size": 8, "planner": "greedy", "palette": ["#ed3f27", "#ffcc00", "#34c759"] }
//! ```

use crate::error::{ColorParseError, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// An RGBA color. Tiles are compared by exact channel equality.
///
/// Serialized as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
///
/// # Examples
/// ```
/// use tileswap::config::Color;
/// let c: Color = "#ed3f27".parse().unwrap();
/// assert_eq!(c, Color::rgb(237, 63, 39));
/// assert_eq!(c.to_string(), "#ed3f27");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Perceived brightness in `0..=255` (Rec. 601 weights).
    pub fn luminance(&self) -> u32 {
        (299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32) / 1000
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength(hex.len()));
        }
        // `from_str_radix` alone would accept a leading '+'.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidHex(s.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

pub const RED: Color = Color::rgb(237, 63, 39);
pub const OLD_RED: Color = Color::rgb(171, 68, 89);
pub const YELLOW: Color = Color::rgb(255, 204, 0);
pub const GREEN: Color = Color::rgb(52, 199, 89);
pub const BLUE: Color = Color::rgb(0, 122, 255);
pub const BLACK: Color = Color::rgb(27, 24, 51);
pub const LIGHT_BROWN: Color = Color::rgb(210, 180, 140);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const CRIMSON_RED: Color = Color::rgb(220, 20, 60);
pub const PLUME: Color = Color::rgb(107, 63, 105);
pub const GREY: Color = Color::rgb(55, 53, 62);
pub const LIGHT_GREY: Color = Color::rgb(211, 218, 217);
pub const PEACH: Color = Color::rgb(242, 159, 88);
pub const ORANGE: Color = Color::rgb(255, 149, 0);
pub const PURPLE: Color = Color::rgb(175, 82, 222);
pub const CYAN: Color = Color::rgb(50, 173, 230);
pub const MAGENTA: Color = Color::rgb(255, 45, 85);
pub const LIME: Color = Color::rgb(204, 255, 0);
pub const TEAL: Color = Color::rgb(90, 200, 250);
pub const BROWN: Color = Color::rgb(162, 132, 94);
pub const PINK: Color = Color::rgb(255, 105, 180);
pub const GOLD: Color = Color::rgb(255, 215, 0);
pub const SILVER: Color = Color::rgb(192, 192, 192);
pub const DARK_GREEN: Color = Color::rgb(10, 64, 12);

/// The curated 21-color tile palette, in share-code order.
pub fn default_palette() -> Vec<Color> {
    vec![
        RED, YELLOW, GREEN, BLUE, BLACK, LIGHT_BROWN, PLUME, GREY, PEACH, OLD_RED, ORANGE,
        PURPLE, CYAN, MAGENTA, LIME, TEAL, BROWN, PINK, GOLD, SILVER, DARK_GREEN,
    ]
}

/// Contrasting accent for each palette color, used to draw selection marks on a tile.
pub fn default_accents() -> HashMap<Color, Color> {
    HashMap::from([
        (RED, ORANGE),
        (YELLOW, RED),
        (GREEN, BLACK),
        (BLUE, WHITE),
        (BLACK, CRIMSON_RED),
        (LIGHT_BROWN, BLACK),
        (PLUME, WHITE),
        (GREY, LIGHT_GREY),
        (PEACH, OLD_RED),
        (OLD_RED, PEACH),
        (ORANGE, WHITE),
        (PURPLE, WHITE),
        (CYAN, BLACK),
        (MAGENTA, WHITE),
        (LIME, BLACK),
        (TEAL, BLACK),
        (BROWN, WHITE),
        (PINK, BLACK),
        (GOLD, BLACK),
        (SILVER, RED),
        (DARK_GREEN, WHITE),
    ])
}

/// Black on bright colors, white on dark ones.
pub fn contrast_color(color: Color) -> Color {
    if color.luminance() > 140 {
        BLACK
    } else {
        WHITE
    }
}

/// Largest accepted board side. A single color filling the board scores `n^4`,
/// which must fit in a `u64` score.
pub const MAX_GRID_SIZE: usize = 1024;

/// Longest accepted swap transition, in seconds.
pub const MAX_SWAP_DURATION: f64 = 10.0;

/// Which group-size planner board generation uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PlanStrategy {
    /// Random sizes drawn uniformly from the group size bounds.
    Greedy,
    /// Aim for the default size histogram, falling back to `Greedy`.
    Targeted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered, deduplicated tile colors. Order defines share-code symbols.
    pub palette: Vec<Color>,
    pub accents: HashMap<Color, Color>,
    /// Width and height of the square board.
    pub grid_size: usize,
    pub min_group_size: usize,
    pub max_group_size: usize,
    pub planner: PlanStrategy,
    /// Length of a swap transition in seconds.
    pub swap_duration: f64,
    /// When set, only orthogonally adjacent cells may be swapped.
    pub adjacent_swaps_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            palette: default_palette(),
            accents: default_accents(),
            grid_size: 10,
            min_group_size: 2,
            max_group_size: 10,
            planner: PlanStrategy::Targeted,
            swap_duration: 0.25,
            adjacent_swaps_only: false,
        }
    }
}

impl Config {
    /// Parses a JSON config; omitted fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that a board can always be generated from this config.
    ///
    /// `max >= 2 * min - 1` keeps the planner's remainder split inside the bounds.
    /// A palette larger than the share alphabet is accepted here; it only disables
    /// share codes.
    ///
    /// # Returns
    /// * `Ok(())` if the config is usable.
    /// * `Err(ConfigError)` if:
    ///     - `grid_size` is outside `[2, MAX_GRID_SIZE]`.
    ///     - the group size bounds are infeasible or the board is smaller than `min`.
    ///     - `swap_duration` is negative, not finite, or above `MAX_SWAP_DURATION`.
    ///     - the palette is empty or lists a color twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::InvalidGridSize {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        let (min, max) = (self.min_group_size, self.max_group_size);
        if min < 2 || max + 1 < 2 * min {
            return Err(ConfigError::InvalidGroupBounds { min, max });
        }
        if self.total_cells() < min {
            return Err(ConfigError::BoardTooSmall {
                cells: self.total_cells(),
                min,
            });
        }
        if !(0.0..=MAX_SWAP_DURATION).contains(&self.swap_duration) {
            return Err(ConfigError::InvalidSwapDuration {
                value: self.swap_duration,
                max: MAX_SWAP_DURATION,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let mut seen = HashSet::new();
        for &color in &self.palette {
            if !seen.insert(color) {
                return Err(ConfigError::DuplicateColor(color));
            }
        }
        Ok(())
    }

    pub fn total_cells(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Accent color for drawing on top of a `color` tile.
    ///
    /// Colors without a configured accent get black or white by brightness.
    pub fn accent_for(&self, color: Color) -> Color {
        self.accents
            .get(&color)
            .copied()
            .unwrap_or_else(|| contrast_color(color))
    }

    pub fn palette_index(&self, color: Color) -> Option<usize> {
        self.palette.iter().position(|&c| c == color)
    }
}
