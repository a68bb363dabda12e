//! # Tile Swap Library
//!
//! This library provides the core logic for a tile-swap color puzzle: an `N x N`
//! board is split into same-colored groups, the groups are scattered, and the
//! player swaps tiles to rebuild each color as a line or a solid rectangle.
//!
//! It is used by three binaries:
//! - `play`: Allows interactive gameplay via the command line.
//! - `inspect`: Takes a share code and prints every group with its shape and score.
//! - `generator_report`: Generates many seeded boards and reports plan and score
//!   statistics.
//!
//! ## Modules
//! - `config`: Colors, the default palette and accents, and the JSON-loadable `Config`.
//! - `engine`: The board (`Grid`) and the game state machine (`Session`) with
//!   selection, timed swaps, and score bookkeeping.
//! - `generator`: Group-size planning, color assignment, and grid building.
//! - `groups`: Connected-group discovery and shape classification.
//! - `scoring`: Scoring rules and the theoretical maximum score.
//! - `sharing`: Share-code encoding and decoding.
//! - `error`: Error types for the fallible operations above.
//! - `utils`: Utility functions, such as parsing grids from strings.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod groups;
pub mod scoring;
pub mod sharing;
pub mod utils;
