//! Core game engine for the tile-swap puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Grid`: the square board of colored tiles and its terminal rendering.
//! - `Session`: one player's game, including board generation, the
//!   select → swap → transition → rescore cycle, move count and score history.
use crate::config::{contrast_color, Color, Config};
use crate::error::{ConfigError, DecodeError, SwapError};
use crate::generator;
use crate::scoring::{self, StandardRules};
use crate::sharing;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fmt;

/// A `(row, column)` position on the grid, 0-based.
pub type Cell = (usize, usize);

/// A square grid of optional tile colors, stored row-major.
///
/// `None` marks an empty cell. Generated and decoded boards are always full;
/// empty cells only appear in hand-built grids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    /// Creates a `size` x `size` grid with every cell empty.
    ///
    /// # Examples
    /// ```
    /// use tileswap::engine::Grid;
    /// let grid = Grid::new_empty(4);
    /// assert_eq!(grid.size(), 4);
    /// assert_eq!(grid.get(3, 3), None);
    /// ```
    pub fn new_empty(size: usize) -> Self {
        Grid {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Creates a grid from row-major cells.
    ///
    /// # Panics
    /// Panics if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<Option<Color>>) -> Self {
        assert_eq!(
            cells.len(),
            size * size,
            "a {}x{} grid needs {} cells",
            size,
            size,
            size * size
        );
        Grid { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the color at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the grid.
    pub fn get(&self, r: usize, c: usize) -> Option<Color> {
        assert!(self.in_bounds((r, c)), "cell ({}, {}) is outside the grid", r, c);
        self.cells[r * self.size + c]
    }

    /// Sets the color at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the grid.
    pub fn set(&mut self, r: usize, c: usize, color: Option<Color>) {
        assert!(self.in_bounds((r, c)), "cell ({}, {}) is outside the grid", r, c);
        self.cells[r * self.size + c] = color;
    }

    pub fn in_bounds(&self, (r, c): Cell) -> bool {
        r < self.size && c < self.size
    }

    /// Exchanges the contents of two cells.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        let first = self.get(a.0, a.1);
        let second = self.get(b.0, b.1);
        self.set(a.0, a.1, second);
        self.set(b.0, b.1, first);
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<Color>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &color)| ((i / self.size, i % self.size), color))
    }

    /// Number of cells holding `color`.
    pub fn count_color(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Renders the grid with row/column headers and 24-bit ANSI tile colors.
    ///
    /// Cells listed in `highlight` are marked with `<>` drawn in the color returned by
    /// `accent` for that tile.
    pub fn to_string_with_highlight(
        &self,
        highlight: &[Cell],
        accent: impl Fn(Color) -> Color,
    ) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..self.size {
            output.push_str(&format!("{:<2}", c_idx));
        }
        output.push('\n');

        for r_idx in 0..self.size {
            output.push_str(&format!("{:<2}", r_idx));

            for c_idx in 0..self.size {
                let is_highlight = highlight.contains(&(r_idx, c_idx));
                match self.get(r_idx, c_idx) {
                    Some(color) => {
                        let mark = accent(color);
                        let content = if is_highlight { "<>" } else { "  " };
                        output.push_str(&format!(
                            "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m{}\x1b[m",
                            color.r, color.g, color.b, mark.r, mark.g, mark.b, content
                        ));
                    }
                    None => {
                        let content = if is_highlight { "<>" } else { "  " };
                        output.push_str(&format!("\x1b[40m{}\x1b[m", content));
                    }
                }
            }
            if r_idx + 1 < self.size {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[], contrast_color))
    }
}

/// A swap that has been accepted but not yet applied to the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapTransition {
    pub from: Cell,
    pub to: Cell,
    elapsed: f64,
    duration: f64,
}

impl SwapTransition {
    /// Animation progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }
}

/// What a click on a cell did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectOutcome {
    Selected(Cell),
    Deselected,
    /// A swap between the previously selected cell and the clicked one began.
    /// `duration` is how long the transition runs, for animation and audio.
    SwapStarted { from: Cell, to: Cell, duration: f64 },
}

/// Manages the state of one game.
///
/// The session exclusively owns its grid. Cells change only when a swap transition
/// finishes inside `tick`, and the score is recomputed exactly once per finished swap.
///
/// # Examples
/// ```
/// use tileswap::config::Config;
/// use tileswap::engine::Session;
///
/// let mut session = Session::new(Config::default(), Some(7)).unwrap();
/// assert!(session.grid().is_full());
/// assert_eq!(session.score_history(), &[session.score()]);
///
/// session.request_swap((0, 0), (0, 1)).unwrap();
/// assert!(session.request_swap((1, 0), (1, 1)).is_err()); // still animating
/// while !session.tick(1.0 / 60.0) {}
/// assert_eq!(session.score_history().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    config: Config,
    rng: SmallRng,
    grid: Grid,
    plan: Vec<usize>,
    selected: Option<Cell>,
    transition: Option<SwapTransition>,
    score: u64,
    max_score: u64,
    moves: u32,
    score_history: Vec<u64>,
    color_counts: HashMap<Color, usize>,
    share_code: Option<String>,
    custom_board: bool,
}

impl Session {
    /// Starts a session on a freshly generated board.
    ///
    /// With `seed` the sequence of generated boards is reproducible; without it the
    /// generator is seeded from system entropy.
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let board = generator::generate(&config, &mut rng);
        let mut session = Session {
            grid: Grid::new_empty(config.grid_size),
            config,
            rng,
            plan: Vec::new(),
            selected: None,
            transition: None,
            score: 0,
            max_score: 0,
            moves: 0,
            score_history: Vec::new(),
            color_counts: HashMap::new(),
            share_code: None,
            custom_board: false,
        };
        session.reset_board(board.grid, board.plan, false);
        Ok(session)
    }

    /// Replaces the board with a newly generated one and resets all counters.
    pub fn new_board(&mut self) {
        let board = generator::generate(&self.config, &mut self.rng);
        self.reset_board(board.grid, board.plan, false);
    }

    /// Replaces the board with the one described by a share code.
    ///
    /// On error the session is left exactly as it was.
    pub fn load_share_code(&mut self, code: &str) -> Result<(), DecodeError> {
        let grid = sharing::decode(code.trim(), &self.config.palette, self.config.grid_size)?;
        self.reset_board(grid, Vec::new(), true);
        Ok(())
    }

    /// Replaces the board with a hand-built grid of the configured size.
    pub fn load_grid(&mut self, grid: Grid) -> Result<(), DecodeError> {
        if grid.size() != self.config.grid_size {
            return Err(DecodeError::InvalidLength {
                expected: self.config.total_cells(),
                found: grid.size() * grid.size(),
            });
        }
        self.reset_board(grid, Vec::new(), true);
        Ok(())
    }

    fn reset_board(&mut self, grid: Grid, plan: Vec<usize>, custom_board: bool) {
        self.grid = grid;
        self.plan = plan;
        self.custom_board = custom_board;
        self.selected = None;
        self.transition = None;
        self.score = scoring::score_grid(&self.grid, &StandardRules);
        self.max_score = scoring::max_possible_score(&self.grid);
        self.moves = 0;
        self.score_history = vec![self.score];
        self.color_counts = scoring::count_by_color(&self.grid);
        self.share_code = match sharing::encode(&self.grid, &self.config.palette) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("sharing disabled for this board: {}", e);
                None
            }
        };
        info!(
            "new {} board: score {} of {} possible, {} colors",
            if custom_board { "custom" } else { "random" },
            self.score,
            self.max_score,
            self.color_counts.len()
        );
    }

    /// Handles a click on `cell`.
    ///
    /// The first click selects a cell, a second click on the same cell clears the
    /// selection, and a click on any other cell starts a swap with the selected one.
    /// Rejected clicks leave the session unchanged.
    pub fn select(&mut self, cell: Cell) -> Result<SelectOutcome, SwapError> {
        if self.transition.is_some() {
            return Err(SwapError::SwapInFlight);
        }
        if !self.grid.in_bounds(cell) {
            return Err(SwapError::OutOfBounds {
                row: cell.0,
                col: cell.1,
            });
        }
        match self.selected {
            None => {
                self.selected = Some(cell);
                Ok(SelectOutcome::Selected(cell))
            }
            Some(prev) if prev == cell => {
                self.selected = None;
                Ok(SelectOutcome::Deselected)
            }
            Some(prev) => {
                let duration = self.request_swap(prev, cell)?;
                Ok(SelectOutcome::SwapStarted {
                    from: prev,
                    to: cell,
                    duration,
                })
            }
        }
    }

    /// Starts a swap transition between `a` and `b` and returns its duration.
    ///
    /// The grid itself is not touched until the transition finishes in `tick`.
    /// An accepted request clears the selection and counts as one move.
    ///
    /// # Arguments
    /// * `a`, `b`: The two cells to exchange, as `(row, col)`.
    ///
    /// # Returns
    /// * `Ok(duration)` with the transition length in seconds (from
    ///   `Config::swap_duration`, already validated to be finite and non-negative).
    /// * `Err(SwapError)` if:
    ///     - another swap is still in flight.
    ///     - either cell is outside the board.
    ///     - `a == b`.
    ///     - `adjacent_swaps_only` is set and the cells are not orthogonal neighbors.
    ///
    /// A rejected request leaves the session unchanged.
    pub fn request_swap(&mut self, a: Cell, b: Cell) -> Result<f64, SwapError> {
        if self.transition.is_some() {
            return Err(SwapError::SwapInFlight);
        }
        for cell in [a, b] {
            if !self.grid.in_bounds(cell) {
                return Err(SwapError::OutOfBounds {
                    row: cell.0,
                    col: cell.1,
                });
            }
        }
        if a == b {
            return Err(SwapError::SameCell);
        }
        if self.config.adjacent_swaps_only && a.0.abs_diff(b.0) + a.1.abs_diff(b.1) != 1 {
            return Err(SwapError::NotAdjacent(a, b));
        }

        let duration = self.config.swap_duration;
        self.transition = Some(SwapTransition {
            from: a,
            to: b,
            elapsed: 0.0,
            duration,
        });
        self.selected = None;
        self.moves += 1;
        debug!("swap {:?} <-> {:?} started ({:.2}s)", a, b, duration);
        Ok(duration)
    }

    /// Advances the in-flight transition by `dt` seconds.
    ///
    /// Returns `true` on the tick the transition finishes: the two cells are swapped,
    /// the score is recomputed and appended to the history. Returns `false` otherwise,
    /// including when nothing is in flight.
    pub fn tick(&mut self, dt: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.elapsed += dt.max(0.0);
        if !transition.is_finished() {
            return false;
        }

        let SwapTransition { from, to, .. } = *transition;
        self.transition = None;
        self.grid.swap(from, to);
        self.score = scoring::score_grid(&self.grid, &StandardRules);
        self.score_history.push(self.score);
        debug!("swap {:?} <-> {:?} resolved, score {}", from, to, self.score);
        true
    }

    pub fn is_swapping(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&SwapTransition> {
        self.transition.as_ref()
    }

    pub fn selected(&self) -> Option<Cell> {
        self.selected
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Group sizes the current board was generated from. Empty for loaded boards.
    pub fn plan(&self) -> &[usize] {
        &self.plan
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    /// Number of swaps started on this board.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// The initial score followed by the score after each finished swap.
    pub fn score_history(&self) -> &[u64] {
        &self.score_history
    }

    pub fn color_counts(&self) -> &HashMap<Color, usize> {
        &self.color_counts
    }

    /// Share code of the current board, if its palette can be encoded.
    pub fn share_code(&self) -> Option<&str> {
        self.share_code.as_deref()
    }

    /// True when the board came from a share code or a hand-built grid.
    pub fn is_custom_board(&self) -> bool {
        self.custom_board
    }

    /// Renders the board, marking the selected cell and any cells in transition.
    pub fn render(&self) -> String {
        let mut highlight: Vec<Cell> = self.selected.into_iter().collect();
        if let Some(t) = &self.transition {
            highlight.extend([t.from, t.to]);
        }
        self.grid
            .to_string_with_highlight(&highlight, |color| self.config.accent_for(color))
    }
}
