//! Scoring of realized groups.
//!
//! A `ScoringRule` turns one group into points. `StandardRules` is the rule set the
//! game ships with: a color only scores once all of its tiles form a single line
//! or a solid rectangle.
use crate::config::Color;
use crate::engine::Grid;
use crate::groups::{find_groups, Group, ShapeKind};
use std::collections::HashMap;

/// A way of scoring a single group on a given grid.
pub trait ScoringRule {
    fn score_group(&self, group: &Group, grid: &Grid) -> u64;
}

/// The default rules.
///
/// - A group scores nothing unless it holds every tile of its color on the board.
/// - A line scores its length.
/// - A solid rectangle of `w x h` cells scores `cells * w * h`.
/// - Any other shape scores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl StandardRules {
    /// Score of a complete `width x height` arrangement of `cells` tiles.
    ///
    /// Callers are expected to have classified the shape already; `cells` is
    /// compared against the area to reject shapes with holes. The arithmetic is done
    /// in `u64`, which holds the score of any board `Config::validate` accepts.
    pub fn shape_score(cells: usize, width: usize, height: usize) -> u64 {
        let (cells, width, height) = (cells as u64, width as u64, height as u64);
        if cells < 2 {
            0
        } else if width == 1 || height == 1 {
            cells
        } else if cells == width * height {
            cells * width * height
        } else {
            0
        }
    }
}

impl ScoringRule for StandardRules {
    fn score_group(&self, group: &Group, grid: &Grid) -> u64 {
        if group.len() != grid.count_color(group.color) {
            return 0;
        }
        match group.shape() {
            ShapeKind::Irregular => 0,
            ShapeKind::Line | ShapeKind::Rectangle => {
                Self::shape_score(group.len(), group.bounds.width(), group.bounds.height())
            }
        }
    }
}

/// Sums `rule` over `groups`.
pub fn score(groups: &[Group], grid: &Grid, rule: &dyn ScoringRule) -> u64 {
    groups.iter().map(|g| rule.score_group(g, grid)).sum()
}

/// Finds the groups on `grid` and scores them with `rule`.
///
/// # Examples
/// ```
/// use tileswap::config::default_palette;
/// use tileswap::scoring::{score_grid, StandardRules};
/// use tileswap::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["AAB", "AAB", "CCC"], &default_palette()).unwrap();
/// // A 2x2 square (16) + a line of 2 (2) + a line of 3 (3).
/// assert_eq!(score_grid(&grid, &StandardRules), 21);
/// ```
pub fn score_grid(grid: &Grid, rule: &dyn ScoringRule) -> u64 {
    score(&find_groups(grid), grid, rule)
}

/// Number of tiles of each color on the grid. Empty cells are not counted.
pub fn count_by_color(grid: &Grid) -> HashMap<Color, usize> {
    let mut counts = HashMap::new();
    for (_, color) in grid.iter() {
        if let Some(color) = color {
            *counts.entry(color).or_insert(0) += 1;
        }
    }
    counts
}

/// Best standard score `k` tiles of one color could reach in any rectangle.
///
/// Tries every factor pair `w * h == k`. Fewer than two tiles score nothing.
pub fn best_score_for_count(k: usize) -> u64 {
    if k < 2 {
        return 0;
    }
    (1..=k)
        .take_while(|w| w * w <= k)
        .filter(|w| k % w == 0)
        .map(|w| StandardRules::shape_score(k, w, k / w))
        .max()
        .unwrap_or(0)
}

/// Upper bound on the standard score for this grid's color counts.
///
/// Ignores where tiles actually are; each color is scored as if it were arranged
/// in its best possible rectangle.
pub fn max_possible_score(grid: &Grid) -> u64 {
    count_by_color(grid)
        .into_values()
        .map(best_score_for_count)
        .sum()
}
