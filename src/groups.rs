//! Connected-group discovery on a realized grid.
//!
//! A group is a maximal set of same-colored cells connected horizontally or
//! vertically (never diagonally). Groups of one cell are never reported.
use crate::config::Color;
use crate::engine::{Cell, Grid};
use std::collections::VecDeque;

/// Inclusive bounding box of a set of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl Bounds {
    fn at((r, c): Cell) -> Self {
        Bounds {
            min_row: r,
            max_row: r,
            min_col: c,
            max_col: c,
        }
    }

    fn include(&mut self, (r, c): Cell) {
        self.min_row = self.min_row.min(r);
        self.max_row = self.max_row.max(r);
        self.min_col = self.min_col.min(c);
        self.max_col = self.max_col.max(c);
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }
}

/// How a group's cells fill its bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A single row or column.
    Line,
    /// A hole-free rectangle at least two cells in each direction.
    Rectangle,
    /// Anything else: L-shapes, crosses, rectangles with holes.
    Irregular,
}

/// A connected set of same-colored cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    /// Cells sorted row-major.
    pub cells: Vec<Cell>,
    pub bounds: Bounds,
}

impl Group {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn shape(&self) -> ShapeKind {
        if self.bounds.width() == 1 || self.bounds.height() == 1 {
            ShapeKind::Line
        } else if self.len() == self.bounds.area() {
            ShapeKind::Rectangle
        } else {
            ShapeKind::Irregular
        }
    }
}

/// Breadth-first flood fill from `start`, marking every reached cell in `visited`.
fn flood(grid: &Grid, start: Cell, color: Color, visited: &mut [bool]) -> Group {
    let n = grid.size();
    let mut cells = Vec::new();
    let mut bounds = Bounds::at(start);
    let mut q = VecDeque::new();

    q.push_back(start);
    visited[start.0 * n + start.1] = true;

    let dr = [-1, 1, 0, 0];
    let dc = [0, 0, -1, 1];

    while let Some((r, c)) = q.pop_front() {
        cells.push((r, c));
        bounds.include((r, c));

        for i in 0..4 {
            let nr = r as isize + dr[i];
            let nc = c as isize + dc[i];
            if nr < 0 || nc < 0 || nr >= n as isize || nc >= n as isize {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            if !visited[nr * n + nc] && grid.get(nr, nc) == Some(color) {
                visited[nr * n + nc] = true;
                q.push_back((nr, nc));
            }
        }
    }

    cells.sort_unstable();
    Group {
        color,
        cells,
        bounds,
    }
}

/// Finds every group of two or more connected same-colored cells.
///
/// Each cell is visited once; empty cells are skipped. Groups come out ordered by
/// their first cell (row-major), and cells within a group are sorted.
///
/// # Arguments
/// * `grid`: The board to search. It may contain empty cells.
///
/// # Returns
/// A `Vec<Group>`, each carrying its color, sorted cells and bounding box. No cell
/// appears in more than one group, and single cells are left out. An empty `Vec`
/// means no two neighboring cells share a color.
///
/// # Examples
/// ```
/// use tileswap::config::default_palette;
/// use tileswap::groups::find_groups;
/// use tileswap::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["AAB", "CAB", "CDE"], &default_palette()).unwrap();
/// let groups = find_groups(&grid);
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups[0].cells, vec![(0, 0), (0, 1), (1, 1)]);
/// ```
pub fn find_groups(grid: &Grid) -> Vec<Group> {
    let n = grid.size();
    let mut visited = vec![false; n * n];
    let mut groups = Vec::new();

    for ((r, c), color) in grid.iter() {
        let Some(color) = color else { continue };
        if visited[r * n + c] {
            continue;
        }
        let group = flood(grid, (r, c), color, &mut visited);
        if group.len() >= 2 {
            groups.push(group);
        }
    }

    groups
}

/// Returns the group containing `cell`, if that cell belongs to one.
///
/// `None` when the cell is outside the grid, empty, or has no same-colored neighbor.
pub fn group_at(grid: &Grid, cell: Cell) -> Option<Group> {
    if !grid.in_bounds(cell) {
        return None;
    }
    let color = grid.get(cell.0, cell.1)?;
    let mut visited = vec![false; grid.size() * grid.size()];
    let group = flood(grid, cell, color, &mut visited);
    (group.len() >= 2).then_some(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_palette;
    use crate::utils::grid_from_str_array;

    fn grid(rows: &[&str]) -> Grid {
        grid_from_str_array(rows, &default_palette()).unwrap()
    }

    fn sizes(grid: &Grid) -> Vec<usize> {
        let mut sizes: Vec<usize> = find_groups(grid).iter().map(Group::len).collect();
        sizes.sort_unstable();
        sizes
    }

    #[test]
    fn test_empty_grid_has_no_groups() {
        assert!(find_groups(&Grid::new_empty(3)).is_empty());
    }

    #[test]
    fn test_single_items_are_not_groups() {
        assert!(find_groups(&grid(&["A.", ".B"])).is_empty());
    }

    #[test]
    fn test_horizontal_and_vertical_groups() {
        assert_eq!(sizes(&grid(&["AAA", "...", "..."])), vec![3]);
        assert_eq!(sizes(&grid(&["B.", "B."])), vec![2]);
    }

    #[test]
    fn test_two_separate_groups() {
        assert_eq!(sizes(&grid(&["AA.", "...", ".BB"])), vec![2, 2]);
    }

    #[test]
    fn test_diagonal_cells_are_not_connected() {
        assert!(find_groups(&grid(&["C..", ".C.", "..."])).is_empty());
    }

    #[test]
    fn test_same_color_not_touching() {
        assert!(find_groups(&grid(&["B.B", "...", "..."])).is_empty());
        assert_eq!(sizes(&grid(&["BB.", "...", ".BB"])), vec![2, 2]);
    }

    #[test]
    fn test_large_group_is_not_split() {
        assert_eq!(sizes(&grid(&["AAA", "AAA", "AAA"])), vec![9]);
    }

    #[test]
    fn test_groups_are_ordered_and_sorted() {
        let grid = grid(&[
            "AA.BB.", // Group AA, group BBB (with (1,3))
            "CC.B..", // Group CC
            "......",
            "DDD...", // Group DDD
            "...EE.", // Group EE
            ".....A", // Lonely A
        ]);
        let groups = find_groups(&grid);
        let cells: Vec<Vec<Cell>> = groups.iter().map(|g| g.cells.clone()).collect();
        assert_eq!(
            cells,
            vec![
                vec![(0, 0), (0, 1)],
                vec![(0, 3), (0, 4), (1, 3)],
                vec![(1, 0), (1, 1)],
                vec![(3, 0), (3, 1), (3, 2)],
                vec![(4, 3), (4, 4)],
            ]
        );
        let palette = default_palette();
        assert_eq!(groups[1].color, palette[1]);
    }

    #[test]
    fn test_bounds_and_shape() {
        let l_shape = &find_groups(&grid(&["AAA", "A..", "..."]))[0];
        assert_eq!(
            l_shape.bounds,
            Bounds {
                min_row: 0,
                max_row: 1,
                min_col: 0,
                max_col: 2
            }
        );
        assert_eq!(l_shape.bounds.width(), 3);
        assert_eq!(l_shape.bounds.height(), 2);
        assert_eq!(l_shape.shape(), ShapeKind::Irregular);

        let line = &find_groups(&grid(&[".B.", ".B.", ".B."]))[0];
        assert_eq!(line.shape(), ShapeKind::Line);

        let square = &find_groups(&grid(&["CC.", "CC.", "..."]))[0];
        assert_eq!(square.shape(), ShapeKind::Rectangle);
        assert_eq!(square.bounds.area(), 4);

        let ring = &find_groups(&grid(&["DDD", "D.D", "DDD"]))[0];
        assert_eq!(ring.len(), 8);
        assert_eq!(ring.shape(), ShapeKind::Irregular);
    }

    #[test]
    fn test_every_cell_in_at_most_one_group() {
        let grid = grid(&["AABBA", "ABBAA", "CCDDA", "CEDDE", "EEEEE"]);
        let groups = find_groups(&grid);
        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            for &cell in &group.cells {
                assert!(seen.insert(cell), "{:?} appears twice", cell);
                assert_eq!(grid.get(cell.0, cell.1), Some(group.color));
            }
        }
    }

    #[test]
    fn test_group_at() {
        let grid = grid(&["AA.", "ABC", "..C"]);
        let group = group_at(&grid, (1, 0)).unwrap();
        assert_eq!(group.cells, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(group_at(&grid, (2, 2)).unwrap().cells, vec![(1, 2), (2, 2)]);
        assert_eq!(group_at(&grid, (1, 1)), None); // Lonely B
        assert_eq!(group_at(&grid, (0, 2)), None); // Empty cell
        assert_eq!(group_at(&grid, (5, 5)), None); // Off the board
    }
}
