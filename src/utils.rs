use crate::config::Color;
use crate::engine::Grid;
use crate::sharing::symbol_index;

/// Parses an array of string slices into a square `Grid`.
///
/// Each string slice is one row, starting from row 0. The number of rows sets the
/// grid size, and every row must have exactly that many characters.
///
/// Tiles use the share-code symbols (`A` is `palette[0]`, `B` is `palette[1]`, ...,
/// then `a`-`z`, `0`-`9`, `-`, `_`), and `.` is an empty cell. A symbol past the end
/// of `palette` is an error.
///
/// # Examples
/// ```
/// use tileswap::config::{default_palette, RED};
/// use tileswap::utils::grid_from_str_array;
///
/// let palette = default_palette();
/// let grid = grid_from_str_array(&["AB", "B."], &palette).unwrap();
/// assert_eq!(grid.size(), 2);
/// assert_eq!(grid.get(0, 0), Some(RED));
/// assert_eq!(grid.get(1, 0), Some(palette[1]));
/// assert_eq!(grid.get(1, 1), None);
///
/// assert!(grid_from_str_array(&["A!", "BB"], &palette).is_err());
/// assert!(grid_from_str_array(&["AAA", "BB"], &palette).is_err());
/// ```
pub fn grid_from_str_array(rows: &[&str], palette: &[Color]) -> Result<Grid, String> {
    let size = rows.len();
    if size == 0 {
        return Err("Expected at least one row".to_string());
    }

    let mut cells = Vec::with_capacity(size * size);
    for (r, row_str) in rows.iter().enumerate() {
        let len = row_str.chars().count();
        if len != size {
            return Err(format!(
                "Row {} has {} characters, expected {} for a {}x{} grid",
                r, len, size, size, size
            ));
        }

        for (c, ch) in row_str.chars().enumerate() {
            if ch == '.' {
                cells.push(None);
                continue;
            }
            let color = symbol_index(ch)
                .and_then(|i| palette.get(i).copied())
                .ok_or_else(|| {
                    format!("Unrecognized character '{}' in row {} col {}", ch, r, c)
                })?;
            cells.push(Some(color));
        }
    }

    Ok(Grid::from_cells(size, cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_palette;

    #[test]
    fn test_grid_from_str_array_valid() {
        let palette = default_palette();
        let grid = grid_from_str_array(&["ABC", "...", "uAB"], &palette).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(0, 0), Some(palette[0]));
        assert_eq!(grid.get(0, 2), Some(palette[2]));
        assert_eq!(grid.get(1, 1), None);
        assert_eq!(grid.get(2, 0), Some(palette[20])); // 'u' is index 20
        assert!(!grid.is_full());
    }

    #[test]
    fn test_grid_from_str_array_invalid_char() {
        let result = grid_from_str_array(&["AX", "AA"], &[Color::rgb(1, 2, 3)]);
        assert!(result.unwrap_err().contains("Unrecognized character 'X'"));
    }

    #[test]
    fn test_grid_from_str_array_with_spaces() {
        let result = grid_from_str_array(&["A B", "AAA", "BBB"], &default_palette());
        assert!(result.unwrap_err().contains("Unrecognized character ' '"));
    }

    #[test]
    fn test_grid_from_str_array_ragged_rows() {
        let palette = default_palette();
        let too_long = grid_from_str_array(&["AAA", "BB"], &palette);
        assert!(too_long.unwrap_err().contains("Row 0 has 3 characters"));
        let too_short = grid_from_str_array(&["AA", "B"], &palette);
        assert!(too_short.unwrap_err().contains("Row 1 has 1 characters"));
    }

    #[test]
    fn test_grid_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(grid_from_str_array(&rows, &default_palette())
            .unwrap_err()
            .contains("at least one row"));
    }

    #[test]
    fn test_grid_from_str_array_full_grid() {
        let palette = default_palette();
        let grid = grid_from_str_array(&["AB", "BA"], &palette).unwrap();
        assert!(grid.is_full());
        assert_eq!(grid.count_color(palette[0]), 2);
    }
}
