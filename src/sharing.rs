//! Share codes: a whole board as one short string.
//!
//! Each cell becomes one symbol of `ALPHABET`, read row-major. Symbol `i` stands
//! for palette color `i`, so a code only means something together with the
//! palette and grid size it was made with.
use crate::config::Color;
use crate::engine::Grid;
use crate::error::{DecodeError, EncodeError};

/// The 64 share-code symbols, in palette-index order.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Palette index for a share-code symbol.
pub fn symbol_index(symbol: char) -> Option<usize> {
    if !symbol.is_ascii() {
        return None;
    }
    ALPHABET.iter().position(|&b| b == symbol as u8)
}

/// Encodes a fully populated grid.
///
/// # Examples
/// ```
/// use tileswap::config::default_palette;
/// use tileswap::sharing::{decode, encode};
/// use tileswap::utils::grid_from_str_array;
///
/// let palette = default_palette();
/// let grid = grid_from_str_array(&["AB", "BA"], &palette).unwrap();
/// let code = encode(&grid, &palette).unwrap();
/// assert_eq!(code, "ABBA");
/// assert_eq!(decode(&code, &palette, 2).unwrap(), grid);
/// ```
pub fn encode(grid: &Grid, palette: &[Color]) -> Result<String, EncodeError> {
    if palette.len() > ALPHABET.len() {
        return Err(EncodeError::PaletteTooLarge {
            colors: palette.len(),
            symbols: ALPHABET.len(),
        });
    }

    let mut code = String::with_capacity(grid.size() * grid.size());
    for ((row, col), color) in grid.iter() {
        let color = color.ok_or(EncodeError::EmptyCell { row, col })?;
        let index = palette
            .iter()
            .position(|&c| c == color)
            .ok_or(EncodeError::UnknownColor { row, col, color })?;
        code.push(ALPHABET[index] as char);
    }
    Ok(code)
}

/// Decodes a code into a `size x size` grid.
///
/// # Arguments
/// * `code`: The share code. Surrounding whitespace is not stripped here.
/// * `palette`: The palette the code was encoded with; symbol `i` is `palette[i]`.
/// * `size`: Side length of the board the code describes.
///
/// # Returns
/// * `Ok(Grid)`: a fully populated grid.
/// * `Err(DecodeError)` if:
///     - `palette` has more colors than `ALPHABET` has symbols.
///     - the code does not have exactly `size * size` characters.
///     - a character is not a share symbol, or names an index past the palette.
pub fn decode(code: &str, palette: &[Color], size: usize) -> Result<Grid, DecodeError> {
    if palette.len() > ALPHABET.len() {
        return Err(DecodeError::PaletteTooLarge {
            colors: palette.len(),
            symbols: ALPHABET.len(),
        });
    }

    let expected = size * size;
    let found = code.chars().count();
    if found != expected {
        return Err(DecodeError::InvalidLength { expected, found });
    }

    let cells = code
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            symbol_index(symbol)
                .and_then(|i| palette.get(i).copied())
                .map(Some)
                .ok_or(DecodeError::UnknownSymbol { position, symbol })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Grid::from_cells(size, cells))
}
