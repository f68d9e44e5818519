//! The 15x15 playing surface and its premium squares
//!
//! A `Board` pairs a grid of placed tiles with a premium layout. The layout is
//! built once from configuration and shared read-only between boards through
//! an `Arc`, so a rematch gets a fresh grid without rebuilding premiums.

use shared::{coordinate_label, parse_coordinate, standard_premium_layout, Premium};
use shared::{BLANK, BOARD_SIZE, CENTER, EMPTY_CELL};
use std::sync::Arc;

/// A tile on the board or in a move
///
/// Blank tiles carry the letter they stand for and score nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub letter: char,
    pub blank: bool,
}

impl Tile {
    pub fn letter(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            blank: false,
        }
    }

    pub fn blank(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            blank: true,
        }
    }

    /// The symbol this tile occupies in a rack
    pub fn rack_symbol(&self) -> char {
        if self.blank {
            BLANK
        } else {
            self.letter
        }
    }
}

impl From<char> for Tile {
    fn from(letter: char) -> Self {
        Tile::letter(letter)
    }
}

/// Immutable premium-square table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumLayout {
    squares: [[Premium; BOARD_SIZE]; BOARD_SIZE],
}

impl PremiumLayout {
    /// A layout with no premium squares at all
    pub fn plain() -> Self {
        Self {
            squares: [[Premium::Plain; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn standard() -> Self {
        Self::from_squares(standard_premium_layout())
    }

    /// Builds a layout from (row, col, premium) entries; off-board entries are ignored
    pub fn from_squares<I>(squares: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, Premium)>,
    {
        let mut layout = Self::plain();
        for (row, col, premium) in squares {
            if row < BOARD_SIZE && col < BOARD_SIZE {
                layout.squares[row][col] = premium;
            }
        }
        layout
    }

    pub fn get(&self, row: usize, col: usize) -> Premium {
        self.squares
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }
}

impl Default for PremiumLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    cells: [[Option<Tile>; BOARD_SIZE]; BOARD_SIZE],
    premiums: Arc<PremiumLayout>,
}

impl Board {
    pub fn new(premiums: Arc<PremiumLayout>) -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            premiums,
        }
    }

    /// An empty board with the standard premium layout
    pub fn standard() -> Self {
        Self::new(Arc::new(PremiumLayout::standard()))
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// Letter at (row, col), `None` for empty or off-board cells
    pub fn tile_at(&self, row: usize, col: usize) -> Option<char> {
        self.tile(row, col).map(|t| t.letter)
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Places a tile without any rule checks
    ///
    /// Callers validate the move first; this is the only way board state changes.
    /// Off-board coordinates are ignored.
    pub fn set_tile(&mut self, row: usize, col: usize, tile: impl Into<Tile>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Some(tile.into());
        }
    }

    pub fn coordinate_label(&self, row: usize, col: usize) -> String {
        coordinate_label(row, col)
    }

    pub fn premium_at(&self, row: usize, col: usize) -> Premium {
        self.premiums.get(row, col)
    }

    /// Premium of a labelled square such as `H8`, plain when the label is not on the board
    pub fn multiplier_at(&self, coordinate: &str) -> Premium {
        parse_coordinate(coordinate)
            .map(|(row, col)| self.premium_at(row, col))
            .unwrap_or_default()
    }

    pub fn premiums(&self) -> &Arc<PremiumLayout> {
        &self.premiums
    }

    pub fn is_center_empty(&self) -> bool {
        self.tile_at(CENTER, CENTER).is_none()
    }

    pub fn letters_on_board(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.cells = [[None; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Row-major snapshot: `.` for empty, uppercase letters, lowercase for blanks
    pub fn snapshot(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|cell| match cell {
                None => EMPTY_CELL,
                Some(tile) if tile.blank => tile.letter.to_ascii_lowercase(),
                Some(tile) => tile.letter,
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
