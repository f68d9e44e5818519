//! Move descriptors and blank-tile normalization
//!
//! A move is written `WORD DIRECTION COLUMN ROW`, for example `HORN H F 8`.
//! A blank tile is a `-` followed by the letter it stands for, so `COMP-UTER`
//! plays a blank as the `U`. The word is kept in two aligned forms:
//!
//! - board form, `COMPUTER`, the letters that end up on the board
//! - rack form, `COMP-TER`, the tiles that must come out of the rack

use crate::board::Tile;
use crate::error::MoveError;
use shared::{parse_column, parse_row, Direction, BLANK};
use std::fmt;

const MAX_BLANKS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    tiles: Vec<Tile>,
    direction: Direction,
    row: usize,
    col: usize,
}

impl Move {
    pub fn new(word: &str, direction: Direction, row: usize, col: usize) -> Result<Self, MoveError> {
        Ok(Self {
            tiles: parse_word(word)?,
            direction,
            row,
            col,
        })
    }

    /// Parses `WORD DIRECTION COLUMN ROW`
    pub fn parse(input: &str) -> Result<Self, MoveError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let &[word, direction, column, row] = tokens.as_slice() else {
            return Err(MoveError::Malformed(format!(
                "expected WORD DIRECTION COLUMN ROW, got {:?}",
                input
            )));
        };

        let direction: Direction = direction
            .parse()
            .map_err(|_| MoveError::Malformed(format!("bad direction {:?}", direction)))?;

        let mut column_chars = column.chars();
        let col = match (column_chars.next(), column_chars.next()) {
            (Some(c), None) => parse_column(c),
            _ => None,
        }
        .ok_or_else(|| MoveError::Malformed(format!("bad column {:?}", column)))?;

        let row = parse_row(row).ok_or_else(|| MoveError::Malformed(format!("bad row {:?}", row)))?;

        Self::new(word, direction, row, col)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Number of cells the move spans
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// (row, col) of the `index`th tile; may lie off the board
    pub fn cell(&self, index: usize) -> (usize, usize) {
        self.direction.step(self.row, self.col, index)
    }

    /// Cells paired with the tile placed on each
    pub fn placements(&self) -> impl Iterator<Item = ((usize, usize), Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (self.cell(i), *tile))
    }

    pub fn board_form(&self) -> String {
        self.tiles.iter().map(|t| t.letter).collect()
    }

    pub fn rack_form(&self) -> String {
        self.tiles.iter().map(|t| t.rack_symbol()).collect()
    }

    pub fn blank_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.blank).count()
    }
}

/// Renders back to `WORD DIRECTION COLUMN ROW` with blanks as `-X`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.tiles {
            if tile.blank {
                write!(f, "{}", BLANK)?;
            }
            write!(f, "{}", tile.letter)?;
        }
        write!(
            f,
            " {} {} {}",
            self.direction.symbol(),
            shared::column_label(self.col),
            self.row + 1
        )
    }
}

fn parse_word(word: &str) -> Result<Vec<Tile>, MoveError> {
    let mut tiles = Vec::with_capacity(word.len());
    let mut chars = word.trim().chars();

    while let Some(c) = chars.next() {
        if c == BLANK {
            match chars.next() {
                Some(letter) if letter.is_ascii_alphabetic() => tiles.push(Tile::blank(letter)),
                _ => {
                    return Err(MoveError::Malformed(format!(
                        "blank in {:?} must be followed by a letter",
                        word
                    )))
                }
            }
        } else if c.is_ascii_alphabetic() {
            tiles.push(Tile::letter(c));
        } else {
            return Err(MoveError::Malformed(format!("bad character {:?} in word", c)));
        }
    }

    if tiles.is_empty() {
        return Err(MoveError::Malformed("empty word".to_string()));
    }
    if tiles.iter().filter(|t| t.blank).count() > MAX_BLANKS {
        return Err(MoveError::TooManyBlanks);
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let mv = Move::parse("paste H B 1").unwrap();
        assert_eq!(mv.board_form(), "PASTE");
        assert_eq!(mv.direction(), Direction::Horizontal);
        assert_eq!(mv.col(), 1);
        assert_eq!(mv.row(), 0);
        assert_eq!(mv.len(), 5);
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(matches!(Move::parse("HORN H F"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("HORN X F 8"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("HORN H P 8"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("HORN H F 16"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("HORN H FF 8"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("HO2N H F 8"), Err(MoveError::Malformed(_))));
    }

    #[test]
    fn test_board_form_resolves_blanks() {
        for word in ["comp-UTER", "-COMPUTER", "COMPUTE-r"] {
            let mv = Move::parse(&format!("{} H H 8", word)).unwrap();
            assert_eq!(mv.board_form(), "COMPUTER");
            assert_eq!(mv.len(), 8);
        }
    }

    #[test]
    fn test_rack_form_keeps_blank_symbol() {
        let mv = Move::parse("COMP-uter H H 8").unwrap();
        assert_eq!(mv.rack_form(), "COMP-TER");

        let mv = Move::parse("-comp-UTER H H 8").unwrap();
        assert_eq!(mv.rack_form(), "-OMP-TER");
        assert_eq!(mv.blank_count(), 2);
    }

    #[test]
    fn test_three_blanks_rejected() {
        assert_eq!(
            Move::parse("-COMP-ute-R H H 8"),
            Err(MoveError::TooManyBlanks)
        );
    }

    #[test]
    fn test_dangling_blank_rejected() {
        assert!(matches!(Move::parse("HORN- H F 8"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::parse("--A H F 8"), Err(MoveError::Malformed(_))));
    }

    #[test]
    fn test_cells_follow_direction() {
        let across = Move::parse("HORN H F 8").unwrap();
        assert_eq!(across.cell(0), (7, 5));
        assert_eq!(across.cell(3), (7, 8));

        let down = Move::parse("FARM V H 6").unwrap();
        assert_eq!(down.cell(0), (5, 7));
        assert_eq!(down.cell(3), (8, 7));
    }

    #[test]
    fn test_display() {
        let mv = Move::parse("comp-uter v h 8").unwrap();
        assert_eq!(mv.to_string(), "COMP-UTER V H 8");
    }
}
