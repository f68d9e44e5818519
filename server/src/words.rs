//! Discovery of every word a placement forms
//!
//! The primary word is the move itself extended through any letters directly
//! before or after it on the same line. Each tile that lands on an empty cell
//! may also form a cross-word through the letters on either side of it. Only
//! words longer than one letter count.

use crate::board::{Board, Tile};
use crate::moves::Move;
use shared::{Direction, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCell {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
    /// True when the tile comes from this move rather than the board
    pub new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormedWord {
    pub cells: Vec<WordCell>,
}

impl FormedWord {
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.tile.letter).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Primary word and cross-words of a single move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub primary: FormedWord,
    pub cross: Vec<FormedWord>,
}

impl Extraction {
    /// Words longer than one letter, primary first, then cross-words in move order
    pub fn words(&self) -> Vec<String> {
        std::iter::once(&self.primary)
            .chain(self.cross.iter())
            .filter(|w| w.len() > 1)
            .map(FormedWord::text)
            .collect()
    }
}

pub struct WordExtractor<'a> {
    board: &'a Board,
}

impl<'a> WordExtractor<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Extracts words against the board as it is before the move is committed
    pub fn extract(&self, mv: &Move) -> Extraction {
        let primary = self.primary_word(mv);
        let cross = mv
            .placements()
            .filter(|((row, col), _)| self.board.tile_at(*row, *col).is_none())
            .filter_map(|((row, col), tile)| {
                let word = self.cross_word(row, col, tile, mv.direction().perpendicular());
                (word.len() > 1).then_some(word)
            })
            .collect();
        Extraction { primary, cross }
    }

    pub fn all_words(&self, mv: &Move) -> Vec<String> {
        self.extract(mv).words()
    }

    pub fn primary_word(&self, mv: &Move) -> FormedWord {
        let direction = mv.direction();
        let (row, col) = (mv.row(), mv.col());

        let mut cells = self.existing_before(row, col, direction);
        cells.extend(mv.placements().map(|((r, c), tile)| WordCell {
            row: r,
            col: c,
            tile: self.board.tile(r, c).unwrap_or(tile),
            new: self.board.tile_at(r, c).is_none(),
        }));

        let (last_row, last_col) = mv.cell(mv.len().saturating_sub(1));
        cells.extend(self.existing_after(last_row, last_col, direction));
        FormedWord { cells }
    }

    fn cross_word(&self, row: usize, col: usize, tile: Tile, direction: Direction) -> FormedWord {
        let mut cells = self.existing_before(row, col, direction);
        cells.push(WordCell {
            row,
            col,
            tile,
            new: true,
        });
        cells.extend(self.existing_after(row, col, direction));
        FormedWord { cells }
    }

    /// Contiguous board letters ending just before (row, col), in reading order
    fn existing_before(&self, row: usize, col: usize, direction: Direction) -> Vec<WordCell> {
        let mut cells = Vec::new();
        let (mut r, mut c) = (row, col);
        loop {
            let previous = match direction {
                Direction::Horizontal => c.checked_sub(1).map(|c| (r, c)),
                Direction::Vertical => r.checked_sub(1).map(|r| (r, c)),
            };
            match previous.and_then(|(pr, pc)| self.board.tile(pr, pc).map(|t| (pr, pc, t))) {
                Some((pr, pc, tile)) => {
                    cells.push(WordCell {
                        row: pr,
                        col: pc,
                        tile,
                        new: false,
                    });
                    r = pr;
                    c = pc;
                }
                None => break,
            }
        }
        cells.reverse();
        cells
    }

    /// Contiguous board letters starting just after (row, col)
    fn existing_after(&self, row: usize, col: usize, direction: Direction) -> Vec<WordCell> {
        let mut cells = Vec::new();
        let (mut r, mut c) = direction.step(row, col, 1);
        while r < BOARD_SIZE && c < BOARD_SIZE {
            match self.board.tile(r, c) {
                Some(tile) => {
                    cells.push(WordCell {
                        row: r,
                        col: c,
                        tile,
                        new: false,
                    });
                    (r, c) = direction.step(r, c, 1);
                }
                None => break,
            }
        }
        cells
    }
}
