//! Points for an extracted move
//!
//! Primary word: each new tile scores its letter value times its letter
//! premium, letters already on the board add their plain value, then the
//! total is multiplied by every word premium under a new tile. Cross-words
//! add the plain sum of their letters. Blank tiles are worth nothing.
//! Using a whole rack in one move earns the bingo bonus.

use crate::board::PremiumLayout;
use crate::tile_bag::TileBag;
use crate::words::{Extraction, FormedWord, WordCell};

pub struct ScoreCalculator<'a> {
    values: &'a TileBag,
    premiums: &'a PremiumLayout,
    rack_size: usize,
    bingo_bonus: u32,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(
        values: &'a TileBag,
        premiums: &'a PremiumLayout,
        rack_size: usize,
        bingo_bonus: u32,
    ) -> Self {
        Self {
            values,
            premiums,
            rack_size,
            bingo_bonus,
        }
    }

    /// Total points for a move that placed `tiles_placed` tiles from the rack
    pub fn score(&self, extraction: &Extraction, tiles_placed: usize) -> u32 {
        let mut total = if extraction.primary.len() > 1 {
            self.primary_score(&extraction.primary)
        } else {
            0
        };
        total += extraction
            .cross
            .iter()
            .filter(|w| w.len() > 1)
            .map(|w| self.plain_score(w))
            .sum::<u32>();
        if tiles_placed == self.rack_size {
            total += self.bingo_bonus;
        }
        total
    }

    pub fn primary_score(&self, word: &FormedWord) -> u32 {
        let base: u32 = word
            .cells
            .iter()
            .map(|cell| {
                if cell.new {
                    self.cell_value(cell) * self.premiums.get(cell.row, cell.col).letter_multiplier()
                } else {
                    self.cell_value(cell)
                }
            })
            .sum();

        word.cells
            .iter()
            .filter(|cell| cell.new)
            .map(|cell| self.premiums.get(cell.row, cell.col).word_multiplier())
            .fold(base, |total, multiplier| total * multiplier)
    }

    /// Sum of letter values without any premium
    pub fn plain_score(&self, word: &FormedWord) -> u32 {
        word.cells.iter().map(|cell| self.cell_value(cell)).sum()
    }

    fn cell_value(&self, cell: &WordCell) -> u32 {
        if cell.tile.blank {
            0
        } else {
            self.values.letter_value(cell.tile.letter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::GameRules;
    use crate::moves::Move;
    use crate::words::WordExtractor;

    struct Fixture {
        board: Board,
        bag: TileBag,
        rules: GameRules,
    }

    impl Fixture {
        fn new() -> Self {
            let rules = GameRules::default();
            Self {
                board: Board::new(rules.premiums.clone()),
                bag: TileBag::new(&rules.letters),
                rules,
            }
        }

        /// Scores a move and commits it to the board
        fn play(&mut self, input: &str) -> u32 {
            let mv = Move::parse(input).unwrap();
            let extraction = WordExtractor::new(&self.board).extract(&mv);
            let placed = extraction.primary.cells.iter().filter(|c| c.new).count();
            let points = ScoreCalculator::new(
                &self.bag,
                &self.rules.premiums,
                self.rules.rack_size,
                self.rules.bingo_bonus,
            )
            .score(&extraction, placed);

            for cell in extraction.primary.cells.iter().filter(|c| c.new) {
                self.board.set_tile(cell.row, cell.col, cell.tile);
            }
            points
        }
    }

    #[test]
    fn test_literal_score_sequence() {
        let mut game = Fixture::new();

        assert_eq!(game.play("HORN H F 8"), 14);
        assert_eq!(game.play("FARM V H 6"), 9);
        assert_eq!(game.play("PASTE H F 10"), 25);
        assert_eq!(game.play("MOB H H 9"), 15);
        assert_eq!(game.play("BIT H E 11"), 16);
        assert_eq!(game.play("BOARD V E 11"), 8);
        assert_eq!(game.play("HEARD H A 15"), 30);
        assert_eq!(game.play("PLAYABLE H C 13"), 84);
    }

    #[test]
    fn test_blank_scores_zero() {
        let mut game = Fixture::new();
        // H8 is a double word square: (4 + 1 + 0 + 1) * 2
        assert_eq!(game.play("HO-RN H F 8"), 12);
    }

    #[test]
    fn test_blank_on_board_scores_zero_in_cross_word() {
        let mut game = Fixture::new();
        game.play("-HORN H F 8");
        // The blank H at F8 sits above the new S
        let mv = Move::parse("SO H F 9").unwrap();
        let extraction = WordExtractor::new(&game.board).extract(&mv);
        let calc = ScoreCalculator::new(&game.bag, &game.rules.premiums, 7, 50);

        let cross = &extraction.cross[0];
        assert_eq!(cross.text(), "HS");
        assert_eq!(calc.plain_score(cross), 1);
    }

    #[test]
    fn test_word_multipliers_compound() {
        let game = Fixture::new();
        let mv = Move::parse("AAAAAAAA H A 1").unwrap();
        let extraction = WordExtractor::new(&game.board).extract(&mv);
        let calc = ScoreCalculator::new(&game.bag, &game.rules.premiums, 7, 50);
        // D1 doubles one letter, A1 and H1 both triple the word
        assert_eq!(calc.primary_score(&extraction.primary), (8 + 1) * 9);
    }

    #[test]
    fn test_bingo_needs_full_rack() {
        let game = Fixture::new();
        let mv = Move::parse("HORN H F 8").unwrap();
        let extraction = WordExtractor::new(&game.board).extract(&mv);

        let small_rack = ScoreCalculator::new(&game.bag, &game.rules.premiums, 4, 50);
        assert_eq!(small_rack.score(&extraction, 4), 64);

        let full_rack = ScoreCalculator::new(&game.bag, &game.rules.premiums, 7, 50);
        assert_eq!(full_rack.score(&extraction, 4), 14);
    }
}
