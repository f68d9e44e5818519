//! Ordered placement checks
//!
//! Checks run in a fixed order and each assumes the previous ones passed:
//! inside board, overwrite, tiles available in rack, first move covers the
//! center, later moves overlap an existing tile. Validation never mutates
//! anything; an accepted move comes back as a [`Placement`] ready to commit.

use crate::board::{Board, Tile};
use crate::error::MoveError;
use crate::moves::Move;
use crate::player::Rack;
use shared::{BOARD_SIZE, CENTER};

/// A tile that lands on a previously empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

/// The result of an accepted move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Tiles on cells that were empty, in move order
    pub new_tiles: Vec<PlacedTile>,
    /// Rack symbols consumed by the move, `-` for blanks
    pub rack_tiles: Vec<char>,
}

pub struct MoveValidator<'a> {
    board: &'a Board,
}

impl<'a> MoveValidator<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    pub fn validate(&self, mv: &Move, rack: &Rack) -> Result<Placement, MoveError> {
        self.check_inside_board(mv)?;
        self.check_overwrite(mv)?;
        let placement = self.check_available_tiles(mv, rack)?;
        if self.board.is_center_empty() {
            self.check_first_move_center(mv)?;
        } else {
            self.check_touches_tile(mv)?;
        }
        Ok(placement)
    }

    pub fn check_inside_board(&self, mv: &Move) -> Result<(), MoveError> {
        if mv.is_empty() {
            return Err(MoveError::OutsideBoard);
        }
        let (row, col) = mv.cell(mv.len() - 1);
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(())
        } else {
            Err(MoveError::OutsideBoard)
        }
    }

    /// Occupied cells must already hold the letter being placed
    pub fn check_overwrite(&self, mv: &Move) -> Result<(), MoveError> {
        for ((row, col), tile) in mv.placements() {
            match self.board.tile_at(row, col) {
                Some(existing) if existing != tile.letter => return Err(MoveError::Overwrite),
                _ => {}
            }
        }
        Ok(())
    }

    /// Letters already on the board are not taken from the rack
    pub fn tiles_to_remove(&self, mv: &Move) -> Vec<PlacedTile> {
        mv.placements()
            .filter(|((row, col), _)| self.board.tile_at(*row, *col).is_none())
            .map(|((row, col), tile)| PlacedTile { row, col, tile })
            .collect()
    }

    pub fn check_available_tiles(&self, mv: &Move, rack: &Rack) -> Result<Placement, MoveError> {
        let new_tiles = self.tiles_to_remove(mv);
        if new_tiles.is_empty() {
            return Err(MoveError::Malformed("move places no new tiles".to_string()));
        }

        let rack_tiles: Vec<char> = new_tiles.iter().map(|p| p.tile.rack_symbol()).collect();
        if !rack.contains_all(&rack_tiles) {
            return Err(MoveError::TilesNotInRack);
        }

        Ok(Placement {
            new_tiles,
            rack_tiles,
        })
    }

    pub fn check_first_move_center(&self, mv: &Move) -> Result<(), MoveError> {
        if mv.placements().any(|(cell, _)| cell == (CENTER, CENTER)) {
            Ok(())
        } else {
            Err(MoveError::NotCentered)
        }
    }

    /// At least one cell of the move must already hold a letter
    ///
    /// Only cells on the placement line count; a tile beside the line does not.
    pub fn check_touches_tile(&self, mv: &Move) -> Result<(), MoveError> {
        if mv
            .placements()
            .any(|((row, col), _)| self.board.tile_at(row, col).is_some())
        {
            Ok(())
        } else {
            Err(MoveError::NotTouching)
        }
    }
}
