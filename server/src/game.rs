//! A single match: board, bag, seated players and whose turn it is
//!
//! Every action is checked in full before anything is mutated, so a rejected
//! move, pass or swap leaves the session exactly as it was. Turn advancement
//! is left to the caller via [`GameSession::next_player`].

use crate::board::Board;
use crate::config::GameRules;
use crate::dictionary::Dictionary;
use crate::error::{GameError, MoveError};
use crate::moves::Move;
use crate::player::Player;
use crate::scoring::ScoreCalculator;
use crate::tile_bag::TileBag;
use crate::validator::MoveValidator;
use crate::words::WordExtractor;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// What an accepted move did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub words: Vec<String>,
    pub points: u32,
    pub tiles_placed: usize,
    pub drawn: Vec<char>,
}

pub struct GameSession {
    board: Board,
    bag: TileBag,
    players: Vec<Player>,
    current: usize,
    rules: GameRules,
    dictionary: Arc<dyn Dictionary>,
    rng: StdRng,
    over: bool,
}

impl GameSession {
    /// Seats `names` in order, deals racks and picks a random starting player
    pub fn new(
        names: Vec<String>,
        rules: GameRules,
        dictionary: Arc<dyn Dictionary>,
        rng: StdRng,
    ) -> Self {
        let mut session = Self {
            board: Board::new(Arc::clone(&rules.premiums)),
            bag: TileBag::new(&rules.letters),
            players: names.into_iter().map(Player::new).collect(),
            current: 0,
            rules,
            dictionary,
            rng,
            over: false,
        };
        session.deal();
        session
    }

    fn deal(&mut self) {
        for player in &mut self.players {
            let tiles = self.bag.draw_tiles(self.rules.rack_size, &mut self.rng);
            player.rack_mut().add_all(tiles);
        }
        self.current = if self.players.is_empty() {
            0
        } else {
            self.rng.gen_range(0..self.players.len())
        };
        info!(
            "New game for {} players, {} starts",
            self.players.len(),
            self.current_player().map(Player::name).unwrap_or("nobody")
        );
    }

    /// Starts a rematch with the same seating
    pub fn reset(&mut self) {
        self.board.clear();
        self.bag.refill();
        for player in &mut self.players {
            player.reset();
        }
        self.over = false;
        self.deal();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name().to_string()).collect()
    }

    /// Validates, scores and commits a move for the current player
    pub fn play_move(&mut self, mv: &Move) -> Result<MoveOutcome, GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        let current = self.current;
        let player = self.players.get(current).ok_or(GameError::GameOver)?;

        let placement = MoveValidator::new(&self.board).validate(mv, player.rack())?;
        let extraction = WordExtractor::new(&self.board).extract(mv);
        let words = extraction.words();
        if words.is_empty() {
            return Err(GameError::InvalidWord(mv.board_form()));
        }
        if let Some(word) = words.iter().find(|w| !self.dictionary.is_valid_word(w)) {
            debug!("{} rejected: {} is not a word", player.name(), word);
            return Err(GameError::InvalidWord(word.clone()));
        }

        let tiles_placed = placement.new_tiles.len();
        let points = ScoreCalculator::new(
            &self.bag,
            &self.rules.premiums,
            self.rules.rack_size,
            self.rules.bingo_bonus,
        )
        .score(&extraction, tiles_placed);

        let player = &mut self.players[current];
        if !player.rack_mut().remove_all(&placement.rack_tiles) {
            return Err(MoveError::TilesNotInRack.into());
        }
        for placed in &placement.new_tiles {
            self.board.set_tile(placed.row, placed.col, placed.tile);
        }
        let drawn = self.bag.draw_tiles(tiles_placed, &mut self.rng);
        player.rack_mut().add_all(drawn.iter().copied());
        player.add_score(points);

        info!(
            "{} played {} for {} points ({})",
            player.name(),
            mv,
            points,
            words.join(", ")
        );
        self.check_game_over();

        Ok(MoveOutcome {
            words,
            points,
            tiles_placed,
            drawn,
        })
    }

    pub fn pass(&mut self) -> Result<(), GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        if let Some(player) = self.current_player() {
            info!("{} passed", player.name());
        }
        self.check_game_over();
        Ok(())
    }

    /// Exchanges rack tiles for new ones from the bag
    pub fn swap(&mut self, tiles: &[char]) -> Result<Vec<char>, GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        let describe = || tiles.iter().collect::<String>();
        if tiles.is_empty() {
            return Err(GameError::InvalidSwap("nothing".to_string()));
        }

        let current = self.current;
        let player = self.players.get_mut(current).ok_or(GameError::GameOver)?;
        if !player.rack_mut().remove_all(tiles) {
            return Err(GameError::InvalidSwap(describe()));
        }
        let fresh = self.bag.swap_tiles(tiles, &mut self.rng);
        player.rack_mut().add_all(fresh.iter().copied());

        info!("{} swapped {} tiles", player.name(), tiles.len());
        self.check_game_over();
        Ok(fresh)
    }

    /// Round-robin to the next seat
    pub fn next_player(&mut self) {
        if !self.players.is_empty() {
            self.current = (self.current + 1) % self.players.len();
        }
    }

    fn check_game_over(&mut self) {
        let rack_empty = self
            .current_player()
            .map(|p| p.rack().is_empty())
            .unwrap_or(true);
        if self.bag.tiles_left() == 0 && rack_empty {
            self.over = true;
            info!("Game over: bag and rack exhausted");
        }
    }

    /// Ends the game early, for instance when a player leaves
    pub fn end(&mut self) {
        self.over = true;
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Player with the highest score; ties go to the earliest seat
    pub fn winner(&self) -> Option<&Player> {
        self.players
            .iter()
            .reduce(|best, p| if p.score() > best.score() { p } else { best })
    }

    pub fn scores(&self) -> Vec<(String, u32)> {
        self.players
            .iter()
            .map(|p| (p.name().to_string(), p.score()))
            .collect()
    }

    /// Tiles in the bag, on racks and on the board
    pub fn tiles_in_play(&self) -> usize {
        self.bag.tiles_left()
            + self.players.iter().map(|p| p.rack().len()).sum::<usize>()
            + self.board.letters_on_board()
    }

    pub fn board_snapshot(&self) -> String {
        self.board.snapshot()
    }
}
