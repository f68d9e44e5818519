//! What the client knows about the game, rebuilt from server messages

use log::{debug, info};
use shared::{ServerMessage, BOARD_SIZE, EMPTY_CELL};
use std::collections::VecDeque;

const LOG_CAPACITY: usize = 12;

#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub name: String,
    pub registered: bool,
    pub connected: bool,
    cells: Vec<char>,
    pub rack: Vec<char>,
    /// Seating order with running totals
    pub scores: Vec<(String, u32)>,
    pub ready: Vec<String>,
    pub turn: Option<String>,
    pub game_over: Option<(String, u32)>,
    log: VecDeque<String>,
}

impl ClientGameState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registered: false,
            connected: false,
            cells: vec![EMPTY_CELL; BOARD_SIZE * BOARD_SIZE],
            rack: Vec::new(),
            scores: Vec::new(),
            ready: Vec::new(),
            turn: None,
            game_over: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    /// Letter at a cell; blanks come back lowercase
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        let c = self.cells[row * BOARD_SIZE + col];
        (c != EMPTY_CELL).then_some(c)
    }

    pub fn is_my_turn(&self) -> bool {
        self.turn
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(&self.name))
    }

    pub fn in_game(&self) -> bool {
        self.turn.is_some() && self.game_over.is_none()
    }

    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    fn set_score(&mut self, name: &str, score: u32) {
        match self.scores.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = score,
            None => self.scores.push((name.to_string(), score)),
        }
    }

    pub fn apply(&mut self, message: &ServerMessage) {
        debug!("Server: {}", message);
        match message {
            ServerMessage::Hello { names, .. } => {
                self.registered = true;
                self.push_log(format!("Joined with {}", names.join(", ")));
            }
            ServerMessage::Welcome { name, .. } => {
                self.push_log(format!("{} joined", name));
            }
            ServerMessage::ServerReady { names } => {
                self.ready = names.clone();
            }
            ServerMessage::Start { names } => {
                info!("Game started: {}", names.join(", "));
                self.scores = names.iter().map(|n| (n.clone(), 0)).collect();
                self.ready.clear();
                self.game_over = None;
                self.push_log(format!("Game started: {}", names.join(", ")));
            }
            ServerMessage::Tiles { tiles } => {
                self.rack = tiles.clone();
            }
            ServerMessage::Board { cells } => {
                let cells: Vec<char> = cells.chars().collect();
                if cells.len() == BOARD_SIZE * BOARD_SIZE {
                    self.cells = cells;
                }
            }
            ServerMessage::Turn { name } => {
                self.turn = Some(name.clone());
            }
            ServerMessage::Move {
                name,
                coordinates,
                points,
            } => {
                self.push_log(format!("{} played {} for {}", name, coordinates, points));
            }
            ServerMessage::Pass { name } => {
                self.push_log(format!("{} passed", name));
            }
            ServerMessage::Swap { name, count } => {
                self.push_log(format!("{} swapped {} tiles", name, count));
            }
            ServerMessage::Score { name, score } => {
                self.set_score(name, *score);
            }
            ServerMessage::Abort { name } => {
                self.push_log(format!("{} left the game", name));
            }
            ServerMessage::Chat { name, text } => {
                self.push_log(format!("<{}> {}", name, text));
            }
            ServerMessage::GameOver { winner, score } => {
                info!("Game over: {} wins with {}", winner, score);
                self.game_over = Some((winner.clone(), *score));
                self.turn = None;
                self.push_log(format!("Game over: {} wins with {}", winner, score));
            }
            ServerMessage::Error { code, message } => {
                self.push_log(format!("{}: {}", code, message));
            }
        }
    }
}
