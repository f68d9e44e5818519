//! Error types for move validation, game actions and configuration loading
//!
//! Validation and game errors are recoverable values reported back to the
//! offending connection. Configuration errors are fatal at startup.

use shared::ErrorCode;
use thiserror::Error;

/// Reasons a placement is rejected before anything is committed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("outside board")]
    OutsideBoard,
    #[error("overwrite")]
    Overwrite,
    #[error("tiles not in rack")]
    TilesNotInRack,
    #[error("must start at center")]
    NotCentered,
    #[error("move must touch an existing tile")]
    NotTouching,
    #[error("at most two blank tiles per move")]
    TooManyBlanks,
    #[error("malformed move: {0}")]
    Malformed(String),
}

/// Rejections of a turn action by the game session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
    #[error("not a word: {0}")]
    InvalidWord(String),
    #[error("cannot swap {0}")]
    InvalidSwap(String),
    #[error("game is over")]
    GameOver,
}

impl GameError {
    /// Wire error code reported to the client
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::InvalidMove(_) | GameError::InvalidSwap(_) => ErrorCode::InvalidMove,
            GameError::InvalidWord(_) => ErrorCode::InvalidWord,
            GameError::GameOver => ErrorCode::NoGame,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
