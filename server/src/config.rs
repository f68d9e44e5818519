//! Game configuration loaded from TOML
//!
//! Every field has a default matching the standard English game, so an empty
//! file (or no file at all) yields a playable configuration:
//!
//! ```toml
//! rack_size = 7
//! bingo_bonus = 50
//! min_players = 2
//! max_players = 4
//!
//! [letters]
//! A = { count = 9, value = 1 }
//! "-" = { count = 2, value = 0 }
//!
//! [premiums]
//! triple_word = ["A1", "H1", "O1"]
//! double_letter = ["D1"]
//! ```

use crate::board::PremiumLayout;
use crate::error::ConfigError;
use serde::Deserialize;
use shared::{parse_coordinate, Premium, BINGO_BONUS, BLANK, BOARD_SIZE, RACK_SIZE};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Letter, tile count and point value of the standard English set
const STANDARD_LETTERS: [(char, u32, u32); 27] = [
    ('A', 9, 1),
    ('B', 2, 3),
    ('C', 2, 3),
    ('D', 4, 2),
    ('E', 12, 1),
    ('F', 2, 4),
    ('G', 3, 2),
    ('H', 2, 4),
    ('I', 9, 1),
    ('J', 1, 8),
    ('K', 1, 5),
    ('L', 4, 1),
    ('M', 2, 3),
    ('N', 6, 1),
    ('O', 8, 1),
    ('P', 2, 3),
    ('Q', 1, 10),
    ('R', 6, 1),
    ('S', 4, 1),
    ('T', 6, 1),
    ('U', 4, 1),
    ('V', 2, 4),
    ('W', 2, 4),
    ('X', 1, 8),
    ('Y', 2, 4),
    ('Z', 1, 10),
    (BLANK, 2, 0),
];

const MAX_PLAYERS_LIMIT: usize = 8;
const MAX_LETTER_VALUE: u32 = 100;
const MAX_LETTER_COUNT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LetterSpec {
    pub count: u32,
    pub value: u32,
}

/// Coordinate labels of each premium kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PremiumConfig {
    pub triple_word: Vec<String>,
    pub double_word: Vec<String>,
    pub triple_letter: Vec<String>,
    pub double_letter: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rack_size: usize,
    pub bingo_bonus: u32,
    pub min_players: usize,
    pub max_players: usize,
    pub letters: BTreeMap<String, LetterSpec>,
    /// `None` selects the standard layout
    pub premiums: Option<PremiumConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rack_size: RACK_SIZE,
            bingo_bonus: BINGO_BONUS,
            min_players: 2,
            max_players: 4,
            letters: STANDARD_LETTERS
                .iter()
                .map(|&(letter, count, value)| (letter.to_string(), LetterSpec { count, value }))
                .collect(),
            premiums: None,
        }
    }
}

/// Validated, ready-to-use rules shared by every game session
#[derive(Debug, Clone)]
pub struct GameRules {
    pub rack_size: usize,
    pub bingo_bonus: u32,
    pub letters: BTreeMap<char, LetterSpec>,
    pub premiums: Arc<PremiumLayout>,
}

impl Default for GameRules {
    fn default() -> Self {
        // The built-in configuration is always valid
        let config = GameConfig::default();
        Self {
            rack_size: config.rack_size,
            bingo_bonus: config.bingo_bonus,
            letters: STANDARD_LETTERS
                .iter()
                .map(|&(letter, count, value)| (letter, LetterSpec { count, value }))
                .collect(),
            premiums: Arc::new(PremiumLayout::standard()),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rack_size == 0 || self.rack_size > BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "rack_size must be between 1 and {}, got {}",
                BOARD_SIZE, self.rack_size
            )));
        }
        if self.min_players < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_players must be at least 2, got {}",
                self.min_players
            )));
        }
        if self.max_players < self.min_players || self.max_players > MAX_PLAYERS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_players must be between min_players ({}) and {}, got {}",
                self.min_players, MAX_PLAYERS_LIMIT, self.max_players
            )));
        }

        let letters = self.letter_table()?;
        let total: u32 = letters.values().map(|spec| spec.count).sum();
        if (total as usize) < self.rack_size * self.max_players {
            return Err(ConfigError::Invalid(format!(
                "{} tiles cannot fill {} racks of {}",
                total, self.max_players, self.rack_size
            )));
        }

        self.premium_layout()?;
        Ok(())
    }

    /// Letter table keyed by uppercase letter or `-` for blanks
    pub fn letter_table(&self) -> Result<BTreeMap<char, LetterSpec>, ConfigError> {
        let mut table = BTreeMap::new();
        for (key, spec) in &self.letters {
            let mut chars = key.trim().chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c == BLANK || c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "letter key {:?} must be a single letter A-Z or {:?}",
                        key, BLANK
                    )))
                }
            };
            if spec.value > MAX_LETTER_VALUE {
                return Err(ConfigError::Invalid(format!(
                    "value {} of letter {} exceeds {}",
                    spec.value, letter, MAX_LETTER_VALUE
                )));
            }
            if spec.count > MAX_LETTER_COUNT {
                return Err(ConfigError::Invalid(format!(
                    "count {} of letter {} exceeds {}",
                    spec.count, letter, MAX_LETTER_COUNT
                )));
            }
            if table.insert(letter, *spec).is_some() {
                return Err(ConfigError::Invalid(format!("letter {} listed twice", letter)));
            }
        }
        Ok(table)
    }

    pub fn premium_layout(&self) -> Result<PremiumLayout, ConfigError> {
        let premiums = match &self.premiums {
            None => return Ok(PremiumLayout::standard()),
            Some(premiums) => premiums,
        };

        let groups = [
            (Premium::TripleWord, &premiums.triple_word),
            (Premium::DoubleWord, &premiums.double_word),
            (Premium::TripleLetter, &premiums.triple_letter),
            (Premium::DoubleLetter, &premiums.double_letter),
        ];

        let mut seen = HashSet::new();
        let mut squares = Vec::new();
        for (premium, labels) in groups {
            for label in labels {
                let (row, col) = parse_coordinate(label).ok_or_else(|| {
                    ConfigError::Invalid(format!("premium square {:?} is not on the board", label))
                })?;
                if !seen.insert((row, col)) {
                    return Err(ConfigError::Invalid(format!(
                        "premium square {} listed twice",
                        label
                    )));
                }
                squares.push((row, col, premium));
            }
        }
        Ok(PremiumLayout::from_squares(squares))
    }

    pub fn rules(&self) -> Result<GameRules, ConfigError> {
        Ok(GameRules {
            rack_size: self.rack_size,
            bingo_bonus: self.bingo_bonus,
            letters: self.letter_table()?,
            premiums: Arc::new(self.premium_layout()?),
        })
    }
}
