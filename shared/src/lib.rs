use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BOARD_SIZE: usize = 15;
pub const CENTER: usize = 7;
pub const RACK_SIZE: usize = 7;
pub const BINGO_BONUS: u32 = 50;
pub const BLANK: char = '-';
pub const EMPTY_CELL: char = '.';
pub const SEPARATOR: &str = ";";

/// Feature flag advertised for pass/swap support
pub const FEATURE_PASS: char = 'P';
/// Feature flag advertised for chat support
pub const FEATURE_CHAT: char = 'C';
pub const SERVER_FEATURES: &str = "PC";

/// Standard premium layout, one string per row from row 1 to row 15.
///
/// `T` triple word, `D` double word, `t` triple letter, `d` double letter.
const STANDARD_LAYOUT: [&str; BOARD_SIZE] = [
    "T..d...T...d..T",
    ".D...t...t...D.",
    "..D...d.d...D..",
    "d..D...d...D..d",
    "....D.....D....",
    ".t...t...t...t.",
    "..d...d.d...d..",
    "T..d...D...d..T",
    "..d...d.d...d..",
    ".t...t...t...t.",
    "....D.....D....",
    "d..D...d...D..d",
    "..D...d.d...D..",
    ".D...t...t...D.",
    "T..d...T...d..T",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Returns the (row, col) reached by walking `offset` cells from the anchor
    pub fn step(self, row: usize, col: usize, offset: usize) -> (usize, usize) {
        match self {
            Direction::Horizontal => (row, col + offset),
            Direction::Vertical => (row + offset, col),
        }
    }

    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::Horizontal => 'H',
            Direction::Vertical => 'V',
        }
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(Direction::Horizontal),
            "V" => Ok(Direction::Vertical),
            other => Err(ProtocolError::Malformed {
                field: "direction",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Premium {
    TripleWord,
    DoubleWord,
    TripleLetter,
    DoubleLetter,
    #[default]
    Plain,
}

impl Premium {
    pub fn letter_multiplier(self) -> u32 {
        match self {
            Premium::TripleLetter => 3,
            Premium::DoubleLetter => 2,
            _ => 1,
        }
    }

    pub fn word_multiplier(self) -> u32 {
        match self {
            Premium::TripleWord => 3,
            Premium::DoubleWord => 2,
            _ => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Premium::TripleWord => "3W",
            Premium::DoubleWord => "2W",
            Premium::TripleLetter => "3L",
            Premium::DoubleLetter => "2L",
            Premium::Plain => "",
        }
    }
}

/// Every non-plain square of the standard layout as (row, col, premium)
pub fn standard_premium_layout() -> Vec<(usize, usize, Premium)> {
    let mut squares = Vec::new();
    for (row, line) in STANDARD_LAYOUT.iter().enumerate() {
        for (col, symbol) in line.chars().enumerate() {
            let premium = match symbol {
                'T' => Premium::TripleWord,
                'D' => Premium::DoubleWord,
                't' => Premium::TripleLetter,
                'd' => Premium::DoubleLetter,
                _ => continue,
            };
            squares.push((row, col, premium));
        }
    }
    squares
}

/// Column letter `A`..`O` for a zero-based column index
pub fn column_label(col: usize) -> char {
    (b'A'..=b'Z').nth(col).map_or('?', char::from)
}

pub fn parse_column(c: char) -> Option<usize> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() && ((upper as u8 - b'A') as usize) < BOARD_SIZE {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Parses a one-based row number `1`..`15` into a zero-based index
pub fn parse_row(s: &str) -> Option<usize> {
    match s.trim().parse::<usize>() {
        Ok(row) if (1..=BOARD_SIZE).contains(&row) => Some(row - 1),
        _ => None,
    }
}

/// Label such as `H8` for zero-based (row, col)
pub fn coordinate_label(row: usize, col: usize) -> String {
    format!("{}{}", column_label(col), row + 1)
}

/// Parses a label such as `H8` into zero-based (row, col)
pub fn parse_coordinate(label: &str) -> Option<(usize, usize)> {
    let label = label.trim();
    let mut chars = label.chars();
    let col = parse_column(chars.next()?)?;
    let row = parse_row(chars.as_str())?;
    Some((row, col))
}

/// Error codes carried by `ERROR` responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidMove,
    InvalidWord,
    OutOfTurn,
    UnknownCommand,
    MalformedMessage,
    NotRegistered,
    DuplicateName,
    ServerFull,
    GameInProgress,
    NoGame,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidMove => "INVALID_MOVE",
            ErrorCode::InvalidWord => "INVALID_WORD",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::MalformedMessage => "MALFORMED_MESSAGE",
            ErrorCode::NotRegistered => "NOT_REGISTERED",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::ServerFull => "SERVER_FULL",
            ErrorCode::GameInProgress => "GAME_IN_PROGRESS",
            ErrorCode::NoGame => "NO_GAME",
        }
    }
}

impl FromStr for ErrorCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s.trim().to_ascii_uppercase().as_str() {
            "INVALID_MOVE" => ErrorCode::InvalidMove,
            "INVALID_WORD" => ErrorCode::InvalidWord,
            "OUT_OF_TURN" => ErrorCode::OutOfTurn,
            "UNKNOWN_COMMAND" => ErrorCode::UnknownCommand,
            "MALFORMED_MESSAGE" => ErrorCode::MalformedMessage,
            "NOT_REGISTERED" => ErrorCode::NotRegistered,
            "DUPLICATE_NAME" => ErrorCode::DuplicateName,
            "SERVER_FULL" => ErrorCode::ServerFull,
            "GAME_IN_PROGRESS" => ErrorCode::GameInProgress,
            "NO_GAME" => ErrorCode::NoGame,
            other => {
                return Err(ProtocolError::Malformed {
                    field: "error code",
                    value: other.to_string(),
                })
            }
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("wrong number of fields for {command}: expected {expected}, got {actual}")]
    FieldCount {
        command: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("malformed {field}: {value:?}")]
    Malformed { field: &'static str, value: String },
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::UnknownCommand(_) => ErrorCode::UnknownCommand,
            _ => ErrorCode::MalformedMessage,
        }
    }
}

/// Messages sent from clients to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Hello { name: String, features: String },
    ClientReady { name: String },
    Move { name: String, coordinates: String },
    Pass,
    /// `name` is absent in the short `PASS;L1 L2` form
    Swap {
        name: Option<String>,
        tiles: Vec<char>,
    },
    Abort { name: String },
    Chat { name: String, text: String },
}

/// Messages sent from the server to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Hello { names: Vec<String>, features: String },
    Welcome { name: String, features: String },
    ServerReady { names: Vec<String> },
    Start { names: Vec<String> },
    Tiles { tiles: Vec<char> },
    Board { cells: String },
    Turn { name: String },
    Move { name: String, coordinates: String, points: u32 },
    Pass { name: String },
    Swap { name: String, count: usize },
    Score { name: String, score: u32 },
    Abort { name: String },
    Chat { name: String, text: String },
    GameOver { winner: String, score: u32 },
    Error { code: ErrorCode, message: String },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }
}

/// Formats a rack as space separated letters, `-` for a blank
pub fn format_tiles(tiles: &[char]) -> String {
    tiles
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses space separated single letters (or `-`) into uppercase tiles
pub fn parse_tiles(s: &str) -> Result<Vec<char>, ProtocolError> {
    s.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c == BLANK || c.is_ascii_alphabetic() => {
                    Ok(c.to_ascii_uppercase())
                }
                _ => Err(ProtocolError::Malformed {
                    field: "tiles",
                    value: s.to_string(),
                }),
            }
        })
        .collect()
}

fn split_fields(line: &str, max_fields: usize) -> Result<(String, Vec<&str>), ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }
    let mut parts: Vec<&str> = line.splitn(max_fields, SEPARATOR).collect();
    let command = parts.remove(0).trim().to_ascii_uppercase();
    Ok((command, parts))
}

fn expect_fields(
    command: &'static str,
    fields: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::FieldCount {
            command,
            expected,
            actual: fields.len(),
        })
    }
}

/// Names are listed comma-joined in the `HELLO` reply, so a comma is not allowed
fn parse_name(value: &str) -> Result<String, ProtocolError> {
    let name = value.trim();
    if name.is_empty() || name.contains(',') {
        return Err(ProtocolError::Malformed {
            field: "name",
            value: value.to_string(),
        });
    }
    Ok(name.to_string())
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ProtocolError> {
    value.trim().parse().map_err(|_| ProtocolError::Malformed {
        field,
        value: value.to_string(),
    })
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = SEPARATOR;
        match self {
            ClientMessage::Hello { name, features } => write!(f, "HELLO{s}{name}{s}{features}"),
            ClientMessage::ClientReady { name } => write!(f, "CLIENTREADY{s}{name}"),
            ClientMessage::Move { name, coordinates } => {
                write!(f, "MOVE{s}{name}{s}{coordinates}")
            }
            ClientMessage::Pass => write!(f, "PASS"),
            ClientMessage::Swap {
                name: Some(name),
                tiles,
            } => write!(f, "PASS{s}{name}{s}{}", format_tiles(tiles)),
            ClientMessage::Swap { name: None, tiles } => {
                write!(f, "PASS{s}{}", format_tiles(tiles))
            }
            ClientMessage::Abort { name } => write!(f, "ABORT{s}{name}"),
            ClientMessage::Chat { name, text } => write!(f, "CHAT{s}{name}{s}{text}"),
        }
    }
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (command, fields) = split_fields(line, 3)?;
        match command.as_str() {
            "HELLO" => {
                expect_fields("HELLO", &fields, 2)?;
                Ok(ClientMessage::Hello {
                    name: parse_name(fields[0])?,
                    features: fields[1].trim().to_ascii_uppercase(),
                })
            }
            "CLIENTREADY" => {
                expect_fields("CLIENTREADY", &fields, 1)?;
                Ok(ClientMessage::ClientReady {
                    name: parse_name(fields[0])?,
                })
            }
            "MOVE" => {
                expect_fields("MOVE", &fields, 2)?;
                Ok(ClientMessage::Move {
                    name: parse_name(fields[0])?,
                    coordinates: fields[1].trim().to_string(),
                })
            }
            "PASS" => match fields.len() {
                0 => Ok(ClientMessage::Pass),
                1 if fields[0].trim().is_empty() => Ok(ClientMessage::Pass),
                1 => Ok(ClientMessage::Swap {
                    name: None,
                    tiles: parse_tiles(fields[0])?,
                }),
                _ => Ok(ClientMessage::Swap {
                    name: Some(parse_name(fields[0])?),
                    tiles: parse_tiles(fields[1])?,
                }),
            },
            "ABORT" => {
                expect_fields("ABORT", &fields, 1)?;
                Ok(ClientMessage::Abort {
                    name: parse_name(fields[0])?,
                })
            }
            "CHAT" => {
                expect_fields("CHAT", &fields, 2)?;
                Ok(ClientMessage::Chat {
                    name: parse_name(fields[0])?,
                    text: fields[1].to_string(),
                })
            }
            _ => Err(ProtocolError::UnknownCommand(command)),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = SEPARATOR;
        match self {
            ServerMessage::Hello { names, features } => {
                write!(f, "HELLO{s}{}{s}{features}", names.join(","))
            }
            ServerMessage::Welcome { name, features } => {
                write!(f, "WELCOME{s}{name}{s}{features}")
            }
            ServerMessage::ServerReady { names } => {
                write!(f, "SERVERREADY")?;
                names.iter().try_for_each(|n| write!(f, "{s}{n}"))
            }
            ServerMessage::Start { names } => {
                write!(f, "START")?;
                names.iter().try_for_each(|n| write!(f, "{s}{n}"))
            }
            ServerMessage::Tiles { tiles } => write!(f, "TILES{s}{}", format_tiles(tiles)),
            ServerMessage::Board { cells } => write!(f, "BOARD{s}{cells}"),
            ServerMessage::Turn { name } => write!(f, "TURN{s}{name}"),
            ServerMessage::Move {
                name,
                coordinates,
                points,
            } => write!(f, "MOVE{s}{name}{s}{coordinates}{s}{points}"),
            ServerMessage::Pass { name } => write!(f, "PASS{s}{name}"),
            ServerMessage::Swap { name, count } => write!(f, "SWAP{s}{name}{s}{count}"),
            ServerMessage::Score { name, score } => write!(f, "SCORE{s}{name}{s}{score}"),
            ServerMessage::Abort { name } => write!(f, "ABORT{s}{name}"),
            ServerMessage::Chat { name, text } => write!(f, "CHAT{s}{name}{s}{text}"),
            ServerMessage::GameOver { winner, score } => {
                write!(f, "GAMEOVER{s}{winner}{s}{score}")
            }
            ServerMessage::Error { code, message } => write!(f, "ERROR{s}{code}{s}{message}"),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (command, fields) = split_fields(line, usize::MAX)?;
        let names = |fields: &[&str]| -> Vec<String> {
            fields
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        };
        match command.as_str() {
            "HELLO" => {
                expect_fields("HELLO", &fields, 2)?;
                Ok(ServerMessage::Hello {
                    names: names(&fields[0].split(',').collect::<Vec<_>>()),
                    features: fields[1].trim().to_string(),
                })
            }
            "WELCOME" => {
                expect_fields("WELCOME", &fields, 2)?;
                Ok(ServerMessage::Welcome {
                    name: parse_name(fields[0])?,
                    features: fields[1].trim().to_string(),
                })
            }
            "SERVERREADY" => Ok(ServerMessage::ServerReady {
                names: names(&fields),
            }),
            "START" => Ok(ServerMessage::Start {
                names: names(&fields),
            }),
            "TILES" => Ok(ServerMessage::Tiles {
                tiles: match fields.first() {
                    Some(tiles) => parse_tiles(tiles)?,
                    None => Vec::new(),
                },
            }),
            "BOARD" => {
                expect_fields("BOARD", &fields, 1)?;
                let cells = fields[0].trim().to_string();
                if cells.chars().count() != BOARD_SIZE * BOARD_SIZE {
                    return Err(ProtocolError::Malformed {
                        field: "board",
                        value: cells,
                    });
                }
                Ok(ServerMessage::Board { cells })
            }
            "TURN" => {
                expect_fields("TURN", &fields, 1)?;
                Ok(ServerMessage::Turn {
                    name: parse_name(fields[0])?,
                })
            }
            "MOVE" => {
                expect_fields("MOVE", &fields, 3)?;
                Ok(ServerMessage::Move {
                    name: parse_name(fields[0])?,
                    coordinates: fields[1].trim().to_string(),
                    points: parse_number("points", fields[2])?,
                })
            }
            "PASS" => {
                expect_fields("PASS", &fields, 1)?;
                Ok(ServerMessage::Pass {
                    name: parse_name(fields[0])?,
                })
            }
            "SWAP" => {
                expect_fields("SWAP", &fields, 2)?;
                Ok(ServerMessage::Swap {
                    name: parse_name(fields[0])?,
                    count: parse_number("count", fields[1])?,
                })
            }
            "SCORE" => {
                expect_fields("SCORE", &fields, 2)?;
                Ok(ServerMessage::Score {
                    name: parse_name(fields[0])?,
                    score: parse_number("score", fields[1])?,
                })
            }
            "ABORT" => {
                expect_fields("ABORT", &fields, 1)?;
                Ok(ServerMessage::Abort {
                    name: parse_name(fields[0])?,
                })
            }
            "CHAT" => {
                if fields.len() < 2 {
                    return Err(ProtocolError::FieldCount {
                        command: "CHAT",
                        expected: 2,
                        actual: fields.len(),
                    });
                }
                Ok(ServerMessage::Chat {
                    name: parse_name(fields[0])?,
                    text: fields[1..].join(SEPARATOR),
                })
            }
            "GAMEOVER" => {
                expect_fields("GAMEOVER", &fields, 2)?;
                Ok(ServerMessage::GameOver {
                    winner: parse_name(fields[0])?,
                    score: parse_number("score", fields[1])?,
                })
            }
            "ERROR" => {
                if fields.is_empty() {
                    return Err(ProtocolError::FieldCount {
                        command: "ERROR",
                        expected: 2,
                        actual: 0,
                    });
                }
                Ok(ServerMessage::Error {
                    code: fields[0].parse()?,
                    message: fields[1..].join(SEPARATOR),
                })
            }
            _ => Err(ProtocolError::UnknownCommand(command)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_labels() {
        assert_eq!(coordinate_label(0, 0), "A1");
        assert_eq!(coordinate_label(7, 7), "H8");
        assert_eq!(coordinate_label(2, 3), "D3");
        assert_eq!(coordinate_label(14, 14), "O15");
        assert_eq!(column_label(25), 'Z');
        assert_eq!(column_label(26), '?');
        assert_eq!(column_label(300), '?');
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("H8"), Some((7, 7)));
        assert_eq!(parse_coordinate("a15"), Some((14, 0)));
        assert_eq!(parse_coordinate("P1"), None);
        assert_eq!(parse_coordinate("A0"), None);
        assert_eq!(parse_coordinate("A16"), None);
        assert_eq!(parse_coordinate(""), None);
    }

    #[test]
    fn test_direction_step() {
        assert_eq!(Direction::Horizontal.step(3, 1, 2), (3, 3));
        assert_eq!(Direction::Vertical.step(3, 1, 2), (5, 1));
        assert_eq!(Direction::Horizontal.perpendicular(), Direction::Vertical);
        assert_eq!("v".parse::<Direction>(), Ok(Direction::Vertical));
        assert!("X".parse::<Direction>().is_err());
    }

    #[test]
    fn test_standard_layout() {
        let layout = standard_premium_layout();
        let at = |row, col| {
            layout
                .iter()
                .find(|(r, c, _)| *r == row && *c == col)
                .map(|(_, _, p)| *p)
                .unwrap_or_default()
        };

        assert_eq!(at(7, 7), Premium::DoubleWord);
        assert_eq!(at(1, 5), Premium::TripleLetter);
        assert_eq!(at(14, 0), Premium::TripleWord);
        assert_eq!(at(0, 3), Premium::DoubleLetter);
        assert_eq!(at(7, 5), Premium::Plain);
        assert_eq!(layout.iter().filter(|(_, _, p)| *p == Premium::TripleWord).count(), 8);
        assert_eq!(layout.iter().filter(|(_, _, p)| *p == Premium::DoubleWord).count(), 17);
        assert_eq!(layout.iter().filter(|(_, _, p)| *p == Premium::TripleLetter).count(), 12);
        assert_eq!(layout.iter().filter(|(_, _, p)| *p == Premium::DoubleLetter).count(), 24);
    }

    #[test]
    fn test_parse_client_hello() {
        let msg: ClientMessage = "hello;Alice;PC".parse().unwrap();
        assert_eq!(
            msg,
            ClientMessage::Hello {
                name: "Alice".to_string(),
                features: "PC".to_string()
            }
        );
    }

    #[test]
    fn test_name_with_comma_rejected() {
        let err = "HELLO;Al,ice;PC".parse::<ClientMessage>().unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { field: "name", .. }));
        assert_eq!(err.code(), ErrorCode::MalformedMessage);
        assert!("PASS;Al,ice;A".parse::<ClientMessage>().is_err());
    }

    #[test]
    fn test_swap_keeps_name_on_the_wire() {
        let named = ClientMessage::Swap {
            name: Some("Bob".to_string()),
            tiles: vec!['Q', '-'],
        };
        assert_eq!(named.to_string(), "PASS;Bob;Q -");
        let anonymous = ClientMessage::Swap {
            name: None,
            tiles: vec!['Q'],
        };
        assert_eq!(anonymous.to_string(), "PASS;Q");
    }

    #[test]
    fn test_parse_client_move() {
        let msg: ClientMessage = "MOVE;Bob;HORN H F 8\r\n".parse().unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                name: "Bob".to_string(),
                coordinates: "HORN H F 8".to_string()
            }
        );
    }

    #[test]
    fn test_parse_client_pass_variants() {
        assert_eq!("PASS".parse::<ClientMessage>(), Ok(ClientMessage::Pass));
        assert_eq!(
            "PASS;a b -".parse::<ClientMessage>(),
            Ok(ClientMessage::Swap {
                name: None,
                tiles: vec!['A', 'B', '-']
            })
        );
        assert_eq!(
            "PASS;Bob;Q Z".parse::<ClientMessage>(),
            Ok(ClientMessage::Swap {
                name: Some("Bob".to_string()),
                tiles: vec!['Q', 'Z']
            })
        );
        assert!("PASS;Bob".parse::<ClientMessage>().is_err());
    }

    #[test]
    fn test_parse_client_errors() {
        assert_eq!("".parse::<ClientMessage>(), Err(ProtocolError::Empty));
        assert_eq!(
            "DANCE;now".parse::<ClientMessage>(),
            Err(ProtocolError::UnknownCommand("DANCE".to_string()))
        );
        let err = "HELLO;Alice".parse::<ClientMessage>().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::FieldCount {
                command: "HELLO",
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(err.code(), ErrorCode::MalformedMessage);
        assert!("CLIENTREADY; ".parse::<ClientMessage>().is_err());
    }

    #[test]
    fn test_chat_text_keeps_separators() {
        let msg: ClientMessage = "CHAT;Alice;hi; there".parse().unwrap();
        assert_eq!(
            msg,
            ClientMessage::Chat {
                name: "Alice".to_string(),
                text: "hi; there".to_string()
            }
        );
    }

    #[test]
    fn test_server_message_lines() {
        assert_eq!(
            ServerMessage::Tiles {
                tiles: vec!['A', '-', 'Q']
            }
            .to_string(),
            "TILES;A - Q"
        );
        assert_eq!(
            ServerMessage::Start {
                names: vec!["Alice".to_string(), "Bob".to_string()]
            }
            .to_string(),
            "START;Alice;Bob"
        );
        assert_eq!(
            ServerMessage::error(ErrorCode::OutOfTurn, "wait for your turn").to_string(),
            "ERROR;OUT_OF_TURN;wait for your turn"
        );
        assert_eq!(
            ServerMessage::GameOver {
                winner: "Alice".to_string(),
                score: 120
            }
            .to_string(),
            "GAMEOVER;Alice;120"
        );
    }

    #[test]
    fn test_parse_server_messages() {
        let msg: ServerMessage = "HELLO;Alice,Bob;PC".parse().unwrap();
        assert_eq!(
            msg,
            ServerMessage::Hello {
                names: vec!["Alice".to_string(), "Bob".to_string()],
                features: "PC".to_string()
            }
        );

        let msg: ServerMessage = "TILES;".parse().unwrap();
        assert_eq!(msg, ServerMessage::Tiles { tiles: vec![] });

        let msg: ServerMessage = "ERROR;INVALID_MOVE;overwrite".parse().unwrap();
        assert_eq!(
            msg,
            ServerMessage::Error {
                code: ErrorCode::InvalidMove,
                message: "overwrite".to_string()
            }
        );

        let msg: ServerMessage = "MOVE;Bob;HORN H F 8;14".parse().unwrap();
        assert_eq!(
            msg,
            ServerMessage::Move {
                name: "Bob".to_string(),
                coordinates: "HORN H F 8".to_string(),
                points: 14
            }
        );

        assert!("MOVE;Bob;HORN H F 8;many".parse::<ServerMessage>().is_err());
    }

    #[test]
    fn test_board_snapshot_length_checked() {
        let cells = EMPTY_CELL.to_string().repeat(BOARD_SIZE * BOARD_SIZE);
        let msg: ServerMessage = format!("BOARD;{cells}").parse().unwrap();
        assert_eq!(msg, ServerMessage::Board { cells });
        assert!("BOARD;...".parse::<ServerMessage>().is_err());
    }

    #[test]
    fn test_error_code_text() {
        for code in [
            ErrorCode::InvalidMove,
            ErrorCode::InvalidWord,
            ErrorCode::OutOfTurn,
            ErrorCode::ServerFull,
            ErrorCode::NoGame,
        ] {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
        }
    }
}
