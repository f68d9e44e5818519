//! Typed command line and its translation into protocol messages

use macroquad::prelude::*;
use shared::{parse_tiles, ClientMessage, FEATURE_CHAT, FEATURE_PASS};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(ClientMessage),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}, try: hello ready move pass swap chat quit")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("bad tiles {0:?}")]
    Tiles(String),
}

/// Turns one typed line into a command for the player `name`
pub fn parse_command(input: &str, name: &str) -> Result<Command, InputError> {
    let input = input.trim();
    let (verb, rest) = match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };
    let name = name.to_string();

    let message = match verb.to_ascii_lowercase().as_str() {
        "hello" => ClientMessage::Hello {
            name,
            features: format!("{}{}", FEATURE_PASS, FEATURE_CHAT),
        },
        "ready" => ClientMessage::ClientReady { name },
        "move" => {
            if rest.split_whitespace().count() != 4 {
                return Err(InputError::Usage("move WORD H|V COLUMN ROW"));
            }
            ClientMessage::Move {
                name,
                coordinates: rest.split_whitespace().collect::<Vec<_>>().join(" "),
            }
        }
        "pass" => ClientMessage::Pass,
        "swap" => {
            let tiles = parse_tiles(rest).map_err(|_| InputError::Tiles(rest.to_string()))?;
            if tiles.is_empty() {
                return Err(InputError::Usage("swap A B -"));
            }
            ClientMessage::Swap {
                name: Some(name),
                tiles,
            }
        }
        "chat" => {
            if rest.is_empty() {
                return Err(InputError::Usage("chat TEXT"));
            }
            ClientMessage::Chat {
                name,
                text: rest.to_string(),
            }
        }
        "abort" => ClientMessage::Abort { name },
        "quit" | "exit" => return Ok(Command::Quit),
        _ => return Err(InputError::Unknown(verb.to_string())),
    };
    Ok(Command::Send(message))
}

/// Collects keystrokes into a line until Enter is pressed
#[derive(Debug, Default)]
pub struct CommandLine {
    buffer: String,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Applies one typed character; returns the finished line on Enter
    pub fn push(&mut self, c: char) -> Option<String> {
        match c {
            '\r' | '\n' => {
                let line = std::mem::take(&mut self.buffer);
                (!line.trim().is_empty()).then_some(line)
            }
            '\u{8}' | '\u{7f}' => {
                self.buffer.pop();
                None
            }
            c if !c.is_control() => {
                self.buffer.push(c);
                None
            }
            _ => None,
        }
    }

    /// Reads this frame's keyboard input
    pub fn update(&mut self) -> Option<String> {
        // Control keys are handled as key presses below
        while let Some(c) = get_char_pressed() {
            if !c.is_control() {
                self.buffer.push(c);
            }
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.push('\u{8}');
        }
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            return self.push('\n');
        }
        None
    }
}
