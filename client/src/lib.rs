//! # Word Game Client Library
//!
//! This library provides a thin graphical client for the word game server.
//! It holds no game rules: everything it shows is rebuilt from the messages
//! the server broadcasts, and everything the player does is sent as a typed
//! command for the server to accept or reject.
//!
//! ## Architecture Overview
//!
//! ### Network Thread
//! The TCP connection runs on its own tokio runtime. The render loop talks to
//! it through two channels, one for outgoing messages and one for events, so
//! a slow server never stalls drawing.
//!
//! ### Render Loop
//! Each frame the client drains network events into its local state, reads
//! the command line, and draws the board, rack, scores and message log with
//! `macroquad`.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Local copy of the board, own rack, scores, whose turn it is and a short
//! log of recent events.
//!
//! ### Input Module (`input`)
//! Command line editing and the translation of commands such as
//! `move HORN H F 8` or `swap A B -` into protocol messages.
//!
//! ### Network Module (`network`)
//! Connection thread and the line reader and writer.
//!
//! ### Rendering Module (`rendering`)
//! Board with coloured premium squares, sidebar and command line.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::ClientGameState;
//! use client::network::{NetworkEvent, NetworkHandle};
//! use shared::ClientMessage;
//!
//! let mut network = NetworkHandle::spawn("127.0.0.1:8080".to_string())?;
//! let mut state = ClientGameState::new("Alice");
//!
//! network.send(ClientMessage::Hello {
//!     name: "Alice".to_string(),
//!     features: "PC".to_string(),
//! });
//!
//! // Once per frame
//! for event in network.poll() {
//!     if let NetworkEvent::Message(message) = event {
//!         state.apply(&message);
//!     }
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
