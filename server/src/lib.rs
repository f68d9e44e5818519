//! # Word Game Server Library
//!
//! This library provides the authoritative server for the networked word
//! game. It owns the canonical board, tile bag and racks, checks every move
//! a client submits, and broadcasts the results so that all clients agree on
//! the state of the game.
//!
//! ## Core Responsibilities
//!
//! ### Rules Engine
//! Moves are checked in a fixed order: inside the board, no overwritten
//! letters, tiles present in the rack, then the centre square on the first
//! move or contact with an existing letter afterwards. Accepted placements
//! are expanded into every word they form, checked against the dictionary
//! and scored with the premium squares under the new tiles.
//!
//! ### Client Management
//! Handles the complete lifecycle of client connections including:
//! - Connection establishment and the HELLO handshake
//! - Unique player names and ready flags
//! - Disconnection handling and cleanup
//!
//! ### Turn Coordination
//! A single coordinator applies every request in arrival order. Only the
//! active player may change the game; everyone else is told it is not their
//! turn and nothing is touched.
//!
//! ## Architecture Design
//!
//! ### Single Writer
//! Each connection runs a reader and a writer task, but neither mutates game
//! state. Readers forward lines to the coordinator over a channel and writers
//! drain a per-connection queue, so replies and broadcasts to one client are
//! never interleaved.
//!
//! ### Line Protocol
//! Messages are `;` separated text, one per line, described in the `shared`
//! crate. Rejections are reported only to the client that caused them.
//!
//! ## Module Organization
//!
//! ### Rules (`board`, `tile_bag`, `player`, `moves`, `validator`, `words`, `scoring`)
//! Pure game logic without any I/O.
//!
//! ### Session (`game`)
//! One match: seating, dealing, turn order, game over and the winner.
//!
//! ### Dictionary (`dictionary`)
//! Word lookup, either fully in memory or streamed from disk per lookup.
//!
//! ### Configuration (`config`, `error`)
//! Letter distribution, rack size, premium layout and player limits loaded
//! from TOML, plus the error types used throughout the crate.
//!
//! ### Server (`client_manager`, `coordinator`, `network`)
//! Connection registry, the turn coordinator and the TCP transport.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::coordinator::ServerSettings;
//! use server::dictionary::WordList;
//! use server::network::Server;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let dictionary = Arc::new(WordList::load("dictionary.txt")?);
//!     let server = Server::new("127.0.0.1:8080", ServerSettings::default(), dictionary).await?;
//!
//!     // Runs until the process is stopped
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod client_manager;
pub mod config;
pub mod coordinator;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod moves;
pub mod network;
pub mod player;
pub mod scoring;
pub mod tile_bag;
pub mod validator;
pub mod words;
