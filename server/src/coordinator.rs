//! Turn coordinator: the single writer of all game state
//!
//! Connection tasks never touch the registry or the session. They forward
//! [`InternalEvent`]s through a channel and the coordinator applies them one
//! at a time, so every broadcast reflects a consistent state sequence.
//!
//! Lifecycle:
//! - `AcceptingConnections`: clients say HELLO and CLIENTREADY. Once enough
//!   clients are ready a game starts.
//! - `AwaitingAction`: only the active player's MOVE, PASS or ABORT changes
//!   anything. Everyone else is told OUT_OF_TURN.
//! - On game over, abort or a seated player's disconnect the coordinator
//!   announces GAMEOVER, clears the ready flags and accepts again.

use crate::client_manager::{ClientManager, RegistryError};
use crate::config::{GameConfig, GameRules};
use crate::dictionary::Dictionary;
use crate::error::{ConfigError, GameError, MoveError};
use crate::game::GameSession;
use crate::moves::Move;
use crate::network::InternalEvent;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ClientMessage, ErrorCode, ProtocolError, ServerMessage, SERVER_FEATURES};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the coordinator needs to know before the first connection
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub rules: GameRules,
    /// Ready clients needed to start a game
    pub min_players: usize,
    /// Connection limit
    pub max_players: usize,
    /// Fixed seed for reproducible games
    pub seed: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            min_players: 2,
            max_players: 4,
            seed: None,
        }
    }
}

impl ServerSettings {
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: config.rules()?,
            min_players: config.min_players,
            max_players: config.max_players,
            seed: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AcceptingConnections,
    AwaitingAction { active: String },
}

/// A refused request, reported only to the connection that sent it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rejection {
    code: ErrorCode,
    message: String,
}

impl Rejection {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<RegistryError> for Rejection {
    fn from(e: RegistryError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<GameError> for Rejection {
    fn from(e: GameError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<MoveError> for Rejection {
    fn from(e: MoveError) -> Self {
        GameError::from(e).into()
    }
}

impl From<ProtocolError> for Rejection {
    fn from(e: ProtocolError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

pub struct TurnCoordinator {
    clients: ClientManager,
    settings: ServerSettings,
    dictionary: Arc<dyn Dictionary>,
    session: Option<GameSession>,
    phase: Phase,
    games_started: u64,
}

impl TurnCoordinator {
    pub fn new(settings: ServerSettings, dictionary: Arc<dyn Dictionary>) -> Self {
        Self {
            clients: ClientManager::new(settings.max_players),
            settings,
            dictionary,
            session: None,
            phase: Phase::AcceptingConnections,
            games_started: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    fn in_game(&self) -> bool {
        matches!(self.phase, Phase::AwaitingAction { .. })
    }

    pub fn handle_event(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::Connected {
                client_id,
                addr,
                outbound,
            } => self.on_connected(client_id, addr, outbound),
            InternalEvent::Line { client_id, line } => self.on_line(client_id, &line),
            InternalEvent::Disconnected { client_id } => self.on_disconnected(client_id),
        }
    }

    fn on_connected(
        &mut self,
        client_id: u32,
        addr: SocketAddr,
        outbound: mpsc::UnboundedSender<String>,
    ) {
        if let Err(e) = self.clients.add_client(client_id, addr, outbound.clone()) {
            // Dropping the last sender closes the connection once this is written
            let reply = ServerMessage::error(e.code(), e.to_string());
            let _ = outbound.send(reply.to_string());
        }
    }

    fn on_line(&mut self, client_id: u32, line: &str) {
        let result = line
            .parse::<ClientMessage>()
            .map_err(Rejection::from)
            .and_then(|message| self.handle_message(client_id, message));

        if let Err(rejection) = result {
            debug!(
                "Rejected {:?} from client {}: {} {}",
                line, client_id, rejection.code, rejection.message
            );
            self.clients.send_to(
                client_id,
                &ServerMessage::error(rejection.code, rejection.message),
            );
        }
    }

    fn on_disconnected(&mut self, client_id: u32) {
        let Some(client) = self.clients.remove_client(&client_id) else {
            return;
        };
        let Some(name) = client.name else {
            return;
        };

        let seated = self
            .session
            .as_ref()
            .is_some_and(|s| s.player(&name).is_some());
        if self.in_game() && seated {
            warn!("{} left during a game", name);
            self.abort_game(&name);
        }
    }

    fn handle_message(&mut self, client_id: u32, message: ClientMessage) -> Result<(), Rejection> {
        match message {
            ClientMessage::Hello { name, features } => self.hello(client_id, &name, &features),
            ClientMessage::ClientReady { name } => self.ready(client_id, &name),
            ClientMessage::Move { name, coordinates } => {
                self.play_move(client_id, &name, &coordinates)
            }
            ClientMessage::Pass => self.pass(client_id),
            ClientMessage::Swap { name, tiles } => self.swap(client_id, name.as_deref(), &tiles),
            ClientMessage::Abort { name } => self.abort(client_id, &name),
            ClientMessage::Chat { name, text } => self.chat(client_id, &name, &text),
        }
    }

    fn hello(&mut self, client_id: u32, name: &str, features: &str) -> Result<(), Rejection> {
        if self.in_game() {
            return Err(Rejection::new(
                ErrorCode::GameInProgress,
                "wait for the current game to finish",
            ));
        }
        self.clients.register(client_id, name, features)?;

        self.clients.send_to(
            client_id,
            &ServerMessage::Hello {
                names: self.clients.registered_names(),
                features: SERVER_FEATURES.to_string(),
            },
        );
        self.clients.broadcast(
            &ServerMessage::Welcome {
                name: name.to_string(),
                features: features.to_string(),
            },
            Some(client_id),
        );
        Ok(())
    }

    /// Registered name of the sender, checked against the name it claims
    fn identify(&self, client_id: u32, claimed: &str) -> Result<String, Rejection> {
        let name = self.clients.name_of(client_id)?;
        if !name.eq_ignore_ascii_case(claimed) {
            return Err(Rejection::new(
                ErrorCode::MalformedMessage,
                format!("connection is registered as {}", name),
            ));
        }
        Ok(name.to_string())
    }

    fn ready(&mut self, client_id: u32, claimed: &str) -> Result<(), Rejection> {
        if self.in_game() {
            return Err(Rejection::new(
                ErrorCode::GameInProgress,
                "a game is already running",
            ));
        }
        let name = self.identify(client_id, claimed)?;
        self.clients.set_ready(client_id)?;

        let ready = self.clients.ready_names();
        info!("{} is ready ({}/{})", name, ready.len(), self.settings.min_players);
        self.clients
            .broadcast(&ServerMessage::ServerReady { names: ready.clone() }, None);

        if ready.len() >= self.settings.min_players {
            self.start_game(ready);
        }
        Ok(())
    }

    fn start_game(&mut self, names: Vec<String>) {
        let same_roster = self
            .session
            .as_ref()
            .is_some_and(|s| s.player_names() == names);
        if same_roster {
            if let Some(session) = self.session.as_mut() {
                session.reset();
            }
        } else {
            let rng = match self.settings.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.games_started)),
                None => StdRng::from_entropy(),
            };
            self.session = Some(GameSession::new(
                names,
                self.settings.rules.clone(),
                Arc::clone(&self.dictionary),
                rng,
            ));
        }
        self.games_started += 1;

        let Some(session) = self.session.as_ref() else {
            return;
        };
        let seating = session.player_names();
        info!("Game {} started: {}", self.games_started, seating.join(", "));

        self.clients
            .broadcast(&ServerMessage::Start { names: seating }, None);
        for player in session.players() {
            if let Some(id) = self.clients.find_client_by_name(player.name()) {
                self.clients.send_to(
                    id,
                    &ServerMessage::Tiles {
                        tiles: player.rack().letters(),
                    },
                );
            }
        }
        self.clients.broadcast(
            &ServerMessage::Board {
                cells: session.board_snapshot(),
            },
            None,
        );
        self.announce_turn();
    }

    fn announce_turn(&mut self) {
        let Some(active) = self
            .session
            .as_ref()
            .and_then(|s| s.current_player())
            .map(|p| p.name().to_string())
        else {
            self.phase = Phase::AcceptingConnections;
            return;
        };
        self.clients
            .broadcast(&ServerMessage::Turn { name: active.clone() }, None);
        self.phase = Phase::AwaitingAction { active };
    }

    /// Name of the sender if it may act right now
    fn authorize(&self, client_id: u32) -> Result<String, Rejection> {
        let name = self.clients.name_of(client_id)?;
        match &self.phase {
            Phase::AcceptingConnections => {
                Err(Rejection::new(ErrorCode::NoGame, "no game is running"))
            }
            Phase::AwaitingAction { active } if active == name => Ok(name.to_string()),
            Phase::AwaitingAction { active } => Err(Rejection::new(
                ErrorCode::OutOfTurn,
                format!("it is {}'s turn", active),
            )),
        }
    }

    fn session_mut(&mut self) -> Result<&mut GameSession, Rejection> {
        self.session
            .as_mut()
            .ok_or_else(|| Rejection::new(ErrorCode::NoGame, "no game is running"))
    }

    fn play_move(&mut self, client_id: u32, claimed: &str, coordinates: &str) -> Result<(), Rejection> {
        let name = self.authorize(client_id)?;
        self.identify(client_id, claimed)?;
        let mv = Move::parse(coordinates)?;

        let session = self.session_mut()?;
        let outcome = session.play_move(&mv)?;
        let rack = session
            .player(&name)
            .map(|p| p.rack().letters())
            .unwrap_or_default();
        let score = session.player(&name).map(|p| p.score()).unwrap_or_default();
        let board = session.board_snapshot();

        self.clients.broadcast(
            &ServerMessage::Move {
                name: name.clone(),
                coordinates: mv.to_string(),
                points: outcome.points,
            },
            None,
        );
        self.clients
            .send_to(client_id, &ServerMessage::Tiles { tiles: rack });
        self.clients
            .broadcast(&ServerMessage::Board { cells: board }, None);
        self.clients
            .broadcast(&ServerMessage::Score { name, score }, None);
        self.advance();
        Ok(())
    }

    fn pass(&mut self, client_id: u32) -> Result<(), Rejection> {
        let name = self.authorize(client_id)?;
        self.session_mut()?.pass()?;

        self.clients.broadcast(&ServerMessage::Pass { name }, None);
        self.advance();
        Ok(())
    }

    fn swap(
        &mut self,
        client_id: u32,
        claimed: Option<&str>,
        tiles: &[char],
    ) -> Result<(), Rejection> {
        let name = self.authorize(client_id)?;
        if let Some(claimed) = claimed {
            self.identify(client_id, claimed)?;
        }
        let session = self.session_mut()?;
        session.swap(tiles)?;
        let rack = session
            .player(&name)
            .map(|p| p.rack().letters())
            .unwrap_or_default();

        self.clients
            .send_to(client_id, &ServerMessage::Tiles { tiles: rack });
        self.clients.broadcast(
            &ServerMessage::Swap {
                name,
                count: tiles.len(),
            },
            None,
        );
        self.advance();
        Ok(())
    }

    fn abort(&mut self, client_id: u32, claimed: &str) -> Result<(), Rejection> {
        let name = self.authorize(client_id)?;
        self.identify(client_id, claimed)?;
        self.abort_game(&name);
        Ok(())
    }

    fn chat(&mut self, client_id: u32, claimed: &str, text: &str) -> Result<(), Rejection> {
        let name = self.identify(client_id, claimed)?;
        self.clients.broadcast(
            &ServerMessage::Chat {
                name,
                text: text.to_string(),
            },
            None,
        );
        Ok(())
    }

    /// Moves on to the next player, or finishes the game if it is over
    fn advance(&mut self) {
        let over = match self.session.as_mut() {
            Some(session) if !session.is_over() => {
                session.next_player();
                false
            }
            _ => true,
        };
        if over {
            self.finish_game();
        } else {
            self.announce_turn();
        }
    }

    fn abort_game(&mut self, name: &str) {
        info!("{} aborted the game", name);
        self.clients.broadcast(
            &ServerMessage::Abort {
                name: name.to_string(),
            },
            None,
        );
        if let Some(session) = self.session.as_mut() {
            session.end();
        }
        self.finish_game();
    }

    fn finish_game(&mut self) {
        let result = self
            .session
            .as_ref()
            .and_then(|s| s.winner())
            .map(|p| (p.name().to_string(), p.score()));

        if let Some((winner, score)) = result {
            info!("Game over, {} wins with {} points", winner, score);
            self.clients
                .broadcast(&ServerMessage::GameOver { winner, score }, None);
        }
        self.clients.clear_ready();
        self.phase = Phase::AcceptingConnections;
    }
}
