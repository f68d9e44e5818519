//! Integration tests for the networked word game
//!
//! These tests run a real server on an ephemeral port and talk to it over TCP.

use server::config::{GameRules, LetterSpec};
use server::coordinator::ServerSettings;
use server::dictionary::WordList;
use server::network::Server;
use shared::{ClientMessage, ServerMessage};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

async fn start_server(settings: ServerSettings) -> SocketAddr {
    let dictionary = Arc::new(WordList::from_words(["AA", "AT", "HORN", "FARM"]));
    let server = Server::new("127.0.0.1:0", settings, dictionary)
        .await
        .expect("Failed to bind server");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// Settings where every tile is an A, so racks are known in advance
fn all_a_settings(rack_size: usize, count: u32) -> ServerSettings {
    let mut letters = BTreeMap::new();
    letters.insert('A', LetterSpec { count, value: 1 });
    ServerSettings {
        rules: GameRules {
            rack_size,
            letters,
            ..GameRules::default()
        },
        seed: Some(3),
        ..ServerSettings::default()
    }
}

struct TestClient {
    name: String,
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr, name: &str) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            name: name.to_string(),
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, message: ClientMessage) {
        let line = format!("{}\n", message);
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }

    async fn send_raw(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> ServerMessage {
        let line = timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("Timed out waiting for server")
            .unwrap()
            .expect("Server closed the connection");
        line.parse()
            .unwrap_or_else(|e| panic!("Bad server line {:?}: {}", line, e))
    }

    /// Skips messages until one matches
    async fn recv_until<F>(&mut self, mut matches: F) -> ServerMessage
    where
        F: FnMut(&ServerMessage) -> bool,
    {
        loop {
            let message = self.recv().await;
            if matches(&message) {
                return message;
            }
        }
    }

    async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect(addr, name).await;
        client
            .send(ClientMessage::Hello {
                name: name.to_string(),
                features: "PC".to_string(),
            })
            .await;
        client
            .recv_until(|m| matches!(m, ServerMessage::Hello { .. }))
            .await;
        client
    }

    async fn ready(&mut self) {
        self.send(ClientMessage::ClientReady {
            name: self.name.clone(),
        })
        .await;
    }
}

async fn next_turn(client: &mut TestClient) -> String {
    match client
        .recv_until(|m| matches!(m, ServerMessage::Turn { .. }))
        .await
    {
        ServerMessage::Turn { name } => name,
        _ => unreachable!(),
    }
}

/// Joins Alice and Bob, readies both and returns them as (active, waiting)
async fn two_player_game(addr: SocketAddr) -> (TestClient, TestClient) {
    let mut alice = TestClient::join(addr, "Alice").await;
    let mut bob = TestClient::join(addr, "Bob").await;
    alice.ready().await;
    bob.ready().await;

    let active = next_turn(&mut alice).await;
    assert_eq!(next_turn(&mut bob).await, active);
    if active == "Alice" {
        (alice, bob)
    } else {
        (bob, alice)
    }
}

/// HANDSHAKE AND LOBBY TESTS
mod lobby_tests {
    use super::*;

    #[tokio::test]
    async fn handshake_lists_players() {
        let addr = start_server(ServerSettings::default()).await;

        let mut alice = TestClient::connect(addr, "Alice").await;
        alice
            .send(ClientMessage::Hello {
                name: "Alice".to_string(),
                features: "PC".to_string(),
            })
            .await;
        assert_eq!(
            alice.recv().await,
            ServerMessage::Hello {
                names: vec!["Alice".to_string()],
                features: "PC".to_string()
            }
        );

        let _bob = TestClient::join(addr, "Bob").await;
        assert_eq!(
            alice.recv().await,
            ServerMessage::Welcome {
                name: "Bob".to_string(),
                features: "PC".to_string()
            }
        );
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let addr = start_server(ServerSettings::default()).await;
        let _alice = TestClient::join(addr, "Alice").await;

        let mut imposter = TestClient::connect(addr, "Alice").await;
        imposter.send_raw("HELLO;ALICE;PC").await;
        assert_eq!(imposter.recv().await.to_string().split(';').nth(1), Some("DUPLICATE_NAME"));
    }

    #[tokio::test]
    async fn server_full_closes_connection() {
        let addr = start_server(ServerSettings {
            max_players: 2,
            ..ServerSettings::default()
        })
        .await;
        let _alice = TestClient::join(addr, "Alice").await;
        let _bob = TestClient::join(addr, "Bob").await;

        let mut carol = TestClient::connect(addr, "Carol").await;
        assert!(carol.recv().await.to_string().starts_with("ERROR;SERVER_FULL"));
        let closed = timeout(RECV_TIMEOUT, carol.lines.next_line())
            .await
            .expect("Connection was not closed");
        assert!(matches!(closed, Ok(None) | Err(_)));
    }

    #[tokio::test]
    async fn quorum_starts_game_with_private_racks() {
        let addr = start_server(ServerSettings::default()).await;
        let mut alice = TestClient::join(addr, "Alice").await;
        let mut bob = TestClient::join(addr, "Bob").await;

        alice.ready().await;
        bob.ready().await;

        for client in [&mut alice, &mut bob] {
            let start = client
                .recv_until(|m| matches!(m, ServerMessage::Start { .. }))
                .await;
            assert_eq!(
                start,
                ServerMessage::Start {
                    names: vec!["Alice".to_string(), "Bob".to_string()]
                }
            );
            match client.recv().await {
                ServerMessage::Tiles { tiles } => assert_eq!(tiles.len(), 7),
                other => panic!("Expected rack, got {}", other),
            }
            match client.recv().await {
                ServerMessage::Board { cells } => assert!(cells.chars().all(|c| c == '.')),
                other => panic!("Expected board, got {}", other),
            }
            assert!(matches!(client.recv().await, ServerMessage::Turn { .. }));
        }
    }
}

/// TURN COORDINATION TESTS
mod turn_tests {
    use super::*;

    #[tokio::test]
    async fn out_of_turn_move_rejected() {
        let addr = start_server(all_a_settings(7, 40)).await;
        let (mut active, mut waiting) = two_player_game(addr).await;

        let name = waiting.name.clone();
        waiting
            .send(ClientMessage::Move {
                name,
                coordinates: "AA H H 8".to_string(),
            })
            .await;
        match waiting.recv().await {
            ServerMessage::Error { code, .. } => assert_eq!(code, shared::ErrorCode::OutOfTurn),
            other => panic!("Expected OUT_OF_TURN, got {}", other),
        }

        // The active player is still the one who can move
        active.send(ClientMessage::Pass).await;
        assert_eq!(
            active.recv().await,
            ServerMessage::Pass {
                name: active.name.clone()
            }
        );
        assert_eq!(next_turn(&mut active).await, waiting.name);
    }

    #[tokio::test]
    async fn accepted_move_is_broadcast() {
        let addr = start_server(all_a_settings(7, 40)).await;
        let (mut active, mut waiting) = two_player_game(addr).await;

        let name = active.name.clone();
        active
            .send(ClientMessage::Move {
                name: name.clone(),
                coordinates: "AA V H 7".to_string(),
            })
            .await;

        // H7 is plain and H8 doubles the word
        let expected = ServerMessage::Move {
            name: name.clone(),
            coordinates: "AA V H 7".to_string(),
            points: 4,
        };
        assert_eq!(active.recv().await, expected);
        assert_eq!(waiting.recv().await, expected);

        assert_eq!(
            active.recv().await,
            ServerMessage::Tiles {
                tiles: vec!['A'; 7]
            }
        );
        match waiting.recv().await {
            ServerMessage::Board { cells } => {
                assert_eq!(&cells[6 * 15 + 7..6 * 15 + 8], "A");
                assert_eq!(&cells[7 * 15 + 7..7 * 15 + 8], "A");
            }
            other => panic!("Expected board, got {}", other),
        }
        assert_eq!(
            waiting.recv().await,
            ServerMessage::Score { name, score: 4 }
        );
        assert_eq!(next_turn(&mut waiting).await, waiting.name);
    }

    #[tokio::test]
    async fn game_over_when_tiles_run_out() {
        let addr = start_server(all_a_settings(2, 4)).await;
        let (mut active, mut waiting) = two_player_game(addr).await;

        let name = active.name.clone();
        active
            .send(ClientMessage::Move {
                name: name.clone(),
                coordinates: "AA H G 8".to_string(),
            })
            .await;

        let over = waiting
            .recv_until(|m| matches!(m, ServerMessage::GameOver { .. }))
            .await;
        assert_eq!(
            over,
            ServerMessage::GameOver {
                winner: name,
                score: 54
            }
        );
    }

    #[tokio::test]
    async fn disconnect_ends_game() {
        let addr = start_server(ServerSettings::default()).await;
        let (active, mut waiting) = two_player_game(addr).await;
        let leaver = active.name.clone();
        drop(active);

        assert_eq!(
            waiting
                .recv_until(|m| matches!(m, ServerMessage::Abort { .. }))
                .await,
            ServerMessage::Abort { name: leaver }
        );
        assert!(matches!(
            waiting.recv().await,
            ServerMessage::GameOver { .. }
        ));
    }

    #[tokio::test]
    async fn chat_reaches_everyone() {
        let addr = start_server(ServerSettings::default()).await;
        let mut alice = TestClient::join(addr, "Alice").await;
        let mut bob = TestClient::join(addr, "Bob").await;
        alice
            .recv_until(|m| matches!(m, ServerMessage::Welcome { .. }))
            .await;

        bob.send_raw("CHAT;Bob;hello there").await;
        let expected = ServerMessage::Chat {
            name: "Bob".to_string(),
            text: "hello there".to_string(),
        };
        assert_eq!(alice.recv().await, expected);
        assert_eq!(bob.recv().await, expected);
    }
}

/// CLIENT LIBRARY TESTS
mod client_tests {
    use super::*;
    use client::game::ClientGameState;
    use client::input::{parse_command, Command};

    /// Typed commands reach the server and its replies rebuild the client view
    #[tokio::test]
    async fn client_state_follows_server() {
        let addr = start_server(all_a_settings(7, 40)).await;
        let mut alice = TestClient::connect(addr, "Alice").await;
        let mut bob = TestClient::join(addr, "Bob").await;
        let mut state = ClientGameState::new("Alice");

        for typed in ["hello", "ready"] {
            match parse_command(typed, "Alice").unwrap() {
                Command::Send(message) => alice.send(message).await,
                Command::Quit => panic!("{} should not quit", typed),
            }
        }
        bob.ready().await;

        loop {
            let message = alice.recv().await;
            state.apply(&message);
            if matches!(message, ServerMessage::Turn { .. }) {
                break;
            }
        }

        assert!(state.registered);
        assert_eq!(state.rack, vec!['A'; 7]);
        assert_eq!(state.scores.len(), 2);
        assert!(state.in_game());
        assert_eq!(state.cell(7, 7), None);
    }
}
