//! Connection registry for the game server
//!
//! This module tracks every open connection on the server side, including:
//! - Connection lifecycle (accept, handshake, disconnect)
//! - Player name registration and uniqueness
//! - Ready flags used to reach a quorum before a game starts
//! - Outbound queues used to reply to one client or broadcast to all
//!
//! The registry is owned by the turn coordinator and never shared, so all of
//! its state changes happen in the same order the coordinator sees events.

use log::{debug, info, warn};
use shared::{ErrorCode, ServerMessage};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("server is full")]
    ServerFull,
    #[error("name {0} is already taken")]
    DuplicateName(String),
    #[error("send HELLO first")]
    NotRegistered,
    #[error("already registered as {0}")]
    AlreadyRegistered(String),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::ServerFull => ErrorCode::ServerFull,
            RegistryError::DuplicateName(_) => ErrorCode::DuplicateName,
            RegistryError::NotRegistered => ErrorCode::NotRegistered,
            RegistryError::AlreadyRegistered(_) => ErrorCode::MalformedMessage,
        }
    }
}

/// An open connection and what it has told us about itself
///
/// Each client maintains:
/// - Connection metadata (ID, address)
/// - The name and feature flags from its handshake, once received
/// - Whether it has declared itself ready for the next game
/// - The queue feeding its writer task
#[derive(Debug)]
pub struct Client {
    /// Unique connection identifier assigned by the accept loop
    pub id: u32,
    /// Peer address, for logging
    pub addr: SocketAddr,
    /// Player name, set by HELLO
    pub name: Option<String>,
    /// Feature flags the client advertised
    pub features: String,
    /// Set by CLIENTREADY, cleared when a game ends
    pub ready: bool,
    outbound: mpsc::UnboundedSender<String>,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            addr,
            name: None,
            features: String::new(),
            ready: false,
            outbound,
        }
    }

    /// Queues a message for this client's writer task
    ///
    /// Returns false if the connection is already gone.
    pub fn send(&self, message: &ServerMessage) -> bool {
        self.outbound.send(message.to_string()).is_ok()
    }

    pub fn is_registered(&self) -> bool {
        self.name.is_some()
    }
}

/// Manages all open connections
///
/// Connections are kept in id order, which is also the order players joined,
/// so seating and broadcasts are deterministic.
pub struct ClientManager {
    clients: BTreeMap<u32, Client>,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: BTreeMap::new(),
            max_clients,
        }
    }

    /// Adds a new connection if there is room for it
    pub fn add_client(
        &mut self,
        id: u32,
        addr: SocketAddr,
        outbound: mpsc::UnboundedSender<String>,
    ) -> Result<(), RegistryError> {
        if self.clients.len() >= self.max_clients {
            warn!("Rejecting connection {} from {}: server full", id, addr);
            return Err(RegistryError::ServerFull);
        }

        info!("Client {} connected from {}", id, addr);
        self.clients.insert(id, Client::new(id, addr, outbound));
        Ok(())
    }

    /// Removes a connection, returning it if it was known
    pub fn remove_client(&mut self, client_id: &u32) -> Option<Client> {
        let client = self.clients.remove(client_id)?;
        info!(
            "Client {} disconnected ({})",
            client.id,
            client.name.as_deref().unwrap_or("unregistered")
        );
        Some(client)
    }

    pub fn get(&self, client_id: u32) -> Option<&Client> {
        self.clients.get(&client_id)
    }

    /// Records the handshake name and features of a connection
    pub fn register(
        &mut self,
        client_id: u32,
        name: &str,
        features: &str,
    ) -> Result<(), RegistryError> {
        if self.find_client_by_name(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        let client = self
            .clients
            .get_mut(&client_id)
            .ok_or(RegistryError::NotRegistered)?;
        if let Some(existing) = &client.name {
            return Err(RegistryError::AlreadyRegistered(existing.clone()));
        }

        info!("Client {} registered as {} [{}]", client_id, name, features);
        client.name = Some(name.to_string());
        client.features = features.to_string();
        Ok(())
    }

    /// Registered name of a connection
    pub fn name_of(&self, client_id: u32) -> Result<&str, RegistryError> {
        self.clients
            .get(&client_id)
            .and_then(|c| c.name.as_deref())
            .ok_or(RegistryError::NotRegistered)
    }

    /// Names are matched case-insensitively
    pub fn find_client_by_name(&self, name: &str) -> Option<u32> {
        self.clients
            .values()
            .find(|c| {
                c.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .map(|c| c.id)
    }

    pub fn set_ready(&mut self, client_id: u32) -> Result<(), RegistryError> {
        match self.clients.get_mut(&client_id) {
            Some(client) if client.is_registered() => {
                client.ready = true;
                Ok(())
            }
            _ => Err(RegistryError::NotRegistered),
        }
    }

    pub fn clear_ready(&mut self) {
        for client in self.clients.values_mut() {
            client.ready = false;
        }
    }

    /// Names of ready clients in joining order
    pub fn ready_names(&self) -> Vec<String> {
        self.clients
            .values()
            .filter(|c| c.ready)
            .filter_map(|c| c.name.clone())
            .collect()
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.clients.values().filter_map(|c| c.name.clone()).collect()
    }

    pub fn send_to(&self, client_id: u32, message: &ServerMessage) {
        match self.clients.get(&client_id) {
            Some(client) => {
                if !client.send(message) {
                    debug!("Client {} has gone, dropped: {}", client_id, message);
                }
            }
            None => debug!("No client {} for: {}", client_id, message),
        }
    }

    /// Sends to every registered client except `exclude`
    pub fn broadcast(&self, message: &ServerMessage, exclude: Option<u32>) {
        for client in self.clients.values() {
            if Some(client.id) == exclude || !client.is_registered() {
                continue;
            }
            if !client.send(message) {
                debug!("Client {} has gone, dropped broadcast", client.id);
            }
        }
    }

    /// Returns the number of open connections
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
