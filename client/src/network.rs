//! TCP connection to the server, run on its own tokio runtime thread
//!
//! The render loop never blocks on the socket. It pushes outgoing
//! [`ClientMessage`]s into one channel and drains [`NetworkEvent`]s from
//! another once per frame.

use log::{debug, error, info, warn};
use shared::{ClientMessage, ServerMessage};
use std::thread;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Connected,
    Message(ServerMessage),
    /// A line the client could not understand
    Invalid(String),
    Disconnected(String),
}

/// The render loop's end of the connection
pub struct NetworkHandle {
    commands: mpsc::UnboundedSender<ClientMessage>,
    events: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl NetworkHandle {
    /// Starts a runtime thread that connects to `server` and pumps messages
    pub fn spawn(server: String) -> std::io::Result<Self> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        thread::Builder::new()
            .name("network".to_string())
            .spawn(move || runtime.block_on(run_connection(server, command_rx, event_tx)))?;

        Ok(Self {
            commands: command_tx,
            events: event_rx,
        })
    }

    /// Queues a message; false once the connection is gone
    pub fn send(&self, message: ClientMessage) -> bool {
        self.commands.send(message).is_ok()
    }

    /// Everything received since the last call
    pub fn poll(&mut self) -> Vec<NetworkEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

async fn run_connection(
    server: String,
    commands: mpsc::UnboundedReceiver<ClientMessage>,
    events: mpsc::UnboundedSender<NetworkEvent>,
) {
    info!("Connecting to {}", server);
    let stream = match TcpStream::connect(&server).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", server, e);
            let _ = events.send(NetworkEvent::Disconnected(e.to_string()));
            return;
        }
    };
    info!("Connected to {}", server);
    let _ = events.send(NetworkEvent::Connected);

    let (reader, writer) = stream.into_split();
    let reason = tokio::select! {
        result = forward_server_lines(reader, &events) => match result {
            Ok(()) => "server closed the connection".to_string(),
            Err(e) => e.to_string(),
        },
        result = forward_commands(writer, commands) => match result {
            Ok(()) => "client closed".to_string(),
            Err(e) => e.to_string(),
        },
    };

    warn!("Disconnected: {}", reason);
    let _ = events.send(NetworkEvent::Disconnected(reason));
}

/// Parses server lines into events until the stream ends
pub async fn forward_server_lines<R>(
    reader: R,
    events: &mpsc::UnboundedSender<NetworkEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match line.parse::<ServerMessage>() {
            Ok(message) => NetworkEvent::Message(message),
            Err(e) => {
                debug!("Unreadable server line {:?}: {}", line, e);
                NetworkEvent::Invalid(line)
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
    Ok(())
}

/// Writes each queued message as one line until the queue closes
pub async fn forward_commands<W>(
    mut writer: W,
    mut commands: mpsc::UnboundedReceiver<ClientMessage>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = commands.recv().await {
        let line = format!("{}\n", message);
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
