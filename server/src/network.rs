//! Server network layer handling TCP connections and the coordinator loop

use crate::coordinator::{ServerSettings, TurnCoordinator};
use crate::dictionary::Dictionary;
use log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Messages sent from connection tasks to the coordinator
#[derive(Debug)]
pub enum InternalEvent {
    Connected {
        client_id: u32,
        addr: SocketAddr,
        outbound: mpsc::UnboundedSender<String>,
    },
    Line {
        client_id: u32,
        line: String,
    },
    Disconnected {
        client_id: u32,
    },
}

/// Main server tying the listener to the turn coordinator
pub struct Server {
    listener: TcpListener,
    coordinator: TurnCoordinator,

    // Communication channels
    event_tx: mpsc::UnboundedSender<InternalEvent>,
    event_rx: mpsc::UnboundedReceiver<InternalEvent>,
}

impl Server {
    pub async fn new(
        addr: &str,
        settings: ServerSettings,
        dictionary: Arc<dyn Dictionary>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            coordinator: TurnCoordinator::new(settings, dictionary),
            event_tx,
            event_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections and feeds their events to the coordinator until
    /// the listener task stops
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Server {
            listener,
            mut coordinator,
            event_tx,
            mut event_rx,
        } = self;

        tokio::spawn(accept_connections(listener, event_tx));

        while let Some(event) = event_rx.recv().await {
            coordinator.handle_event(event);
        }

        info!("Server shutting down");
        Ok(())
    }
}

/// Spawns one task per accepted connection
async fn accept_connections(listener: TcpListener, events: mpsc::UnboundedSender<InternalEvent>) {
    let mut next_client_id: u32 = 1;

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let client_id = next_client_id;
                next_client_id = next_client_id.wrapping_add(1);
                tokio::spawn(handle_connection(stream, addr, client_id, events.clone()));
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        if events.is_closed() {
            break;
        }
    }
}

/// Runs the reader and writer halves of one connection until either ends
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    client_id: u32,
    events: mpsc::UnboundedSender<InternalEvent>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Could not disable Nagle for {}: {}", addr, e);
    }
    let (reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    let connected = InternalEvent::Connected {
        client_id,
        addr,
        outbound: outbound_tx,
    };
    if events.send(connected).is_err() {
        return;
    }

    tokio::select! {
        result = read_lines(reader, client_id, &events) => {
            if let Err(e) = result {
                debug!("Read error from client {}: {}", client_id, e);
            }
        }
        result = write_lines(writer, outbound_rx) => {
            if let Err(e) = result {
                debug!("Write error to client {}: {}", client_id, e);
            }
        }
    }

    let _ = events.send(InternalEvent::Disconnected { client_id });
}

/// Forwards every non-empty line as an [`InternalEvent::Line`]
pub async fn read_lines<R>(
    reader: R,
    client_id: u32,
    events: &mpsc::UnboundedSender<InternalEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if events.send(InternalEvent::Line { client_id, line }).is_err() {
            break;
        }
    }
    Ok(())
}

/// Writes queued messages, one per line, until the queue is closed
pub async fn write_lines<W>(
    mut writer: W,
    mut outbound: mpsc::UnboundedReceiver<String>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbound.recv().await {
        let mut data = line.into_bytes();
        data.push(b'\n');
        writer.write_all(&data).await?;
        writer.flush().await?;
    }
    Ok(())
}
