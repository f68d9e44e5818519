use clap::{Parser, ValueEnum};
use log::{error, info};
use server::config::GameConfig;
use server::coordinator::ServerSettings;
use server::dictionary::{Dictionary, StreamingDictionary, WordList};
use server::network::Server;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DictionaryMode {
    /// Load every word into memory at startup
    Memory,
    /// Scan the word list file on each lookup
    Stream,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Game configuration file (TOML); the standard game when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Word list, one word per line
    #[arg(short, long, default_value = "dictionary.txt")]
    dictionary: String,

    /// How the word list is consulted
    #[arg(long, value_enum, default_value = "memory")]
    dictionary_mode: DictionaryMode,

    /// Ready players needed to start a game
    #[arg(long)]
    min_players: Option<usize>,

    /// Seed for tile draws and the starting player
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading game configuration from {}", path);
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };
    if let Some(min_players) = args.min_players {
        config.min_players = min_players;
    }
    let mut settings = ServerSettings::from_config(&config)?;
    settings.seed = args.seed;

    let dictionary: Arc<dyn Dictionary> = match args.dictionary_mode {
        DictionaryMode::Memory => Arc::new(WordList::load(&args.dictionary)?),
        DictionaryMode::Stream => Arc::new(StreamingDictionary::open(&args.dictionary)?),
    };

    info!(
        "Starting server: {} to {} players, rack of {}",
        settings.min_players, settings.max_players, settings.rules.rack_size
    );

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::new(&address, settings, dictionary).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
