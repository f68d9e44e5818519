use clap::Parser;
use client::game::ClientGameState;
use client::input::{parse_command, Command, CommandLine};
use client::network::{NetworkEvent, NetworkHandle};
use client::rendering::Renderer;
use log::{info, warn};
use macroquad::prelude::*;
use shared::ClientMessage;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Player name announced in the handshake
    #[arg(short = 'n', long)]
    name: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "1000")]
    width: usize,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "700")]
    height: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client as {}", args.name);
    info!("Connecting to: {}", args.server);
    info!("Commands: hello, ready, move WORD H F 8, pass, swap A B -, chat TEXT, quit");

    let network = NetworkHandle::spawn(args.server.clone())?;

    let conf = Conf {
        window_title: format!("Word game: {}", args.name),
        window_width: args.width as i32,
        window_height: args.height as i32,
        ..Default::default()
    };
    macroquad::Window::from_config(conf, run(args, network));

    Ok(())
}

async fn run(args: Args, mut network: NetworkHandle) {
    let mut state = ClientGameState::new(args.name);
    let mut command_line = CommandLine::new();
    let mut renderer = Renderer::new(args.width, args.height);

    loop {
        for event in network.poll() {
            match event {
                NetworkEvent::Connected => {
                    state.connected = true;
                    state.push_log("Connected, type hello to join");
                }
                NetworkEvent::Message(message) => state.apply(&message),
                NetworkEvent::Invalid(line) => warn!("Ignoring server line {:?}", line),
                NetworkEvent::Disconnected(reason) => {
                    state.connected = false;
                    state.push_log(format!("Disconnected: {}", reason));
                }
            }
        }

        if let Some(line) = command_line.update() {
            match parse_command(&line, &state.name) {
                Ok(Command::Send(message)) => {
                    if !network.send(message) {
                        state.push_log("Not connected");
                    }
                }
                Ok(Command::Quit) => {
                    if state.is_my_turn() {
                        network.send(ClientMessage::Abort {
                            name: state.name.clone(),
                        });
                    }
                    info!("Quitting");
                    break;
                }
                Err(e) => state.push_log(e.to_string()),
            }
        }

        renderer.render(&state, command_line.text());
        next_frame().await;
    }
}
