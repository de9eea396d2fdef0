use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;
use uuid::Uuid;

use watchparty_client::{
    config::{CliArgs, ClientConfig},
    constants::VERSION,
    transport::room_endpoint,
    ui::{UiCommand, HELP_TEXT},
    HeadlessPlayerFactory, RoomSyncClient, TransportEvent, WsTransport,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchparty_client=debug,watchparty=debug,info".into()),
        )
        .init();

    let config = match ClientConfig::from_args(CliArgs::parse()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Cannot start room client: {}", e);
            std::process::exit(2);
        }
    };

    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("session", id = %session_id, room = config.room.as_str());
    run(config).instrument(span).await
}

async fn run(config: ClientConfig) -> Result<()> {
    tracing::info!(
        "watchparty {} joining room {} as role {}",
        VERSION,
        config.room.as_str(),
        config.role.tag()
    );

    let url = match &config.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => room_endpoint(&config.host, config.room.as_str())?.to_string(),
    };

    let (transport, mut events) = WsTransport::connect(&url)
        .await
        .with_context(|| format!("Room server unreachable at {url}"))?;
    tracing::info!("Connected to {}", url);

    let mut client = RoomSyncClient::new(config.room, config.role, transport, HeadlessPlayerFactory);
    if client.controls_enabled() {
        println!("{HELP_TEXT}");
    } else {
        println!("Joined as viewer: playback follows the room.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut connected = true;

    loop {
        tokio::select! {
            event = events.recv(), if connected => {
                match event {
                    Some(event) => {
                        if matches!(event, TransportEvent::Closed(_)) {
                            connected = false;
                        }
                        client.on_transport_event(event);
                    }
                    None => connected = false,
                }
                for message in client.take_chat() {
                    println!("> {message}");
                }
            }
            line = lines.next_line() => {
                match line.context("Failed to read input")? {
                    Some(line) => match UiCommand::parse(&line) {
                        UiCommand::Quit => break,
                        UiCommand::Help => println!("{HELP_TEXT}"),
                        UiCommand::Unknown(command) => {
                            tracing::warn!("Unknown command {}; try /help", command);
                        }
                        command => client.handle_ui(command),
                    },
                    None => break,
                }
            }
        }
    }

    client.transport().close();
    tracing::info!("Left room {}", client.room().as_str());
    Ok(())
}
