//! CW Keyer
//!
//! Sends Morse through a transceiver's key line and runs the antenna tune
//! sequence, controlled from a line console.

mod console;
mod output;
mod ports;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cw_keyer::Keyer;
use cw_radio::{Radio, RadioModel};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use console::Console;
use output::LogOutput;
use settings::Settings;

/// Sent LED-only once the keyer is up
const READY_BANNER: &str = "READY";

#[derive(Parser)]
#[command(name = "keyer", version)]
#[command(about = "CW keyer with radio tune control")]
struct Args {
    /// Settings file (default: $XDG_CONFIG_HOME/cw-keyer/settings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Radio model: MOCK, FT-857D or FT-991A
    #[arg(short, long)]
    radio: Option<RadioModel>,

    /// Serial port of the radio's CAT interface
    #[arg(short, long)]
    port: Option<String>,

    /// CAT baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// List serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("keyer={level},cw_keyer={level},cw_radio={level},cw_protocol={level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_ports {
        for port in ports::enumerate_ports()? {
            println!("{}", port.display_label());
        }
        return Ok(());
    }

    let settings_path = args.config.clone().or_else(Settings::default_path);
    let settings = match &settings_path {
        Some(path) => Settings::load_from(path),
        None => {
            warn!("No config directory, using default settings");
            Settings::default()
        }
    };

    // Command line overrides apply to this run only
    let mut session = settings.clone();
    if let Some(radio) = args.radio {
        session.radio = radio.name().to_string();
    }
    if let Some(port) = args.port {
        session.port = port;
    }
    if let Some(baud) = args.baud {
        session.baud_rate = baud;
    }

    let model = session.radio_model().context("Invalid radio model in settings")?;
    info!("Starting CW keyer ({} at {} WPM)", model, session.wpm);

    let config = session.keyer_config();
    let radio = Radio::connect(
        model,
        &session.port,
        session.baud_rate,
        config.cat_timeout(),
    )
    .await
    .with_context(|| {
        format!(
            "Failed to connect to {} on {} @ {}",
            model, session.port, session.baud_rate
        )
    })?;

    let keyer = Keyer::start(radio, LogOutput::new(), config, session.current_message_text())
        .context("Failed to start keyer")?;

    if let Err(e) = keyer.enqueue_transmission(READY_BANNER, false).await {
        warn!("Could not queue ready banner: {}", e);
    }

    console::run(Console::new(keyer, settings, settings_path)).await
}
