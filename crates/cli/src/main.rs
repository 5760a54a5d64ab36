//! Perch - run an IRC-shaped bot on an XMPP account.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perch_core::config::{self, BotConfig};
use perch_core::Driver;
use perch_xmpp::NativeDriver;
use tracing::info;

mod bot;
mod telemetry;

/// Perch - IRC-shaped bot driver for XMPP
#[derive(Parser)]
#[command(name = "perch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and run the bot loop
    Run {
        /// Overrides the configured log level
        #[arg(short, long)]
        log_level: Option<String>,
        /// Emit logs as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and print the connection target
    CheckConfig,
}

fn load(path: Option<&Path>) -> Result<BotConfig> {
    let path = path.map_or_else(config::config_path, Path::to_path_buf);
    config::load_config_from(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn describe(config: &BotConfig) -> String {
    let connection = &config.connection;
    format!(
        "{}:{} ({}) as {} / {}",
        connection.host,
        connection.port,
        if connection.is_secure() { "tls" } else { "plain" },
        connection.username,
        connection.nick,
    )
}

fn run(config: BotConfig) -> Result<()> {
    info!("Perch starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(server = %describe(&config), "connecting");

    let mut driver = NativeDriver::new(config.connection.clone())
        .with_wait_timeout(Duration::from_millis(config.session.wait_timeout_ms));
    driver.connect().context("Failed to connect")?;

    bot::run(&mut driver, &config.autojoin.channels).context("Bot loop stopped")?;
    anyhow::bail!("XMPP connection closed")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { log_level, json } => {
            let level = log_level.unwrap_or_else(|| config.logging.level.clone());
            telemetry::init(&level, json)?;
            run(config)
        }
        Commands::CheckConfig => {
            println!("Configuration OK: {}", describe(&config));
            if !config.autojoin.channels.is_empty() {
                println!("Autojoin: {}", config.autojoin.channels.join(", "));
            }
            Ok(())
        }
    }
}
