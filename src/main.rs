#![forbid(unsafe_code)]

use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

mod audit;
mod cli;
mod config;
mod error;
mod slack;
mod utils;

use cli::Cli;
use config::Config;
use slack::SlackClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    utils::logging::init_tracing(&config.logging);
    info!(report = ?cli.report, "slack seat audit starting");

    let client = SlackClient::new(&config.slack)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = audit::run(&client, &config, cli.report, &cli.channels, Utc::now(), &mut out).await {
        error!(code = err.error_code(), "audit failed: {}", err);
        return Err(err.into());
    }

    info!("slack seat audit finished");
    Ok(())
}
