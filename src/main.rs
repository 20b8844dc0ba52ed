mod blockers;
mod cli;
mod clients;
mod collector;
mod config;
mod error;
mod mailer;
mod output;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting buildbrief - Jenkins CI report generator");
    cli.execute().await?;

    Ok(())
}
