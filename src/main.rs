mod auth;
mod cli;
mod error;
mod evidence;
mod report;
mod sonar;

use std::fs::OpenOptions;
use std::path::Path;

use clap::Parser;
use cli::Cli;
use log::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Stdout carries the evidence JSON, so diagnostics go to a log file.
    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Failed to open log file {}: {e}", cli.log_file.display());
        std::process::exit(1);
    }

    info!("Running sonar analysis extraction");
    if let Err(e) = cli.execute().await {
        error!("Sonar evidence extraction failed: {e}");
        std::process::exit(1);
    }
}

fn init_logging(log_file: &Path) -> std::io::Result<()> {
    let sink = OpenOptions::new().create(true).append(true).open(log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(sink)))
        .init();
    Ok(())
}
