use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod run;

use config::AppConfig;

/// Spatial accessibility scores (E2SFCA / 2SFCA) over an OSM street network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Overrides `threads` from the configuration
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let result = AppConfig::from_file(&args.config).and_then(|mut config| {
        if args.threads.is_some() {
            config.threads = args.threads;
        }
        run::execute(&config)
    });

    match result {
        Ok(summary) => {
            info!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
