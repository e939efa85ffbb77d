//! storefront-replay
//!
//! Replays a scripted shopper session against an in-memory catalog and
//! prints the rendered storefront chrome after every step.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use storefront_core::client::{Catalog, CatalogClient};
use storefront_core::infrastructure::paths;
use storefront_core::observability::init_tracing;
use storefront_core::replay::{Replay, Script};
use storefront_core::worker::StorefrontWorker;
use storefront_core::{initialize, Config, Result};

/// Replay a storefront session script
#[derive(Parser)]
#[command(name = "storefront-replay")]
#[command(version)]
#[command(about = "Replay a scripted storefront session", long_about = None)]
struct Cli {
    /// Catalog fixture (JSON) served by the in-memory commerce client
    #[arg(long)]
    catalog: PathBuf,

    /// Session script (JSON)
    #[arg(long)]
    script: PathBuf,

    /// Configuration file (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long)]
    no_persist: bool,

    /// Print only the final frame
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = cli.config.as_deref().map_or_else(|| Ok(Config::default()), Config::load)?;
    if cli.data_dir.is_some() {
        config.data_dir.clone_from(&cli.data_dir);
    }

    init_tracing(&config);
    tracing::debug!(catalog = ?cli.catalog, script = ?cli.script, "starting replay");

    let client = CatalogClient::new(Catalog::load(&cli.catalog)?);
    let worker = if cli.no_persist {
        StorefrontWorker::new(&client)
    } else {
        StorefrontWorker::open(&client, &paths::get_data_dir(config.data_dir.as_deref()))?
    };

    let script = Script::load(&cli.script)?;
    let mut replay = Replay::new(initialize(&config), worker, &client, config.locale(), Instant::now());
    let frames = replay.run(&script)?;

    if cli.quiet {
        if let Some(last) = frames.last() {
            println!("{last}");
        }
    } else {
        for frame in &frames {
            println!("{frame}");
        }
    }

    for path in replay.navigations() {
        println!("navigated: {path}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            eprintln!("storefront-replay: {e}");
            ExitCode::FAILURE
        }
    }
}
