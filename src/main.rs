#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use config::{Config, DEFAULT_PLAYLIST_PATH, DEFAULT_STATUS_PATH};
use rewriter::{describe_patterns, run};
use status::RunOutcome;
use tracing::info;

pub mod config;
pub mod error;
pub mod patterns;
pub mod rewriter;
pub mod status;
pub mod util;

/// Rewrites the authentication cookie embedded in an M3U/HLS playlist.
///
/// The new cookie is read from the `NEW_COOKIE` environment variable (or a `.env` file)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Playlist file to rewrite in place
    #[arg(long, default_value = DEFAULT_PLAYLIST_PATH)]
    playlist: PathBuf,

    /// Where the outcome of the run is recorded
    #[arg(long, default_value = DEFAULT_STATUS_PATH)]
    status_file: PathBuf,

    /// Skip the report of cookie patterns found before updating
    #[arg(long)]
    no_describe: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    info!("Starting {} cookie update...", args.playlist.display());

    let report = if args.no_describe {
        None
    } else {
        describe_patterns(&args.playlist)
    };
    if let Some(report) = report {
        print!("{report}");
    }

    let config = Config::from_env(args.playlist, args.status_file)?;
    let result = run(&config)?;

    if result.is_success() {
        info!(
            "Cookie update completed successfully! ({} pattern(s) updated)",
            result.changes_made()
        );
    } else {
        info!("No changes made ({})", result.outcome);
    }

    if matches!(result.outcome, RunOutcome::Error { .. }) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
