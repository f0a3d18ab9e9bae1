//! Song Finder - identify a song from a short audio clip.
//!
//! The clip is fingerprinted by a recognition service, then enriched with an artist
//! profile from the music catalog and the song's lyrics. Everything is available from
//! the command line or through the HTTP API started by `serve`.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod recognition;
pub mod staging;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so `identify --json` output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("song_finder=info".parse()?))
        .init();

    cli::run_command(&args)
}
