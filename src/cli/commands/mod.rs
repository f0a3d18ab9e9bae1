//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `identify`: Full pipeline on a local audio file
//! - `lookup`: Catalog or lyrics lookups on their own
//! - `serve`: HTTP surface plus the staging sweeper
//! - `setup`: Config file and credential report

mod identify;
mod lookup;
mod serve;
mod setup;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};

pub use identify::cmd_identify;
pub use lookup::{cmd_artist, cmd_lyrics};
pub use serve::cmd_serve;
pub use setup::cmd_check_config;

/// Song Finder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// RapidAPI key for the recognition service
    #[arg(long, global = true, env = "RAPIDAPI_KEY", hide_env_values = true)]
    pub rapidapi_key: Option<String>,

    /// Spotify client id
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify client secret
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Identify a song from an audio file
    Identify {
        /// Path to the audio clip
        path: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up an artist profile in the catalog
    Artist {
        /// Artist name
        name: String,
        /// Song title used to pick the matching album
        #[arg(short, long, default_value = "")]
        song: String,
    },
    /// Fetch lyrics for a song
    Lyrics {
        artist: String,
        title: String,
    },
    /// Run the HTTP API
    Serve {
        /// Address to listen on (default from config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Show config location and which credentials are set
    CheckConfig {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    /// Load the config file and apply credentials given on the command line or environment.
    pub fn load_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };

        let credentials = &mut config.credentials;
        if let Some(key) = &self.rapidapi_key {
            credentials.rapidapi_key = Some(key.clone());
        }
        if let Some(id) = &self.spotify_client_id {
            credentials.spotify_client_id = Some(id.clone());
        }
        if let Some(secret) = &self.spotify_client_secret {
            credentials.spotify_client_secret = Some(secret.clone());
        }

        config
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.load_config();
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Identify { path, json } => cmd_identify(&rt, &config, path, *json),
        Commands::Artist { name, song } => cmd_artist(&rt, &config, name, song),
        Commands::Lyrics { artist, title } => cmd_lyrics(&rt, &config, artist, title),
        Commands::Serve { bind } => cmd_serve(&rt, &config, bind.as_deref()),
        Commands::CheckConfig { init } => cmd_check_config(cli.config.as_deref(), &config, *init),
    }
}
