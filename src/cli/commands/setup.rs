//! Config file and credential report.

use std::path::Path;

use crate::config::{self, Config, ConfigError};

/// Show where the config lives and which credentials are usable
pub fn cmd_check_config(explicit: Option<&Path>, config: &Config, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if path.exists() {
        println!("Config file: {}", path.display());
    } else if init {
        // Defaults only: credentials from flags or env stay out of the file
        config::save_to(&Config::default(), &path)?;
        println!("✓ Wrote default config to {}", path.display());
    } else {
        println!("Config file: {} (not found, using defaults)", path.display());
        println!("  Run with --init to create it");
    }
    println!();

    let credentials = &config.credentials;
    let spotify = credentials.spotify();
    let checks = [
        ("Recognition (RapidAPI)", credentials.rapidapi().err(), "RAPIDAPI_KEY"),
        (
            "Catalog (Spotify)",
            spotify.err(),
            "SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET",
        ),
    ];

    let mut missing = 0;
    for (name, error, env) in checks {
        match error {
            None => println!("✓ {}: configured", name),
            Some(e) => {
                missing += 1;
                println!("✗ {}: {} (set in [credentials] or {})", name, e, env);
            }
        }
    }
    println!("✓ Lyrics (lyrics.ovh): no credentials needed");

    println!();
    println!("Staging dir: {}", config.staging.resolved_dir().display());
    println!("Server bind: {}", config.server.bind);

    if missing > 0 {
        println!();
        println!("{} provider(s) not configured; identify and serve will refuse to start.", missing);
    }
    Ok(())
}
