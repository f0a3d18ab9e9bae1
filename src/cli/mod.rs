//! Command-line interface for song-finder.
//!
//! This module provides commands for identifying clips, looking up artists and lyrics,
//! and running the HTTP API.

mod commands;

pub use commands::{Cli, Commands, run_command};
