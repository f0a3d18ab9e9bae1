//! Full identification pipeline on a local file.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::recognition::{ConsolidatedResult, RecognitionService};
use crate::staging::UploadStaging;

/// Identify a song from an audio file and print the consolidated result
pub fn cmd_identify(rt: &Runtime, config: &Config, path: &Path, json: bool) -> anyhow::Result<()> {
    if !path.is_file() {
        return Err(Error::not_found(path).into());
    }

    let service = RecognitionService::from_config(config)?;
    let staging = UploadStaging::new(&config.staging);

    let bytes = std::fs::read(path).with_context(format!("reading {}", path.display()))?;
    let mut upload = staging
        .store(&bytes, content_type_for(path))
        .with_context(format!("staging {}", path.display()))?;
    let audio = upload.read_limited()?;

    if !json {
        println!("Identifying: {:?}", path);
        println!();
    }
    let result = rt.block_on(service.identify(&audio));
    upload.delete()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Content type from the file extension, for the staging allow-list.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

fn print_result(result: &ConsolidatedResult) {
    let Some(song) = result.song() else {
        println!("✗ {}", result.message());
        return;
    };

    println!("✓ {}", result.message());
    println!();
    println!("  Title:  {}", song.title);
    println!("  Artist: {}", song.artist);
    if let Some(album) = &song.album {
        println!("  Album:  {}", album);
    }
    if let Some(date) = &song.release_date {
        println!("  Released: {}", date);
    }
    if !song.genres.is_empty() {
        println!("  Genre:  {}", song.genres.join(", "));
    }

    match result.artist() {
        Some(artist) => {
            println!();
            println!(
                "  {} - {} followers, popularity {}",
                artist.name, artist.followers, artist.popularity
            );
            println!("  {}", artist.biography);
            for album in &artist.albums {
                let tracks = album.tracks.len();
                match album.release_year() {
                    Some(year) => println!("    {} ({}, {} tracks)", album.name, year, tracks),
                    None => println!("    {} ({} tracks)", album.name, tracks),
                }
            }
            if let Some(url) = &artist.profile_url {
                println!("  {}", url);
            }
        }
        None => {
            println!();
            println!("  (no artist profile available)");
        }
    }

    println!();
    match result.lyrics() {
        Some(lyrics) => println!("{}", lyrics),
        None => println!("  (no lyrics available)"),
    }
}
