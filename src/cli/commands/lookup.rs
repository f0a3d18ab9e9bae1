//! Single-provider lookups: catalog profile or lyrics without recognition.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::recognition::lyrics::LyricsClient;
use crate::recognition::spotify::{SpotifyClient, TokenCache};
use crate::recognition::{LyricsResult, http_client};

/// Print the catalog profile for an artist
pub fn cmd_artist(rt: &Runtime, config: &Config, name: &str, song: &str) -> anyhow::Result<()> {
    let (client_id, client_secret) = config.credentials.spotify()?;
    let client = SpotifyClient::new(
        http_client(&config.http)?,
        client_id,
        client_secret,
        &config.catalog,
        config.cache.policy(),
        TokenCache::new(),
    );

    let Some(profile) = rt.block_on(client.enrich(name, song)) else {
        println!("✗ No catalog artist found for '{}'", name);
        return Ok(());
    };

    println!("✓ {} ({})", profile.name, profile.id);
    println!("  Followers:  {}", profile.followers);
    println!("  Popularity: {}", profile.popularity);
    if !profile.genres.is_empty() {
        println!("  Genres:     {}", profile.genres.join(", "));
    }
    println!();
    println!("{}", profile.biography);

    if !profile.albums.is_empty() {
        println!();
        println!("Albums:");
        for album in &profile.albums {
            println!(
                "  {} [{}]",
                album.name,
                album.release_date.as_deref().unwrap_or("unknown date")
            );
            for (i, track) in album.tracks.iter().enumerate() {
                println!("    {:>2}. {}", i + 1, track.name);
            }
        }
    }

    for link in &profile.social_links {
        println!();
        println!("  {}: {}", link.platform, link.url);
    }
    Ok(())
}

/// Print the lyrics for a song
pub fn cmd_lyrics(rt: &Runtime, config: &Config, artist: &str, title: &str) -> anyhow::Result<()> {
    let client = LyricsClient::new(http_client(&config.http)?, &config.lyrics, config.cache.policy());

    match rt.block_on(client.lyrics(artist, title)) {
        LyricsResult::Lyrics(text) => {
            println!("{} - {}", artist, title);
            println!();
            println!("{}", text);
        }
        LyricsResult::Error(reason) => println!("✗ {}", reason),
    }
    Ok(())
}
