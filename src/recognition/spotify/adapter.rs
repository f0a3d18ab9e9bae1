//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where catalog DTO types are converted to domain types.

use super::dto;
use crate::recognition::domain::{Album, ArtistProfile, Image, SocialLink, Track};

/// Public profile page for an artist id.
pub fn profile_link(artist_id: &str) -> String {
    format!("https://open.spotify.com/artist/{}", artist_id)
}

/// Build the artist profile. The biography is resolved separately and passed in.
pub fn to_profile(artist: dto::Artist, albums: Vec<Album>, biography: String) -> ArtistProfile {
    let social_links = vec![SocialLink {
        platform: "spotify".to_string(),
        url: profile_link(&artist.id),
    }];

    ArtistProfile {
        biography,
        followers: artist.followers.total,
        popularity: artist.popularity,
        genres: artist.genres,
        profile_url: artist.external_urls.spotify,
        social_links,
        images: artist.images.into_iter().map(to_image).collect(),
        albums,
        id: artist.id,
        name: artist.name,
    }
}

/// Album with its track list in provider order.
pub fn to_album(album: dto::SimpleAlbum, tracks: Vec<dto::SimpleTrack>) -> Album {
    Album {
        cover_url: album.images.first().map(|image| image.url.clone()),
        id: album.id,
        name: album.name,
        release_date: album.release_date,
        tracks: tracks.into_iter().map(to_track).collect(),
    }
}

fn to_track(track: dto::SimpleTrack) -> Track {
    Track {
        id: track.id,
        name: track.name,
        duration_ms: track.duration_ms,
        preview_url: track.preview_url,
    }
}

fn to_image(image: dto::Image) -> Image {
    Image {
        url: image.url,
        height: image.height,
        width: image.width,
    }
}

/// Album of the first searched track credited to `artist_id`.
pub fn matching_album(tracks: &[dto::SearchTrack], artist_id: &str) -> Option<String> {
    tracks
        .iter()
        .filter(|track| track.artists.iter().any(|a| a.id == artist_id))
        .find_map(|track| track.album.as_ref())
        .map(|album| album.id.clone())
        .filter(|id| !id.is_empty())
}
