//! Decoder: Shazam recognition response → [`RecognizedSong`]
//!
//! This is the ONLY place that knows the shape of the recognizer's JSON.
//! The payload is deeply nested and most nodes are optional, so everything is read
//! through [`Node`] and a missing node yields `None` for that one field.
//!
//! Relevant response shape:
//! ```json
//! {
//!   "track": {
//!     "title": "Song", "subtitle": "Artist",
//!     "genres": {"primary": "Pop"},
//!     "images": {"coverart": "https://..."},
//!     "sections": [{"metadata": [{"title": "Album", "text": "..."},
//!                                {"title": "Released", "text": "2020"}]}],
//!     "hub": {"actions": [{"type": "applemusicplay", "id": "123"},
//!                         {"type": "uri", "uri": "https://...preview.m4a"}]},
//!     "providers": [{"type": "SPOTIFY", "actions": [{"uri": "spotify:search:..."}]}]
//!   }
//! }
//! ```

use serde_json::Value;

use crate::recognition::domain::{RecognitionError, RecognizedSong};
use crate::recognition::json::Node;

/// Decode a successful recognition response.
///
/// A response without a `track` object means the clip wasn't matched.
pub fn decode(body: &Value) -> Result<RecognizedSong, RecognitionError> {
    let track = Node::new(body).get("track");
    if !track.exists() {
        return Err(RecognitionError::NotIdentified);
    }

    Ok(RecognizedSong {
        title: track.get("title").string().unwrap_or_default(),
        artist: track.get("subtitle").string().unwrap_or_default(),
        album: metadata_field(track, "Album"),
        release_date: metadata_field(track, "Released"),
        // Not exposed by the recognizer
        duration: None,
        genres: primary_genre(track).into_iter().collect(),
        spotify_uri: spotify_uri(track),
        apple_music_id: hub_action(track, "applemusicplay").get("id").string(),
        cover_art_url: track.get("images").get("coverart").string(),
        preview_url: hub_action(track, "uri").get("uri").string(),
    })
}

/// Text of the first metadata row with the given title, from the first section only.
fn metadata_field(track: Node<'_>, title: &str) -> Option<String> {
    track
        .get("sections")
        .at(0)
        .get("metadata")
        .find("title", title)
        .get("text")
        .string()
}

/// Only the primary genre is read; the full genre set is not requested.
fn primary_genre(track: Node<'_>) -> Option<String> {
    track.get("genres").get("primary").string()
}

fn hub_action<'a>(track: Node<'a>, action_type: &str) -> Node<'a> {
    track.get("hub").get("actions").find("type", action_type)
}

/// First SPOTIFY provider that actually carries an action uri.
fn spotify_uri(track: Node<'_>) -> Option<String> {
    track
        .get("providers")
        .items()
        .filter(|provider| provider.get("type").str() == Some("SPOTIFY"))
        .find_map(|provider| provider.get("actions").at(0).get("uri").string())
}
