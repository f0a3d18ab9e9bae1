//! Spotify catalog integration
//!
//! Turns an artist name (and the recognized song title) into an [`ArtistProfile`]
//! with albums, tracks, images and a biography.
//!
//! API docs: https://developer.spotify.com/documentation/web-api
//!
//! [`ArtistProfile`]: crate::recognition::domain::ArtistProfile

pub mod biography;
pub mod dto;
pub mod token;
mod adapter;
mod client;

pub use client::SpotifyClient;
pub use token::TokenCache;
