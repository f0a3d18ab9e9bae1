//! Lyrics lookup (lyrics.ovh)
//!
//! API docs: https://lyricsovh.docs.apiary.io

pub mod dto;
mod client;

pub use client::{LyricsClient, NO_LYRICS};
