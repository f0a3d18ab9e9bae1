//! Shazam fingerprint recognition (RapidAPI).
//!
//! Sends a raw audio clip and decodes the matched track, if any.

pub mod decoder;
mod client;

pub use client::{ShazamClient, limit_audio};
