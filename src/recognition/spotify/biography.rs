//! Biography resolution: an ordered fallback chain.
//!
//! The catalog API has no biography field, so the text comes from the first strategy that
//! produces something:
//!
//! 1. [`PageScrape`] - the `"biography"` fragment embedded in the public artist page
//! 2. [`EnhancedSynthesis`] - a paragraph built from the facts we already have
//! 3. [`DesktopEndpoint`] - the legacy web-player backend
//! 4. [`GenericSummary`] - a short fallback paragraph
//!
//! When every strategy comes back empty the profile gets [`NO_BIOGRAPHY`]. The biography is
//! never an empty string.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::CatalogConfig;
use crate::recognition::domain::{Album, ProviderError};
use crate::recognition::json::Node;

/// Sentinel used when no strategy produced text.
pub const NO_BIOGRAPHY: &str = "No biographical information available.";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BIOGRAPHY_TEXT_MARKER: &str = r#""biography":{"text":""#;
const BIOGRAPHY_KEY: &str = r#""biography":"#;

/// Everything a strategy may use to describe an artist.
#[derive(Debug, Clone, Copy)]
pub struct ArtistFacts<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub genres: &'a [String],
    pub popularity: u32,
    pub followers: u64,
    /// Albums already gathered for the profile, in profile order
    pub albums: &'a [Album],
    pub access_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiographyOutcome {
    Found(String),
    Absent,
}

impl BiographyOutcome {
    /// `Found` only for non-blank text.
    fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self::Found(text),
            _ => Self::Absent,
        }
    }
}

/// One link of the fallback chain.
#[async_trait]
pub trait BiographyStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, facts: &ArtistFacts<'_>) -> BiographyOutcome;
}

/// Runs strategies in order; the first `Found` wins.
pub struct BiographyResolver {
    strategies: Vec<Box<dyn BiographyStrategy>>,
}

impl BiographyResolver {
    pub fn new(strategies: Vec<Box<dyn BiographyStrategy>>) -> Self {
        Self { strategies }
    }

    /// The production chain.
    pub fn standard(http_client: reqwest::Client, config: &CatalogConfig) -> Self {
        Self::new(vec![
            Box::new(PageScrape {
                http_client: http_client.clone(),
                web_url: config.web_url.clone(),
            }),
            Box::new(EnhancedSynthesis),
            Box::new(DesktopEndpoint {
                http_client,
                desktop_url: config.desktop_url.clone(),
            }),
            Box::new(GenericSummary),
        ])
    }

    pub async fn resolve(&self, facts: &ArtistFacts<'_>) -> String {
        for strategy in &self.strategies {
            if let BiographyOutcome::Found(text) = strategy.resolve(facts).await {
                tracing::debug!("Biography for '{}' from {}", facts.name, strategy.name());
                return text;
            }
        }
        tracing::info!("No biography source produced text for '{}'", facts.name);
        NO_BIOGRAPHY.to_string()
    }
}

// ============================================================================
// Page scrape
// ============================================================================

/// Reads the biography embedded in the public artist page.
pub struct PageScrape {
    http_client: reqwest::Client,
    web_url: String,
}

impl PageScrape {
    async fn fetch_page(&self, artist_id: &str) -> Result<String, ProviderError> {
        let url = format!("{}/artist/{}", self.web_url, artist_id);
        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(response.status()));
        }
        response.text().await.map_err(ProviderError::from_reqwest)
    }
}

#[async_trait]
impl BiographyStrategy for PageScrape {
    fn name(&self) -> &'static str {
        "artist page"
    }

    async fn resolve(&self, facts: &ArtistFacts<'_>) -> BiographyOutcome {
        match self.fetch_page(facts.id).await {
            Ok(html) => BiographyOutcome::from_text(extract_biography(&html)),
            Err(e) => {
                tracing::debug!("Artist page unavailable for '{}': {}", facts.name, e);
                BiographyOutcome::Absent
            }
        }
    }
}

/// Pull the biography text out of an artist page.
///
/// Tries the exact `"biography":{"text":"…"}` form first, then a brace-balanced scan of
/// whatever object follows `"biography":`.
pub fn extract_biography(html: &str) -> Option<String> {
    if let Some(start) = html.find(BIOGRAPHY_TEXT_MARKER) {
        let rest = &html[start + BIOGRAPHY_TEXT_MARKER.len()..];
        if let Some(text) = string_literal(rest).and_then(unescape) {
            if !text.trim().is_empty() {
                return Some(text);
            }
        }
    }

    let start = html.find(BIOGRAPHY_KEY)?;
    let object = balanced_object(html[start + BIOGRAPHY_KEY.len()..].trim_start())?;
    let value: Value = serde_json::from_str(object).ok()?;
    Node::new(&value)
        .get("text")
        .str()
        .map(str::to_string)
        .filter(|text| !text.trim().is_empty())
}

/// Raw contents of a JSON string literal whose opening quote has been consumed.
fn string_literal(input: &str) -> Option<&str> {
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(&input[..i]),
            _ => {}
        }
    }
    None
}

fn unescape(raw: &str) -> Option<String> {
    serde_json::from_str(&format!("\"{}\"", raw)).ok()
}

/// The `{...}` object at the start of `input`, respecting strings and escapes.
fn balanced_object(input: &str) -> Option<&str> {
    if !input.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// Enhanced synthesis
// ============================================================================

/// Writes a descriptive paragraph from catalog facts.
pub struct EnhancedSynthesis;

#[async_trait]
impl BiographyStrategy for EnhancedSynthesis {
    fn name(&self) -> &'static str {
        "synthesis"
    }

    async fn resolve(&self, facts: &ArtistFacts<'_>) -> BiographyOutcome {
        if facts.name.trim().is_empty() {
            return BiographyOutcome::Absent;
        }
        BiographyOutcome::Found(synthesize(facts))
    }
}

pub fn synthesize(facts: &ArtistFacts<'_>) -> String {
    let mut bio = String::from(facts.name);

    if facts.genres.is_empty() {
        bio.push_str(" is a recognized artist in the music industry. ");
    } else {
        bio.push_str(" is a prominent artist in ");
        if facts.genres.len() == 1 {
            bio.push_str(&format!("the {} genre. ", facts.genres[0]));
        } else {
            bio.push_str(&format!("the {} genres. ", join_list(facts.genres.iter())));
        }
    }

    bio.push_str(&format!(
        "{} on Spotify, with a popularity index of {} out of 100. ",
        popularity_tier(facts.popularity),
        facts.popularity
    ));
    bio.push_str(&format!(
        "Their music has reached {} followers on the platform.",
        format_thousands(facts.followers)
    ));

    if !facts.albums.is_empty() {
        let albums = facts.albums.iter().take(5).map(|album| match album.release_year() {
            Some(year) => format!("\"{}\" ({})", album.name, year),
            None => format!("\"{}\"", album.name),
        });
        bio.push_str(&format!("\n\nNotable releases include {}.", join_list(albums)));

        let tracks: Vec<String> = facts
            .albums
            .iter()
            .flat_map(|album| &album.tracks)
            .take(5)
            .map(|track| format!("\"{}\"", track.name))
            .collect();
        if !tracks.is_empty() {
            bio.push_str(&format!(
                "\n\nWell-known songs include {}.",
                join_list(tracks.iter())
            ));
        }
    }

    bio.push_str(&format!("\n\nDiscover more music by {} on Spotify.", facts.name));
    bio
}

fn popularity_tier(popularity: u32) -> &'static str {
    match popularity {
        p if p > 80 => "Currently one of the most popular artists",
        p if p > 60 => "Enjoys great popularity",
        p if p > 40 => "Maintains a solid presence",
        _ => "Has a presence",
    }
}

/// "a", "a and b", "a, b and c".
fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.as_ref().to_string(),
        Some((last, head)) => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Legacy desktop endpoint
// ============================================================================

/// Queries the web-player desktop backend, which sometimes still returns biographies.
pub struct DesktopEndpoint {
    http_client: reqwest::Client,
    desktop_url: String,
}

impl DesktopEndpoint {
    async fn fetch(&self, facts: &ArtistFacts<'_>) -> Result<Value, ProviderError> {
        let url = format!("{}/artists/{}/desktop?format=json", self.desktop_url, facts.id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(facts.access_token)
            .header("app-platform", "WebPlayer")
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(response.status()));
        }
        response.json().await.map_err(ProviderError::from_reqwest)
    }
}

#[async_trait]
impl BiographyStrategy for DesktopEndpoint {
    fn name(&self) -> &'static str {
        "desktop endpoint"
    }

    async fn resolve(&self, facts: &ArtistFacts<'_>) -> BiographyOutcome {
        match self.fetch(facts).await {
            Ok(body) => BiographyOutcome::from_text(desktop_biography(&body)),
            Err(e) => {
                tracing::debug!("Desktop endpoint unavailable for '{}': {}", facts.name, e);
                BiographyOutcome::Absent
            }
        }
    }
}

/// `artist.biography.text`, else top-level `biography.text`.
fn desktop_biography(body: &Value) -> Option<String> {
    let root = Node::new(body);
    root.get("artist")
        .get("biography")
        .get("text")
        .string()
        .or_else(|| root.get("biography").get("text").string())
}

// ============================================================================
// Generic summary
// ============================================================================

/// Last resort: a couple of sentences from genres, popularity and followers.
pub struct GenericSummary;

#[async_trait]
impl BiographyStrategy for GenericSummary {
    fn name(&self) -> &'static str {
        "generic summary"
    }

    async fn resolve(&self, facts: &ArtistFacts<'_>) -> BiographyOutcome {
        if facts.name.trim().is_empty() {
            return BiographyOutcome::Absent;
        }

        let mut bio = format!("{} is an artist ", facts.name);
        if facts.genres.is_empty() {
            bio.push_str("with a notable career in music.");
        } else {
            bio.push_str(&format!("known for the genres: {}.", facts.genres.join(", ")));
        }
        bio.push_str(&format!(
            " Currently has a popularity of {} out of 100 on Spotify.",
            facts.popularity
        ));
        bio.push_str(&format!(
            " Has {} followers on the platform.",
            format_thousands(facts.followers)
        ));
        BiographyOutcome::Found(bio)
    }
}
