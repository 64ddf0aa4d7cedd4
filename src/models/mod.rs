use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

pub mod recommendation;

pub use recommendation::{RecommendationRequest, RecommendationResponse};

/// Free-text mood supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodQuery(String);

impl MoodQuery {
    /// Creates a mood query, rejecting blank input
    pub fn new(mood: impl Into<String>) -> AppResult<Self> {
        let mood = mood.into();
        let trimmed = mood.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Mood cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MoodQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A title suggested by the recommendation oracle, in the oracle's order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

/// Identifier of a record in the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Best catalog match for a candidate title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: RecordId,
    pub display_title: String,
    pub poster_path: Option<String>,
    /// Four-digit year, when the catalog knows the release date
    pub release_year: Option<String>,
}

/// A single video attached to a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub site: String,
    pub video_type: String,
    pub official: bool,
    pub key: Option<String>,
}

/// Resolved trailer link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerRef {
    pub url: String,
}

/// A candidate together with whatever the catalog lookups produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedCandidate {
    pub candidate: Candidate,
    pub record: Option<CatalogRecord>,
    pub trailer: Option<TrailerRef>,
}

/// One rendered pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentableResult {
    pub title: String,
    pub reason: String,
    pub poster_url: Option<String>,
    pub release_year: Option<String>,
    pub trailer_url: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// A movie search hit
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl From<TmdbMovie> for CatalogRecord {
    fn from(movie: TmdbMovie) -> Self {
        let release_year = movie.release_date.as_deref().and_then(release_year);

        CatalogRecord {
            id: RecordId(movie.id.to_string()),
            display_title: movie.title,
            poster_path: movie.poster_path.filter(|p| !p.trim().is_empty()),
            release_year,
        }
    }
}

/// Extracts the year from a `YYYY-MM-DD` date, ignoring anything malformed
fn release_year(date: &str) -> Option<String> {
    let year = date.get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

/// Response from GET /movie/{id}/videos
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<TmdbVideo> for VideoEntry {
    fn from(video: TmdbVideo) -> Self {
        VideoEntry {
            site: video.site,
            video_type: video.video_type,
            official: video.official,
            key: video.key,
        }
    }
}

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, trimmed; empty when the service sent none
    pub fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}
