/// Outbound service abstractions
///
/// The recommendation oracle (an LLM chat-completions endpoint) and the movie
/// catalog (TMDB) are reached through these traits, so the recommendation
/// pipeline can be driven by mocks in tests and by HTTP clients in production.
use crate::{
    error::AppResult,
    models::{CatalogRecord, RecordId, VideoEntry},
};

pub mod openai;
pub mod tmdb;

pub use openai::OpenAiOracle;
pub use tmdb::TmdbProvider;

/// Trait for the text-completion service that proposes titles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationOracle: Send + Sync {
    /// Sends a single prompt and returns the raw reply text
    ///
    /// Any transport, auth or status failure is an error; the reply itself is
    /// returned untouched apart from trimming.
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for movie catalog providers
///
/// Both calls return the provider's results in the order it ranked them;
/// picking a best match is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search for movies by title
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogRecord>>;

    /// Fetch all video entries attached to a record
    async fn fetch_videos(&self, record_id: &RecordId) -> AppResult<Vec<VideoEntry>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
