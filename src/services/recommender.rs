use std::sync::Arc;

use crate::{
    config::Config,
    error::OrchestrationError,
    models::{EvaluatedCandidate, MoodQuery, PresentableResult},
    services::{
        fetcher::CandidateFetcher,
        parser::ResponseParser,
        providers::{CatalogProvider, RecommendationOracle},
        selection::{
            SelectionPolicy, DEFAULT_LIMIT, MAX_REQUESTED_CANDIDATES, MIN_REQUESTED_CANDIDATES,
        },
    },
};

/// Tunables for a [`Recommender`], usually derived from [`Config`]
#[derive(Debug, Clone)]
pub struct RecommenderSettings {
    pub policy: SelectionPolicy,
    pub limit: usize,
    pub requested_candidates: usize,
    pub line_fallback: bool,
    pub image_base_url: String,
}

impl RecommenderSettings {
    pub fn for_policy(policy: SelectionPolicy, image_base_url: impl Into<String>) -> Self {
        Self {
            policy,
            limit: DEFAULT_LIMIT,
            requested_candidates: policy.requested_candidates(),
            line_fallback: true,
            image_base_url: image_base_url.into(),
        }
    }
}

impl From<&Config> for RecommenderSettings {
    fn from(config: &Config) -> Self {
        let policy = config.selection_policy;
        let requested_candidates = config
            .candidate_count
            .unwrap_or_else(|| policy.requested_candidates())
            .clamp(MIN_REQUESTED_CANDIDATES, MAX_REQUESTED_CANDIDATES);

        Self {
            policy,
            limit: DEFAULT_LIMIT,
            requested_candidates,
            line_fallback: config.line_fallback,
            image_base_url: config.tmdb_image_base_url.clone(),
        }
    }
}

/// Turns a mood into up to three presentable movie picks
///
/// One run asks the oracle for candidates, parses its reply, looks every
/// candidate up in the catalog in order, and applies the selection policy.
pub struct Recommender {
    oracle: Arc<dyn RecommendationOracle>,
    fetcher: CandidateFetcher,
    parser: ResponseParser,
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(
        oracle: Arc<dyn RecommendationOracle>,
        catalog: Arc<dyn CatalogProvider>,
        settings: RecommenderSettings,
    ) -> Self {
        let min_candidates = settings
            .policy
            .min_candidates()
            .min(settings.requested_candidates);

        Self {
            oracle,
            fetcher: CandidateFetcher::new(catalog),
            parser: ResponseParser::new(min_candidates, settings.line_fallback),
            settings,
        }
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    /// Runs the full pipeline for one mood
    ///
    /// Only oracle failures and unrecoverable replies are errors. Fewer than
    /// `limit` qualifying picks, including none, is a successful result.
    pub async fn recommend(
        &self,
        mood: &MoodQuery,
    ) -> Result<Vec<PresentableResult>, OrchestrationError> {
        let prompt = build_prompt(mood, self.settings.requested_candidates);

        // Ask the oracle; any transport or status failure aborts the run
        let raw = self.oracle.complete(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, oracle = self.oracle.name(), "Oracle call failed");
            OrchestrationError::oracle(e.to_string())
        })?;

        // Recover candidates, falling back to a line scan when enabled
        let candidates = self.parser.parse(&raw).map_err(|e| {
            tracing::warn!(error = %e, "Oracle reply could not be parsed");
            e
        })?;

        tracing::info!(
            mood = %mood,
            candidates = candidates.len(),
            "Parsed oracle candidates"
        );

        // Look candidates up one at a time, in the order the oracle gave them
        let mut evaluated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let record = self.fetcher.fetch_catalog_record(&candidate.title).await;
            // No record means nothing to fetch videos for
            let trailer = match &record {
                Some(record) => self.fetcher.fetch_trailer(&record.id).await,
                None => None,
            };
            evaluated.push(EvaluatedCandidate {
                candidate,
                record,
                trailer,
            });
        }

        // Filter and truncate without reordering
        Ok(self.settings.policy.select(
            evaluated,
            self.settings.limit,
            &self.settings.image_base_url,
        ))
    }
}

/// Instruction sent to the oracle
pub fn build_prompt(mood: &MoodQuery, count: usize) -> String {
    format!(
        r#"Recommend {count} movies that match the mood "{mood}".
Respond only with a JSON object of the form
{{"movies": [{{"title": "Movie Title", "why": "One sentence on why it fits the mood."}}]}}
with exactly {count} entries, most fitting first. Use the movie's original release title without the year."#,
        count = count,
        mood = mood.as_str()
    )
}
