use std::sync::Arc;

use crate::{
    error::LookupFailure,
    models::{CatalogRecord, RecordId, TrailerRef, VideoEntry},
    services::providers::CatalogProvider,
};

/// Video platform trailers are linked on
const TRAILER_SITE: &str = "YouTube";
const TRAILER_TYPE: &str = "Trailer";
const TRAILER_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Resolves candidate titles to catalog records and trailers
///
/// Lookups never fail: provider errors are logged and reported as absence.
#[derive(Clone)]
pub struct CandidateFetcher {
    catalog: Arc<dyn CatalogProvider>,
}

impl CandidateFetcher {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    /// Best catalog match for a title
    ///
    /// Prefers the first result whose title equals the query ignoring case,
    /// otherwise the first result overall.
    pub async fn fetch_catalog_record(&self, title: &str) -> Option<CatalogRecord> {
        let results = match self.catalog.search_movies(title).await {
            Ok(results) => results,
            Err(source) => {
                let failure = LookupFailure::Catalog {
                    title: title.to_string(),
                    source,
                };
                tracing::warn!(
                    error = %failure,
                    provider = self.catalog.name(),
                    "Catalog lookup failed"
                );
                return None;
            }
        };

        let record = best_match(title, results);
        if record.is_none() {
            tracing::info!(title = %title, "No catalog match");
        }
        record
    }

    /// Best trailer for a catalog record
    pub async fn fetch_trailer(&self, record_id: &RecordId) -> Option<TrailerRef> {
        let videos = match self.catalog.fetch_videos(record_id).await {
            Ok(videos) => videos,
            Err(source) => {
                let failure = LookupFailure::Trailer {
                    record_id: record_id.to_string(),
                    source,
                };
                tracing::warn!(
                    error = %failure,
                    provider = self.catalog.name(),
                    "Trailer lookup failed"
                );
                return None;
            }
        };

        let trailer = best_trailer(videos);
        if trailer.is_none() {
            tracing::debug!(record_id = %record_id, "No playable trailer");
        }
        trailer
    }
}

fn best_match(title: &str, results: Vec<CatalogRecord>) -> Option<CatalogRecord> {
    let exact = results
        .iter()
        .position(|record| record.display_title.to_lowercase() == title.to_lowercase());

    match exact {
        Some(idx) => results.into_iter().nth(idx),
        None => results.into_iter().next(),
    }
}

fn is_trailer_site(video: &VideoEntry) -> bool {
    video.site.eq_ignore_ascii_case(TRAILER_SITE)
}

fn trailer_score(video: &VideoEntry) -> u8 {
    let mut score = 0;
    if is_trailer_site(video) {
        score += 2;
    }
    if video.video_type.eq_ignore_ascii_case(TRAILER_TYPE) {
        score += 2;
    }
    if video.official {
        score += 1;
    }
    score
}

/// Walks videos from highest to lowest score and returns the first one that
/// can be linked: hosted on the trailer site with a non-empty key
fn best_trailer(mut videos: Vec<VideoEntry>) -> Option<TrailerRef> {
    // Stable sort: equal scores keep the catalog's order
    videos.sort_by_key(|video| std::cmp::Reverse(trailer_score(video)));

    videos.into_iter().find_map(|video| {
        if !is_trailer_site(&video) {
            return None;
        }
        let key = video.key?;
        let key = key.trim();
        (!key.is_empty()).then(|| TrailerRef {
            url: format!("{}{}", TRAILER_URL_PREFIX, key),
        })
    })
}
