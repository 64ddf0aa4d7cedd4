use serde::{Deserialize, Serialize};

use crate::models::{EvaluatedCandidate, PresentableResult};

/// Number of picks shown to the user
pub const DEFAULT_LIMIT: usize = 3;

/// Bounds for how many candidates the oracle may be asked for
pub const MIN_REQUESTED_CANDIDATES: usize = 3;
pub const MAX_REQUESTED_CANDIDATES: usize = 6;

/// Lenient mode asks for exactly as many titles as it shows
const LENIENT_REQUESTED_CANDIDATES: usize = 3;
/// A single usable title is enough to render something in lenient mode
const LENIENT_MIN_CANDIDATES: usize = 1;
/// Strict mode over-asks to make up for candidates it will discard
const STRICT_REQUESTED_CANDIDATES: usize = 6;
const STRICT_MIN_CANDIDATES: usize = 3;

/// Decides which evaluated candidates are presentable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Any catalog match qualifies; missing poster or trailer become placeholders
    Lenient,
    /// Only candidates with a catalog match, a poster and a trailer qualify
    #[default]
    Strict,
}

impl SelectionPolicy {
    /// How many candidates to ask the oracle for
    pub fn requested_candidates(self) -> usize {
        match self {
            SelectionPolicy::Lenient => LENIENT_REQUESTED_CANDIDATES,
            SelectionPolicy::Strict => STRICT_REQUESTED_CANDIDATES,
        }
    }

    /// Fewest parsed candidates accepted before the reply counts as malformed
    pub fn min_candidates(self) -> usize {
        match self {
            SelectionPolicy::Lenient => LENIENT_MIN_CANDIDATES,
            SelectionPolicy::Strict => STRICT_MIN_CANDIDATES,
        }
    }

    /// Whether a candidate can be shown under this policy
    pub fn qualifies(self, evaluated: &EvaluatedCandidate) -> bool {
        let Some(record) = &evaluated.record else {
            return false;
        };

        match self {
            SelectionPolicy::Lenient => true,
            SelectionPolicy::Strict => {
                let has_poster = record
                    .poster_path
                    .as_deref()
                    .is_some_and(|p| !p.trim().is_empty());
                let has_trailer = evaluated
                    .trailer
                    .as_ref()
                    .is_some_and(|t| !t.url.is_empty());
                has_poster && has_trailer
            }
        }
    }

    /// Picks the first `limit` qualifying candidates, preserving input order
    pub fn select(
        self,
        evaluated: Vec<EvaluatedCandidate>,
        limit: usize,
        image_base_url: &str,
    ) -> Vec<PresentableResult> {
        let total = evaluated.len();
        let selected: Vec<PresentableResult> = evaluated
            .into_iter()
            .filter(|candidate| {
                let qualifies = self.qualifies(candidate);
                if !qualifies {
                    tracing::debug!(
                        title = %candidate.candidate.title,
                        has_record = candidate.record.is_some(),
                        has_trailer = candidate.trailer.is_some(),
                        policy = ?self,
                        "Candidate skipped"
                    );
                }
                qualifies
            })
            .take(limit)
            .map(|candidate| present(candidate, image_base_url))
            .collect();

        tracing::info!(
            policy = ?self,
            candidates = total,
            selected = selected.len(),
            limit,
            "Selection completed"
        );

        selected
    }
}

fn present(evaluated: EvaluatedCandidate, image_base_url: &str) -> PresentableResult {
    let EvaluatedCandidate {
        candidate,
        record,
        trailer,
    } = evaluated;

    let (poster_url, release_year) = match record {
        Some(record) => (
            record
                .poster_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| poster_url(image_base_url, &p)),
            record.release_year,
        ),
        None => (None, None),
    };

    PresentableResult {
        title: candidate.title,
        reason: candidate.reason,
        poster_url,
        release_year,
        trailer_url: trailer.map(|t| t.url),
    }
}

fn poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!(
        "{}/{}",
        image_base_url.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}
