use serde::{Deserialize, Serialize};

use crate::services::SelectionPolicy;

use super::PresentableResult;

/// Body of POST /api/v1/recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub mood: String,
}

/// Payload rendered into the three-column result area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub mood: String,
    pub policy: SelectionPolicy,
    pub results: Vec<PresentableResult>,
    /// Informational message when fewer picks than requested qualified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl RecommendationResponse {
    pub fn new(
        mood: String,
        policy: SelectionPolicy,
        results: Vec<PresentableResult>,
        limit: usize,
    ) -> Self {
        let notice = match results.len() {
            0 => Some(match policy {
                SelectionPolicy::Strict => "No matching movies with a poster and trailer were \
                                            found for this mood. Try describing it differently."
                    .to_string(),
                SelectionPolicy::Lenient => {
                    "No matching movies were found for this mood. Try describing it differently."
                        .to_string()
                }
            }),
            n if n < limit => Some(format!(
                "Only {} of {} recommendations could be shown for this mood.",
                n, limit
            )),
            _ => None,
        };

        Self {
            mood,
            policy,
            results,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(title: &str) -> PresentableResult {
        PresentableResult {
            title: title.to_string(),
            reason: String::new(),
            poster_url: None,
            release_year: None,
            trailer_url: None,
        }
    }

    #[test]
    fn test_full_result_has_no_notice() {
        let response = RecommendationResponse::new(
            "cozy".to_string(),
            SelectionPolicy::Strict,
            vec![pick("Amelie"), pick("Paddington 2"), pick("Chef")],
            3,
        );
        assert_eq!(response.notice, None);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("notice").is_none());
        assert_eq!(json["policy"], "strict");
    }

    #[test]
    fn test_partial_result_notice() {
        let response = RecommendationResponse::new(
            "cozy".to_string(),
            SelectionPolicy::Strict,
            vec![pick("Amelie")],
            3,
        );
        assert_eq!(
            response.notice.as_deref(),
            Some("Only 1 of 3 recommendations could be shown for this mood.")
        );
    }

    #[test]
    fn test_empty_result_notice() {
        let response =
            RecommendationResponse::new("cozy".to_string(), SelectionPolicy::Lenient, vec![], 3);
        assert!(response.notice.unwrap().starts_with("No matching movies"));
    }
}
