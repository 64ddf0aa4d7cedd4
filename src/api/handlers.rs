use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{MoodQuery, RecommendationRequest, RecommendationResponse},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Turn a mood into up to three movie picks
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    // Malformed bodies and blank moods are both client errors
    let Json(request) = payload?;
    let mood = MoodQuery::new(request.mood)?;

    tracing::info!(
        request_id = %request_id,
        mood = %mood,
        "Processing recommendation request"
    );

    let results = state.recommender.recommend(&mood).await.map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Recommendation failed");
        e
    })?;

    // Notice text depends on the policy and the display limit
    let settings = state.recommender.settings();
    let response = RecommendationResponse::new(
        mood.to_string(),
        settings.policy,
        results,
        settings.limit,
    );

    tracing::info!(
        request_id = %request_id,
        results = response.results.len(),
        partial = response.notice.is_some(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
