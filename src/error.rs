use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Recommendation(#[from] OrchestrationError),
}

// Body rejections share the `{"error": ...}` shape of every other failure
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) | AppError::Recommendation(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Fatal failure kinds that abort a recommendation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport, auth or status failure calling the recommendation oracle
    OracleFailure,
    /// Oracle text could not be turned into candidates, even after recovery
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::OracleFailure => write!(f, "Recommendation service failed"),
            ErrorKind::MalformedResponse => {
                write!(f, "Recommendation service returned an unreadable answer")
            }
        }
    }
}

/// Error surfaced by [`crate::services::Recommender::recommend`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct OrchestrationError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl OrchestrationError {
    pub fn oracle(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::OracleFailure,
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            detail: detail.into(),
        }
    }
}

/// Per-candidate lookup failures
///
/// These never leave the candidate fetcher: they are logged and the candidate
/// simply ends up without a catalog record or trailer.
#[derive(thiserror::Error, Debug)]
pub enum LookupFailure {
    #[error("catalog lookup failed for '{title}': {source}")]
    Catalog {
        title: String,
        #[source]
        source: AppError,
    },

    #[error("trailer lookup failed for record {record_id}: {source}")]
    Trailer {
        record_id: String,
        #[source]
        source: AppError,
    },
}
