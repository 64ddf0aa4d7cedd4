use std::sync::Arc;

use crate::services::Recommender;

/// Shared application state
///
/// The recommender holds only immutable clients and settings, so handlers
/// share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Creates application state around a ready recommender
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}
