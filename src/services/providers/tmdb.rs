/// TMDB (The Movie Database) catalog provider
///
/// API Flow:
/// 1. Title Search: /search/movie → ranked list of movies with poster paths
/// 2. Videos: /movie/{id}/videos → trailers, teasers and clips for one movie
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogRecord, RecordId, TmdbSearchResponse, TmdbVideosResponse, VideoEntry},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            language: config.tmdb_language.clone(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        // Credentials and language ride along on every call
        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(query)
            .send()
            .await?;

        // Surface non-2xx responses with their body for the warn log
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        // Parse JSON response
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogRecord>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);
        let response: TmdbSearchResponse = self
            .get(&url, &[("query", query), ("include_adult", "false")])
            .await?;

        let records: Vec<CatalogRecord> = response
            .results
            .into_iter()
            .map(CatalogRecord::from)
            .collect();

        tracing::info!(
            query = %query,
            results = records.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(records)
    }

    async fn fetch_videos(&self, record_id: &RecordId) -> AppResult<Vec<VideoEntry>> {
        let url = format!("{}/movie/{}/videos", self.api_url, record_id);
        let response: TmdbVideosResponse = self.get(&url, &[]).await?;

        let videos: Vec<VideoEntry> = response
            .results
            .into_iter()
            .map(VideoEntry::from)
            .collect();

        tracing::info!(
            record_id = %record_id,
            videos = videos.len(),
            provider = "tmdb",
            "Videos fetched"
        );

        Ok(videos)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> TmdbProvider {
        let config: Config = envy::from_iter(vec![
            ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
            ("TMDB_API_KEY".to_string(), "tmdb-test".to_string()),
            ("TMDB_API_URL".to_string(), "http://127.0.0.1:9/3/".to_string()),
        ])
        .unwrap();
        TmdbProvider::new(&config).unwrap()
    }

    #[test]
    fn test_new_normalises_url() {
        let provider = test_provider();
        assert_eq!(provider.api_url, "http://127.0.0.1:9/3");
        assert_eq!(provider.language, "en-US");
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let provider = test_provider();
        let result = provider.search_movies("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_an_error() {
        let provider = test_provider();
        let result = provider.fetch_videos(&RecordId("27205".to_string())).await;
        assert!(result.is_err());
    }
}
