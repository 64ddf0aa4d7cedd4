/// OpenAI-compatible chat-completions oracle
///
/// Sends the recommendation prompt as a single user message and returns the
/// assistant's reply text.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    services::providers::RecommendationOracle,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct OpenAiOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiOracle {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            temperature: config.openai_temperature,
            max_tokens: config.openai_max_tokens,
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl RecommendationOracle for OpenAiOracle {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);

        // Single user message, bearer auth
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Chat completions API returned status {}: {}",
                status, body
            )));
        }

        // First choice only; an empty reply is left for the parser to reject
        let completion: ChatCompletionResponse = response.json().await?;
        let text = completion.into_text();

        tracing::info!(
            model = %self.model,
            reply_len = text.len(),
            provider = "openai",
            "Completion received"
        );
        tracing::debug!(reply = %text, "Raw completion");

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
