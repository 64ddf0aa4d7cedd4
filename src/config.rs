use serde::Deserialize;

use crate::services::SelectionPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation oracle (OpenAI-compatible) API key
    pub openai_api_key: String,

    /// Recommendation oracle base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Chat model used for recommendations
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,

    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a record's poster path to build the poster URL
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Timeout applied to every outbound request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `lenient` shows placeholders, `strict` skips incomplete candidates
    #[serde(default)]
    pub selection_policy: SelectionPolicy,

    /// Overrides how many candidates the oracle is asked for (clamped to 3..=6)
    #[serde(default)]
    pub candidate_count: Option<usize>,

    /// Scan numbered/bold lines when the oracle ignores the JSON format
    #[serde(default = "default_line_fallback")]
    pub line_fallback: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_temperature() -> f32 {
    0.7
}

fn default_openai_max_tokens() -> u32 {
    500
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_line_fallback() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
