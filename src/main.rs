use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinemood_api::{
    api::{create_router, AppState},
    config::Config,
    services::{
        providers::{OpenAiOracle, TmdbProvider},
        Recommender, RecommenderSettings,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinemood_api=info,tower_http=info")),
        )
        .init();

    let oracle = OpenAiOracle::new(&config).context("Failed to build oracle client")?;
    let catalog = TmdbProvider::new(&config).context("Failed to build catalog client")?;
    let settings = RecommenderSettings::from(&config);

    tracing::info!(
        policy = ?settings.policy,
        requested_candidates = settings.requested_candidates,
        model = %config.openai_model,
        "Recommender configured"
    );

    let recommender = Recommender::new(Arc::new(oracle), Arc::new(catalog), settings);
    let app = create_router(AppState::new(recommender));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}
