use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::ExporterConfig;

/// Query flags asking Lichess to include clocks, evaluations, the opening
/// and judgment comments in the export.
const EXPORT_PARAMS: [(&str, &str); 4] = [
    ("clocks", "true"),
    ("evals", "true"),
    ("opening", "true"),
    ("literate", "true"),
];

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Could not contact Lichess: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Game not found: {0}")]
    NotFound(String),

    #[error("Lichess answered HTTP {0}")]
    Status(StatusCode),
}

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new(config: &ExporterConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("lichess-exporter/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn export_url(&self, game_id: &str) -> String {
        format!("{}/game/export/{}", self.base_url, game_id)
    }

    /// Fetch one game export as raw JSON. Not retried.
    pub async fn fetch_game(&self, game_id: &str) -> Result<Value, FetchError> {
        let url = self.export_url(game_id);
        tracing::info!(%url, "Fetching game");

        let resp = self
            .client
            .get(&url)
            .query(&EXPORT_PARAMS[..])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(game_id.to_string()));
        }

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let game: Value = resp.json().await?;
        tracing::debug!(game_id, "Game export received");
        Ok(game)
    }
}
