// src/selection/cue_client.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::{timeout, Duration};

use crate::config::config_manager::ConfigManager;
use crate::error::ApiError;

/// One ad-cue keyword detected in subtitle text by the external analysis
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCue {
    pub keyword: String,
    pub category: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CueResponse {
    #[serde(default)]
    keywords: Vec<AdCue>,
}

/// Client for the subtitle-analysis gateway. The call is bounded by a
/// timeout and must never be made while a store lock is held.
pub struct CueClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl CueClient {
    /// `None` when no gateway endpoint is configured.
    pub fn from_config(config: &ConfigManager) -> Option<Self> {
        let endpoint = config.cue_gateway_url.clone()?;
        Some(Self {
            client: Client::new(),
            endpoint,
            api_key: config.cue_gateway_key.clone(),
            timeout: Duration::from_millis(config.cue_timeout_ms),
        })
    }

    pub async fn analyze(&self, subtitle_text: &str) -> Result<Vec<AdCue>, ApiError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let body = json!({
            "subtitleText": subtitle_text,
            "action": "analyze_subtitles",
        });

        let response = timeout(self.timeout, request.json(&body).send()).await;
        match response {
            Ok(Ok(resp)) => match resp.json::<CueResponse>().await {
                Ok(parsed) => Ok(parsed.keywords),
                Err(e) => Err(ApiError::Internal(format!(
                    "cue gateway returned unparseable body: {e}"
                ))),
            },
            Ok(Err(e)) => Err(ApiError::Internal(format!("cue gateway request failed: {e}"))),
            Err(_) => Err(ApiError::Internal("cue gateway timed out".to_string())),
        }
    }
}
