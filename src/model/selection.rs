// src/model/selection.rs

use serde::{Deserialize, Serialize};

use crate::model::campaign::Campaign;
use crate::model::sentiment::SentimentSnapshot;

/// Contextual signals for one selection request: lower-cased subtitle
/// keywords from the playback layer, plus an optional set of sentiment
/// snapshots (the handler fills them from the sentiment store when omitted).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCriteria {
    pub subtitle_keywords: Vec<String>,
    #[serde(default)]
    pub current_sentiment: Option<Vec<SentimentSnapshot>>,
    #[serde(default)]
    #[allow(dead_code)]
    pub timestamp: String,
}

/// The winning campaign with its computed score and a human-readable trail
/// of the scoring contributions that fired. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAd {
    pub campaign: Campaign,
    pub relevance_score: f64,
    pub reason: String,
}
