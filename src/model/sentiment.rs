// src/model/sentiment.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One externally supplied observation about trending topics, delivered in
/// batches through the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSnapshot {
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub trending: bool,
    /// Post/tweet volume behind the observation.
    pub volume: u64,
    pub engagement_score: i64,
    /// Timestamp supplied by the agent, not the ingestion time.
    pub timestamp: String,
}
