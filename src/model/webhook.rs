// src/model/webhook.rs

use serde::{Deserialize, Serialize};

use crate::model::sentiment::SentimentSnapshot;

/// Inbound webhook envelope: `{ "event": ..., "timestamp": ..., "data": {...} }`.
/// The event kinds form a closed set; an unknown `event` value or a missing
/// required field fails deserialization, which the ingestor maps to a 400.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Envelope timestamp; carried for logging parity, not interpreted.
    #[serde(default)]
    #[allow(dead_code)]
    pub timestamp: String,
    #[serde(flatten)]
    pub event: WebhookEvent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WebhookEvent {
    #[serde(rename = "sentiment_update", rename_all = "camelCase")]
    SentimentUpdate { sentiment_data: Vec<SentimentSnapshot> },
    #[serde(rename = "campaign_update", rename_all = "camelCase")]
    CampaignUpdate {
        campaign_ids: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(rename = "budget_alert")]
    BudgetAlert { message: String },
    #[serde(rename = "performance_report")]
    PerformanceReport { metrics: PerformanceMetrics },
}

/// Aggregate metrics reported back by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub spent: u64,
}
