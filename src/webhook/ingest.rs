// src/webhook/ingest.rs

use tracing::{info, warn};

use crate::config::config_manager::ConfigManager;
use crate::error::ApiError;
use crate::model::webhook::{PerformanceMetrics, WebhookEvent, WebhookPayload};
use crate::store::campaigns::CampaignStore;
use crate::store::sentiment::SentimentStore;

/// Acknowledgement returned to the posting agent.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub message: String,
    pub metrics: Option<PerformanceMetrics>,
}

impl IngestOutcome {
    fn ack(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            metrics: None,
        }
    }
}

/// Validate and route one inbound agent event.
///
/// Signature policy: when both a secret and a signature header are present
/// the body must verify, otherwise 401. When either is missing the event is
/// accepted; in production that acceptance is logged as unverified (known
/// gap, kept pending a product decision on hard rejection).
pub fn ingest(
    raw_body: &[u8],
    signature: Option<&str>,
    config: &ConfigManager,
    store: &CampaignStore,
    sentiment: &SentimentStore,
) -> Result<IngestOutcome, ApiError> {
    match (config.webhook_secret.as_deref(), signature) {
        (Some(secret), Some(sig)) => {
            if !super::signature::verify(raw_body, sig, secret) {
                warn!("webhook rejected: invalid signature");
                return Err(ApiError::Auth("Invalid signature".to_string()));
            }
        }
        _ => {
            if config.is_production() {
                warn!("unverified webhook accepted in production");
            }
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(raw_body)
        .map_err(|e| ApiError::Validation(format!("Invalid webhook payload: {e}")))?;

    match payload.event {
        WebhookEvent::SentimentUpdate { sentiment_data } => {
            if sentiment_data.is_empty() {
                return Err(ApiError::Validation("sentimentData required".to_string()));
            }
            let count = sentiment.append(sentiment_data);
            info!(
                snapshots = count,
                batches = sentiment.batch_count(),
                "sentiment batch stored"
            );
            Ok(IngestOutcome::ack(format!("Stored {count} sentiment updates")))
        }
        WebhookEvent::CampaignUpdate {
            campaign_ids,
            message,
        } => {
            if campaign_ids.is_empty() {
                return Err(ApiError::Validation("campaignIds required".to_string()));
            }
            for id in &campaign_ids {
                // Advisory only; unknown ids are skipped silently.
                if store.get(id).is_some() {
                    if let Some(msg) = &message {
                        info!(campaign_id = %id, advisory = %msg, "campaign advisory received");
                    }
                }
            }
            Ok(IngestOutcome::ack("Campaign updates processed"))
        }
        WebhookEvent::BudgetAlert { message } => {
            warn!(alert = %message, "budget alert received");
            Ok(IngestOutcome::ack("Budget alert received"))
        }
        WebhookEvent::PerformanceReport { metrics } => {
            info!(
                impressions = metrics.impressions,
                clicks = metrics.clicks,
                ctr = metrics.ctr,
                spent = metrics.spent,
                "performance report received"
            );
            Ok(IngestOutcome {
                message: "Performance report received".to_string(),
                metrics: Some(metrics),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::signature;

    fn config(secret: Option<&str>, env: &str) -> ConfigManager {
        ConfigManager {
            public_url: "http://localhost:8080".to_string(),
            webhook_secret: secret.map(String::from),
            runtime_env: env.to_string(),
            cue_gateway_url: None,
            cue_gateway_key: None,
            cue_timeout_ms: 2000,
        }
    }

    fn sentiment_body() -> Vec<u8> {
        br#"{
            "event": "sentiment_update",
            "timestamp": "2026-02-01T00:00:00Z",
            "data": {"sentimentData": [{
                "keywords": ["tesla"],
                "sentiment": "positive",
                "trending": true,
                "volume": 500,
                "engagementScore": 42,
                "timestamp": "2026-02-01T00:00:00Z"
            }]}
        }"#
        .to_vec()
    }

    #[test]
    fn signed_sentiment_update_is_stored() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = sentiment_body();
        let sig = signature::sign(&body, "s3cr3t");

        let outcome = ingest(
            &body,
            Some(&sig),
            &config(Some("s3cr3t"), "production"),
            &store,
            &sentiment,
        )
        .unwrap();

        assert_eq!(outcome.message, "Stored 1 sentiment updates");
        assert_eq!(sentiment.batch_count(), 1);
    }

    #[test]
    fn invalid_signature_is_401() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = sentiment_body();

        let err = ingest(
            &body,
            Some("deadbeef"),
            &config(Some("s3cr3t"), "production"),
            &store,
            &sentiment,
        )
        .unwrap_err();

        assert!(matches!(err, ApiError::Auth(_)));
        assert_eq!(sentiment.batch_count(), 0);
    }

    #[test]
    fn missing_secret_skips_verification() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = sentiment_body();

        // Accepted (warned about in production) rather than rejected.
        let outcome = ingest(&body, None, &config(None, "production"), &store, &sentiment);
        assert!(outcome.is_ok());
        assert_eq!(sentiment.batch_count(), 1);
    }

    #[test]
    fn empty_sentiment_batch_is_400() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = br#"{"event":"sentiment_update","timestamp":"t","data":{"sentimentData":[]}}"#;

        let err = ingest(body, None, &config(None, "development"), &store, &sentiment).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn unknown_event_kind_is_400() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = br#"{"event":"mystery","timestamp":"t","data":{}}"#;

        let err = ingest(body, None, &config(None, "development"), &store, &sentiment).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn empty_campaign_ids_is_400() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = br#"{"event":"campaign_update","timestamp":"t","data":{"campaignIds":[]}}"#;

        let err = ingest(body, None, &config(None, "development"), &store, &sentiment).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn campaign_update_skips_unknown_ids() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = br#"{
            "event": "campaign_update",
            "timestamp": "t",
            "data": {"campaignIds": ["camp_missing"], "message": "pause it"}
        }"#;

        let outcome =
            ingest(body, None, &config(None, "development"), &store, &sentiment).unwrap();
        assert_eq!(outcome.message, "Campaign updates processed");
    }

    #[test]
    fn performance_report_echoes_metrics() {
        let store = CampaignStore::new();
        let sentiment = SentimentStore::new();
        let body = br#"{
            "event": "performance_report",
            "timestamp": "t",
            "data": {"metrics": {"impressions": 10, "clicks": 2, "ctr": 0.2, "spent": 30}}
        }"#;

        let outcome =
            ingest(body, None, &config(None, "development"), &store, &sentiment).unwrap();
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.impressions, 10);
        assert_eq!(metrics.clicks, 2);
    }
}
