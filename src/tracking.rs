// src/tracking.rs

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::campaigns::CampaignStore;

/// Recognized ad events. Anything else fails at deserialization and is
/// surfaced as a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackEvent {
    Impression,
    Click,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub campaign_id: String,
    pub event: TrackEvent,
    #[serde(default)]
    #[allow(dead_code)]
    pub timestamp: Option<String>,
}

/// Counter snapshot returned after the event is applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCounters {
    pub id: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spent: u64,
}

/// Apply one event to a campaign's counters. Impressions use the same
/// accounting formula as the selector (spent += bidAmount/100); clicks touch
/// only the click counter. Not idempotent: replays double-charge.
pub fn track_event(
    store: &CampaignStore,
    campaign_id: &str,
    event: TrackEvent,
) -> Result<CampaignCounters, ApiError> {
    store
        .with_mut(campaign_id, |campaign| {
            match event {
                TrackEvent::Impression => {
                    campaign.impressions += 1;
                    campaign.spent += campaign.charge_per_impression();
                }
                TrackEvent::Click => {
                    campaign.clicks += 1;
                }
            }
            CampaignCounters {
                id: campaign.id.clone(),
                impressions: campaign.impressions,
                clicks: campaign.clicks,
                spent: campaign.spent,
            }
        })
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::campaign::{Campaign, CampaignDraft, CampaignStatus};

    fn active_campaign(id: &str) -> Campaign {
        let draft = CampaignDraft {
            agent_id: "agent".to_string(),
            agent_name: "Agent".to_string(),
            agent_twitter_handle: None,
            product: "p".to_string(),
            category: "c".to_string(),
            tagline: "t".to_string(),
            description: "d".to_string(),
            image_url: "http://example.com/i.png".to_string(),
            video_url: None,
            cta_text: "go".to_string(),
            cta_url: "http://example.com".to_string(),
            keywords: vec![],
            sentiment_tags: vec![],
            bid_amount: 300,
            budget: 5000,
            start_date: String::new(),
            end_date: String::new(),
            target_audience: None,
        };
        let mut campaign = Campaign::from_draft(id.to_string(), draft);
        campaign.status = CampaignStatus::Active;
        campaign
    }

    #[test]
    fn impression_charges_and_counts() {
        let store = CampaignStore::new();
        store.put(active_campaign("a"));

        let counters = track_event(&store, "a", TrackEvent::Impression).unwrap();
        assert_eq!(counters.impressions, 1);
        assert_eq!(counters.spent, 3);
        assert_eq!(counters.clicks, 0);
    }

    #[test]
    fn click_touches_only_clicks() {
        let store = CampaignStore::new();
        store.put(active_campaign("a"));

        let counters = track_event(&store, "a", TrackEvent::Click).unwrap();
        assert_eq!(counters.clicks, 1);
        assert_eq!(counters.impressions, 0);
        assert_eq!(counters.spent, 0);
    }

    #[test]
    fn unknown_campaign_is_404() {
        let store = CampaignStore::new();
        let err = track_event(&store, "ghost", TrackEvent::Click).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn unrecognized_event_kind_fails_to_parse() {
        let raw = r#"{"campaignId": "a", "event": "hover"}"#;
        assert!(serde_json::from_str::<TrackRequest>(raw).is_err());
    }
}
