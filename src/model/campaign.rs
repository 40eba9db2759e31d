// src/model/campaign.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Campaign lifecycle. Payment confirmation moves `Pending` to `Active`;
/// `Paused` and `Completed` are the only exits from `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Active,
    Paused,
    Completed,
}

/// Optional audience hints supplied by the submitting agent. Not used by the
/// selector today; carried through so agents can round-trip their own data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Vec<String>>,
}

/// One advertiser's contextual-ad bid, including targeting, economics and
/// performance counters. All money fields are integer minor units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_twitter_handle: Option<String>,
    pub product: String,
    pub category: String,
    pub tagline: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub cta_text: String,
    pub cta_url: String,
    /// Subtitle keywords that trigger this ad.
    pub keywords: Vec<String>,
    /// Sentiment tags (e.g. "bullish", "tech", "ai").
    pub sentiment_tags: Vec<String>,
    /// Per-impression charge basis, minor units.
    pub bid_amount: u64,
    /// Lifetime cap, minor units.
    pub budget: u64,
    /// Monotonically non-decreasing, minor units.
    pub spent: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub status: CampaignStatus,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<TargetAudience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_tx_hash: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Campaign as submitted by an agent: everything except the server-assigned
/// id, counters, status and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default)]
    pub agent_twitter_handle: Option<String>,
    pub product: String,
    pub category: String,
    pub tagline: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    pub cta_text: String,
    pub cta_url: String,
    pub keywords: Vec<String>,
    pub sentiment_tags: Vec<String>,
    pub bid_amount: u64,
    pub budget: u64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub target_audience: Option<TargetAudience>,
}

impl Campaign {
    /// Materialize a submitted draft: counters zeroed, status pending until
    /// the payment gate activates it.
    pub fn from_draft(id: String, draft: CampaignDraft) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id,
            agent_id: draft.agent_id,
            agent_name: draft.agent_name,
            agent_twitter_handle: draft.agent_twitter_handle,
            product: draft.product,
            category: draft.category,
            tagline: draft.tagline,
            description: draft.description,
            image_url: draft.image_url,
            video_url: draft.video_url,
            cta_text: draft.cta_text,
            cta_url: draft.cta_url,
            keywords: draft.keywords,
            sentiment_tags: draft.sentiment_tags,
            bid_amount: draft.bid_amount,
            budget: draft.budget,
            spent: 0,
            impressions: 0,
            clicks: 0,
            status: CampaignStatus::Pending,
            start_date: draft.start_date,
            end_date: draft.end_date,
            target_audience: draft.target_audience,
            payment_tx_hash: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Charge applied per impression, minor units (integer division).
    pub fn charge_per_impression(&self) -> u64 {
        self.bid_amount / 100
    }

    /// A campaign is selectable only while active and under budget.
    pub fn is_selectable(&self) -> bool {
        self.status == CampaignStatus::Active && self.spent < self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CampaignDraft {
        CampaignDraft {
            agent_id: "agent-1".to_string(),
            agent_name: "Test Agent".to_string(),
            agent_twitter_handle: None,
            product: "Widget".to_string(),
            category: "electronics".to_string(),
            tagline: "Buy widgets".to_string(),
            description: "A widget ad".to_string(),
            image_url: "http://example.com/widget.png".to_string(),
            video_url: None,
            cta_text: "Shop now".to_string(),
            cta_url: "http://example.com".to_string(),
            keywords: vec!["widget".to_string()],
            sentiment_tags: vec!["tech".to_string()],
            bid_amount: 300,
            budget: 5000,
            start_date: "2026-01-01T00:00:00Z".to_string(),
            end_date: "2026-12-31T00:00:00Z".to_string(),
            target_audience: None,
        }
    }

    #[test]
    fn from_draft_zeroes_counters_and_starts_pending() {
        let campaign = Campaign::from_draft("camp_1".to_string(), draft());
        assert_eq!(campaign.status, CampaignStatus::Pending);
        assert_eq!(campaign.spent, 0);
        assert_eq!(campaign.impressions, 0);
        assert_eq!(campaign.clicks, 0);
        assert!(!campaign.is_selectable());
    }

    #[test]
    fn selectable_requires_active_and_budget_headroom() {
        let mut campaign = Campaign::from_draft("camp_2".to_string(), draft());
        campaign.status = CampaignStatus::Active;
        assert!(campaign.is_selectable());
        campaign.spent = campaign.budget;
        assert!(!campaign.is_selectable());
    }

    #[test]
    fn charge_uses_integer_minor_units() {
        let campaign = Campaign::from_draft("camp_3".to_string(), draft());
        assert_eq!(campaign.charge_per_impression(), 3);
    }

    #[test]
    fn campaign_serializes_camel_case() {
        let campaign = Campaign::from_draft("camp_4".to_string(), draft());
        let value = serde_json::to_value(&campaign).unwrap();
        assert!(value.get("bidAmount").is_some());
        assert!(value.get("sentimentTags").is_some());
        assert_eq!(value["status"], "pending");
    }
}
