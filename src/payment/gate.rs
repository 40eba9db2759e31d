// src/payment/gate.rs

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_manager::ConfigManager;
use crate::error::ApiError;
use crate::model::campaign::{Campaign, CampaignDraft, CampaignStatus};
use crate::store::campaigns::CampaignStore;

/// Minimum accepted payment: $1.00 in minor units.
pub const MIN_PAYMENT: u64 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPlacementRequest {
    pub campaign: CampaignDraft,
    pub payment: PaymentTerms,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub payment_pointer: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub invoice_url: Option<String>,
}

/// Returned from submission: how the agent pays to activate the campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    pub amount: u64,
    pub currency: String,
    pub payment_url: String,
    pub invoice_id: String,
}

/// Mock x402-style payment descriptor for `GET /payment/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDescriptor {
    pub campaign_id: String,
    pub amount: u64,
    pub currency: String,
    pub payment_pointer: String,
    pub invoice_url: String,
    pub status: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentProof {
    pub tx_hash: Option<String>,
    pub payment_proof: Option<String>,
}

impl PaymentProof {
    fn is_present(&self) -> bool {
        self.tx_hash.as_deref().is_some_and(|s| !s.is_empty())
            || self.payment_proof.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Store a submitted draft as a pending campaign and tell the agent where to
/// pay. The campaign stays out of selection until payment is confirmed.
pub fn submit_campaign(
    store: &CampaignStore,
    config: &ConfigManager,
    request: AdPlacementRequest,
) -> Result<(String, PaymentRequired), ApiError> {
    if request.payment.amount < MIN_PAYMENT {
        return Err(ApiError::Validation("Minimum payment is $1.00".to_string()));
    }

    let id = format!("camp_{}", Uuid::new_v4().simple());
    store.put(Campaign::from_draft(id.clone(), request.campaign));

    let payment_required = PaymentRequired {
        amount: request.payment.amount,
        currency: request.payment.currency,
        payment_url: format!("{}/payment/{}", config.public_url, id),
        invoice_id: format!("inv_{id}"),
    };
    Ok((id, payment_required))
}

/// Mock payment descriptor; a real provider integration would mint an actual
/// invoice here without changing the contract shape.
pub fn payment_descriptor(
    store: &CampaignStore,
    campaign_id: &str,
) -> Result<PaymentDescriptor, ApiError> {
    let campaign = store
        .get(campaign_id)
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    Ok(PaymentDescriptor {
        campaign_id: campaign.id,
        amount: campaign.budget,
        currency: "USD".to_string(),
        payment_pointer: "$ilp.example.com/payment".to_string(),
        invoice_url: "lightning:lnbc...".to_string(),
        status: "pending".to_string(),
        expires_at: (Utc::now() + Duration::hours(1)).to_rfc3339(),
    })
}

/// Activate a campaign against a proof of payment. Any non-empty proof is
/// accepted; no provider verification happens in this demo. Idempotent: an
/// already-active campaign stays active.
pub fn confirm_payment(
    store: &CampaignStore,
    campaign_id: &str,
    proof: &PaymentProof,
) -> Result<Campaign, ApiError> {
    if store.get(campaign_id).is_none() {
        return Err(ApiError::NotFound("Campaign not found".to_string()));
    }
    if !proof.is_present() {
        return Err(ApiError::Validation("Payment proof required".to_string()));
    }

    store
        .with_mut(campaign_id, |campaign| {
            campaign.status = CampaignStatus::Active;
            if let Some(tx_hash) = &proof.tx_hash {
                campaign.payment_tx_hash = Some(tx_hash.clone());
            }
            campaign.clone()
        })
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))
}
