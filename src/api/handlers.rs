// src/api/handlers.rs

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::logging::selection_log::SelectionLog;
use crate::model::selection::SelectionCriteria;
use crate::payment::gate;
use crate::selection::engine;
use crate::tracking::{self, TrackRequest};
use crate::webhook::{ingest, SIGNATURE_HEADER};
use crate::AppState;

/// Bodies are parsed from raw bytes so malformed JSON maps into the
/// validation envelope instead of axum's plain-text rejection.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
}

fn failure_envelope(err: ApiError) -> (StatusCode, Json<Value>) {
    (
        err.status(),
        Json(json!({ "success": false, "error": err.to_string() })),
    )
}

/// **POST /ads/select** — score active campaigns against subtitle keywords
/// and sentiment, charge the winner one impression, return it.
pub async fn select_ad(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let mut criteria: SelectionCriteria = parse_body(&body)?;

    // When the caller sends no sentiment, fall back to the latest batches
    // the webhook has delivered.
    if criteria.current_sentiment.is_none() {
        let snapshots = state.sentiment.latest(10);
        if !snapshots.is_empty() {
            criteria.current_sentiment = Some(snapshots);
        }
    }

    let mut log = SelectionLog::new(&criteria.subtitle_keywords);
    let ad = engine::select_ad(&state.store, &criteria, &mut log);

    let level = if ad.is_some() { "INFO" } else { "WARN" };
    state
        .runtime_logger
        .log(level, &serde_json::to_string(&log).unwrap_or_default())
        .await;

    Ok(Json(json!({ "ad": ad })))
}

/// **GET /ads/select** — active campaigns, for debugging.
pub async fn list_active_campaigns(State(state): State<Arc<AppState>>) -> Json<Value> {
    let campaigns = state.store.list_active();
    Json(json!({ "count": campaigns.len(), "campaigns": campaigns }))
}

/// **POST /ads/submit** — accept a campaign draft, store it pending payment.
pub async fn submit_campaign(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let request: gate::AdPlacementRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return failure_envelope(err),
    };

    match gate::submit_campaign(&state.store, &state.config, request) {
        Ok((campaign_id, payment_required)) => {
            state
                .runtime_logger
                .log(
                    "INFO",
                    &json!({
                        "log_type": "campaign_submitted",
                        "campaign_id": campaign_id,
                        "invoice_id": payment_required.invoice_id,
                    })
                    .to_string(),
                )
                .await;
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "campaignId": campaign_id,
                    "paymentRequired": payment_required,
                })),
            )
        }
        Err(err) => failure_envelope(err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    #[serde(default)]
    campaign_id: Option<String>,
}

/// **GET /ads/submit?campaignId=** — campaign status lookup.
pub async fn campaign_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query
        .campaign_id
        .ok_or_else(|| ApiError::Validation("campaignId required".to_string()))?;
    let campaign = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    Ok(Json(json!({ "campaign": campaign })))
}

/// **POST /ads/track** — apply an impression or click to a campaign.
pub async fn track_ad_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: TrackRequest = parse_body(&body)?;
    let counters = tracking::track_event(&state.store, &request.campaign_id, request.event)?;

    state
        .runtime_logger
        .log(
            "INFO",
            &json!({
                "log_type": "ad_event",
                "campaign_id": counters.id,
                "impressions": counters.impressions,
                "clicks": counters.clicks,
                "spent": counters.spent,
            })
            .to_string(),
        )
        .await;

    Ok(Json(json!({ "success": true, "campaign": counters })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    subtitle_text: String,
}

/// **POST /ads/analyze** — forward subtitle text to the analysis gateway.
pub async fn analyze_subtitles(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: AnalyzeRequest = parse_body(&body)?;
    let client = state
        .cue_client
        .as_ref()
        .ok_or_else(|| ApiError::Internal("cue gateway not configured".to_string()))?;
    let keywords = client.analyze(&request.subtitle_text).await?;
    Ok(Json(json!({ "keywords": keywords })))
}

/// **GET /payment/{campaignId}** — mock payment descriptor.
pub async fn payment_descriptor(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> Result<Json<gate::PaymentDescriptor>, ApiError> {
    Ok(Json(gate::payment_descriptor(&state.store, &campaign_id)?))
}

/// **POST /payment/{campaignId}** — confirm payment, activate the campaign.
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let proof: gate::PaymentProof = if body.is_empty() {
        gate::PaymentProof::default()
    } else {
        parse_body(&body)?
    };
    let campaign = gate::confirm_payment(&state.store, &campaign_id, &proof)?;

    state
        .runtime_logger
        .log(
            "INFO",
            &json!({
                "log_type": "payment_confirmed",
                "campaign_id": campaign.id,
                "tx_hash": campaign.payment_tx_hash,
            })
            .to_string(),
        )
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "Payment confirmed, campaign activated",
        "campaign": {
            "id": campaign.id,
            "status": campaign.status,
            "txHash": campaign.payment_tx_hash,
        },
    })))
}

/// **POST /webhook** — signed agent events (sentiment, advisories, reports).
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match ingest::ingest(
        &body,
        signature,
        &state.config,
        &state.store,
        &state.sentiment,
    ) {
        Ok(outcome) => {
            let mut response = json!({ "success": true, "message": outcome.message });
            if let Some(metrics) = outcome.metrics {
                response["metrics"] = serde_json::to_value(&metrics).unwrap_or(Value::Null);
            }
            (StatusCode::OK, Json(response))
        }
        Err(err) => failure_envelope(err),
    }
}

/// **GET /webhook/sentiment** — the 10 most recent batches, grouped by the
/// snapshot-supplied timestamp.
pub async fn latest_sentiment(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshots = state.sentiment.latest(10);

    let mut grouped: Vec<(String, Vec<crate::model::sentiment::SentimentSnapshot>)> = Vec::new();
    for snapshot in snapshots {
        match grouped.iter_mut().find(|(ts, _)| *ts == snapshot.timestamp) {
            Some((_, entries)) => entries.push(snapshot),
            None => grouped.push((snapshot.timestamp.clone(), vec![snapshot])),
        }
    }

    let data: Vec<Value> = grouped
        .into_iter()
        .map(|(timestamp, sentiments)| json!({ "timestamp": timestamp, "sentiments": sentiments }))
        .collect();

    Json(json!({ "count": data.len(), "data": data }))
}
