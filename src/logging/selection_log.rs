// src/logging/selection_log.rs

use chrono::Utc;
use serde::Serialize;

/// One selection request's delivery-chain record, written to the runtime log
/// as a single JSON document.
#[derive(Serialize, Debug, Clone)]
pub struct SelectionLog {
    pub timestamp: String,
    pub log_type: String,
    pub subtitle_keywords: Vec<String>,
    pub candidates: usize,
    /// "filled" or "no_fill".
    pub status: String,
    pub winning_campaign: Option<String>,
    pub winning_score: f64,
    /// Minor units charged to the winner for this impression.
    pub charge: u64,
    pub scores: Vec<CandidateScore>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CandidateScore {
    pub campaign_id: String,
    pub score: f64,
    pub reason: String,
}

impl SelectionLog {
    pub fn new(subtitle_keywords: &[String]) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "ad_selection".to_string(),
            subtitle_keywords: subtitle_keywords.to_vec(),
            candidates: 0,
            status: "no_fill".to_string(),
            winning_campaign: None,
            winning_score: 0.0,
            charge: 0,
            scores: Vec::new(),
        }
    }

    pub fn add_candidate(&mut self, campaign_id: &str, score: f64, reason: &str) {
        self.scores.push(CandidateScore {
            campaign_id: campaign_id.to_string(),
            score,
            reason: reason.to_string(),
        });
        self.candidates += 1;
    }

    pub fn set_winner(&mut self, campaign_id: &str, score: f64, charge: u64) {
        self.status = "filled".to_string();
        self.winning_campaign = Some(campaign_id.to_string());
        self.winning_score = score;
        self.charge = charge;
    }
}
