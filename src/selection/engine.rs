// src/selection/engine.rs

use std::cmp::Ordering;

use crate::logging::selection_log::SelectionLog;
use crate::model::campaign::Campaign;
use crate::model::selection::{SelectedAd, SelectionCriteria};
use crate::store::campaigns::CampaignStore;

const KEYWORD_POINTS: f64 = 10.0;
const SENTIMENT_POINTS: f64 = 10.0;
const TRENDING_SENTIMENT_POINTS: f64 = 20.0;
const WELL_FUNDED_BONUS: f64 = 5.0;
const PERFORMANCE_BONUS: f64 = 15.0;
/// Click-through rate above which a campaign counts as high-performing.
const CTR_THRESHOLD: f64 = 0.05;

/// Score one candidate against the contextual signals, accumulating a
/// human-readable reason per contribution that fired.
pub fn score_campaign(campaign: &Campaign, criteria: &SelectionCriteria) -> (f64, String) {
    let mut score = 0.0;
    let mut reasons: Vec<String> = Vec::new();

    // Keyword overlap: case-insensitive substring match in either direction.
    let keyword_matches = campaign
        .keywords
        .iter()
        .filter(|k| {
            let k = k.to_lowercase();
            criteria.subtitle_keywords.iter().any(|sk| {
                let sk = sk.to_lowercase();
                sk.contains(&k) || k.contains(&sk)
            })
        })
        .count();
    if keyword_matches > 0 {
        score += keyword_matches as f64 * KEYWORD_POINTS;
        reasons.push(format!("Matched {keyword_matches} subtitle keywords"));
    }

    // Sentiment alignment: campaign tags contained in snapshot keywords,
    // worth double when the snapshot is trending.
    if let Some(snapshots) = &criteria.current_sentiment {
        for snapshot in snapshots {
            let matched: Vec<&str> = campaign
                .sentiment_tags
                .iter()
                .filter(|tag| {
                    let tag = tag.to_lowercase();
                    snapshot
                        .keywords
                        .iter()
                        .any(|k| k.to_lowercase().contains(&tag))
                })
                .map(|tag| tag.as_str())
                .collect();
            if !matched.is_empty() {
                let per_tag = if snapshot.trending {
                    TRENDING_SENTIMENT_POINTS
                } else {
                    SENTIMENT_POINTS
                };
                score += matched.len() as f64 * per_tag;
                reasons.push(format!(
                    "Aligned with {} sentiment: {}",
                    if snapshot.trending { "trending" } else { "current" },
                    matched.join(", ")
                ));
            }
        }
    }

    // Higher bids get preference.
    score += campaign.bid_amount as f64 / 10.0;

    let remaining = campaign.budget.saturating_sub(campaign.spent);
    if remaining as f64 > campaign.budget as f64 * 0.5 {
        score += WELL_FUNDED_BONUS;
        reasons.push("Well-funded campaign".to_string());
    }

    if campaign.impressions > 0 {
        let ctr = campaign.clicks as f64 / campaign.impressions as f64;
        if ctr > CTR_THRESHOLD {
            score += PERFORMANCE_BONUS;
            reasons.push("High-performing ad".to_string());
        }
    }

    let reason = if reasons.is_empty() {
        "Default selection".to_string()
    } else {
        reasons.join(" | ")
    };
    (score, reason)
}

/// Rank the active campaigns and charge the winner one impression. The charge
/// (impressions += 1, spent += bidAmount/100) is applied atomically through
/// the store before the result is returned.
pub fn select_ad(
    store: &CampaignStore,
    criteria: &SelectionCriteria,
    log: &mut SelectionLog,
) -> Option<SelectedAd> {
    let candidates = store.list_active();
    if candidates.is_empty() {
        return None;
    }

    let mut scored: Vec<(f64, String, Campaign)> = candidates
        .into_iter()
        .map(|campaign| {
            let (score, reason) = score_campaign(&campaign, criteria);
            (score, reason, campaign)
        })
        .collect();
    // Highest score first; equal scores fall back to id order so the winner
    // does not depend on map iteration order.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.id.cmp(&b.2.id))
    });

    for (score, reason, campaign) in &scored {
        log.add_candidate(&campaign.id, *score, reason);
    }

    let (score, reason, winner) = scored.into_iter().next()?;
    let charged = store.with_mut(&winner.id, |campaign| {
        campaign.impressions += 1;
        campaign.spent += campaign.charge_per_impression();
        campaign.clone()
    })?;
    log.set_winner(&charged.id, score, charged.charge_per_impression());

    Some(SelectedAd {
        campaign: charged,
        relevance_score: score,
        reason,
    })
}
