// src/store/campaigns.rs

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::model::campaign::Campaign;

/// In-process campaign registry. All mutation of counters goes through
/// `with_mut`, which runs the caller's closure under the table lock so
/// concurrent read-modify-write sequences cannot lose updates. The lock is
/// never held across an await point.
#[derive(Default)]
pub struct CampaignStore {
    inner: Mutex<HashMap<String, Campaign>>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, campaign: Campaign) {
        self.inner
            .lock()
            .unwrap()
            .insert(campaign.id.clone(), campaign);
    }

    pub fn get(&self, id: &str) -> Option<Campaign> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    /// Campaigns eligible for selection: active and under budget.
    /// `endDate` is deliberately not enforced here.
    pub fn list_active(&self) -> Vec<Campaign> {
        self.inner
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.is_selectable())
            .cloned()
            .collect()
    }

    /// Overwrite by id, stamping `updatedAt`.
    pub fn update(&self, mut campaign: Campaign) {
        campaign.updated_at = Utc::now().to_rfc3339();
        self.inner
            .lock()
            .unwrap()
            .insert(campaign.id.clone(), campaign);
    }

    /// Atomic read-modify-write: stamps `updatedAt`, then applies `f` to the
    /// stored campaign while the lock is held. Returns `None` for unknown ids.
    pub fn with_mut<T>(&self, id: &str, f: impl FnOnce(&mut Campaign) -> T) -> Option<T> {
        let mut table = self.inner.lock().unwrap();
        let campaign = table.get_mut(id)?;
        campaign.updated_at = Utc::now().to_rfc3339();
        Some(f(campaign))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::model::campaign::CampaignStatus;

    fn campaign(id: &str, status: CampaignStatus, budget: u64, spent: u64) -> Campaign {
        Campaign {
            id: id.to_string(),
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
            budget,
            spent,
            impressions: 0,
            clicks: 0,
            status,
            start_date: String::new(),
            end_date: String::new(),
            target_audience: None,
            payment_tx_hash: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn list_active_filters_on_status_and_budget() {
        let store = CampaignStore::new();
        store.put(campaign("a", CampaignStatus::Active, 100, 0));
        store.put(campaign("b", CampaignStatus::Pending, 100, 0));
        store.put(campaign("c", CampaignStatus::Active, 100, 100));
        store.put(campaign("d", CampaignStatus::Paused, 100, 0));

        let active = store.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
    }

    #[test]
    fn with_mut_applies_and_stamps() {
        let store = CampaignStore::new();
        store.put(campaign("a", CampaignStatus::Active, 100, 0));

        let spent = store.with_mut("a", |c| {
            c.spent += 3;
            c.spent
        });
        assert_eq!(spent, Some(3));

        let stored = store.get("a").unwrap();
        assert_eq!(stored.spent, 3);
        assert_ne!(stored.updated_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn update_overwrites_by_id_and_stamps() {
        let store = CampaignStore::new();
        store.put(campaign("a", CampaignStatus::Pending, 100, 0));

        let mut replacement = campaign("a", CampaignStatus::Paused, 100, 0);
        replacement.clicks = 7;
        store.update(replacement);

        let stored = store.get("a").unwrap();
        assert_eq!(stored.status, CampaignStatus::Paused);
        assert_eq!(stored.clicks, 7);
        assert_ne!(stored.updated_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn with_mut_unknown_id_is_none() {
        let store = CampaignStore::new();
        assert_eq!(store.with_mut("ghost", |_| ()), None);
    }

    #[test]
    fn concurrent_with_mut_loses_no_updates() {
        let store = Arc::new(CampaignStore::new());
        store.put(campaign("a", CampaignStatus::Active, u64::MAX, 0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.with_mut("a", |c| {
                        c.impressions += 1;
                        c.spent += c.bid_amount / 100;
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get("a").unwrap();
        assert_eq!(stored.impressions, 800);
        assert_eq!(stored.spent, 800 * 3);
    }

    proptest! {
        // Eligibility is exactly `active && spent < budget`.
        #[test]
        fn eligibility_matches_invariant(
            status_ix in 0usize..4,
            budget in 0u64..10_000,
            spent in 0u64..10_000,
        ) {
            let status = [
                CampaignStatus::Pending,
                CampaignStatus::Active,
                CampaignStatus::Paused,
                CampaignStatus::Completed,
            ][status_ix];

            let store = CampaignStore::new();
            store.put(campaign("a", status, budget, spent));

            let eligible = status == CampaignStatus::Active && spent < budget;
            prop_assert_eq!(store.list_active().len() == 1, eligible);
        }
    }
}
