// src/store/sentiment.rs

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;

use crate::model::sentiment::SentimentSnapshot;

/// Retain only the most recent batches; the first-inserted batch is evicted
/// when the cap is exceeded, regardless of the snapshot-supplied timestamps.
const MAX_BATCHES: usize = 100;

/// One webhook delivery's worth of snapshots, keyed by ingestion time.
#[derive(Debug, Clone)]
pub struct SentimentBatch {
    /// Ingestion timestamp, the batch key.
    #[allow(dead_code)]
    pub received_at: String,
    pub snapshots: Vec<SentimentSnapshot>,
}

/// Bounded, insertion-ordered registry of sentiment batches.
pub struct SentimentStore {
    inner: Mutex<VecDeque<SentimentBatch>>,
    capacity: usize,
}

impl SentimentStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BATCHES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Store one batch under the current ingestion timestamp, evicting the
    /// oldest batch when over capacity. Returns the number of snapshots stored.
    pub fn append(&self, snapshots: Vec<SentimentSnapshot>) -> usize {
        let count = snapshots.len();
        let mut batches = self.inner.lock().unwrap();
        batches.push_back(SentimentBatch {
            received_at: Utc::now().to_rfc3339(),
            snapshots,
        });
        if batches.len() > self.capacity {
            batches.pop_front();
        }
        count
    }

    /// Snapshots from the `limit` most-recently-inserted batches, flattened,
    /// most recent batch first.
    pub fn latest(&self, limit: usize) -> Vec<SentimentSnapshot> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .flat_map(|batch| batch.snapshots.iter().cloned())
            .collect()
    }

    pub fn batch_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sentiment::Sentiment;

    fn snapshot(keyword: &str) -> SentimentSnapshot {
        SentimentSnapshot {
            keywords: vec![keyword.to_string()],
            sentiment: Sentiment::Neutral,
            trending: false,
            volume: 10,
            engagement_score: 1,
            timestamp: "2026-02-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn append_reports_snapshot_count() {
        let store = SentimentStore::new();
        assert_eq!(store.append(vec![snapshot("a"), snapshot("b")]), 2);
        assert_eq!(store.batch_count(), 1);
    }

    #[test]
    fn evicts_first_inserted_batch_past_capacity() {
        let store = SentimentStore::new();
        for i in 0..101 {
            store.append(vec![snapshot(&format!("kw-{i}"))]);
        }
        assert_eq!(store.batch_count(), 100);

        // kw-0 was the first batch in, so it is the one gone.
        let all = store.latest(100);
        assert_eq!(all.len(), 100);
        assert!(!all.iter().any(|s| s.keywords[0] == "kw-0"));
        assert!(all.iter().any(|s| s.keywords[0] == "kw-1"));
    }

    #[test]
    fn latest_is_most_recent_batch_first_and_bounded() {
        let store = SentimentStore::new();
        for i in 0..20 {
            store.append(vec![snapshot(&format!("kw-{i}")), snapshot(&format!("kw-{i}"))]);
        }

        let latest = store.latest(10);
        assert_eq!(latest.len(), 20); // 10 batches x 2 snapshots
        assert_eq!(latest[0].keywords[0], "kw-19");
        assert!(!latest.iter().any(|s| s.keywords[0] == "kw-9"));
    }
}
