// src/mock_agent.rs

use chrono::Utc;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use rand::Rng;
use serde_json::json;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::model::sentiment::{Sentiment, SentimentSnapshot};
use crate::webhook::{signature, SIGNATURE_HEADER};

/// Keyword pool covering the ad categories the analysis collaborator knows.
const KEYWORD_POOL: &[&str] = &[
    "tesla", "coffee", "phone", "sneakers", "laptop", "pizza", "jacket", "flight", "crypto",
    "movie", "bullish", "tech", "ai",
];

fn snapshot_strategy() -> impl Strategy<Value = SentimentSnapshot> {
    (
        proptest::collection::vec(proptest::sample::select(KEYWORD_POOL.to_vec()), 1..4),
        0usize..3,
        any::<bool>(),
        100u64..100_000u64,
        0i64..100i64,
    )
        .prop_map(|(keywords, sentiment_ix, trending, volume, engagement_score)| {
            SentimentSnapshot {
                keywords: keywords.into_iter().map(String::from).collect(),
                sentiment: [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
                    [sentiment_ix],
                trending,
                volume,
                engagement_score,
                timestamp: Utc::now().to_rfc3339(),
            }
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<SentimentSnapshot>> {
    proptest::collection::vec(snapshot_strategy(), 1..5)
}

/// Demo agent: periodically posts a randomly generated, signed
/// `sentiment_update` batch to the server's own webhook so the selector has
/// live-looking signals to work with.
pub async fn start_mock_agent(webhook_url: String, secret: Option<String>) {
    let client = reqwest::Client::new();
    info!("Mock agent posting sentiment batches to {}", webhook_url);

    loop {
        let delay_ms = rand::thread_rng().gen_range(15_000..45_000);
        sleep(Duration::from_millis(delay_ms)).await;

        let batch = {
            let mut runner = proptest::test_runner::TestRunner::default();
            match batch_strategy().new_tree(&mut runner) {
                Ok(tree) => tree.current(),
                Err(e) => {
                    warn!("mock agent failed to generate batch: {e}");
                    continue;
                }
            }
        };

        let payload = json!({
            "event": "sentiment_update",
            "timestamp": Utc::now().to_rfc3339(),
            "data": { "sentimentData": batch },
        });
        let body = payload.to_string();

        let mut request = client
            .post(&webhook_url)
            .header("Content-Type", "application/json");
        if let Some(secret) = &secret {
            request = request.header(SIGNATURE_HEADER, signature::sign(body.as_bytes(), secret));
        }

        match request.body(body).send().await {
            Ok(response) => {
                info!(status = %response.status(), "mock agent delivered sentiment batch");
            }
            Err(e) => warn!("mock agent delivery failed: {e}"),
        }
    }
}
