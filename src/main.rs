// src/main.rs

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{serve, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

mod api;
mod config;
mod error;
mod logging;
mod mock_agent;
mod model;
mod payment;
mod selection;
mod store;
mod tracking;
mod webhook;

use config::config_manager::ConfigManager;
use logging::runtime_logger::RuntimeLogger;
use selection::cue_client::CueClient;
use store::campaigns::CampaignStore;
use store::sentiment::SentimentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CampaignStore>,
    pub sentiment: Arc<SentimentStore>,
    pub config: Arc<ConfigManager>,
    pub runtime_logger: Arc<RuntimeLogger>,
    pub cue_client: Option<Arc<CueClient>>,
}

#[derive(Parser, Debug)]
#[command(version = "1.0", about = "A contextual ad-insertion server for agent-bid campaigns")]
struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// Run a demo agent that posts signed sentiment batches to our own webhook.
    #[arg(long, default_value_t = false)]
    mock_agent: bool,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Global tracing: hourly-rolling JSON file.
    let log_file = rolling::hourly(&args.log_dir, "clawtv_ads.json");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)
        .expect("Unable to set global tracing subscriber");
    info!("ad server starting on port {}", args.port);

    let config = Arc::new(ConfigManager::from_env());
    let runtime_logger = RuntimeLogger::new(&args.log_dir, "runtime", 1000, 100, 1000);
    runtime_logger.log("INFO", "ad server is starting...").await;

    let store = Arc::new(CampaignStore::new());
    let sentiment = Arc::new(SentimentStore::new());
    let cue_client = CueClient::from_config(&config).map(Arc::new);
    if cue_client.is_none() {
        runtime_logger
            .log("WARN", "cue gateway not configured; /ads/analyze disabled")
            .await;
    }

    let state = Arc::new(AppState {
        store,
        sentiment,
        config: config.clone(),
        runtime_logger: runtime_logger.clone(),
        cue_client,
    });

    // Optional demo agent feeding our own webhook with sentiment batches.
    if args.mock_agent {
        let webhook_url = format!("http://127.0.0.1:{}/webhook", args.port);
        let secret = config.webhook_secret.clone();
        tokio::spawn(async move {
            mock_agent::start_mock_agent(webhook_url, secret).await;
        });
    }

    let ad_server = tokio::spawn({
        let state = state.clone();
        let port = args.port;
        let runtime_logger = runtime_logger.clone();
        async move {
            let app = Router::new()
                .route(
                    "/ads/select",
                    post(api::handlers::select_ad).get(api::handlers::list_active_campaigns),
                )
                .route(
                    "/ads/submit",
                    post(api::handlers::submit_campaign).get(api::handlers::campaign_status),
                )
                .route("/ads/track", post(api::handlers::track_ad_event))
                .route("/ads/analyze", post(api::handlers::analyze_subtitles))
                .route(
                    "/payment/{campaign_id}",
                    get(api::handlers::payment_descriptor).post(api::handlers::confirm_payment),
                )
                .route("/webhook", post(api::handlers::handle_webhook))
                .route("/webhook/sentiment", get(api::handlers::latest_sentiment))
                .with_state(state);

            let addr = format!("0.0.0.0:{}", port);
            runtime_logger
                .log("INFO", &format!("ad server running at http://{}", addr))
                .await;
            let listener = TcpListener::bind(&addr).await.unwrap();
            serve(listener, app).await.unwrap();
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            runtime_logger.log("INFO", "Shutting down gracefully...").await;
        }
    }

    runtime_logger.shutdown().await;
    ad_server.abort();
    info!("ad server shut down");
}
