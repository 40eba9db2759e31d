// src/config/config_manager.rs

/// Environment-level settings, resolved once at startup and shared through
/// `AppState`.
#[derive(Clone, Debug)]
pub struct ConfigManager {
    /// Base public URL used when building payment links.
    pub public_url: String,
    /// HMAC secret for webhook signatures. Unset means verification is
    /// skipped; the ingestor decides how loudly to complain.
    pub webhook_secret: Option<String>,
    /// "production" tightens the unverified-webhook logging.
    pub runtime_env: String,
    pub cue_gateway_url: Option<String>,
    pub cue_gateway_key: Option<String>,
    pub cue_timeout_ms: u64,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl ConfigManager {
    pub fn from_env() -> Self {
        Self {
            public_url: env_opt("CLAWTV_PUBLIC_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            webhook_secret: env_opt("CLAWTV_WEBHOOK_SECRET"),
            runtime_env: env_opt("CLAWTV_ENV").unwrap_or_else(|| "development".to_string()),
            cue_gateway_url: env_opt("CUE_GATEWAY_URL"),
            cue_gateway_key: env_opt("CUE_GATEWAY_KEY"),
            cue_timeout_ms: env_opt("CUE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env == "production"
    }
}
