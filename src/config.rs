use std::env;
use url::Url;

/// Sentinel shipped in .env templates; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_steam_api_key_here";

/// Runtime configuration for the Steam API gateway.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub default_user_id: Option<String>,
    pub api_base_url: String,
    pub store_base_url: String,
    pub user_agent: String,
    pub timeout_secs: f64,
    /// Recognized for compatibility with existing deployments; the gateway
    /// itself never retries.
    pub max_retries: u32,
    pub rate_limit: u32,
    pub rate_period_secs: u64,
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - STEAM_API_KEY [required, non-placeholder]
    /// - STEAM_USER_ID (optional fallback identity)
    /// - STEAM_API_BASE_URL (default: https://api.steampowered.com)
    /// - STEAM_STORE_BASE_URL (default: https://store.steampowered.com)
    /// - STEAM_HTTP_TIMEOUT_SECS (default: 10)
    /// - STEAM_MAX_RETRIES (default: 3)
    /// - STEAM_RATE_LIMIT / STEAM_RATE_PERIOD_SECS (default: 100 per 60)
    /// - STEAM_USER_AGENT (default: steam-mcp/<version>)
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("STEAM_API_KEY").map_err(|_| {
            "Missing STEAM_API_KEY; get a key from https://steamcommunity.com/dev/apikey"
                .to_string()
        })?;
        if api_key.trim().is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(
                "Invalid STEAM_API_KEY: placeholder value; get a key from \
                 https://steamcommunity.com/dev/apikey"
                    .to_string(),
            );
        }

        let api_base_url = env::var("STEAM_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.steampowered.com".to_string());
        let store_base_url = env::var("STEAM_STORE_BASE_URL")
            .unwrap_or_else(|_| "https://store.steampowered.com".to_string());
        for (name, value) in [
            ("STEAM_API_BASE_URL", &api_base_url),
            ("STEAM_STORE_BASE_URL", &store_base_url),
        ] {
            Url::parse(value).map_err(|e| format!("Invalid {}: {}", name, e))?;
        }

        let default_user_id = env::var("STEAM_USER_ID").ok().filter(|s| !s.is_empty());
        let timeout_secs = env::var("STEAM_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(10.0);
        let max_retries = env::var("STEAM_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(3);
        let rate_limit = env::var("STEAM_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(100);
        let rate_period_secs = env::var("STEAM_RATE_PERIOD_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(60);
        let default_ua = format!(
            "steam-mcp/{} (+https://github.com/HautechAI/steam-mcp)",
            env!("CARGO_PKG_VERSION")
        );
        let user_agent = env::var("STEAM_USER_AGENT").unwrap_or(default_ua);

        Ok(Self {
            api_key,
            default_user_id,
            api_base_url,
            store_base_url,
            user_agent,
            timeout_secs,
            max_retries,
            rate_limit,
            rate_period_secs,
        })
    }
}
