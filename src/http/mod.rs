use crate::config::Config;
use log::{error, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod rate;
pub use rate::RateLimiter;

/// Stable failure taxonomy for every upstream call. Adapters forward these
/// unchanged; retry policy belongs to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid Steam API key")]
    Auth,
    #[error("Steam API rate limit exceeded")]
    RateLimit,
    #[error("unexpected HTTP status {0}")]
    Http(StatusCode),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("Steam API error: {0}")]
    Upstream(String),
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth => "auth_error",
            ApiError::RateLimit => "rate_limited",
            ApiError::Http(_) => "http_error",
            ApiError::Transport(_) => "transport_error",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Unknown(_) => "unknown_error",
        }
    }

    /// Whether a caller could reasonably retry the same request later.
    pub fn retriable(&self) -> bool {
        matches!(self, ApiError::RateLimit | ApiError::Transport(_))
    }
}

/// One Steam Web API call under the `/{interface}/{method}/{version}/`
/// convention. Immutable once built; the credential is injected by the
/// session and must never appear in `params`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub interface: &'static str,
    pub method: &'static str,
    pub version: &'static str,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(interface: &'static str, method: &'static str, version: &'static str) -> Self {
        Self {
            interface,
            method,
            version,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Scoped HTTP session for one logical unit of work (one tool call).
///
/// Owns a bounded connection pool released by drop on every exit path, and
/// shares the process-wide rate budget with all other sessions.
pub struct ApiSession {
    http: Client,
    api_base: String,
    store_base: String,
    key: String,
    limiter: Arc<RateLimiter>,
}

impl ApiSession {
    pub fn new(cfg: &Config, limiter: Arc<RateLimiter>) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&cfg.user_agent)
            .map_err(|e| ApiError::Unknown(format!("invalid user agent: {}", e)))?;
        default_headers.insert(USER_AGENT, ua);
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs_f64(cfg.timeout_secs))
            .pool_max_idle_per_host(20)
            .use_rustls_tls()
            .build()
            .map_err(|e| ApiError::Unknown(e.to_string()))?;
        Ok(Self {
            http,
            api_base: cfg.api_base_url.trim_end_matches('/').to_string(),
            store_base: cfg.store_base_url.trim_end_matches('/').to_string(),
            key: cfg.api_key.clone(),
            limiter,
        })
    }

    /// GET against the interface/method/version endpoint family, with the
    /// API key injected as a query parameter.
    pub async fn get(&self, req: &ApiRequest) -> Result<Value, ApiError> {
        self.limiter.acquire().await;
        let url = format!(
            "{}/{}/{}/{}/",
            self.api_base, req.interface, req.method, req.version
        );
        let sent = self
            .http
            .get(&url)
            .query(&[("key", self.key.as_str())])
            .query(&req.params)
            .send()
            .await;
        finish(&url, sent).await
    }

    /// GET against the store-front endpoint family by direct path; these
    /// endpoints take no credential but share the same rate budget.
    pub async fn get_store(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        self.limiter.acquire().await;
        let url = format!("{}{}", self.store_base, path);
        let sent = self.http.get(&url).query(params).send().await;
        finish(&url, sent).await
    }
}

async fn finish(
    url: &str,
    sent: Result<reqwest::Response, reqwest::Error>,
) -> Result<Value, ApiError> {
    let res = match sent {
        Ok(r) => r,
        Err(e) => {
            warn!("GET {} transport failure: {}", url, e);
            return Err(ApiError::Transport(e.to_string()));
        }
    };
    let status = res.status();
    if let Some(err) = classify_status(status) {
        error!("GET {} failed: {} ({})", url, status, err.code());
        return Err(err);
    }
    let body = match res.text().await {
        Ok(t) => t,
        Err(e) => {
            warn!("GET {} body read failure: {}", url, e);
            return Err(ApiError::Transport(e.to_string()));
        }
    };
    decode_payload(&body).map_err(|err| {
        error!("GET {} failed: {} ({})", url, err, err.code());
        err
    })
}

/// Map a non-success HTTP status onto the error taxonomy. 403 and 429 have
/// dedicated variants so callers can tell credential problems and upstream
/// throttling apart from generic HTTP failures.
pub fn classify_status(status: StatusCode) -> Option<ApiError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::FORBIDDEN => ApiError::Auth,
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit,
        s => ApiError::Http(s),
    })
}

/// Decode a 2xx body. A body that parses but carries a top-level `error`
/// field is an upstream failure, not a success.
pub fn decode_payload(body: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::Unknown(format!("malformed response body: {}", e)))?;
    if let Some(marker) = value.get("error") {
        let message = marker
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| marker.to_string());
        return Err(ApiError::Upstream(message));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_matrix() {
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(classify_status(StatusCode::NO_CONTENT).is_none());
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN),
            Some(ApiError::Auth)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(ApiError::RateLimit)
        ));
        match classify_status(StatusCode::INTERNAL_SERVER_ERROR) {
            Some(ApiError::Http(s)) => assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR),
            other => panic!("expected Http variant, got {:?}", other),
        }
        match classify_status(StatusCode::NOT_FOUND) {
            Some(ApiError::Http(s)) => assert_eq!(s, StatusCode::NOT_FOUND),
            other => panic!("expected Http variant, got {:?}", other),
        }
    }

    #[test]
    fn forbidden_is_auth_never_http() {
        let err = classify_status(StatusCode::FORBIDDEN).unwrap();
        assert_eq!(err.code(), "auth_error");
        assert!(!err.retriable());
    }

    #[test]
    fn retriable_flags() {
        assert!(ApiError::RateLimit.retriable());
        assert!(ApiError::Transport("connection refused".into()).retriable());
        assert!(!ApiError::Auth.retriable());
        assert!(!ApiError::Http(StatusCode::BAD_GATEWAY).retriable());
        assert!(!ApiError::Upstream("bad".into()).retriable());
        assert!(!ApiError::Unknown("bad".into()).retriable());
    }

    #[test]
    fn payload_decoded_exactly() {
        let body = r#"{"response":{"players":[{"steamid":"76561198000000000","personaname":"gabe"}]}}"#;
        let value = decode_payload(body).unwrap();
        assert_eq!(
            value["response"]["players"][0]["personaname"],
            serde_json::json!("gabe")
        );
    }

    #[test]
    fn embedded_error_marker_is_upstream_failure() {
        let err = decode_payload(r#"{"error":"Requested app has no stats"}"#).unwrap_err();
        match &err {
            ApiError::Upstream(msg) => assert_eq!(msg, "Requested app has no stats"),
            other => panic!("expected Upstream, got {:?}", other),
        }
        assert_eq!(err.code(), "upstream_error");
    }

    #[test]
    fn non_string_error_marker_is_stringified() {
        let err = decode_payload(r#"{"error":{"errorcode":8}}"#).unwrap_err();
        match err {
            ApiError::Upstream(msg) => assert!(msg.contains("errorcode")),
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn malformed_body_is_unknown() {
        let err = decode_payload("<html>not json</html>").unwrap_err();
        assert_eq!(err.code(), "unknown_error");
    }

    #[test]
    fn request_params_accumulate_in_order() {
        let req = ApiRequest::new("ISteamUser", "GetPlayerSummaries", "v0002")
            .param("steamids", "76561198000000000")
            .param("format", "json");
        assert_eq!(req.params().len(), 2);
        assert_eq!(req.params()[0].0, "steamids");
        assert_eq!(req.params()[1].1, "json");
    }
}
