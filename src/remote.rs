use log::{debug, warn};
use serde_json::Value;
use std::env;

use crate::model::ResultData;

/// Environment variable holding the remote service's base URL.
pub const API_URL_ENV: &str = "UNIRESULT_API_URL";

/// Fallback base URL when no configuration is supplied.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Outcome of one remote save attempt.
///
/// `remote_id` is the id the service assigned, present only when `ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSaveResult {
    pub ok: bool,
    pub remote_id: Option<String>,
}

impl RemoteSaveResult {
    fn failed() -> Self {
        RemoteSaveResult {
            ok: false,
            remote_id: None,
        }
    }
}

/// Client for the best-effort remote mirror.
///
/// Exactly one `POST {base}/submit` per save, no retry and no backoff; the
/// local write is the durability guarantee. Every failure mode collapses
/// into `ok: false`, so callers never have to handle an error from here.
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RemoteClient {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Base URL from `UNIRESULT_API_URL`, defaulting to the local acceptor.
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        RemoteClient::new(base_url)
    }

    /// Mirror one result to the remote service.
    ///
    /// Success means an HTTP 2xx with a JSON body carrying an `id` field
    /// (string or number). Anything else, including transport errors, is
    /// reported as a failed attempt rather than raised.
    pub async fn save_remote(&self, result: &ResultData) -> RemoteSaveResult {
        let url = format!("{}/submit", self.base_url);
        let response = match self.client.post(&url).json(result).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("remote save failed to send: {}", e);
                return RemoteSaveResult::failed();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("remote save rejected with status {}", status);
            return RemoteSaveResult::failed();
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("remote save returned an unreadable body: {}", e);
                return RemoteSaveResult::failed();
            }
        };

        let remote_id = match body.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                warn!("remote save response carries no id field");
                return RemoteSaveResult::failed();
            }
        };

        debug!("remote save accepted as {}", remote_id);
        RemoteSaveResult {
            ok: true,
            remote_id: Some(remote_id),
        }
    }
}
