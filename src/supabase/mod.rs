//! Supabase: thin async client for the hosted BaaS.
//!
//! ARCHITECTURE
//! ============
//! Two REST surfaces share one `reqwest::Client`:
//! - `rest`: `PostgREST` table access under `/rest/v1` (the `prompts` table).
//! - `auth`: `GoTrue` email/password auth under `/auth/v1`.
//!
//! Every request carries the project's anon key in the `apikey` header.
//! The bearer token is the caller's access token when one is supplied, so
//! row-level security sees the real user; otherwise the anon key.

pub mod auth;
pub mod rest;

use std::time::Duration;

use serde_json::Value;

use crate::error::ErrorCode;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`, without trailing slash.
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    #[must_use]
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self { url: url.trim().trim_end_matches('/').to_owned(), anon_key: anon_key.trim().to_owned() }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The BaaS answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The access token was rejected.
    #[error("invalid or expired session")]
    Unauthorized,

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for SupabaseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_STORE_REQUEST",
            Self::Api { .. } => "E_STORE_API",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Parse(_) => "E_STORE_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { status: 429 | 500..=599, .. })
    }
}

/// Build an error from a non-success response.
///
/// `PostgREST` reports `message`, `GoTrue` uses `msg` or
/// `error_description`; the first one present wins, then the raw body.
pub(crate) fn api_error(status: u16, body: &str) -> SupabaseError {
    if status == 401 {
        return SupabaseError::Unauthorized;
    }
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
        })
        .map(str::to_owned)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() { format!("status {status}") } else { trimmed.to_owned() }
        });
    SupabaseError::Api { status, message }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SupabaseError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.url.clone(), anon_key: config.anon_key.clone() })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn with_keys(&self, builder: reqwest::RequestBuilder, access_token: Option<&str>) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }
}

/// Send a request and return status, headers and body text.
async fn send(builder: reqwest::RequestBuilder) -> Result<(u16, reqwest::header::HeaderMap, String), SupabaseError> {
    let response = builder
        .send()
        .await
        .map_err(|e| SupabaseError::Request(e.to_string()))?;
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|e| SupabaseError::Request(e.to_string()))?;
    Ok((status, headers, body))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
