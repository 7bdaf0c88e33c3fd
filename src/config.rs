//! Application configuration parsed from environment variables.
//!
//! Missing secrets do not abort startup: `main` serves a configuration
//! error page listing every missing name instead.

use std::path::PathBuf;

use crate::llm::config::LlmConfig;
use crate::llm::types::LlmError;
use crate::supabase::SupabaseConfig;

pub const REQUIRED_KEYS: [&str; 3] = ["LLM_API_KEY", "SUPABASE_URL", "SUPABASE_ANON_KEY"];
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("invalid environment variable {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    /// Variable names to list on the configuration error page.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Missing(keys) => keys.clone(),
            Self::Invalid { key, .. } => vec![key.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub supabase: SupabaseConfig,
    pub port: u16,
    pub static_dir: PathBuf,
    pub cookie_secure: bool,
}

impl AppConfig {
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config through `lookup`.
    ///
    /// # Errors
    ///
    /// `Missing` with every absent or blank required key; `Invalid` for an
    /// unparseable optional value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let missing = missing_keys(&lookup);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let llm = LlmConfig::from_lookup(&lookup).map_err(|e| match e {
            LlmError::ConfigParse(reason) => ConfigError::Invalid { key: "LLM_PROVIDER".into(), reason },
            LlmError::MissingApiKey { var } => ConfigError::Missing(vec![var]),
            other => ConfigError::Invalid { key: "LLM_API_KEY".into(), reason: other.to_string() },
        })?;

        let url = lookup("SUPABASE_URL").unwrap_or_default();
        if !(url.trim().starts_with("https://") || url.trim().starts_with("http://")) {
            return Err(ConfigError::Invalid { key: "SUPABASE_URL".into(), reason: "expected an http(s) URL".into() });
        }
        let supabase = SupabaseConfig::new(&url, &lookup("SUPABASE_ANON_KEY").unwrap_or_default());

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT".into(), reason: format!("not a port number: {raw}") })?,
        };
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);
        let cookie_secure = lookup("COOKIE_SECURE")
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(false);

        Ok(Self { llm, supabase, port, static_dir, cookie_secure })
    }
}

/// Required keys that are absent or blank, in declaration order.
pub fn missing_keys(lookup: &impl Fn(&str) -> Option<String>) -> Vec<String> {
    REQUIRED_KEYS
        .iter()
        .filter(|key| lookup(**key).is_none_or(|v| v.trim().is_empty()))
        .map(|key| (*key).to_string())
        .collect()
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
