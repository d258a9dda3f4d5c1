//! Backend configuration for client apps.
//!
//! The app needs exactly two values to reach its Supabase project: the project
//! URL and the anonymous API key. Both are public, safe-to-ship values that are
//! embedded at build time and may be overridden by the runtime environment.

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

const AUTH_PATH: &str = "/auth/v1";
const REST_PATH: &str = "/rest/v1";

/// Errors raised while validating backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Supabase URL and anon key must be provided together")]
    Incomplete,
    #[error("Supabase URL must include http:// or https://")]
    InvalidUrl,
}

/// Build-provisioned backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
}

/// A validated project URL plus anon key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoint {
    pub base_url: String,
    pub anon_key: String,
}

impl BackendEndpoint {
    pub fn auth_url(&self) -> String {
        format!("{}{AUTH_PATH}", self.base_url)
    }

    pub fn rest_url(&self) -> String {
        format!("{}{REST_PATH}", self.base_url)
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self {
            supabase_url: std::env::var(SUPABASE_URL_ENV).ok(),
            supabase_anon_key: std::env::var(SUPABASE_ANON_KEY_ENV).ok(),
        }
    }

    /// Fill missing values from `fallback`, keeping values already present.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            supabase_url: normalize_text_option(self.supabase_url)
                .or_else(|| normalize_text_option(fallback.supabase_url)),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key)
                .or_else(|| normalize_text_option(fallback.supabase_anon_key)),
        }
    }

    /// Resolve into a usable endpoint.
    ///
    /// Returns `Ok(None)` when neither value is set, so a build without a
    /// backend can still start and explain itself.
    pub fn endpoint(&self) -> Result<Option<BackendEndpoint>, ConfigError> {
        let url = normalize_text_option(self.supabase_url.clone());
        let anon_key = normalize_text_option(self.supabase_anon_key.clone());

        match (url, anon_key) {
            (None, None) => Ok(None),
            (Some(url), Some(anon_key)) => Ok(Some(BackendEndpoint {
                base_url: normalize_base_url(&url)?,
                anon_key,
            })),
            _ => Err(ConfigError::Incomplete),
        }
    }
}

/// Strip trailing slashes and any `/auth/v1` or `/rest/v1` suffix.
pub fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !is_http_url(trimmed) {
        return Err(ConfigError::InvalidUrl);
    }
    let base = trimmed
        .strip_suffix(AUTH_PATH)
        .or_else(|| trimmed.strip_suffix(REST_PATH))
        .unwrap_or(trimmed);
    Ok(base.to_string())
}
