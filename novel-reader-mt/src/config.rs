//! Translator configuration
//!
//! Credentials and model choices are read once at startup and passed into
//! [`ModelFallbackClient`](crate::fallback::ModelFallbackClient) explicitly.
//!
//! | variable | default |
//! |---|---|
//! | `GEMINI_API_KEY` | unset (every translation fails with "missing credentials") |
//! | `NOVEL_READER_PRIMARY_MODEL` | `gemini-3-flash-preview` |
//! | `NOVEL_READER_FALLBACK_MODEL` | `gemini-2.0-flash-exp` |
//! | `NOVEL_READER_API_BASE` | `https://generativelanguage.googleapis.com/v1beta/models` |
//! | `NOVEL_READER_TIMEOUT_SECS` | `30` |

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const PRIMARY_MODEL_VAR: &str = "NOVEL_READER_PRIMARY_MODEL";
pub const FALLBACK_MODEL_VAR: &str = "NOVEL_READER_FALLBACK_MODEL";
pub const API_BASE_VAR: &str = "NOVEL_READER_API_BASE";
pub const TIMEOUT_VAR: &str = "NOVEL_READER_TIMEOUT_SECS";

pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    api_key: Option<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl TranslatorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::without_credentials()
        }
    }

    pub fn without_credentials() -> Self {
        Self {
            api_key: None,
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from process environment.
    ///
    /// A missing key is not an error here; it is reported by the client on
    /// every call instead. Malformed overrides are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::without_credentials();
        config.api_key = lookup(API_KEY_VAR);

        if let Some(model) = lookup(PRIMARY_MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            config.primary_model = model;
        }
        if let Some(model) = lookup(FALLBACK_MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            config.fallback_model = model;
        }
        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            config.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: TIMEOUT_VAR,
                        value: raw,
                    });
                }
            };
        }

        Ok(config)
    }

    pub fn with_models(mut self, primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.primary_model = primary.into();
        self.fallback_model = fallback.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The API key, if one is configured and not blank.
    pub fn credentials(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::without_credentials()
    }
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
