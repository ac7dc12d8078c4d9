//! Runtime configuration
//!
//! `CallSettings` tunes the call coordinator; `BackendConfig` locates the
//! interview backend and is usually read from the environment.

use std::time::Duration;

use mockcall::{DomainError, DEFAULT_CV_EXCERPT_CHARS};
use serde::{Deserialize, Serialize};

pub const ENV_API_URL: &str = "MOCKCALL_API_URL";
pub const ENV_API_KEY: &str = "MOCKCALL_API_KEY";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MOCKCALL_HTTP_TIMEOUT_SECS";

/// Coordinator timing and prompt settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSettings {
    /// Bound on attempt start, token exchange and attempt finish
    pub request_timeout: Duration,
    /// Bound on provider start and on waiting for the connect event
    pub connect_timeout: Duration,
    /// Spacing of ring cues while incoming
    pub ring_interval: Duration,
    /// Character budget for the CV excerpt variable
    pub cv_excerpt_chars: usize,
}

impl Default for CallSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(15),
            ring_interval: Duration::from_millis(1200),
            cv_excerpt_chars: DEFAULT_CV_EXCERPT_CHARS,
        }
    }
}

impl CallSettings {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_ring_interval(mut self, interval: Duration) -> Self {
        self.ring_interval = interval;
        self
    }

    /// Every duration must be non-zero
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("request_timeout", self.request_timeout),
            ("connect_timeout", self.connect_timeout),
            ("ring_interval", self.ring_interval),
        ] {
            if value.is_zero() {
                return Err(DomainError::Validation(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }
}

/// Interview backend location and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `MOCKCALL_*` variables, reading `.env` first if present
    pub fn from_env() -> Result<Self, DomainError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("⚠️  Failed to read .env: {}", e);
            }
        }

        let base_url = std::env::var(ENV_API_URL)
            .map_err(|_| DomainError::Validation(format!("{} is not set", ENV_API_URL)))?;

        let mut config = Self::new(base_url);

        match std::env::var(ENV_API_KEY) {
            Ok(key) if !key.trim().is_empty() => config.api_key = Some(key),
            _ => tracing::warn!("⚠️  No {} set - requests are unauthenticated", ENV_API_KEY),
        }

        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| {
                DomainError::Validation(format!(
                    "{} must be whole seconds, got {:?}",
                    ENV_HTTP_TIMEOUT_SECS, raw
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_builder() {
        let config = BackendConfig::new("https://api.example.test/")
            .with_api_key("key")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://api.example.test");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_call_settings_defaults() {
        let settings = CallSettings::default();
        assert!(settings.connect_timeout > settings.ring_interval);
        assert_eq!(settings.cv_excerpt_chars, DEFAULT_CV_EXCERPT_CHARS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_call_settings_reject_zero_durations() {
        let zero_ring = CallSettings::default().with_ring_interval(Duration::ZERO);
        let zero_connect = CallSettings::default().with_connect_timeout(Duration::ZERO);
        let zero_request = CallSettings::default().with_request_timeout(Duration::ZERO);

        for (settings, field) in [
            (zero_ring, "ring_interval"),
            (zero_connect, "connect_timeout"),
            (zero_request, "request_timeout"),
        ] {
            match settings.validate() {
                Err(DomainError::Validation(message)) => assert!(message.contains(field)),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }
}
