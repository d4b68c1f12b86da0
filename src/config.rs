//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Client core configuration.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Base URL of the marketplace API, e.g. `https://api.serviq.app/api`.
    pub api_base_url: String,
    /// Media hosting configuration.
    pub media: MediaConfig,
}

/// Media hosting endpoint configuration.
///
/// The hosting endpoint was a build constant in earlier clients; it is
/// configuration here so staging and production can point elsewhere.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Full upload URL of the hosting endpoint.
    pub upload_url: String,
    /// Unsigned upload preset sent with each multipart form.
    pub upload_preset: String,
    /// Per-upload deadline; the in-flight call is abandoned after this.
    pub timeout: Duration,
    /// Deadline for the connectivity preflight probe.
    pub preflight_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            media: MediaConfig::default(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: "http://localhost:9000/upload".to_string(),
            upload_preset: "serviq_unsigned".to_string(),
            timeout: Duration::from_secs(30),
            preflight_timeout: Duration::from_secs(5),
        }
    }
}

impl CoreConfig {
    /// Build a config from environment variables.
    ///
    /// `SERVIQ_API_BASE_URL`, `SERVIQ_UPLOAD_URL`, and
    /// `SERVIQ_UPLOAD_PRESET` are required; timeouts keep their defaults
    /// unless `SERVIQ_UPLOAD_TIMEOUT_SECS` is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = require_env("SERVIQ_API_BASE_URL")?;
        let upload_url = require_env("SERVIQ_UPLOAD_URL")?;
        let upload_preset = require_env("SERVIQ_UPLOAD_PRESET")?;

        let mut media = MediaConfig {
            upload_url,
            upload_preset,
            ..Default::default()
        };

        if let Ok(raw) = std::env::var("SERVIQ_UPLOAD_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVIQ_UPLOAD_TIMEOUT_SECS".to_string(),
                message: format!("expected an integer number of seconds, got {raw:?}"),
            })?;
            media.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            api_base_url,
            media,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_timeouts() {
        let config = CoreConfig::default();
        assert_eq!(config.media.timeout, Duration::from_secs(30));
        assert!(config.media.preflight_timeout < config.media.timeout);
    }

    #[test]
    fn from_env_reports_missing_variable() {
        // Only meaningful when the variable is genuinely absent.
        unsafe { std::env::remove_var("SERVIQ_API_BASE_URL") };
        let err = CoreConfig::from_env().unwrap_err();
        match err {
            ConfigError::MissingEnvVar(key) => assert_eq!(key, "SERVIQ_API_BASE_URL"),
            other => panic!("expected MissingEnvVar, got {other:?}"),
        }
    }
}
