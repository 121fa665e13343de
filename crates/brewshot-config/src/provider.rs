use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Generative-media provider (Replicate HTTP API) configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API token sent as a bearer credential
    #[serde(default)]
    pub api_token: Option<SecretString>,
    /// Base URL override
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to every HTTP request against the provider
    #[serde(default = "default_request_timeout", deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
    /// Seconds the provider may hold a prediction request open (`Prefer: wait=N`)
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,
    /// Delay between polls of an unfinished prediction
    #[serde(default = "default_poll_interval", deserialize_with = "crate::duration::deserialize")]
    pub poll_interval: Duration,
    /// Give up on an unfinished prediction after this long
    #[serde(default = "default_poll_timeout", deserialize_with = "crate::duration::deserialize")]
    pub poll_timeout: Duration,
    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            wait_seconds: default_wait_seconds(),
            poll_interval: default_poll_interval(),
            poll_timeout: default_poll_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Exponential backoff retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_interval", deserialize_with = "crate::duration::deserialize")]
    pub initial_interval: Duration,
    #[serde(default = "default_max_interval", deserialize_with = "crate::duration::deserialize")]
    pub max_interval: Duration,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_attempts: default_max_attempts(),
            initial_interval: default_initial_interval(),
            max_interval: default_max_interval(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.replicate.com/v1".to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

const fn default_wait_seconds() -> u64 {
    60
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

const fn default_poll_timeout() -> Duration {
    Duration::from_secs(300)
}

const fn default_true() -> bool {
    true
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_interval() -> Duration {
    Duration::from_millis(500)
}

const fn default_max_interval() -> Duration {
    Duration::from_secs(10)
}

const fn default_multiplier() -> f64 {
    2.0
}
