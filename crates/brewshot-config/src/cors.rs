use std::time::Duration;

use serde::Deserialize;

/// CORS configuration for the browser front-end
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` or empty allows any origin
    #[serde(default)]
    pub origins: Vec<String>,
    /// Allow credentials (cookies) on cross-origin requests
    #[serde(default)]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl CorsConfig {
    /// Whether any origin is accepted
    pub fn allows_any_origin(&self) -> bool {
        self.origins.is_empty() || self.origins.iter().any(|origin| origin == "*")
    }

    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}
