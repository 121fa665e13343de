//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use brewshot_config::{
    ClientIdentificationConfig, Config, HealthConfig, ProviderConfig, RetryConfig, ServerConfig, StoreConfig,
    StudioConfig,
};
use secrecy::SecretString;

pub const TEXT_MODEL: &str = "openai/o4-mini";
pub const DIRECT_MODEL: &str = "black-forest-labs/flux-kontext-pro";
pub const COMPOSITE_MODEL: &str = "google/nano-banana-pro";
pub const ANALYSIS_MODEL: &str = "openai/gpt-5";
pub const EDIT_MODEL: &str = "bytedance/seedream-4";
pub const VIDEO_MODEL: &str = "google/veo-3.1";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder pointed at a mock provider, with fast polling and retries
    pub fn new(provider_base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                provider: ProviderConfig {
                    api_token: Some(SecretString::from("r8_test")),
                    base_url: provider_base_url.to_owned(),
                    request_timeout: Duration::from_secs(5),
                    wait_seconds: 0,
                    poll_interval: Duration::from_millis(10),
                    poll_timeout: Duration::from_secs(2),
                    retry: RetryConfig {
                        enabled: true,
                        max_attempts: 3,
                        initial_interval: Duration::from_millis(5),
                        max_interval: Duration::from_millis(20),
                        multiplier: 2.0,
                    },
                },
                studio: StudioConfig {
                    translate_prompt: false,
                    ..StudioConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Run scene prompts through the text model before generating
    pub fn with_translation(mut self) -> Self {
        self.config.studio.translate_prompt = true;
        self
    }

    /// Identify callers by the default `x-brewshot-user` header
    pub fn with_client_identification(mut self) -> Self {
        self.config.server.client_identification = Some(ClientIdentificationConfig::default());
        self
    }

    /// Identify callers and treat the `admin` value of `x-brewshot-group` as admin
    pub fn with_admin_group(mut self) -> Self {
        self.config.server.client_identification = Some(ClientIdentificationConfig {
            group_header: Some("x-brewshot-group".to_owned()),
            ..ClientIdentificationConfig::default()
        });
        self.config.studio.admin_group = Some("admin".to_owned());
        self
    }

    /// Persist records to a JSON Lines file
    pub fn with_file_store(mut self, path: PathBuf) -> Self {
        self.config.studio.store = StoreConfig::File { path };
        self
    }

    /// Disable provider retries
    pub fn without_retry(mut self) -> Self {
        self.config.provider.retry.enabled = false;
        self
    }

    /// Per-request timeout of the provider client
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.provider.request_timeout = timeout;
        self
    }

    /// Shrink the polling window
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.provider.poll_timeout = timeout;
        self
    }

    /// Limit upload size
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.studio.max_upload_bytes = bytes;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
