use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, StoreConfig};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the provider credentials, timeouts, retry
    /// policy, or record store are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_provider_config()?;
        self.validate_studio_config()?;
        Ok(())
    }

    /// Validate provider credentials and timing
    fn validate_provider_config(&self) -> anyhow::Result<()> {
        let provider = &self.provider;

        let Some(ref token) = provider.api_token else {
            anyhow::bail!("provider.api_token is required");
        };

        if token.expose_secret().trim().is_empty() {
            anyhow::bail!("provider.api_token must not be empty");
        }

        if provider.base_url.trim().is_empty() {
            anyhow::bail!("provider.base_url must not be empty");
        }

        if provider.request_timeout.is_zero() {
            anyhow::bail!("provider.request_timeout must be greater than 0");
        }

        if provider.poll_interval.is_zero() {
            anyhow::bail!("provider.poll_interval must be greater than 0");
        }

        if provider.retry.max_attempts == 0 {
            anyhow::bail!("provider.retry.max_attempts must be at least 1");
        }

        if provider.retry.multiplier < 1.0 {
            anyhow::bail!("provider.retry.multiplier must be at least 1.0");
        }

        Ok(())
    }

    /// Validate studio models and storage
    fn validate_studio_config(&self) -> anyhow::Result<()> {
        let studio = &self.studio;

        let models = [
            ("text_model", &studio.text_model),
            ("analysis_model", &studio.analysis_model),
            ("direct_model", &studio.direct_model),
            ("composite_model", &studio.composite_model),
            ("edit_model", &studio.edit_model),
            ("video_model", &studio.video_model),
        ];

        for (field, model) in models {
            if model.trim().is_empty() {
                anyhow::bail!("studio.{field} must not be empty");
            }
        }

        if studio.max_upload_bytes == 0 {
            anyhow::bail!("studio.max_upload_bytes must be greater than 0");
        }

        if let StoreConfig::File { ref path } = studio.store
            && path.as_os_str().is_empty()
        {
            anyhow::bail!("studio.store.path must not be empty for the file store");
        }

        if studio.admin_group.is_some()
            && self
                .server
                .client_identification
                .as_ref()
                .is_none_or(|identification| identification.group_header.is_none())
        {
            anyhow::bail!("studio.admin_group requires server.client_identification.group_header");
        }

        Ok(())
    }
}
