use std::sync::Arc;

use brewshot_config::{Config, StudioConfig};
use brewshot_core::ClientIdentity;

use crate::{
    dispatch::Dispatcher,
    error::{Result, StudioError},
    provider::{Provider, ReplicateProvider},
    store::{self, GeneratedImageRecord, RecordStore},
};

/// Model names and behavior switches resolved from configuration
#[derive(Debug, Clone)]
pub struct StudioSettings {
    pub text_model: String,
    pub analysis_model: String,
    pub edit_model: String,
    pub video_model: String,
    pub default_aspect_ratio: String,
    pub translate_prompt: bool,
    pub max_upload_bytes: usize,
    pub admin_group: Option<String>,
}

impl From<&StudioConfig> for StudioSettings {
    fn from(config: &StudioConfig) -> Self {
        Self {
            text_model: config.text_model.clone(),
            analysis_model: config.analysis_model.clone(),
            edit_model: config.edit_model.clone(),
            video_model: config.video_model.clone(),
            default_aspect_ratio: config.default_aspect_ratio.clone(),
            translate_prompt: config.translate_prompt,
            max_upload_bytes: config.max_upload_bytes,
            admin_group: config.admin_group.clone(),
        }
    }
}

/// Shared state behind every studio endpoint
pub struct Studio {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) settings: StudioSettings,
}

impl Studio {
    /// Assemble a studio from an already-built provider and store
    pub fn new(provider: Arc<dyn Provider>, store: Arc<dyn RecordStore>, config: &StudioConfig) -> Self {
        let dispatcher = Dispatcher::new(provider.clone(), &config.direct_model, &config.composite_model);

        Self {
            provider,
            dispatcher,
            store,
            settings: StudioSettings::from(config),
        }
    }

    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Whether the caller belongs to the configured admin group
    pub fn is_admin(&self, identity: &ClientIdentity) -> bool {
        self.settings
            .admin_group
            .as_deref()
            .is_some_and(|admin| identity.group.as_deref() == Some(admin))
    }

    /// Records generated for `owner`, as seen by `requester`
    ///
    /// Callers may always list their own records; listing anyone else's
    /// needs admin membership.
    pub async fn records_for(&self, requester: &ClientIdentity, owner: &str) -> Result<Vec<GeneratedImageRecord>> {
        if requester.client_id != owner && !self.is_admin(requester) {
            tracing::warn!(requester = %requester.client_id, owner, "non-admin asked for another user's records");
            return Err(StudioError::Forbidden(
                "listing another user's images requires admin access".to_string(),
            ));
        }

        self.store.list_for_owner(owner).await
    }
}

/// Builder for constructing the studio from configuration
pub struct StudioBuilder<'a> {
    config: &'a Config,
}

impl<'a> StudioBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Studio> {
        let provider: Arc<dyn Provider> = Arc::new(ReplicateProvider::new(&self.config.provider)?);
        let store = store::from_config(&self.config.studio.store);

        tracing::debug!(
            provider = provider.name(),
            base_url = %self.config.provider.base_url,
            "studio initialized"
        );

        Ok(Studio::new(provider, store, &self.config.studio))
    }
}
