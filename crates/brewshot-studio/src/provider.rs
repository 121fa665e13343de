pub(crate) mod replicate;

use async_trait::async_trait;
use serde_json::Value;

use crate::{error::ProviderError, output::RawProviderOutput};

pub use replicate::ReplicateProvider;

/// A remote generative-media service that runs a model on a JSON input
///
/// `model` is either `owner/name` or a pinned `owner/name:version`.
/// Implementations wait for the prediction to finish and hand back its
/// output already decoded into a [`RawProviderOutput`].
#[async_trait]
pub trait Provider: Send + Sync {
    async fn run(&self, model: &str, input: Value) -> Result<RawProviderOutput, ProviderError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
