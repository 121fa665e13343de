use brewshot_core::ClientIdentity;
use brewshot_telemetry::{KeyValue, metrics};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::{Result, StudioError},
    image::ImagePayload,
    prompt::{compose_caption_prompt, compose_scene_prompt, compose_variant_prompt},
    scene::SceneParameters,
    server::Studio,
    store::GeneratedImageRecord,
    variant::GenerationVariant,
};

/// Images and taglines produced for one generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    /// Successful images in completion order
    pub image_urls: Vec<String>,
    /// Caption text blocks, one per caption call
    pub captions: Vec<String>,
}

impl Studio {
    /// Generate `params.requested_count` marketing images plus captions
    ///
    /// Each image is produced independently; a failed unit is logged and
    /// skipped. Only a batch in which every unit failed is an error. Records
    /// are persisted only for identified callers.
    pub async fn generate(
        &self,
        identity: Option<&ClientIdentity>,
        params: &SceneParameters,
        variant: GenerationVariant,
        image: &ImagePayload,
    ) -> Result<GenerationOutcome> {
        if image.is_empty() {
            return Err(StudioError::InvalidInput("uploaded image is empty".to_string()));
        }

        let image_uri = image.to_data_uri();
        let scene_prompt = self.elaborate(compose_scene_prompt(params)).await;
        let prompt = compose_variant_prompt(variant, &scene_prompt);
        let attributes = [KeyValue::new("variant", variant.selector())];

        let mut image_urls = Vec::new();
        let mut last_error = None;

        for unit in 1..=params.requested_count {
            let output = self
                .dispatcher
                .dispatch(variant, &image_uri, &prompt, &params.aspect_ratio)
                .await;

            match output.map(|raw| raw.first_url()) {
                Ok(Some(url)) => {
                    tracing::debug!(variant = %variant, unit, url = %url, "generated image");
                    metrics::studio().generations.add(1, &attributes);

                    if let Some(identity) = identity {
                        self.persist(identity, &url, &scene_prompt, params).await;
                    }

                    image_urls.push(url);
                }
                Ok(None) => {
                    tracing::warn!(variant = %variant, unit, "provider returned no usable image");
                    metrics::studio().generation_failures.add(1, &attributes);
                    last_error = Some("provider returned no usable image".to_string());
                }
                Err(err) => {
                    tracing::warn!(variant = %variant, unit, error = %err, "image generation failed");
                    metrics::studio().generation_failures.add(1, &attributes);
                    last_error = Some(err.client_detail());
                }
            }
        }

        if image_urls.is_empty() {
            tracing::error!(
                variant = %variant,
                attempts = params.requested_count,
                last_error = last_error.as_deref().unwrap_or_default(),
                "every generation attempt failed"
            );
            return Err(StudioError::GenerationFailed {
                attempts: params.requested_count,
                last_error,
            });
        }

        let captions = self.captions(params, &image_uri).await;

        Ok(GenerationOutcome { image_urls, captions })
    }

    /// Run the scene prompt through the text model
    ///
    /// Falls back to the untranslated prompt when disabled, when the call
    /// fails, or when the model returns nothing.
    async fn elaborate(&self, scene_prompt: String) -> String {
        if !self.settings.translate_prompt {
            return scene_prompt;
        }

        let input = json!({ "prompt": scene_prompt });

        match self.provider.run(&self.settings.text_model, input).await {
            Ok(raw) => {
                let elaborated = raw.streamed_text();
                if elaborated.is_empty() {
                    tracing::warn!(model = %self.settings.text_model, "prompt elaboration returned no text, using scene prompt");
                    scene_prompt
                } else {
                    elaborated
                }
            }
            Err(err) => {
                tracing::warn!(model = %self.settings.text_model, error = %err, "prompt elaboration failed, using scene prompt");
                scene_prompt
            }
        }
    }

    async fn captions(&self, params: &SceneParameters, image_uri: &str) -> Vec<String> {
        let input = json!({
            "prompt": compose_caption_prompt(params),
            "input_image": image_uri,
        });

        match self.provider.run(&self.settings.text_model, input).await {
            Ok(raw) => vec![raw.joined_text()],
            Err(err) => {
                tracing::warn!(model = %self.settings.text_model, error = %err, "caption generation failed");
                Vec::new()
            }
        }
    }

    async fn persist(&self, identity: &ClientIdentity, url: &str, prompt: &str, params: &SceneParameters) {
        let record = GeneratedImageRecord::new(&identity.client_id, url, prompt, params);

        if let Err(err) = self.store.insert(record).await {
            tracing::error!(owner = %identity.client_id, error = %err, "failed to persist generated image");
        }
    }
}
