use std::sync::Arc;

use serde_json::{Value, json};

use crate::{
    error::ProviderError,
    output::RawProviderOutput,
    prompt::COMPOSITE_INSTRUCTION,
    provider::Provider,
    variant::{BackgroundStyle, GenerationVariant},
};

/// Routes one generation unit to the provider call sequence of its variant
pub struct Dispatcher {
    provider: Arc<dyn Provider>,
    direct_model: String,
    composite_model: String,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn Provider>, direct_model: impl Into<String>, composite_model: impl Into<String>) -> Self {
        Self {
            provider,
            direct_model: direct_model.into(),
            composite_model: composite_model.into(),
        }
    }

    /// Produce one image for `variant`
    ///
    /// `image` is the product photo as a data URI and `prompt` the
    /// variant-specific prompt. Background variants fail with
    /// [`ProviderError::MissingOutput`] when the background step yields no URL.
    pub async fn dispatch(
        &self,
        variant: GenerationVariant,
        image: &str,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<RawProviderOutput, ProviderError> {
        match variant {
            GenerationVariant::Direct => {
                let input = json!({
                    "prompt": prompt,
                    "input_image": image,
                    "aspect_ratio": aspect_ratio,
                });
                self.provider.run(&self.direct_model, input).await
            }
            GenerationVariant::DirectComposite => {
                let input = composite_input(prompt, vec![image.into()], aspect_ratio);
                self.provider.run(&self.composite_model, input).await
            }
            GenerationVariant::BackgroundComposite(style) => {
                let background = self.background(style, image, prompt, aspect_ratio).await?;

                tracing::debug!(variant = %variant, background = %background, "compositing product over background");

                let input = composite_input(COMPOSITE_INSTRUCTION, vec![image.into(), background.into()], aspect_ratio);
                self.provider.run(&self.composite_model, input).await
            }
        }
    }

    async fn background(
        &self,
        style: BackgroundStyle,
        image: &str,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<String, ProviderError> {
        let model = style.spec().model;
        let input = json!({
            "model": "dev",
            "prompt": prompt,
            "mask": image,
            "aspect_ratio": aspect_ratio,
        });

        self.provider
            .run(model, input)
            .await?
            .first_url()
            .ok_or_else(|| ProviderError::MissingOutput(model.to_string()))
    }
}

fn composite_input(prompt: &str, images: Vec<Value>, aspect_ratio: &str) -> Value {
    json!({
        "prompt": prompt,
        "image_input": images,
        "aspect_ratio": aspect_ratio,
        "output_format": "png",
    })
}
