use serde::Serialize;
use serde_json::json;

use crate::{
    error::{ProviderError, Result, StudioError},
    image::ImagePayload,
    server::Studio,
};

/// Default motion prompt for image-to-video
pub const DEFAULT_VIDEO_PROMPT: &str = "Animate this image";
/// Clip length used when the requested duration is not an integer
pub const DEFAULT_VIDEO_DURATION: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub edited_image_url: String,
    pub prompt: String,
}

/// Parameters for animating a still image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    /// Overrides the configured video model when set
    pub model: Option<String>,
    pub prompt: String,
    pub duration: u32,
    pub aspect_ratio: String,
    pub resolution: String,
    pub generate_audio: bool,
}

impl Default for VideoRequest {
    fn default() -> Self {
        Self {
            model: None,
            prompt: DEFAULT_VIDEO_PROMPT.to_string(),
            duration: DEFAULT_VIDEO_DURATION,
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            generate_audio: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoOutcome {
    pub video_url: String,
}

/// Interpret a form-supplied clip length, falling back to the default
pub fn parse_video_duration(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(DEFAULT_VIDEO_DURATION)
}

impl Studio {
    /// Edit an image according to a free-text instruction
    pub async fn edit(&self, image: &ImagePayload, prompt: &str) -> Result<EditOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StudioError::InvalidInput("edit prompt is required".to_string()));
        }
        if image.is_empty() {
            return Err(StudioError::InvalidInput("uploaded image is empty".to_string()));
        }

        let model = &self.settings.edit_model;
        let input = json!({
            "image_input": [image.to_data_uri()],
            "prompt": prompt,
        });

        let edited_image_url = self
            .provider
            .run(model, input)
            .await?
            .first_url()
            .ok_or_else(|| ProviderError::MissingOutput(model.clone()))?;

        tracing::debug!(model = %model, url = %edited_image_url, "image edit complete");

        Ok(EditOutcome {
            edited_image_url,
            prompt: prompt.to_string(),
        })
    }

    /// Animate a still image into a short clip
    pub async fn animate(&self, image: &ImagePayload, request: &VideoRequest) -> Result<VideoOutcome> {
        if image.is_empty() {
            return Err(StudioError::InvalidInput("uploaded image is empty".to_string()));
        }

        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(&self.settings.video_model);

        let input = json!({
            "image": image.to_data_uri(),
            "prompt": request.prompt,
            "aspect_ratio": request.aspect_ratio,
            "duration": request.duration,
            "resolution": request.resolution,
            "generate_audio": request.generate_audio,
        });

        let video_url = self
            .provider
            .run(model, input)
            .await?
            .first_url()
            .ok_or_else(|| ProviderError::MissingOutput(model.to_string()))?;

        tracing::debug!(model = %model, url = %video_url, "video generation complete");

        Ok(VideoOutcome { video_url })
    }
}
