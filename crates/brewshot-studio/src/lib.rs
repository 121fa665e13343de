#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod analysis;
mod dispatch;
mod error;
mod generation;
mod image;
mod media;
mod output;
mod prompt;
mod provider;
mod request;
mod scene;
mod server;
mod store;
#[cfg(test)]
mod test_support;
mod variant;

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, post},
};
use brewshot_core::ClientIdentity;
use serde::Serialize;

pub use analysis::{AnalysisOutcome, AnalysisResult, parse_analysis};
pub use dispatch::Dispatcher;
pub use error::{ProviderError, Result, StudioError};
pub use generation::GenerationOutcome;
pub use image::ImagePayload;
pub use media::{EditOutcome, VideoOutcome, VideoRequest, parse_video_duration};
pub use output::{RawProviderOutput, looks_like_url};
pub use prompt::{BRAND_GUARD, COMPOSITE_INSTRUCTION, compose_caption_prompt, compose_scene_prompt, compose_variant_prompt};
pub use provider::{Provider, ReplicateProvider};
pub use request::UploadForm;
pub use scene::{MAX_REQUESTED_COUNT, MIN_REQUESTED_COUNT, SceneParameters, parse_requested_count};
pub use server::{Studio, StudioBuilder, StudioSettings};
pub use store::{FileStore, GeneratedImageRecord, MemoryStore, RecordStore};
pub use variant::{BackgroundSpec, BackgroundStyle, GenerationVariant};

/// Build the studio from configuration
///
/// # Errors
///
/// Returns an error if the provider client cannot be created
pub fn build_server(config: &brewshot_config::Config) -> anyhow::Result<Arc<Studio>> {
    let studio = Arc::new(
        StudioBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize studio: {e}"))?,
    );
    Ok(studio)
}

/// Create the endpoint router for the studio
///
/// Upload bodies above `max_upload_bytes` are rejected with 413.
pub fn endpoint_router(max_upload_bytes: usize) -> Router<Arc<Studio>> {
    Router::new()
        .route("/v1/generations", post(generate).get(history))
        .route("/v1/users/{owner}/generations", get(user_history))
        .route("/v1/analysis", post(analyze))
        .route("/v1/edits", post(edit))
        .route("/v1/videos", post(animate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Handle marketing image generation requests
async fn generate(State(studio): State<Arc<Studio>>, form: UploadForm) -> Result<Json<GenerationOutcome>> {
    let image = form.image("image")?;
    let variant: GenerationVariant = form
        .text_or("model", GenerationVariant::default().selector())
        .parse()?;
    let params = scene_from_form(&form, &studio.settings().default_aspect_ratio);

    tracing::debug!(
        variant = %variant,
        count = params.requested_count,
        identified = form.identity.is_some(),
        "generation handler called"
    );

    let outcome = studio.generate(form.identity.as_ref(), &params, variant, image).await?;

    tracing::debug!(images = outcome.image_urls.len(), "generation complete");

    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    records: Vec<GeneratedImageRecord>,
}

/// List the images generated for the identified caller
async fn history(
    State(studio): State<Arc<Studio>>,
    identity: Option<Extension<ClientIdentity>>,
) -> Result<Json<HistoryResponse>> {
    let Extension(identity) = identity.ok_or(StudioError::MissingIdentity)?;
    let records = studio.records_for(&identity, &identity.client_id).await?;

    Ok(Json(HistoryResponse { records }))
}

/// List the images another user generated (admin group only)
async fn user_history(
    State(studio): State<Arc<Studio>>,
    Path(owner): Path<String>,
    identity: Option<Extension<ClientIdentity>>,
) -> Result<Json<HistoryResponse>> {
    let Extension(identity) = identity.ok_or(StudioError::MissingIdentity)?;
    let records = studio.records_for(&identity, &owner).await?;

    Ok(Json(HistoryResponse { records }))
}

/// Handle reference image analysis requests
async fn analyze(State(studio): State<Arc<Studio>>, form: UploadForm) -> Result<Json<AnalysisOutcome>> {
    let image = form.image("target_image")?;
    let reasoning_effort = form.text_or("reasoning_effort", "minimal");
    let verbosity = form.text_or("verbosity", "medium");

    let outcome = studio.analyze(image, &reasoning_effort, &verbosity).await?;

    Ok(Json(outcome))
}

/// Handle free-text image edit requests
async fn edit(State(studio): State<Arc<Studio>>, form: UploadForm) -> Result<Json<EditOutcome>> {
    let image = form.image("edit_image")?;
    let prompt = form.text("edit_positive_prompt").unwrap_or_default();

    let outcome = studio.edit(image, prompt).await?;

    Ok(Json(outcome))
}

/// Handle image-to-video requests
async fn animate(State(studio): State<Arc<Studio>>, form: UploadForm) -> Result<Json<VideoOutcome>> {
    let image = form.image("video_image")?;
    let request = video_from_form(&form);

    let outcome = studio.animate(image, &request).await?;

    Ok(Json(outcome))
}

fn scene_from_form(form: &UploadForm, default_aspect_ratio: &str) -> SceneParameters {
    let defaults = SceneParameters::default();

    SceneParameters {
        product_type: form.text_or("product_type", &defaults.product_type),
        theme: form.text_or("theme", &defaults.theme),
        mood: form.text_or("mood", &defaults.mood),
        placement: form.text_or("placement", &defaults.placement),
        user_addition: form.text_or("prompt", ""),
        aspect_ratio: form.text_or("aspect_ratio", default_aspect_ratio),
        requested_count: defaults.requested_count,
    }
    .with_count(form.text("count").unwrap_or_default())
}

fn video_from_form(form: &UploadForm) -> VideoRequest {
    let defaults = VideoRequest::default();

    VideoRequest {
        model: form.text("video_model").map(ToString::to_string),
        prompt: form.text_or("video_positive_prompt", &defaults.prompt),
        duration: form
            .text("video_duration")
            .map_or(defaults.duration, parse_video_duration),
        aspect_ratio: form.text_or("video_ratio", &defaults.aspect_ratio),
        resolution: form.text_or("video_resolution", &defaults.resolution),
        generate_audio: form
            .text("video_generate_audio")
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_defaults_fill_missing_fields() {
        let form = UploadForm::default().with_text("theme", "bar").with_text("count", "15");

        let params = scene_from_form(&form, "1:1");

        assert_eq!(params.product_type, "beer");
        assert_eq!(params.theme, "bar");
        assert_eq!(params.placement, "on the table");
        assert_eq!(params.user_addition, "");
        assert_eq!(params.aspect_ratio, "1:1");
        assert_eq!(params.requested_count, MAX_REQUESTED_COUNT);
    }

    #[test]
    fn missing_count_means_one_image() {
        assert_eq!(scene_from_form(&UploadForm::default(), "16:9").requested_count, 1);
    }

    #[test]
    fn video_form_parsing() {
        let form = UploadForm::default()
            .with_text("video_duration", "soon")
            .with_text("video_generate_audio", "true")
            .with_text("video_ratio", "9:16");

        let request = video_from_form(&form);

        assert_eq!(request.duration, 4);
        assert!(request.generate_audio);
        assert_eq!(request.aspect_ratio, "9:16");
        assert_eq!(request.resolution, "720p");
        assert_eq!(request.prompt, "Animate this image");
        assert_eq!(request.model, None);
    }

    #[test]
    fn audio_flag_only_accepts_true() {
        let form = UploadForm::default().with_text("video_generate_audio", "yes");
        assert!(!video_from_form(&form).generate_audio);
    }

    #[test]
    fn uploaded_image_lookup() {
        let form = UploadForm::default().with_image("image", ImagePayload::new(&b"x"[..], None, None));

        assert!(form.image("image").is_ok());
        assert!(matches!(form.image("edit_image"), Err(StudioError::InvalidInput(_))));
    }
}
