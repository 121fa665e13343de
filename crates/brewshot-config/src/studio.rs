use std::path::PathBuf;

use serde::Deserialize;

/// Model identifiers and behavior of the studio endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    /// Text model used for prompt elaboration and taglines
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Vision-language model used for image analysis
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,
    /// Image-edit model behind the `flux` variant
    #[serde(default = "default_direct_model")]
    pub direct_model: String,
    /// Multi-image compositing model
    #[serde(default = "default_composite_model")]
    pub composite_model: String,
    /// Instruction-based image editing model
    #[serde(default = "default_edit_model")]
    pub edit_model: String,
    /// Image-to-video model used when the request names none
    #[serde(default = "default_video_model")]
    pub video_model: String,
    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,
    /// Elaborate the scene prompt with the text model before dispatch
    #[serde(default = "default_translate_prompt")]
    pub translate_prompt: bool,
    /// Upper bound for multipart request bodies
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Identity group whose members may list any user's records
    #[serde(default)]
    pub admin_group: Option<String>,
    /// Where generated-image records are kept
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            analysis_model: default_analysis_model(),
            direct_model: default_direct_model(),
            composite_model: default_composite_model(),
            edit_model: default_edit_model(),
            video_model: default_video_model(),
            default_aspect_ratio: default_aspect_ratio(),
            translate_prompt: default_translate_prompt(),
            max_upload_bytes: default_max_upload_bytes(),
            admin_group: None,
            store: StoreConfig::default(),
        }
    }
}

/// Generated-image record storage backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local storage, lost on restart
    #[default]
    Memory,
    /// Append-only JSON lines file
    File {
        /// Path of the records file
        path: PathBuf,
    },
}

fn default_text_model() -> String {
    "openai/o4-mini".to_string()
}

fn default_analysis_model() -> String {
    "openai/gpt-5".to_string()
}

fn default_direct_model() -> String {
    "black-forest-labs/flux-kontext-pro".to_string()
}

fn default_composite_model() -> String {
    "google/nano-banana-pro".to_string()
}

fn default_edit_model() -> String {
    "bytedance/seedream-4".to_string()
}

fn default_video_model() -> String {
    "google/veo-3.1".to_string()
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

const fn default_translate_prompt() -> bool {
    true
}

const fn default_max_upload_bytes() -> usize {
    32 << 20
}
