//! Prompt templates and composition
//!
//! Every template is static text; composition is plain interpolation of
//! the scene parameters so the same form input always yields the same prompt.

use crate::{scene::SceneParameters, variant::GenerationVariant};

/// Appended to every background-compositing prompt so the background model
/// never redraws the customer's product.
pub const BRAND_GUARD: &str = "\n keep the provided bottle exactly as it is, do not alter the bottle. \
Do not alter, redraw, re-create, re-interpret, or modify the bottle, label, logo, text, shape, typography, \
or any branding elements in any way.";

/// Instruction for the compositing model that merges product and background
pub const COMPOSITE_INSTRUCTION: &str =
    "주류 광고 이미지를 제작합니다. 배경 이미지와 제품 이미지를 합성하세요. 제품의 일관성을 유지하세요. ";

/// System prompt for image analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a professional liquor marketing expert and photographer. \
Your task is to analyze the provided image and generate a complete marketing brief and AI image generation prompts";

/// Categorization request for image analysis
///
/// The `Label: value` answer format is what [`crate::analysis::parse_analysis`]
/// reads back.
pub const ANALYSIS_PROMPT: &str = "Analyze this image for a liquor advertisement and categorize it exactly into the options provided below.
Output must be in Korean.

1. Product Type (Choose one): [소주, 맥주, 와인, 위스키, 막걸리, 칵테일]
2. Theme (Choose one): [해변, 바, 집 (홈파티), 포장마차, 고급 식당, 캠핑장]
3. Mood (Choose one): [따듯한, 차가운, 신나는, 세련된, 아련한, 역동적인]
4. Placement (Choose one): [테이블 위, 사람 손, 바에 진열]
5. Recommended Prompt: (Write a detailed prompt to generate a similar image in Korean)

Format your response exactly like this:
Product: [Value]
Theme: [Value]
Mood: [Value]
Placement: [Value]
Prompt: [Value]";

/// Describe the scene in one sentence, shared by the scene and caption prompts
fn scene_sentence(params: &SceneParameters) -> String {
    format!(
        "{mood} 분위기의 {theme} 배경에서, 해당 {product}이(가) {placement}에 놓여 있습니다. {addition}",
        mood = params.mood,
        theme = params.theme,
        product = params.product_type,
        placement = params.placement,
        addition = params.user_addition,
    )
}

/// Scene description handed to the text model for translation and elaboration
pub fn compose_scene_prompt(params: &SceneParameters) -> String {
    format!(
        "Translate the following product marketing scene into natural and realistic English, without listing:\n\
\"입력된 이미지에 있는 바로 그 {product} 제품의 외형(라벨 디자인, 병 모양, 색상 등)을 완벽하게 유지한 채, \
다음 상황에 자연스럽게 배치된 고품질 광고 사진을 만드세요: {scene}\"",
        product = params.product_type,
        scene = scene_sentence(params),
    )
}

/// Request for exactly three line-separated taglines, no preamble
pub fn compose_caption_prompt(params: &SceneParameters) -> String {
    format!(
        "너의 역할은 카피라이터야.\n\
상황을 기반으로, 술 마케팅에 어울리는 간결하고 감각적인 한국어 광고 문구 3가지를 추천해줘.\n\
상황: {scene}\n\
제약 : 서론 없이 문구 3개만 줄바꿈으로 출력.",
        scene = scene_sentence(params),
    )
}

/// Provider-facing prompt for one variant
///
/// Background-compositing variants get their style tag up front and the
/// brand guard at the end; direct variants use the scene prompt unchanged.
pub fn compose_variant_prompt(variant: GenerationVariant, scene_prompt: &str) -> String {
    match variant {
        GenerationVariant::BackgroundComposite(style) => {
            format!("{}, {scene_prompt}{BRAND_GUARD}", style.spec().style_tag)
        }
        GenerationVariant::Direct | GenerationVariant::DirectComposite => scene_prompt.to_string(),
    }
}
