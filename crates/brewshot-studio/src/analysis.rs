use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{ProviderError, Result, StudioError},
    image::ImagePayload,
    prompt::{ANALYSIS_PROMPT, ANALYSIS_SYSTEM_PROMPT},
    server::Studio,
};

/// Scene fields recovered from an analysis answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub product_type: String,
    pub theme: String,
    pub mood: String,
    pub placement: String,
    pub recommended_prompt: String,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            product_type: "beer".to_string(),
            theme: "beach".to_string(),
            mood: "exciting".to_string(),
            placement: "on the table".to_string(),
            recommended_prompt: String::new(),
        }
    }
}

#[derive(Clone, Copy)]
enum Field {
    Product,
    Theme,
    Mood,
    Placement,
    Prompt,
}

/// Checked in this order; the first label found in a line wins
const LABELS: [(&str, Field); 5] = [
    ("Product:", Field::Product),
    ("Theme:", Field::Theme),
    ("Mood:", Field::Mood),
    ("Placement:", Field::Placement),
    ("Prompt:", Field::Prompt),
];

/// Extract labelled fields from free-form analysis text
///
/// A label may appear anywhere in a line; the value is the rest of the line
/// after it. Unlabelled lines are ignored and a later line for the same
/// label overwrites an earlier one. Fields never seen keep their default,
/// which is logged.
pub fn parse_analysis(text: &str) -> AnalysisResult {
    let mut result = AnalysisResult::default();
    let mut seen = [false; LABELS.len()];

    for line in text.lines() {
        let Some((index, value)) = LABELS.iter().enumerate().find_map(|(index, (label, _))| {
            line.find(label)
                .map(|position| (index, line[position + label.len()..].trim()))
        }) else {
            continue;
        };

        let slot = match LABELS[index].1 {
            Field::Product => &mut result.product_type,
            Field::Theme => &mut result.theme,
            Field::Mood => &mut result.mood,
            Field::Placement => &mut result.placement,
            Field::Prompt => &mut result.recommended_prompt,
        };
        *slot = value.to_string();
        seen[index] = true;
    }

    for ((label, _), found) in LABELS.iter().zip(seen) {
        if !found {
            tracing::warn!(label = %label.trim_end_matches(':'), "analysis answer missing field, using default");
        }
    }

    result
}

/// Raw lines and parsed fields of one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_lines: Vec<String>,
    pub parsed: AnalysisResult,
}

impl Studio {
    /// Ask the analysis model to categorize a reference image
    pub async fn analyze(&self, image: &ImagePayload, reasoning_effort: &str, verbosity: &str) -> Result<AnalysisOutcome> {
        if image.is_empty() {
            return Err(StudioError::InvalidInput("uploaded image is empty".to_string()));
        }

        let model = &self.settings.analysis_model;
        let input = json!({
            "prompt": ANALYSIS_PROMPT,
            "image_input": [image.to_data_uri()],
            "system_prompt": ANALYSIS_SYSTEM_PROMPT,
            "reasoning_effort": reasoning_effort,
            "verbosity": verbosity,
        });

        // Keep newlines: the parser reads one "Label: value" pair per line
        let text = self.provider.run(model, input).await?.streamed_text();
        if text.is_empty() {
            return Err(ProviderError::MissingOutput(model.clone()).into());
        }

        tracing::debug!(model = %model, "image analysis complete");

        let analysis_lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(AnalysisOutcome {
            analysis_lines,
            parsed: parse_analysis(&text),
        })
    }
}
