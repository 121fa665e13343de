use serde_json::Value;

/// Provider output decoded once at the provider boundary
///
/// Providers return whatever their model emits: a single URL, a list of
/// URLs, a list of streamed text tokens, or an arbitrary object. Call sites
/// pick the normalization that matches what they expect.
#[derive(Debug, Clone, PartialEq)]
pub enum RawProviderOutput {
    /// Null, empty string, empty list, or empty object
    Empty,
    /// A single string
    Text(String),
    /// A non-empty ordered sequence
    List(Vec<Value>),
    /// Numbers, booleans and non-empty objects; never a string
    Other(Value),
}

impl From<Value> for RawProviderOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(text) if text.is_empty() => Self::Empty,
            Value::String(text) => Self::Text(text),
            Value::Array(items) if items.is_empty() => Self::Empty,
            Value::Array(items) => Self::List(items),
            Value::Object(map) if map.is_empty() => Self::Empty,
            other => Self::Other(other),
        }
    }
}

impl RawProviderOutput {
    /// First-element mode: extract a single media locator
    ///
    /// Lists yield their first element and strings are taken as-is. Any
    /// other shape is only accepted when its string form is an HTTP(S) URL,
    /// which filters out diagnostic objects returned in place of media.
    pub fn first_url(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text.clone()),
            Self::List(items) => items.first().and_then(value_to_string).filter(|s| !s.is_empty()),
            Self::Other(value) => value_to_string(value).filter(|s| looks_like_url(s)),
        }
    }

    /// Concatenation mode: flatten free text onto a single line
    ///
    /// Every element is trimmed, empty elements are dropped, the rest are
    /// joined with a single space and embedded newlines become spaces.
    pub fn joined_text(&self) -> String {
        let joined = match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::List(items) => items
                .iter()
                .filter_map(value_to_string)
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Self::Other(value) => value.to_string(),
        };

        joined.replace('\n', " ").trim().to_string()
    }

    /// Stream mode: reassemble streamed tokens verbatim
    ///
    /// Language models stream their answer as a list of token fragments
    /// whose whitespace is significant, so elements are concatenated without
    /// a separator and line breaks are preserved.
    pub fn streamed_text(&self) -> String {
        match self {
            Self::Empty | Self::Other(_) => String::new(),
            Self::Text(text) => text.trim().to_string(),
            Self::List(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<String>()
                .trim()
                .to_string(),
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Whether a string is an HTTP(S) locator
pub fn looks_like_url(candidate: &str) -> bool {
    candidate.starts_with("https://") || candidate.starts_with("http://")
}
