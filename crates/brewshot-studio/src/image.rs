use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;

/// Uploaded product or reference image, fully buffered
///
/// The bytes are held in memory so the same upload can be sent to the
/// provider any number of times within one request.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: Option<String>,
}

impl ImagePayload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>, filename: Option<&str>) -> Self {
        let filename = filename.filter(|name| !name.is_empty()).map(ToString::to_string);
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| ct.starts_with("image/"))
            .map_or_else(|| guess_content_type(filename.as_deref()).to_string(), ToString::to_string);

        Self {
            bytes: bytes.into(),
            content_type,
            filename,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Inline the image as a `data:` URI the provider accepts in place of a URL
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

fn guess_content_type(filename: Option<&str>) -> &'static str {
    let extension = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
