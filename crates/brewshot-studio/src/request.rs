use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, multipart::MultipartError},
    http::StatusCode,
};
use brewshot_core::ClientIdentity;

use crate::{
    error::{Result, StudioError},
    image::ImagePayload,
};

/// Extractor for the studio's `multipart/form-data` uploads
///
/// File parts are buffered into [`ImagePayload`]s and every other part is
/// kept as text. The caller identity attached by the client-identification
/// middleware travels along so handlers can attribute results.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub identity: Option<ClientIdentity>,
    fields: HashMap<String, String>,
    files: HashMap<String, ImagePayload>,
}

impl UploadForm {
    /// Raw value of a text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Trimmed text field, or `default` when the field is absent or blank
    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    /// Required image upload
    pub fn image(&self, name: &str) -> Result<&ImagePayload> {
        self.files
            .get(name)
            .filter(|image| !image.is_empty())
            .ok_or_else(|| StudioError::InvalidInput(format!("missing required '{name}' image upload")))
    }

    #[cfg(test)]
    pub(crate) fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_image(mut self, name: &str, image: ImagePayload) -> Self {
        self.files.insert(name.to_string(), image);
        self
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = StudioError;

    async fn from_request(request: http::Request<Body>, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_multipart = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            return Err(StudioError::InvalidInput(
                "Unsupported Content-Type, expected: 'Content-Type: multipart/form-data'".to_string(),
            ));
        }

        let identity = request.extensions().get::<ClientIdentity>().cloned();

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| StudioError::InvalidInput(format!("Failed to parse multipart form: {}", e.body_text())))?;

        let mut form = Self {
            identity,
            ..Self::default()
        };

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let filename = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                tracing::trace!(field = %name, size = bytes.len(), "received upload");

                form.files.insert(
                    name,
                    ImagePayload::new(bytes, content_type.as_deref(), filename.as_deref()),
                );
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: MultipartError) -> StudioError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StudioError::PayloadTooLarge(err.body_text())
    } else {
        StudioError::InvalidInput(format!("Failed to read multipart field: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &'static str) -> http::Request<Body> {
        http::Request::builder()
            .method("POST")
            .uri("/v1/generations")
            .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn splits_text_and_file_parts() {
        let body = "--X\r\n\
Content-Disposition: form-data; name=\"theme\"\r\n\r\n\
bar\r\n\
--X\r\n\
Content-Disposition: form-data; name=\"image\"; filename=\"bottle.jpg\"\r\n\
Content-Type: image/jpeg\r\n\r\n\
abc\r\n\
--X--\r\n";

        let mut req = request(body);
        req.extensions_mut().insert(ClientIdentity::new("alice"));

        let form = UploadForm::from_request(req, &()).await.unwrap();

        assert_eq!(form.text("theme"), Some("bar"));
        assert_eq!(form.text_or("mood", "exciting"), "exciting");
        assert_eq!(form.image("image").unwrap().to_data_uri(), "data:image/jpeg;base64,YWJj");
        assert_eq!(form.identity.unwrap().client_id, "alice");
    }

    #[tokio::test]
    async fn empty_file_part_counts_as_missing() {
        let body = "--X\r\n\
Content-Disposition: form-data; name=\"image\"; filename=\"\"\r\n\
Content-Type: application/octet-stream\r\n\r\n\
\r\n\
--X--\r\n";

        let form = UploadForm::from_request(request(body), &()).await.unwrap();

        assert!(matches!(form.image("image"), Err(StudioError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn rejects_non_multipart_bodies() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/v1/generations")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = UploadForm::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidInput(_)));
    }

    #[test]
    fn blank_text_uses_default() {
        let form = UploadForm::default().with_text("product_type", "  ");
        assert_eq!(form.text_or("product_type", "beer"), "beer");
    }
}
