use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brewshot_core::HttpError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudioError>;

/// Failures talking to the generative-media provider
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider could not be reached; nothing was sent
    #[error("connection error: {0}")]
    Connection(String),

    /// The connection failed after the request may have been delivered
    #[error("request interrupted: {0}")]
    Interrupted(String),

    /// The HTTP request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The prediction did not finish within the polling window
    #[error("prediction still running after {0}s")]
    PollTimeout(u64),

    /// Provider rejected the credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider throttled the request
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Unknown model or version
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    /// Provider rejected the prediction input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other non-success status
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Prediction reached a failed or canceled state
    #[error("prediction {status}: {message}")]
    PredictionFailed { status: String, message: String },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Output could not be interpreted as a media URL
    #[error("no usable output from '{0}'")]
    MissingOutput(String),
}

impl ProviderError {
    /// Whether sending the same prediction request again is safe
    ///
    /// Creating a prediction is not idempotent. A timeout or a connection
    /// dropped mid-request may leave a running prediction upstream, so only
    /// failures the provider answered or never saw qualify.
    pub const fn is_safe_to_resend(&self) -> bool {
        match self {
            Self::Connection(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Description safe to show to API callers
    pub fn client_detail(&self) -> String {
        match self {
            Self::Authentication(_) => "provider authentication failed".to_string(),
            other => other.to_string(),
        }
    }
}

/// Studio errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum StudioError {
    /// Missing upload, missing text, or malformed form data
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Upload exceeded the configured body limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Endpoint needs an identified caller
    #[error("Client identification required")]
    MissingIdentity,

    /// Caller is identified but not allowed to do this
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Variant selector outside the known set
    #[error("Unknown generation model '{0}'")]
    UnknownVariant(String),

    /// Single-call flow failed at the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Every unit of a generation batch failed
    #[error(
        "Generation failed: none of {attempts} attempt(s) produced an image{}",
        .last_error.as_deref().map(|e| format!(" (last error: {e})")).unwrap_or_default()
    )]
    GenerationFailed { attempts: u32, last_error: Option<String> },

    /// Record persistence failed
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnknownVariant(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingIdentity => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Provider(ProviderError::Timeout(_) | ProviderError::PollTimeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::Provider(ProviderError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Provider(_) | Self::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidInput(_) | Self::UnknownVariant(_) | Self::PayloadTooLarge(_) => "invalid_request_error",
            Self::MissingIdentity => "authentication_error",
            Self::Forbidden(_) => "permission_error",
            Self::Provider(_) => "api_error",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::Store(_) | Self::Config(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Provider credentials problems are ours, not the caller's
            Self::Provider(ProviderError::Authentication(_)) | Self::Config(_) | Self::Store(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message: self.client_message(),
                r#type: self.error_type().to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
