use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use brewshot_config::{ProviderConfig, RetryConfig};
use brewshot_telemetry::{KeyValue, metrics};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use super::Provider;
use crate::{
    error::{ProviderError, StudioError},
    output::RawProviderOutput,
};

/// Replicate predictions API client
///
/// Creates a prediction, asks the API to hold the connection open for up to
/// `wait_seconds`, then polls the prediction until it settles.
pub struct ReplicateProvider {
    client: Client,
    api_token: SecretString,
    base_url: String,
    wait_seconds: u64,
    poll_interval: Duration,
    poll_timeout: Duration,
    retry: RetryConfig,
}

impl ReplicateProvider {
    pub fn new(config: &ProviderConfig) -> crate::error::Result<Self> {
        let api_token = config
            .api_token
            .clone()
            .ok_or_else(|| StudioError::Config("provider API token is required".to_string()))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StudioError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            wait_seconds: config.wait_seconds,
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
            retry: config.retry.clone(),
        })
    }

    /// Endpoint and body for creating a prediction
    ///
    /// Pinned `owner/name:version` identifiers go to the version endpoint,
    /// bare `owner/name` identifiers to the model's own endpoint.
    fn prediction_request(&self, model: &str, input: Value) -> (String, Value) {
        match model.split_once(':') {
            Some((_, version)) => (
                format!("{}/predictions", self.base_url),
                json!({ "version": version, "input": input }),
            ),
            None => (
                format!("{}/models/{model}/predictions", self.base_url),
                json!({ "input": input }),
            ),
        }
    }

    async fn create(&self, model: &str, url: &str, body: &Value) -> Result<Prediction, ProviderError> {
        let mut request = self
            .client
            .post(url)
            .bearer_auth(self.api_token.expose_secret())
            .json(body);

        if self.wait_seconds > 0 {
            request = request.header("Prefer", format!("wait={}", self.wait_seconds));
        }

        tracing::debug!(provider = "replicate", model, "creating prediction");

        let response = request.send().await.map_err(transport_error)?;
        decode_prediction(model, response).await
    }

    async fn create_with_retry(&self, model: &str, url: &str, body: &Value) -> Result<Prediction, ProviderError> {
        if !self.retry.enabled {
            return self.create(model, url, body).await;
        }

        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry.initial_interval)
            .with_max_interval(self.retry.max_interval)
            .with_multiplier(self.retry.multiplier)
            .with_max_elapsed_time(None)
            .build();

        let attempts = &AtomicU32::new(0);
        let max_attempts = self.retry.max_attempts;

        backoff::future::retry_notify(
            backoff,
            move || async move {
                let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;

                self.create(model, url, body).await.map_err(|err| {
                    if err.is_safe_to_resend() && attempt < max_attempts {
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            },
            |err: ProviderError, wait: Duration| {
                tracing::warn!(
                    provider = "replicate",
                    model,
                    error = %err,
                    retry_in_ms = wait.as_millis(),
                    "prediction request failed, retrying"
                );
            },
        )
        .await
    }

    /// Poll until the prediction succeeds, fails, or the polling window closes
    async fn settle(&self, model: &str, mut prediction: Prediction) -> Result<Prediction, ProviderError> {
        let started = Instant::now();

        loop {
            match prediction.status.to_ascii_lowercase().as_str() {
                "succeeded" => return Ok(prediction),
                status @ ("failed" | "canceled" | "aborted") => {
                    return Err(ProviderError::PredictionFailed {
                        status: status.to_string(),
                        message: prediction.error_message(),
                    });
                }
                _ => {}
            }

            if started.elapsed() >= self.poll_timeout {
                return Err(ProviderError::PollTimeout(self.poll_timeout.as_secs()));
            }

            let poll_url = prediction
                .poll_url()
                .ok_or_else(|| ProviderError::MalformedResponse("prediction missing poll URL".to_string()))?;

            tokio::time::sleep(self.poll_interval).await;

            tracing::trace!(provider = "replicate", model, id = ?prediction.id, "polling prediction");

            let response = self
                .client
                .get(&poll_url)
                .bearer_auth(self.api_token.expose_secret())
                .send()
                .await
                .map_err(transport_error)?;

            prediction = decode_prediction(model, response).await?;
        }
    }
}

#[async_trait]
impl Provider for ReplicateProvider {
    async fn run(&self, model: &str, input: Value) -> Result<RawProviderOutput, ProviderError> {
        let start = Instant::now();
        let (url, body) = self.prediction_request(model, input);

        let result = match self.create_with_retry(model, &url, &body).await {
            Ok(prediction) => self.settle(model, prediction).await,
            Err(err) => Err(err),
        };

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_duration(
            &metrics::studio().provider_duration,
            start,
            &[KeyValue::new("model", model.to_string()), KeyValue::new("outcome", outcome)],
        );

        match result {
            Ok(prediction) => {
                tracing::debug!(provider = "replicate", model, id = ?prediction.id, "prediction succeeded");
                Ok(RawProviderOutput::from(prediction.output))
            }
            Err(err) => {
                tracing::error!(provider = "replicate", model, error = %err, "prediction failed");
                Err(err)
            }
        }
    }

    fn name(&self) -> &str {
        "replicate"
    }
}

/// Wire format for a Replicate prediction
#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

impl Prediction {
    fn poll_url(&self) -> Option<String> {
        self.urls
            .as_ref()
            .and_then(|urls| urls.get.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }

    fn error_message(&self) -> String {
        match &self.error {
            Value::Null => "no error detail".to_string(),
            Value::String(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    // A connect failure means the request never left this process
    if err.is_connect() {
        ProviderError::Connection(err.to_string())
    } else if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Interrupted(err.to_string())
    }
}

fn status_error(status: StatusCode, model: &str, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body),
        404 => ProviderError::ModelNotFound(model.to_string()),
        400 | 422 => ProviderError::InvalidInput(body),
        429 => ProviderError::RateLimited(body),
        code => ProviderError::Api { status: code, message: body },
    }
}

async fn decode_prediction(model: &str, response: Response) -> Result<Prediction, ProviderError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(provider = "replicate", model, status = %status, "provider API error");
        return Err(status_error(status, model, body));
    }

    response
        .json::<Prediction>()
        .await
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
