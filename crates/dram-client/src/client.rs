//! Classifier HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dram_models::ClassificationResult;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::metrics::record_classification;
use crate::types::{ErrorBody, ImageUpload, IMAGE_FIELD};

const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/search";

/// Configuration for the classifier client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Full URL of the classification endpoint
    pub endpoint: String,
    /// Request timeout; `None` lets a request run to completion
    pub timeout: Option<Duration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl ClassifierConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            timeout: std::env::var("CLASSIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| parse_timeout(&raw)),
        }
    }

    /// Check that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ClientError::invalid_config(format!("endpoint {:?}: {}", self.endpoint, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::invalid_config(format!(
                "endpoint scheme must be http or https, got {}",
                other
            ))),
        }
    }
}

/// Whole seconds, greater than zero. Anything else is ignored with a warning.
fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(value = raw, "Ignoring invalid CLASSIFIER_TIMEOUT_SECS");
            None
        }
    }
}

/// Anything that can turn an image into a classification.
///
/// The acquisition flow submits through this seam so tests and alternative
/// transports can stand in for the HTTP client.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Submit one image. Exactly one outbound attempt; no retries.
    async fn classify(&self, upload: ImageUpload) -> ClientResult<ClassificationResult>;
}

/// HTTP client for the classification service.
pub struct ClassifierClient {
    http: Client,
    endpoint: Url,
}

impl ClassifierClient {
    /// Create a new classifier client.
    pub fn new(config: ClassifierConfig) -> ClientResult<Self> {
        let endpoint = config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Network)?;

        Ok(Self { http, endpoint })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClassifierConfig::from_env())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post the image and decode the ranked matches.
    pub async fn classify(&self, upload: ImageUpload) -> ClientResult<ClassificationResult> {
        let started = Instant::now();
        let outcome = self.send(upload).await;

        let label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        record_classification(label, started.elapsed().as_secs_f64());

        outcome
    }

    async fn send(&self, upload: ImageUpload) -> ClientResult<ClassificationResult> {
        debug!(
            endpoint = %self.endpoint,
            bytes = upload.len(),
            "Sending classification request"
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            warn!(status = status.as_u16(), "Classifier rejected request: {}", message);
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        decode_response(&body)
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(&self, upload: ImageUpload) -> ClientResult<ClassificationResult> {
        ClassifierClient::classify(self, upload).await
    }
}

/// Decode a success body into a non-empty result.
pub fn decode_response(body: &[u8]) -> ClientResult<ClassificationResult> {
    let value: serde_json::Value = serde_json::from_slice(body)?;

    if value.as_array().is_some_and(|a| a.is_empty()) {
        return Err(ClientError::EmptyResponse);
    }

    serde_json::from_value(value).map_err(|e| ClientError::invalid_response(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.endpoint, "http://localhost:5000/api/search");
        assert_eq!(config.timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_endpoints() {
        let relative = ClassifierConfig {
            endpoint: "/api/search".into(),
            ..Default::default()
        };
        assert!(matches!(relative.validate(), Err(ClientError::InvalidConfig(_))));

        let ftp = ClassifierConfig {
            endpoint: "ftp://example.com/search".into(),
            ..Default::default()
        };
        assert!(matches!(ftp.validate(), Err(ClientError::InvalidConfig(_))));
        assert!(ClassifierClient::new(ftp).is_err());
    }

    #[test]
    fn test_config_from_env() {
        // the only test in this crate touching these variables
        std::env::set_var("CLASSIFIER_URL", "https://classifier.example.com/api/search");
        std::env::set_var("CLASSIFIER_TIMEOUT_SECS", "30");
        let config = ClassifierConfig::from_env();
        assert_eq!(config.endpoint, "https://classifier.example.com/api/search");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        std::env::set_var("CLASSIFIER_TIMEOUT_SECS", "soon");
        assert_eq!(ClassifierConfig::from_env().timeout, None);

        std::env::remove_var("CLASSIFIER_URL");
        std::env::remove_var("CLASSIFIER_TIMEOUT_SECS");
        let config = ClassifierConfig::from_env();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(" 15 "), Some(Duration::from_secs(15)));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("-3"), None);
        assert_eq!(parse_timeout("1.5"), None);
    }

    #[test]
    fn test_decode_response() {
        let result = decode_response(br#"[{"whiskyName":"Yamazaki 12","score":0.88}]"#).unwrap();
        assert_eq!(result.primary().whisky_name, "Yamazaki 12");

        assert!(matches!(decode_response(b"[]"), Err(ClientError::EmptyResponse)));
        assert!(matches!(decode_response(b"not json"), Err(ClientError::Json(_))));
        assert!(matches!(
            decode_response(br#"[{"score":0.5}]"#),
            Err(ClientError::InvalidResponse(_))
        ));
    }
}
