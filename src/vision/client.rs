//! Vision service client

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::models::Analysis;
use crate::config::VisionConfig;

/// Vision client error types
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("failed to read image: {0}")]
    ImageRead(#[from] std::io::Error),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("upstream status {status}")]
    Upstream { status: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for the image classification endpoint
pub struct VisionClient {
    http: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a new vision client
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VisionError::RequestFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Classify the image stored at `path`.
    ///
    /// Reads the full file into memory and submits it as an
    /// `application/octet-stream` body. A single call: any non-2xx status
    /// or transport failure is an error, with no retry.
    pub async fn analyze(&self, path: &Path) -> Result<Analysis, VisionError> {
        let bytes = tokio::fs::read(path).await?;
        self.analyze_bytes(bytes).await
    }

    /// Classify raw image bytes
    pub async fn analyze_bytes(&self, bytes: Vec<u8>) -> Result<Analysis, VisionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(VisionError::MissingCredential("VISION_API_KEY"))?;

        debug!(
            endpoint = %self.config.endpoint,
            bytes = bytes.len(),
            "submitting image for classification"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("visualFeatures", self.config.visual_features.as_str())])
            .header("Ocp-Apim-Subscription-Key", api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Timeout(e.to_string())
                } else {
                    VisionError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::Upstream {
                status: status.as_u16(),
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        Ok(Analysis::from_value(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(endpoint: String) -> VisionConfig {
        VisionConfig {
            endpoint,
            api_key: Some("test-key".to_string()),
            ..VisionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_parses_tags() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_query(mockito::Matcher::UrlEncoded(
                "visualFeatures".into(),
                "Categories,Description,Tags".into(),
            ))
            .match_header("ocp-apim-subscription-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tags": ["pollution", "river"]}"#)
            .create_async()
            .await;

        let client = VisionClient::new(test_config(format!("{}/analyze", server.url()))).unwrap();
        let analysis = client.analyze_bytes(b"fake image".to_vec()).await.unwrap();

        assert!(analysis.has_tag("pollution"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = VisionClient::new(test_config(format!("{}/analyze", server.url()))).unwrap();
        let result = client.analyze_bytes(b"fake image".to_vec()).await;

        assert!(matches!(
            result,
            Err(VisionError::Upstream { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = VisionClient::new(test_config(format!("{}/analyze", server.url()))).unwrap();
        let result = client.analyze_bytes(b"fake image".to_vec()).await;

        assert!(matches!(result, Err(VisionError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let mut config = VisionConfig::default();
        config.api_key = None;

        let client = VisionClient::new(config).unwrap();
        let result = client.analyze_bytes(b"fake image".to_vec()).await;

        assert!(matches!(
            result,
            Err(VisionError::MissingCredential("VISION_API_KEY"))
        ));
    }
}
