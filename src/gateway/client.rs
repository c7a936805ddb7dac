//! Core `InferenceGateway` trait and `ApiGateway` implementation.
//!
//! `ApiGateway` is a uniform call/response wrapper around the remote AI
//! capabilities the pages use: object detection, image classification,
//! speech-to-text, text-to-speech and chat completion.  All connection
//! details come from [`GatewayConfig`]; nothing is hardcoded.  Every call is
//! a network round trip with failure potential — errors surface to the
//! calling page loop, which terminates (no local retry).

use async_trait::async_trait;
use base64::Engine;
use thiserror::Error;

use crate::capture::{AudioClip, CaptureFrame};
use crate::config::GatewayConfig;

use super::types::{Classification, Detection};

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// Errors that can occur during a remote inference call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("inference request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse inference response: {0}")]
    Parse(String),

    /// The service returned a response with no usable content.
    #[error("inference service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// InferenceGateway trait
// ---------------------------------------------------------------------------

/// Async trait over the remote AI services.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (wrapped in `Arc<dyn InferenceGateway>`).
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Detect objects in an encoded image.
    async fn detect_objects(&self, frame: &CaptureFrame) -> Result<Vec<Detection>, GatewayError>;

    /// Classify / answer-about an image, returning up to `top_n` results.
    async fn classify(
        &self,
        frame: &CaptureFrame,
        top_n: usize,
    ) -> Result<Vec<Classification>, GatewayError>;

    /// Transcribe recorded audio to text.
    async fn speech_to_text(&self, audio: &AudioClip) -> Result<String, GatewayError>;

    /// Synthesize speech audio for `text`.
    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>, GatewayError>;

    /// Get a chat completion for `prompt`.
    async fn chat_complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

// Compile-time assertion: Box<dyn InferenceGateway> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn InferenceGateway>) {}
};

// ---------------------------------------------------------------------------
// ApiGateway
// ---------------------------------------------------------------------------

/// Calls the configured remote inference endpoints over HTTP/JSON.
///
/// Image and audio payloads travel as base64 inside JSON bodies; the
/// per-request timeout from [`GatewayConfig::timeout_secs`] applies to every
/// call so a hung service cannot stall a page loop indefinitely.
pub struct ApiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl ApiGateway {
    /// Build an `ApiGateway` from application config.
    ///
    /// A default (no-timeout) client is used as a last-resort fallback if
    /// the builder fails (should never happen in practice).
    pub fn from_config(config: &GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// POST `body` to `path`, attaching the bearer token only when the
    /// configured api key is a non-empty string.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, GatewayError> {
        let url = format!("{}{path}", self.config.base_url);
        let mut req = self.client.post(&url).json(body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        Ok(req.send().await?)
    }

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }
}

#[async_trait]
impl InferenceGateway for ApiGateway {
    async fn detect_objects(&self, frame: &CaptureFrame) -> Result<Vec<Detection>, GatewayError> {
        let body = serde_json::json!({
            "image":     Self::encode(&frame.bytes),
            "width":     frame.width,
            "height":    frame.height,
            "mime_type": frame.mime_type,
        });

        let path = format!("/vision/{}/detections", self.config.detector_name);
        let response = self.post_json(&path, &body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let items = json["detections"]
            .as_array()
            .ok_or(GatewayError::EmptyResponse)?;

        let detections = items
            .iter()
            .map(|d| {
                serde_json::from_value::<Detection>(d.clone())
                    .map_err(|e| GatewayError::Parse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(detections)
    }

    async fn classify(
        &self,
        frame: &CaptureFrame,
        top_n: usize,
    ) -> Result<Vec<Classification>, GatewayError> {
        let body = serde_json::json!({
            "image":     Self::encode(&frame.bytes),
            "width":     frame.width,
            "height":    frame.height,
            "mime_type": frame.mime_type,
            "count":     top_n,
        });

        let path = format!("/vision/{}/classifications", self.config.classifier_name);
        let response = self.post_json(&path, &body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let items = json["classifications"]
            .as_array()
            .ok_or(GatewayError::EmptyResponse)?;

        let classifications = items
            .iter()
            .map(|c| {
                serde_json::from_value::<Classification>(c.clone())
                    .map_err(|e| GatewayError::Parse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(classifications)
    }

    async fn speech_to_text(&self, audio: &AudioClip) -> Result<String, GatewayError> {
        let body = serde_json::json!({
            "audio":  Self::encode(&audio.bytes),
            "format": audio.format.mime_type(),
        });

        let response = self.post_json("/speech/recognize", &body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or(GatewayError::EmptyResponse)?
            .trim()
            .to_string();

        Ok(text)
    }

    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>, GatewayError> {
        let body = serde_json::json!({ "text": text });

        let response = self.post_json("/speech/synthesize", &body).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if bytes.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(bytes.to_vec())
    }

    async fn chat_complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = serde_json::json!({
            "model":    self.config.chat_model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":   false,
        });

        let response = self.post_json("/chat/completions", &body).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let answer = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(GatewayError::EmptyResponse)?
            .trim()
            .to_string();

        if answer.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(answer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
