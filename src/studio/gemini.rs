//! Gemini `generateContent` client for image re-rendering.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::{Credential, StudioConfig};
use crate::error::StudioError;

use super::backend::ImageBackend;
use super::types::{EncodedImage, RenderRequest, DEFAULT_MIME_TYPE};

/// Square output; the result grid assumes uniform tiles.
pub const ASPECT_RATIO: &str = "1:1";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Image backend calling Gemini over HTTPS. Built fresh for each batch.
pub struct GeminiImageBackend {
    client: reqwest::Client,
    credential: Credential,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl GeminiImageBackend {
    /// Build a backend with its own HTTP client.
    ///
    /// # Arguments
    /// * `credential` - Validated API key, sent as `x-goog-api-key`
    /// * `model` - Model id, e.g. `gemini-2.5-flash-image`
    /// * `endpoint` - API base URL; a trailing `/` is ignored
    /// * `timeout` - Per-request timeout
    ///
    /// # Returns
    /// * `Ok(GeminiImageBackend)` - Ready to render
    /// * `Err(StudioError::Network)` - If the HTTP client cannot be built
    pub fn new(
        credential: Credential,
        model: &str,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, StudioError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudioError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credential,
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Fails with `ConfigurationMissing` when no usable key is configured,
    /// before any request is made.
    pub fn from_config(config: &StudioConfig) -> Result<Self, StudioError> {
        let credential = config.credential()?;
        Self::new(
            credential,
            &config.model,
            &config.endpoint,
            config.request_timeout(),
        )
    }

    /// `{endpoint}/models/{model}:generateContent`
    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl ImageBackend for GeminiImageBackend {
    async fn render(&self, request: &RenderRequest) -> Result<EncodedImage, StudioError> {
        let body = build_request_body(request);
        debug!(
            "Sending {} request for angle '{}' ({} base64 bytes)",
            self.model,
            request.angle_prompt,
            request.source.data().len()
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.credential.expose())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    format!("Gemini request timed out after {}s", self.timeout.as_secs())
                } else {
                    format!("Gemini request failed: {}", e)
                };
                error!("{}", msg);
                StudioError::Network(msg)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let msg = format!("Failed to read Gemini response body: {}", e);
            error!("{}", msg);
            StudioError::Network(msg)
        })?;

        if !status.is_success() {
            let err = parse_error_body(status.as_u16(), &text);
            error!("Gemini returned {}: {}", status, err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            let msg = format!("Failed to parse Gemini response: {}", e);
            error!("{}", msg);
            StudioError::Decode(msg)
        })?;

        extract_image(parsed)
    }
}

/// Assemble the multimodal request: raw image bytes then the instruction.
pub fn build_request_body(request: &RenderRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: request.source.mime_type().to_string(),
                        data: request.source.data().to_string(),
                    },
                },
                RequestPart::Text {
                    text: request.instruction(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            image_config: ImageConfig {
                aspect_ratio: ASPECT_RATIO.to_string(),
            },
        },
    }
}

/// Pull the first inline image out of the first candidate.
///
/// A successful response without image data means the model declined
/// (often a safety filter); any text it returned is logged only.
///
/// # Returns
/// * `Ok(EncodedImage)` - First inline image, MIME defaulting to `image/png`
/// * `Err(StudioError::NoImageReturned)` - No candidate carried image data
pub fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage, StudioError> {
    let candidate = response.candidates.into_iter().next();
    let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
    let parts = candidate
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let mut text = None;
    for part in parts {
        if let Some(inline) = part.inline_data {
            let mime = if inline.mime_type.is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                inline.mime_type
            };
            return EncodedImage::new(mime, inline.data);
        }
        if text.is_none() {
            text = part.text;
        }
    }

    match &text {
        Some(t) => error!("Model returned text instead of image: {}", t),
        None => error!(
            "Model returned no content parts (finish reason: {})",
            finish_reason.as_deref().unwrap_or("unknown")
        ),
    }
    Err(StudioError::NoImageReturned { text })
}

fn parse_error_body(status: u16, body: &str) -> StudioError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => StudioError::Backend {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {}", status)),
            reason: envelope.error.status,
        },
        Err(_) => {
            let truncated = if body.len() > 1024 {
                let mut end = 1024;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &body[..end])
            } else {
                body.to_string()
            };
            StudioError::Backend {
                status,
                message: truncated,
                reason: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::BackgroundSpec;

    fn request() -> RenderRequest {
        RenderRequest {
            source: EncodedImage::parse("data:image/jpeg;base64,QUJD").unwrap(),
            angle_prompt: "Straight front hero shot.".to_string(),
            background: BackgroundSpec::Transparent,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request_body(&request())).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert!(parts[1]["text"]
            .as_str()
            .unwrap()
            .contains("Straight front hero shot."));
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
    }

    #[test]
    fn test_request_strips_envelope() {
        let body = serde_json::to_string(&build_request_body(&request())).unwrap();
        assert!(!body.contains("data:image/jpeg"));
    }

    #[test]
    fn test_extract_image_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your product"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBOR"}}
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let image = extract_image(response).unwrap();
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBOR");
    }

    #[test]
    fn test_extract_image_text_only_is_no_image() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "I can't help with that."}]}}]
        }))
        .unwrap();

        match extract_image(response) {
            Err(StudioError::NoImageReturned { text }) => {
                assert_eq!(text.as_deref(), Some("I can't help with that."));
            }
            other => panic!("expected NoImageReturned, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_image_blocked_without_content() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(
            extract_image(response),
            Err(StudioError::NoImageReturned { text: None })
        ));
    }

    #[test]
    fn test_extract_image_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_image(response),
            Err(StudioError::NoImageReturned { .. })
        ));
    }

    #[test]
    fn test_parse_error_body_envelope() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED"}}"#;
        match parse_error_body(429, body) {
            StudioError::Backend {
                status,
                message,
                reason,
            } => {
                assert_eq!(status, 429);
                assert!(message.contains("exhausted"));
                assert_eq!(reason.as_deref(), Some("RESOURCE_EXHAUSTED"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_body_plain_text() {
        let err = parse_error_body(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Backend error 502: Bad Gateway");
    }

    #[test]
    fn test_from_config_requires_credential() {
        let config = StudioConfig::default();
        let err = GeminiImageBackend::from_config(&config).err().unwrap();
        assert_eq!(err.code(), "configuration_missing");
    }

    #[test]
    fn test_url() {
        let mut config = StudioConfig::default();
        config.api_key = Some("k".to_string());
        config.endpoint = "http://localhost:9999/v1beta/".to_string();
        let backend = GeminiImageBackend::from_config(&config).unwrap();
        assert_eq!(
            backend.url(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
