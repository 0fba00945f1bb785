//! Value types passed into and out of the render orchestrator.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

use super::prompts::build_studio_prompt;

/// MIME type assumed when an image arrives without a data-URL envelope.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// An image in self-describing form: MIME type plus base64 payload.
///
/// Parses from and formats to `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Result<Self, StudioError> {
        let data = data.into();
        if data.trim().is_empty() {
            return Err(StudioError::InvalidImage("image payload is empty".to_string()));
        }
        Ok(Self {
            mime_type: mime_type.into(),
            data,
        })
    }

    /// Parse a data URL. A bare base64 string is accepted as `image/png`.
    pub fn parse(input: &str) -> Result<Self, StudioError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(StudioError::InvalidImage("image is empty".to_string()));
        }

        if let Some(rest) = input.strip_prefix("data:") {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                StudioError::InvalidImage("data URL has no ',' separator".to_string())
            })?;
            let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
                StudioError::InvalidImage(format!("data URL is not base64 encoded: {}", header))
            })?;
            let mime_type = if mime_type.is_empty() {
                DEFAULT_MIME_TYPE
            } else {
                mime_type
            };
            return Self::new(mime_type, payload);
        }

        Self::new(DEFAULT_MIME_TYPE, input)
    }

    /// Encode raw bytes (e.g. a file read by a host).
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Result<Self, StudioError> {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without envelope.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, StudioError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::InvalidImage(format!("invalid base64 payload: {}", e)))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_url())
    }
}

/// Backdrop requested for every rendered angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// Solid color, `#RRGGBB`.
    Color(String),
    /// Approximated as flat white with contact shadows; the model has no alpha output.
    Transparent,
}

impl BackgroundSpec {
    /// Build a color background, validating the hex form.
    pub fn color(hex: &str) -> Result<Self, StudioError> {
        let hex = hex.trim();
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StudioError::InvalidRequest(format!(
                "background must be a #RRGGBB color, got '{}'",
                hex
            )));
        }
        Ok(BackgroundSpec::Color(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// The sentence placed in the prompt's Background line.
    pub fn instruction(&self) -> String {
        match self {
            BackgroundSpec::Transparent => "Place the product on a pure, solid, clean white background (hex #FFFFFF) with no shadows on the background itself, only soft contact shadows under the product.".to_string(),
            BackgroundSpec::Color(hex) => {
                format!("Place the product on a solid background with hex color {}.", hex)
            }
        }
    }
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        BackgroundSpec::Color(super::angles::STUDIO_COLORS[0].value.to_string())
    }
}

/// One generation call: a source image re-rendered at one angle.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: EncodedImage,
    pub angle_prompt: String,
    pub background: BackgroundSpec,
}

impl RenderRequest {
    /// Full natural-language instruction sent alongside the image.
    pub fn instruction(&self) -> String {
        build_studio_prompt(&self.angle_prompt, &self.background)
    }
}

/// A rendered angle, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Matches the originating angle descriptor
    pub id: String,
    /// Data URL of the rendered image
    pub image_data: String,
    /// Localized display label
    pub angle_label: String,
    /// Angle prompt echoed for traceability
    pub prompt_text: String,
}

impl RenderResult {
    /// `easySocial-front-hero-shot.png` style name for saving the image.
    pub fn download_file_name(&self) -> String {
        let slug = self
            .angle_label
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("easySocial-{}.png", slug)
    }
}
