use serde::Serialize;
use thiserror::Error;

/// Failure of a single render request or of the batch it belongs to.
///
/// Variants carry the raw backend wording unmodified; mapping onto the
/// user-facing taxonomy is done once by [`crate::classifier::classify`].
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error {status}: {message}")]
    Backend {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    #[error("No image data returned from studio engine. The model might be blocking the content or failing to render.")]
    NoImageReturned {
        /// Model's explanation, for logs only; never serialized
        #[serde(skip)]
        text: Option<String>,
    },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl StudioError {
    /// Stable machine-readable code, matched by the classifier rule table.
    pub fn code(&self) -> &'static str {
        match self {
            StudioError::ConfigurationMissing(_) => "configuration_missing",
            StudioError::InvalidImage(_) => "invalid_image",
            StudioError::InvalidRequest(_) => "invalid_request",
            StudioError::Network(_) => "network",
            StudioError::Backend { .. } => "backend",
            StudioError::NoImageReturned { .. } => "no_image_returned",
            StudioError::Decode(_) => "decode",
        }
    }
}

impl From<StudioError> for String {
    fn from(err: StudioError) -> Self {
        err.to_string()
    }
}
