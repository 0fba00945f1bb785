//! Host command for rendering studio shots.
//!
//! This is the single place render failures are classified:
//! 1. Reads configuration (and the credential) fresh for the call
//! 2. Builds a backend and picks the single or dual angle set
//! 3. Runs the batch, mapping any failure through `classify` once

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::{classify, ClassifiedError, RawFailure};
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::studio::{
    AngleSet, BackgroundSpec, EncodedImage, GeminiImageBackend, ImageBackend, Language,
    RenderResult, StudioRenderer,
};

/// Request payload from the host UI.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderShotsRequest {
    /// Front photo as a data URL (required)
    pub front_image: String,
    /// Back photo as a data URL; switches to the dual angle set
    #[serde(default)]
    pub back_image: Option<String>,
    /// Backdrop color `#RRGGBB`, defaults to the first studio preset
    #[serde(default)]
    pub background_color: Option<String>,
    /// Pure white backdrop with contact shadows; overrides `background_color`
    #[serde(default)]
    pub transparent: bool,
    /// Label language, defaults to the configured one
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderShotsResponse {
    /// One entry per angle, in angle-table order
    pub images: Vec<RenderResult>,
    /// Suggested file name per image, same order
    pub download_names: Vec<String>,
}

/// Render four studio shots with the Gemini backend.
pub async fn render_studio_shots(
    config_path: Option<&Path>,
    request: RenderShotsRequest,
) -> Result<RenderShotsResponse, ClassifiedError> {
    info!("Starting studio render");

    let config = StudioConfig::load(config_path)
        .map_err(|e| classify_failure(&StudioError::ConfigurationMissing(format!("{:#}", e))))?;
    let backend = GeminiImageBackend::from_config(&config).map_err(|e| classify_failure(&e))?;
    let language = request.language.unwrap_or(config.language);

    render_with_backend(backend, language, request).await
}

/// Same as [`render_studio_shots`] over any backend.
pub async fn render_with_backend<B: ImageBackend>(
    backend: B,
    language: Language,
    request: RenderShotsRequest,
) -> Result<RenderShotsResponse, ClassifiedError> {
    let images = run_batch(backend, language, &request)
        .await
        .map_err(|e| classify_failure(&e))?;

    let download_names = images.iter().map(|r| r.download_file_name()).collect();
    Ok(RenderShotsResponse {
        images,
        download_names,
    })
}

async fn run_batch<B: ImageBackend>(
    backend: B,
    language: Language,
    request: &RenderShotsRequest,
) -> Result<Vec<RenderResult>, StudioError> {
    let front = EncodedImage::parse(&request.front_image)?;
    let back = match request.back_image.as_deref() {
        Some(b) if !b.trim().is_empty() => Some(EncodedImage::parse(b)?),
        _ => None,
    };

    let background = if request.transparent {
        BackgroundSpec::Transparent
    } else {
        match request.background_color.as_deref() {
            Some(hex) => BackgroundSpec::color(hex)?,
            None => BackgroundSpec::default(),
        }
    };

    let angles = AngleSet::for_inputs(back.is_some()).descriptors();
    StudioRenderer::new(backend)
        .with_language(language)
        .render_angles(&front, back.as_ref(), angles, &background)
        .await
}

fn classify_failure(err: &StudioError) -> ClassifiedError {
    let classified = classify(&RawFailure::from(err));
    warn!("Render failed ({:?}): {}", classified.kind, err);
    classified
}
