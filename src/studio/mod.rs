//! Multi-angle studio render orchestration.
//!
//! One generation request per angle, all in flight at once. The batch
//! succeeds only when every angle succeeds; otherwise the caller gets a
//! single underlying failure and no partial results.
//!
//! # Example
//!
//! ```ignore
//! use easysocial::studio::{AngleSet, BackgroundSpec, EncodedImage, GeminiImageBackend, StudioRenderer};
//!
//! let backend = GeminiImageBackend::from_config(&config)?;
//! let renderer = StudioRenderer::new(backend);
//! let front = EncodedImage::parse(&front_data_url)?;
//! let results = renderer
//!     .render_angles(&front, None, AngleSet::Single.descriptors(), &BackgroundSpec::Transparent)
//!     .await?;
//! assert_eq!(results.len(), 4);
//! ```

pub mod angles;
pub mod backend;
pub mod gemini;
pub mod prompts;
pub mod types;

pub use angles::{
    AngleDescriptor, AngleLabel, AngleSet, Language, StudioColor, DUAL_IMAGE_ANGLES,
    SINGLE_IMAGE_ANGLES, STUDIO_COLORS,
};
pub use backend::ImageBackend;
pub use gemini::GeminiImageBackend;
pub use types::{BackgroundSpec, EncodedImage, RenderRequest, RenderResult};

use futures::future::join_all;
use tracing::{error, info};

use crate::error::StudioError;

/// Renders a product at a set of angles through an [`ImageBackend`].
pub struct StudioRenderer<B> {
    backend: B,
    language: Language,
}

impl<B: ImageBackend> StudioRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            language: Language::En,
        }
    }

    /// Language used for `RenderResult::angle_label`.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Render every angle concurrently and wait for all of them to settle.
    ///
    /// Angles with `uses_secondary_image` read from `back`; supplying such an
    /// angle without a back image is rejected before any request is issued.
    /// When several requests fail, the first in angle order is reported.
    pub async fn render_angles(
        &self,
        front: &EncodedImage,
        back: Option<&EncodedImage>,
        angles: &[AngleDescriptor],
        background: &BackgroundSpec,
    ) -> Result<Vec<RenderResult>, StudioError> {
        if back.is_none() {
            if let Some(angle) = angles.iter().find(|a| a.uses_secondary_image) {
                return Err(StudioError::InvalidRequest(format!(
                    "angle '{}' needs a back image but none was provided",
                    angle.id
                )));
            }
        }

        info!(
            "Rendering {} angles ({} source image{})",
            angles.len(),
            if back.is_some() { 2 } else { 1 },
            if back.is_some() { "s" } else { "" }
        );

        let renders = angles.iter().map(|angle| {
            let source = match (angle.uses_secondary_image, back) {
                (true, Some(back)) => back,
                _ => front,
            };
            let request = RenderRequest {
                source: source.clone(),
                angle_prompt: angle.prompt_text.to_string(),
                background: background.clone(),
            };
            async move {
                let image = self.backend.render(&request).await?;
                Ok::<_, StudioError>(RenderResult {
                    id: angle.id.to_string(),
                    image_data: image.to_data_url(),
                    angle_label: angle.label.text(self.language).to_string(),
                    prompt_text: request.angle_prompt,
                })
            }
        });

        let settled = join_all(renders).await;

        let failures = settled.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            error!("{} of {} angle renders failed", failures, settled.len());
        }

        let results = settled.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!("Rendered {} angles", results.len());
        Ok(results)
    }
}
