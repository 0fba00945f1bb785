use async_trait::async_trait;

use crate::error::StudioError;

use super::types::{EncodedImage, RenderRequest};

/// An image-synthesis service that re-renders one source image per call.
///
/// Implementations return the raw failure for the call; they never
/// classify it.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<EncodedImage, StudioError>;
}
