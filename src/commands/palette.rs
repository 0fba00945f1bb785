use serde::Serialize;
use tracing::info;

use crate::palette::{darken_color, extract_palette, ImageSource};
use crate::studio::{StudioColor, STUDIO_COLORS};

/// Hover/pressed shades are this much darker than the base color.
pub const SHADE_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Serialize)]
pub struct PaletteResponse {
    /// Up to four brand colors, most frequent first
    pub colors: Vec<String>,
    /// `colors[i]` darkened by `SHADE_PERCENT`
    pub shades: Vec<String>,
}

/// Sample brand colors from an image within the fixed palette deadline.
/// Never fails.
pub async fn extract_brand_palette(source: ImageSource) -> PaletteResponse {
    let colors = extract_palette(source).await;
    info!("Extracted palette: {}", colors.join(", "));
    let shades = colors
        .iter()
        .map(|c| darken_color(c, SHADE_PERCENT))
        .collect();

    PaletteResponse { colors, shades }
}

pub fn darken(hex: &str, percent: f64) -> String {
    darken_color(hex, percent)
}

pub fn list_studio_colors() -> Vec<StudioColor> {
    STUDIO_COLORS.to_vec()
}
