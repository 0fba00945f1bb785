//! Operations a host (desktop shell, web bridge, CLI) invokes.

pub mod health;
pub mod palette;
pub mod render;

pub use health::{run_health_check, HealthReport};
pub use palette::{darken, extract_brand_palette, list_studio_colors, PaletteResponse};
pub use render::{
    render_studio_shots, render_with_backend, RenderShotsRequest, RenderShotsResponse,
};
