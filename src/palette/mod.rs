//! Brand palette sampling from a logo or product image.
//!
//! Extraction is cosmetic, so it never fails: a decode error, an unreadable
//! source or a missed deadline all resolve to [`FALLBACK_PALETTE`].

pub mod color;

pub use color::{darken_color, luma, parse_hex, to_hex};

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::studio::EncodedImage;

pub const FALLBACK_PALETTE: [&str; 4] = ["#3B82F6", "#10B981", "#F59E0B", "#EF4444"];

/// Deadline for load + decode + sampling.
pub const PALETTE_DEADLINE: Duration = Duration::from_millis(2000);

/// Upper bound on pixels examined, whatever the image size.
pub const MAX_SAMPLES: usize = 4000;

/// Pixels below this alpha are skipped.
pub const MIN_ALPHA: u8 = 200;

/// Exclusive luma bounds; near-black and near-white are not brand colors.
pub const MIN_LUMA: f64 = 30.0;
pub const MAX_LUMA: f64 = 240.0;

pub const PALETTE_SIZE: usize = 4;

pub fn fallback_palette() -> Vec<String> {
    FALLBACK_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Where the image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// `data:<mime>;base64,...` or bare base64
    DataUrl(String),
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    pub async fn load(self) -> Result<Vec<u8>, String> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::DataUrl(url) => EncodedImage::parse(&url)
                .and_then(|img| img.decode_bytes())
                .map_err(|e| e.to_string()),
            ImageSource::Path(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| format!("Failed to read {:?}: {}", path, e)),
        }
    }
}

/// Extract up to four dominant colors within [`PALETTE_DEADLINE`].
pub async fn extract_palette(source: ImageSource) -> Vec<String> {
    extract_palette_from(source.load(), PALETTE_DEADLINE).await
}

/// Race `load` plus decoding against `deadline`.
///
/// If the deadline wins, the fallback palette is returned immediately; a
/// decode still running on the blocking pool finishes on its own and its
/// result is dropped.
pub async fn extract_palette_from<F>(load: F, deadline: Duration) -> Vec<String>
where
    F: Future<Output = Result<Vec<u8>, String>>,
{
    let work = async {
        let bytes = load.await?;
        tokio::task::spawn_blocking(move || palette_from_bytes(&bytes))
            .await
            .map_err(|e| format!("Palette task panicked: {}", e))?
    };

    match tokio::time::timeout(deadline, work).await {
        Ok(Ok(palette)) => palette,
        Ok(Err(e)) => {
            warn!("Color extraction failed, using fallbacks: {}", e);
            fallback_palette()
        }
        Err(_) => {
            warn!("Color extraction timed out, using fallbacks");
            fallback_palette()
        }
    }
}

/// Decode an encoded image (PNG, JPEG, WebP, ...) and sample it.
pub fn palette_from_bytes(bytes: &[u8]) -> Result<Vec<String>, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Failed to load image: {}", e))?;
    debug!("Sampling palette from {}x{} image", img.width(), img.height());
    let rgba = img.to_rgba8();
    Ok(palette_from_rgba(rgba.as_raw()))
}

/// Sample an RGBA8 buffer.
///
/// The buffer is walked in byte steps of `max(4, len / MAX_SAMPLES)`. Opaque
/// mid-brightness colors are counted and ranked by frequency (ties keep
/// first-seen order), then padded with the fallback palette to four entries.
pub fn palette_from_rgba(data: &[u8]) -> Vec<String> {
    let step = std::cmp::max(4, data.len() / MAX_SAMPLES);

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    let mut i = 0;
    while i + 3 < data.len() {
        let (r, g, b, a) = (data[i], data[i + 1], data[i + 2], data[i + 3]);
        i += step;

        if a < MIN_ALPHA {
            continue;
        }
        let brightness = luma(r, g, b);
        if brightness <= MIN_LUMA || brightness >= MAX_LUMA {
            continue;
        }

        let hex = to_hex(r, g, b);
        match slots.get(&hex) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(hex.clone(), counts.len());
                counts.push((hex, 1));
            }
        }
    }

    if counts.is_empty() {
        return fallback_palette();
    }

    // Stable sort keeps insertion order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(hex, _)| hex)
        .chain(FALLBACK_PALETTE.iter().map(|c| c.to_string()))
        .take(PALETTE_SIZE)
        .collect()
}
