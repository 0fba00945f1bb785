//! Hex color helpers.

/// Returned by `darken_color` for input it cannot parse.
pub const BLACK: &str = "#000000";

/// Uppercase `#RRGGBB`.
pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Parse `#RRGGBB` or `RRGGBB` into channels.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8 & 0xFF) as u8, (value & 0xFF) as u8))
}

/// Rec. 601 luma on a 0-255 scale.
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Darken a color by `percent` (negative lightens).
///
/// Each channel drops by `round(2.55 * percent)` and is clamped to 0..=255.
/// Malformed input yields black.
pub fn darken_color(hex: &str, percent: f64) -> String {
    let Some((r, g, b)) = parse_hex(hex) else {
        return BLACK.to_string();
    };
    // Half-up rounding, so -0.5 goes to 0 rather than -1.
    let amount = (2.55 * percent + 0.5).floor() as i32;
    let shift = |c: u8| (c as i32 - amount).clamp(0, 255) as u8;
    to_hex(shift(r), shift(g), shift(b))
}
