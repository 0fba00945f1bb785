//! Instruction text sent with every render request.

use super::types::BackgroundSpec;

/// Build the studio re-render instruction for one angle.
///
/// # Arguments
/// * `angle_prompt` - Camera angle description from the angle table
/// * `background` - Requested backdrop
pub fn build_studio_prompt(angle_prompt: &str, background: &BackgroundSpec) -> String {
    format!(
        r#"Professional E-commerce Photography Studio Task:

Action: Re-render the product in this specific angle: {angle}

Background: {background}

Requirements:
- MAINTAIN CONSISTENCY: The product's shape, colors, textures, labels, and overall identity must remain identical to the original image.
- LIGHTING: Use professional studio three-point lighting (softbox style) to highlight the product features.
- QUALITY: High-resolution, sharp focus, professional depth of field.
- CLEANLINESS: Zero clutter. No other objects, hands, or props. Just the product.
- ORIENTATION: Center the product perfectly in the frame.

Output: Generate a high-quality studio-shot version of the product provided."#,
        angle = angle_prompt,
        background = background.instruction(),
    )
}
