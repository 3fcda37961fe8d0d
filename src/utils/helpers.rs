//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use image::Rgba;

/// Normalize a product name into a catalog filename keyword
///
/// `"Desk Lamp"` becomes `"desk_lamp"`.
pub fn normalize_keyword(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

/// Parse a `#RRGGBB` colour into an opaque pixel
pub fn parse_hex_color(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// Whether the input is written as a selection index (plain ASCII digits)
pub fn looks_like_selection(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Remove a surrounding markdown code fence from a model response
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Guess an image mime type from its file extension
pub fn image_mime_type(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
