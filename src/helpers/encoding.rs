//! URL-safe base64 helpers
//!
//! Standard base64 text is made URL friendly by swapping `+`/`/` for `-`/`_`
//! and dropping the trailing `=` padding. Decoding restores both.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

/// Converts standard base64 text to its URL-safe, unpadded form.
pub fn base64_encode_url(encoded: &str) -> String {
    encoded
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Converts URL-safe base64 text back to standard, padded base64.
///
/// Returns `None` when the length leaves a single dangling character, which
/// no amount of padding turns into valid base64.
pub fn base64_decode_url(encoded: &str) -> Option<String> {
    if encoded.len() % 4 == 1 {
        return None;
    }
    let mut standard: String = encoded
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    Some(standard)
}

/// Encodes raw bytes straight to URL-safe base64.
pub fn bytes_to_base64_url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes URL-safe base64, with or without padding.
pub fn bytes_from_base64_url(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))
}

/// Re-encodes standard base64 as URL-safe base64 after checking it decodes.
pub fn standard_to_url(encoded: &str) -> Result<String, base64::DecodeError> {
    STANDARD.decode(encoded).map(|bytes| bytes_to_base64_url(&bytes))
}
