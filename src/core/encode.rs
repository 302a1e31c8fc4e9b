//! UTF-8 text to URL-fragment-safe Base64.
//!
//! Playground decodes the fragment with `atob` and then reinterprets the
//! bytes as UTF-8, so the wire form is plain standard Base64 (with `=`
//! padding, no line wrapping) over the UTF-8 bytes of the JSON text.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Failure to turn an encoded fragment back into text.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("fragment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded fragment is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode `text` for embedding after `#` in a launch URL. Total over all strings.
pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Inverse of [`encode`].
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// Accept either a bare fragment or a full launch URL and return the fragment part.
pub fn fragment_of(input: &str) -> &str {
    match input.split_once('#') {
        Some((_, frag)) => frag,
        None => input,
    }
}
