// Encoded API path codec
//
// The route only accepts a URL-safe base64 encoded API path so that the
// router never decodes `%2F` in namespaced paths (`group%2Fproject`) into `/`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

/// URL-safe alphabet, padding optional on decode and omitted on encode
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum PathError {
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode an encoded path segment into the literal upstream API path
pub fn decode_path(encoded: &str) -> Result<String, PathError> {
    let bytes = URL_SAFE_LENIENT.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

/// Inverse of [`decode_path`], as clients are expected to produce it
pub fn encode_path(path: &str) -> String {
    URL_SAFE_LENIENT.encode(path)
}
