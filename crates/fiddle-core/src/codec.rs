//! Compressed URL tokens for inline fiddle source.
//!
//! A token is the raw-deflate compression of the UTF-8 source, encoded with the
//! URL-safe base64 alphabet and no padding, so it can travel as a query
//! parameter (`?zrc=...`) without escaping.
//!
//! ```text
//! text ──► UTF-8 ──► deflate ──► base64url ──► token
//! token ──► base64url⁻¹ ──► inflate ──► UTF-8 check ──► Some(text) | None
//! ```

use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::bufread::DeflateDecoder;
use flate2::write::DeflateEncoder;

/// Upper bound on the size of a decoded source.
pub const MAX_DECODED_LEN: usize = 1024 * 1024;

/// URL-safe alphabet; never pads on encode, accepts either form on decode.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode source text into a URL-safe token.
pub fn encode(text: &str) -> String {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(text.as_bytes())
        .expect("writing to an in-memory buffer cannot fail");
    let compressed = encoder
        .finish()
        .expect("finishing an in-memory buffer cannot fail");
    TOKEN_ENGINE.encode(compressed)
}

/// Decode a token produced by [`encode`].
///
/// Any malformed input yields `None`.
pub fn decode(token: &str) -> Option<String> {
    let compressed = match TOKEN_ENGINE.decode(token.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Rejected source token: invalid base64: {}", e);
            return None;
        }
    };

    let mut bytes = Vec::new();
    let limit = MAX_DECODED_LEN as u64 + 1;
    let mut decoder = DeflateDecoder::new(compressed.as_slice());
    if let Err(e) = (&mut decoder).take(limit).read_to_end(&mut bytes) {
        tracing::debug!("Rejected source token: corrupt deflate stream: {}", e);
        return None;
    }
    if bytes.len() > MAX_DECODED_LEN {
        tracing::debug!(
            "Rejected source token: decoded source exceeds {} bytes",
            MAX_DECODED_LEN
        );
        return None;
    }
    let trailing = decoder.into_inner().len();
    if trailing > 0 {
        tracing::debug!(
            "Rejected source token: {} bytes after end of deflate stream",
            trailing
        );
        return None;
    }

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!("Rejected source token: invalid UTF-8: {}", e);
            None
        }
    }
}
