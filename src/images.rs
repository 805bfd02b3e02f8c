//! Profile image resolution.
//!
//! In embedded mode `basic_info.profile_img` holds base64 text of a
//! zlib-compressed JPEG. It is inflated and re-encoded as a `data:` URI.
//! Anything that fails to decode becomes the empty string, which callers
//! treat as "no image". In linked mode the stored URL is used as-is.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::debug;

use vtuber_handbook_core::models::ImageRef;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Displayable image source for `image`, or `""` when there is none.
pub fn image_uri(image: &ImageRef) -> String {
    match image {
        ImageRef::Link(url) => url.clone(),
        ImageRef::Embedded(encoded) => decode_embedded(encoded).unwrap_or_default(),
    }
}

/// Inflate base64 `encoded` into a JPEG data URI.
pub fn decode_embedded(encoded: &str) -> Option<String> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return None;
    }

    let compressed = match STANDARD.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "embedded image is not valid base64");
            return None;
        }
    };

    let inflated = match inflate(&compressed) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => return None,
        Err(e) => {
            debug!(error = %e, "embedded image failed to inflate");
            return None;
        }
    };

    Some(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(inflated)))
}

fn inflate(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    if compressed.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(compressed).read_to_end(&mut out)?;
    } else {
        ZlibDecoder::new(compressed).read_to_end(&mut out)?;
    }
    Ok(out)
}
