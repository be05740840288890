//! Shared image decode/encode helpers.
//!
//! Decoding runs identically whether bytes came from disk or network, so a
//! decode failure behaves the same on both paths. Both operations are
//! CPU-bound and run on the blocking pool.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;

use crate::domain::errors::{CacheError, CacheResult};

/// Quality factor for the lossy re-encode persisted to disk.
pub const JPEG_QUALITY: u8 = 80;

/// Decodes raw bytes into a shared image.
///
/// # Errors
/// Returns a decode error if the bytes are not a supported image format.
pub async fn decode(bytes: Vec<u8>) -> CacheResult<Arc<image::DynamicImage>> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| CacheError::decode(format!("decode task panicked: {e}")))?
        .map_err(|e| CacheError::decode(e.to_string()))?;
    Ok(Arc::new(decoded))
}

/// Encodes an image as JPEG for disk persistence.
///
/// One-way and lossy: re-reading persisted bytes yields the same dimensions
/// but possibly different pixel data. Alpha is dropped before encoding since
/// JPEG has no alpha channel.
///
/// # Errors
/// Returns an encode error if the JPEG encoder rejects the image.
pub async fn encode_jpeg(image: Arc<image::DynamicImage>) -> CacheResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let rgb = image.to_rgb8();
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CacheError::encode(e.to_string()))?;
        Ok(buf)
    })
    .await
    .map_err(|e| CacheError::encode(format!("encode task panicked: {e}")))?
}
