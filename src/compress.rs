// SPDX-License-Identifier: MPL-2.0
//! JPEG compression for captured frames.
//!
//! Frames come off the camera at sensor resolution; before upload they
//! are clamped to a bounding box and re-encoded as JPEG. The width limit
//! is applied first, then the height limit is applied to the result, so
//! the output fits both limits while keeping the aspect ratio.

use crate::domain::capture::{CapturedFrame, CompressedImage};
use crate::error::{Error, Result};
use image_rs::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};

/// Widest a stored proof photo is allowed to be, in pixels.
pub const MAX_CAPTURE_WIDTH: u32 = 1280;

/// Tallest a stored proof photo is allowed to be, in pixels.
pub const MAX_CAPTURE_HEIGHT: u32 = 960;

/// JPEG quality on the 1-100 scale used for stored proof photos.
pub const JPEG_QUALITY: u8 = 75;

/// Bounding box and quality the compressor encodes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            max_width: MAX_CAPTURE_WIDTH,
            max_height: MAX_CAPTURE_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Returns `(width, height)` scaled to fit inside the given bounding box,
/// preserving aspect ratio.
///
/// Clamping runs in two passes, width first and then height, with each
/// pass rounding to the nearest pixel. The second pass operates on the
/// rounded result of the first, so outputs match the capture devices
/// this pipeline replaces bit for bit.
#[must_use]
pub fn compressed_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let mut width_f = f64::from(width);
    let mut height_f = f64::from(height);

    if width_f > f64::from(max_width) {
        height_f = (height_f * f64::from(max_width) / width_f).round();
        width_f = f64::from(max_width);
    }
    if height_f > f64::from(max_height) {
        width_f = (width_f * f64::from(max_height) / height_f).round();
        height_f = f64::from(max_height);
    }

    (width_f as u32, height_f as u32)
}

/// Compresses a raw frame into a JPEG payload.
///
/// Frames already inside the bounding box are encoded at their native
/// dimensions without a resample pass.
pub fn compress(frame: &CapturedFrame, settings: &CompressionSettings) -> Result<CompressedImage> {
    let rgba =
        image_rs::RgbaImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
            .ok_or_else(|| {
                Error::Encode("frame buffer does not match its dimensions".to_string())
            })?;
    let mut image = DynamicImage::ImageRgba8(rgba);

    let (target_width, target_height) = compressed_dimensions(
        frame.width(),
        frame.height(),
        settings.max_width,
        settings.max_height,
    );
    if (target_width, target_height) != (frame.width(), frame.height()) {
        image = image.resize_exact(
            target_width.max(1),
            target_height.max(1),
            FilterType::Lanczos3,
        );
    }

    // JPEG carries no alpha channel
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, settings.jpeg_quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| Error::Encode(e.to_string()))?;

    Ok(CompressedImage::new(bytes, image.width(), image.height()))
}

/// Compresses a frame on the blocking thread pool.
///
/// Encoding a sensor-resolution frame takes long enough to stall an
/// event loop, so interactive callers go through this wrapper.
pub async fn compress_in_background(
    frame: CapturedFrame,
    settings: CompressionSettings,
) -> Result<CompressedImage> {
    tokio::task::spawn_blocking(move || compress(&frame, &settings))
        .await
        .unwrap_or_else(|e| Err(Error::Encode(format!("Encode task failed: {e}"))))
}
