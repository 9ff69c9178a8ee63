// SPDX-License-Identifier: MPL-2.0
//! Frame and payload types flowing through the capture pipeline.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One raw RGBA frame pulled from a camera stream.
///
/// Pixel data is reference-counted so a frame can be handed to the
/// background encoder without copying the buffer.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl CapturedFrame {
    /// Creates a frame from raw RGBA bytes.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len()` does not equal `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "RGBA data length mismatch"
        );
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

impl PartialEq for CapturedFrame {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Eq for CapturedFrame {}

/// A JPEG payload produced by the compressor, with the dimensions it
/// was encoded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl CompressedImage {
    #[must_use]
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Which way the active camera points.
///
/// Warehouse scanners document goods, so the world-facing camera is the
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

impl FacingMode {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_from_rgba_keeps_dimensions() {
        let frame = CapturedFrame::from_rgba(2, 3, vec![0u8; 24]);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.size_bytes(), 24);
    }

    #[test]
    #[should_panic(expected = "RGBA data length mismatch")]
    fn frame_from_rgba_rejects_wrong_length() {
        let _ = CapturedFrame::from_rgba(2, 2, vec![0u8; 10]);
    }

    #[test]
    fn frame_clone_shares_pixels() {
        let frame = CapturedFrame::from_rgba(1, 1, vec![1, 2, 3, 4]);
        let clone = frame.clone();
        assert_eq!(frame, clone);
        assert_eq!(clone.pixels(), &[1, 2, 3, 4]);
    }

    #[test]
    fn compressed_image_accessors() {
        let image = CompressedImage::new(vec![0xFF, 0xD8, 0xFF], 640, 480);
        assert_eq!(image.width(), 640);
        assert_eq!(image.height(), 480);
        assert_eq!(image.size_bytes(), 3);
        assert_eq!(image.into_bytes(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn facing_mode_defaults_to_environment() {
        assert_eq!(FacingMode::default(), FacingMode::Environment);
    }

    #[test]
    fn facing_mode_flips_both_ways() {
        assert_eq!(FacingMode::Environment.flipped(), FacingMode::User);
        assert_eq!(FacingMode::User.flipped(), FacingMode::Environment);
    }
}
