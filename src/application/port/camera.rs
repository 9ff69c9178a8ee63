// SPDX-License-Identifier: MPL-2.0
//! Camera port definition.
//!
//! This module defines the traits the capture session drives. Infrastructure
//! adapters wrap a platform capture backend (V4L2, AVFoundation, a webview
//! bridge) behind [`CameraDevice`] and hand out frames through
//! [`CameraStream`].

use crate::domain::capture::{CapturedFrame, FacingMode};
use crate::error::CameraFault;
use serde::{Deserialize, Serialize};

// =============================================================================
// StreamConstraints
// =============================================================================

/// Requested stream parameters.
///
/// Constraints are advisory: the device picks the closest supported
/// resolution, which is why captured frames carry their own dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConstraints {
    /// Preferred frame width in pixels.
    pub ideal_width: u32,
    /// Preferred frame height in pixels.
    pub ideal_height: u32,
    /// Which camera to prefer on devices that have more than one.
    pub facing: FacingMode,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::default(),
        }
    }
}

// =============================================================================
// CameraDevice Trait
// =============================================================================

/// Port for acquiring a live camera stream.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a device handle can be shared
/// with the session that owns the stream. The futures returned by
/// `acquire` are driven by that session on one task and are not required
/// to be `Send`.
///
/// # Example
///
/// ```ignore
/// let stream = device.acquire(&StreamConstraints::default()).await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait CameraDevice: Send + Sync {
    /// The live stream type produced by this device.
    type Stream: CameraStream;

    /// Acquires a live stream matching `constraints` as closely as the
    /// hardware allows.
    ///
    /// # Errors
    ///
    /// Returns a [`CameraFault`] if permission is refused, no camera is
    /// present, or the device is held by another process.
    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Self::Stream, CameraFault>;
}

// =============================================================================
// CameraStream Trait
// =============================================================================

/// A live camera stream handing out frames.
#[allow(async_fn_in_trait)]
pub trait CameraStream: Send {
    /// Waits for the next frame from the device.
    ///
    /// # Errors
    ///
    /// Returns a [`CameraFault`] if the device disappears or stops
    /// delivering frames mid-stream.
    async fn next_frame(&mut self) -> Result<CapturedFrame, CameraFault>;

    /// Releases the underlying device.
    ///
    /// Synchronous so owners can call it from `Drop`. Must be idempotent;
    /// the session calls it again on teardown paths that already stopped
    /// the stream.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraints_prefer_rear_camera_at_720p() {
        let constraints = StreamConstraints::default();
        assert_eq!(constraints.ideal_width, 1280);
        assert_eq!(constraints.ideal_height, 720);
        assert_eq!(constraints.facing, FacingMode::Environment);
    }

    #[test]
    fn constraints_deserialize_missing_fields_from_defaults() {
        let constraints: StreamConstraints = toml::from_str("ideal_width = 640").unwrap();
        assert_eq!(constraints.ideal_width, 640);
        assert_eq!(constraints.ideal_height, 720);
        assert_eq!(constraints.facing, FacingMode::Environment);
    }
}
