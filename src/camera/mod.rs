// SPDX-License-Identifier: MPL-2.0
//! Camera capture engine for proof photos.
//!
//! This module drives a [`crate::application::port::camera::CameraDevice`]
//! through the capture lifecycle and compresses frames off the hot path
//! using async Tokio tasks.

mod state;

pub use state::{CameraSession, CameraState};
