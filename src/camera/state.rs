// SPDX-License-Identifier: MPL-2.0
//! Capture state machine for the camera session.
//!
//! Manages the lifecycle of proof photo capture with clear state transitions:
//! - Idle: No acquisition yet
//! - Starting: Device acquisition in flight
//! - Streaming: Live frames available, capture armed
//! - Previewing: A compressed photo is held for review
//! - Error: Acquisition failed, retry permitted
//! - Closed: Session torn down, resources released

use crate::application::port::camera::{CameraDevice, CameraStream, StreamConstraints};
use crate::compress::{compress_in_background, CompressionSettings};
use crate::diagnostics::{AppOperation, DiagnosticsHandle, ErrorType, UserAction};
use crate::domain::capture::CompressedImage;
use crate::error::{CameraFault, Error, Result};
use crate::notify::{Notice, NotifierHandle};
use std::time::Instant;

/// Capture state machine.
///
/// This enum represents all possible states of the camera session,
/// ensuring type-safe state transitions via pattern matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraState {
    /// No acquisition yet.
    /// Initial state after construction.
    Idle,

    /// Device acquisition in flight.
    Starting,

    /// Live stream running, capture armed.
    Streaming,

    /// A compressed photo is held for review, stream released.
    Previewing,

    /// Acquisition failed.
    /// Contains the fault for display; retry via `start()` or
    /// `switch_camera()` is always permitted.
    Error { fault: CameraFault },

    /// Session torn down, resources released.
    /// Terminal state.
    Closed,
}

impl CameraState {
    /// Returns true if the live stream is running.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }

    /// Returns true if a captured photo is held for review.
    pub fn is_previewing(&self) -> bool {
        matches!(self, Self::Previewing)
    }

    /// Returns true if the session is in an error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns true if the session has been torn down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the acquisition fault if in error state.
    pub fn fault(&self) -> Option<&CameraFault> {
        match self {
            Self::Error { fault } => Some(fault),
            _ => None,
        }
    }
}

/// Camera session that manages device acquisition and photo capture.
///
/// The session drives a [`CameraDevice`] through the capture lifecycle:
/// acquire a stream, grab a frame, compress it off the hot path, hold the
/// result for review, hand it over on confirmation. The device is an
/// exclusively-held resource; every exit path releases it, including
/// `Drop`.
pub struct CameraSession<C: CameraDevice> {
    /// Device the session acquires streams from.
    device: C,

    /// Live stream while in Streaming state.
    stream: Option<C::Stream>,

    /// Current capture state.
    state: CameraState,

    /// Compressed photo held for review while in Previewing state.
    preview: Option<CompressedImage>,

    /// Constraints passed to the device on every acquisition.
    /// `switch_camera()` flips the facing in place.
    constraints: StreamConstraints,

    /// Compression settings applied to captured frames.
    compression: CompressionSettings,

    /// Channel for user-facing notices.
    notifier: NotifierHandle,

    /// Channel for diagnostic events.
    diagnostics: DiagnosticsHandle,
}

impl<C: CameraDevice> CameraSession<C> {
    /// Creates a new camera session in the Idle state.
    ///
    /// No device access happens until `start()` is called.
    pub fn new(
        device: C,
        constraints: StreamConstraints,
        compression: CompressionSettings,
        notifier: NotifierHandle,
        diagnostics: DiagnosticsHandle,
    ) -> Self {
        Self {
            device,
            stream: None,
            state: CameraState::Idle,
            preview: None,
            constraints,
            compression,
            notifier,
            diagnostics,
        }
    }

    /// Returns the current capture state.
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Returns the photo held for review, if any.
    pub fn preview(&self) -> Option<&CompressedImage> {
        self.preview.as_ref()
    }

    /// Returns the constraints used for acquisition.
    pub fn constraints(&self) -> &StreamConstraints {
        &self.constraints
    }

    /// Starts the live stream.
    ///
    /// State transitions:
    /// - Idle → Starting → Streaming (acquisition succeeded)
    /// - Idle → Starting → Error (acquisition failed)
    /// - Error → Starting → Streaming (retry)
    /// - Any other state → No change (no-op)
    ///
    /// # Errors
    ///
    /// Returns the [`CameraFault`] wrapped in [`Error::Camera`] when
    /// acquisition fails. The fault is also surfaced as an error notice,
    /// and the session stays retryable.
    pub async fn start(&mut self) -> Result<()> {
        if !matches!(self.state, CameraState::Idle | CameraState::Error { .. }) {
            return Ok(());
        }

        self.state = CameraState::Starting;

        match self.device.acquire(&self.constraints).await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = CameraState::Streaming;
                Ok(())
            }
            Err(fault) => {
                self.state = CameraState::Error {
                    fault: fault.clone(),
                };
                self.notifier.push(
                    Notice::error(fault.message_key())
                        .with_arg("reason", fault.to_string())
                        .with_error_type(ErrorType::CameraError),
                );
                Err(Error::Camera(fault))
            }
        }
    }

    /// Captures the current frame and compresses it for review.
    ///
    /// State transitions:
    /// - Streaming → Previewing (frame captured and compressed)
    /// - Streaming → Streaming (capture failed; the user can try again)
    /// - Any other state → No change (no-op)
    ///
    /// The live stream is released once the compressed photo is in hand;
    /// `retake()` re-acquires it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] when the stream stops delivering frames
    /// and [`Error::Encode`] when compression fails. Both are also
    /// surfaced as error notices.
    pub async fn capture(&mut self) -> Result<()> {
        if self.state != CameraState::Streaming {
            return Ok(());
        }
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };

        self.diagnostics.log_action(UserAction::CapturePhoto);

        let frame = match stream.next_frame().await {
            Ok(frame) => frame,
            Err(fault) => {
                self.notifier.push(
                    Notice::error(fault.message_key())
                        .with_arg("reason", fault.to_string())
                        .with_error_type(ErrorType::CameraError),
                );
                return Err(Error::Camera(fault));
            }
        };

        let (source_width, source_height) = (frame.width(), frame.height());
        let started = Instant::now();

        let image = match compress_in_background(frame, self.compression).await {
            Ok(image) => image,
            Err(err) => {
                self.notifier.push(
                    Notice::error("notification-capture-failed")
                        .with_arg("reason", err.to_string())
                        .with_error_type(ErrorType::EncodeError),
                );
                return Err(err);
            }
        };

        self.diagnostics.log_operation(AppOperation::CompressImage {
            duration_ms: started.elapsed().as_millis() as u64,
            source_width,
            source_height,
        });

        // Camera is paused for review, not closed.
        self.release_stream();
        self.preview = Some(image);
        self.state = CameraState::Previewing;
        Ok(())
    }

    /// Discards the reviewed photo and resumes the live stream.
    ///
    /// State transitions:
    /// - Previewing → Starting → Streaming
    /// - Any other state → No change (no-op)
    ///
    /// # Errors
    ///
    /// Same as `start()`: re-acquisition can fail.
    pub async fn retake(&mut self) -> Result<()> {
        if self.state != CameraState::Previewing {
            return Ok(());
        }

        self.diagnostics.log_action(UserAction::RetakePhoto);
        self.preview = None;
        self.state = CameraState::Idle;
        self.start().await
    }

    /// Switches between front and rear cameras.
    ///
    /// State transitions:
    /// - Streaming → Starting → Streaming (other camera acquired)
    /// - Error → Starting → Streaming (retry on the other camera)
    /// - Any other state → No change (no-op)
    ///
    /// The current stream is fully released before re-acquisition; the
    /// device is an exclusively-held resource.
    ///
    /// # Errors
    ///
    /// Same as `start()`: acquisition of the other camera can fail.
    pub async fn switch_camera(&mut self) -> Result<()> {
        if !matches!(
            self.state,
            CameraState::Streaming | CameraState::Error { .. }
        ) {
            return Ok(());
        }

        self.diagnostics.log_action(UserAction::SwitchCamera);
        self.release_stream();
        self.constraints.facing = self.constraints.facing.flipped();
        self.state = CameraState::Idle;
        self.start().await
    }

    /// Hands over the reviewed photo and closes the session.
    ///
    /// State transitions:
    /// - Previewing → Closed (payload returned)
    /// - Any other state → No change (returns `None`)
    pub fn confirm(&mut self) -> Option<CompressedImage> {
        if self.state != CameraState::Previewing {
            return None;
        }

        self.diagnostics.log_action(UserAction::ConfirmPhoto);
        let image = self.preview.take();
        self.close();
        image
    }

    /// Tears the session down, releasing the device.
    ///
    /// State transitions:
    /// - Any state → Closed
    ///
    /// Idempotent and safe to call at any point, including mid-preview.
    pub fn close(&mut self) {
        self.release_stream();
        self.preview = None;
        self.state = CameraState::Closed;
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl<C: CameraDevice> Drop for CameraSession<C> {
    fn drop(&mut self) {
        self.release_stream();
    }
}
