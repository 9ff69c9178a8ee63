// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.
//!
//! This module defines the various types of events that can be captured
//! during a capture-and-review session for diagnostic purposes.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// User-initiated actions that can be captured for diagnostics.
///
/// These actions represent meaningful user interactions that help
/// understand what the user was doing when issues occurred.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    // ==========================================================================
    // Gallery Navigation
    // ==========================================================================
    /// Open the gallery for a scope.
    OpenGallery,

    /// Navigate to the next photo.
    NavigateNext,

    /// Navigate to the previous photo.
    NavigatePrevious,

    /// Jump directly to a photo (e.g., thumbnail click).
    GoToPhoto {
        /// Requested index before clamping.
        index: usize,
    },

    /// Toggle fullscreen review mode.
    ToggleFullscreen,

    /// Request a download link for the current photo.
    DownloadPhoto,

    /// Close the gallery surface.
    CloseGallery,

    // ==========================================================================
    // Camera Lifecycle
    // ==========================================================================
    /// Open the capture surface.
    OpenCamera,

    /// Switch between the user- and world-facing cameras.
    SwitchCamera,

    /// Capture a frame from the live stream.
    CapturePhoto,

    /// Discard the preview and return to the live stream.
    RetakePhoto,

    /// Accept the previewed photo.
    ConfirmPhoto,

    // ==========================================================================
    // Mutations
    // ==========================================================================
    /// Delete a stored photo.
    DeletePhoto,
}

/// Pipeline operations with performance metrics.
///
/// Durations are wall-clock milliseconds measured around the whole
/// operation, including any remote round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AppOperation {
    /// Fetch the photo list for a scope.
    LoadPhotos {
        duration_ms: u64,
        /// Number of records returned (0 on failure).
        count: usize,
        success: bool,
    },

    /// Persist a confirmed capture.
    SavePhoto {
        duration_ms: u64,
        success: bool,
    },

    /// Delete a stored photo.
    DeletePhoto {
        duration_ms: u64,
        success: bool,
    },

    /// Refresh aggregate photo counters.
    FetchStats {
        duration_ms: u64,
        success: bool,
    },

    /// Encode a raw frame to JPEG.
    CompressImage {
        duration_ms: u64,
        /// Frame dimensions before clamping.
        source_width: u32,
        source_height: u32,
    },
}

/// Categories of warnings that can occur in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// The backing store answered, but a secondary read failed.
    StoreDegraded,
    /// A configuration issue was detected.
    ConfigurationIssue,
    /// Other warning type not covered by specific categories.
    Other,
}

/// Categories of errors that can occur in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Camera acquisition or streaming error.
    CameraError,
    /// Backing store call error.
    StoreError,
    /// JPEG encoding error.
    EncodeError,
    /// Input/output error (file read/write failures).
    IoError,
    /// Other error type not covered by specific categories.
    Other,
}

/// A categorized warning with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// A categorized error with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

/// A diagnostic event with timestamp.
///
/// Each event captures a specific type of activity or failure in the
/// pipeline, along with when it occurred.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    /// Creates a new diagnostic event with a specific timestamp.
    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// User-initiated action.
    /// Captures what the user was doing for diagnostic correlation.
    UserAction {
        /// The specific action performed.
        action: UserAction,
        /// Optional additional details (e.g., photo id, scope).
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    /// Pipeline operation with performance metrics.
    Operation {
        /// The operation and its measurements.
        operation: AppOperation,
    },

    /// Non-critical warning.
    Warning {
        /// The categorized warning.
        event: WarningEvent,
    },

    /// Critical error.
    Error {
        /// The categorized error.
        event: ErrorEvent,
    },
}
