// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! This module provides infrastructure for capturing diagnostic events
//! during capture-and-review sessions, storing them in a memory-bounded
//! ring buffer, and exporting them as JSON reports for support analysis.
//!
//! # Architecture
//!
//! - [`DiagnosticsHandle`]: Cheap-to-clone sender the controllers log through
//! - [`DiagnosticsCollector`]: Owner of the ring buffer, drained on host ticks
//! - [`DiagnosticEvent`]: Enum representing different types of diagnostic events
//!
//! No event carries photo bytes or record payloads; only ids, counts, and
//! durations leave the process in a report.

mod collector;
mod events;

pub use collector::{DiagnosticsCollector, DiagnosticsHandle, DEFAULT_BUFFER_CAPACITY};
pub use events::{
    AppOperation, DiagnosticEvent, DiagnosticEventKind, ErrorEvent, ErrorType, UserAction,
    WarningEvent, WarningType,
};
