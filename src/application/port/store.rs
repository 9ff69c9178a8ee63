// SPDX-License-Identifier: MPL-2.0
//! Proof photo store port definition.
//!
//! This module defines the [`ProofStore`] trait the gallery and workflow
//! controllers drive. Infrastructure adapters wrap the warehouse backend's
//! RPC surface behind it; tests use the in-memory implementation from
//! [`crate::infrastructure`].

use crate::domain::capture::CompressedImage;
use crate::domain::photo::{
    MoveLineId, PhotoId, PhotoRecord, PhotoStats, ProofMode, Scope, ScopeContextId,
};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when talking to the proof photo store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The transport failed or the backend raised.
    CallFailed(String),
    /// The addressed context does not exist on the backend.
    NotFound,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallFailed(msg) => write!(f, "Store call failed: {msg}"),
            Self::NotFound => write!(f, "Record not found"),
        }
    }
}

impl std::error::Error for StoreError {}

// =============================================================================
// Data Types
// =============================================================================

/// Outcome of a save call as reported by the backend.
///
/// A transport-level success can still be a business-level refusal, which
/// is why `success` travels inside the outcome instead of the `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Whether the backend accepted the photo.
    pub success: bool,
    /// Backend-provided human-readable detail.
    pub message: String,
    /// Ids of the records created (one per move line the photo was
    /// attached to).
    pub photo_ids: Vec<PhotoId>,
    /// Number of move lines that received the photo. Zero in picking mode.
    pub line_count: usize,
    /// Proof granularity the backend resolved for this save, when reported.
    pub mode: Option<ProofMode>,
}

/// Aggregate read used to refresh header statistics.
///
/// Records arrive without image payloads; the gallery fetches payloads
/// separately through [`ProofStore::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoData {
    /// Records visible in the addressed context, payloads stripped.
    pub photos: Vec<PhotoRecord>,
    /// Proof granularity configured on the backend.
    pub mode: ProofMode,
    /// Counters for the header badges.
    pub stats: PhotoStats,
}

// =============================================================================
// ProofStore Trait
// =============================================================================

/// Port for persisting and querying proof photos.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one store handle can back
/// several controllers. The futures returned by the async methods are
/// driven by the owning controller on one task and are not required to
/// be `Send`.
#[allow(async_fn_in_trait)]
pub trait ProofStore: Send + Sync {
    /// Fetches all photos attached to `scope`, image payloads included,
    /// in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CallFailed`] if the backend is unreachable
    /// or raises.
    async fn fetch(&self, scope: Scope) -> Result<Vec<PhotoRecord>, StoreError>;

    /// Saves a compressed photo against `line` within `context`.
    ///
    /// Backends configured for picking-level proof ignore `line`; callers
    /// without a real line pass [`MoveLineId::PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CallFailed`] on transport failure and
    /// [`StoreError::NotFound`] if `context` does not exist. Business
    /// refusals arrive as `Ok` with [`SaveOutcome::success`] false.
    async fn save(
        &self,
        context: ScopeContextId,
        line: MoveLineId,
        image: &CompressedImage,
    ) -> Result<SaveOutcome, StoreError>;

    /// Deletes one photo within `context`.
    ///
    /// Returns `Ok(false)` when the backend declined the deletion, for
    /// example because the record is already gone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CallFailed`] if the backend is unreachable
    /// or raises.
    async fn delete(&self, context: ScopeContextId, photo: PhotoId) -> Result<bool, StoreError>;

    /// Reads the photo listing and counters for `context`, optionally
    /// narrowed to one move line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CallFailed`] if the backend is unreachable
    /// or raises, [`StoreError::NotFound`] if `context` does not exist.
    async fn photo_data(
        &self,
        context: ScopeContextId,
        line: Option<MoveLineId>,
    ) -> Result<PhotoData, StoreError>;

    /// Builds the download URL for one photo's full-resolution payload.
    fn download_url(&self, photo: PhotoId) -> String;
}
