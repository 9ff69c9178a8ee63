// SPDX-License-Identifier: MPL-2.0
//! In-memory proof photo store.
//!
//! Emulates the warehouse backend's photo endpoints for tests and offline
//! hosts: the same scope granularity rules, the same refusal messages and
//! the same download URL shape. One store instance models exactly one
//! backend document, addressed by its context id; every other context is
//! reported as not found.

use crate::application::port::store::{PhotoData, ProofStore, SaveOutcome, StoreError};
use crate::domain::capture::CompressedImage;
use crate::domain::photo::{
    LineDetail, MoveLineId, PhotoId, PhotoRecord, PhotoStats, PickingId, ProofMode, Scope,
    ScopeContextId,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Minimal JPEG payload (start and end markers) for seeded records.
const PLACEHOLDER_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

struct Inner {
    next_id: u64,
    records: Vec<PhotoRecord>,
    mode: ProofMode,
    picking: Option<PickingId>,
    lines: Vec<MoveLineId>,
    line_details: HashMap<MoveLineId, LineDetail>,
    captured_by: Option<String>,
    pending_failures: VecDeque<String>,
    last_saved_line: Option<MoveLineId>,
}

impl Inner {
    fn create_record(&mut self, scope: Scope, image: &CompressedImage) -> PhotoId {
        let id = PhotoId::new(self.next_id);
        self.next_id += 1;
        self.records.push(PhotoRecord {
            id,
            image: Some(image.bytes().to_vec()),
            capture_date: Utc::now(),
            captured_by: self.captured_by.clone(),
            scope,
            line_detail: None,
        });
        id
    }

    fn take_failure(&mut self) -> Result<(), StoreError> {
        match self.pending_failures.pop_front() {
            Some(message) => Err(StoreError::CallFailed(message)),
            None => Ok(()),
        }
    }
}

/// In-memory [`ProofStore`] implementation.
///
/// The store is configured for exactly one proof granularity, the way the
/// backend resolves it from its server-side flag: move-line level stores
/// know their lines and refuse saves against any other line, picking
/// level stores ignore the passed line identifier entirely.
pub struct MemoryProofStore {
    context: ScopeContextId,
    inner: Mutex<Inner>,
}

impl MemoryProofStore {
    /// Creates a store resolving saves at move-line granularity.
    pub fn move_line_level(context: ScopeContextId, lines: &[MoveLineId]) -> Self {
        Self::with_inner(context, ProofMode::MoveLine, None, lines.to_vec())
    }

    /// Creates a store resolving saves at picking granularity.
    pub fn picking_level(context: ScopeContextId, picking: PickingId) -> Self {
        Self::with_inner(context, ProofMode::Picking, Some(picking), Vec::new())
    }

    fn with_inner(
        context: ScopeContextId,
        mode: ProofMode,
        picking: Option<PickingId>,
        lines: Vec<MoveLineId>,
    ) -> Self {
        Self {
            context,
            inner: Mutex::new(Inner {
                next_id: 1,
                records: Vec::new(),
                mode,
                picking,
                lines,
                line_details: HashMap::new(),
                captured_by: Some("Warehouse Operator".to_string()),
                pending_failures: VecDeque::new(),
                last_saved_line: None,
            }),
        }
    }

    /// Inserts a record directly, bypassing the save endpoint.
    pub fn seed_photo(&self, scope: Scope, capture_date: DateTime<Utc>) -> PhotoId {
        let mut inner = self.lock();
        let id = PhotoId::new(inner.next_id);
        inner.next_id += 1;
        let captured_by = inner.captured_by.clone();
        inner.records.push(PhotoRecord {
            id,
            image: Some(PLACEHOLDER_JPEG.to_vec()),
            capture_date,
            captured_by,
            scope,
            line_detail: None,
        });
        id
    }

    /// Registers the line information joined onto records at read time.
    pub fn set_line_detail(&self, line: MoveLineId, detail: LineDetail) {
        self.lock().line_details.insert(line, detail);
    }

    /// Queues a transport failure; each queued failure consumes exactly
    /// one subsequent call.
    pub fn fail_next_call(&self, message: &str) {
        self.lock().pending_failures.push_back(message.to_string());
    }

    /// Returns the line identifier passed to the most recent save call.
    pub fn last_saved_line(&self) -> Option<MoveLineId> {
        self.lock().last_saved_line
    }

    /// Returns the number of stored records.
    pub fn photo_count(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns a snapshot of all stored records.
    pub fn records(&self) -> Vec<PhotoRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The store holds no invariant a panicking test could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_context(&self, context: ScopeContextId) -> Result<(), StoreError> {
        if context == self.context {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

impl ProofStore for MemoryProofStore {
    async fn fetch(&self, scope: Scope) -> Result<Vec<PhotoRecord>, StoreError> {
        let mut inner = self.lock();
        inner.take_failure()?;
        Ok(inner
            .records
            .iter()
            .filter(|record| record.scope == scope)
            .cloned()
            .collect())
    }

    async fn save(
        &self,
        context: ScopeContextId,
        line: MoveLineId,
        image: &CompressedImage,
    ) -> Result<SaveOutcome, StoreError> {
        let mut inner = self.lock();
        inner.take_failure()?;
        self.check_context(context)?;
        inner.last_saved_line = Some(line);

        match inner.mode {
            ProofMode::Picking => {
                let Some(picking) = inner.picking else {
                    return Err(StoreError::CallFailed(
                        "Store has no picking configured".to_string(),
                    ));
                };
                let id = inner.create_record(Scope::Picking(picking), image);
                Ok(SaveOutcome {
                    success: true,
                    message: "Photo saved to picking".to_string(),
                    photo_ids: vec![id],
                    line_count: 0,
                    mode: Some(ProofMode::Picking),
                })
            }
            ProofMode::MoveLine => {
                if !inner.lines.contains(&line) {
                    return Ok(SaveOutcome {
                        success: false,
                        message: "Move line not found".to_string(),
                        photo_ids: Vec::new(),
                        line_count: 0,
                        mode: Some(ProofMode::MoveLine),
                    });
                }
                let id = inner.create_record(Scope::MoveLine(line), image);
                Ok(SaveOutcome {
                    success: true,
                    message: "Photo saved to 1 move line(s)".to_string(),
                    photo_ids: vec![id],
                    line_count: 1,
                    mode: Some(ProofMode::MoveLine),
                })
            }
        }
    }

    async fn delete(&self, context: ScopeContextId, photo: PhotoId) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        inner.take_failure()?;
        self.check_context(context)?;

        let before = inner.records.len();
        inner.records.retain(|record| record.id != photo);
        Ok(inner.records.len() < before)
    }

    async fn photo_data(
        &self,
        context: ScopeContextId,
        line: Option<MoveLineId>,
    ) -> Result<PhotoData, StoreError> {
        let mut inner = self.lock();
        inner.take_failure()?;
        self.check_context(context)?;

        let photos: Vec<PhotoRecord> = inner
            .records
            .iter()
            .filter(|record| match line {
                Some(line) => record.scope == Scope::MoveLine(line),
                None => true,
            })
            .map(|record| PhotoRecord {
                image: None,
                line_detail: record
                    .scope
                    .move_line()
                    .and_then(|line| inner.line_details.get(&line).cloned()),
                ..record.clone()
            })
            .collect();

        let mut lines_seen: Vec<MoveLineId> = inner
            .records
            .iter()
            .filter_map(|record| record.scope.move_line())
            .collect();
        lines_seen.sort_unstable();
        lines_seen.dedup();

        Ok(PhotoData {
            photos,
            mode: inner.mode,
            stats: PhotoStats {
                total_count: inner.records.len(),
                lines_count: inner.lines.len(),
                lines_with_photos: lines_seen.len(),
            },
        })
    }

    fn download_url(&self, photo: PhotoId) -> String {
        format!(
            "/web/content/stock.delivery.proof.image/{}/image?download=true",
            photo.raw()
        )
    }
}
