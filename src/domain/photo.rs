// SPDX-License-Identifier: MPL-2.0
//! Photo records, scoping, and per-session gallery bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored delivery-proof photo.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PhotoId(u64);

impl PhotoId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stock move line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoveLineId(u64);

impl MoveLineId {
    /// Line id carried by picking-level saves.
    ///
    /// Stores that persist proof at picking granularity ignore the line
    /// argument entirely; passing this sentinel keeps the save signature
    /// uniform across both proof modes.
    pub const PLACEHOLDER: MoveLineId = MoveLineId(0);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MoveLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stock picking (transfer).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PickingId(u64);

impl PickingId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PickingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the scan context a workflow runs inside (the active
/// barcode reading session on the backend).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScopeContextId(u64);

impl ScopeContextId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a photo (or a gallery view) is attached to.
///
/// Exactly one of the two attachment points is ever set. Move-line proof
/// documents a single picked line; picking proof documents the transfer
/// as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    MoveLine(MoveLineId),
    Picking(PickingId),
}

impl Scope {
    #[must_use]
    pub fn move_line(self) -> Option<MoveLineId> {
        match self {
            Scope::MoveLine(id) => Some(id),
            Scope::Picking(_) => None,
        }
    }

    #[must_use]
    pub fn picking(self) -> Option<PickingId> {
        match self {
            Scope::Picking(id) => Some(id),
            Scope::MoveLine(_) => None,
        }
    }

    #[must_use]
    pub fn mode(self) -> ProofMode {
        match self {
            Scope::MoveLine(_) => ProofMode::MoveLine,
            Scope::Picking(_) => ProofMode::Picking,
        }
    }
}

/// Granularity at which delivery proof is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofMode {
    MoveLine,
    Picking,
}

impl ProofMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProofMode::MoveLine => "move_line",
            ProofMode::Picking => "picking",
        }
    }
}

impl fmt::Display for ProofMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line metadata attached to move-line photos in aggregate reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDetail {
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,
    pub qty_done: f64,
    pub uom: String,
}

/// A stored delivery-proof photo as returned by the backing store.
///
/// `image` holds the JPEG payload when the read path includes binaries;
/// aggregate reads omit it and attach `line_detail` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: PhotoId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    pub capture_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_by: Option<String>,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_detail: Option<LineDetail>,
}

impl PhotoRecord {
    /// Human-readable capture timestamp, e.g. `2026-03-14 09:26:53`.
    #[must_use]
    pub fn capture_label(&self) -> String {
        self.capture_date.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Aggregate counters shown in gallery headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoStats {
    pub total_count: usize,
    pub lines_count: usize,
    pub lines_with_photos: usize,
}

/// Photos currently loaded for one gallery view, plus the bookkeeping
/// the controllers need: which scope the list belongs to, whether a load
/// has finished at least once, and whether the backing data was mutated.
///
/// The dirty flag is sticky. It is set on the first successful mutation
/// and survives reloads, so the host still learns about the change when
/// the session ends.
#[derive(Debug, Clone, Default)]
pub struct GallerySession {
    scope: Option<Scope>,
    records: Vec<PhotoRecord>,
    dirty: bool,
    loaded: bool,
}

impl GallerySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded records wholesale and marks loading finished.
    /// The dirty flag is left untouched.
    pub fn install(&mut self, scope: Option<Scope>, records: Vec<PhotoRecord>) {
        self.scope = scope;
        self.records = records;
        self.loaded = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Removes the record with the given id, if present.
    pub fn remove(&mut self, id: PhotoId) -> Option<PhotoRecord> {
        let index = self.position_of(id)?;
        Some(self.records.remove(index))
    }

    #[must_use]
    pub fn position_of(&self, id: PhotoId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u64, scope: Scope) -> PhotoRecord {
        PhotoRecord {
            id: PhotoId::new(id),
            image: None,
            capture_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            captured_by: Some("Warehouse Operator".to_string()),
            scope,
            line_detail: None,
        }
    }

    #[test]
    fn scope_serializes_with_snake_case_tags() {
        let scope = Scope::MoveLine(MoveLineId::new(42));
        let json = serde_json::to_string(&scope).expect("scope should serialize");
        assert_eq!(json, r#"{"move_line":42}"#);

        let scope = Scope::Picking(PickingId::new(7));
        let json = serde_json::to_string(&scope).expect("scope should serialize");
        assert_eq!(json, r#"{"picking":7}"#);
    }

    #[test]
    fn scope_accessors_return_matching_side_only() {
        let scope = Scope::MoveLine(MoveLineId::new(42));
        assert_eq!(scope.move_line(), Some(MoveLineId::new(42)));
        assert_eq!(scope.picking(), None);
        assert_eq!(scope.mode(), ProofMode::MoveLine);
    }

    #[test]
    fn placeholder_line_id_is_zero() {
        assert_eq!(MoveLineId::PLACEHOLDER.raw(), 0);
    }

    #[test]
    fn capture_label_uses_date_time_format() {
        let record = record(1, Scope::Picking(PickingId::new(3)));
        assert_eq!(record.capture_label(), "2026-03-14 09:26:53");
    }

    #[test]
    fn session_install_marks_loaded_and_replaces_records() {
        let mut session = GallerySession::new();
        assert!(!session.is_loaded());

        let scope = Scope::Picking(PickingId::new(3));
        session.install(Some(scope), vec![record(1, scope), record(2, scope)]);

        assert!(session.is_loaded());
        assert_eq!(session.len(), 2);
        assert_eq!(session.scope(), Some(scope));

        session.install(Some(scope), vec![record(9, scope)]);
        assert_eq!(session.len(), 1);
        assert_eq!(session.position_of(PhotoId::new(9)), Some(0));
    }

    #[test]
    fn session_remove_returns_record_and_shrinks_list() {
        let scope = Scope::Picking(PickingId::new(3));
        let mut session = GallerySession::new();
        session.install(Some(scope), vec![record(1, scope), record(2, scope)]);

        let removed = session.remove(PhotoId::new(1)).expect("record should exist");
        assert_eq!(removed.id, PhotoId::new(1));
        assert_eq!(session.len(), 1);
        assert_eq!(session.position_of(PhotoId::new(2)), Some(0));
    }

    #[test]
    fn session_remove_missing_id_is_none() {
        let scope = Scope::Picking(PickingId::new(3));
        let mut session = GallerySession::new();
        session.install(Some(scope), vec![record(1, scope)]);

        assert!(session.remove(PhotoId::new(99)).is_none());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn dirty_flag_survives_reinstall() {
        let scope = Scope::MoveLine(MoveLineId::new(5));
        let mut session = GallerySession::new();
        session.install(Some(scope), vec![record(1, scope)]);
        session.mark_dirty();

        session.install(Some(scope), vec![]);
        assert!(session.is_dirty());
        assert!(session.is_empty());
    }

    #[test]
    fn stats_default_to_zero() {
        let stats = PhotoStats::default();
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.lines_count, 0);
        assert_eq!(stats.lines_with_photos, 0);
    }
}
