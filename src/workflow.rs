// SPDX-License-Identifier: MPL-2.0
//! Top-level orchestration of the capture, save and refresh cycle.
//!
//! [`PhotoWorkflow`] owns a [`GalleryController`] and, while the user is
//! taking a photo, a [`CameraSession`]. It resolves the proof scope for
//! saves, reloads the photo set after every accepted save (the backend
//! response can change aggregate counters the host displays), and reports
//! on close whether dependent views need a refresh.

use crate::application::port::camera::{CameraDevice, StreamConstraints};
use crate::application::port::store::ProofStore;
use crate::camera::CameraSession;
use crate::compress::CompressionSettings;
use crate::config::Config;
use crate::diagnostics::{
    AppOperation, DiagnosticsHandle, ErrorType, UserAction, WarningEvent, WarningType,
};
use crate::domain::capture::CompressedImage;
use crate::domain::photo::{MoveLineId, PhotoId, PhotoStats, ProofMode, Scope, ScopeContextId};
use crate::error::Result;
use crate::gallery::{GalleryController, GalleryEvent};
use crate::notify::{Notice, NotifierHandle};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of an async workflow operation, for host rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Photos and statistics were reloaded.
    Refreshed { photo_count: usize },
    /// The reload failed; previous contents are untouched.
    RefreshFailed,
    /// The store accepted the photo and the session was reloaded.
    Saved {
        photo_ids: Vec<PhotoId>,
        line_count: usize,
    },
    /// The store declined the photo or the call failed; nothing changed.
    SaveFailed,
    /// The photo is gone from the store and the session.
    Deleted(PhotoId),
    /// The delete was declined or failed; nothing changed.
    DeleteFailed(PhotoId),
    /// The workflow closed with no changes made.
    Closed,
    /// The workflow closed after at least one accepted save or delete;
    /// the host must refresh summary counts that depend on photos.
    ClosedDirty,
}

/// Orchestrates proof photo capture for one warehouse document.
///
/// The workflow is configured with the backend document (`context`), the
/// proof scope photos are filed under, and the capture settings from
/// [`Config`]. In move-line granularity the scope names the line; in
/// picking granularity the backend ignores the line identifier entirely.
pub struct PhotoWorkflow<S: ProofStore, C: CameraDevice + Clone> {
    /// Store behind all save, delete and read calls.
    store: Arc<S>,

    /// Device handed to each camera session.
    device: C,

    /// Backend document the save and delete calls address.
    context: ScopeContextId,

    /// Proof scope photos are filed under and loaded from.
    scope: Scope,

    /// Acquisition constraints from configuration.
    constraints: StreamConstraints,

    /// Compression settings from configuration.
    compression: CompressionSettings,

    /// Gallery over the photos in scope.
    gallery: GalleryController<S>,

    /// Live capture session while the camera view is open.
    camera: Option<CameraSession<C>>,

    /// Counters for the header badges, refreshed from the store.
    stats: PhotoStats,

    /// Channel for user-facing notices.
    notifier: NotifierHandle,

    /// Channel for diagnostic events.
    diagnostics: DiagnosticsHandle,
}

impl<S: ProofStore, C: CameraDevice + Clone> PhotoWorkflow<S, C> {
    /// Creates a workflow for one document and scope.
    ///
    /// Nothing is loaded until `open()` is called.
    pub fn new(
        store: Arc<S>,
        device: C,
        context: ScopeContextId,
        scope: Scope,
        config: &Config,
        notifier: NotifierHandle,
        diagnostics: DiagnosticsHandle,
    ) -> Self {
        let gallery = GalleryController::new(
            Arc::clone(&store),
            context,
            notifier.clone(),
            diagnostics.clone(),
        );
        Self {
            store,
            device,
            context,
            scope,
            constraints: config.camera,
            compression: config.compression,
            gallery,
            camera: None,
            stats: PhotoStats::default(),
            notifier,
            diagnostics,
        }
    }

    /// Returns the proof scope this workflow files photos under.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the proof granularity derived from the scope.
    pub fn mode(&self) -> ProofMode {
        self.scope.mode()
    }

    /// Returns the last statistics read from the store.
    pub fn stats(&self) -> PhotoStats {
        self.stats
    }

    /// Returns the gallery controller.
    pub fn gallery(&self) -> &GalleryController<S> {
        &self.gallery
    }

    /// Returns the gallery controller for navigation and key handling.
    pub fn gallery_mut(&mut self) -> &mut GalleryController<S> {
        &mut self.gallery
    }

    /// Returns the live camera session, if the camera view is open.
    pub fn camera(&self) -> Option<&CameraSession<C>> {
        self.camera.as_ref()
    }

    /// Returns the live camera session for capture, retake and switching.
    pub fn camera_mut(&mut self) -> Option<&mut CameraSession<C>> {
        self.camera.as_mut()
    }

    /// Opens the gallery: loads the photo set and the statistics.
    pub async fn open(&mut self) -> WorkflowEvent {
        self.diagnostics.log_action(UserAction::OpenGallery);
        self.refresh().await
    }

    /// Reloads the full photo set, then the statistics.
    ///
    /// The statistics read is best-effort: a failure keeps the previous
    /// counters and is recorded as a diagnostic warning rather than a
    /// second user-facing notice on top of the load failure path.
    pub async fn refresh(&mut self) -> WorkflowEvent {
        let loaded = self.gallery.load(Some(self.scope), None).await;
        self.refresh_stats().await;

        match loaded {
            GalleryEvent::Loaded { count } => WorkflowEvent::Refreshed { photo_count: count },
            _ => WorkflowEvent::RefreshFailed,
        }
    }

    /// Opens the camera view and starts the live stream.
    ///
    /// A session left in the error state is reused so `start()` retries
    /// the same acquisition; a closed session is replaced.
    ///
    /// # Errors
    ///
    /// Propagates acquisition faults from [`CameraSession::start`]. The
    /// session stays available for a retry.
    pub async fn open_camera(&mut self) -> Result<()> {
        self.diagnostics.log_action(UserAction::OpenCamera);

        let needs_new = self
            .camera
            .as_ref()
            .is_none_or(|camera| camera.state().is_closed());
        if needs_new {
            self.camera = Some(CameraSession::new(
                self.device.clone(),
                self.constraints,
                self.compression,
                self.notifier.clone(),
                self.diagnostics.clone(),
            ));
        }

        match self.camera.as_mut() {
            Some(camera) => camera.start().await,
            None => Ok(()),
        }
    }

    /// Closes the camera view without keeping anything.
    pub fn cancel_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.close();
        }
    }

    /// Confirms the reviewed photo and saves it to the store.
    ///
    /// Returns `None` when no photo is under review. The camera session
    /// closes on confirmation and the handle is dropped whatever the save
    /// outcome; a failed save loses nothing except the captured image,
    /// and the gallery stays exactly as it was.
    pub async fn confirm_photo(&mut self) -> Option<WorkflowEvent> {
        let image = self.camera.as_mut().and_then(|camera| camera.confirm())?;
        self.camera = None;
        Some(self.save_photo(&image).await)
    }

    /// Deletes a photo through the gallery, then refreshes statistics.
    pub async fn delete_photo(&mut self, id: PhotoId) -> WorkflowEvent {
        match self.gallery.delete(id).await {
            GalleryEvent::Deleted(id) => {
                self.refresh_stats().await;
                WorkflowEvent::Deleted(id)
            }
            _ => WorkflowEvent::DeleteFailed(id),
        }
    }

    /// Closes the workflow, releasing the camera if it is still open.
    ///
    /// Reports [`WorkflowEvent::ClosedDirty`] when the session changed the
    /// photo set at least once, so the host knows to refresh badge counts.
    pub fn close(&mut self) -> WorkflowEvent {
        self.diagnostics.log_action(UserAction::CloseGallery);
        self.cancel_camera();

        if self.gallery.session().is_dirty() {
            WorkflowEvent::ClosedDirty
        } else {
            WorkflowEvent::Closed
        }
    }

    async fn save_photo(&mut self, image: &CompressedImage) -> WorkflowEvent {
        // Picking-granularity backends resolve the scope server-side and
        // ignore the line identifier; the placeholder keeps the call shape
        // uniform.
        let line = self.scope.move_line().unwrap_or(MoveLineId::PLACEHOLDER);

        let started = Instant::now();
        let outcome = self.store.save(self.context, line, image).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) if outcome.success => {
                self.diagnostics.log_operation(AppOperation::SavePhoto {
                    duration_ms,
                    success: true,
                });
                self.notifier.push(
                    Notice::success("notification-photo-saved")
                        .with_arg("detail", outcome.message.clone()),
                );
                self.gallery.mark_dirty();
                // The backend response may alter aggregate statistics, so
                // reload everything instead of splicing the record in.
                let _ = self.refresh().await;
                WorkflowEvent::Saved {
                    photo_ids: outcome.photo_ids,
                    line_count: outcome.line_count,
                }
            }
            Ok(outcome) => {
                self.diagnostics.log_operation(AppOperation::SavePhoto {
                    duration_ms,
                    success: false,
                });
                self.notifier.push(
                    Notice::error("notification-photo-save-failed")
                        .with_arg("detail", outcome.message)
                        .with_error_type(ErrorType::StoreError),
                );
                WorkflowEvent::SaveFailed
            }
            Err(err) => {
                self.diagnostics.log_operation(AppOperation::SavePhoto {
                    duration_ms,
                    success: false,
                });
                self.notifier.push(
                    Notice::error("notification-photo-save-failed")
                        .with_arg("reason", err.to_string())
                        .with_error_type(ErrorType::StoreError),
                );
                WorkflowEvent::SaveFailed
            }
        }
    }

    async fn refresh_stats(&mut self) {
        let started = Instant::now();
        match self
            .store
            .photo_data(self.context, self.scope.move_line())
            .await
        {
            Ok(data) => {
                self.stats = data.stats;
                self.diagnostics.log_operation(AppOperation::FetchStats {
                    duration_ms: started.elapsed().as_millis() as u64,
                    success: true,
                });
            }
            Err(err) => {
                self.diagnostics.log_operation(AppOperation::FetchStats {
                    duration_ms: started.elapsed().as_millis() as u64,
                    success: false,
                });
                self.diagnostics.log_warning(WarningEvent::new(
                    WarningType::StoreDegraded,
                    format!("Statistics refresh failed: {err}"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::camera::CameraStream;
    use crate::diagnostics::DiagnosticsCollector;
    use crate::domain::capture::CapturedFrame;
    use crate::domain::photo::PickingId;
    use crate::error::CameraFault;
    use crate::infrastructure::MemoryProofStore;
    use crate::notify::NotificationQueue;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const CONTEXT: ScopeContextId = ScopeContextId::new(77);
    const LINE: MoveLineId = MoveLineId::new(3);
    const PICKING: PickingId = PickingId::new(12);

    fn dt(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .unwrap()
            .and_utc()
    }

    fn test_frame() -> CapturedFrame {
        let (width, height) = (8u32, 6u32);
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 30) as u8, (y * 40) as u8, 200, 255]);
            }
        }
        CapturedFrame::from_rgba(width, height, pixels)
    }

    struct ReadyStream;

    impl CameraStream for ReadyStream {
        async fn next_frame(&mut self) -> std::result::Result<CapturedFrame, CameraFault> {
            Ok(test_frame())
        }

        fn stop(&mut self) {}
    }

    /// Device that always streams, with optional scripted acquire faults.
    #[derive(Clone, Default)]
    struct ReadyDevice {
        acquire_faults: Arc<Mutex<VecDeque<CameraFault>>>,
    }

    impl ReadyDevice {
        fn fail_next_acquire(&self, fault: CameraFault) {
            self.acquire_faults.lock().unwrap().push_back(fault);
        }
    }

    impl CameraDevice for ReadyDevice {
        type Stream = ReadyStream;

        async fn acquire(
            &self,
            _constraints: &StreamConstraints,
        ) -> std::result::Result<ReadyStream, CameraFault> {
            match self.acquire_faults.lock().unwrap().pop_front() {
                Some(fault) => Err(fault),
                None => Ok(ReadyStream),
            }
        }
    }

    struct Harness {
        store: Arc<MemoryProofStore>,
        device: ReadyDevice,
        queue: NotificationQueue,
        collector: DiagnosticsCollector,
    }

    impl Harness {
        fn move_line_level() -> Self {
            Self::with_store(MemoryProofStore::move_line_level(CONTEXT, &[LINE]))
        }

        fn picking_level() -> Self {
            Self::with_store(MemoryProofStore::picking_level(CONTEXT, PICKING))
        }

        fn with_store(store: MemoryProofStore) -> Self {
            Self {
                store: Arc::new(store),
                device: ReadyDevice::default(),
                queue: NotificationQueue::new(),
                collector: DiagnosticsCollector::new(64),
            }
        }

        fn workflow(&self, scope: Scope) -> PhotoWorkflow<MemoryProofStore, ReadyDevice> {
            PhotoWorkflow::new(
                Arc::clone(&self.store),
                self.device.clone(),
                CONTEXT,
                scope,
                &Config::default(),
                self.queue.handle(),
                self.collector.handle(),
            )
        }

        fn visible_keys(&mut self) -> Vec<String> {
            self.queue.pump();
            self.queue
                .visible()
                .map(|notice| notice.message_key().to_string())
                .collect()
        }
    }

    async fn capture_and_confirm(
        workflow: &mut PhotoWorkflow<MemoryProofStore, ReadyDevice>,
    ) -> WorkflowEvent {
        workflow.open_camera().await.unwrap();
        workflow.camera_mut().unwrap().capture().await.unwrap();
        workflow.confirm_photo().await.unwrap()
    }

    #[tokio::test]
    async fn open_loads_photos_and_stats() {
        let harness = Harness::move_line_level();
        harness
            .store
            .seed_photo(Scope::MoveLine(LINE), dt("2026-03-01 09:00"));
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));

        let event = workflow.open().await;

        assert_eq!(event, WorkflowEvent::Refreshed { photo_count: 1 });
        assert_eq!(workflow.stats().total_count, 1);
        assert_eq!(workflow.stats().lines_with_photos, 1);
        assert_eq!(workflow.mode(), ProofMode::MoveLine);
    }

    #[tokio::test]
    async fn confirm_photo_saves_and_reloads() {
        let mut harness = Harness::move_line_level();
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;

        let event = capture_and_confirm(&mut workflow).await;

        let WorkflowEvent::Saved {
            photo_ids,
            line_count,
        } = event
        else {
            panic!("expected a save, got {event:?}");
        };
        assert_eq!(photo_ids.len(), 1);
        assert_eq!(line_count, 1);
        assert_eq!(workflow.gallery().session().len(), 1);
        assert!(workflow.gallery().session().is_dirty());
        assert_eq!(workflow.stats().total_count, 1);
        assert!(workflow.camera().is_none());
        assert!(harness
            .visible_keys()
            .contains(&"notification-photo-saved".to_string()));
    }

    #[tokio::test]
    async fn declined_save_mutates_nothing() {
        let mut harness = Harness::move_line_level();
        // A line the store does not know about makes the backend refuse.
        let mut workflow = harness.workflow(Scope::MoveLine(MoveLineId::new(999)));
        workflow.open().await;

        let event = capture_and_confirm(&mut workflow).await;

        assert_eq!(event, WorkflowEvent::SaveFailed);
        assert!(workflow.gallery().session().is_empty());
        assert!(!workflow.gallery().session().is_dirty());
        assert_eq!(harness.store.photo_count(), 0);
        assert!(harness
            .visible_keys()
            .contains(&"notification-photo-save-failed".to_string()));
    }

    #[tokio::test]
    async fn failed_save_call_mutates_nothing() {
        let mut harness = Harness::move_line_level();
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;

        workflow.open_camera().await.unwrap();
        workflow.camera_mut().unwrap().capture().await.unwrap();
        harness.store.fail_next_call("backend offline");
        let event = workflow.confirm_photo().await.unwrap();

        assert_eq!(event, WorkflowEvent::SaveFailed);
        assert!(workflow.gallery().session().is_empty());
        assert!(!workflow.gallery().session().is_dirty());
        assert!(harness
            .visible_keys()
            .contains(&"notification-photo-save-failed".to_string()));
    }

    #[tokio::test]
    async fn confirm_photo_without_camera_returns_none() {
        let harness = Harness::move_line_level();
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));

        assert!(workflow.confirm_photo().await.is_none());
    }

    #[tokio::test]
    async fn picking_mode_saves_with_placeholder_line() {
        let harness = Harness::picking_level();
        let mut workflow = harness.workflow(Scope::Picking(PICKING));
        workflow.open().await;

        let event = capture_and_confirm(&mut workflow).await;

        assert!(matches!(event, WorkflowEvent::Saved { line_count: 0, .. }));
        // The line identifier is passed but carries no meaning in
        // picking granularity.
        assert_eq!(
            harness.store.last_saved_line(),
            Some(MoveLineId::PLACEHOLDER)
        );
        assert_eq!(workflow.gallery().session().len(), 1);
        assert_eq!(
            workflow.gallery().session().records()[0].scope,
            Scope::Picking(PICKING)
        );
    }

    #[tokio::test]
    async fn delete_photo_refreshes_stats() {
        let harness = Harness::move_line_level();
        let id = harness
            .store
            .seed_photo(Scope::MoveLine(LINE), dt("2026-03-01 09:00"));
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;
        assert_eq!(workflow.stats().total_count, 1);

        let event = workflow.delete_photo(id).await;

        assert_eq!(event, WorkflowEvent::Deleted(id));
        assert_eq!(workflow.stats().total_count, 0);
        assert_eq!(workflow.stats().lines_with_photos, 0);
    }

    #[tokio::test]
    async fn close_reports_dirty_after_accepted_save() {
        let harness = Harness::move_line_level();
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;

        capture_and_confirm(&mut workflow).await;
        assert_eq!(workflow.close(), WorkflowEvent::ClosedDirty);
    }

    #[tokio::test]
    async fn close_without_changes_is_clean() {
        let harness = Harness::move_line_level();
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;

        assert_eq!(workflow.close(), WorkflowEvent::Closed);
        assert!(workflow.camera().is_none());
    }

    #[tokio::test]
    async fn open_camera_failure_keeps_retryable_session() {
        let harness = Harness::move_line_level();
        harness
            .device
            .fail_next_acquire(CameraFault::PermissionDenied);
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));

        assert!(workflow.open_camera().await.is_err());
        assert!(workflow.camera().unwrap().state().is_error());

        workflow.open_camera().await.unwrap();
        assert!(workflow.camera().unwrap().state().is_streaming());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_photos_and_counters() {
        let harness = Harness::move_line_level();
        harness
            .store
            .seed_photo(Scope::MoveLine(LINE), dt("2026-03-01 09:00"));
        let mut workflow = harness.workflow(Scope::MoveLine(LINE));
        workflow.open().await;
        assert_eq!(workflow.stats().total_count, 1);

        // First failure burns on the fetch, the second on the stats read.
        harness.store.fail_next_call("backend offline");
        harness.store.fail_next_call("backend offline");
        let event = workflow.refresh().await;

        assert_eq!(event, WorkflowEvent::RefreshFailed);
        assert_eq!(workflow.gallery().session().len(), 1);
        assert_eq!(workflow.stats().total_count, 1);
    }
}
