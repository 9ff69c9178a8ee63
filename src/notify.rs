// SPDX-License-Identifier: MPL-2.0
//! User-facing notice queue.
//!
//! Controllers emit [`Notice`] values through a cheap-to-clone
//! [`NotifierHandle`]; the host owns a [`NotificationQueue`], pumps it on
//! its tick, and renders whatever `visible()` returns. The queue limits
//! the number of visible toasts and manages auto-dismiss timers.

use crate::diagnostics::{DiagnosticsHandle, ErrorEvent, ErrorType, WarningEvent, WarningType};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of notices visible at once.
const MAX_VISIBLE: usize = 3;

/// Channel capacity between controllers and the queue.
const CHANNEL_CAPACITY: usize = 100;

/// Unique identifier for a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

impl NoticeId {
    /// Creates a new unique notice ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (3s duration).
    #[default]
    Success,
    /// Informational message (3s duration).
    Info,
    /// Warning that doesn't block operation (5s duration).
    Warning,
    /// Error requiring attention (manual dismiss).
    Error,
}

impl Severity {
    /// Returns the auto-dismiss duration for this severity.
    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None, // Manual dismiss required
        }
    }
}

/// A notice to be displayed to the user.
///
/// Notices carry an i18n message key plus interpolation arguments; the
/// host resolves them at render time.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Unique identifier for this notice.
    id: NoticeId,
    /// Severity level (determines auto-dismiss behavior).
    severity: Severity,
    /// The i18n key for the notice message.
    message_key: String,
    /// Optional arguments for message interpolation.
    message_args: Vec<(String, String)>,
    /// When this notice was created.
    created_at: Instant,
    /// Custom auto-dismiss duration (overrides severity default).
    custom_dismiss_duration: Option<Duration>,
    /// Diagnostic category when this notice is a warning.
    warning_type: Option<WarningType>,
    /// Diagnostic category when this notice is an error.
    error_type: Option<ErrorType>,
}

impl Notice {
    /// Creates a new notice with the given severity and message key.
    ///
    /// The `message_key` should be a valid i18n key that will be resolved
    /// at render time.
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NoticeId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
            custom_dismiss_duration: None,
            warning_type: None,
            error_type: None,
        }
    }

    /// Creates a success notice.
    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    /// Creates an info notice.
    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    /// Creates a warning notice.
    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    /// Creates an error notice.
    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    ///
    /// Arguments are passed to the i18n system when resolving the message.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Sets a custom auto-dismiss duration, overriding the severity default.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Duration) -> Self {
        self.custom_dismiss_duration = Some(duration);
        self
    }

    /// Sets the diagnostic category for a warning notice.
    #[must_use]
    pub fn with_warning_type(mut self, warning_type: WarningType) -> Self {
        self.warning_type = Some(warning_type);
        self
    }

    /// Sets the diagnostic category for an error notice.
    #[must_use]
    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = Some(error_type);
        self
    }

    /// Returns the notice's unique ID.
    #[must_use]
    pub fn id(&self) -> NoticeId {
        self.id
    }

    /// Returns the severity level.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the i18n message key.
    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Returns the message arguments for interpolation.
    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    /// Returns when this notice was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the age of this notice.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    #[must_use]
    pub fn warning_type(&self) -> Option<WarningType> {
        self.warning_type
    }

    #[must_use]
    pub fn error_type(&self) -> Option<ErrorType> {
        self.error_type
    }

    /// Returns whether this notice should auto-dismiss.
    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        // Custom duration takes precedence over severity default
        let duration = self
            .custom_dismiss_duration
            .or_else(|| self.severity.auto_dismiss_duration());

        if let Some(d) = duration {
            self.age() >= d
        } else {
            false
        }
    }
}

/// Handle for emitting notices from controllers.
///
/// Cheap to clone. Sending never blocks; if the queue owner stops
/// pumping, notices are dropped rather than stalling a controller.
#[derive(Clone, Debug)]
pub struct NotifierHandle {
    notice_tx: Sender<Notice>,
}

impl NotifierHandle {
    /// Sends a notice to the owning queue.
    ///
    /// This method is non-blocking and will drop the notice if the
    /// internal channel is full.
    pub fn push(&self, notice: Notice) {
        let _ = self.notice_tx.try_send(notice);
    }
}

/// Manages the notice queue and visible notices.
///
/// Warnings and errors are forwarded to diagnostics when a handle is
/// set, so every user-visible failure also appears in activity reports.
#[derive(Debug)]
pub struct NotificationQueue {
    /// Currently visible notices (newest first).
    visible: VecDeque<Notice>,
    /// Queued notices waiting to be displayed.
    queue: VecDeque<Notice>,
    /// Receiver for notices emitted through handles.
    notice_rx: Receiver<Notice>,
    /// Sender stored to create handles.
    notice_tx: Sender<Notice>,
    /// Optional diagnostics handle for logging warnings/errors.
    diagnostics: Option<DiagnosticsHandle>,
}

impl NotificationQueue {
    /// Creates a new empty notification queue.
    #[must_use]
    pub fn new() -> Self {
        let (notice_tx, notice_rx) = bounded(CHANNEL_CAPACITY);
        Self {
            visible: VecDeque::new(),
            queue: VecDeque::new(),
            notice_rx,
            notice_tx,
            diagnostics: None,
        }
    }

    /// Creates a handle for emitting notices into this queue.
    #[must_use]
    pub fn handle(&self) -> NotifierHandle {
        NotifierHandle {
            notice_tx: self.notice_tx.clone(),
        }
    }

    /// Sets the diagnostics handle for logging warnings and errors.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Drains notices emitted through handles since the last pump.
    ///
    /// Call this on each host tick, before `tick()`.
    pub fn pump(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.push(notice);
        }
    }

    /// Pushes a new notice to be displayed.
    ///
    /// If fewer than `MAX_VISIBLE` notices are showing, it's displayed
    /// immediately. Otherwise, it's added to the queue and shown when
    /// space becomes available.
    ///
    /// Warnings and errors are automatically logged to the diagnostics
    /// system. Notice sites should use `with_warning_type()` or
    /// `with_error_type()` to set an explicit diagnostic type; if not
    /// set, `Other` is used as fallback.
    pub fn push(&mut self, notice: Notice) {
        // Log warnings and errors to diagnostics
        if let Some(handle) = &self.diagnostics {
            match notice.severity() {
                Severity::Warning => {
                    let warning_type = notice.warning_type().unwrap_or(WarningType::Other);
                    handle.log_warning(WarningEvent::new(warning_type, notice.message_key()));
                }
                Severity::Error => {
                    let error_type = notice.error_type().unwrap_or(ErrorType::Other);
                    handle.log_error(ErrorEvent::new(error_type, notice.message_key()));
                }
                Severity::Success | Severity::Info => {
                    // Success and Info notices are not logged as diagnostic events
                }
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notice);
        } else {
            self.queue.push_back(notice);
        }
    }

    /// Dismisses a notice by its ID.
    ///
    /// Returns `true` if the notice was found and removed.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        // Try to remove from visible
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }

        // Try to remove from queue
        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }

        false
    }

    /// Processes a tick event, dismissing any notices that have expired.
    ///
    /// Should be called periodically (e.g., every 100-500ms) to handle
    /// auto-dismiss.
    pub fn tick(&mut self) {
        // Collect IDs of notices to dismiss
        let to_dismiss: Vec<NoticeId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss())
            .map(Notice::id)
            .collect();

        // Dismiss them
        for id in to_dismiss {
            self.dismiss(id);
        }
    }

    /// Returns the currently visible notices.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.visible.iter()
    }

    /// Returns the number of visible notices.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Returns the number of queued notices.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether there are any notices (visible or queued).
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Clears all notices (visible and queued).
    pub fn clear(&mut self) {
        self.visible.clear();
        self.queue.clear();
    }

    /// Clears all camera error notices.
    ///
    /// Called when a later acquisition succeeds, so stale fault toasts
    /// don't linger next to a live preview.
    pub fn clear_camera_errors(&mut self) {
        // Remove from visible
        let visible_before = self.visible.len();
        self.visible
            .retain(|n| !n.message_key().starts_with("error-camera-"));

        // Remove from queue
        self.queue
            .retain(|n| !n.message_key().starts_with("error-camera-"));

        // Promote from queue if we removed visible notices
        if self.visible.len() < visible_before {
            self.promote_from_queue();
        }
    }

    /// Promotes a notice from the queue to visible if there's space.
    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            if let Some(notice) = self.queue.pop_front() {
                self.visible.push_back(notice);
            } else {
                break;
            }
        }
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};

    #[test]
    fn notice_ids_are_unique() {
        let n1 = Notice::success("test");
        let n2 = Notice::success("test");
        assert_ne!(n1.id(), n2.id());
    }

    #[test]
    fn error_severity_has_no_auto_dismiss() {
        assert!(Severity::Error.auto_dismiss_duration().is_none());
    }

    #[test]
    fn success_and_info_have_same_duration() {
        assert_eq!(
            Severity::Success.auto_dismiss_duration(),
            Severity::Info.auto_dismiss_duration()
        );
    }

    #[test]
    fn warning_duration_is_longer_than_success() {
        let success_duration = Severity::Success.auto_dismiss_duration().unwrap();
        let warning_duration = Severity::Warning.auto_dismiss_duration().unwrap();
        assert!(warning_duration > success_duration);
    }

    #[test]
    fn notice_builder_pattern_works() {
        let notice = Notice::error("test-error")
            .with_arg("reason", "device busy")
            .with_error_type(ErrorType::CameraError);

        assert_eq!(notice.severity(), Severity::Error);
        assert_eq!(notice.message_key(), "test-error");
        assert_eq!(notice.message_args().len(), 1);
        assert_eq!(notice.error_type(), Some(ErrorType::CameraError));
    }

    #[test]
    fn notice_constructors_set_correct_severity() {
        assert_eq!(Notice::success("").severity(), Severity::Success);
        assert_eq!(Notice::info("").severity(), Severity::Info);
        assert_eq!(Notice::warning("").severity(), Severity::Warning);
        assert_eq!(Notice::error("").severity(), Severity::Error);
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = NotificationQueue::new();
        assert_eq!(queue.visible_count(), 0);
        assert_eq!(queue.queued_count(), 0);
        assert!(!queue.has_notifications());
    }

    #[test]
    fn push_adds_to_visible_when_space_available() {
        let mut queue = NotificationQueue::new();
        queue.push(Notice::success("test"));

        assert_eq!(queue.visible_count(), 1);
        assert_eq!(queue.queued_count(), 0);
    }

    #[test]
    fn push_queues_when_visible_is_full() {
        let mut queue = NotificationQueue::new();

        // Fill visible
        for i in 0..MAX_VISIBLE {
            queue.push(Notice::success(format!("test-{i}")));
        }
        assert_eq!(queue.visible_count(), MAX_VISIBLE);
        assert_eq!(queue.queued_count(), 0);

        // Add one more
        queue.push(Notice::success("queued"));
        assert_eq!(queue.visible_count(), MAX_VISIBLE);
        assert_eq!(queue.queued_count(), 1);
    }

    #[test]
    fn dismiss_promotes_from_queue() {
        let mut queue = NotificationQueue::new();

        // Fill visible
        let mut first_id = None;
        for i in 0..MAX_VISIBLE {
            let n = Notice::success(format!("visible-{i}"));
            if i == 0 {
                first_id = Some(n.id());
            }
            queue.push(n);
        }

        // Add to queue
        queue.push(Notice::success("queued"));
        assert_eq!(queue.queued_count(), 1);

        // Dismiss first visible
        queue.dismiss(first_id.unwrap());

        // Queued should have been promoted
        assert_eq!(queue.visible_count(), MAX_VISIBLE);
        assert_eq!(queue.queued_count(), 0);
    }

    #[test]
    fn dismiss_nonexistent_returns_false() {
        let mut queue = NotificationQueue::new();
        let fake_id = Notice::success("temp").id();

        assert!(!queue.dismiss(fake_id));
    }

    #[test]
    fn error_notices_do_not_auto_dismiss() {
        let mut queue = NotificationQueue::new();
        let notice = Notice::error("test-error");
        let id = notice.id();
        queue.push(notice);

        // Tick should not dismiss errors
        queue.tick();
        assert_eq!(queue.visible_count(), 1);

        // Manual dismiss should work
        queue.dismiss(id);
        assert_eq!(queue.visible_count(), 0);
    }

    #[test]
    fn expired_notices_are_dismissed_on_tick() {
        let mut queue = NotificationQueue::new();
        queue.push(Notice::success("done").auto_dismiss(Duration::ZERO));

        queue.tick();
        assert_eq!(queue.visible_count(), 0);
    }

    #[test]
    fn pump_moves_handle_notices_into_queue() {
        let mut queue = NotificationQueue::new();
        let handle = queue.handle();

        handle.push(Notice::info("from-controller"));
        assert_eq!(queue.visible_count(), 0);

        queue.pump();
        assert_eq!(queue.visible_count(), 1);
        assert_eq!(
            queue.visible().next().unwrap().message_key(),
            "from-controller"
        );
    }

    #[test]
    fn push_forwards_errors_to_diagnostics() {
        let mut collector = DiagnosticsCollector::default();
        let mut queue = NotificationQueue::new();
        queue.set_diagnostics(collector.handle());

        queue.push(
            Notice::error("notification-photo-save-failed").with_error_type(ErrorType::StoreError),
        );
        queue.push(Notice::success("notification-photo-saved"));

        collector.process_pending();

        // Only the error was forwarded
        assert_eq!(collector.len(), 1);
        let event = collector.iter().next().unwrap();
        match &event.kind {
            DiagnosticEventKind::Error { event } => {
                assert_eq!(event.error_type, ErrorType::StoreError);
                assert_eq!(event.message, "notification-photo-save-failed");
            }
            _ => panic!("expected Error event"),
        }
    }

    #[test]
    fn clear_camera_errors_removes_only_camera_notices() {
        let mut queue = NotificationQueue::new();

        queue.push(Notice::error("error-camera-busy"));
        queue.push(Notice::error("error-camera-not-found"));
        queue.push(Notice::success("notification-photo-saved"));
        queue.push(Notice::error("some-other-error"));

        assert_eq!(queue.visible_count(), 3);
        assert_eq!(queue.queued_count(), 1);

        queue.clear_camera_errors();

        assert_eq!(queue.visible_count(), 2);
        assert_eq!(queue.queued_count(), 0);

        for notice in queue.visible() {
            assert!(
                !notice.message_key().starts_with("error-camera-"),
                "camera error notice should have been removed"
            );
        }
    }
}
