// SPDX-License-Identifier: MPL-2.0
//! Gallery controller binding a photo session to the store and carousel.
//!
//! The controller owns a [`GallerySession`] and a [`CarouselState`] and
//! exposes loading, navigation and deletion with consistent reload
//! semantics: the store is the single source of truth, and in-memory
//! state only changes after the store confirms an operation.

use crate::application::port::store::ProofStore;
use crate::carousel::CarouselState;
use crate::diagnostics::{AppOperation, DiagnosticsHandle, ErrorType, UserAction};
use crate::domain::photo::{GallerySession, PhotoId, PhotoRecord, Scope, ScopeContextId};
use crate::notify::{Notice, NotifierHandle};
use std::sync::Arc;
use std::time::Instant;

/// Result of a key press handled by the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Navigation happened; contains the new carousel index.
    Moved(usize),
    /// The user asked to leave the gallery.
    CloseRequested,
    /// The key is not bound, or there was nothing to navigate.
    Ignored,
}

/// Outcome of an async gallery operation, for host rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryEvent {
    /// A load finished; contains the number of photos now in the session.
    Loaded { count: usize },
    /// A load failed; the previous session contents are untouched.
    LoadFailed,
    /// The photo was deleted on the store and removed locally.
    Deleted(PhotoId),
    /// The store declined or the call failed; nothing changed locally.
    DeleteFailed(PhotoId),
}

/// Gallery controller for one proof photo context.
pub struct GalleryController<S: ProofStore> {
    /// Store the controller reads from and deletes against.
    store: Arc<S>,

    /// Backend document the delete calls address.
    context: ScopeContextId,

    /// Photo list and dirty tracking.
    session: GallerySession,

    /// Navigation pointer over the session.
    carousel: CarouselState,

    /// Channel for user-facing notices.
    notifier: NotifierHandle,

    /// Channel for diagnostic events.
    diagnostics: DiagnosticsHandle,
}

impl<S: ProofStore> GalleryController<S> {
    /// Creates a controller with an empty, not yet loaded session.
    pub fn new(
        store: Arc<S>,
        context: ScopeContextId,
        notifier: NotifierHandle,
        diagnostics: DiagnosticsHandle,
    ) -> Self {
        Self {
            store,
            context,
            session: GallerySession::new(),
            carousel: CarouselState::default(),
            notifier,
            diagnostics,
        }
    }

    /// Returns the photo session.
    pub fn session(&self) -> &GallerySession {
        &self.session
    }

    /// Returns the carousel state.
    pub fn carousel(&self) -> &CarouselState {
        &self.carousel
    }

    /// Returns the photo the carousel currently points at.
    pub fn current_photo(&self) -> Option<&PhotoRecord> {
        self.session.get(self.carousel.index())
    }

    /// Marks the session dirty so the host refreshes dependent views on
    /// close.
    pub fn mark_dirty(&mut self) {
        self.session.mark_dirty();
    }

    /// Loads all photos for `scope`, newest first.
    ///
    /// Records are ordered by capture date descending, with the record id
    /// as tiebreak, so two photos taken within the same second still have
    /// a stable order. The carousel lands on `focus` when that photo is
    /// present, and on the first photo otherwise.
    ///
    /// With no scope the session finishes loading empty; this is the
    /// "nothing to show" case, not an error.
    ///
    /// A failed load keeps the previous session contents so the user does
    /// not lose what is already on screen. Taking `&mut self` means a
    /// second load cannot start on this controller while one is pending.
    pub async fn load(&mut self, scope: Option<Scope>, focus: Option<PhotoId>) -> GalleryEvent {
        let Some(scope) = scope else {
            self.session.install(None, Vec::new());
            self.carousel.go_to(0, 0);
            return GalleryEvent::Loaded { count: 0 };
        };

        let started = Instant::now();
        match self.store.fetch(scope).await {
            Ok(mut records) => {
                records.sort_by(|a, b| {
                    b.capture_date
                        .cmp(&a.capture_date)
                        .then(b.id.cmp(&a.id))
                });
                self.session.install(Some(scope), records);
                let count = self.session.len();

                let index = focus
                    .and_then(|id| self.session.position_of(id))
                    .unwrap_or(0);
                self.carousel.go_to(index, count);

                self.diagnostics.log_operation(AppOperation::LoadPhotos {
                    duration_ms: started.elapsed().as_millis() as u64,
                    count,
                    success: true,
                });
                GalleryEvent::Loaded { count }
            }
            Err(err) => {
                self.diagnostics.log_operation(AppOperation::LoadPhotos {
                    duration_ms: started.elapsed().as_millis() as u64,
                    count: 0,
                    success: false,
                });
                self.notifier.push(
                    Notice::error("notification-photos-load-failed")
                        .with_arg("reason", err.to_string())
                        .with_error_type(ErrorType::StoreError),
                );
                GalleryEvent::LoadFailed
            }
        }
    }

    /// Deletes `id` on the store, then mirrors the removal locally.
    ///
    /// The store confirms first; the in-memory sequence never changes on
    /// a declined or failed delete. On success the carousel pointer is
    /// clamped so it never dangles past the shortened list.
    pub async fn delete(&mut self, id: PhotoId) -> GalleryEvent {
        self.diagnostics.log_action(UserAction::DeletePhoto);

        let started = Instant::now();
        let outcome = self.store.delete(self.context, id).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(true) => {
                self.diagnostics.log_operation(AppOperation::DeletePhoto {
                    duration_ms,
                    success: true,
                });
                if self.session.remove(id).is_some() {
                    self.carousel.on_item_removed(self.session.len());
                }
                self.session.mark_dirty();
                self.notifier
                    .push(Notice::success("notification-photo-deleted"));
                GalleryEvent::Deleted(id)
            }
            Ok(false) => {
                self.diagnostics.log_operation(AppOperation::DeletePhoto {
                    duration_ms,
                    success: false,
                });
                self.notifier.push(
                    Notice::error("notification-photo-delete-failed")
                        .with_error_type(ErrorType::StoreError),
                );
                GalleryEvent::DeleteFailed(id)
            }
            Err(err) => {
                self.diagnostics.log_operation(AppOperation::DeletePhoto {
                    duration_ms,
                    success: false,
                });
                self.notifier.push(
                    Notice::error("notification-photo-delete-failed")
                        .with_arg("reason", err.to_string())
                        .with_error_type(ErrorType::StoreError),
                );
                GalleryEvent::DeleteFailed(id)
            }
        }
    }

    /// Maps a key press to a gallery action.
    ///
    /// `ArrowRight` and `ArrowLeft` navigate, `Escape` requests close,
    /// everything else is ignored. Navigation on an empty gallery is an
    /// expected no-op, reported as [`KeyAction::Ignored`].
    pub fn handle_key(&mut self, key: &str) -> KeyAction {
        match key {
            "ArrowRight" => self.next().map_or(KeyAction::Ignored, KeyAction::Moved),
            "ArrowLeft" => self.previous().map_or(KeyAction::Ignored, KeyAction::Moved),
            "Escape" => KeyAction::CloseRequested,
            _ => KeyAction::Ignored,
        }
    }

    /// Advances to the next photo, wrapping at the end.
    pub fn next(&mut self) -> Option<usize> {
        self.diagnostics.log_action(UserAction::NavigateNext);
        self.carousel.next(self.session.len())
    }

    /// Steps back to the previous photo, wrapping at the start.
    pub fn previous(&mut self) -> Option<usize> {
        self.diagnostics.log_action(UserAction::NavigatePrevious);
        self.carousel.previous(self.session.len())
    }

    /// Jumps to `index`, clamped to the valid range.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.diagnostics
            .log_action(UserAction::GoToPhoto { index });
        self.carousel.go_to(index, self.session.len());
        self.carousel.index()
    }

    /// Flips fullscreen display and returns the new flag.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.diagnostics.log_action(UserAction::ToggleFullscreen);
        self.carousel.toggle_fullscreen();
        self.carousel.is_fullscreen()
    }

    /// Returns the download URL for the current photo's full-resolution
    /// payload, if the gallery is non-empty.
    pub fn download_url(&self) -> Option<String> {
        let photo = self.current_photo()?;
        self.diagnostics.log_action(UserAction::DownloadPhoto);
        Some(self.store.download_url(photo.id))
    }
}
