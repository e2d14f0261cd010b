//! Interaction state machines
//!
//! - `debounce`: cancellable trailing-edge timer
//! - `search`: query engine with keyboard navigation
//! - `movie` / `tv`: detail view controllers
//! - `image`: poster loading states

use std::sync::atomic::{AtomicU64, Ordering};

pub mod debounce;
pub mod image;
pub mod movie;
pub mod search;
pub mod tv;

pub use debounce::Debouncer;
pub use image::{ImageBases, ImageDisplay, ImageSlot, ImageState, PosterCache};
pub use movie::{MovieDetailView, MovieTab};
pub use search::{SearchEngine, SearchKey, SearchState, SelectionStore};
pub use tv::{TvContent, TvDetailView, TvFocus, TvSelection};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Process-unique fetch generation. A remounted view never reuses one, so a
/// completion from an earlier mount cannot match.
pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// Load Phase
// =============================================================================

/// Fetch lifecycle of a detail view
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase<T> {
    Loading,
    /// Failed with a user-facing message
    Failed(String),
    Loaded(T),
}

impl<T> LoadPhase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadPhase::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadPhase::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadPhase::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// List State
// =============================================================================

/// Cursor and viewport offset for a scrollable list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Put the cursor on `index` (clamped)
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.len.saturating_sub(1));
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Replace the list with `len` items and put the cursor back at the top
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected = 0;
        self.offset = 0;
    }
}
