//! Search query engine
//!
//! Owns the query text, a debounced request dispatch, the result list, the
//! selection cursor and the inline error. Every query change, clear and
//! dispatched search bumps a request token; completions that carry an older
//! token are dropped, so a slow early search can never overwrite newer results.

use crossterm::event::KeyCode;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Debouncer;
use crate::api::SearchBackend;
use crate::event::{AppEvent, EventSender, SearchEvent};
use crate::models::{MediaType, SearchResult};

/// Upper bound on displayed results
pub const MAX_RESULTS: usize = 8;

/// Default pause in typing before a search is sent
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(350);

/// Inline message shown for any failed search
pub const SEARCH_ERROR_MESSAGE: &str = "Please check your internet connection.";

/// Receiver of a chosen search result
pub trait SelectionStore {
    fn select_movie(&mut self, item: &SearchResult);
    fn select_series(&mut self, item: &SearchResult);
}

/// Keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

impl SearchKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Down => Some(SearchKey::Down),
            KeyCode::Up => Some(SearchKey::Up),
            KeyCode::Enter => Some(SearchKey::Enter),
            KeyCode::Esc => Some(SearchKey::Escape),
            _ => None,
        }
    }
}

/// Observable search state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub loading: bool,
    /// At most `MAX_RESULTS` items
    pub results: Vec<SearchResult>,
    /// Index into `results`; `None` when nothing is highlighted
    pub selected: Option<usize>,
    pub error: Option<String>,
}

impl SearchState {
    fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected = None;
    }
}

pub struct SearchEngine {
    state: SearchState,
    /// Text cursor, in chars
    cursor: usize,
    token: u64,
    debouncer: Debouncer,
    in_flight: Option<JoinHandle<()>>,
    backend: Arc<dyn SearchBackend>,
    events: EventSender,
}

impl SearchEngine {
    pub fn new(backend: Arc<dyn SearchBackend>, events: EventSender) -> Self {
        Self::with_delay(backend, events, DEBOUNCE_DELAY)
    }

    pub fn with_delay(
        backend: Arc<dyn SearchBackend>,
        events: EventSender,
        delay: Duration,
    ) -> Self {
        Self {
            state: SearchState::default(),
            cursor: 0,
            token: 0,
            debouncer: Debouncer::new(delay),
            in_flight: None,
            backend,
            events,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.state.results
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.state.selected.and_then(|i| self.state.results.get(i))
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Token of the most recent query change or request
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_debouncing(&self) -> bool {
        self.debouncer.is_pending()
    }

    // -------------------------------------------------------------------------
    // Query Editing
    // -------------------------------------------------------------------------

    /// Replace the query text
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
        self.cursor = self.state.query.chars().count();
        self.query_changed();
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.state.query.insert(at, c);
        self.cursor += 1;
        self.query_changed();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.state.query.remove(at);
            self.query_changed();
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.state.query.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.state.query.remove(at);
            self.query_changed();
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.state.query.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.state.query.chars().count();
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.state
            .query
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.state.query.len())
    }

    /// Invalidate older work and arm the debounce timer for the new text
    fn query_changed(&mut self) {
        self.token += 1;
        self.debouncer.cancel();

        if self.state.query.is_empty() {
            self.state.loading = false;
            return;
        }

        let token = self.token;
        let events = self.events.clone();
        self.debouncer.schedule(move || {
            let _ = events.send(AppEvent::Search(SearchEvent::DebounceElapsed { token }));
        });
    }

    // -------------------------------------------------------------------------
    // Request Lifecycle
    // -------------------------------------------------------------------------

    /// Apply a search event. Returns whether the state changed.
    pub fn update(&mut self, event: SearchEvent) -> bool {
        match event {
            SearchEvent::DebounceElapsed { token } => {
                if token != self.token {
                    return false;
                }
                let query = self.state.query.clone();
                self.search(&query);
                true
            }
            SearchEvent::Finished {
                token,
                query,
                outcome,
            } => self.finish(token, &query, outcome),
        }
    }

    /// Dispatch a search for `query` right away
    pub fn search(&mut self, query: &str) {
        self.token += 1;

        if query.trim().is_empty() {
            self.state.set_results(Vec::new());
            self.state.loading = false;
            self.state.error = None;
            return;
        }

        self.state.loading = true;
        self.state.error = None;

        let token = self.token;
        let query = query.to_string();
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        debug!(%query, token, "dispatching search");

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = backend.search_multi(&query).await;
            let _ = events.send(AppEvent::Search(SearchEvent::Finished {
                token,
                query,
                outcome,
            }));
        }));
    }

    fn finish(
        &mut self,
        token: u64,
        query: &str,
        outcome: anyhow::Result<Vec<SearchResult>>,
    ) -> bool {
        if token != self.token {
            debug!(%query, token, current = self.token, "dropping stale search response");
            return false;
        }

        self.in_flight = None;
        self.state.loading = false;
        match outcome {
            Ok(results) => {
                let results = results
                    .into_iter()
                    .filter(|r| matches!(r.media_type, MediaType::Movie | MediaType::Tv))
                    .take(MAX_RESULTS)
                    .collect();
                self.state.set_results(results);
                self.state.error = None;
            }
            Err(err) => {
                warn!(%query, error = %err, "search failed");
                self.state.set_results(Vec::new());
                self.state.error = Some(SEARCH_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Result Navigation
    // -------------------------------------------------------------------------

    /// Handle a navigation key. No-op while there are no results.
    ///
    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: SearchKey, store: &mut dyn SelectionStore) -> bool {
        let len = self.state.results.len();
        if len == 0 {
            return false;
        }

        match key {
            SearchKey::Down => {
                self.state.selected = Some(match self.state.selected {
                    Some(i) => (i + 1).min(len - 1),
                    None => 0,
                });
                true
            }
            SearchKey::Up => {
                self.state.selected = Some(match self.state.selected {
                    Some(i) => i.saturating_sub(1),
                    None => 0,
                });
                true
            }
            SearchKey::Enter => match self.state.selected {
                Some(index) => self.activate(index, store).is_some(),
                None => false,
            },
            SearchKey::Escape => {
                self.clear();
                true
            }
        }
    }

    /// Highlight a result (pointer hover)
    pub fn hover(&mut self, index: usize) {
        if index < self.state.results.len() {
            self.state.selected = Some(index);
        }
    }

    /// Route the result at `index` to the store by media type, then clear
    pub fn activate(
        &mut self,
        index: usize,
        store: &mut dyn SelectionStore,
    ) -> Option<SearchResult> {
        let item = self.state.results.get(index)?.clone();
        match item.media_type {
            MediaType::Movie => store.select_movie(&item),
            MediaType::Tv => store.select_series(&item),
        }
        self.clear();
        Some(item)
    }

    /// Reset to an empty query with no results, selection or error
    pub fn clear(&mut self) {
        self.token += 1;
        self.debouncer.cancel();
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.state = SearchState::default();
        self.cursor = 0;
    }
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("token", &self.token)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct NoBackend;

    #[async_trait]
    impl SearchBackend for NoBackend {
        async fn search_multi(&self, _query: &str) -> anyhow::Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }
    }

    fn engine() -> SearchEngine {
        let (tx, _rx) = mpsc::unbounded_channel();
        SearchEngine::new(Arc::new(NoBackend), tx)
    }

    #[tokio::test]
    async fn test_query_editing() {
        let mut search = engine();

        for c in "hello".chars() {
            search.insert(c);
        }
        assert_eq!(search.query(), "hello");
        assert_eq!(search.cursor(), 5);

        search.cursor_left();
        search.cursor_left();
        search.insert('X');
        assert_eq!(search.query(), "helXlo");

        search.backspace();
        assert_eq!(search.query(), "hello");

        search.cursor_home();
        search.delete();
        assert_eq!(search.query(), "ello");

        search.cursor_end();
        assert_eq!(search.cursor(), 4);
    }

    #[tokio::test]
    async fn test_editing_multibyte_query() {
        let mut search = engine();
        search.set_query("amélie");
        assert_eq!(search.cursor(), 6);
        search.backspace();
        search.backspace();
        assert_eq!(search.query(), "amél");
        search.cursor_left();
        search.backspace();
        assert_eq!(search.query(), "aml");
    }

    #[tokio::test]
    async fn test_set_query_arms_debounce() {
        let mut search = engine();
        search.set_query("batman");
        assert!(search.is_debouncing());

        search.set_query("");
        assert!(!search.is_debouncing());
        assert!(!search.is_loading());
    }

    #[tokio::test]
    async fn test_blank_query_resolves_without_request() {
        let mut search = engine();
        search.set_query("   ");
        search.search("   ");
        assert!(search.results().is_empty());
        assert!(!search.is_loading());
    }

    #[test]
    fn test_search_key_mapping() {
        assert_eq!(SearchKey::from_key_code(KeyCode::Down), Some(SearchKey::Down));
        assert_eq!(SearchKey::from_key_code(KeyCode::Esc), Some(SearchKey::Escape));
        assert_eq!(SearchKey::from_key_code(KeyCode::Char('j')), None);
    }
}
