//! App state and core application logic
//!
//! Owns the search engine, the global selection store and the mounted detail
//! view, and routes keys, mouse events and async completions to them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{ImageSource, MetadataSource, SearchBackend};
use crate::embed::{BrowserLauncher, EmbedProviders, EmbedTarget, ListenerRegistry};
use crate::event::{AppEvent, EventSender, LaunchEvent};
use crate::models::SearchResult;
use crate::state::search::MAX_RESULTS;
use crate::state::{
    ImageBases, MovieDetailView, MovieTab, PosterCache, SearchEngine, SearchKey, SelectionStore,
    TvDetailView,
};

// =============================================================================
// App State Enum
// =============================================================================

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Search box with results
    #[default]
    Search,
    MovieDetail,
    TvDetail,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Text input mode (search box focused)
    #[default]
    Editing,
}

// =============================================================================
// Services
// =============================================================================

/// Everything the views need from the outside world
#[derive(Clone)]
pub struct Services {
    pub search: Arc<dyn SearchBackend>,
    pub metadata: Arc<dyn MetadataSource>,
    pub images: Arc<dyn ImageSource>,
    pub providers: EmbedProviders,
    pub image_bases: ImageBases,
    pub debounce: Duration,
    pub launcher: BrowserLauncher,
}

// =============================================================================
// Selection Store
// =============================================================================

/// What the user picked from the search results
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    Movie(SearchResult),
    Series(SearchResult),
}

/// Global selection store fed by the search engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    current: Option<Selected>,
}

impl Selected {
    pub fn item(&self) -> &SearchResult {
        match self {
            Selected::Movie(item) | Selected::Series(item) => item,
        }
    }
}

impl Selection {
    pub fn current(&self) -> Option<&Selected> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl SelectionStore for Selection {
    fn select_movie(&mut self, item: &SearchResult) {
        self.current = Some(Selected::Movie(item.clone()));
    }

    fn select_series(&mut self, item: &SearchResult) {
        self.current = Some(Selected::Series(item.clone()));
    }
}

// =============================================================================
// Detail View
// =============================================================================

#[derive(Debug)]
pub enum DetailView {
    Movie(MovieDetailView),
    Tv(TvDetailView),
}

impl DetailView {
    /// Player target, if the view has a player mounted
    pub fn player_target(&self) -> Option<EmbedTarget> {
        match self {
            DetailView::Movie(view) => view.player().map(|p| *p.target()),
            DetailView::Tv(view) => view.player().map(|p| *p.target()),
        }
    }
}

// =============================================================================
// App
// =============================================================================

/// Main application state
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Transient status line message
    pub status: Option<String>,

    pub search: SearchEngine,
    pub selection: Selection,
    pub detail: Option<DetailView>,
    pub posters: PosterCache,
    pub listeners: ListenerRegistry,

    /// Screen area of the result list, recorded by the renderer for mouse hits
    pub results_area: Option<Rect>,

    services: Services,
    events: EventSender,
}

impl App {
    /// Create a new App instance
    pub fn new(services: Services, events: EventSender) -> Self {
        Self {
            state: AppState::Search,
            running: true,
            input_mode: InputMode::Editing,
            status: None,
            search: SearchEngine::with_delay(
                Arc::clone(&services.search),
                events.clone(),
                services.debounce,
            ),
            selection: Selection::default(),
            detail: None,
            posters: PosterCache::new(
                services.image_bases.clone(),
                Arc::clone(&services.images),
                events.clone(),
            ),
            listeners: ListenerRegistry::new(),
            results_area: None,
            services,
            events,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn movie_view(&self) -> Option<&MovieDetailView> {
        match &self.detail {
            Some(DetailView::Movie(view)) => Some(view),
            _ => None,
        }
    }

    pub fn tv_view(&self) -> Option<&TvDetailView> {
        match &self.detail {
            Some(DetailView::Tv(view)) => Some(view),
            _ => None,
        }
    }

    pub fn tv_view_mut(&mut self) -> Option<&mut TvDetailView> {
        match &mut self.detail {
            Some(DetailView::Tv(view)) => Some(view),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Mount the detail view for whatever the selection store holds
    fn open_selection(&mut self) {
        let Some(selected) = self.selection.current().cloned() else {
            return;
        };

        // Unmount first so the old view's listeners and fetch go away
        self.detail = None;
        let services = &self.services;
        let (view, state) = match selected {
            Selected::Movie(item) => {
                info!(id = item.id, title = %item.title, "opening movie");
                let view = MovieDetailView::mount(
                    item.id,
                    Arc::clone(&services.metadata),
                    services.providers.clone(),
                    self.listeners.clone(),
                    self.events.clone(),
                );
                (DetailView::Movie(view), AppState::MovieDetail)
            }
            Selected::Series(item) => {
                info!(id = item.id, title = %item.title, "opening series");
                let view = TvDetailView::mount(
                    item.id,
                    Arc::clone(&services.metadata),
                    services.providers.clone(),
                    self.listeners.clone(),
                    self.events.clone(),
                );
                (DetailView::Tv(view), AppState::TvDetail)
            }
        };

        self.detail = Some(view);
        self.request_posters();
        self.state = state;
        self.input_mode = InputMode::Normal;
    }

    /// Go back to the search screen. Unmounting the detail view aborts its
    /// fetch and releases its listeners.
    pub fn back(&mut self) -> bool {
        if self.state == AppState::Search {
            if self.input_mode == InputMode::Editing {
                self.input_mode = InputMode::Normal;
                return true;
            }
            return false;
        }

        self.detail = None;
        self.selection.clear();
        self.request_posters();
        self.state = AppState::Search;
        self.input_mode = InputMode::Editing;
        true
    }

    /// Open the mounted player in the system browser
    pub fn open_in_browser(&mut self) -> bool {
        let Some(target) = self.detail.as_ref().and_then(DetailView::player_target) else {
            self.set_status("Nothing is playing");
            return false;
        };

        let launcher = self.services.launcher.clone();
        let providers = self.services.providers.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = launcher
                .open(&target, &providers)
                .await
                .map_err(|e| e.to_string());
            let _ = events.send(AppEvent::Launch(LaunchEvent::Finished(result)));
        });
        self.set_status(format!("Opening {}...", target));
        true
    }

    // -------------------------------------------------------------------------
    // Async Completions
    // -------------------------------------------------------------------------

    /// Apply an async completion. Returns whether anything changed.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Search(event) => {
                let changed = self.search.update(event);
                if changed {
                    self.request_posters();
                }
                changed
            }
            AppEvent::Movie(event) => match &mut self.detail {
                Some(DetailView::Movie(view)) => view.update(event),
                _ => {
                    debug!("movie event with no movie view mounted");
                    false
                }
            },
            AppEvent::Tv(event) => match &mut self.detail {
                Some(DetailView::Tv(view)) => view.update(event),
                _ => {
                    debug!("tv event with no tv view mounted");
                    false
                }
            },
            AppEvent::Image(event) => self.posters.update(event),
            AppEvent::Launch(LaunchEvent::Finished(result)) => {
                match result {
                    Ok(path) => self.set_status(format!("Opened {}", path.display())),
                    Err(err) => {
                        warn!(error = %err, "browser launch failed");
                        self.set_status(err);
                    }
                }
                true
            }
        }
    }

    /// Fetch posters for the current results and the open title, forgetting
    /// every other slot
    fn request_posters(&mut self) {
        let paths: Vec<Option<String>> = self
            .search
            .results()
            .iter()
            .chain(self.selection.current().map(Selected::item))
            .map(|r| r.poster_path.clone())
            .collect();
        self.posters.retain(paths.iter().map(Option::as_deref));
        for path in paths {
            self.posters.request(path.as_deref());
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear status on any keypress
        self.status = None;

        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match self.state {
            AppState::Search => match self.input_mode {
                InputMode::Editing => self.handle_editing_key(key),
                InputMode::Normal => self.handle_search_key(key),
            },
            AppState::MovieDetail => self.handle_movie_key(key),
            AppState::TvDetail => self.handle_tv_key(key),
        }
    }

    /// Route a key through the search engine, opening the detail view if it
    /// produced a selection
    fn search_key(&mut self, key: SearchKey) -> bool {
        let consumed = self.search.handle_key(key, &mut self.selection);
        if consumed && key == SearchKey::Enter {
            self.open_selection();
        }
        consumed
    }

    /// Activate the result at `index` (hotkeys and clicks)
    fn activate_result(&mut self, index: usize) -> bool {
        if self.search.activate(index, &mut self.selection).is_some() {
            self.open_selection();
            true
        } else {
            false
        }
    }

    /// Reset the query, results and error, whatever the engine holds
    fn clear_search(&mut self) -> bool {
        if self.search.query().is_empty()
            && self.search.results().is_empty()
            && self.search.error().is_none()
        {
            return false;
        }
        self.search.clear();
        true
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('u') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.clear_search();
        }

        if let Some(search_key) = SearchKey::from_key_code(key.code) {
            if self.search_key(search_key) {
                return true;
            }
            if search_key == SearchKey::Escape {
                self.input_mode = InputMode::Normal;
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.search.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace();
                true
            }
            KeyCode::Delete => {
                self.search.delete();
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search.cursor_home();
                true
            }
            KeyCode::End => {
                self.search.cursor_end();
                true
            }
            KeyCode::Tab => {
                self.input_mode = InputMode::Normal;
                true
            }
            _ => false,
        }
    }

    /// Handle keys on the search screen in normal mode
    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('i') | KeyCode::Tab => {
                self.input_mode = InputMode::Editing;
                true
            }
            KeyCode::Char('x') => self.clear_search(),
            KeyCode::Char('k') => self.search_key(SearchKey::Up),
            KeyCode::Char('j') => self.search_key(SearchKey::Down),
            KeyCode::Char(c @ '1'..='8') => {
                let index = (c as usize) - ('1' as usize);
                index < MAX_RESULTS && self.activate_result(index)
            }
            code => match SearchKey::from_key_code(code) {
                Some(search_key) => self.search_key(search_key),
                None => false,
            },
        }
    }

    fn handle_movie_key(&mut self, key: KeyEvent) -> bool {
        let Some(DetailView::Movie(view)) = &mut self.detail else {
            return false;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => view.toggle_tab(),
            KeyCode::Char('a') => view.select_tab(MovieTab::About),
            KeyCode::Char('w') => view.select_tab(MovieTab::Watch),
            KeyCode::Char('m') => {
                if view.has_more_description() {
                    view.toggle_description();
                    true
                } else {
                    false
                }
            }
            KeyCode::Char('r') => view.retry(),
            KeyCode::Char('o') => self.open_in_browser(),
            _ => false,
        }
    }

    fn handle_tv_key(&mut self, key: KeyEvent) -> bool {
        let Some(DetailView::Tv(view)) = &mut self.detail else {
            return false;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Tab => {
                view.toggle_focus();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                view.move_up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                view.move_down();
                true
            }
            KeyCode::Enter => view.activate(),
            KeyCode::Char('r') => view.retry(),
            KeyCode::Char('o') => self.open_in_browser(),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Handle a mouse event. Active player listeners swallow clicks before
    /// any view sees them.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        if self.listeners.intercepts(&event) {
            return true;
        }
        if self.state != AppState::Search {
            return false;
        }

        let Some(index) = self.result_at(event.column, event.row) else {
            return false;
        };
        match event.kind {
            MouseEventKind::Moved => {
                self.search.hover(index);
                true
            }
            MouseEventKind::Down(MouseButton::Left) => self.activate_result(index),
            _ => false,
        }
    }

    /// Result row under a screen position (one row per result inside a border)
    fn result_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.results_area?;
        let inner_top = area.y + 1;
        let inside = column > area.x
            && column < area.x + area.width.saturating_sub(1)
            && row >= inner_top
            && row < area.y + area.height.saturating_sub(1);
        if !inside {
            return None;
        }
        let index = usize::from(row - inner_top);
        (index < self.search.results().len()).then_some(index)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("running", &self.running)
            .field("input_mode", &self.input_mode)
            .field("search", &self.search)
            .field("selection", &self.selection)
            .field("detail", &self.detail)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
