//! Movie detail view controller
//!
//! Mounted per movie id. Fetches the record once, then switches between the
//! About tab and the Watch tab, which owns the mounted player.

use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{next_generation, LoadPhase};
use crate::api::MetadataSource;
use crate::embed::{EmbedProviders, EmbedSession, EmbedTarget, ListenerRegistry};
use crate::event::{AppEvent, EventSender, MovieEvent};
use crate::models::MovieRecord;

/// Descriptions longer than this are cut until expanded
pub const DESCRIPTION_LIMIT: usize = 150;

pub const MOVIE_LOAD_ERROR: &str = "Failed to load movie. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieTab {
    #[default]
    About,
    Watch,
}

impl MovieTab {
    pub fn label(&self) -> &'static str {
        match self {
            MovieTab::About => "About",
            MovieTab::Watch => "Watch",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            MovieTab::About => MovieTab::Watch,
            MovieTab::Watch => MovieTab::About,
        }
    }
}

pub struct MovieDetailView {
    movie_id: u64,
    generation: u64,
    phase: LoadPhase<MovieRecord>,
    active_tab: MovieTab,
    show_full_description: bool,
    player: Option<EmbedSession>,
    source: Arc<dyn MetadataSource>,
    providers: EmbedProviders,
    listeners: ListenerRegistry,
    events: EventSender,
    fetch: Option<JoinHandle<()>>,
}

impl MovieDetailView {
    /// Mount the view and start fetching
    pub fn mount(
        movie_id: u64,
        source: Arc<dyn MetadataSource>,
        providers: EmbedProviders,
        listeners: ListenerRegistry,
        events: EventSender,
    ) -> Self {
        let mut view = Self {
            movie_id,
            generation: 0,
            phase: LoadPhase::Loading,
            active_tab: MovieTab::About,
            show_full_description: false,
            player: None,
            source,
            providers,
            listeners,
            events,
            fetch: None,
        };
        view.load();
        view
    }

    fn load(&mut self) {
        if let Some(handle) = self.fetch.take() {
            handle.abort();
        }
        self.generation = next_generation();
        self.phase = LoadPhase::Loading;

        let movie_id = self.movie_id;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        debug!(movie_id, generation, "fetching movie");

        self.fetch = Some(tokio::spawn(async move {
            let outcome = source.movie_details(movie_id).await;
            let _ = events.send(AppEvent::Movie(MovieEvent::Loaded {
                movie_id,
                generation,
                outcome,
            }));
        }));
    }

    /// Re-run the fetch. Only allowed from the failed state.
    pub fn retry(&mut self) -> bool {
        if !self.phase.is_failed() {
            return false;
        }
        self.load();
        true
    }

    /// Apply a fetch completion. Completions for another mount are ignored.
    pub fn update(&mut self, event: MovieEvent) -> bool {
        let MovieEvent::Loaded {
            movie_id,
            generation,
            outcome,
        } = event;

        if movie_id != self.movie_id || generation != self.generation {
            debug!(movie_id, generation, "dropping stale movie response");
            return false;
        }

        self.fetch = None;
        self.phase = match outcome {
            Ok(movie) => LoadPhase::Loaded(movie),
            Err(err) => {
                warn!(movie_id, error = %err, "movie fetch failed");
                LoadPhase::Failed(MOVIE_LOAD_ERROR.to_string())
            }
        };
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn movie_id(&self) -> u64 {
        self.movie_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> &LoadPhase<MovieRecord> {
        &self.phase
    }

    pub fn movie(&self) -> Option<&MovieRecord> {
        self.phase.loaded()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn active_tab(&self) -> MovieTab {
        self.active_tab
    }

    pub fn player(&self) -> Option<&EmbedSession> {
        self.player.as_ref()
    }

    pub fn show_full_description(&self) -> bool {
        self.show_full_description
    }

    // -------------------------------------------------------------------------
    // Tabs
    // -------------------------------------------------------------------------

    /// Switch tabs. The player exists exactly while Watch is active.
    pub fn select_tab(&mut self, tab: MovieTab) -> bool {
        if self.movie().is_none() || tab == self.active_tab {
            return false;
        }

        self.active_tab = tab;
        self.player = match tab {
            MovieTab::Watch => Some(EmbedSession::mount(
                EmbedTarget::Movie { id: self.movie_id },
                &self.providers,
                &self.listeners,
            )),
            MovieTab::About => None,
        };
        true
    }

    pub fn toggle_tab(&mut self) -> bool {
        self.select_tab(self.active_tab.toggled())
    }

    // -------------------------------------------------------------------------
    // Description
    // -------------------------------------------------------------------------

    pub fn has_more_description(&self) -> bool {
        self.movie()
            .is_some_and(|m| m.overview.chars().count() > DESCRIPTION_LIMIT)
    }

    pub fn toggle_description(&mut self) {
        self.show_full_description = !self.show_full_description;
    }

    /// Overview as displayed: cut to `DESCRIPTION_LIMIT` chars plus `...`
    /// unless expanded
    pub fn description(&self) -> String {
        let overview = self.movie().map(|m| m.overview.as_str()).unwrap_or_default();
        if self.show_full_description {
            overview.to_string()
        } else {
            truncate_description(overview)
        }
    }
}

/// Cut text over `DESCRIPTION_LIMIT` chars down to the limit plus `...`
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

impl fmt::Debug for MovieDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieDetailView")
            .field("movie_id", &self.movie_id)
            .field("generation", &self.generation)
            .field("phase", &self.phase)
            .field("active_tab", &self.active_tab)
            .field("show_full_description", &self.show_full_description)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl Drop for MovieDetailView {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch.take() {
            handle.abort();
        }
    }
}
