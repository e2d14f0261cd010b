//! TV detail view controller
//!
//! Mounted per series id. Loads the series record and every season, then
//! keeps two independent selections: the season being browsed and the
//! season/episode pair being played. Browsing never touches the player.

use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{next_generation, ListState, LoadPhase};
use crate::api::MetadataSource;
use crate::embed::{EmbedProviders, EmbedSession, EmbedTarget, ListenerRegistry};
use crate::event::{AppEvent, EventSender, TvEvent};
use crate::models::{Season, SeriesRecord};

pub const TV_LOAD_ERROR: &str = "Failed to load TV show details. Please try again.";
pub const NO_SEASONS_MESSAGE: &str = "No season or episode data available for this series.";
pub const NO_EPISODES_MESSAGE: &str = "No episodes found for this season.";
pub const NO_SELECTION_MESSAGE: &str = "Select an episode to begin watching.";

// =============================================================================
// Selection
// =============================================================================

/// Browsed season and playing episode, each settable on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TvSelection {
    pub viewing_season: Option<u32>,
    pub playing_season: Option<u32>,
    pub playing_episode: Option<u32>,
}

impl TvSelection {
    /// Start on the first season's first episode. `seasons` must be normalized.
    pub fn initial(seasons: &[Season]) -> Self {
        match seasons.first() {
            Some(first) => Self {
                viewing_season: Some(first.season_number),
                playing_season: Some(first.season_number),
                playing_episode: Some(first.first_episode_number()),
            },
            None => Self::default(),
        }
    }

    pub fn select_season(&mut self, season: u32) {
        self.viewing_season = Some(season);
    }

    pub fn select_episode(&mut self, season: u32, episode: u32) {
        self.playing_season = Some(season);
        self.playing_episode = Some(episode);
    }

    pub fn playing(&self) -> Option<(u32, u32)> {
        self.playing_season.zip(self.playing_episode)
    }

    pub fn is_playing_viewed_season(&self) -> bool {
        self.viewing_season.is_some() && self.viewing_season == self.playing_season
    }
}

/// Drop specials, order seasons and their episodes ascending
pub fn normalize_seasons(seasons: Vec<Season>) -> Vec<Season> {
    let mut seasons: Vec<Season> = seasons.into_iter().filter(|s| !s.is_specials()).collect();
    seasons.sort_by_key(|s| s.season_number);
    for season in &mut seasons {
        season.sort_episodes();
    }
    seasons
}

/// Loaded series with its normalized seasons
#[derive(Debug, Clone, PartialEq)]
pub struct TvContent {
    pub series: SeriesRecord,
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TvFocus {
    #[default]
    Seasons,
    Episodes,
}

// =============================================================================
// View
// =============================================================================

pub struct TvDetailView {
    tv_id: u64,
    generation: u64,
    phase: LoadPhase<TvContent>,
    selection: TvSelection,
    focus: TvFocus,
    season_list: ListState,
    episode_list: ListState,
    player: Option<EmbedSession>,
    source: Arc<dyn MetadataSource>,
    providers: EmbedProviders,
    listeners: ListenerRegistry,
    events: EventSender,
    fetch: Option<JoinHandle<()>>,
}

impl TvDetailView {
    /// Mount the view and start fetching
    pub fn mount(
        tv_id: u64,
        source: Arc<dyn MetadataSource>,
        providers: EmbedProviders,
        listeners: ListenerRegistry,
        events: EventSender,
    ) -> Self {
        let mut view = Self {
            tv_id,
            generation: 0,
            phase: LoadPhase::Loading,
            selection: TvSelection::default(),
            focus: TvFocus::Seasons,
            season_list: ListState::default(),
            episode_list: ListState::default(),
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

        let tv_id = self.tv_id;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        debug!(tv_id, generation, "fetching series");

        self.fetch = Some(tokio::spawn(async move {
            let outcome = tokio::try_join!(source.series_details(tv_id), source.all_episodes(tv_id));
            let _ = events.send(AppEvent::Tv(TvEvent::Loaded {
                tv_id,
                generation,
                outcome,
            }));
        }));
    }

    /// Re-run both fetches. Only allowed from the failed state.
    pub fn retry(&mut self) -> bool {
        if !self.phase.is_failed() {
            return false;
        }
        self.load();
        true
    }

    /// Apply a fetch completion. Completions for another mount are ignored.
    pub fn update(&mut self, event: TvEvent) -> bool {
        let TvEvent::Loaded {
            tv_id,
            generation,
            outcome,
        } = event;

        if tv_id != self.tv_id || generation != self.generation {
            debug!(tv_id, generation, "dropping stale series response");
            return false;
        }

        self.fetch = None;
        match outcome {
            Ok((series, seasons)) => {
                let seasons = normalize_seasons(seasons);
                debug!(tv_id, seasons = seasons.len(), "series loaded");
                self.selection = TvSelection::initial(&seasons);
                self.season_list = ListState::new(seasons.len());
                self.phase = LoadPhase::Loaded(TvContent { series, seasons });
                self.sync_episode_list();
                self.remount_player();
            }
            Err(err) => {
                warn!(tv_id, error = %err, "series fetch failed");
                self.phase = LoadPhase::Failed(TV_LOAD_ERROR.to_string());
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn tv_id(&self) -> u64 {
        self.tv_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> &LoadPhase<TvContent> {
        &self.phase
    }

    pub fn series(&self) -> Option<&SeriesRecord> {
        self.phase.loaded().map(|c| &c.series)
    }

    pub fn seasons(&self) -> &[Season] {
        self.phase
            .loaded()
            .map(|c| c.seasons.as_slice())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn selection(&self) -> TvSelection {
        self.selection
    }

    pub fn focus(&self) -> TvFocus {
        self.focus
    }

    pub fn season_list(&self) -> &ListState {
        &self.season_list
    }

    pub fn season_list_mut(&mut self) -> &mut ListState {
        &mut self.season_list
    }

    pub fn episode_list(&self) -> &ListState {
        &self.episode_list
    }

    pub fn episode_list_mut(&mut self) -> &mut ListState {
        &mut self.episode_list
    }

    pub fn player(&self) -> Option<&EmbedSession> {
        self.player.as_ref()
    }

    /// Season currently browsed
    pub fn viewed_season(&self) -> Option<&Season> {
        let number = self.selection.viewing_season?;
        self.seasons().iter().find(|s| s.season_number == number)
    }

    /// Index of the playing episode in the browsed season, when the browsed
    /// season is the playing one
    pub fn scroll_target(&self) -> Option<usize> {
        if !self.selection.is_playing_viewed_season() {
            return None;
        }
        let episode = self.selection.playing_episode?;
        self.viewed_season()?.position_of(episode)
    }

    /// Empty-state text for the season/episode panel, if any applies
    pub fn empty_message(&self) -> Option<&'static str> {
        self.phase.loaded()?;
        if self.seasons().is_empty() {
            Some(NO_SEASONS_MESSAGE)
        } else if self.viewed_season().is_some_and(|s| s.episodes.is_empty()) {
            Some(NO_EPISODES_MESSAGE)
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Browse another season. The player is left alone.
    pub fn select_season(&mut self, season: u32) -> bool {
        let Some(index) = self.seasons().iter().position(|s| s.season_number == season) else {
            return false;
        };
        self.selection.select_season(season);
        self.season_list.select(index);
        self.sync_episode_list();
        true
    }

    /// Play an episode and remount the player on it
    pub fn select_episode(&mut self, season: u32, episode: u32) -> bool {
        if self.phase.loaded().is_none() {
            return false;
        }
        self.selection.select_episode(season, episode);
        self.sync_episode_list();
        self.remount_player();
        true
    }

    /// Cursor follows the playing episode only inside the playing season
    fn sync_episode_list(&mut self) {
        let len = self.viewed_season().map_or(0, |s| s.episodes.len());
        let target = self.scroll_target();
        self.episode_list.reset(len);
        if let Some(index) = target {
            self.episode_list.select(index);
        }
    }

    fn remount_player(&mut self) {
        let target = self
            .selection
            .playing()
            .map(|(season, episode)| EmbedTarget::Episode {
                tv_id: self.tv_id,
                season,
                episode,
            });

        if self.player.as_ref().map(|p| *p.target()) == target {
            return;
        }
        // Old listeners go before new ones are installed
        self.player = None;
        self.player =
            target.map(|t| EmbedSession::mount(t, &self.providers, &self.listeners));
    }

    // -------------------------------------------------------------------------
    // Keyboard Navigation
    // -------------------------------------------------------------------------

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            TvFocus::Seasons => TvFocus::Episodes,
            TvFocus::Episodes => TvFocus::Seasons,
        };
    }

    pub fn move_up(&mut self) {
        match self.focus {
            TvFocus::Seasons => self.step_season(false),
            TvFocus::Episodes => self.episode_list.up(),
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            TvFocus::Seasons => self.step_season(true),
            TvFocus::Episodes => self.episode_list.down(),
        }
    }

    fn step_season(&mut self, forward: bool) {
        let mut cursor = self.season_list.clone();
        if forward {
            cursor.down();
        } else {
            cursor.up();
        }
        if let Some(number) = self.seasons().get(cursor.selected).map(|s| s.season_number) {
            self.select_season(number);
        }
    }

    /// Enter: seasons hand focus to the episode strip, episodes start playing
    pub fn activate(&mut self) -> bool {
        match self.focus {
            TvFocus::Seasons => {
                if self.viewed_season().is_some_and(|s| !s.episodes.is_empty()) {
                    self.focus = TvFocus::Episodes;
                    true
                } else {
                    false
                }
            }
            TvFocus::Episodes => {
                let picked = self.viewed_season().and_then(|s| {
                    s.episodes
                        .get(self.episode_list.selected)
                        .and_then(|e| e.episode_number)
                        .map(|e| (s.season_number, e))
                });
                match picked {
                    Some((season, episode)) => self.select_episode(season, episode),
                    None => false,
                }
            }
        }
    }
}

impl fmt::Debug for TvDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvDetailView")
            .field("tv_id", &self.tv_id)
            .field("generation", &self.generation)
            .field("phase", &self.phase)
            .field("selection", &self.selection)
            .field("focus", &self.focus)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl Drop for TvDetailView {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Episode;

    fn season(number: u32, episodes: &[Option<u32>]) -> Season {
        Season {
            season_number: number,
            name: None,
            episodes: episodes
                .iter()
                .map(|n| Episode {
                    episode_number: *n,
                    name: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_normalize_drops_specials_and_sorts() {
        let seasons = normalize_seasons(vec![
            season(2, &[Some(2), Some(1)]),
            season(0, &[Some(1)]),
            season(1, &[Some(3), None, Some(1)]),
        ]);
        let numbers: Vec<_> = seasons.iter().map(|s| s.season_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        let first: Vec<_> = seasons[0].episodes.iter().map(|e| e.episode_number).collect();
        assert_eq!(first, vec![Some(1), Some(3), None]);
    }

    #[test]
    fn test_initial_selection() {
        let seasons = normalize_seasons(vec![season(3, &[Some(2), Some(5)]), season(4, &[])]);
        let selection = TvSelection::initial(&seasons);
        assert_eq!(selection.viewing_season, Some(3));
        assert_eq!(selection.playing_season, Some(3));
        assert_eq!(selection.playing_episode, Some(2));

        assert_eq!(TvSelection::initial(&[]), TvSelection::default());
    }

    #[test]
    fn test_selection_fields_are_independent() {
        let mut selection = TvSelection::initial(&[season(1, &[Some(1)])]);
        selection.select_season(2);
        assert_eq!(selection.playing(), Some((1, 1)));
        assert!(!selection.is_playing_viewed_season());

        selection.select_episode(2, 4);
        assert_eq!(selection.viewing_season, Some(2));
        assert!(selection.is_playing_viewed_season());
    }
}
