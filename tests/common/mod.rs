//! In-memory catalog shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use cinetui::api::{ImageSource, MetadataSource, SearchBackend};
use cinetui::app::{App, Services};
use cinetui::embed::{BrowserLauncher, EmbedProviders};
use cinetui::event::AppEvent;
use cinetui::models::{Episode, MediaType, MovieRecord, SearchResult, Season, SeriesRecord};
use cinetui::state::ImageBases;

/// Catalog backed by maps, with per-query latency and a failure switch
#[derive(Default)]
pub struct FakeCatalog {
    pub results: HashMap<String, Vec<SearchResult>>,
    pub latency: HashMap<String, Duration>,
    pub movies: HashMap<u64, MovieRecord>,
    pub series: HashMap<u64, (SeriesRecord, Vec<Season>)>,
    pub offline: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    /// Hold back one call, named the way `calls()` records it
    pub fn with_latency(mut self, call: &str, latency: Duration) -> Self {
        self.latency.insert(call.to_string(), latency);
        self
    }

    pub fn with_movie(mut self, movie: MovieRecord) -> Self {
        self.movies.insert(movie.id, movie);
        self
    }

    pub fn with_series(mut self, series: SeriesRecord, seasons: Vec<Season>) -> Self {
        self.series.insert(series.id, (series, seasons));
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String) -> Result<()> {
        let latency = self.latency.get(&call).copied();
        self.calls.lock().unwrap().push(call);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("network unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for FakeCatalog {
    async fn search_multi(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.record(format!("search:{}", query)).await?;
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MetadataSource for FakeCatalog {
    async fn movie_details(&self, id: u64) -> Result<MovieRecord> {
        self.record(format!("movie:{}", id)).await?;
        self.movies
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("movie {} not found", id))
    }

    async fn series_details(&self, id: u64) -> Result<SeriesRecord> {
        self.record(format!("series:{}", id)).await?;
        self.series
            .get(&id)
            .map(|(s, _)| s.clone())
            .ok_or_else(|| anyhow!("series {} not found", id))
    }

    async fn all_episodes(&self, id: u64) -> Result<Vec<Season>> {
        self.record(format!("episodes:{}", id)).await?;
        self.series
            .get(&id)
            .map(|(_, seasons)| seasons.clone())
            .ok_or_else(|| anyhow!("series {} not found", id))
    }
}

#[async_trait]
impl ImageSource for FakeCatalog {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.record(format!("image:{}", url)).await?;
        if url.contains("missing") {
            return Err(anyhow!("404"));
        }
        Ok(vec![0u8; 16])
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn movie_result(id: u64, title: &str) -> SearchResult {
    SearchResult {
        id,
        media_type: MediaType::Movie,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        vote_average: Some(7.5),
        release_date: Some("2008-07-16".to_string()),
    }
}

pub fn tv_result(id: u64, title: &str) -> SearchResult {
    SearchResult {
        id,
        media_type: MediaType::Tv,
        title: title.to_string(),
        poster_path: None,
        vote_average: Some(8.5),
        release_date: Some("1992-09-05".to_string()),
    }
}

/// The usual three Batman hits: movie, series, movie
pub fn batman_results() -> Vec<SearchResult> {
    vec![
        movie_result(155, "The Dark Knight"),
        tv_result(2098, "Batman: The Animated Series"),
        movie_result(414906, "The Batman"),
    ]
}

pub fn movie(id: u64, title: &str, overview: &str) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        overview: overview.to_string(),
        release_date: Some("2010-07-15".to_string()),
        runtime: Some(148),
        vote_average: 8.4,
        genres: vec!["Action".to_string(), "Science Fiction".to_string()],
        production_companies: vec!["Syncopy".to_string()],
        production_countries: vec!["United States of America".to_string()],
        poster_path: Some("/inception.jpg".to_string()),
        backdrop_path: None,
    }
}

pub fn series(id: u64, name: &str) -> SeriesRecord {
    SeriesRecord {
        id,
        name: name.to_string(),
        overview: String::new(),
        first_air_date: Some("2008-01-20".to_string()),
        vote_average: 8.9,
        genres: vec!["Drama".to_string()],
        poster_path: None,
        backdrop_path: None,
        season_numbers: vec![0, 1, 2],
    }
}

pub fn season(number: u32, episodes: &[u32]) -> Season {
    Season {
        season_number: number,
        name: Some(format!("Season {}", number)),
        episodes: episodes
            .iter()
            .map(|&n| Episode {
                episode_number: Some(n),
                name: Some(format!("Episode {}x{:02}", number, n)),
            })
            .collect(),
    }
}

/// Specials first and seasons out of order, as the catalog may return them
pub fn breaking_bad_seasons() -> Vec<Season> {
    vec![
        season(0, &[1, 2]),
        season(2, &[1, 2, 3, 4, 5]),
        season(1, &[3, 1, 2]),
    ]
}

// =============================================================================
// Harness
// =============================================================================

pub fn services(catalog: Arc<FakeCatalog>, pages: &Path) -> Services {
    Services {
        search: catalog.clone(),
        metadata: catalog.clone(),
        images: catalog,
        providers: EmbedProviders::default(),
        image_bases: ImageBases::default(),
        debounce: Duration::from_millis(350),
        launcher: BrowserLauncher::new("true", pages),
    }
}

/// App wired to the catalog; player pages land in the returned directory,
/// which must outlive the app
pub fn app(catalog: Arc<FakeCatalog>) -> (App, UnboundedReceiver<AppEvent>, TempDir) {
    let pages = tempdir().expect("tempdir");
    let (tx, rx) = mpsc::unbounded_channel();
    (App::new(services(catalog, pages.path()), tx), rx, pages)
}

/// Next event from the loop channel, failing the test after a while
pub async fn next_event(rx: &mut UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Feed events to the app until nothing arrives for a full second
pub async fn drain(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
        app.handle_event(event);
    }
}
