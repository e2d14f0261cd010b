//! Messages delivered to the UI loop
//!
//! Every async task (debounce timers, fetches, image loads, browser launches)
//! reports back through a single unbounded channel. The loop owns all state and
//! applies these one at a time, so the state machines never need locking.

use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::{MovieRecord, SearchResult, Season, SeriesRecord};

/// Sending half handed to every component that spawns work
pub type EventSender = UnboundedSender<AppEvent>;

#[derive(Debug)]
pub enum AppEvent {
    Search(SearchEvent),
    Movie(MovieEvent),
    Tv(TvEvent),
    Image(ImageEvent),
    Launch(LaunchEvent),
}

#[derive(Debug)]
pub enum SearchEvent {
    /// The debounce timer for `token` ran out
    DebounceElapsed { token: u64 },
    /// A search request finished
    Finished {
        token: u64,
        query: String,
        outcome: Result<Vec<SearchResult>>,
    },
}

#[derive(Debug)]
pub enum MovieEvent {
    Loaded {
        movie_id: u64,
        generation: u64,
        outcome: Result<MovieRecord>,
    },
}

#[derive(Debug)]
pub enum TvEvent {
    Loaded {
        tv_id: u64,
        generation: u64,
        outcome: Result<(SeriesRecord, Vec<Season>)>,
    },
}

#[derive(Debug)]
pub enum ImageEvent {
    Loaded { url: String, bytes: usize },
    Failed { url: String },
}

#[derive(Debug)]
pub enum LaunchEvent {
    /// Browser opened on the given page, or failed with a message
    Finished(std::result::Result<PathBuf, String>),
}
