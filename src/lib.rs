//! cinetui - terminal front end for movie and TV metadata
//!
//! A keyboard-first interface for searching the catalog, reading movie
//! details, choosing seasons and episodes and opening the embedded player.
//!
//! # Modules
//!
//! - `models` - Search results, movie/series records, seasons and episodes
//! - `api` - TMDB client, image fetcher and the traits the views depend on
//! - `state` - Search engine, detail controllers and the image loader
//! - `embed` - Player URLs, scoped global listeners and the browser launcher
//! - `ui` - TUI components
//! - `app` - Application state and navigation
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod embed;
pub mod event;
pub mod models;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use models::{Episode, MediaType, MovieRecord, SearchResult, Season, SeriesRecord};

pub use api::{ImageFetcher, TmdbClient, TmdbError};
pub use app::{App, AppState, Services};
pub use config::Config;
pub use embed::{EmbedProviders, EmbedSession, EmbedTarget, ListenerRegistry};
pub use state::{ImageSlot, MovieDetailView, SearchEngine, TvDetailView};
