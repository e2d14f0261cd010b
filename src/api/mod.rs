//! Data sources for the catalog
//!
//! - TMDB: multi-search and movie/series/season metadata
//! - Images: poster fetches for the image loader
//!
//! The traits are the seams the state machines depend on, so views and the
//! search engine can run against in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{MovieRecord, SearchResult, Season, SeriesRecord};

pub mod images;
pub mod tmdb;

pub use images::ImageFetcher;
pub use tmdb::{TmdbClient, TmdbError};

/// Multi-type search endpoint (movies and TV only)
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_multi(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Movie/series metadata by id
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn movie_details(&self, id: u64) -> Result<MovieRecord>;

    async fn series_details(&self, id: u64) -> Result<SeriesRecord>;

    /// Every season of a series with its episodes, specials included
    async fn all_episodes(&self, id: u64) -> Result<Vec<Season>>;
}

/// Raw image bytes by URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
