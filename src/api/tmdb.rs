//! TMDB (The Movie Database) API client
//!
//! Provides multi-type search and movie/series/season metadata.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{MetadataSource, SearchBackend};
use crate::models::{Episode, MediaType, MovieRecord, SearchResult, Season, SeriesRecord};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Locale sent with every request
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("HTTP error! status: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing or proxies)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Override the request locale
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            debug!(%endpoint, attempt = retries + 1, "tmdb request");
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("language", self.language.as_str()),
                ])
                .query(params)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(TmdbError::from)?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.map_err(TmdbError::from)?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    warn!(%endpoint, wait_secs, "rate limited by tmdb, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Multi-type search, restricted to movies and TV shows
    pub async fn search_multi(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response: SearchResponse = self
            .get(
                "/search/multi",
                &[("query", query), ("page", "1"), ("include_adult", "false")],
            )
            .await?;
        Ok(response.into_results())
    }

    /// Get movie details by ID
    pub async fn movie_details(&self, id: u64) -> Result<MovieRecord> {
        let response: MovieResponse = self.get(&format!("/movie/{}", id), &[]).await?;
        Ok(response.into_record())
    }

    /// Get series details by ID
    pub async fn series_details(&self, id: u64) -> Result<SeriesRecord> {
        let response: TvResponse = self.get(&format!("/tv/{}", id), &[]).await?;
        Ok(response.into_record())
    }

    /// Get one season with its episodes
    pub async fn season(&self, id: u64, season_number: u32) -> Result<Season> {
        let endpoint = format!("/tv/{}/season/{}", id, season_number);
        let response: SeasonResponse = self.get(&endpoint, &[]).await?;
        Ok(response.into_season(season_number))
    }

    /// Get every season of a series, specials included, fetched concurrently
    pub async fn all_episodes(&self, id: u64) -> Result<Vec<Season>> {
        let series = self.series_details(id).await?;
        debug!(id, seasons = series.season_numbers.len(), "fetching all seasons");
        try_join_all(
            series
                .season_numbers
                .iter()
                .map(|&number| self.season(id, number)),
        )
        .await
    }
}

#[async_trait]
impl SearchBackend for TmdbClient {
    async fn search_multi(&self, query: &str) -> Result<Vec<SearchResult>> {
        TmdbClient::search_multi(self, query).await
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn movie_details(&self, id: u64) -> Result<MovieRecord> {
        TmdbClient::movie_details(self, id).await
    }

    async fn series_details(&self, id: u64) -> Result<SeriesRecord> {
        TmdbClient::series_details(self, id).await
    }

    async fn all_episodes(&self, id: u64) -> Result<Vec<Season>> {
        TmdbClient::all_episodes(self, id).await
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResultRaw>,
}

impl SearchResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .filter_map(|r| r.into_search_result())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResultRaw {
    id: u64,
    #[serde(default)]
    media_type: String,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
}

impl SearchResultRaw {
    fn into_search_result(self) -> Option<SearchResult> {
        // Filter out "person" and other types
        let media_type = MediaType::from_tag(&self.media_type)?;

        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|d| !d.is_empty());

        Some(SearchResult {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            poster_path: self.poster_path,
            vote_average: self.vote_average.filter(|v| *v > 0.0),
            release_date,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NamedRaw {
    name: String,
}

fn names(raw: Vec<NamedRaw>) -> Vec<String> {
    raw.into_iter().map(|n| n.name).collect()
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<NamedRaw>,
    #[serde(default)]
    production_companies: Vec<NamedRaw>,
    #[serde(default)]
    production_countries: Vec<NamedRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl MovieResponse {
    fn into_record(self) -> MovieRecord {
        MovieRecord {
            id: self.id,
            title: self.title,
            overview: self.overview.unwrap_or_default(),
            release_date: self.release_date.filter(|d| !d.is_empty()),
            runtime: self.runtime,
            vote_average: self.vote_average.unwrap_or(0.0),
            genres: names(self.genres),
            production_companies: names(self.production_companies),
            production_countries: names(self.production_countries),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    first_air_date: Option<String>,
    #[serde(default)]
    seasons: Vec<SeasonSummaryRaw>,
    #[serde(default)]
    genres: Vec<NamedRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl TvResponse {
    fn into_record(self) -> SeriesRecord {
        SeriesRecord {
            id: self.id,
            name: self.name,
            overview: self.overview.unwrap_or_default(),
            first_air_date: self.first_air_date.filter(|d| !d.is_empty()),
            vote_average: self.vote_average.unwrap_or(0.0),
            genres: names(self.genres),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            season_numbers: self.seasons.into_iter().map(|s| s.season_number).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonSummaryRaw {
    season_number: u32,
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    name: Option<String>,
    #[serde(default)]
    episodes: Vec<EpisodeRaw>,
}

impl SeasonResponse {
    fn into_season(self, season_number: u32) -> Season {
        Season {
            season_number,
            name: self.name,
            episodes: self
                .episodes
                .into_iter()
                .map(|e| Episode {
                    // 0 means the catalog has no number for it
                    episode_number: e.episode_number.filter(|n| *n > 0),
                    name: e.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    episode_number: Option<u32>,
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(media_type: &str) -> SearchResultRaw {
        SearchResultRaw {
            id: 1,
            media_type: media_type.to_string(),
            title: None,
            name: Some("Name".to_string()),
            release_date: None,
            first_air_date: Some("2008-01-20".to_string()),
            poster_path: None,
            vote_average: Some(0.0),
        }
    }

    #[test]
    fn test_media_type_filter() {
        assert!(raw("movie").into_search_result().is_some());
        assert!(raw("tv").into_search_result().is_some());
        assert!(raw("person").into_search_result().is_none());
        assert!(raw("").into_search_result().is_none());
    }

    #[test]
    fn test_title_and_date_fallbacks() {
        let result = raw("tv").into_search_result().unwrap();
        assert_eq!(result.title, "Name");
        assert_eq!(result.release_date.as_deref(), Some("2008-01-20"));
        // A zero score means unrated
        assert_eq!(result.vote_average, None);
    }

    #[test]
    fn test_season_response_drops_zero_episode_numbers() {
        let response: SeasonResponse = serde_json::from_str(
            r#"{"name": "Season 1", "episodes": [
                {"episode_number": 0, "name": "Recap"},
                {"episode_number": 1, "name": "Pilot"}
            ]}"#,
        )
        .unwrap();
        let season = response.into_season(1);
        assert_eq!(season.episodes[0].episode_number, None);
        assert_eq!(season.episodes[1].episode_number, Some(1));
    }
}
