//! Data structures shared across cinetui
//!
//! Organized by domain:
//! - **Search**: multi-search hits from the catalog API
//! - **Movies**: full movie records for the detail view
//! - **Series**: series records, seasons and episodes

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Search Models
// =============================================================================

/// Media type discriminator for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Parse a catalog media tag. Anything but `movie`/`tv` (e.g. `person`) is rejected.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }

    /// Lowercase tag as used by the catalog API
    pub fn tag(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// One hit from the multi-type search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub media_type: MediaType,
    /// Movie `title` or series `name`
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    /// Movie `release_date` or series `first_air_date`
    pub release_date: Option<String>,
}

impl SearchResult {
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

// =============================================================================
// Movie Models
// =============================================================================

/// Full movie record used by the movie detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub vote_average: f32,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl MovieRecord {
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Runtime as `"2h 5m"`, or `"45m"` under an hour
    pub fn runtime_str(&self) -> Option<String> {
        self.runtime.filter(|m| *m > 0).map(format_runtime)
    }

    /// Rating, only when the catalog has one
    pub fn rating(&self) -> Option<f32> {
        (self.vote_average > 0.0).then_some(self.vote_average)
    }

    /// First two genres, comma separated
    pub fn genres_str(&self) -> Option<String> {
        if self.genres.is_empty() {
            return None;
        }
        Some(self.genres.iter().take(2).cloned().collect::<Vec<_>>().join(", "))
    }

    /// First two production companies, with `& others` when there are more
    pub fn companies_str(&self) -> Option<String> {
        if self.production_companies.is_empty() {
            return None;
        }
        let mut names = self
            .production_companies
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if self.production_companies.len() > 2 {
            names.push_str(" & others");
        }
        Some(names)
    }

    pub fn countries_str(&self) -> Option<String> {
        if self.production_countries.is_empty() {
            None
        } else {
            Some(self.production_countries.join(", "))
        }
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(year) = self.year() {
            write!(f, " ({})", year)?;
        }
        if let Some(runtime) = self.runtime_str() {
            write!(f, " - {}", runtime)?;
        }
        if let Some(rating) = self.rating() {
            write!(f, " - ★ {:.1}", rating)?;
        }
        Ok(())
    }
}

// =============================================================================
// Series Models
// =============================================================================

/// Series record used by the TV detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub first_air_date: Option<String>,
    pub vote_average: f32,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Season numbers advertised by the catalog, specials included
    pub season_numbers: Vec<u32>,
}

impl SeriesRecord {
    pub fn year(&self) -> Option<u16> {
        self.first_air_date.as_deref().and_then(extract_year)
    }
}

impl fmt::Display for SeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(year) = self.year() {
            write!(f, " ({})", year)?;
        }
        write!(f, " - {} seasons", self.season_numbers.iter().filter(|n| **n > 0).count())
    }
}

/// A season with its episode list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    pub name: Option<String>,
    pub episodes: Vec<Episode>,
}

impl Season {
    /// Season 0 holds specials
    pub fn is_specials(&self) -> bool {
        self.season_number == 0
    }

    /// Sort episodes ascending; unnumbered episodes go last
    pub fn sort_episodes(&mut self) {
        self.episodes
            .sort_by_key(|e| (e.episode_number.is_none(), e.episode_number));
    }

    /// Lowest numbered episode, falling back to 1 when none carries a number
    pub fn first_episode_number(&self) -> u32 {
        self.episodes
            .iter()
            .filter_map(|e| e.episode_number)
            .min()
            .unwrap_or(1)
    }

    /// Position of an episode number in the episode list
    pub fn position_of(&self, episode_number: u32) -> Option<usize> {
        self.episodes
            .iter()
            .position(|e| e.episode_number == Some(episode_number))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {} ({} episodes)",
            self.season_number,
            self.episodes.len()
        )
    }
}

/// A single episode entry in a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: Option<u32>,
    pub name: Option<String>,
}

impl Episode {
    /// Episode name, or `Episode N` when the catalog has none
    pub fn label(&self) -> String {
        match (&self.name, self.episode_number) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(n)) => format!("Episode {}", n),
            _ => "Episode".to_string(),
        }
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.episode_number {
            Some(n) => write!(f, "E{:02} - {}", n, self.label()),
            None => write!(f, "E?? - {}", self.label()),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

/// Format minutes as `"2h 5m"` or `"45m"`
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
