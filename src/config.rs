//! Configuration management for cinetui
//!
//! Handles config file loading/saving and API key lookup.
//! Config is stored at ~/.config/cinetui/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::embed::{EmbedProviders, DEFAULT_MOVIE_EMBED_BASE, DEFAULT_TV_EMBED_BASE};
use crate::state::image::{ImageBases, DEFAULT_IMAGE_BASE, DEFAULT_PLACEHOLDER_BASE};
use crate::state::search::DEBOUNCE_DELAY;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: Option<String>,
    /// TMDB API root
    pub tmdb_base_url: String,
    /// Locale sent with every catalog request
    pub language: String,
    /// Pause in typing before a search is sent
    pub debounce_ms: u64,
    /// Movie player root
    pub movie_embed_base: String,
    /// Episode player root
    pub tv_embed_base: String,
    /// Full-size poster base
    pub image_base_url: String,
    /// Placeholder poster base
    pub placeholder_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            debounce_ms: DEBOUNCE_DELAY.as_millis() as u64,
            movie_embed_base: DEFAULT_MOVIE_EMBED_BASE.to_string(),
            tv_embed_base: DEFAULT_TV_EMBED_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
            placeholder_base_url: DEFAULT_PLACEHOLDER_BASE.to_string(),
        }
    }
}

impl Config {
    /// Get config file path (~/.config/cinetui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinetui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// API key: `TMDB_API_KEY` first, then the config file
    pub fn tmdb_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.tmdb_api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.tmdb_api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "No TMDB API key. Set {} or add tmdb_api_key to {}",
                API_KEY_ENV,
                Self::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string())
            )
        })
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn providers(&self) -> EmbedProviders {
        EmbedProviders::new(&self.movie_embed_base, &self.tv_embed_base)
    }

    pub fn image_bases(&self) -> ImageBases {
        ImageBases {
            full: self.image_base_url.clone(),
            placeholder: self.placeholder_base_url.clone(),
        }
    }
}
