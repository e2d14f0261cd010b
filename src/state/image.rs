//! Poster image loading
//!
//! Each poster slot starts on a low resolution placeholder, swaps to the full
//! image once it has loaded and falls back to a "No Image" tile on error.
//! Transitions happen only on load/error signals.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::api::ImageSource;
use crate::event::{AppEvent, EventSender, ImageEvent};

/// Full-size poster base
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Low resolution placeholder base
pub const DEFAULT_PLACEHOLDER_BASE: &str = "https://image.tmdb.org/t/p/w100";

pub const FALLBACK_LABEL: &str = "No Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    Loaded,
    Errored,
}

/// What a slot shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDisplay {
    Placeholder(String),
    Full(String),
    Fallback,
}

/// URL bases for posters and their placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBases {
    pub full: String,
    pub placeholder: String,
}

impl Default for ImageBases {
    fn default() -> Self {
        Self {
            full: DEFAULT_IMAGE_BASE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER_BASE.to_string(),
        }
    }
}

impl ImageBases {
    pub fn full_url(&self, path: &str) -> String {
        join(&self.full, path)
    }

    pub fn placeholder_url(&self, path: &str) -> String {
        join(&self.placeholder, path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// One poster's load state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    full_url: Option<String>,
    placeholder_url: Option<String>,
    state: ImageState,
}

impl ImageSlot {
    /// A slot without a path has nothing to load and errors immediately
    pub fn new(path: Option<&str>, bases: &ImageBases) -> Self {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => Self {
                full_url: Some(bases.full_url(path)),
                placeholder_url: Some(bases.placeholder_url(path)),
                state: ImageState::Loading,
            },
            None => Self {
                full_url: None,
                placeholder_url: None,
                state: ImageState::Errored,
            },
        }
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    pub fn full_url(&self) -> Option<&str> {
        self.full_url.as_deref()
    }

    pub fn placeholder_url(&self) -> Option<&str> {
        self.placeholder_url.as_deref()
    }

    pub fn on_load(&mut self) -> bool {
        self.transition(ImageState::Loaded)
    }

    pub fn on_error(&mut self) -> bool {
        self.transition(ImageState::Errored)
    }

    fn transition(&mut self, to: ImageState) -> bool {
        if self.state != ImageState::Loading {
            return false;
        }
        self.state = to;
        true
    }

    pub fn display(&self) -> ImageDisplay {
        match (self.state, &self.full_url, &self.placeholder_url) {
            (ImageState::Loading, _, Some(placeholder)) => {
                ImageDisplay::Placeholder(placeholder.clone())
            }
            (ImageState::Loaded, Some(full), _) => ImageDisplay::Full(full.clone()),
            _ => ImageDisplay::Fallback,
        }
    }
}

/// Poster slots keyed by full URL, each fetched at most once
pub struct PosterCache {
    bases: ImageBases,
    slots: HashMap<String, ImageSlot>,
    source: Arc<dyn ImageSource>,
    events: EventSender,
}

impl PosterCache {
    pub fn new(bases: ImageBases, source: Arc<dyn ImageSource>, events: EventSender) -> Self {
        Self {
            bases,
            slots: HashMap::new(),
            source,
            events,
        }
    }

    /// Slot for a poster path, starting its fetch the first time it is seen
    pub fn request(&mut self, path: Option<&str>) -> ImageSlot {
        let slot = ImageSlot::new(path, &self.bases);
        let Some(url) = slot.full_url().map(str::to_string) else {
            return slot;
        };

        if let Some(existing) = self.slots.get(&url) {
            return existing.clone();
        }

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let fetch_url = url.clone();
        tokio::spawn(async move {
            let event = match source.fetch(&fetch_url).await {
                Ok(bytes) => ImageEvent::Loaded {
                    url: fetch_url,
                    bytes: bytes.len(),
                },
                Err(err) => {
                    debug!(url = %fetch_url, error = %err, "poster failed");
                    ImageEvent::Failed { url: fetch_url }
                }
            };
            let _ = events.send(AppEvent::Image(event));
        });

        self.slots.insert(url, slot.clone());
        slot
    }

    /// Current slot for a path without starting a fetch
    pub fn get(&self, path: Option<&str>) -> ImageSlot {
        let slot = ImageSlot::new(path, &self.bases);
        slot.full_url()
            .and_then(|url| self.slots.get(url))
            .cloned()
            .unwrap_or(slot)
    }

    pub fn update(&mut self, event: ImageEvent) -> bool {
        match event {
            ImageEvent::Loaded { url, .. } => {
                self.slots.get_mut(&url).is_some_and(ImageSlot::on_load)
            }
            ImageEvent::Failed { url } => {
                self.slots.get_mut(&url).is_some_and(ImageSlot::on_error)
            }
        }
    }

    /// Drop every slot whose poster is not in `keep`. Late fetch results for
    /// dropped slots are ignored by `update`.
    pub fn retain<'a>(&mut self, keep: impl IntoIterator<Item = Option<&'a str>>) -> usize {
        let wanted: HashSet<String> = keep
            .into_iter()
            .filter_map(|path| ImageSlot::new(path, &self.bases).full_url().map(str::to_string))
            .collect();
        let before = self.slots.len();
        self.slots.retain(|url, _| wanted.contains(url));
        let evicted = before - self.slots.len();
        if evicted > 0 {
            debug!(evicted, kept = self.slots.len(), "evicted poster slots");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
