//! Video embed renderer
//!
//! Builds third-party player URLs and iframe markup for a movie or a single
//! episode, and tracks the global input listeners a mounted player holds.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod launcher;
pub mod listeners;
pub mod session;

pub use launcher::{BrowserLauncher, LauncherError};
pub use listeners::{GlobalListener, ListenerGuard, ListenerRegistry};
pub use session::EmbedSession;

/// Default movie player root
pub const DEFAULT_MOVIE_EMBED_BASE: &str = "https://vidlink.pro/movie";

/// Default episode player root
pub const DEFAULT_TV_EMBED_BASE: &str = "https://embed.vidsrc.pk";

/// Permissions granted to the embedded player
pub const IFRAME_ALLOW: &str = "autoplay; fullscreen; picture-in-picture";

/// What a player is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmbedTarget {
    Movie { id: u64 },
    Episode { tv_id: u64, season: u32, episode: u32 },
}

impl fmt::Display for EmbedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedTarget::Movie { id } => write!(f, "movie {}", id),
            EmbedTarget::Episode {
                tv_id,
                season,
                episode,
            } => write!(f, "tv {} S{:02}E{:02}", tv_id, season, episode),
        }
    }
}

/// Player URL roots for movies and episodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedProviders {
    pub movie_base: String,
    pub tv_base: String,
}

impl Default for EmbedProviders {
    fn default() -> Self {
        Self::new(DEFAULT_MOVIE_EMBED_BASE, DEFAULT_TV_EMBED_BASE)
    }
}

impl EmbedProviders {
    pub fn new(movie_base: impl Into<String>, tv_base: impl Into<String>) -> Self {
        Self {
            movie_base: movie_base.into().trim_end_matches('/').to_string(),
            tv_base: tv_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Player URL for a target
    pub fn url(&self, target: &EmbedTarget) -> String {
        match target {
            EmbedTarget::Movie { id } => {
                format!("{}/{}?nextbutton=true", self.movie_base, id)
            }
            EmbedTarget::Episode {
                tv_id,
                season,
                episode,
            } => format!(
                "{}/{}/{}/{}?nextbutton=true",
                self.tv_base, tv_id, season, episode
            ),
        }
    }

    /// iframe element for a target
    pub fn iframe_html(&self, target: &EmbedTarget) -> String {
        format!(
            concat!(
                r#"<iframe src="{src}" title="{title}" width="100%" height="100%" "#,
                r#"frameborder="0" referrerpolicy="no-referrer" loading="lazy" "#,
                r#"allow="{allow}" allowfullscreen></iframe>"#
            ),
            src = escape_attr(&self.url(target)),
            title = escape_attr(&title(target)),
            allow = IFRAME_ALLOW,
        )
    }

    /// Standalone page hosting the iframe, for opening in a browser
    pub fn page_html(&self, target: &EmbedTarget) -> String {
        format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
                "<title>{title}</title>\n",
                "<style>html,body{{margin:0;height:100%;background:#000}}</style>\n",
                "</head>\n<body>\n{iframe}\n</body>\n</html>\n"
            ),
            title = escape_attr(&title(target)),
            iframe = self.iframe_html(target),
        )
    }
}

/// Accessible title for the player frame
pub fn title(target: &EmbedTarget) -> String {
    match target {
        EmbedTarget::Movie { .. } => "Movie Player".to_string(),
        EmbedTarget::Episode {
            season, episode, ..
        } => format!("TV Show Player - S{}E{}", season, episode),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
