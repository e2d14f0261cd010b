//! Browser launcher
//!
//! Writes the player page to a temp file and hands it to the platform opener,
//! since a terminal cannot host the iframe itself.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use super::{EmbedProviders, EmbedTarget};

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Opener '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to write player page: {0}")]
    WriteFailed(std::io::Error),
    #[error("Failed to start opener: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Opener exited with status {0}")]
    Exited(i32),
}

/// Opens player pages in the system browser
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    opener: String,
    page_dir: PathBuf,
}

impl Default for BrowserLauncher {
    fn default() -> Self {
        Self::new(default_opener(), std::env::temp_dir().join("cinetui"))
    }
}

impl BrowserLauncher {
    pub fn new(opener: impl Into<String>, page_dir: impl Into<PathBuf>) -> Self {
        Self {
            opener: opener.into(),
            page_dir: page_dir.into(),
        }
    }

    pub fn opener(&self) -> &str {
        &self.opener
    }

    /// Path the page for `target` is written to
    pub fn page_path(&self, target: &EmbedTarget) -> PathBuf {
        let name = match target {
            EmbedTarget::Movie { id } => format!("movie-{}.html", id),
            EmbedTarget::Episode {
                tv_id,
                season,
                episode,
            } => format!("tv-{}-s{}e{}.html", tv_id, season, episode),
        };
        self.page_dir.join(name)
    }

    /// Write the player page without opening it
    pub async fn write_page(
        &self,
        target: &EmbedTarget,
        providers: &EmbedProviders,
    ) -> Result<PathBuf, LauncherError> {
        tokio::fs::create_dir_all(&self.page_dir)
            .await
            .map_err(LauncherError::WriteFailed)?;
        let path = self.page_path(target);
        tokio::fs::write(&path, providers.page_html(target))
            .await
            .map_err(LauncherError::WriteFailed)?;
        Ok(path)
    }

    /// Write the player page and open it
    pub async fn open(
        &self,
        target: &EmbedTarget,
        providers: &EmbedProviders,
    ) -> Result<PathBuf, LauncherError> {
        let path = self.write_page(target, providers).await?;
        self.open_path(&path).await?;
        info!(%target, path = %path.display(), "opened player page");
        Ok(path)
    }

    async fn open_path(&self, path: &Path) -> Result<(), LauncherError> {
        let mut cmd = Command::new(&self.opener);
        cmd.arg(path);
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let status = cmd.status().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LauncherError::NotFound(self.opener.clone())
            } else {
                LauncherError::StartFailed(e)
            }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(LauncherError::Exited(status.code().unwrap_or(-1)))
        }
    }
}

/// Platform command that opens a file in the default browser
pub fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}
