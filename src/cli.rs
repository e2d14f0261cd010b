//! CLI - Command Line Interface for cinetui
//!
//! Every catalog lookup the TUI does is scriptable. Output is JSON when asked
//! for or when stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Search for content
//! cinetui search "the batman" --json
//!
//! # Details
//! cinetui movie 414906
//! cinetui tv 1396 --season 2
//!
//! # Player URLs
//! cinetui embed movie 414906
//! cinetui embed tv 1396 -s 1 -e 3 --html
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::embed::EmbedTarget;
use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Catalog has no such id
    NotFound = 4,
    /// Search matched nothing
    NoResults = 5,
    /// Browser could not be opened
    LaunchFailed = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// cinetui - terminal front end for movie and TV metadata
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "cinetui",
    version,
    about = "Search movies and TV shows and open their players from the terminal",
    long_about = "A keyboard-first terminal interface for browsing movie and TV \
                  metadata, picking seasons and episodes and opening the player.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  cinetui                              Launch interactive TUI\n\
                  cinetui search \"blade runner\"        Search for content\n\
                  cinetui tv 1396 --season 1           List a season's episodes\n\
                  cinetui embed tv 1396 -s 1 -e 3      Print an episode player URL"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie
    #[command(visible_alias = "m")]
    Movie(MovieCmd),

    /// Get details, seasons and episodes for a TV show
    Tv(TvCmd),

    /// Print (or open) the player for a movie or episode
    #[command(visible_alias = "e")]
    Embed(EmbedCmd),
}

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "8")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Media type filter for search
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

impl MediaTypeFilter {
    pub fn matches(&self, media_type: MediaType) -> bool {
        matches!(
            (self, media_type),
            (MediaTypeFilter::Movie, MediaType::Movie) | (MediaTypeFilter::Tv, MediaType::Tv)
        )
    }
}

/// Get movie details by TMDB id
#[derive(Args, Debug)]
pub struct MovieCmd {
    /// TMDB movie id
    #[arg(required = true)]
    pub id: u64,

    /// Print the full description instead of the first 150 characters
    #[arg(long)]
    pub full: bool,
}

/// Get TV show details by TMDB id
#[derive(Args, Debug)]
pub struct TvCmd {
    /// TMDB series id
    #[arg(required = true)]
    pub id: u64,

    /// Only list this season's episodes
    #[arg(long, short = 's')]
    pub season: Option<u32>,
}

/// Kind of content to embed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    Movie,
    Tv,
}

/// Build the player URL for a movie or an episode
#[derive(Args, Debug)]
pub struct EmbedCmd {
    /// movie or tv
    #[arg(value_enum)]
    pub kind: EmbedKind,

    /// TMDB id
    pub id: u64,

    /// Season number (tv only)
    #[arg(long, short = 's')]
    pub season: Option<u32>,

    /// Episode number (tv only)
    #[arg(long, short = 'e')]
    pub episode: Option<u32>,

    /// Print the iframe markup instead of the URL
    #[arg(long)]
    pub html: bool,

    /// Open the player page in the system browser
    #[arg(long, short = 'o')]
    pub open: bool,
}

impl EmbedCmd {
    /// Resolve the target, checking season/episode against the kind
    pub fn target(&self) -> Result<EmbedTarget, &'static str> {
        match (self.kind, self.season, self.episode) {
            (EmbedKind::Movie, None, None) => Ok(EmbedTarget::Movie { id: self.id }),
            (EmbedKind::Movie, _, _) => Err("--season/--episode only apply to tv"),
            (EmbedKind::Tv, Some(season), Some(episode)) => Ok(EmbedTarget::Episode {
                tv_id: self.id,
                season,
                episode,
            }),
            (EmbedKind::Tv, _, _) => Err("tv embeds need both --season and --episode"),
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Player lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub target: EmbedTarget,
    pub url: String,
    pub iframe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened: Option<PathBuf>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print plain text lines
    pub fn lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: std::fmt::Display,
    {
        for line in lines {
            println!("{}", line);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["cinetui"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["cinetui", "search", "batman", "-t", "tv"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "batman");
            assert_eq!(cmd.limit, 8);
            assert_eq!(cmd.media_type, Some(MediaTypeFilter::Tv));
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "cinetui",
            "--json",
            "--quiet",
            "--config",
            "/tmp/cinetui.toml",
            "movie",
            "27205",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cinetui.toml")));
        assert!(matches!(cli.command, Some(Command::Movie(MovieCmd { id: 27205, .. }))));
    }

    #[test]
    fn test_embed_tv_target() {
        let cli = Cli::parse_from(["cinetui", "embed", "tv", "1396", "-s", "2", "-e", "5"]);
        let Some(Command::Embed(cmd)) = cli.command else {
            panic!("Expected Embed command");
        };
        assert_eq!(
            cmd.target(),
            Ok(EmbedTarget::Episode {
                tv_id: 1396,
                season: 2,
                episode: 5
            })
        );
    }

    #[test]
    fn test_embed_target_validation() {
        let cmd = |kind, season, episode| EmbedCmd {
            kind,
            id: 1,
            season,
            episode,
            html: false,
            open: false,
        };
        assert!(cmd(EmbedKind::Movie, None, None).target().is_ok());
        assert!(cmd(EmbedKind::Movie, Some(1), None).target().is_err());
        assert!(cmd(EmbedKind::Tv, Some(1), None).target().is_err());
        assert!(cmd(EmbedKind::Tv, None, None).target().is_err());
    }

    #[test]
    fn test_media_type_filter() {
        assert!(MediaTypeFilter::Movie.matches(MediaType::Movie));
        assert!(!MediaTypeFilter::Movie.matches(MediaType::Tv));
        assert!(MediaTypeFilter::Tv.matches(MediaType::Tv));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::NoResults), 5);
        assert_eq!(i32::from(ExitCode::LaunchFailed), 6);
    }
}
