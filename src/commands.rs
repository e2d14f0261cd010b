//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{EmbedCmd, EmbedResponse, ExitCode, MovieCmd, Output, SearchCmd, TvCmd};
use crate::config::Config;
use crate::embed::{self, BrowserLauncher};
use crate::models::{MovieRecord, Season, SeriesRecord};
use crate::state::movie::truncate_description;
use crate::state::tv::normalize_seasons;

/// Build a TMDB client from config, or report the missing key
fn client(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    match config.require_api_key() {
        Ok(key) => Ok(TmdbClient::with_base_url(key, &config.tmdb_base_url)
            .with_language(&config.language)),
        Err(e) => Err(output.error(e.to_string(), ExitCode::InvalidArgs)),
    }
}

/// Map a lookup failure onto an exit code
fn failure(output: &Output, what: &str, err: anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    };
    output.error(format!("{} failed: {}", what, err), code)
}

fn emit<T: Serialize>(output: &Output, data: &T) -> ExitCode {
    if let Err(e) = output.print(data) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Searching for: {}", query));

    match client.search_multi(query).await {
        Ok(mut results) => {
            if let Some(filter) = cmd.media_type {
                results.retain(|r| filter.matches(r.media_type));
            }
            results.truncate(cmd.limit);

            if results.is_empty() {
                return output.error(
                    format!("No results for \"{}\"", query),
                    ExitCode::NoResults,
                );
            }

            if output.json {
                return emit(output, &results);
            }
            output.lines(
                results
                    .iter()
                    .enumerate()
                    .map(|(i, r)| format!("{:>2}. {} #{}", i + 1, r, r.id)),
            );
            ExitCode::Success
        }
        Err(e) => failure(output, "Search", e),
    }
}

// =============================================================================
// Movie Command
// =============================================================================

pub async fn movie_cmd(cmd: MovieCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Getting movie {}", cmd.id));

    match client.movie_details(cmd.id).await {
        Ok(movie) => {
            if output.json {
                return emit(output, &movie);
            }
            output.lines(movie_lines(&movie, cmd.full));
            ExitCode::Success
        }
        Err(e) => failure(output, "Movie lookup", e),
    }
}

/// Human-readable movie summary
pub fn movie_lines(movie: &MovieRecord, full: bool) -> Vec<String> {
    let mut lines = vec![movie.to_string()];

    let mut meta = Vec::new();
    if let Some(runtime) = movie.runtime_str() {
        meta.push(runtime);
    }
    if let Some(rating) = movie.rating() {
        meta.push(format!("★ {:.1}", rating));
    }
    if let Some(genres) = movie.genres_str() {
        meta.push(genres);
    }
    if !meta.is_empty() {
        lines.push(meta.join(" · "));
    }
    if let Some(companies) = movie.companies_str() {
        lines.push(format!("Production: {}", companies));
    }
    if let Some(countries) = movie.countries_str() {
        lines.push(format!("Country: {}", countries));
    }
    if !movie.overview.is_empty() {
        lines.push(String::new());
        lines.push(if full {
            movie.overview.clone()
        } else {
            truncate_description(&movie.overview)
        });
    }
    lines
}

// =============================================================================
// TV Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TvResponse {
    pub series: SeriesRecord,
    pub seasons: Vec<Season>,
}

pub async fn tv_cmd(cmd: TvCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Getting TV show {}", cmd.id));

    let loaded = tokio::try_join!(client.series_details(cmd.id), client.all_episodes(cmd.id));
    let (series, seasons) = match loaded {
        Ok(pair) => pair,
        Err(e) => return failure(output, "TV lookup", e),
    };

    let mut seasons = normalize_seasons(seasons);
    if let Some(number) = cmd.season {
        seasons.retain(|s| s.season_number == number);
        if seasons.is_empty() {
            return output.error(
                format!("{} has no season {}", series.name, number),
                ExitCode::NotFound,
            );
        }
    }

    if output.json {
        return emit(output, &TvResponse { series, seasons });
    }
    output.lines(tv_lines(&series, &seasons));
    ExitCode::Success
}

/// Human-readable series summary with its episode lists
pub fn tv_lines(series: &SeriesRecord, seasons: &[Season]) -> Vec<String> {
    let mut lines = vec![series.to_string()];
    if seasons.is_empty() {
        lines.push(crate::state::tv::NO_SEASONS_MESSAGE.to_string());
        return lines;
    }
    for season in seasons {
        lines.push(String::new());
        lines.push(season.to_string());
        if season.episodes.is_empty() {
            lines.push(format!("  {}", crate::state::tv::NO_EPISODES_MESSAGE));
        }
        for episode in &season.episodes {
            lines.push(format!("  {}", episode));
        }
    }
    lines
}

// =============================================================================
// Embed Command
// =============================================================================

pub async fn embed_cmd(cmd: EmbedCmd, config: &Config, output: &Output) -> ExitCode {
    let target = match cmd.target() {
        Ok(t) => t,
        Err(msg) => return output.error(msg, ExitCode::InvalidArgs),
    };
    let providers = config.providers();

    let opened = if cmd.open {
        output.info(format!("Opening {}", embed::title(&target)));
        match BrowserLauncher::default().open(&target, &providers).await {
            Ok(path) => Some(path),
            Err(e) => return output.error(e.to_string(), ExitCode::LaunchFailed),
        }
    } else {
        None
    };

    let response = EmbedResponse {
        url: providers.url(&target),
        iframe: providers.iframe_html(&target),
        target,
        opened,
    };

    if output.json {
        return emit(output, &response);
    }
    if cmd.html {
        println!("{}", response.iframe);
    } else {
        println!("{}", response.url);
    }
    ExitCode::Success
}
