//! Detail views for movies and TV shows
//!
//! Movies get an About/Watch tab pair. TV shows get a season column, an
//! episode strip and the player panel side by side.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::models::{Episode, MovieRecord, Season};
use crate::state::tv::{NO_SEASONS_MESSAGE, NO_SELECTION_MESSAGE};
use crate::state::{LoadPhase, MovieDetailView, MovieTab, PosterCache, TvDetailView, TvFocus};
use crate::ui::{player, render_notice, search::poster_tile, Theme};

fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title), Theme::title()))
}

/// Loading and error states shared by both views
fn render_phase<T>(frame: &mut Frame, area: Rect, phase: &LoadPhase<T>, what: &str) -> bool {
    match phase {
        LoadPhase::Loading => {
            render_notice(
                frame,
                area,
                vec![Line::from(Span::styled(
                    format!("⟳ Loading {}...", what),
                    Theme::loading(),
                ))],
            );
            true
        }
        LoadPhase::Failed(message) => {
            render_notice(
                frame,
                area,
                vec![
                    Line::from(Span::styled(message.as_str(), Theme::error())),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled(" r ", Theme::keybind()),
                        Span::styled("Try again", Theme::keybind_desc()),
                    ]),
                ],
            );
            true
        }
        LoadPhase::Loaded(_) => false,
    }
}

// =============================================================================
// Movie
// =============================================================================

pub fn render_movie(frame: &mut Frame, area: Rect, view: &MovieDetailView, posters: &PosterCache) {
    if render_phase(frame, area, view.phase(), "movie") {
        return;
    }
    let Some(movie) = view.movie() else {
        return;
    };

    let block = panel(&movie.title, true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(tab_line(view.active_tab())), chunks[0]);

    match view.active_tab() {
        MovieTab::About => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(10), Constraint::Min(1)])
                .split(chunks[1]);

            let poster = posters.get(movie.poster_path.as_deref()).display();
            frame.render_widget(Paragraph::new(Line::from(poster_tile(&poster))), columns[0]);

            let mut lines = about_lines(movie);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(view.description(), Theme::text())));
            if view.has_more_description() {
                let label = if view.show_full_description() {
                    "Show less"
                } else {
                    "Show more"
                };
                lines.push(Line::from(vec![
                    Span::styled(" m ", Theme::keybind()),
                    Span::styled(label, Theme::keybind_desc()),
                ]));
            }
            frame.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: true }),
                columns[1],
            );
        }
        MovieTab::Watch => match view.player() {
            Some(session) => player::render_player(frame, chunks[1], session),
            None => render_notice(
                frame,
                chunks[1],
                vec![Line::from(Span::styled(NO_SELECTION_MESSAGE, Theme::dimmed()))],
            ),
        },
    }
}

pub fn tab_line(active: MovieTab) -> Line<'static> {
    let tab = |tab: MovieTab| {
        let label = format!(" {} ", tab.label());
        if tab == active {
            Span::styled(label, Theme::tab_active())
        } else {
            Span::styled(label, Theme::dimmed())
        }
    };
    Line::from(vec![tab(MovieTab::About), Span::raw(" "), tab(MovieTab::Watch)])
}

/// Title line plus whichever metadata rows the record has
pub fn about_lines(movie: &MovieRecord) -> Vec<Line<'_>> {
    let mut title = vec![Span::styled(
        movie.title.as_str(),
        Style::default().fg(Theme::PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = movie.year() {
        title.push(Span::styled(format!(" ({})", year), Theme::year()));
    }

    let mut meta = Vec::new();
    if let Some(runtime) = movie.runtime_str() {
        meta.push(Span::styled(runtime, Theme::meta()));
    }
    if let Some(rating) = movie.rating() {
        if !meta.is_empty() {
            meta.push(Span::styled(" · ", Theme::dimmed()));
        }
        meta.push(Span::styled(format!("★ {:.1}", rating), Theme::rating(rating)));
    }
    if let Some(genres) = movie.genres_str() {
        if !meta.is_empty() {
            meta.push(Span::styled(" · ", Theme::dimmed()));
        }
        meta.push(Span::styled(genres, Theme::meta()));
    }

    let mut lines = vec![Line::from(title)];
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }
    if let Some(companies) = movie.companies_str() {
        lines.push(Line::from(vec![
            Span::styled("Production: ", Theme::dimmed()),
            Span::styled(companies, Theme::text()),
        ]));
    }
    if let Some(countries) = movie.countries_str() {
        lines.push(Line::from(vec![
            Span::styled("Country: ", Theme::dimmed()),
            Span::styled(countries, Theme::text()),
        ]));
    }
    lines
}

// =============================================================================
// TV
// =============================================================================

pub fn render_tv(frame: &mut Frame, area: Rect, view: &mut TvDetailView) {
    if render_phase(frame, area, view.phase(), "TV show") {
        return;
    }
    let Some(series) = view.series() else {
        return;
    };

    let block = panel(&series.name, true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut info = vec![Span::styled(
        series.name.clone(),
        Style::default().fg(Theme::PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = series.year() {
        info.push(Span::styled(format!(" ({})", year), Theme::year()));
    }
    if series.vote_average > 0.0 {
        info.push(Span::raw(" "));
        info.push(Span::styled(
            format!("★ {:.1}", series.vote_average),
            Theme::rating(series.vote_average),
        ));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);
    frame.render_widget(Paragraph::new(Line::from(info)), rows[0]);

    if view.seasons().is_empty() {
        render_notice(
            frame,
            rows[1],
            vec![Line::from(Span::styled(NO_SEASONS_MESSAGE, Theme::dimmed()))],
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Percentage(45),
            Constraint::Min(20),
        ])
        .split(rows[1]);

    render_seasons(frame, columns[0], view);
    render_episodes(frame, columns[1], view);

    let player_block = panel("PLAYER", false);
    let player_area = player_block.inner(columns[2]);
    frame.render_widget(player_block, columns[2]);
    match view.player() {
        Some(session) => player::render_player(frame, player_area, session),
        None => render_notice(
            frame,
            player_area,
            vec![Line::from(Span::styled(NO_SELECTION_MESSAGE, Theme::dimmed()))],
        ),
    }
}

fn render_seasons(frame: &mut Frame, area: Rect, view: &mut TvDetailView) {
    let block = panel("SEASONS", view.focus() == TvFocus::Seasons);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    view.season_list_mut()
        .scroll_into_view(inner.height as usize);

    let selection = view.selection();
    let offset = view.season_list().offset;
    let items: Vec<ListItem> = view
        .seasons()
        .iter()
        .skip(offset)
        .take(inner.height as usize)
        .map(|season| {
            let viewing = selection.viewing_season == Some(season.season_number);
            let playing = selection.playing_season == Some(season.season_number);
            ListItem::new(season_line(season, viewing, playing))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn season_line(season: &Season, viewing: bool, playing: bool) -> Line<'static> {
    let marker = if playing { "▶ " } else { "  " };
    let label = season
        .name
        .clone()
        .unwrap_or_else(|| format!("Season {}", season.season_number));
    Line::from(vec![
        Span::styled(marker, Theme::success()),
        Span::styled(
            label,
            if viewing {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
    ])
}

fn render_episodes(frame: &mut Frame, area: Rect, view: &mut TvDetailView) {
    let block = panel("EPISODES", view.focus() == TvFocus::Episodes);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(message) = view.empty_message() {
        render_notice(
            frame,
            inner,
            vec![Line::from(Span::styled(message, Theme::dimmed()))],
        );
        return;
    }

    view.episode_list_mut()
        .scroll_into_view(inner.height as usize);

    let selection = view.selection();
    let list = view.episode_list().clone();
    let Some(season) = view.viewed_season() else {
        return;
    };

    let items: Vec<ListItem> = season
        .episodes
        .iter()
        .enumerate()
        .skip(list.offset)
        .take(inner.height as usize)
        .map(|(i, episode)| {
            let playing = selection.playing_season == Some(season.season_number)
                && episode.episode_number.is_some()
                && selection.playing_episode == episode.episode_number;
            ListItem::new(episode_line(episode, i == list.selected, playing))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

pub fn episode_line(episode: &Episode, cursor: bool, playing: bool) -> Line<'static> {
    let marker = if playing { "▶ " } else if cursor { "▸ " } else { "  " };
    let style = if cursor {
        Theme::highlighted()
    } else if playing {
        Theme::selected()
    } else {
        Theme::text()
    };
    Line::from(vec![
        Span::styled(marker, Theme::accent()),
        Span::styled(episode.to_string(), style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_about_lines_skip_missing_metadata() {
        let movie = MovieRecord {
            id: 1,
            title: "Primer".into(),
            overview: String::new(),
            release_date: None,
            runtime: Some(77),
            vote_average: 0.0,
            genres: vec![],
            production_companies: vec![],
            production_countries: vec![],
            poster_path: None,
            backdrop_path: None,
        };
        let lines = about_lines(&movie);
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "Primer");
        assert_eq!(text(&lines[1]), "1h 17m");
    }

    #[test]
    fn test_tab_line_marks_active() {
        let line = tab_line(MovieTab::Watch);
        assert_eq!(text(&line), " About   Watch ");
        assert_eq!(line.spans[2].style, Theme::tab_active());
    }

    #[test]
    fn test_episode_line_markers() {
        let episode = Episode {
            episode_number: Some(3),
            name: Some("Bit by a Dead Bee".into()),
        };
        assert_eq!(text(&episode_line(&episode, false, true)), "▶ E03 - Bit by a Dead Bee");
        assert_eq!(text(&episode_line(&episode, true, false)), "▸ E03 - Bit by a Dead Bee");
    }
}
