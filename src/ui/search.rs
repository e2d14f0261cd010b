//! Search results list
//!
//! One row per result with its hotkey, poster tile, title, year, type and
//! rating. The inline error replaces the list while set.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{MediaType, SearchResult};
use crate::state::image::FALLBACK_LABEL;
use crate::state::ImageDisplay;
use crate::ui::Theme;

/// Render the result panel and record its area for mouse hit testing
pub fn render_results(frame: &mut Frame, area: Rect, app: &mut App) {
    app.results_area = Some(area);

    let results = app.search.results();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" RESULTS ({}) ", results.len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = app.search.error() {
        let error = Paragraph::new(Line::from(vec![
            Span::styled("✗ ", Theme::error()),
            Span::styled(error, Theme::error()),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(error, inner);
        return;
    }

    if results.is_empty() {
        let text = if app.search.is_loading() {
            Span::styled("⟳ Searching...", Theme::loading())
        } else if app.search.query().trim().is_empty() {
            Span::styled("Type to search for movies and TV shows...", Theme::dimmed())
        } else if app.search.is_debouncing() {
            Span::raw("")
        } else {
            Span::styled("No results found", Theme::warning())
        };
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
        return;
    }

    let selected = app.search.selected_index();
    let items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let display = app.posters.get(result.poster_path.as_deref()).display();
            ListItem::new(result_line(i, result, selected == Some(i), &display))
        })
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// One result row
pub fn result_line<'a>(
    index: usize,
    result: &'a SearchResult,
    is_selected: bool,
    poster: &ImageDisplay,
) -> Line<'a> {
    let marker = if is_selected { "▸" } else { " " };
    let year_str = result.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let type_str = match result.media_type {
        MediaType::Movie => "MOVIE",
        MediaType::Tv => "TV",
    };

    let mut spans = vec![
        Span::styled(
            marker,
            if is_selected {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(format!("{} ", index + 1), Theme::keybind()),
        poster_tile(poster),
        Span::raw(" "),
        Span::styled(
            result.title.as_str(),
            if is_selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
        Span::styled(year_str, Theme::year()),
        Span::raw(" "),
        Span::styled(format!("[{}]", type_str), Theme::secondary()),
    ];

    if let Some(score) = result.vote_average {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("★ {:.1}", score), Theme::rating(score)));
    }

    Line::from(spans)
}

/// Fixed-width tile standing in for the poster image
pub fn poster_tile(display: &ImageDisplay) -> Span<'static> {
    match display {
        ImageDisplay::Placeholder(_) => Span::styled("░░░░░░░░", Theme::poster_placeholder()),
        ImageDisplay::Full(_) => Span::styled("████████", Theme::poster_loaded()),
        ImageDisplay::Fallback => Span::styled(FALLBACK_LABEL, Theme::dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        SearchResult {
            id: 272,
            media_type: MediaType::Movie,
            title: "Batman Begins".into(),
            poster_path: Some("/poster.jpg".into()),
            vote_average: Some(7.7),
            release_date: Some("2005-06-10".into()),
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_result_line_content() {
        let result = result();
        let line = result_line(0, &result, true, &ImageDisplay::Fallback);
        let text = text(&line);
        assert!(text.starts_with("▸1 No Image Batman Begins (2005) [MOVIE]"));
        assert!(text.ends_with("★ 7.7"));
    }

    #[test]
    fn test_unrated_result_has_no_score() {
        let result = SearchResult {
            vote_average: None,
            ..result()
        };
        let line = result_line(3, &result, false, &ImageDisplay::Fallback);
        assert!(!text(&line).contains('★'));
        assert!(text(&line).starts_with(" 4 "));
    }

    #[test]
    fn test_poster_tiles_have_equal_width() {
        let tiles = [
            poster_tile(&ImageDisplay::Placeholder("p".into())),
            poster_tile(&ImageDisplay::Full("f".into())),
            poster_tile(&ImageDisplay::Fallback),
        ];
        for tile in &tiles {
            assert_eq!(tile.content.chars().count(), 8);
        }
    }
}
