//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout; the search list
//! also takes hover and click.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, InputMode};

pub mod detail;
pub mod player;
pub mod search;
pub mod theme;

pub use theme::Theme;

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    app.results_area = None;
    match app.state {
        AppState::Search => search::render_results(frame, chunks[1], app),
        AppState::MovieDetail => {
            if let Some(view) = app.movie_view() {
                detail::render_movie(frame, chunks[1], view, &app.posters);
            }
        }
        AppState::TvDetail => {
            if let Some(view) = app.tv_view_mut() {
                detail::render_tv(frame, chunks[1], view);
            }
        }
    }

    render_status_bar(frame, chunks[2], app);
}

/// Render the header with title and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "CINE",
            Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "TUI",
            Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let editing = app.state == AppState::Search && app.input_mode == InputMode::Editing;
    let query = app.search.query();

    let search_text = if editing {
        let (before, after): (String, String) = {
            let cursor = app.search.cursor();
            (
                query.chars().take(cursor).collect(),
                query.chars().skip(cursor).collect(),
            )
        };
        format!("⌕ {}│{}", before, after)
    } else if query.is_empty() {
        "⌕ Search movies and TV shows...".to_string()
    } else {
        format!("⌕ {}", query)
    };

    let title = if app.search.is_loading() {
        " SEARCHING… "
    } else {
        " SEARCH "
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(title, Theme::title()))
                .title_top(clear_hint(query, editing).right_aligned()),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Clear keybind shown on the search box while there is a query
fn clear_hint(query: &str, editing: bool) -> Line<'static> {
    if query.is_empty() {
        return Line::default();
    }
    let key = if editing { "^U" } else { "x" };
    Line::from(vec![
        Span::styled(format!(" {}", key), Theme::keybind()),
        Span::styled(" clear ", Theme::keybind_desc()),
    ])
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let help = match app.state {
        AppState::Search => match app.input_mode {
            InputMode::Editing => " ↑↓:select  ↵:open  ESC:clear  ^U:clear query  TAB:browse ",
            InputMode::Normal => " q:quit  /:search  1-8:open  ↵:open  x:clear ",
        },
        AppState::MovieDetail => " TAB:about/watch  m:more  o:open player  r:retry  ESC:back ",
        AppState::TvDetail => " TAB:focus  ↑↓:move  ↵:select  o:open player  r:retry  ESC:back ",
    };

    let mut spans = vec![mode_indicator, Span::styled(help, Theme::keybind_desc())];
    if let Some(status) = &app.status {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(status.as_str(), Theme::accent()));
    }

    let status = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Centered message inside a bordered panel
pub(crate) fn render_notice(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
    let height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(height) / 2;
    let inner = Rect {
        x: area.x,
        y: top,
        width: area.width,
        height: height.min(area.height),
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
