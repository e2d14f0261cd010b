//! Player panel
//!
//! A terminal cannot host the embedded player, so the panel shows what is
//! mounted, its URL and how to open it in the browser.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::embed::{self, EmbedSession, EmbedTarget};
use crate::ui::Theme;

pub fn render_player(frame: &mut Frame, area: Rect, session: &EmbedSession) {
    frame.render_widget(
        Paragraph::new(player_lines(session))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn player_lines(session: &EmbedSession) -> Vec<Line<'_>> {
    let heading = match session.target() {
        EmbedTarget::Movie { .. } => "▶ Movie".to_string(),
        EmbedTarget::Episode {
            season, episode, ..
        } => format!("▶ Season {} · Episode {}", season, episode),
    };

    vec![
        Line::from(""),
        Line::from(Span::styled(heading, Theme::success())),
        Line::from(Span::styled(embed::title(session.target()), Theme::dimmed())),
        Line::from(""),
        Line::from(Span::styled(session.url(), Theme::secondary())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" o ", Theme::keybind()),
            Span::styled("Open in browser", Theme::keybind_desc()),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{EmbedProviders, ListenerRegistry};

    #[test]
    fn test_player_lines_show_url() {
        let listeners = ListenerRegistry::new();
        let session = EmbedSession::mount(
            EmbedTarget::Episode {
                tv_id: 1399,
                season: 1,
                episode: 2,
            },
            &EmbedProviders::default(),
            &listeners,
        );
        let lines = player_lines(&session);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.contains(&"▶ Season 1 · Episode 2".to_string()));
        assert!(text.contains(&"https://embed.vidsrc.pk/1399/1/2?nextbutton=true".to_string()));
    }
}
