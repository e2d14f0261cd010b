//! Terminal palette for cinetui
//!
//! Marquee gold on projection-room black. Every color is RGB so the contrast
//! checks below can read them.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x10, 0x14);
    pub const PANEL: Color = Color::Rgb(0x1a, 0x1a, 0x21);
    pub const PRIMARY: Color = Color::Rgb(0xf5, 0xc5, 0x18);
    pub const SECONDARY: Color = Color::Rgb(0x4f, 0xc3, 0xf7);
    pub const ACCENT: Color = Color::Rgb(0xff, 0xe0, 0x82);
    /// Cursor rows in the episode strip
    pub const EMBER: Color = Color::Rgb(0xff, 0x6f, 0x3c);
    pub const TEXT: Color = Color::Rgb(0xe8, 0xe6, 0xe3);
    pub const DIM: Color = Color::Rgb(0x5a, 0x5a, 0x66);
    pub const SUCCESS: Color = Color::Rgb(0x46, 0xd3, 0x69);
    pub const WARNING: Color = Color::Rgb(0xf0, 0xa2, 0x02);
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4f);
    pub const BORDER: Color = Color::Rgb(0x7a, 0x62, 0x0c);

    fn bold(color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Gold bar behind the viewed row
    pub fn highlighted() -> Style {
        Self::bold(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    pub fn selected() -> Style {
        Self::bold(Self::EMBER)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Self::bold(Self::ERROR)
    }

    pub fn success() -> Style {
        Self::bold(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Self::bold(Self::WARNING)
    }

    pub fn title() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn loading() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn accent() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Runtime and genres under a title
    pub fn meta() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn tab_active() -> Style {
        Self::bold(Self::BACKGROUND).bg(Self::SECONDARY)
    }

    pub fn poster_placeholder() -> Style {
        Style::default().fg(Self::DIM).bg(Self::PANEL)
    }

    pub fn poster_loaded() -> Style {
        Style::default().fg(Self::PRIMARY).bg(Self::PANEL)
    }

    /// Green from 7, amber from 5, dim below
    pub fn rating(score: f32) -> Style {
        if score >= 7.0 {
            Self::success()
        } else if score >= 5.0 {
            Self::warning()
        } else {
            Self::dimmed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        match color {
            Color::Rgb(r, g, b) => (r, g, b),
            other => panic!("palette color {:?} is not RGB", other),
        }
    }

    /// WCAG 2.0 contrast ratio between two colors
    fn contrast(fg: Color, bg: Color) -> f64 {
        fn luminance((r, g, b): (u8, u8, u8)) -> f64 {
            let channel = |c: u8| {
                let c = c as f64 / 255.0;
                if c <= 0.03928 {
                    c / 12.92
                } else {
                    ((c + 0.055) / 1.055).powf(2.4)
                }
            };
            0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
        }
        let (a, b) = (luminance(rgb(fg)), luminance(rgb(bg)));
        (a.max(b) + 0.05) / (a.min(b) + 0.05)
    }

    #[test]
    fn test_contrast_helper_bounds() {
        assert!((contrast(Color::Rgb(0, 0, 0), Color::Rgb(255, 255, 255)) - 21.0).abs() < 0.1);
        assert!((contrast(Theme::DIM, Theme::DIM) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_body_text_meets_aa() {
        for (name, color) in [("TEXT", Theme::TEXT), ("PRIMARY", Theme::PRIMARY), ("SECONDARY", Theme::SECONDARY)] {
            let ratio = contrast(color, Theme::BACKGROUND);
            assert!(ratio >= 4.5, "{} on BACKGROUND is {:.2}:1", name, ratio);
        }
        assert!(contrast(Theme::TEXT, Theme::PANEL) >= 4.5);
    }

    #[test]
    fn test_accents_meet_large_text_aa() {
        for (fg, bg) in [
            (Theme::EMBER, Theme::BACKGROUND),
            (Theme::ERROR, Theme::BACKGROUND),
            (Theme::WARNING, Theme::BACKGROUND),
            (Theme::BACKGROUND, Theme::PRIMARY),
            (Theme::BACKGROUND, Theme::SECONDARY),
        ] {
            assert!(contrast(fg, bg) >= 3.0, "{:?} on {:?}", fg, bg);
        }
    }

    #[test]
    fn test_rating_style_thresholds() {
        assert_eq!(Theme::rating(8.2), Theme::success());
        assert_eq!(Theme::rating(6.0), Theme::warning());
        assert_eq!(Theme::rating(3.1), Theme::dimmed());
    }
}
