//! # TitleBar Component
//!
//! Top line: the title, which slide we're on, and a reminder of how to quit.
//!
//! Purely presentational. It receives all data as props and has no internal
//! state:
//!
//! ```rust,ignore
//! TitleBar::new("fete", nav.current_slide(), stage.music_playing())
//!     .render(frame, title_area);
//! ```
//!
//! On narrow terminals the right-hand help text is dropped first so the
//! slide counter stays visible.

use crate::core::navigation::TOTAL_SLIDES;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const HELP: &str = "← → slides  m music  q quit";

pub struct TitleBar<'a> {
    pub title: &'a str,
    /// Zero-based index of the current slide.
    pub slide: usize,
    pub music_playing: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(title: &'a str, slide: usize, music_playing: bool) -> Self {
        Self {
            title,
            slide,
            music_playing,
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!("♥ {}", self.title),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}/{}", self.slide + 1, TOTAL_SLIDES)),
        ];
        if self.music_playing {
            spans.push(Span::styled("  ♪", Style::default().fg(Color::Yellow)));
        }
        let left = Line::from(spans);

        let help_width = HELP.width() as u16;
        if area.width >= left.width() as u16 + help_width + 2 {
            let [left_area, right_area] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(help_width)])
                    .areas(area);
            frame.render_widget(Paragraph::new(left), left_area);
            frame.render_widget(
                Paragraph::new(HELP)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Right),
                right_area,
            );
        } else {
            frame.render_widget(Paragraph::new(left), area);
        }
    }
}
