//! # MusicBar Component
//!
//! Bottom line: the music toggle, a volume meter and the note being played.
//!
//! ```text
//! [♪ Music ]  vol ▮▮▮▮▮▯▯▯▯▯  50%  ♪ C4
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const METER_CELLS: usize = 10;

pub struct MusicBar {
    pub playing: bool,
    pub volume: f32,
    pub note: Option<&'static str>,
}

impl Component for MusicBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (label, style) = if self.playing {
            (
                "[■ Pause ]",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            ("[♪ Music ]", Style::default().fg(Color::Magenta))
        };

        let filled = (self.volume.clamp(0.0, 1.0) * METER_CELLS as f32).round() as usize;
        let meter = format!("{}{}", "▮".repeat(filled), "▯".repeat(METER_CELLS - filled));

        let mut spans = vec![
            Span::styled(label, style),
            Span::raw("  vol "),
            Span::styled(meter, Style::default().fg(Color::Rgb(255, 105, 180))),
            Span::raw(format!(" {:>3}%", (self.volume * 100.0).round() as u32)),
        ];
        if let Some(note) = self.note {
            spans.push(Span::styled(
                format!("  ♪ {note}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::component::testing::render_rows;

    #[test]
    fn test_stopped_shows_music_button() {
        let mut bar = MusicBar {
            playing: false,
            volume: 0.5,
            note: None,
        };
        let rows = render_rows(&mut bar, 60, 1);
        assert!(rows[0].starts_with("[♪ Music ]"));
        assert!(rows[0].contains("▮▮▮▮▮▯▯▯▯▯"));
        assert!(rows[0].contains(" 50%"));
    }

    #[test]
    fn test_playing_shows_note() {
        let mut bar = MusicBar {
            playing: true,
            volume: 1.0,
            note: Some("G4"),
        };
        let rows = render_rows(&mut bar, 60, 1);
        assert!(rows[0].starts_with("[■ Pause ]"));
        assert!(rows[0].contains("▮▮▮▮▮▮▮▮▮▮"));
        assert!(rows[0].contains("100%"));
        assert!(rows[0].contains("♪ G4"));
    }
}
