//! # LoadingScreen Component
//!
//! Full-screen overlay shown while the session starts up. A heart pulses
//! next to the message so it's clear nothing is stuck.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::tui::component::Component;

const PULSE: [&str; 4] = ["♡", "♥", "♥", "♡"];

pub struct LoadingScreen {
    pub now_ms: u64,
}

impl Component for LoadingScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        let heart = PULSE[(self.now_ms / 250) as usize % PULSE.len()];
        let dots = ".".repeat((self.now_ms / 400) as usize % 4);
        let pink = Style::default().fg(Color::Rgb(255, 105, 180));
        let lines = vec![
            Line::from(Span::styled(heart, pink.add_modifier(Modifier::BOLD))),
            Line::default(),
            Line::from(vec![
                Span::styled("Preparing something special", pink),
                Span::raw(format!("{dots:<3}")),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
    }
}
