//! # NavDots Component
//!
//! One dot per slide, the current one filled. Dot positions are passed in
//! from `ScreenLayout` so clicks and drawing agree.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct NavDots<'a> {
    pub current: usize,
    pub dots: &'a [Rect],
}

impl Component for NavDots<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        for (i, dot) in self.dots.iter().enumerate() {
            let dot = dot.intersection(area);
            if dot.is_empty() {
                continue;
            }
            let (glyph, color) = if i == self.current {
                ("●", Color::Rgb(255, 105, 180))
            } else {
                ("○", Color::DarkGray)
            };
            frame.render_widget(Paragraph::new(glyph).style(Style::default().fg(color)), dot);
        }
    }
}
