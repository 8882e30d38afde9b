//! # SlideView Component
//!
//! Draws one slide into the body area: heading, body text, and whatever the
//! slide kind carries (celebration button, quote card with its controls, or
//! a row of cards). Positions come from `SlideLayout::compute`, the same
//! function the event loop hit-tests against, so what you see is what you
//! click.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::deck::{QUOTES, SLIDES, SlideKind, slide_title};
use crate::core::navigation::TOTAL_SLIDES;
use crate::tui::component::Component;
use crate::tui::ui::{SlideLayout, shifted};

const PINK: Color = Color::Rgb(255, 105, 180);
const GOLD: Color = Color::Rgb(255, 215, 0);

pub struct SlideView<'a> {
    pub slide: usize,
    pub recipient: &'a str,
    pub quote: usize,
    /// Sideways offset of the quote card while it slides in.
    pub quote_offset: i32,
    pub swipe_hint: bool,
}

impl SlideView<'_> {
    fn render_quote(&self, frame: &mut Frame, layout: &SlideLayout) {
        let area = shifted(layout.quote, self.quote_offset);
        let quote = &QUOTES[self.quote % QUOTES.len()];
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(PINK));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.saturating_sub(2)).max(1);
        let mut lines: Vec<Line> = textwrap::wrap(&format!("\u{201c}{}\u{201d}", quote.text), width)
            .into_iter()
            .map(|l| {
                Line::from(Span::styled(
                    l.into_owned(),
                    Style::default().add_modifier(Modifier::ITALIC),
                ))
            })
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("~ {}", quote.author),
            Style::default().fg(GOLD),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

        let controls = Style::default().fg(PINK);
        let prev = layout.quote_prev;
        if prev.width > 0 {
            frame.render_widget(
                Paragraph::new("‹").style(controls).alignment(Alignment::Center),
                prev,
            );
        }
        let next = layout.quote_next;
        if next.width > 0 {
            frame.render_widget(
                Paragraph::new("›").style(controls).alignment(Alignment::Center),
                next,
            );
        }
        for (i, dot) in layout.quote_dots.iter().enumerate() {
            let glyph = if i == self.quote { "●" } else { "○" };
            frame.render_widget(Paragraph::new(glyph).style(controls), *dot);
        }
    }
}

impl Component for SlideView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width < 4 || area.height < 4 {
            return;
        }
        let slide = &SLIDES[self.slide.min(TOTAL_SLIDES - 1)];
        let layout = SlideLayout::compute(area, self.slide);

        frame.render_widget(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Magenta)),
            area,
        );

        frame.render_widget(
            Paragraph::new(slide_title(self.slide, self.recipient))
                .style(Style::default().fg(PINK).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            layout.heading,
        );

        if !slide.body.is_empty() {
            frame.render_widget(
                Paragraph::new(slide.body)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                layout.text,
            );
        }

        match slide.kind {
            SlideKind::Welcome | SlideKind::Finale => {
                if let (Some(label), Some(button)) = (slide.button, layout.button) {
                    frame.render_widget(
                        Paragraph::new(label)
                            .style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
                            .alignment(Alignment::Center)
                            .block(
                                Block::bordered()
                                    .border_type(BorderType::Rounded)
                                    .border_style(Style::default().fg(GOLD)),
                            ),
                        button,
                    );
                }
            }
            SlideKind::Quotes => self.render_quote(frame, &layout),
            SlideKind::Wishes | SlideKind::Memories => {
                for ((_, rect), card) in layout.cards.iter().zip(slide.cards) {
                    frame.render_widget(
                        Paragraph::new(card.body).wrap(Wrap { trim: true }).block(
                            Block::bordered()
                                .border_type(BorderType::Rounded)
                                .border_style(Style::default().fg(PINK))
                                .title(Span::styled(
                                    card.title,
                                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                                )),
                        ),
                        *rect,
                    );
                }
            }
        }

        if self.swipe_hint {
            frame.render_widget(
                Paragraph::new("swipe, drag or use ← → to move between slides")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                layout.hint,
            );
        }
    }
}
