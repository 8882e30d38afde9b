//! # Screen Layout
//!
//! ```text
//! ┌ title bar ───────────────────────────────┐
//! │╭ body ──────────────────────────────────╮│
//! ││ heading                                ││
//! ││ content (text, quote card, cards, btn) ││
//! ││ swipe hint                             ││
//! │╰────────────────────────────────────────╯│
//! │               ● ○ ○ ○ ○                  │
//! │[♪ Music ]  vol ▮▮▮▮▮▯▯▯▯▯  50%           │
//! └──────────────────────────────────────────┘
//! ```
//!
//! `ScreenLayout` is computed once per frame for the settled slide and kept
//! by the event loop for hit-testing mouse input until the next frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use unicode_width::UnicodeWidthStr;

use crate::core::config::ResolvedConfig;
use crate::core::deck::{SLIDES, SlideKind};
use crate::core::effects::Card;
use crate::core::navigation::{NavigationController, TOTAL_QUOTES, TOTAL_SLIDES};
use crate::tui::component::Component;
use crate::tui::components::{
    LoadingScreen, MusicBar, NavDots, ParticleLayer, SlideView, TitleBar,
};
use crate::tui::stage::Stage;

/// Width of the `[♪ Music ]` toggle at the left of the music bar.
pub const MUSIC_BUTTON_WIDTH: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Dot(usize),
    QuoteDot(usize),
    QuotePrev,
    QuoteNext,
    Music,
    Button,
    Card(Card),
    Background,
}

/// Positions of everything inside the slide body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideLayout {
    pub heading: Rect,
    pub text: Rect,
    pub hint: Rect,
    pub button: Option<Rect>,
    pub quote: Rect,
    pub quote_dots: Vec<Rect>,
    pub quote_prev: Rect,
    pub quote_next: Rect,
    pub cards: Vec<(Card, Rect)>,
}

impl SlideLayout {
    pub fn compute(body: Rect, slide: usize) -> Self {
        use Constraint::{Length, Min};

        let inner = body.inner(Margin::new(2, 1));
        let [heading, content, hint] = Layout::vertical([Length(2), Min(0), Length(1)]).areas(inner);
        let mut layout = SlideLayout {
            heading,
            hint,
            ..Default::default()
        };

        let deck_slide = &SLIDES[slide.min(TOTAL_SLIDES - 1)];
        match deck_slide.kind {
            SlideKind::Welcome | SlideKind::Finale => {
                let [text, button_row] = Layout::vertical([Min(0), Length(3)]).areas(content);
                layout.text = text;
                layout.button = deck_slide
                    .button
                    .map(|label| centered(button_row, label.width() as u16 + 6));
            }
            SlideKind::Quotes => {
                let [quote, controls] = Layout::vertical([Min(0), Length(1)]).areas(content);
                layout.quote = quote;
                layout.quote_dots = dot_row(controls, TOTAL_QUOTES);
                if let (Some(first), Some(last)) = (layout.quote_dots.first(), layout.quote_dots.last()) {
                    layout.quote_prev = Rect::new(first.x.saturating_sub(4), controls.y, 3, first.height);
                    layout.quote_next = Rect::new(last.x + 2, controls.y, 3, last.height);
                }
            }
            SlideKind::Wishes | SlideKind::Memories => {
                let [text, row] = Layout::vertical([Length(2), Min(0)]).areas(content);
                layout.text = text;
                let count = deck_slide.cards.len();
                if count > 0 {
                    let cells = Layout::horizontal(vec![Constraint::Ratio(1, count as u32); count])
                        .spacing(1)
                        .split(row);
                    layout.cards = cells
                        .iter()
                        .enumerate()
                        .map(|(i, rect)| {
                            let card = if deck_slide.kind == SlideKind::Wishes {
                                Card::Wish(i)
                            } else {
                                Card::Memory(i)
                            };
                            (card, *rect)
                        })
                        .collect();
                }
            }
        }
        layout
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub area: Rect,
    pub title: Rect,
    pub body: Rect,
    pub dots_row: Rect,
    pub music: Rect,
    pub music_button: Rect,
    pub nav_dots: Vec<Rect>,
    pub slide: SlideLayout,
}

impl ScreenLayout {
    pub fn compute(area: Rect, slide: usize) -> Self {
        use Constraint::{Length, Min};

        let [title, body, dots_row, music] =
            Layout::vertical([Length(1), Min(0), Length(1), Length(1)]).areas(area);
        ScreenLayout {
            area,
            title,
            body,
            dots_row,
            music,
            music_button: Rect::new(
                music.x,
                music.y,
                MUSIC_BUTTON_WIDTH.min(music.width),
                music.height,
            ),
            nav_dots: dot_row(dots_row, TOTAL_SLIDES),
            slide: SlideLayout::compute(body, slide),
        }
    }

    /// What a click at `(col, row)` lands on.
    pub fn hit(&self, col: u16, row: u16) -> Hit {
        let pos = Position::new(col, row);
        if let Some(i) = self.nav_dots.iter().position(|r| r.contains(pos)) {
            return Hit::Dot(i);
        }
        if self.music_button.contains(pos) {
            return Hit::Music;
        }
        if let Some(i) = self.slide.quote_dots.iter().position(|r| r.contains(pos)) {
            return Hit::QuoteDot(i);
        }
        if self.slide.quote_prev.contains(pos) {
            return Hit::QuotePrev;
        }
        if self.slide.quote_next.contains(pos) {
            return Hit::QuoteNext;
        }
        if self.slide.button.is_some_and(|r| r.contains(pos)) {
            return Hit::Button;
        }
        if let Some((card, _)) = self.slide.cards.iter().find(|(_, r)| r.contains(pos)) {
            return Hit::Card(*card);
        }
        Hit::Background
    }
}

/// `count` one-cell dots, centered in `row`, one blank between each.
pub fn dot_row(row: Rect, count: usize) -> Vec<Rect> {
    let total = (count as u16 * 2).saturating_sub(1);
    let start = row.x + row.width.saturating_sub(total) / 2;
    (0..count as u16)
        .map(|i| Rect::new(start + i * 2, row.y, 1, row.height.min(1)))
        .collect()
}

fn centered(row: Rect, width: u16) -> Rect {
    let width = width.min(row.width);
    Rect::new(row.x + (row.width - width) / 2, row.y, width, row.height)
}

/// `area` moved `dx` cells sideways and clipped to where it was.
pub fn shifted(area: Rect, dx: i32) -> Rect {
    let shift = dx.unsigned_abs().min(u32::from(area.width)) as u16;
    if dx >= 0 {
        Rect::new(area.x + shift, area.y, area.width - shift, area.height)
    } else {
        Rect::new(area.x, area.y, area.width - shift, area.height)
    }
}

pub fn draw_ui(
    frame: &mut Frame,
    nav: &NavigationController<Stage>,
    config: &ResolvedConfig,
) -> ScreenLayout {
    let layout = ScreenLayout::compute(frame.area(), nav.current_slide());
    let stage = nav.effects();

    TitleBar::new(&config.title, nav.current_slide(), stage.music_playing()).render(frame, layout.title);

    let body = shifted(layout.body, stage.slide_offset(layout.body.width));
    SlideView {
        slide: nav.current_slide(),
        recipient: &config.recipient,
        quote: nav.current_quote(),
        quote_offset: stage.quote_offset(layout.slide.quote.width),
        swipe_hint: stage.shows_swipe_hint(),
    }
    .render(frame, body);

    NavDots {
        current: nav.current_slide(),
        dots: &layout.nav_dots,
    }
    .render(frame, layout.dots_row);

    MusicBar {
        playing: stage.music_playing(),
        volume: nav.volume(),
        note: stage.current_note(),
    }
    .render(frame, layout.music);

    ParticleLayer { stage }.render(frame, layout.area);

    if nav.is_loading() {
        LoadingScreen {
            now_ms: stage.now_ms(),
        }
        .render(frame, layout.area);
    }

    layout
}
