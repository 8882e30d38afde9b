//! # Input Routing
//!
//! Turns crossterm events into core `Action`s.
//!
//! - Keys map one-to-one (`→` is `NextSlide`, `m` is `ToggleMusic`, ...).
//! - A mouse press on a control (nav dot, quote arrow, button, card, music
//!   toggle) fires that control immediately.
//! - A press on the background starts a gesture. On release it becomes a
//!   `Tap` if it barely moved, or a `Swipe` for the core to interpret.
//!   Left button gestures are pointer drags; right button or Alt+drag stand
//!   in for touch, which is what enables double-tap detection.
//!
//! Mouse positions are in cells; gestures are measured in pixels at a
//! nominal 8×16 cell so swipe thresholds mean the same thing everywhere.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::core::action::{Action, VOLUME_STEP};
use crate::core::gesture::{DRAG_THRESHOLD, DragTracker, InputKind};
use crate::tui::ui::{Hit, ScreenLayout};

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;
/// Two touch releases closer than this count as a double tap.
pub const DOUBLE_TAP_MS: u64 = 500;

fn to_px(column: u16, row: u16) -> (f64, f64) {
    (
        f64::from(column) * CELL_WIDTH_PX,
        f64::from(row) * CELL_HEIGHT_PX,
    )
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    tracker: DragTracker,
    kind: InputKind,
}

#[derive(Debug, Default)]
pub struct InputRouter {
    gesture: Option<ActiveGesture>,
    last_touch_end_ms: Option<u64>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&mut self, event: &Event, now_ms: u64, layout: &ScreenLayout) -> Vec<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
                route_key(key).into_iter().collect()
            }
            Event::Mouse(mouse) => self.route_mouse(mouse, now_ms, layout),
            Event::FocusLost => vec![Action::FocusLost],
            _ => Vec::new(),
        }
    }

    fn route_mouse(&mut self, mouse: &MouseEvent, now_ms: u64, layout: &ScreenLayout) -> Vec<Action> {
        let (x, y) = to_px(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => match layout.hit(mouse.column, mouse.row) {
                Hit::Background => {
                    let kind = if button == MouseButton::Right
                        || mouse.modifiers.contains(KeyModifiers::ALT)
                    {
                        InputKind::Touch
                    } else {
                        InputKind::Pointer
                    };
                    self.gesture = Some(ActiveGesture {
                        tracker: DragTracker::begin(x, y, now_ms),
                        kind,
                    });
                    Vec::new()
                }
                hit => {
                    self.gesture = None;
                    hit_action(hit, mouse.column, mouse.row).into_iter().collect()
                }
            },
            MouseEventKind::Drag(_) => {
                if let Some(gesture) = self.gesture.as_mut() {
                    gesture.tracker.motion(x, y);
                }
                Vec::new()
            }
            MouseEventKind::Up(_) => {
                let Some(gesture) = self.gesture.take() else {
                    return Vec::new();
                };
                let mut actions = Vec::with_capacity(2);
                if gesture.tracker.travel(x, y) < DRAG_THRESHOLD {
                    actions.push(Action::Tap {
                        x: mouse.column,
                        y: mouse.row,
                    });
                } else {
                    actions.push(Action::Swipe {
                        sample: gesture.tracker.finish(x, y, now_ms),
                        kind: gesture.kind,
                    });
                }
                if gesture.kind == InputKind::Touch {
                    if let Some(last) = self.last_touch_end_ms {
                        let gap = now_ms.saturating_sub(last);
                        if gap > 0 && gap < DOUBLE_TAP_MS {
                            actions.push(Action::DoubleTap);
                        }
                    }
                    self.last_touch_end_ms = Some(now_ms);
                }
                actions
            }
            _ => Vec::new(),
        }
    }
}

pub fn route_key(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (_, KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l')) => Some(Action::NextSlide),
        (_, KeyCode::Left | KeyCode::Char('h')) => Some(Action::PrevSlide),
        (_, KeyCode::Char(c @ '1'..='5')) => Some(Action::GoToSlide(usize::from(c as u8 - b'1'))),
        (_, KeyCode::Char(']')) => Some(Action::NextQuote),
        (_, KeyCode::Char('[')) => Some(Action::PrevQuote),
        (_, KeyCode::Char('m')) => Some(Action::ToggleMusic),
        (_, KeyCode::Char('+') | KeyCode::Char('=')) => Some(Action::NudgeVolume(VOLUME_STEP)),
        (_, KeyCode::Char('-')) => Some(Action::NudgeVolume(-VOLUME_STEP)),
        (_, KeyCode::Enter) => Some(Action::Celebrate { at: None }),
        (_, KeyCode::Char('q') | KeyCode::Esc) => Some(Action::Quit),
        _ => None,
    }
}

fn hit_action(hit: Hit, column: u16, row: u16) -> Option<Action> {
    match hit {
        Hit::Dot(index) => Some(Action::GoToSlide(index)),
        Hit::QuoteDot(index) => Some(Action::GoToQuote(index)),
        Hit::QuotePrev => Some(Action::PrevQuote),
        Hit::QuoteNext => Some(Action::NextQuote),
        Hit::Music => Some(Action::ToggleMusic),
        Hit::Button => Some(Action::Celebrate {
            at: Some((column, row)),
        }),
        Hit::Card(card) => Some(Action::SelectCard {
            card,
            x: column,
            y: row,
        }),
        Hit::Background => None,
    }
}
