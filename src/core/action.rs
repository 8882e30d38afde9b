//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses →? That's `Action::NextSlide`.
//! User swipes? That's `Action::Swipe { sample, kind }`.
//!
//! `dispatch()` is the single entry point from input into the core. It
//! knows nothing about terminals; the TUI's input router builds the actions.
//!
//! ```text
//! InputRouter → Action → dispatch() → NavigationController → EffectDispatcher
//!                           │
//!                           └── Swipe → GestureInterpreter → Intent
//! ```

use log::debug;

use crate::core::effects::{Card, EffectDispatcher};
use crate::core::gesture::{GestureInterpreter, GestureSample, InputKind, Intent};
use crate::core::navigation::{FINALE_SLIDE, NavigationController, WELCOME_SLIDE};

/// Volume change for one press of `+` or `-`.
pub const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NextSlide,
    PrevSlide,
    GoToSlide(usize),
    NextQuote,
    PrevQuote,
    GoToQuote(usize),
    Swipe { sample: GestureSample, kind: InputKind },
    /// The current slide's button: "start the journey" on the welcome
    /// slide, "celebrate" on the finale. `at` is where it was clicked.
    Celebrate { at: Option<(u16, u16)> },
    Tap { x: u16, y: u16 },
    DoubleTap,
    SelectCard { card: Card, x: u16, y: u16 },
    ToggleMusic,
    NudgeVolume(f32),
    FocusLost,
    Quit,
}

/// What the caller should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
}

pub fn dispatch<E: EffectDispatcher>(
    nav: &mut NavigationController<E>,
    interpreter: &GestureInterpreter,
    action: Action,
) -> Effect {
    match action {
        Action::NextSlide => {
            let _ = nav.next_slide();
        }
        Action::PrevSlide => {
            let _ = nav.prev_slide();
        }
        Action::GoToSlide(index) => {
            let _ = nav.request_slide(index);
        }
        Action::NextQuote => {
            let _ = nav.next_quote();
        }
        Action::PrevQuote => {
            let _ = nav.prev_quote();
        }
        Action::GoToQuote(index) => {
            let _ = nav.request_quote(index);
        }
        Action::Swipe { sample, kind } => match interpreter.interpret(&sample, kind) {
            Intent::Next => {
                debug!("Swiping to next slide");
                let _ = nav.next_slide();
            }
            Intent::Previous => {
                debug!("Swiping to previous slide");
                let _ = nav.prev_slide();
            }
            Intent::None => {}
        },
        Action::Celebrate { at } => {
            match nav.current_slide() {
                WELCOME_SLIDE => {
                    let _ = nav.next_slide();
                }
                FINALE_SLIDE => {
                    let _ = nav.trigger_finale();
                }
                slide => debug!("No celebration button on slide {}", slide),
            }
            if let Some((x, y)) = at {
                nav.ripple(x, y);
            }
        }
        Action::Tap { x, y } => nav.tap(x, y),
        Action::DoubleTap => nav.double_tap(),
        Action::SelectCard { card, x, y } => nav.select_card(card, x, y),
        Action::ToggleMusic => {
            nav.toggle_music();
        }
        Action::NudgeVolume(delta) => {
            let volume = nav.volume() + delta;
            nav.set_volume(volume);
        }
        Action::FocusLost => nav.pause_music(),
        Action::Quit => return Effect::Quit,
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::navigation::TOTAL_SLIDES;
    use crate::test_support::{EffectCall, running_controller};

    fn swipe(start_x: f64, end_x: f64, kind: InputKind) -> Action {
        Action::Swipe {
            sample: GestureSample {
                start_x,
                start_y: 50.0,
                end_x,
                end_y: 55.0,
                duration_ms: 200,
                dragged: true,
            },
            kind,
        }
    }

    #[test]
    fn test_swipe_left_advances() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        assert_eq!(
            dispatch(&mut nav, &interpreter, swipe(100.0, 20.0, InputKind::Touch)),
            Effect::None
        );
        assert_eq!(nav.current_slide(), 1);
    }

    #[test]
    fn test_swipe_right_on_first_slide_is_dropped() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        dispatch(&mut nav, &interpreter, swipe(20.0, 100.0, InputKind::Pointer));
        assert_eq!(nav.current_slide(), 0);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn test_rapid_fire_keys_move_one_slide() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        for _ in 0..10 {
            dispatch(&mut nav, &interpreter, Action::NextSlide);
        }
        assert_eq!(nav.current_slide(), 1);
    }

    #[test]
    fn test_celebrate_depends_on_slide() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        dispatch(&mut nav, &interpreter, Action::Celebrate { at: Some((4, 9)) });
        assert_eq!(nav.current_slide(), 1);
        assert!(nav.effects().calls.contains(&EffectCall::TapRipple(4, 9)));

        nav.tick(500);
        dispatch(&mut nav, &interpreter, Action::GoToSlide(TOTAL_SLIDES - 1));
        nav.tick(1_000);
        let pending = nav.pending_tasks();
        dispatch(&mut nav, &interpreter, Action::Celebrate { at: None });
        assert_eq!(nav.pending_tasks(), pending + 4);
    }

    #[test]
    fn test_celebrate_after_teardown_leaves_effects_alone() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        nav.teardown();
        let calls = nav.effects().calls.len();
        dispatch(&mut nav, &interpreter, Action::Celebrate { at: Some((4, 9)) });
        assert_eq!(nav.effects().calls.len(), calls);
        assert_eq!(nav.current_slide(), 0);
    }

    #[test]
    fn test_celebrate_elsewhere_does_nothing() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        dispatch(&mut nav, &interpreter, Action::GoToSlide(2));
        nav.tick(500);
        let pending = nav.pending_tasks();
        dispatch(&mut nav, &interpreter, Action::Celebrate { at: None });
        assert_eq!(nav.current_slide(), 2);
        assert_eq!(nav.pending_tasks(), pending);
    }

    #[test]
    fn test_volume_nudges_accumulate() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        nav.set_volume(0.5);
        dispatch(&mut nav, &interpreter, Action::NudgeVolume(VOLUME_STEP));
        dispatch(&mut nav, &interpreter, Action::NudgeVolume(VOLUME_STEP));
        assert!((nav.volume() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_double_tap_plays_burst() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        nav.effects_mut().calls.clear();
        dispatch(&mut nav, &interpreter, Action::DoubleTap);
        assert_eq!(
            nav.effects().calls,
            vec![
                EffectCall::Confetti(30),
                EffectCall::HeartBurst,
                EffectCall::AmbientSparkles,
            ]
        );
    }

    #[test]
    fn test_focus_lost_stops_music() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        dispatch(&mut nav, &interpreter, Action::ToggleMusic);
        assert!(nav.effects().music_playing);
        dispatch(&mut nav, &interpreter, Action::FocusLost);
        assert!(!nav.effects().music_playing);
    }

    #[test]
    fn test_quit() {
        let mut nav = running_controller();
        let interpreter = GestureInterpreter::default();
        assert_eq!(dispatch(&mut nav, &interpreter, Action::Quit), Effect::Quit);
    }
}
