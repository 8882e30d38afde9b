//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::effects::{Card, EffectDispatcher};
use crate::core::navigation::{NavigationController, Timings};

/// One call made on the dispatcher, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectCall {
    AmbientSparkles,
    FloatingDecor,
    DenseSparkles,
    Confetti(u32),
    HeartBurst,
    TransitionFlourish,
    RandomHearts,
    SlideTransition { from: usize, to: usize, forward: bool },
    QuoteTransition { from: usize, to: usize, from_right: bool },
    BackgroundHearts,
    BackgroundSparkles,
    Loading(bool),
    HideSwipeHint,
    TapRipple(u16, u16),
    CardFlourish(Card),
    Haptic(Vec<u32>),
    StopMusic,
    Volume(f32),
}

/// A dispatcher that records every call instead of drawing anything.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    pub calls: Vec<EffectCall>,
    pub haptics: bool,
    pub music_playing: bool,
    pub torn_down: bool,
}

impl EffectDispatcher for RecordingEffects {
    fn play_ambient_sparkles(&mut self) {
        self.calls.push(EffectCall::AmbientSparkles);
    }

    fn play_floating_decor(&mut self) {
        self.calls.push(EffectCall::FloatingDecor);
    }

    fn play_dense_sparkles(&mut self) {
        self.calls.push(EffectCall::DenseSparkles);
    }

    fn play_confetti_burst(&mut self, intensity: u32) {
        self.calls.push(EffectCall::Confetti(intensity));
    }

    fn play_heart_burst(&mut self) {
        self.calls.push(EffectCall::HeartBurst);
    }

    fn play_transition_flourish(&mut self) {
        self.calls.push(EffectCall::TransitionFlourish);
    }

    fn play_random_hearts(&mut self) {
        self.calls.push(EffectCall::RandomHearts);
    }

    fn begin_slide_transition(&mut self, from: usize, to: usize, forward: bool) {
        self.calls.push(EffectCall::SlideTransition { from, to, forward });
    }

    fn begin_quote_transition(&mut self, from: usize, to: usize, from_right: bool) {
        self.calls
            .push(EffectCall::QuoteTransition { from, to, from_right });
    }

    fn play_background_hearts(&mut self) {
        self.calls.push(EffectCall::BackgroundHearts);
    }

    fn play_background_sparkles(&mut self) {
        self.calls.push(EffectCall::BackgroundSparkles);
    }

    fn set_loading(&mut self, loading: bool) {
        self.calls.push(EffectCall::Loading(loading));
    }

    fn hide_swipe_hint(&mut self) {
        self.calls.push(EffectCall::HideSwipeHint);
    }

    fn play_tap_ripple(&mut self, x: u16, y: u16) {
        self.calls.push(EffectCall::TapRipple(x, y));
    }

    fn play_card_flourish(&mut self, card: Card, _x: u16, _y: u16) {
        self.calls.push(EffectCall::CardFlourish(card));
    }

    fn supports_haptics(&self) -> bool {
        self.haptics
    }

    fn play_haptic_pattern(&mut self, pattern: &[u32]) {
        self.calls.push(EffectCall::Haptic(pattern.to_vec()));
    }

    fn toggle_music(&mut self) -> bool {
        self.music_playing = !self.music_playing;
        self.music_playing
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
        self.calls.push(EffectCall::StopMusic);
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(EffectCall::Volume(volume));
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}

/// Creates an initialised controller with a recording dispatcher.
pub fn running_controller() -> NavigationController<RecordingEffects> {
    let mut nav = NavigationController::new(RecordingEffects::default(), Timings::default());
    nav.init();
    nav
}
