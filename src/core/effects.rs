//! # Effect Dispatch
//!
//! The navigation core never draws anything. It asks an `EffectDispatcher`
//! for decorative effects and audio, and the dispatcher decides what that
//! looks like on the current platform.
//!
//! Implementations must be cheap to call and must not fail: an effect that
//! cannot be shown is simply skipped. Capabilities that may be missing
//! (haptics) are probed with a query before use.

/// A card on the wishes or memories slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Wish(usize),
    Memory(usize),
}

pub trait EffectDispatcher {
    // ── Destination choreography ───────────────────────────────────────────
    fn play_ambient_sparkles(&mut self);
    fn play_floating_decor(&mut self);
    fn play_dense_sparkles(&mut self);
    /// `intensity` is the number of confetti pieces.
    fn play_confetti_burst(&mut self, intensity: u32);
    fn play_heart_burst(&mut self);

    // ── Transitions ────────────────────────────────────────────────────────
    fn play_transition_flourish(&mut self);
    fn play_random_hearts(&mut self);
    fn begin_slide_transition(&mut self, from: usize, to: usize, forward: bool);
    fn begin_quote_transition(&mut self, from: usize, to: usize, from_right: bool);

    // ── Ambient ────────────────────────────────────────────────────────────
    fn play_background_hearts(&mut self);
    fn play_background_sparkles(&mut self);
    fn set_loading(&mut self, loading: bool);
    fn hide_swipe_hint(&mut self);

    // ── Direct interaction ─────────────────────────────────────────────────
    fn play_tap_ripple(&mut self, x: u16, y: u16);
    fn play_card_flourish(&mut self, card: Card, x: u16, y: u16);

    /// Platforms without a vibration motor return false.
    fn supports_haptics(&self) -> bool {
        false
    }
    /// Alternating on/off durations in milliseconds.
    fn play_haptic_pattern(&mut self, pattern: &[u32]);

    // ── Audio ──────────────────────────────────────────────────────────────
    /// Returns whether music is playing after the toggle.
    fn toggle_music(&mut self) -> bool;
    fn stop_music(&mut self);
    fn set_volume(&mut self, volume: f32);

    // ── Lifecycle ──────────────────────────────────────────────────────────
    /// Called once per frame with the session clock.
    fn advance(&mut self, _now_ms: u64) {}
    fn teardown(&mut self) {}
}
