//! # Navigation Controller
//!
//! Owns the session's position in the slide deck and the quote carousel,
//! and is the only thing allowed to change it.
//!
//! ```text
//! NavigationController
//! ├── current_slide: usize        // 0..TOTAL_SLIDES
//! ├── current_quote: usize        // 0..TOTAL_QUOTES
//! ├── is_transitioning: bool      // slide transition in flight
//! ├── scheduler: Scheduler<Task>  // every pending continuation
//! └── effects: E                  // EffectDispatcher
//! ```
//!
//! A slide request that is accepted flips `is_transitioning` and moves
//! `current_slide` before returning. Everything else (destination effects,
//! the flourish follow-up, releasing the flag) is a `Task` on the scheduler
//! and only runs from `tick()`. The flag is released by timeout, never by
//! acknowledgement from the presenter.
//!
//! Rejected requests are dropped, not queued.

use std::fmt;

use log::{debug, info, warn};

use crate::core::effects::{Card, EffectDispatcher};
use crate::core::scheduler::Scheduler;

pub const TOTAL_SLIDES: usize = 5;
pub const TOTAL_QUOTES: usize = 5;

pub const WELCOME_SLIDE: usize = 0;
pub const QUOTES_SLIDE: usize = 1;
pub const WISHES_SLIDE: usize = 2;
pub const MEMORIES_SLIDE: usize = 3;
pub const FINALE_SLIDE: usize = 4;

pub const ARRIVAL_CONFETTI: u32 = 50;
pub const INTRO_CONFETTI: u32 = 20;
pub const DOUBLE_TAP_CONFETTI: u32 = 30;
pub const FINALE_WAVES: u8 = 4;
pub const FINALE_HAPTIC_PATTERN: [u32; 5] = [100, 50, 100, 50, 200];

pub const DEFAULT_VOLUME: f32 = 0.5;

/// Every delay the controller uses, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long `is_transitioning` stays set after an accepted slide request.
    pub transition_ms: u64,
    /// Delay before destination-specific effects.
    pub effect_delay_ms: u64,
    /// Delay between the transition flourish and its hearts.
    pub flourish_hearts_ms: u64,
    pub autoplay_ms: u64,
    pub background_hearts_ms: u64,
    pub background_sparkles_ms: u64,
    pub loading_ms: u64,
    /// Measured from the end of loading.
    pub intro_hearts_ms: u64,
    /// Measured from the end of loading.
    pub intro_confetti_ms: u64,
    /// Spacing between finale waves.
    pub finale_wave_ms: u64,
    pub swipe_hint_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            transition_ms: 500,
            effect_delay_ms: 300,
            flourish_hearts_ms: 200,
            autoplay_ms: 4_000,
            background_hearts_ms: 4_000,
            background_sparkles_ms: 3_000,
            loading_ms: 2_000,
            intro_hearts_ms: 1_000,
            intro_confetti_ms: 1_500,
            finale_wave_ms: 500,
            swipe_hint_ms: 5_000,
        }
    }
}

/// Continuations the controller schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ReleaseTransition,
    SlideEffects(usize),
    FlourishHearts,
    FinaleWave(u8),
    QuoteAutoplay,
    BackgroundHearts,
    BackgroundSparkles,
    FinishLoading,
    IntroHearts,
    IntroConfetti,
    HideSwipeHint,
}

/// Why a navigation request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A slide transition is still in flight.
    Transitioning,
    AlreadyCurrent(usize),
    OutOfRange(usize),
    /// `next`/`prev` at the end of the deck. Slides do not wrap.
    AtBoundary,
    /// Before `init()` or after `teardown()`.
    NotRunning,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Transitioning => write!(f, "transition in progress"),
            Rejection::AlreadyCurrent(index) => write!(f, "already showing {index}"),
            Rejection::OutOfRange(index) => write!(f, "index {index} out of range"),
            Rejection::AtBoundary => write!(f, "already at the end of the deck"),
            Rejection::NotRunning => write!(f, "session not running"),
        }
    }
}

impl std::error::Error for Rejection {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    TornDown,
}

pub struct NavigationController<E> {
    effects: E,
    timings: Timings,
    scheduler: Scheduler<Task>,
    current_slide: usize,
    current_quote: usize,
    is_transitioning: bool,
    loading: bool,
    volume: f32,
    lifecycle: Lifecycle,
}

impl<E: EffectDispatcher> NavigationController<E> {
    pub fn new(effects: E, timings: Timings) -> Self {
        Self {
            effects,
            timings,
            scheduler: Scheduler::new(),
            current_slide: WELCOME_SLIDE,
            current_quote: 0,
            is_transitioning: false,
            loading: true,
            volume: DEFAULT_VOLUME,
            lifecycle: Lifecycle::Created,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start the session: ambient spawners, quote autoplay, loading screen.
    pub fn init(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            warn!("init() called twice, ignoring");
            return;
        }
        self.lifecycle = Lifecycle::Running;

        self.effects.set_loading(true);
        self.effects.play_background_hearts();
        self.effects.play_background_sparkles();

        self.scheduler
            .every(self.timings.background_hearts_ms, Task::BackgroundHearts);
        self.scheduler
            .every(self.timings.background_sparkles_ms, Task::BackgroundSparkles);
        self.scheduler.every(self.timings.autoplay_ms, Task::QuoteAutoplay);
        self.scheduler.after(self.timings.loading_ms, Task::FinishLoading);
        self.scheduler.after(self.timings.swipe_hint_ms, Task::HideSwipeHint);

        info!("Session started with {} pending tasks", self.scheduler.len());
    }

    /// Cancel every recurring timer and pending continuation.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            warn!("teardown() called twice, ignoring");
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        let cancelled = self.scheduler.cancel_all();
        self.effects.teardown();
        info!("Session torn down, cancelled {} pending tasks", cancelled);
    }

    /// Move the effects' clock to `now_ms`, then run every continuation
    /// due by then.
    pub fn tick(&mut self, now_ms: u64) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        self.effects.advance(now_ms);
        while let Some((_, task)) = self.scheduler.pop_due(now_ms) {
            self.run_task(task);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn current_quote(&self) -> usize {
        self.current_quote
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    // ========================================================================
    // Slides
    // ========================================================================

    pub fn request_slide(&mut self, target: usize) -> Result<(), Rejection> {
        self.ensure_running()?;
        if self.is_transitioning {
            return self.reject("Slide navigation", target, Rejection::Transitioning);
        }
        if target >= TOTAL_SLIDES {
            return self.reject("Slide navigation", target, Rejection::OutOfRange(target));
        }
        if target == self.current_slide {
            return self.reject("Slide navigation", target, Rejection::AlreadyCurrent(target));
        }

        let from = self.current_slide;
        let forward = target > from;
        self.is_transitioning = true;
        self.current_slide = target;
        debug!("Navigating from slide {} to slide {}", from, target);

        self.effects.begin_slide_transition(from, target, forward);
        self.scheduler
            .after(self.timings.effect_delay_ms, Task::SlideEffects(target));
        self.scheduler
            .after(self.timings.transition_ms, Task::ReleaseTransition);

        self.effects.play_transition_flourish();
        self.scheduler
            .after(self.timings.flourish_hearts_ms, Task::FlourishHearts);
        Ok(())
    }

    pub fn next_slide(&mut self) -> Result<(), Rejection> {
        self.ensure_running()?;
        if self.current_slide + 1 >= TOTAL_SLIDES {
            debug!("Already on last slide");
            return Err(Rejection::AtBoundary);
        }
        self.request_slide(self.current_slide + 1)
    }

    pub fn prev_slide(&mut self) -> Result<(), Rejection> {
        self.ensure_running()?;
        if self.current_slide == 0 {
            debug!("Already on first slide");
            return Err(Rejection::AtBoundary);
        }
        self.request_slide(self.current_slide - 1)
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    pub fn request_quote(&mut self, target: usize) -> Result<(), Rejection> {
        self.ensure_running()?;
        if target >= TOTAL_QUOTES {
            return self.reject("Quote navigation", target, Rejection::OutOfRange(target));
        }
        if target == self.current_quote {
            return self.reject("Quote navigation", target, Rejection::AlreadyCurrent(target));
        }
        if self.is_transitioning {
            return self.reject("Quote navigation", target, Rejection::Transitioning);
        }

        let from = self.current_quote;
        self.effects.begin_quote_transition(from, target, target > from);
        self.current_quote = target;
        debug!("Quote {} -> {}", from, target);
        Ok(())
    }

    pub fn next_quote(&mut self) -> Result<(), Rejection> {
        self.request_quote((self.current_quote + 1) % TOTAL_QUOTES)
    }

    pub fn prev_quote(&mut self) -> Result<(), Rejection> {
        self.request_quote((self.current_quote + TOTAL_QUOTES - 1) % TOTAL_QUOTES)
    }

    // ========================================================================
    // Celebrations and direct interaction
    // ========================================================================

    /// Schedule the four finale waves. Calls stack: two finales in quick
    /// succession play eight waves.
    pub fn trigger_finale(&mut self) -> Result<(), Rejection> {
        self.ensure_running()?;
        for wave in 0..FINALE_WAVES {
            self.scheduler.after(
                u64::from(wave) * self.timings.finale_wave_ms,
                Task::FinaleWave(wave),
            );
        }
        if self.effects.supports_haptics() {
            self.effects.play_haptic_pattern(&FINALE_HAPTIC_PATTERN);
        } else {
            debug!("Haptics unsupported, skipping finale vibration");
        }
        info!("Grand finale triggered");
        Ok(())
    }

    pub fn tap(&mut self, x: u16, y: u16) {
        if self.ensure_running().is_err() {
            return;
        }
        self.effects.play_tap_ripple(x, y);
        self.effects.play_random_hearts();
    }

    /// Ripple alone, for presses on a button that already has its own effect.
    pub fn ripple(&mut self, x: u16, y: u16) {
        if self.ensure_running().is_err() {
            return;
        }
        self.effects.play_tap_ripple(x, y);
    }

    pub fn double_tap(&mut self) {
        if self.ensure_running().is_err() {
            return;
        }
        self.effects.play_confetti_burst(DOUBLE_TAP_CONFETTI);
        self.effects.play_heart_burst();
        self.effects.play_ambient_sparkles();
    }

    pub fn select_card(&mut self, card: Card, x: u16, y: u16) {
        if self.ensure_running().is_err() {
            return;
        }
        debug!("Card selected: {:?}", card);
        self.effects.play_card_flourish(card, x, y);
    }

    // ========================================================================
    // Audio
    // ========================================================================

    pub fn toggle_music(&mut self) -> bool {
        if self.ensure_running().is_err() {
            return false;
        }
        let playing = self.effects.toggle_music();
        info!("Music {}", if playing { "playing" } else { "paused" });
        playing
    }

    /// Stop music without toggling, e.g. when the session loses focus.
    pub fn pause_music(&mut self) {
        self.effects.stop_music();
    }

    /// Clamped to `[0, 1]`. NaN and infinities keep the current volume.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            warn!("Ignoring non-finite volume {}", volume);
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.effects.set_volume(self.volume);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.lifecycle == Lifecycle::Running {
            Ok(())
        } else {
            Err(Rejection::NotRunning)
        }
    }

    fn reject(&self, what: &str, target: usize, reason: Rejection) -> Result<(), Rejection> {
        debug!(
            "{} blocked: {} (target={}, slide={}, quote={}, transitioning={})",
            what, reason, target, self.current_slide, self.current_quote, self.is_transitioning
        );
        Err(reason)
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ReleaseTransition => {
                self.is_transitioning = false;
                debug!("Slide transition complete. Now on slide {}", self.current_slide);
            }
            Task::SlideEffects(slide) => self.play_arrival_effects(slide),
            Task::FlourishHearts => self.effects.play_random_hearts(),
            Task::FinaleWave(wave) => self.play_finale_wave(wave),
            Task::QuoteAutoplay => {
                if self.current_slide == QUOTES_SLIDE {
                    let _ = self.next_quote();
                }
            }
            Task::BackgroundHearts => self.effects.play_background_hearts(),
            Task::BackgroundSparkles => self.effects.play_background_sparkles(),
            Task::FinishLoading => {
                self.loading = false;
                self.effects.set_loading(false);
                self.scheduler
                    .after(self.timings.intro_hearts_ms, Task::IntroHearts);
                self.scheduler
                    .after(self.timings.intro_confetti_ms, Task::IntroConfetti);
            }
            Task::IntroHearts => self.effects.play_heart_burst(),
            Task::IntroConfetti => self.effects.play_confetti_burst(INTRO_CONFETTI),
            Task::HideSwipeHint => self.effects.hide_swipe_hint(),
        }
    }

    fn play_arrival_effects(&mut self, slide: usize) {
        match slide {
            QUOTES_SLIDE => self.effects.play_ambient_sparkles(),
            WISHES_SLIDE => self.effects.play_floating_decor(),
            MEMORIES_SLIDE => self.effects.play_dense_sparkles(),
            FINALE_SLIDE => {
                self.effects.play_confetti_burst(ARRIVAL_CONFETTI);
                self.effects.play_heart_burst();
            }
            _ => {}
        }
    }

    fn play_finale_wave(&mut self, wave: u8) {
        debug!("Finale wave {}", wave);
        match wave {
            0 => {
                self.effects.play_confetti_burst(100);
                self.effects.play_heart_burst();
            }
            1 => {
                self.effects.play_confetti_burst(50);
                self.effects.play_ambient_sparkles();
            }
            2 => {
                self.effects.play_confetti_burst(50);
                self.effects.play_random_hearts();
            }
            _ => self.effects.play_heart_burst(),
        }
    }
}
