//! # Stage
//!
//! The terminal's `EffectDispatcher`. Every effect request becomes a handful
//! of short-lived particles, a slide/quote animation timer, or a note on the
//! music bar and speaker. Rendering reads the stage; it never mutates it.
//!
//! Particle coordinates are fractions of the viewport (0.0 = left/top,
//! 1.0 = right/bottom) so a resize mid-animation keeps them in place.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::core::config::ResolvedConfig;
use crate::core::effects::{Card, EffectDispatcher};
use crate::core::music::{AudioError, Jingle, Note, ToneSink};
use crate::tui::speaker::Speaker;

const HEARTS: [char; 2] = ['♥', '♡'];
const SPARKLES: [char; 4] = ['✦', '✧', '*', '⋆'];
const CONFETTI: [char; 4] = ['▪', '▴', '●', '◆'];
const DECOR: [char; 4] = ['❀', '✿', '♣', '◊'];

const HEART_COLORS: [Color; 3] = [
    Color::Rgb(255, 105, 180),
    Color::Rgb(255, 20, 147),
    Color::Rgb(255, 182, 193),
];
const SPARKLE_COLORS: [Color; 2] = [Color::Rgb(255, 215, 0), Color::Rgb(255, 250, 205)];
const CONFETTI_COLORS: [Color; 6] = [
    Color::Rgb(255, 105, 180),
    Color::Rgb(255, 20, 147),
    Color::Rgb(218, 112, 214),
    Color::Rgb(186, 85, 211),
    Color::Rgb(147, 112, 219),
    Color::Rgb(255, 215, 0),
];

const QUOTE_TRANSITION_MS: u64 = 450;
const RIPPLE_MS: u64 = 600;
const HEART_BURST_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Heart,
    Sparkle,
    Confetti,
    Decor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub glyph: char,
    pub color: Color,
    pub origin: (f32, f32),
    /// Total displacement over the particle's lifetime.
    pub drift: (f32, f32),
    pub born_ms: u64,
    pub delay_ms: u64,
    pub ttl_ms: u64,
}

impl Particle {
    /// Where the particle is at `now_ms`, or `None` if it hasn't appeared
    /// yet or has already gone.
    pub fn position(&self, now_ms: u64) -> Option<(f32, f32)> {
        let start = self.born_ms + self.delay_ms;
        if now_ms < start || self.ttl_ms == 0 {
            return None;
        }
        let t = (now_ms - start) as f32 / self.ttl_ms as f32;
        if t > 1.0 {
            return None;
        }
        Some((self.origin.0 + self.drift.0 * t, self.origin.1 + self.drift.1 * t))
    }

    fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.born_ms + self.delay_ms + self.ttl_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Animation {
    /// +1 slides in from the right, -1 from the left.
    direction: i8,
    started_ms: u64,
    duration_ms: u64,
}

impl Animation {
    fn progress(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (now_ms.saturating_sub(self.started_ms) as f32 / self.duration_ms as f32).min(1.0)
    }

    /// Horizontal offset in cells for a span of `width`, easing out.
    fn offset(&self, now_ms: u64, width: u16) -> i32 {
        let p = self.progress(now_ms);
        let remaining = (1.0 - p).powi(3);
        (remaining * f32::from(width)).round() as i32 * i32::from(self.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ripple {
    pub x: u16,
    pub y: u16,
    pub started_ms: u64,
}

/// Tone sink for a terminal. The note name always goes on the music bar;
/// with a speaker attached it is also played on the output device.
///
/// Without a speaker (muted sessions, tests) this is display only.
#[derive(Debug, Default)]
pub struct NowPlaying {
    enabled: bool,
    current: Option<&'static str>,
    speaker: Option<Speaker>,
}

impl NowPlaying {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: None,
            speaker: None,
        }
    }

    pub fn with_speaker(enabled: bool) -> Self {
        Self {
            speaker: enabled.then(Speaker::new),
            ..Self::new(enabled)
        }
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn has_speaker(&self) -> bool {
        self.speaker.is_some()
    }
}

impl ToneSink for NowPlaying {
    fn open(&mut self) -> Result<(), AudioError> {
        if !self.enabled {
            return Err(AudioError::Disabled);
        }
        match &mut self.speaker {
            Some(speaker) => speaker.open(),
            None => Ok(()),
        }
    }

    fn play(&mut self, note: &Note, gain: f32) -> Result<(), AudioError> {
        debug!("Note {} ({:.2} Hz) gain {:.3}", note.name, note.freq_hz, gain);
        if let Some(speaker) = &mut self.speaker {
            speaker.play(note, gain)?;
        }
        self.current = Some(note.name);
        Ok(())
    }

    fn silence(&mut self) {
        if let Some(speaker) = &mut self.speaker {
            speaker.silence();
        }
        self.current = None;
    }
}

pub struct Stage {
    rng: StdRng,
    particles: Vec<Particle>,
    particles_enabled: bool,
    max_particles: usize,
    now_ms: u64,
    viewport: Rect,
    jingle: Jingle<NowPlaying>,
    transition_ms: u64,
    slide_animation: Option<Animation>,
    quote_animation: Option<Animation>,
    ripple: Option<Ripple>,
    loading: bool,
    swipe_hint: bool,
}

impl Stage {
    /// Stage for a live session: random particles, notes on the speaker.
    pub fn new(config: &ResolvedConfig) -> Self {
        Self::with_sink(
            config,
            StdRng::from_entropy(),
            NowPlaying::with_speaker(config.audio_enabled),
        )
    }

    /// Seeded stage whose music only shows on the music bar.
    pub fn with_rng(config: &ResolvedConfig, rng: StdRng) -> Self {
        Self::with_sink(config, rng, NowPlaying::new(config.audio_enabled))
    }

    fn with_sink(config: &ResolvedConfig, rng: StdRng, sink: NowPlaying) -> Self {
        Self {
            rng,
            particles: Vec::new(),
            particles_enabled: config.particles,
            max_particles: config.max_particles,
            now_ms: 0,
            viewport: Rect::new(0, 0, 80, 24),
            jingle: Jingle::new(sink, config.volume),
            transition_ms: config.timings.transition_ms,
            slide_animation: None,
            quote_animation: None,
            ripple: None,
            loading: false,
            swipe_hint: true,
        }
    }

    // ========================================================================
    // Read side (used by rendering)
    // ========================================================================

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ripple(&self) -> Option<Ripple> {
        self.ripple
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn shows_swipe_hint(&self) -> bool {
        self.swipe_hint
    }

    pub fn music_playing(&self) -> bool {
        self.jingle.is_playing()
    }

    pub fn volume(&self) -> f32 {
        self.jingle.volume()
    }

    pub fn current_note(&self) -> Option<&'static str> {
        self.jingle.sink().current()
    }

    /// Horizontal offset of the incoming slide, 0 once it has landed.
    pub fn slide_offset(&self, width: u16) -> i32 {
        self.slide_animation
            .map_or(0, |a| a.offset(self.now_ms, width))
    }

    pub fn quote_offset(&self, width: u16) -> i32 {
        self.quote_animation
            .map_or(0, |a| a.offset(self.now_ms, width))
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    fn spawn(&mut self, particle: Particle) {
        if !self.particles_enabled || self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> T {
        *options
            .choose(&mut self.rng)
            .unwrap_or_else(|| unreachable!("glyph tables are non-empty"))
    }

    fn rising(&mut self, kind: ParticleKind, x_max: f32, ttl_ms: (u64, u64), max_delay_ms: u64) {
        let glyph = match kind {
            ParticleKind::Decor => self.pick(&DECOR),
            _ => self.pick(&HEARTS),
        };
        let color = match kind {
            ParticleKind::Decor => self.pick(&CONFETTI_COLORS),
            _ => self.pick(&HEART_COLORS),
        };
        let particle = Particle {
            kind,
            glyph,
            color,
            origin: (self.rng.gen_range(0.0..x_max), 1.05),
            drift: (self.rng.gen_range(-0.05..0.05), -1.15),
            born_ms: self.now_ms,
            delay_ms: if max_delay_ms == 0 {
                0
            } else {
                self.rng.gen_range(0..max_delay_ms)
            },
            ttl_ms: self.rng.gen_range(ttl_ms.0..=ttl_ms.1),
        };
        self.spawn(particle);
    }

    fn twinkle(&mut self, origin: (f32, f32), delay_ms: u64, ttl_ms: u64) {
        let glyph = self.pick(&SPARKLES);
        let color = self.pick(&SPARKLE_COLORS);
        let particle = Particle {
            kind: ParticleKind::Sparkle,
            glyph,
            color,
            origin,
            drift: (0.0, -0.05),
            born_ms: self.now_ms,
            delay_ms,
            ttl_ms,
        };
        self.spawn(particle);
    }

    fn random_point(&mut self, max: f32) -> (f32, f32) {
        (self.rng.gen_range(0.0..max), self.rng.gen_range(0.0..max))
    }

    /// Converts a cell position to viewport fractions.
    fn to_fraction(&self, x: u16, y: u16) -> (f32, f32) {
        let width = f32::from(self.viewport.width.max(1));
        let height = f32::from(self.viewport.height.max(1));
        (
            f32::from(x.saturating_sub(self.viewport.x)) / width,
            f32::from(y.saturating_sub(self.viewport.y)) / height,
        )
    }
}

impl EffectDispatcher for Stage {
    fn play_ambient_sparkles(&mut self) {
        for _ in 0..5 {
            let origin = self.random_point(0.9);
            self.twinkle(origin, 0, 2_000);
        }
    }

    fn play_floating_decor(&mut self) {
        for _ in 0..2 {
            self.rising(ParticleKind::Decor, 0.8, (8_000, 10_000), 2_000);
        }
    }

    fn play_dense_sparkles(&mut self) {
        for i in 0..8 {
            let origin = self.random_point(1.0);
            self.twinkle(origin, i * 200, 3_000);
        }
    }

    fn play_confetti_burst(&mut self, intensity: u32) {
        for _ in 0..intensity {
            let glyph = self.pick(&CONFETTI);
            let color = self.pick(&CONFETTI_COLORS);
            let particle = Particle {
                kind: ParticleKind::Confetti,
                glyph,
                color,
                origin: (self.rng.gen_range(0.0..1.0), -0.05),
                drift: (self.rng.gen_range(-0.1..0.1), 1.1),
                born_ms: self.now_ms,
                delay_ms: self.rng.gen_range(0..500),
                ttl_ms: self.rng.gen_range(2_000..=3_000),
            };
            self.spawn(particle);
        }
    }

    fn play_heart_burst(&mut self) {
        for i in 0..HEART_BURST_SIZE {
            let angle = (i as f32) * std::f32::consts::TAU / HEART_BURST_SIZE as f32;
            let glyph = self.pick(&HEARTS);
            let color = self.pick(&HEART_COLORS);
            let particle = Particle {
                kind: ParticleKind::Heart,
                glyph,
                color,
                origin: (0.5, 0.5),
                drift: (angle.cos() * 0.3, angle.sin() * 0.3),
                born_ms: self.now_ms,
                delay_ms: i as u64 * 100,
                ttl_ms: 2_000,
            };
            self.spawn(particle);
        }
    }

    fn play_transition_flourish(&mut self) {
        self.play_ambient_sparkles();
    }

    fn play_random_hearts(&mut self) {
        for _ in 0..3 {
            self.rising(ParticleKind::Heart, 0.9, (3_000, 3_000), 0);
        }
    }

    fn begin_slide_transition(&mut self, from: usize, to: usize, forward: bool) {
        debug!("Stage: slide {} -> {} (forward={})", from, to, forward);
        self.slide_animation = Some(Animation {
            direction: if forward { 1 } else { -1 },
            started_ms: self.now_ms,
            duration_ms: self.transition_ms,
        });
    }

    fn begin_quote_transition(&mut self, _from: usize, _to: usize, from_right: bool) {
        self.quote_animation = Some(Animation {
            direction: if from_right { 1 } else { -1 },
            started_ms: self.now_ms,
            duration_ms: QUOTE_TRANSITION_MS,
        });
    }

    fn play_background_hearts(&mut self) {
        for _ in 0..2 {
            self.rising(ParticleKind::Heart, 0.9, (4_000, 6_000), 2_000);
        }
    }

    fn play_background_sparkles(&mut self) {
        for _ in 0..3 {
            let origin = self.random_point(0.9);
            let delay = self.rng.gen_range(0..2_000);
            self.twinkle(origin, delay, 4_000 - delay);
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn hide_swipe_hint(&mut self) {
        self.swipe_hint = false;
    }

    fn play_tap_ripple(&mut self, x: u16, y: u16) {
        self.ripple = Some(Ripple {
            x,
            y,
            started_ms: self.now_ms,
        });
    }

    fn play_card_flourish(&mut self, card: Card, x: u16, y: u16) {
        let (cx, cy) = self.to_fraction(x, y);
        match card {
            Card::Wish(_) => {
                for _ in 0..4 {
                    let dx = self.rng.gen_range(-0.08..0.08);
                    let dy = self.rng.gen_range(-0.1..0.1);
                    self.twinkle((cx + dx, cy + dy), 0, 2_000);
                }
            }
            Card::Memory(_) => {
                for _ in 0..3 {
                    let glyph = self.pick(&HEARTS);
                    let color = self.pick(&HEART_COLORS);
                    let particle = Particle {
                        kind: ParticleKind::Heart,
                        glyph,
                        color,
                        origin: (cx + self.rng.gen_range(-0.08..0.08), cy),
                        drift: (0.0, -0.2),
                        born_ms: self.now_ms,
                        delay_ms: 0,
                        ttl_ms: 2_000,
                    };
                    self.spawn(particle);
                }
            }
        }
    }

    fn play_haptic_pattern(&mut self, pattern: &[u32]) {
        debug!("Terminal has no haptics, dropping pattern {:?}", pattern);
    }

    fn toggle_music(&mut self) -> bool {
        self.jingle.toggle()
    }

    fn stop_music(&mut self) {
        if self.jingle.is_playing() {
            self.jingle.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.jingle.set_volume(volume);
    }

    fn advance(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.particles.retain(|p| !p.expired(now_ms));
        self.jingle.advance(now_ms);

        if self
            .slide_animation
            .is_some_and(|a| a.progress(now_ms) >= 1.0)
        {
            self.slide_animation = None;
        }
        if self
            .quote_animation
            .is_some_and(|a| a.progress(now_ms) >= 1.0)
        {
            self.quote_animation = None;
        }
        if self
            .ripple
            .is_some_and(|r| now_ms.saturating_sub(r.started_ms) >= RIPPLE_MS)
        {
            self.ripple = None;
        }
    }

    fn teardown(&mut self) {
        self.jingle.stop();
        self.particles.clear();
        self.ripple = None;
        self.slide_animation = None;
        self.quote_animation = None;
    }
}

/// Ripple glyph for the given age, or `None` once it has faded.
pub fn ripple_glyph(ripple: Ripple, now_ms: u64) -> Option<char> {
    let age = now_ms.saturating_sub(ripple.started_ms);
    match age * 3 / RIPPLE_MS {
        0 => Some('·'),
        1 => Some('o'),
        2 => Some('◯'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{FeteConfig, resolve};

    fn stage_with(audio: bool, max_particles: usize) -> Stage {
        let mut config = resolve(&FeteConfig::default(), None, false);
        config.audio_enabled = audio;
        config.max_particles = max_particles;
        config.particles = true;
        Stage::with_rng(&config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_confetti_intensity_is_piece_count() {
        let mut stage = stage_with(false, 1_000);
        stage.play_confetti_burst(50);
        assert_eq!(stage.particles().len(), 50);
        assert!(stage
            .particles()
            .iter()
            .all(|p| p.kind == ParticleKind::Confetti));
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut stage = stage_with(false, 10);
        stage.play_heart_burst();
        stage.play_confetti_burst(5);
        assert_eq!(stage.particles().len(), 10);
        assert_eq!(stage.particles()[9].kind, ParticleKind::Confetti);
    }

    #[test]
    fn test_particles_disabled() {
        let mut config = resolve(&FeteConfig::default(), None, true);
        config.particles = false;
        let mut stage = Stage::with_rng(&config, StdRng::seed_from_u64(1));
        stage.play_confetti_burst(100);
        stage.play_heart_burst();
        assert!(stage.particles().is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut stage = stage_with(false, 1_000);
        stage.play_heart_burst();
        stage.advance(1_000);
        assert_eq!(stage.particles().len(), HEART_BURST_SIZE);
        // Last heart starts at 700ms and lives 2000ms.
        stage.advance(2_700);
        assert!(stage.particles().is_empty());
    }

    #[test]
    fn test_particle_position_respects_delay() {
        let p = Particle {
            kind: ParticleKind::Heart,
            glyph: '♥',
            color: Color::Red,
            origin: (0.5, 0.5),
            drift: (0.2, -0.4),
            born_ms: 100,
            delay_ms: 100,
            ttl_ms: 1_000,
        };
        assert_eq!(p.position(150), None);
        assert_eq!(p.position(200), Some((0.5, 0.5)));
        let (x, y) = p.position(700).unwrap();
        assert!((x - 0.6).abs() < 1e-6);
        assert!((y - 0.3).abs() < 1e-6);
        assert_eq!(p.position(1_300), None);
    }

    #[test]
    fn test_slide_animation_settles() {
        let mut stage = stage_with(false, 100);
        stage.advance(1_000);
        stage.begin_slide_transition(0, 1, true);
        assert_eq!(stage.slide_offset(80), 80);
        stage.advance(1_250);
        let mid = stage.slide_offset(80);
        assert!(mid > 0 && mid < 80, "mid-transition offset {mid}");
        stage.advance(1_500);
        assert_eq!(stage.slide_offset(80), 0);

        stage.begin_slide_transition(1, 0, false);
        assert_eq!(stage.slide_offset(80), -80);
    }

    #[test]
    fn test_music_disabled_stays_off() {
        let mut stage = stage_with(false, 100);
        assert!(!stage.toggle_music());
        assert!(!stage.music_playing());
    }

    #[test]
    fn test_music_shows_current_note() {
        let mut stage = stage_with(true, 100);
        assert!(stage.toggle_music());
        stage.advance(0);
        assert_eq!(stage.current_note(), Some("C4"));
        stage.advance(4_400);
        assert_eq!(stage.current_note(), Some("G4"));

        stage.stop_music();
        assert!(!stage.music_playing());
        assert_eq!(stage.current_note(), None);
    }

    #[test]
    fn test_ripple_fades() {
        let mut stage = stage_with(false, 100);
        stage.play_tap_ripple(10, 5);
        let ripple = stage.ripple().unwrap();
        assert_eq!(ripple_glyph(ripple, 0), Some('·'));
        assert_eq!(ripple_glyph(ripple, 450), Some('◯'));
        stage.advance(600);
        assert!(stage.ripple().is_none());
    }

    #[test]
    fn test_card_flourish_lands_near_card() {
        let mut stage = stage_with(false, 100);
        stage.set_viewport(Rect::new(0, 0, 100, 50));
        stage.play_card_flourish(Card::Memory(1), 50, 25);
        assert_eq!(stage.particles().len(), 3);
        for p in stage.particles() {
            assert!((p.origin.0 - 0.5).abs() <= 0.081);
            assert!((p.origin.1 - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_teardown_clears_everything() {
        let mut stage = stage_with(true, 100);
        stage.toggle_music();
        stage.play_confetti_burst(20);
        stage.play_tap_ripple(1, 1);
        stage.teardown();
        assert!(stage.particles().is_empty());
        assert!(stage.ripple().is_none());
        assert!(!stage.music_playing());
    }

    #[test]
    fn test_muted_sink_has_no_speaker() {
        let mut sink = NowPlaying::with_speaker(false);
        assert!(!sink.has_speaker());
        assert!(matches!(sink.open(), Err(AudioError::Disabled)));
    }

    #[test]
    fn test_display_only_sink_shows_notes() {
        let mut sink = NowPlaying::new(true);
        assert!(sink.open().is_ok());
        sink.play(&crate::core::music::MELODY[4], 0.05).unwrap();
        assert_eq!(sink.current(), Some("F4"));
        sink.silence();
        assert_eq!(sink.current(), None);
    }
}
