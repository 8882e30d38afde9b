use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use fete::core::action::{Effect, dispatch};
use fete::core::config::{FeteConfig, ResolvedConfig, resolve};
use fete::core::gesture::GestureInterpreter;
use fete::core::navigation::{FINALE_SLIDE, NavigationController, QUOTES_SLIDE};
use fete::tui::event::InputRouter;
use fete::tui::stage::{ParticleKind, Stage};
use fete::tui::ui::{ScreenLayout, draw_ui};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

// ============================================================================
// Helper Functions
// ============================================================================

/// A running session with a seeded stage. Particles are off unless asked
/// for, so they can't cover up text the assertions look for.
fn session(audio: bool, particles: bool) -> (NavigationController<Stage>, ResolvedConfig) {
    let mut config = resolve(&FeteConfig::default(), Some("Sam"), false);
    config.audio_enabled = audio;
    config.particles = particles;
    config.max_particles = 1_000;
    let stage = Stage::with_rng(&config, StdRng::seed_from_u64(42));
    let mut nav = NavigationController::new(stage, config.timings);
    nav.init();
    (nav, config)
}

/// Draws one 80×24 frame and returns its layout and screen text.
fn draw(nav: &NavigationController<Stage>, config: &ResolvedConfig) -> (ScreenLayout, String) {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut layout = ScreenLayout::default();
    terminal
        .draw(|f| layout = draw_ui(f, nav, config))
        .unwrap();
    let text = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect::<String>();
    (layout, text)
}

/// Routes one terminal event through the router and dispatches the result.
fn feed(
    nav: &mut NavigationController<Stage>,
    router: &mut InputRouter,
    layout: &ScreenLayout,
    event: Event,
    now_ms: u64,
) -> Effect {
    nav.tick(now_ms);
    let interpreter = GestureInterpreter::default();
    let mut effect = Effect::None;
    for action in router.route(&event, now_ms, layout) {
        if dispatch(nav, &interpreter, action) == Effect::Quit {
            effect = Effect::Quit;
        }
    }
    effect
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn confetti(nav: &NavigationController<Stage>) -> usize {
    nav.effects()
        .particles()
        .iter()
        .filter(|p| p.kind == ParticleKind::Confetti)
        .count()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_loading_screen_then_welcome() {
    let (mut nav, config) = session(false, false);
    let (_, text) = draw(&nav, &config);
    assert!(text.contains("Preparing something special"));

    nav.tick(2_000);
    assert!(!nav.is_loading());
    let (_, text) = draw(&nav, &config);
    assert!(!text.contains("Preparing something special"));
    assert!(text.contains("Happy Birthday, Sam!"));
    assert!(text.contains("1/5"));
}

#[test]
fn test_intro_celebration_after_loading() {
    let (mut nav, _) = session(false, true);
    nav.tick(2_000);
    assert_eq!(confetti(&nav), 0);
    nav.tick(3_500);
    assert_eq!(confetti(&nav), 20);
}

#[test]
fn test_keyboard_walkthrough() {
    let (mut nav, config) = session(false, false);
    let mut router = InputRouter::new();
    nav.tick(2_000);
    let (layout, _) = draw(&nav, &config);

    feed(&mut nav, &mut router, &layout, key(KeyCode::Right), 2_100);
    // Locked until the transition ends.
    feed(&mut nav, &mut router, &layout, key(KeyCode::Right), 2_200);
    assert_eq!(nav.current_slide(), QUOTES_SLIDE);

    nav.tick(2_600);
    let (layout, text) = draw(&nav, &config);
    assert!(text.contains("Words for You"));
    assert!(text.contains("John Lennon"));

    feed(&mut nav, &mut router, &layout, key(KeyCode::Char(']')), 2_700);
    nav.tick(3_200);
    let (_, text) = draw(&nav, &config);
    assert!(text.contains("Oprah Winfrey"));
}

#[test]
fn test_mouse_swipe_and_dot_click() {
    let (mut nav, config) = session(false, false);
    let mut router = InputRouter::new();
    nav.tick(2_000);
    let (layout, _) = draw(&nav, &config);
    let row = layout.slide.heading.y;

    feed(&mut nav, &mut router, &layout, mouse(MouseEventKind::Down(MouseButton::Left), 60, row), 2_100);
    feed(&mut nav, &mut router, &layout, mouse(MouseEventKind::Drag(MouseButton::Left), 40, row), 2_200);
    feed(&mut nav, &mut router, &layout, mouse(MouseEventKind::Up(MouseButton::Left), 20, row), 2_300);
    assert_eq!(nav.current_slide(), 1);

    nav.tick(2_800);
    let (layout, _) = draw(&nav, &config);
    let dot = layout.nav_dots[FINALE_SLIDE];
    feed(&mut nav, &mut router, &layout, mouse(MouseEventKind::Down(MouseButton::Left), dot.x, dot.y), 2_900);
    assert_eq!(nav.current_slide(), FINALE_SLIDE);
}

#[test]
fn test_finale_button_plays_waves() {
    let (mut nav, config) = session(false, true);
    let mut router = InputRouter::new();
    nav.tick(4_000);
    let (layout, _) = draw(&nav, &config);
    feed(&mut nav, &mut router, &layout, key(KeyCode::Char('5')), 4_000);
    nav.tick(4_600);

    let before = confetti(&nav);
    feed(&mut nav, &mut router, &layout, key(KeyCode::Enter), 4_600);
    nav.tick(4_600);
    assert_eq!(confetti(&nav), before + 100);
    assert!(nav.pending_tasks() >= 3);
}

#[test]
fn test_music_follows_focus() {
    let (mut nav, config) = session(true, false);
    let mut router = InputRouter::new();
    nav.tick(2_000);
    let (layout, _) = draw(&nav, &config);

    feed(&mut nav, &mut router, &layout, key(KeyCode::Char('m')), 2_100);
    nav.tick(2_100);
    assert!(nav.effects().music_playing());
    let (_, text) = draw(&nav, &config);
    assert!(text.contains("♪ C4"));

    feed(&mut nav, &mut router, &layout, Event::FocusLost, 2_200);
    assert!(!nav.effects().music_playing());
    assert_eq!(nav.effects().current_note(), None);
}

#[test]
fn test_muted_session_never_plays() {
    let (mut nav, config) = session(false, false);
    let mut router = InputRouter::new();
    let (layout, _) = draw(&nav, &config);
    feed(&mut nav, &mut router, &layout, key(KeyCode::Char('m')), 100);
    nav.tick(5_000);
    assert!(!nav.effects().music_playing());
}

#[test]
fn test_quit_and_teardown() {
    let (mut nav, config) = session(false, true);
    let mut router = InputRouter::new();
    nav.tick(3_600);
    let (layout, _) = draw(&nav, &config);

    assert_eq!(
        feed(&mut nav, &mut router, &layout, key(KeyCode::Char('q')), 3_700),
        Effect::Quit
    );
    nav.teardown();
    assert_eq!(nav.pending_tasks(), 0);
    assert!(nav.effects().particles().is_empty());

    feed(&mut nav, &mut router, &layout, key(KeyCode::Right), 3_800);
    nav.tick(10_000);
    assert_eq!(nav.current_slide(), 0);
    assert!(nav.effects().particles().is_empty());
}

#[test]
fn test_nan_volume_in_config_stays_usable() {
    let file: FeteConfig = toml::from_str("[audio]\nvolume = nan\n").unwrap();
    let config = resolve(&file, Some("Sam"), false);
    assert!(config.volume.is_finite());

    let stage = Stage::with_rng(&config, StdRng::seed_from_u64(42));
    let mut nav = NavigationController::new(stage, config.timings);
    nav.set_volume(config.volume);
    nav.init();
    nav.tick(2_000);
    let (layout, _) = draw(&nav, &config);

    let mut router = InputRouter::new();
    feed(&mut nav, &mut router, &layout, key(KeyCode::Char('+')), 2_100);
    assert!((0.0..=1.0).contains(&nav.volume()));
    assert!((0.0..=1.0).contains(&nav.effects().volume()));
}
