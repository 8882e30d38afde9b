//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the slides,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One `tokio::select!` over two sources:
//!
//! - **Frame timer** (~30fps): advances virtual time, which fires due
//!   scheduler tasks and moves particles, then redraws.
//! - **Terminal events**: advance time to "now" first so the router and
//!   controller see a consistent clock, then route and dispatch.
//!
//! Every frame remembers its `ScreenLayout`; mouse clicks are hit-tested
//! against the last frame the user actually saw.

mod component;
mod components;
pub mod event;
pub mod speaker;
pub mod stage;
pub mod ui;

use log::{info, warn};
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, EventStream,
};
use crossterm::execute;
use futures::StreamExt;
use tokio::time::MissedTickBehavior;

use crate::core::action::{Effect, dispatch};
use crate::core::config::ResolvedConfig;
use crate::core::gesture::GestureInterpreter;
use crate::core::navigation::NavigationController;
use crate::tui::event::InputRouter;
use crate::tui::stage::Stage;
use crate::tui::ui::ScreenLayout;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;
        info!("Terminal modes enabled (mouse capture, focus change)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableFocusChange, DisableMouseCapture);
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub async fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut nav = NavigationController::new(Stage::new(&config), config.timings);
    nav.set_volume(config.volume);
    let interpreter = GestureInterpreter::default();
    let mut router = InputRouter::new();
    let mut layout = ScreenLayout::default();

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Mouse capture unavailable, keyboard only: {}", e);
    }

    let start = Instant::now();
    nav.init();
    info!("Session started for {:?}", config.recipient);

    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            _ = frames.tick() => {
                nav.tick(elapsed_ms(start));
                if let Err(e) = terminal.draw(|f| layout = ui::draw_ui(f, &nav, &config)) {
                    break Err(e);
                }
                nav.effects_mut().set_viewport(layout.area);
            }
            maybe_event = events.next() => {
                let event = match maybe_event {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                };
                let now = elapsed_ms(start);
                nav.tick(now);

                let mut quit = false;
                for action in router.route(&event, now, &layout) {
                    if dispatch(&mut nav, &interpreter, action) == Effect::Quit {
                        quit = true;
                    }
                }
                if quit {
                    break Ok(());
                }
            }
        }
    };

    nav.teardown();
    drop(terminal_mode_guard);
    ratatui::restore();
    info!("fete shutting down");
    result
}
