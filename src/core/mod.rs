//! # Core Session Logic
//!
//! Navigation, gestures, timers and the jingle.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • NavigationController │
//!                    │  • GestureInterpreter   │
//!                    │  • Action + dispatch()  │
//!                    │  • Scheduler (virtual)  │
//!                    │                         │
//!                    │  No I/O. No wall clock. │
//!                    └───────────┬─────────────┘
//!                                │ EffectDispatcher
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   Tests    │
//!     │   Stage    │                          │ (recorder) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`navigation`]: `NavigationController`, the slide/quote state machine
//! - [`gesture`]: `GestureInterpreter` and `DragTracker`
//! - [`action`]: the `Action` enum and `dispatch()`
//! - [`effects`]: the `EffectDispatcher` trait
//! - [`scheduler`]: virtual-time timers with cancellation
//! - [`music`]: the looping jingle
//! - [`deck`]: slide and quote text
//! - [`config`]: settings file, env and CLI layering

pub mod action;
pub mod config;
pub mod deck;
pub mod effects;
pub mod gesture;
pub mod music;
pub mod navigation;
pub mod scheduler;
