//! # TUI Components
//!
//! Every piece of the screen is a `Component` with its data passed in as
//! props. None of them hold state between frames; the `Stage` and the
//! `NavigationController` own everything that changes.
//!
//! ```text
//! components/
//! ├── mod.rs          (this file)
//! ├── title_bar.rs    (title and slide counter)
//! ├── slide_view.rs   (heading, text, button, quote card, cards)
//! ├── nav_dots.rs     (one dot per slide)
//! ├── music_bar.rs    (music toggle and volume meter)
//! ├── particles.rs    (hearts, sparkles, confetti, ripple)
//! └── loading.rs      (startup overlay)
//! ```
//!
//! Each file carries its own TestBackend tests.

mod loading;
mod music_bar;
mod nav_dots;
mod particles;
mod slide_view;
mod title_bar;

pub use loading::LoadingScreen;
pub use music_bar::MusicBar;
pub use nav_dots::NavDots;
pub use particles::ParticleLayer;
pub use slide_view::SlideView;
pub use title_bar::TitleBar;
