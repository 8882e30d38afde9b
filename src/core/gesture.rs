//! # Gesture Interpretation
//!
//! Turns a finished gesture into a navigation intent. The interpreter is
//! pure: one sample in, one `Intent` out, no memory between calls.
//!
//! ```text
//!   start ●─────────────────────● end        delta_x = start_x - end_x
//!                                             delta_x > 0  → Next
//!                                             delta_x < 0  → Previous
//! ```
//!
//! Touch gestures are stricter than pointer gestures: they must be quick
//! (under 500ms) and must have been recognised as a horizontal drag while
//! the finger was moving. That rules out fast taps whose start and end
//! happen to register far apart.

use log::debug;

/// Minimum horizontal travel, in logical pixels, for a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;
/// Touch gestures lasting this long or longer are not swipes.
pub const MAX_TOUCH_DURATION_MS: u64 = 500;
/// Horizontal travel that marks a touch as a drag while it is in motion.
pub const DRAG_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Previous,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Touch,
    /// Mouse-style input. Not time-gated and needs no drag flag.
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub duration_ms: u64,
    /// Set while moving once horizontal travel exceeded `DRAG_THRESHOLD`
    /// and dominated vertical travel.
    pub dragged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureInterpreter {
    pub min_swipe_distance: f64,
    pub max_touch_duration_ms: u64,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self {
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            max_touch_duration_ms: MAX_TOUCH_DURATION_MS,
        }
    }
}

impl GestureInterpreter {
    pub fn interpret(&self, sample: &GestureSample, kind: InputKind) -> Intent {
        let delta_x = sample.start_x - sample.end_x;
        let delta_y = sample.start_y - sample.end_y;

        if sample.duration_ms == 0 {
            return Intent::None;
        }

        if kind == InputKind::Touch {
            if sample.duration_ms >= self.max_touch_duration_ms {
                debug!("Swipe ignored: too slow ({}ms)", sample.duration_ms);
                return Intent::None;
            }
            if !sample.dragged {
                debug!("Swipe ignored: touch never dragged");
                return Intent::None;
            }
        }

        debug!("Swipe detected: deltaX={delta_x}, deltaY={delta_y}");

        if delta_y.abs() > delta_x.abs() {
            debug!("Vertical swipe ignored");
            return Intent::None;
        }

        if delta_x.abs() < self.min_swipe_distance {
            debug!("Swipe too small");
            return Intent::None;
        }

        if delta_x > 0.0 {
            Intent::Next
        } else if delta_x < 0.0 {
            Intent::Previous
        } else {
            Intent::None
        }
    }
}

/// Follows one gesture from press to release and builds its sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    start_x: f64,
    start_y: f64,
    start_ms: u64,
    dragged: bool,
}

impl DragTracker {
    pub fn begin(x: f64, y: f64, now_ms: u64) -> Self {
        Self {
            start_x: x,
            start_y: y,
            start_ms: now_ms,
            dragged: false,
        }
    }

    /// Record an intermediate position. Once set, the drag flag stays set.
    pub fn motion(&mut self, x: f64, y: f64) {
        let delta_x = x - self.start_x;
        let delta_y = y - self.start_y;
        if delta_x.abs() > delta_y.abs() && delta_x.abs() > DRAG_THRESHOLD {
            self.dragged = true;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged
    }

    /// Distance from the press position, used to tell taps from swipes.
    pub fn travel(&self, x: f64, y: f64) -> f64 {
        (x - self.start_x).hypot(y - self.start_y)
    }

    pub fn finish(self, x: f64, y: f64, now_ms: u64) -> GestureSample {
        GestureSample {
            start_x: self.start_x,
            start_y: self.start_y,
            end_x: x,
            end_y: y,
            duration_ms: now_ms.saturating_sub(self.start_ms),
            dragged: self.dragged,
        }
    }
}
