//! Double-tap detection.
//!
//! Hosts feed every tap (or click) on the viewport into a
//! [`DoubleTapDetector`]; a `true` result is usually answered by resetting
//! the view.

use std::time::Duration;
use web_time::Instant;

use crate::constants::DEFAULT_DOUBLE_TAP_MS;

/// Recognises two taps in quick succession.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    window: Duration,
    last_tap: Option<Instant>,
}

impl Default for DoubleTapDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DOUBLE_TAP_MS))
    }
}

impl DoubleTapDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_tap: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register a tap now.
    pub fn register_tap(&mut self) -> bool {
        self.register_tap_at(Instant::now())
    }

    /// Register a tap at `now`; returns true if it completes a double tap.
    ///
    /// The gap to the previous tap must be non-zero and shorter than the
    /// window. Every tap becomes the new reference, so a triple tap reports
    /// two double taps.
    pub fn register_tap_at(&mut self, now: Instant) -> bool {
        let is_double = self.last_tap.is_some_and(|last| {
            let gap = now.saturating_duration_since(last);
            !gap.is_zero() && gap < self.window
        });
        self.last_tap = Some(now);
        if is_double {
            log::trace!("Double tap detected");
        }
        is_double
    }

    /// Forget the previous tap.
    pub fn clear(&mut self) {
        self.last_tap = None;
    }
}
