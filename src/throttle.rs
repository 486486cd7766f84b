//! Throttled value changes.
//!
//! Slider-style controls produce a stream of values far faster than the
//! compute engine can re-develop an image. [`ThrottledValue`] lets the first
//! change through immediately, then holds back later changes so at most one
//! value is emitted per interval. The most recent held value is released by
//! [`ThrottledValue::poll`] once the interval has passed.

use std::time::Duration;
use web_time::Instant;

use crate::constants::DEFAULT_ADJUSTMENT_THROTTLE_MS;

/// A value whose changes are emitted at most once per interval.
#[derive(Debug, Clone)]
pub struct ThrottledValue<T> {
    /// Value the control was created with
    original: T,
    /// Latest value set by the user
    value: T,
    /// Whether any value other than the original has been set
    has_changed: bool,
    /// Minimum time between two emissions
    interval: Duration,
    /// Time of the last emission
    last_emit: Option<Instant>,
    /// Latest value held back by the throttle
    pending: Option<T>,
}

impl<T: Clone + PartialEq> ThrottledValue<T> {
    /// Create a control starting at `original` with the default interval.
    pub fn new(original: T) -> Self {
        Self::with_interval(original, Duration::from_millis(DEFAULT_ADJUSTMENT_THROTTLE_MS))
    }

    pub fn with_interval(original: T, interval: Duration) -> Self {
        Self {
            value: original.clone(),
            original,
            has_changed: false,
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Latest value, emitted or not.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Set a new value now. See [`ThrottledValue::set_at`].
    pub fn set(&mut self, value: T) -> Option<T> {
        self.set_at(value, Instant::now())
    }

    /// Set a new value at `now`.
    ///
    /// Returns the value if it should be emitted immediately. Re-setting the
    /// original value before anything changed emits nothing. A held-back
    /// value is only stored here; callers that persist values record it
    /// themselves (see `ImageSession::throttled_adjustment_at`).
    pub fn set_at(&mut self, value: T, now: Instant) -> Option<T> {
        self.value = value.clone();
        if !self.has_changed && value == self.original {
            return None;
        }
        self.has_changed = true;

        if self.interval_elapsed(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            log::trace!("Throttle: holding back value");
            self.pending = Some(value);
            None
        }
    }

    /// Release the held-back value now. See [`ThrottledValue::poll_at`].
    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    /// Release the held-back value if the interval has elapsed at `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() || !self.interval_elapsed(now) {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}
