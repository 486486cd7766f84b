//! Global constants for the viewport controller

// =============================================================================
// Zoom
// =============================================================================

/// Zoom step for continuous wheel/trackpad input (1% per event)
pub const DEFAULT_WHEEL_SENSITIVITY: f32 = 0.01;

/// Zoom step for discrete pinch updates (10% per touch move)
pub const DEFAULT_PINCH_SENSITIVITY: f32 = 0.1;

/// Zoom level of a freshly created or reset viewport
pub const INITIAL_ZOOM: f32 = 1.0;

/// Share of the viewport height a "good fit" image should occupy
pub const DEFAULT_FIT_RATIO: f32 = 0.6;

// =============================================================================
// Gestures
// =============================================================================

/// Maximum gap between two taps that still counts as a double tap
pub const DEFAULT_DOUBLE_TAP_MS: u64 = 300;

/// Minimum interval between two adjustment change notifications
pub const DEFAULT_ADJUSTMENT_THROTTLE_MS: u64 = 500;

/// Touch count at which a gesture switches from panning to pinching
pub const PINCH_TOUCH_COUNT: usize = 2;

// =============================================================================
// Pixel buffers
// =============================================================================

/// Bytes per pixel in decoded RGBA buffers
pub const RGBA_CHANNELS: usize = 4;
