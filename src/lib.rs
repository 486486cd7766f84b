//! rawview - interactive pan/zoom viewport for developed raw images
//!
//! The heart of the crate is [`ViewportController`], which turns wheel,
//! pointer and touch input into a pan/zoom [`ViewportTransform`] that a
//! renderer reads every frame. [`ImageSession`] ties the controller to an
//! external [`ComputeEngine`] so the viewport resets whenever the displayed
//! image changes identity.

pub mod adjustments;
pub mod config;
pub mod constants;
pub mod controller;
pub mod double_tap;
pub mod engine;
pub mod event;
pub mod gesture;
pub mod session;
pub mod store;
pub mod throttle;
pub mod transform;

#[cfg(test)]
mod tests;

pub use adjustments::{AdjustmentKey, Adjustments, AdjustmentsByFile};
pub use config::{ConfigError, LogLevel, ViewerConfig};
pub use controller::ViewportController;
pub use double_tap::DoubleTapDetector;
pub use engine::{ComputeEngine, DecodeStage, DecodedImage, EngineError};
pub use event::{normalize_pointer_event, InputEvent, PointerEvent, TouchEvent, WheelEvent};
pub use gesture::{GestureSession, PanDragState};
pub use session::{ImageSession, SessionError};
pub use store::{Store, SubscriptionId};
pub use throttle::ThrottledValue;
pub use transform::{fit_zoom, is_valid_zoom, Point, ViewportTransform, ZoomBounds, ZoomDirection};
