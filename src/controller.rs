//! Viewport controller: turns wheel, pointer and touch input into transform updates.
//!
//! The controller is owned by the hosting view. Every handler runs to
//! completion and commits the whole transform at once, so a renderer reading
//! [`ViewportController::transform`] between events never sees a half-applied
//! update. Subscribers registered with [`ViewportController::subscribe`] are
//! notified synchronously after each committed change.

use crate::config::ZoomConfig;
use crate::constants::{INITIAL_ZOOM, PINCH_TOUCH_COUNT};
use crate::event::{normalize_pointer_event, InputEvent, PointerEvent, TouchEvent, WheelEvent};
use crate::gesture::GestureSession;
use crate::store::{Store, SubscriptionId};
use crate::transform::{fit_zoom, is_valid_zoom, Point, ViewportTransform, ZoomDirection};

/// Interactive pan/zoom state for one viewport.
#[derive(Debug)]
pub struct ViewportController {
    transform: Store<ViewportTransform>,
    session: GestureSession,
    zoom_config: ZoomConfig,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportController {
    /// Create a controller with default zoom settings.
    pub fn new() -> Self {
        Self::with_config(ZoomConfig::default())
    }

    /// Create a controller with the given zoom settings.
    pub fn with_config(zoom_config: ZoomConfig) -> Self {
        Self {
            transform: Store::new(ViewportTransform::identity()),
            session: GestureSession::new(),
            zoom_config,
        }
    }

    /// Current transform snapshot.
    pub fn transform(&self) -> ViewportTransform {
        *self.transform.get()
    }

    /// Current gesture bookkeeping.
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    pub fn zoom_config(&self) -> &ZoomConfig {
        &self.zoom_config
    }

    /// Be notified after every committed transform change.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&ViewportTransform) + 'static,
    {
        self.transform.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.transform.unsubscribe(id)
    }

    // =========================================================================
    // Viewport state
    // =========================================================================

    /// Record where the host layout placed the image's unscaled origin.
    ///
    /// Repeating the previous offset changes nothing and notifies no one.
    pub fn set_anchor_offset(&mut self, x: f32, y: f32) {
        let anchor = Point::new(x, y);
        if self.transform.get().anchor_offset == Some(anchor) {
            return;
        }
        log::debug!("Anchor offset set to ({:.1}, {:.1})", x, y);
        self.transform.update(|t| t.anchor_offset = Some(anchor));
    }

    /// Return pan, zoom and gesture bookkeeping to their initial values.
    ///
    /// The anchor offset is layout-derived and survives the reset.
    pub fn reset(&mut self) {
        log::debug!("Resetting viewport interactions");
        self.session = GestureSession::new();
        self.transform.update(|t| *t = t.reset());
    }

    /// Initial zoom that shows an image of `image_height` pixels at the
    /// configured share of `viewport_height`.
    ///
    /// Always finite and positive, even for an unvalidated [`ZoomConfig`].
    pub fn fit_zoom(&self, viewport_height: f32, image_height: u32) -> f32 {
        let zoom = self
            .zoom_config
            .bounds()
            .clamp(fit_zoom(viewport_height, image_height, self.zoom_config.fit_ratio));
        if is_valid_zoom(zoom) { zoom } else { INITIAL_ZOOM }
    }

    /// Reset and apply the good-fit zoom for a newly displayed image.
    pub fn fit_to_height(&mut self, viewport_height: f32, image_height: u32) {
        let zoom = self.fit_zoom(viewport_height, image_height);
        log::debug!(
            "Fitting image of height {} into viewport of height {:.1}: zoom {:.3}",
            image_height,
            viewport_height,
            zoom
        );
        self.session = GestureSession::new();
        self.transform.update(|t| {
            *t = t.reset();
            t.zoom = zoom;
        });
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Zoom one step keeping the image point under `anchor` fixed.
    ///
    /// Returns `false` and leaves the transform untouched (notifying no one)
    /// when the anchor offset has not been reported yet or the zoom is
    /// already pinned at a configured limit.
    pub fn zoom_at(&mut self, direction: ZoomDirection, anchor: Point, sensitivity: f32) -> bool {
        let current = self.transform();
        match current.zoom_at(direction, anchor, sensitivity, &self.zoom_config.bounds()) {
            Some(next) if next.zoom == current.zoom => {
                log::trace!("Zoom {:?} ignored: already at limit {:.3}", direction, current.zoom);
                false
            }
            Some(next) => {
                log::trace!(
                    "Zoom {:?} at ({:.1}, {:.1}): {:.3} -> {:.3}",
                    direction,
                    anchor.x,
                    anchor.y,
                    current.zoom,
                    next.zoom
                );
                self.transform.set(next);
                true
            }
            None => {
                log::trace!("Zoom {:?} ignored: anchor offset unknown or zoom degenerate", direction);
                false
            }
        }
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) {
        let cursor = normalize_pointer_event(&event.pointer);
        let direction = ZoomDirection::from_wheel_delta(event.delta_y);
        self.zoom_at(direction, cursor, self.zoom_config.wheel_sensitivity);
    }

    // =========================================================================
    // Pan
    // =========================================================================

    fn pan_start(&mut self, pos: Point) {
        log::trace!("Pan start at ({:.1}, {:.1})", pos.x, pos.y);
        self.session.drag.start_drag(pos);
    }

    fn pan_move(&mut self, pos: Point) {
        // Delta from the previous event, not from drag start
        let Some((dx, dy)) = self.session.drag.advance(pos) else {
            return;
        };
        log::trace!("Pan by ({:.1}, {:.1})", dx, dy);
        self.transform.update(|t| *t = t.pan_by(dx, dy));
    }

    fn pan_end(&mut self) {
        if self.session.is_dragging() {
            log::trace!("Pan end");
        }
        self.session.drag.stop_drag();
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.pan_start(normalize_pointer_event(event));
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.pan_move(normalize_pointer_event(event));
    }

    pub fn on_pointer_up(&mut self) {
        self.pan_end();
    }

    // =========================================================================
    // Touch
    // =========================================================================

    pub fn on_touch_start(&mut self, event: &TouchEvent) {
        match event.touches.as_slice() {
            [] => {}
            [touch] => self.pan_start(normalize_pointer_event(touch)),
            // Panning is suppressed while pinching
            _ => self.session.drag.stop_drag(),
        }
    }

    pub fn on_touch_move(&mut self, event: &TouchEvent) {
        match event.touches.as_slice() {
            [touch] => self.pan_move(normalize_pointer_event(touch)),
            [first, second] => {
                let a = normalize_pointer_event(first);
                let b = normalize_pointer_event(second);
                self.pinch(a, b);
            }
            _ => {}
        }
    }

    pub fn on_touch_end(&mut self, event: &TouchEvent) {
        self.pan_end();
        if event.len() < PINCH_TOUCH_COUNT {
            self.session.clear_pinch();
        }
    }

    fn pinch(&mut self, a: Point, b: Point) {
        let distance = a.distance(b);
        let previous = self.session.replace_pinch_baseline(distance);

        let direction = match previous {
            Some(previous) if previous > 0.0 && distance > previous => ZoomDirection::In,
            Some(previous) if previous > 0.0 && distance < previous => ZoomDirection::Out,
            // First observation (or no change) only establishes the baseline
            _ => return,
        };
        self.zoom_at(direction, a.midpoint(b), self.zoom_config.pinch_sensitivity);
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Route a serializable input event to its handler.
    pub fn dispatch(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Wheel(wheel) => self.on_wheel(wheel),
            InputEvent::PointerDown(pointer) => self.on_pointer_down(pointer),
            InputEvent::PointerMove(pointer) => self.on_pointer_move(pointer),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::TouchStart(touch) => self.on_touch_start(touch),
            InputEvent::TouchMove(touch) => self.on_touch_move(touch),
            InputEvent::TouchEnd(touch) => self.on_touch_end(touch),
            InputEvent::Anchor { x, y } => self.set_anchor_offset(*x, *y),
            InputEvent::Reset => self.reset(),
        }
    }
}
