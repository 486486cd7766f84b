//! Viewport transform and coordinate mapping.
//!
//! The transform is a pan offset plus a uniform zoom, measured relative to an
//! anchor offset: the viewport-space position of the image's unscaled
//! top-left corner as reported by the host layout. Until the host reports the
//! anchor, every operation that depends on it returns `None` instead of
//! producing NaN pan values.

use serde::{Deserialize, Serialize};

use crate::constants::INITIAL_ZOOM;

/// A position in viewport or image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points (the pinch centroid for two touches).
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Multiplicative zoom step for the given sensitivity.
    ///
    /// `In` scales by `1 + s`, `Out` by `1 - s`.
    pub fn factor(self, sensitivity: f32) -> f32 {
        match self {
            ZoomDirection::In => 1.0 + sensitivity,
            ZoomDirection::Out => 1.0 - sensitivity,
        }
    }

    /// Wheel convention: scrolling up (negative delta) zooms in.
    pub fn from_wheel_delta(delta_y: f32) -> Self {
        if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }
}

/// Optional lower/upper limits for the zoom level.
///
/// Both limits are unset by default, which leaves zoom unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl ZoomBounds {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(min: Option<f32>, max: Option<f32>) -> Self {
        Self { min, max }
    }

    /// Clamp a zoom level into the configured range.
    pub fn clamp(&self, zoom: f32) -> f32 {
        let zoom = match self.min {
            Some(min) => zoom.max(min),
            None => zoom,
        };
        match self.max {
            Some(max) => zoom.min(max),
            None => zoom,
        }
    }
}

/// Pan/zoom state read by the renderer every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Horizontal offset of the image origin from the anchor, in viewport pixels
    pub pan_x: f32,
    /// Vertical offset of the image origin from the anchor, in viewport pixels
    pub pan_y: f32,
    /// Scale applied to the image when drawing (always > 0)
    pub zoom: f32,
    /// Viewport position of the image's unscaled origin, once the host reports it
    pub anchor_offset: Option<Point>,
}

impl ViewportTransform {
    /// Create a transform with the given zoom and pan and no anchor.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self {
            pan_x,
            pan_y,
            zoom,
            anchor_offset: None,
        }
    }

    /// Create an identity transform (zoom=1, no pan, no anchor).
    pub fn identity() -> Self {
        Self::new(INITIAL_ZOOM, 0.0, 0.0)
    }

    /// Set the anchor offset.
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor_offset = Some(Point::new(x, y));
        self
    }

    /// Identity pan/zoom that keeps this transform's anchor offset.
    pub fn reset(&self) -> Self {
        Self {
            anchor_offset: self.anchor_offset,
            ..Self::identity()
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f32, dy: f32) -> Self {
        Self {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..*self
        }
    }

    /// Zoom one step while keeping the image point under `cursor` fixed.
    ///
    /// `cursor` is in viewport coordinates. Returns `None` when the anchor
    /// offset is unknown or the resulting zoom would not be a finite positive
    /// number; the caller keeps the previous transform in that case.
    pub fn zoom_at(
        &self,
        direction: ZoomDirection,
        cursor: Point,
        sensitivity: f32,
        bounds: &ZoomBounds,
    ) -> Option<Self> {
        let anchor = self.anchor_offset?;
        let new_zoom = bounds.clamp(self.zoom * direction.factor(sensitivity));
        if !is_valid_zoom(new_zoom) {
            return None;
        }

        // Cursor measured from the image's unscaled origin
        let cursor_rel_x = cursor.x - anchor.x;
        let cursor_rel_y = cursor.y - anchor.y;

        // Pan offset relative to the cursor, before zooming
        let dist_x = self.pan_x - cursor_rel_x;
        let dist_y = self.pan_y - cursor_rel_y;

        let ratio = new_zoom / self.zoom;

        Some(Self {
            pan_x: dist_x * ratio + cursor_rel_x,
            pan_y: dist_y * ratio + cursor_rel_y,
            zoom: new_zoom,
            anchor_offset: self.anchor_offset,
        })
    }

    /// Convert a viewport position to image coordinates.
    pub fn to_image_space(&self, viewport: Point) -> Option<Point> {
        let anchor = self.anchor_offset?;
        Some(Point::new(
            (viewport.x - anchor.x - self.pan_x) / self.zoom,
            (viewport.y - anchor.y - self.pan_y) / self.zoom,
        ))
    }

    /// Convert image coordinates to a viewport position.
    pub fn to_viewport_space(&self, image: Point) -> Option<Point> {
        let anchor = self.anchor_offset?;
        Some(Point::new(
            image.x * self.zoom + self.pan_x + anchor.x,
            image.y * self.zoom + self.pan_y + anchor.y,
        ))
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Whether `zoom` can be used as a transform scale (finite and > 0).
pub fn is_valid_zoom(zoom: f32) -> bool {
    zoom.is_finite() && zoom > 0.0
}

/// Initial zoom that renders an image at `fit_ratio` of the viewport height.
///
/// Falls back to the initial zoom when the inputs cannot produce a valid
/// scale (zero image height, NaN or non-positive viewport height or ratio).
pub fn fit_zoom(viewport_height: f32, image_height: u32, fit_ratio: f32) -> f32 {
    if image_height == 0 {
        return INITIAL_ZOOM;
    }
    let zoom = viewport_height * fit_ratio / image_height as f32;
    if is_valid_zoom(zoom) { zoom } else { INITIAL_ZOOM }
}
