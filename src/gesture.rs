//! Ephemeral gesture bookkeeping.

use crate::transform::Point;

/// Pan drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanDragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging, with the last observed pointer position (viewport space)
    Dragging { last_pos: Point },
}

impl PanDragState {
    /// Check if currently dragging
    pub fn is_dragging(&self) -> bool {
        matches!(self, PanDragState::Dragging { .. })
    }

    /// Get the last drag position if dragging
    pub fn last_pos(&self) -> Option<Point> {
        match self {
            PanDragState::Dragging { last_pos } => Some(*last_pos),
            PanDragState::Idle => None,
        }
    }

    /// Start dragging from the given position
    pub fn start_drag(&mut self, pos: Point) {
        *self = PanDragState::Dragging { last_pos: pos };
    }

    /// Advance the drag to `pos` and return the delta from the previous position.
    ///
    /// Returns `None` when not dragging.
    pub fn advance(&mut self, pos: Point) -> Option<(f32, f32)> {
        match self {
            PanDragState::Dragging { last_pos } => {
                let delta = (pos.x - last_pos.x, pos.y - last_pos.y);
                *last_pos = pos;
                Some(delta)
            }
            PanDragState::Idle => None,
        }
    }

    /// Stop dragging
    pub fn stop_drag(&mut self) {
        *self = PanDragState::Idle;
    }
}

/// Bookkeeping for the interaction currently in progress.
///
/// Reset whenever the displayed image changes and cleared piecewise as
/// gestures end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSession {
    /// Single-pointer pan state
    pub drag: PanDragState,
    /// Distance between the two touches at the previous pinch update
    pub pinch_baseline: Option<f32>,
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Record a new pinch distance, returning the previous baseline.
    pub fn replace_pinch_baseline(&mut self, distance: f32) -> Option<f32> {
        self.pinch_baseline.replace(distance)
    }

    pub fn clear_pinch(&mut self) {
        self.pinch_baseline = None;
    }
}
