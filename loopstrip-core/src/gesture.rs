//! Drag session captured between pointer-down and the matching release.

use crate::constants::swipe;
use crate::messages::{PointerInput, PointerKind};

/// Outcome of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Dragged left past the threshold: reveal the next slide.
    Next,
    /// Dragged right past the threshold: reveal the previous slide.
    Prev,
    /// Too short; animate back to the resting offset.
    SnapBack,
}

/// Pointer drag in progress: which pointer, where it went down and the track
/// offset at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pointer_id: i32,
    origin_x: f32,
    start_offset: f32,
}

impl DragSession {
    /// Whether `input` may start a drag. Secondary mouse buttons never do.
    pub fn can_start(input: &PointerInput) -> bool {
        input.kind != PointerKind::Mouse
            || input.button == swipe::PRIMARY_BUTTON
    }

    /// Start a drag for `input` with the track resting at `start_offset`.
    pub fn begin(input: &PointerInput, start_offset: f32) -> Self {
        Self {
            pointer_id: input.pointer_id,
            origin_x: input.x,
            start_offset,
        }
    }

    /// Move the drag origin's track offset, keeping the pointer origin.
    /// Used when a resize changes the step mid-drag.
    pub fn rebase(&mut self, start_offset: f32) {
        self.start_offset = start_offset;
    }

    /// Captured pointer.
    pub fn pointer_id(&self) -> i32 {
        self.pointer_id
    }

    /// Whether `input` comes from the captured pointer.
    pub fn owns(&self, input: &PointerInput) -> bool {
        self.pointer_id == input.pointer_id
    }

    /// Horizontal distance from the press point; negative is leftwards.
    pub fn displacement(&self, x: f32) -> f32 {
        x - self.origin_x
    }

    /// Track offset that follows the pointer 1:1.
    pub fn follow(&self, x: f32) -> f32 {
        self.start_offset + self.displacement(x)
    }

    /// Classify a release at `x`. The displacement must strictly exceed
    /// `threshold` to commit.
    pub fn release(&self, x: f32, threshold: f32) -> Release {
        let dx = self.displacement(x);
        if dx.abs() > threshold {
            if dx < 0.0 { Release::Next } else { Release::Prev }
        } else {
            Release::SnapBack
        }
    }
}
