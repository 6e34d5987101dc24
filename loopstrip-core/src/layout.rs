//! Measurement input and derived strip metrics.

use serde::{Deserialize, Serialize};

/// What the host measured: the width of one real card, the gap between
/// cards on the track, and the width of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Width of one card (px).
    pub card_width: f32,
    /// Gap between adjacent cards (px).
    pub gap: f32,
    /// Width of the visible viewport (px).
    pub viewport_width: f32,
}

impl Layout {
    /// Measurement from raw pixel values.
    pub const fn new(card_width: f32, gap: f32, viewport_width: f32) -> Self {
        Self {
            card_width,
            gap,
            viewport_width,
        }
    }
}

/// Metrics recomputed on every measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Distance between adjacent slide origins (card width + gap).
    pub step: f32,
    /// Cards that fully fit in the viewport, at least one.
    pub visible_count: usize,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            step: 0.0,
            visible_count: 1,
        }
    }
}

impl Metrics {
    /// Derive metrics; negative or non-finite sizes count as zero.
    pub fn measure(layout: &Layout) -> Self {
        let w = sanitize(layout.card_width);
        let g = sanitize(layout.gap);
        let step = w + g;
        // Count of fully visible cards: floor((viewport + g) / (w + g))
        let stride = w.max(1.0) + g;
        let raw = ((sanitize(layout.viewport_width) + g) / stride).floor();
        Self {
            step,
            visible_count: (raw as usize).max(1),
        }
    }

    /// Track offset that puts `index` at the left edge of the viewport.
    #[inline]
    pub fn offset_for(&self, index: usize) -> f32 {
        -(index as f32) * self.step
    }
}

// Layout reads can be NaN or negative while a host is still laying out.
fn sanitize(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_card_plus_gap() {
        let m = Metrics::measure(&Layout::new(180.0, 20.0, 900.0));
        assert_eq!(m.step, 200.0);
        // (900 + 20) / 200 = 4.6
        assert_eq!(m.visible_count, 4);
        assert_eq!(m.offset_for(5), -1000.0);
    }

    #[test]
    fn narrow_viewport_still_shows_one() {
        let m = Metrics::measure(&Layout::new(300.0, 16.0, 120.0));
        assert_eq!(m.visible_count, 1);
    }

    #[test]
    fn unmeasured_layout_is_harmless() {
        let m = Metrics::measure(&Layout::new(f32::NAN, -4.0, 0.0));
        assert_eq!(m.step, 0.0);
        assert_eq!(m.visible_count, 1);
        assert_eq!(m.offset_for(3), 0.0);
    }
}
