//! Tunables for a carousel instance.
//!
//! Every field has a compiled default from [`crate::constants`], so a partial
//! TOML/JSON document deserializes into a complete config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{autoplay, swipe, transition};
use crate::error::ConfigError;

/// How far a single autoplay tick moves the strip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceMode {
    /// One card per tick.
    #[default]
    Item,
    /// As many cards as currently fit in the viewport.
    Page,
}

/// Static configuration for one carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Master switch. When false no autoplay timer is ever armed.
    pub autoplay: bool,
    /// Time between automatic advances (ms).
    pub autoplay_interval_ms: u64,
    /// Delay after the last interaction before autoplay resumes (ms).
    /// Every new interaction restarts this window.
    pub resume_cooldown_ms: u64,
    /// Distance covered by one autoplay tick.
    pub autoplay_step: AdvanceMode,
    /// Absolute floor of the swipe commit threshold (px).
    pub min_swipe_px: f32,
    /// Swipe commit threshold relative to the card step. The effective
    /// threshold is `max(min_swipe_px, step * swipe_step_fraction)`.
    pub swipe_step_fraction: f32,
    /// Transition the host should install when it has none of its own (ms).
    pub transition_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_interval_ms: autoplay::INTERVAL_MS,
            resume_cooldown_ms: autoplay::RESUME_COOLDOWN_MS,
            autoplay_step: AdvanceMode::Item,
            min_swipe_px: swipe::MIN_DISTANCE_PX,
            swipe_step_fraction: swipe::STEP_FRACTION,
            transition_ms: transition::DEFAULT_MS,
        }
    }
}

impl CarouselConfig {
    /// Autoplay period.
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    /// Interaction cooldown.
    pub fn resume_cooldown(&self) -> Duration {
        Duration::from_millis(self.resume_cooldown_ms)
    }

    /// Fallback transition duration.
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Swipe distance a release must exceed to commit a navigation.
    pub fn swipe_threshold(&self, step: f32) -> f32 {
        self.min_swipe_px.max(step * self.swipe_step_fraction)
    }

    /// Reject values that would stall timers or make every drag commit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "autoplay_interval_ms",
            });
        }
        if self.resume_cooldown_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "resume_cooldown_ms",
            });
        }
        if !self.min_swipe_px.is_finite() || self.min_swipe_px < 0.0 {
            return Err(ConfigError::InvalidSwipeDistance(self.min_swipe_px));
        }
        let fraction = self.swipe_step_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ConfigError::InvalidSwipeFraction(fraction));
        }
        Ok(())
    }
}
