//! Errors surfaced by configuration validation and the driver handle.

use thiserror::Error;

/// Guard-rail violations found by [`crate::CarouselConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A duration field is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },

    /// `min_swipe_px` is negative or not finite.
    #[error("min_swipe_px must be finite and non-negative, got {0}")]
    InvalidSwipeDistance(f32),

    /// `swipe_step_fraction` is outside `(0, 1]`.
    #[error("swipe_step_fraction must be in (0, 1], got {0}")]
    InvalidSwipeFraction(f32),
}

/// Failure talking to a carousel driver task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The driver loop has stopped.
    #[error("Carousel driver has shut down")]
    Closed,
}
