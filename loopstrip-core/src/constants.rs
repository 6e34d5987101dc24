//! Carousel constants
//!
//! Compiled defaults for autoplay cadence, swipe classification and the
//! transition hint. `CarouselConfig` falls back to these; tuning should
//! happen here so every mounted carousel updates consistently.

/// Autoplay cadence and the interaction cooldown.
pub mod autoplay {
    /// Time between automatic advances (ms).
    pub const INTERVAL_MS: u64 = 3_500;
    /// Quiet period after the last interaction before autoplay resumes (ms).
    pub const RESUME_COOLDOWN_MS: u64 = 2_000;
}

/// Pointer drag classification.
pub mod swipe {
    /// Absolute floor for the commit threshold (px).
    pub const MIN_DISTANCE_PX: f32 = 40.0;
    /// Commit threshold as a fraction of the card step.
    pub const STEP_FRACTION: f32 = 1.0 / 3.0;
    /// Primary mouse button; other buttons never start a drag.
    pub const PRIMARY_BUTTON: i16 = 0;
}

/// Transition hints handed to the host animator.
pub mod transition {
    /// Default slide transition when the host has none configured (ms).
    pub const DEFAULT_MS: u64 = 350;
}
