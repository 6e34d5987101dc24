//! Events consumed by the engine and commands it emits back to the host.

use std::fmt;
use std::time::Duration;

use crate::layout::Layout;

/// Identifier minted by the engine for every armed timer. Timer firings carry
/// it back so a firing for a timer the engine already cancelled is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// The two timer slots; each holds at most one live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Repeating autoplay tick.
    Autoplay,
    /// One-shot interaction cooldown.
    Resume,
}

/// Direction tag exposed to the host for styling hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Last move went to a lower slot.
    Left,
    /// Last move went to a higher slot.
    Right,
    /// At rest, or snapped back.
    #[default]
    None,
}

impl Direction {
    /// Attribute value: `"left"`, `"right"` or empty.
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::None => "",
        }
    }

    fn from_delta(by: i64) -> Self {
        match by.signum() {
            1 => Self::Right,
            -1 => Self::Left,
            _ => Self::None,
        }
    }
}

impl From<i64> for Direction {
    fn from(by: i64) -> Self {
        Self::from_delta(by)
    }
}

/// Previous/next control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Show the previous slide.
    Prev,
    /// Show the next slide.
    Next,
}

/// Device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse; only the primary button drags.
    Mouse,
    /// Touch contact.
    Touch,
    /// Stylus.
    Pen,
}

/// Pointer sample in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Host pointer id, stable for one press.
    pub pointer_id: i32,
    /// Device kind.
    pub kind: PointerKind,
    /// Pressed button for mouse pointers; ignored for touch and pen.
    pub button: i16,
    /// Horizontal position (px).
    pub x: f32,
}

impl PointerInput {
    /// Primary-button mouse sample.
    pub fn mouse(pointer_id: i32, x: f32) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Mouse,
            button: 0,
            x,
        }
    }

    /// Touch sample.
    pub fn touch(pointer_id: i32, x: f32) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            button: 0,
            x,
        }
    }

    /// Replace the pressed button.
    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }
}

/// Keys the viewport reacts to. Anything else only counts as interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Previous slide.
    ArrowLeft,
    /// Next slide.
    ArrowRight,
    /// Any other key, by name.
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Closed set of inputs; the engine processes one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Previous/next control activated.
    Navigate(NavCommand),
    /// Key pressed while the viewport holds focus.
    Key(Key),
    /// Pointer entered the viewport.
    PointerEnter,
    /// Focus moved into the viewport.
    FocusIn,
    /// Pointer pressed on the viewport.
    PointerDown(PointerInput),
    /// Pointer moved.
    PointerMove(PointerInput),
    /// Pointer released.
    PointerUp(PointerInput),
    /// The host cancelled the pointer; handled like a release.
    PointerCancel(PointerInput),
    /// Viewport was resized; carries a fresh measurement.
    Resize(Layout),
    /// The host finished animating the track to its last animated offset.
    TransitionSettled,
    /// Page visibility changed; `true` means visible.
    VisibilityChanged(bool),
    /// Reduced-motion preference changed; `true` means reduce.
    ReducedMotionChanged(bool),
    /// Autoplay timer fired.
    Tick(TimerId),
    /// Resume cooldown elapsed.
    ResumeElapsed(TimerId),
}

impl Event {
    /// Event to post back when the host timer `id` of `kind` fires.
    pub fn timer_fired(kind: TimerKind, id: TimerId) -> Self {
        match kind {
            TimerKind::Autoplay => Self::Tick(id),
            TimerKind::Resume => Self::ResumeElapsed(id),
        }
    }
}

/// Presentational side effects for the host to apply, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Translate the track horizontally. `animate: false` must bypass the
    /// host transition for this write only.
    SetOffset {
        /// Track translation (px); negative moves the strip left.
        px: f32,
        /// Let the host transition animate this write.
        animate: bool,
    },
    /// Enable or disable the track transition (disabled while dragging).
    SetTransition(bool),
    /// Install this transition if the host has none of its own.
    EnsureTransition(Duration),
    /// Update the direction tag.
    SetDirection(Direction),
    /// Arm a host timer. A repeating timer fires every `delay`.
    StartTimer {
        /// Id the firing must carry back.
        id: TimerId,
        /// Which slot the timer belongs to.
        kind: TimerKind,
        /// Delay before the first firing.
        delay: Duration,
        /// Keep firing every `delay`.
        repeat: bool,
    },
    /// Cancel a host timer; later firings with this id are ignored.
    CancelTimer(TimerId),
    /// Route this pointer to the viewport until released.
    CapturePointer(i32),
    /// End pointer capture.
    ReleasePointer(i32),
}
