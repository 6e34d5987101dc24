//! Construction contract: binding an engine to a host container.

use tracing::debug;

use crate::config::CarouselConfig;
use crate::engine::{CarouselEngine, Environment};
use crate::layout::Layout;
use crate::messages::{Command, Event};
use crate::strip::Strip;

/// What the host found inside the carousel container.
///
/// `viewport` is the measurement of the scrollable viewport (absent when the
/// element is missing); `track` holds the original slide handles in order.
#[derive(Debug, Clone)]
pub struct Anchors<T> {
    /// Viewport measurement.
    pub viewport: Option<Layout>,
    /// Original slides, in order.
    pub track: Option<Vec<T>>,
    /// A previous control exists.
    pub prev_control: bool,
    /// A next control exists.
    pub next_control: bool,
}

impl<T> Anchors<T> {
    /// Container with viewport, track and both controls.
    pub fn new(viewport: Layout, track: Vec<T>) -> Self {
        Self {
            viewport: Some(viewport),
            track: Some(track),
            prev_control: true,
            next_control: true,
        }
    }

    /// Drop both controls; keyboard and drag still work.
    pub fn without_controls(mut self) -> Self {
        self.prev_control = false;
        self.next_control = false;
        self
    }
}

/// An engine bound to its clone-padded strip.
#[derive(Debug, Clone)]
pub struct MountedCarousel<T> {
    strip: Strip<T>,
    engine: CarouselEngine,
    prev_control: bool,
    next_control: bool,
}

/// Bind to `container`. A missing container, viewport or track, or a track
/// without slides, leaves the widget inert and returns `None`.
pub fn mount<T: Clone>(
    container: Option<Anchors<T>>,
    env: Environment,
    config: CarouselConfig,
) -> Option<(MountedCarousel<T>, Vec<Command>)> {
    let Some(anchors) = container else {
        debug!("carousel container missing; not mounting");
        return None;
    };
    let (Some(layout), Some(track)) = (anchors.viewport, anchors.track) else {
        debug!("carousel viewport or track missing; not mounting");
        return None;
    };

    let strip = Strip::from_originals(track)?;
    let (engine, commands) =
        CarouselEngine::start(strip.originals(), layout, env, config)?;
    Some((
        MountedCarousel {
            strip,
            engine,
            prev_control: anchors.prev_control,
            next_control: anchors.next_control,
        },
        commands,
    ))
}

impl<T> MountedCarousel<T> {
    /// Clone-padded strip.
    pub fn strip(&self) -> &Strip<T> {
        &self.strip
    }

    /// Bound engine.
    pub fn engine(&self) -> &CarouselEngine {
        &self.engine
    }

    /// Both prev and next controls are present.
    pub fn has_controls(&self) -> bool {
        self.prev_control && self.next_control
    }

    /// Slide handle in the slot currently resting at the left edge.
    pub fn current_slide(&self) -> Option<&T> {
        self.strip.get(self.engine.index())
    }

    /// Forward `event` to the engine.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        self.engine.handle(event)
    }

    /// Dispose the engine.
    pub fn dispose(&mut self) -> Vec<Command> {
        self.engine.dispose()
    }

    /// Hand the engine over to a host driver.
    pub fn into_parts(self) -> (Strip<T>, CarouselEngine) {
        (self.strip, self.engine)
    }
}
