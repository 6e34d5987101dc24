//! CarouselEngine: the infinite-loop state machine.
//!
//! The engine never touches a rendering surface. Every input arrives through
//! [`CarouselEngine::handle`] and every effect leaves as a [`Command`] list
//! the host applies in order. The host's transition mechanism does the
//! animating; the engine only decides target offsets, when they animate, and
//! when timers are armed.

use tracing::{debug, trace};

use crate::config::{AdvanceMode, CarouselConfig};
use crate::gesture::{DragSession, Release};
use crate::layout::{Layout, Metrics};
use crate::messages::{
    Command, Direction, Event, Key, NavCommand, PointerInput, TimerId,
    TimerKind,
};
use crate::strip::fold_into_home;
use crate::timers::Timers;

/// Environment signals sampled at construction. Later changes arrive as
/// [`Event::VisibilityChanged`] and [`Event::ReducedMotionChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// Page is visible to the user.
    pub visible: bool,
    /// User asked for reduced motion; autoplay never runs while set.
    pub reduced_motion: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            visible: true,
            reduced_motion: false,
        }
    }
}

/// Infinite-loop carousel state over a strip of `3N` slots.
///
/// The index rests in `N..2N` whenever no transition is running.
#[derive(Debug, Clone)]
pub struct CarouselEngine {
    originals: usize,
    index: usize,
    metrics: Metrics,
    config: CarouselConfig,
    env: Environment,
    timers: Timers,
    drag: Option<DragSession>,
    /// An animated offset was written and its settle has not arrived yet.
    in_flight: bool,
    /// Last offset written to the track.
    offset: f32,
    direction: Direction,
    disposed: bool,
}

impl CarouselEngine {
    /// Initialize over `originals` slides: rest on the first original without
    /// animation and start autoplay when the environment allows it.
    ///
    /// Returns `None` for an empty track; the carousel stays inert.
    pub fn start(
        originals: usize,
        layout: Layout,
        env: Environment,
        config: CarouselConfig,
    ) -> Option<(Self, Vec<Command>)> {
        if originals == 0 {
            debug!("carousel has no slides; staying inert");
            return None;
        }

        let metrics = Metrics::measure(&layout);
        let mut engine = Self {
            originals,
            index: originals,
            metrics,
            config,
            env,
            timers: Timers::new(),
            drag: None,
            in_flight: false,
            offset: 0.0,
            direction: Direction::None,
            disposed: false,
        };

        let mut out =
            vec![Command::EnsureTransition(engine.config.transition())];
        engine.write_offset(false, &mut out);
        out.push(Command::SetDirection(Direction::None));
        engine.start_autoplay(&mut out);

        debug!(
            originals,
            step = engine.metrics.step,
            visible = engine.metrics.visible_count,
            autoplay = engine.autoplay_active(),
            "carousel initialized"
        );
        Some((engine, out))
    }

    /// Number of original slides (`N`).
    pub fn originals(&self) -> usize {
        self.originals
    }

    /// Current slot in the `3N` strip.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Original slide displayed at the current slot.
    pub fn current_original(&self) -> usize {
        self.index % self.originals
    }

    /// Card width plus gap, in pixels.
    pub fn step(&self) -> f32 {
        self.metrics.step
    }

    /// Whole cards that fit the viewport (at least one).
    pub fn visible_count(&self) -> usize {
        self.metrics.visible_count
    }

    /// Last offset written to the track.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Direction tag of the most recent move.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Config the engine was started with.
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// A pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// No drag and no animated transition awaiting its settle.
    pub fn is_settled(&self) -> bool {
        self.drag.is_none() && !self.in_flight
    }

    /// The repeating autoplay tick is armed.
    pub fn autoplay_active(&self) -> bool {
        self.timers.is_live(TimerKind::Autoplay)
    }

    /// An interaction cooldown is running.
    pub fn resume_pending(&self) -> bool {
        self.timers.is_live(TimerKind::Resume)
    }

    /// Id of the live timer of `kind`, if armed.
    pub fn live_timer(&self, kind: TimerKind) -> Option<TimerId> {
        self.timers.live(kind)
    }

    /// [`CarouselEngine::dispose`] has run; every event is ignored.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Dispatch a single event.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        let mut out = Vec::new();
        if self.disposed {
            trace!(?event, "ignoring event after dispose");
            return out;
        }
        trace!(?event, index = self.index, "carousel event");

        match event {
            Event::Navigate(_) | Event::Key(_) if self.drag.is_some() => {
                trace!("navigation ignored while dragging");
            }
            Event::Navigate(cmd) => {
                let by = match cmd {
                    NavCommand::Prev => -1,
                    NavCommand::Next => 1,
                };
                self.advance_into(by, &mut out);
                self.schedule_resume(&mut out);
            }
            Event::Key(key) => {
                match key {
                    Key::ArrowLeft => self.advance_into(-1, &mut out),
                    Key::ArrowRight => self.advance_into(1, &mut out),
                    Key::Other(_) => {}
                }
                self.schedule_resume(&mut out);
            }
            Event::PointerEnter | Event::FocusIn => {
                self.schedule_resume(&mut out);
            }
            Event::PointerDown(input) => self.pointer_down(&input, &mut out),
            Event::PointerMove(input) => self.pointer_move(&input, &mut out),
            Event::PointerUp(input) | Event::PointerCancel(input) => {
                self.pointer_up(&input, &mut out)
            }
            Event::Resize(layout) => self.remeasure_into(&layout, &mut out),
            Event::TransitionSettled => self.settle(&mut out),
            Event::VisibilityChanged(visible) => {
                // The cooldown keeps running either way.
                self.env.visible = visible;
                if visible {
                    self.start_autoplay(&mut out);
                } else {
                    self.stop_autoplay(&mut out);
                }
            }
            Event::ReducedMotionChanged(reduce) => {
                self.env.reduced_motion = reduce;
                if reduce {
                    self.stop_autoplay(&mut out);
                }
            }
            Event::Tick(id) => self.tick(id, &mut out),
            Event::ResumeElapsed(id) => {
                if self.timers.retire(TimerKind::Resume, id) {
                    self.start_autoplay(&mut out);
                } else {
                    trace!(%id, "stale resume timer");
                }
            }
        }
        out
    }

    /// Move `by` slots (positive is next) with an animated offset.
    pub fn advance(&mut self, by: i64) -> Vec<Command> {
        let mut out = Vec::new();
        if !self.disposed {
            self.advance_into(by, &mut out);
        }
        out
    }

    /// Recompute step and visible count, then re-apply the current offset
    /// without animation so the visible slide does not shift.
    pub fn remeasure(&mut self, layout: &Layout) -> Vec<Command> {
        let mut out = Vec::new();
        if !self.disposed {
            self.remeasure_into(layout, &mut out);
        }
        out
    }

    /// Clear both timer handles and end any drag. The engine ignores all
    /// later events.
    pub fn dispose(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        self.timers.disarm(TimerKind::Autoplay, &mut out);
        self.timers.disarm(TimerKind::Resume, &mut out);
        if let Some(session) = self.drag.take() {
            out.push(Command::SetTransition(true));
            out.push(Command::ReleasePointer(session.pointer_id()));
        }
        self.disposed = true;
        debug!(index = self.index, "carousel disposed");
        out
    }

    fn advance_into(&mut self, by: i64, out: &mut Vec<Command>) {
        let n = self.originals as i64;
        let by = by.clamp(-n, n);
        if by == 0 {
            return;
        }

        let target = self.index as i64 + by;
        if !(0..3 * n).contains(&target) {
            // A previous transition has not settled yet. Jump to the
            // identical slot in the home segment before moving on.
            self.index = fold_into_home(self.index as i64, n) as usize;
            self.write_offset(false, out);
        }

        self.index = (self.index as i64 + by) as usize;
        self.direction = Direction::from(by);
        self.write_offset(true, out);
        out.push(Command::SetDirection(self.direction));

        // Nothing moved on screen, so no settle will follow.
        if !self.in_flight {
            self.normalize(out);
        }
    }

    fn remeasure_into(&mut self, layout: &Layout, out: &mut Vec<Command>) {
        self.metrics = Metrics::measure(layout);
        let resting = self.metrics.offset_for(self.index);
        if let Some(session) = self.drag.as_mut() {
            session.rebase(resting);
        }
        let was_in_flight = self.in_flight;
        self.write_offset(false, out);
        if was_in_flight {
            // The jump cancelled the running transition; its settle is gone.
            self.normalize(out);
        }
        trace!(
            step = self.metrics.step,
            visible = self.metrics.visible_count,
            "remeasured"
        );
    }

    fn settle(&mut self, out: &mut Vec<Command>) {
        if self.drag.is_some() {
            return;
        }
        self.in_flight = false;
        self.normalize(out);
    }

    /// Pull the index back from a clone segment with an invisible jump.
    fn normalize(&mut self, out: &mut Vec<Command>) {
        let n = self.originals;
        let folded = if self.index >= 2 * n {
            self.index - n
        } else if self.index < n {
            self.index + n
        } else {
            return;
        };
        trace!(from = self.index, to = folded, "normalizing loop index");
        self.index = folded;
        self.write_offset(false, out);
    }

    fn write_offset(&mut self, animate: bool, out: &mut Vec<Command>) {
        let px = self.metrics.offset_for(self.index);
        self.push_offset(px, animate, out);
    }

    fn push_offset(&mut self, px: f32, animate: bool, out: &mut Vec<Command>) {
        if animate {
            if px != self.offset {
                self.in_flight = true;
            }
        } else {
            self.in_flight = false;
        }
        self.offset = px;
        out.push(Command::SetOffset { px, animate });
    }

    fn pointer_down(&mut self, input: &PointerInput, out: &mut Vec<Command>) {
        if self.drag.is_some() {
            return;
        }
        if !DragSession::can_start(input) {
            // Still an interaction, just not a drag.
            self.schedule_resume(out);
            return;
        }

        if self.in_flight {
            // Disabling the transition cancels it, so settle right here.
            self.write_offset(false, out);
            self.normalize(out);
        }
        let session =
            DragSession::begin(input, self.metrics.offset_for(self.index));

        out.push(Command::SetTransition(false));
        out.push(Command::CapturePointer(session.pointer_id()));
        self.stop_autoplay(out);
        self.timers.disarm(TimerKind::Resume, out);
        self.drag = Some(session);
        trace!(pointer = session.pointer_id(), "drag started");
    }

    fn pointer_move(&mut self, input: &PointerInput, out: &mut Vec<Command>) {
        let Some(session) = self.drag else {
            return;
        };
        if !session.owns(input) {
            return;
        }
        self.push_offset(session.follow(input.x), false, out);
    }

    fn pointer_up(&mut self, input: &PointerInput, out: &mut Vec<Command>) {
        let Some(session) = self.drag else {
            return;
        };
        if !session.owns(input) {
            return;
        }
        self.drag = None;
        out.push(Command::SetTransition(true));

        let threshold = self.config.swipe_threshold(self.metrics.step);
        let release = session.release(input.x, threshold);
        trace!(
            dx = session.displacement(input.x),
            threshold,
            ?release,
            "drag released"
        );
        match release {
            Release::Next => self.advance_into(1, out),
            Release::Prev => self.advance_into(-1, out),
            Release::SnapBack => {
                self.direction = Direction::None;
                self.write_offset(true, out);
                out.push(Command::SetDirection(Direction::None));
            }
        }
        out.push(Command::ReleasePointer(session.pointer_id()));
        self.schedule_resume(out);
    }

    fn tick(&mut self, id: TimerId, out: &mut Vec<Command>) {
        if !self.timers.accepts(TimerKind::Autoplay, id) {
            trace!(%id, "stale autoplay tick");
            return;
        }
        if self.drag.is_some() {
            return;
        }
        let by = match self.config.autoplay_step {
            AdvanceMode::Item => 1,
            AdvanceMode::Page => self.metrics.visible_count as i64,
        };
        self.advance_into(by, out);
    }

    /// Interaction debounce: stop the tick and restart the cooldown.
    fn schedule_resume(&mut self, out: &mut Vec<Command>) {
        self.stop_autoplay(out);
        // A running drag re-arms the cooldown on release.
        if !self.config.autoplay || self.drag.is_some() {
            return;
        }
        let cooldown = self.config.resume_cooldown();
        self.timers.arm(TimerKind::Resume, cooldown, out);
    }

    fn can_autoplay(&self) -> bool {
        self.config.autoplay
            && self.env.visible
            && !self.env.reduced_motion
            && self.drag.is_none()
            && !self.disposed
    }

    fn start_autoplay(&mut self, out: &mut Vec<Command>) {
        if !self.can_autoplay() {
            trace!(
                enabled = self.config.autoplay,
                visible = self.env.visible,
                reduced_motion = self.env.reduced_motion,
                dragging = self.drag.is_some(),
                "autoplay not started"
            );
            return;
        }
        let interval = self.config.autoplay_interval();
        self.timers.arm(TimerKind::Autoplay, interval, out);
    }

    fn stop_autoplay(&mut self, out: &mut Vec<Command>) {
        self.timers.disarm(TimerKind::Autoplay, out);
    }
}
