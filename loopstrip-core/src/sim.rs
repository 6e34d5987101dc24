//! Simulated host with a virtual clock.
//!
//! Applies engine commands to an in-memory surface and fires timers in
//! deadline order as virtual time advances. Deterministic, so tests and
//! offline tooling can replay input sequences without a renderer or runtime.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::engine::CarouselEngine;
use crate::messages::{Command, Direction, Event, TimerId, TimerKind};

/// What a rendering surface would currently show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceState {
    /// Last offset written.
    pub offset: f32,
    /// Whether the last offset write was animated.
    pub animated: bool,
    /// Track transition toggle.
    pub transition_enabled: bool,
    /// Transition installed by the fallback hint.
    pub transition: Option<Duration>,
    /// Current direction tag.
    pub direction: Direction,
    /// Pointer currently captured.
    pub captured_pointer: Option<i32>,
    /// Every offset write as `(virtual time, px, animated)`.
    pub writes: Vec<(Duration, f32, bool)>,
}

#[derive(Debug, Clone, Copy)]
struct SimTimer {
    kind: TimerKind,
    deadline: Duration,
    period: Option<Duration>,
}

/// Engine plus recorded surface, driven by a manual clock.
#[derive(Debug, Clone)]
pub struct SimHost {
    engine: CarouselEngine,
    surface: SurfaceState,
    now: Duration,
    timers: BTreeMap<TimerId, SimTimer>,
    /// Deadline of the synthesized settle for the running transition.
    settle_at: Option<Duration>,
    auto_settle: bool,
    started: Vec<(Duration, TimerKind)>,
    fired: Vec<(Duration, TimerKind)>,
}

impl SimHost {
    /// Wrap a freshly started engine and apply its initial commands.
    ///
    /// Animated writes settle automatically once the transition duration has
    /// passed; see [`SimHost::manual_settle`] to drive settles by hand.
    pub fn new(engine: CarouselEngine, initial: Vec<Command>) -> Self {
        let mut host = Self {
            engine,
            surface: SurfaceState {
                transition_enabled: true,
                ..SurfaceState::default()
            },
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            settle_at: None,
            auto_settle: true,
            started: Vec::new(),
            fired: Vec::new(),
        };
        host.apply(initial);
        host
    }

    /// Stop synthesizing settles; the caller sends
    /// [`Event::TransitionSettled`] itself.
    pub fn manual_settle(mut self) -> Self {
        self.auto_settle = false;
        self.settle_at = None;
        self
    }

    /// Engine under test.
    pub fn engine(&self) -> &CarouselEngine {
        &self.engine
    }

    /// Recorded surface.
    pub fn surface(&self) -> &SurfaceState {
        &self.surface
    }

    /// Virtual time since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Whether a timer of `kind` is pending.
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.values().any(|t| t.kind == kind)
    }

    /// Every timer the engine asked for, in order.
    pub fn started(&self) -> &[(Duration, TimerKind)] {
        &self.started
    }

    /// Every timer firing delivered to the engine, in order.
    pub fn fired(&self) -> &[(Duration, TimerKind)] {
        &self.fired
    }

    /// Autoplay ticks delivered so far.
    pub fn ticks(&self) -> usize {
        self.fired
            .iter()
            .filter(|(_, kind)| *kind == TimerKind::Autoplay)
            .count()
    }

    /// Handle `event` and apply the resulting commands.
    pub fn send(&mut self, event: Event) {
        let commands = self.engine.handle(event);
        self.apply(commands);
    }

    /// Programmatic advance by `by` slots.
    pub fn advance_by(&mut self, by: i64) {
        let commands = self.engine.advance(by);
        self.apply(commands);
    }

    /// Dispose the engine and apply its cleanup.
    pub fn dispose(&mut self) {
        let commands = self.engine.dispose();
        self.apply(commands);
    }

    /// Advance virtual time, delivering every timer and settle that falls
    /// due on the way in deadline order.
    pub fn advance_time(&mut self, delta: Duration) {
        let target = self.now + delta;
        while let Some(due) = self.next_due(target) {
            self.now = due.at();
            match due {
                Due::Settle(_) => {
                    self.settle_at = None;
                    self.send(Event::TransitionSettled);
                }
                Due::Timer(id, _) => self.fire(id),
            }
        }
        self.now = target;
    }

    fn next_due(&self, limit: Duration) -> Option<Due> {
        let timer = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= limit)
            .min_by_key(|(id, t)| (t.deadline, **id))
            .map(|(id, t)| Due::Timer(*id, t.deadline));
        let settle = self
            .settle_at
            .filter(|at| *at <= limit)
            .map(Due::Settle);
        match (timer, settle) {
            // A transition ending at the same instant lands first.
            (Some(t), Some(s)) if s.at() <= t.at() => Some(s),
            (Some(t), _) => Some(t),
            (None, s) => s,
        }
    }

    fn fire(&mut self, id: TimerId) {
        let Some(timer) = self.timers.get_mut(&id) else {
            return;
        };
        let kind = timer.kind;
        match timer.period {
            Some(period) => timer.deadline += period,
            None => {
                self.timers.remove(&id);
            }
        }
        self.fired.push((self.now, kind));
        self.send(Event::timer_fired(kind, id));
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::SetOffset { px, animate } => {
                    let moved = px != self.surface.offset;
                    let animated = animate && self.surface.transition_enabled;
                    self.surface.offset = px;
                    self.surface.animated = animated;
                    self.surface.writes.push((self.now, px, animated));
                    if !animated {
                        self.settle_at = None;
                    } else if moved && self.auto_settle {
                        let duration =
                            self.surface.transition.unwrap_or_default();
                        self.settle_at = Some(self.now + duration);
                    }
                }
                Command::SetTransition(enabled) => {
                    self.surface.transition_enabled = enabled;
                    if !enabled {
                        self.settle_at = None;
                    }
                }
                Command::EnsureTransition(duration) => {
                    self.surface.transition.get_or_insert(duration);
                }
                Command::SetDirection(direction) => {
                    self.surface.direction = direction;
                }
                Command::StartTimer {
                    id,
                    kind,
                    delay,
                    repeat,
                } => {
                    self.started.push((self.now, kind));
                    self.timers.insert(
                        id,
                        SimTimer {
                            kind,
                            deadline: self.now + delay,
                            period: repeat.then_some(delay),
                        },
                    );
                }
                Command::CancelTimer(id) => {
                    self.timers.remove(&id);
                }
                Command::CapturePointer(id) => {
                    self.surface.captured_pointer = Some(id);
                }
                Command::ReleasePointer(id) => {
                    if self.surface.captured_pointer == Some(id) {
                        self.surface.captured_pointer = None;
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Due {
    Settle(Duration),
    Timer(TimerId, Duration),
}

impl Due {
    fn at(&self) -> Duration {
        match self {
            Self::Settle(at) | Self::Timer(_, at) => *at,
        }
    }
}
