//! Tokio host driver.
//!
//! Owns one engine inside a single task so events are processed strictly one
//! at a time. Timer commands become tokio timer tasks that post their firing
//! back into the driver loop; cancelling a timer aborts its task, and firings
//! that still slip through are discarded by the engine's timer id check.

use std::collections::HashMap;
use std::time::Duration;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, trace};

use crate::engine::CarouselEngine;
use crate::error::DriverError;
use crate::messages::{Command, Direction, Event, TimerId, TimerKind};

/// Rendering surface the driver applies offset commands to.
pub trait Surface: Send + 'static {
    /// Translate the track.
    fn set_offset(&mut self, px: f32, animate: bool);

    /// Toggle the track transition.
    fn set_transition(&mut self, enabled: bool);

    /// Install `duration` as the track transition if none is configured.
    fn ensure_transition(&mut self, _duration: Duration) {}

    /// Update the direction tag.
    fn set_direction(&mut self, direction: Direction);

    /// Capture `pointer_id` for the drag.
    fn capture_pointer(&mut self, _pointer_id: i32) {}

    /// Release a captured pointer.
    fn release_pointer(&mut self, _pointer_id: i32) {}

    /// Whether the surface posts [`Event::TransitionSettled`] on its own.
    /// When false the driver synthesizes a settle once the transition
    /// duration has elapsed after each animated write.
    fn reports_settle(&self) -> bool {
        true
    }
}

/// Point-in-time view of the engine, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Current slot.
    pub index: usize,
    /// Last offset written.
    pub offset: f32,
    /// Direction tag.
    pub direction: Direction,
    /// Drag in progress.
    pub dragging: bool,
    /// Autoplay tick armed.
    pub autoplay_active: bool,
    /// Cooldown running.
    pub resume_pending: bool,
}

impl From<&CarouselEngine> for Snapshot {
    fn from(engine: &CarouselEngine) -> Self {
        Self {
            index: engine.index(),
            offset: engine.offset(),
            direction: engine.direction(),
            dragging: engine.is_dragging(),
            autoplay_active: engine.autoplay_active(),
            resume_pending: engine.resume_pending(),
        }
    }
}

#[derive(Debug)]
enum Request {
    Event(Event),
    Snapshot(oneshot::Sender<Snapshot>),
    Dispose(oneshot::Sender<()>),
}

#[derive(Debug)]
enum Internal {
    Timer(Event),
    Settled(u64),
}

/// Handle to a running carousel driver. Dropping it disposes the engine.
#[derive(Debug)]
pub struct CarouselHandle {
    tx: mpsc::UnboundedSender<Request>,
    task: JoinHandle<()>,
}

impl CarouselHandle {
    /// Queue `event` for the driver loop.
    pub fn send(&self, event: Event) -> Result<(), DriverError> {
        self.tx
            .send(Request::Event(event))
            .map_err(|_| DriverError::Closed)
    }

    /// Engine state after all queued events.
    pub async fn snapshot(&self) -> Result<Snapshot, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot(reply))
            .map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    /// Clear both timers, stop the loop and wait for it to finish.
    pub async fn dispose(self) -> Result<(), DriverError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Dispose(reply))
            .map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::Closed)?;
        self.task.await.map_err(|_| DriverError::Closed)
    }
}

/// Spawn the driver loop for a started engine. `initial` are the commands
/// returned by [`CarouselEngine::start`].
pub fn spawn<S: Surface>(
    engine: CarouselEngine,
    initial: Vec<Command>,
    surface: S,
) -> CarouselHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(engine, initial, surface, rx));
    CarouselHandle { tx, task }
}

struct Driver<S> {
    engine: CarouselEngine,
    surface: S,
    timers: HashMap<TimerId, JoinHandle<()>>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    transition: Duration,
    settle_task: Option<JoinHandle<()>>,
    settle_generation: u64,
}

async fn run<S: Surface>(
    engine: CarouselEngine,
    initial: Vec<Command>,
    surface: S,
    mut rx: mpsc::UnboundedReceiver<Request>,
) {
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel();
    let transition = engine.config().transition();
    let mut driver = Driver {
        engine,
        surface,
        timers: HashMap::new(),
        internal_tx,
        transition,
        settle_task: None,
        settle_generation: 0,
    };
    driver.apply(initial);

    loop {
        tokio::select! {
            request = rx.recv() => match request {
                Some(Request::Event(event)) => driver.dispatch(event),
                Some(Request::Snapshot(reply)) => {
                    let _ = reply.send(Snapshot::from(&driver.engine));
                }
                Some(Request::Dispose(reply)) => {
                    driver.shutdown();
                    let _ = reply.send(());
                    break;
                }
                None => {
                    driver.shutdown();
                    break;
                }
            },
            Some(internal) = internal_rx.recv() => match internal {
                Internal::Timer(event) => {
                    if let Event::ResumeElapsed(id) = &event {
                        driver.timers.remove(id);
                    }
                    driver.dispatch(event);
                }
                Internal::Settled(generation) => {
                    if generation == driver.settle_generation {
                        driver.settle_task = None;
                        driver.dispatch(Event::TransitionSettled);
                    }
                }
            },
        }
    }
    debug!("carousel driver stopped");
}

impl<S: Surface> Driver<S> {
    fn dispatch(&mut self, event: Event) {
        let commands = self.engine.handle(event);
        self.apply(commands);
    }

    fn shutdown(&mut self) {
        let commands = self.engine.dispose();
        self.apply(commands);
        self.cancel_settle();
        for (_, task) in self.timers.drain() {
            task.abort();
        }
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            trace!(?command, "applying");
            match command {
                Command::SetOffset { px, animate } => {
                    self.surface.set_offset(px, animate);
                    if !self.surface.reports_settle() {
                        self.cancel_settle();
                        if animate {
                            self.schedule_settle();
                        }
                    }
                }
                Command::SetTransition(enabled) => {
                    self.surface.set_transition(enabled);
                    if !enabled {
                        self.cancel_settle();
                    }
                }
                Command::EnsureTransition(duration) => {
                    self.transition = duration;
                    self.surface.ensure_transition(duration);
                }
                Command::SetDirection(direction) => {
                    self.surface.set_direction(direction);
                }
                Command::StartTimer {
                    id,
                    kind,
                    delay,
                    repeat,
                } => {
                    let tx = self.internal_tx.clone();
                    let task = spawn_timer(tx, id, kind, delay, repeat);
                    if let Some(previous) = self.timers.insert(id, task) {
                        previous.abort();
                    }
                }
                Command::CancelTimer(id) => {
                    if let Some(task) = self.timers.remove(&id) {
                        task.abort();
                    }
                }
                Command::CapturePointer(id) => self.surface.capture_pointer(id),
                Command::ReleasePointer(id) => self.surface.release_pointer(id),
            }
        }
    }

    fn schedule_settle(&mut self) {
        self.settle_generation += 1;
        let generation = self.settle_generation;
        let tx = self.internal_tx.clone();
        let after = self.transition;
        self.settle_task = Some(tokio::spawn(async move {
            time::sleep(after).await;
            let _ = tx.send(Internal::Settled(generation));
        }));
    }

    fn cancel_settle(&mut self) {
        if let Some(task) = self.settle_task.take() {
            task.abort();
            self.settle_generation += 1;
        }
    }
}

fn spawn_timer(
    tx: mpsc::UnboundedSender<Internal>,
    id: TimerId,
    kind: TimerKind,
    delay: Duration,
    repeat: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if repeat {
            let start = time::Instant::now() + delay;
            let mut ticker = time::interval_at(start, delay);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let fired = Internal::Timer(Event::timer_fired(kind, id));
                if tx.send(fired).is_err() {
                    break;
                }
            }
        } else {
            time::sleep(delay).await;
            let _ = tx.send(Internal::Timer(Event::timer_fired(kind, id)));
        }
    })
}
