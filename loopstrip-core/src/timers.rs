//! Autoplay and resume timer handles.
//!
//! Each kind has exactly one slot. Arming a slot cancels whatever it held, so
//! at most one handle per kind is ever live and timers never queue.

use std::time::Duration;

use tracing::trace;

use crate::messages::{Command, TimerId, TimerKind};

#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    kind: TimerKind,
    live: Option<TimerId>,
}

impl TimerSlot {
    const fn new(kind: TimerKind) -> Self {
        Self { kind, live: None }
    }
}

/// Autoplay and resume slots plus the id counter.
#[derive(Debug, Clone)]
pub struct Timers {
    autoplay: TimerSlot,
    resume: TimerSlot,
    next_id: u64,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            autoplay: TimerSlot::new(TimerKind::Autoplay),
            resume: TimerSlot::new(TimerKind::Resume),
            next_id: 1,
        }
    }
}

impl Timers {
    /// Both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut TimerSlot {
        match kind {
            TimerKind::Autoplay => &mut self.autoplay,
            TimerKind::Resume => &mut self.resume,
        }
    }

    fn slot(&self, kind: TimerKind) -> &TimerSlot {
        match kind {
            TimerKind::Autoplay => &self.autoplay,
            TimerKind::Resume => &self.resume,
        }
    }

    /// Replace the handle of `kind` with a freshly armed timer.
    pub fn arm(
        &mut self,
        kind: TimerKind,
        delay: Duration,
        out: &mut Vec<Command>,
    ) -> TimerId {
        self.disarm(kind, out);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let slot = self.slot_mut(kind);
        slot.live = Some(id);
        trace!(%id, kind = ?slot.kind, ?delay, "arming timer");
        out.push(Command::StartTimer {
            id,
            kind,
            delay,
            repeat: kind == TimerKind::Autoplay,
        });
        id
    }

    /// Cancel the live handle of `kind`, if any. Returns whether one existed.
    pub fn disarm(&mut self, kind: TimerKind, out: &mut Vec<Command>) -> bool {
        match self.slot_mut(kind).live.take() {
            Some(id) => {
                trace!(%id, ?kind, "cancelling timer");
                out.push(Command::CancelTimer(id));
                true
            }
            None => false,
        }
    }

    /// Whether `kind` has a live handle.
    pub fn is_live(&self, kind: TimerKind) -> bool {
        self.slot(kind).live.is_some()
    }

    /// Live id of `kind`.
    pub fn live(&self, kind: TimerKind) -> Option<TimerId> {
        self.slot(kind).live
    }

    /// Whether a firing of `id` belongs to the current handle of `kind`.
    pub fn accepts(&self, kind: TimerKind, id: TimerId) -> bool {
        self.slot(kind).live == Some(id)
    }

    /// Retire a one-shot handle after it fired. The host timer is already
    /// gone, so no cancel command is emitted.
    pub fn retire(&mut self, kind: TimerKind, id: TimerId) -> bool {
        let slot = self.slot_mut(kind);
        if slot.live == Some(id) {
            slot.live = None;
            true
        } else {
            false
        }
    }
}
