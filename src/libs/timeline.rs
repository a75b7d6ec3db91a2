//! Cancelable delayed-nudge timelines.
//!
//! A timeline is either disarmed or armed with exactly one pending timer. The
//! timer runs as a tokio task that, on expiry, sends
//! [`MonitorEvent::TimelineFired`] back into the monitor's event queue. It
//! never touches monitor state itself.
//!
//! Every arming bumps a generation counter and the fired event carries the
//! generation it was armed with. [`NudgeTimeline::fire`] only accepts the
//! current generation of a still-armed timeline, so an expiry that was
//! already queued when the timeline got disarmed or re-armed is dropped.

use crate::libs::nudge::NudgeKind;
use crate::libs::protocol::MonitorEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How a timeline was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arming {
    /// Fire at an absolute point in time (tab drift).
    Deadline(Instant),
    /// Fire once the delay has passed since arming (idle return).
    Delay(Duration),
}

#[derive(Debug)]
struct PendingFire {
    arming: Arming,
    armed_at: Instant,
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct NudgeTimeline {
    kind: NudgeKind,
    generation: u64,
    pending: Option<PendingFire>,
}

impl NudgeTimeline {
    pub fn new(kind: NudgeKind) -> Self {
        Self {
            kind,
            generation: 0,
            pending: None,
        }
    }

    pub fn kind(&self) -> NudgeKind {
        self.kind
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn arming(&self) -> Option<Arming> {
        self.pending.as_ref().map(|pending| pending.arming)
    }

    /// Generation of the current arming, or of the last one if disarmed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the pending timer is due, if armed.
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| match pending.arming {
            Arming::Deadline(at) => at,
            Arming::Delay(delay) => pending.armed_at + delay,
        })
    }

    /// Schedules the timeline, replacing any pending timer.
    pub fn arm(&mut self, arming: Arming, events: &UnboundedSender<MonitorEvent>) {
        self.disarm();
        self.generation += 1;

        let kind = self.kind;
        let generation = self.generation;
        let events = events.clone();
        let task = tokio::spawn(async move {
            match arming {
                Arming::Deadline(at) => tokio::time::sleep_until(at).await,
                Arming::Delay(delay) => tokio::time::sleep(delay).await,
            }
            // The monitor may already be gone during shutdown.
            let _ = events.send(MonitorEvent::TimelineFired { kind, generation });
        });

        self.pending = Some(PendingFire {
            arming,
            armed_at: Instant::now(),
            generation,
            task,
        });
    }

    /// Cancels the pending timer. Returns `false` if nothing was armed.
    pub fn disarm(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    /// Consumes an expiry. Returns `true` only if `generation` is the
    /// current arming, in which case the timeline becomes disarmed.
    pub fn fire(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for NudgeTimeline {
    fn drop(&mut self) {
        self.disarm();
    }
}
