//! # Worker Actor
//!
//! Single-threaded loop owning one [`Session`]. It blocks on the inbox until
//! either a message arrives or the next tick is due, so messages are always
//! applied between ticks and no two ticks overlap.
//!
//! ## States
//!
//! - **Idle**: no session yet. Blocks on messages only.
//! - **Running**: session present, deadline armed.
//! - **Paused**: session present, deadline disarmed until `resume`.
//!
//! The loop ends when every inbox sender is dropped.

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use warpfield_core::{RasterSurface, Session, TickReport};
use warpfield_shared::{Config, HostMessage, WorkerEvent};

use crate::channel::{EventSender, Inbound, SendOutcome};
use crate::scheduler::{Cadence, WorkerClock};

/// Running counters kept by the worker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorkerStats {
    /// Sessions started
    pub sessions: u64,
    /// Ticks executed
    pub ticks: u64,
    /// Ticks that drew nothing
    pub held_ticks: u64,
    /// Inbound messages handled
    pub messages: u64,
    /// Events delivered to the host
    pub events_sent: u64,
    /// Events dropped because the host was behind or gone
    pub dropped_events: u64,
    /// Longest tick (microseconds)
    pub max_tick_us: u64,
    /// Rolling average tick (microseconds)
    pub avg_tick_us: u64,
}

impl WorkerStats {
    fn record_tick(&mut self, report: &TickReport, duration_us: u64) {
        self.ticks += 1;
        if report.held {
            self.held_ticks += 1;
        }
        self.max_tick_us = self.max_tick_us.max(duration_us);
        self.avg_tick_us = if self.ticks == 1 {
            duration_us
        } else {
            (self.avg_tick_us * 15 + duration_us) / 16
        };
    }
}

/// The background half of the engine.
pub struct Worker<S: RasterSurface, C: Cadence> {
    inbox: Receiver<Inbound<S>>,
    events: EventSender,
    cadence: C,
    clock: WorkerClock,
    session: Option<Session<S>>,
    paused: bool,
    next_tick: Option<Instant>,
    seed: Option<u64>,
    stats: WorkerStats,
}

impl<S: RasterSurface, C: Cadence> Worker<S, C> {
    /// Creates an idle worker.
    #[must_use]
    pub fn new(inbox: Receiver<Inbound<S>>, events: EventSender, cadence: C) -> Self {
        Self {
            inbox,
            events,
            cadence,
            clock: WorkerClock::start(),
            session: None,
            paused: false,
            next_tick: None,
            seed: None,
            stats: WorkerStats::default(),
        }
    }

    /// Seeds every session this worker starts.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Runs until the host drops its handle, then reports.
    pub fn run(mut self) -> WorkerStats {
        tracing::info!(
            "Worker started (tick interval {:?})",
            self.cadence.interval()
        );

        loop {
            let received = match self.deadline() {
                Some(deadline) => match self.inbox.recv_deadline(deadline) {
                    Ok(inbound) => Some(inbound),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.inbox.recv() {
                    Ok(inbound) => Some(inbound),
                    Err(_) => break,
                },
            };

            match received {
                Some(inbound) => self.handle(inbound),
                None => self.tick(),
            }
        }

        tracing::info!(
            "Worker stopped: {} ticks, {} messages, {} events dropped",
            self.stats.ticks,
            self.stats.messages,
            self.stats.dropped_events
        );
        self.stats
    }

    /// Counters so far
    #[must_use]
    pub const fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// True while tick scheduling is stopped by `pause`
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The live session, if one was started
    #[must_use]
    pub const fn session(&self) -> Option<&Session<S>> {
        self.session.as_ref()
    }

    fn deadline(&self) -> Option<Instant> {
        if self.paused || self.session.is_none() {
            None
        } else {
            self.next_tick
        }
    }

    /// Applies one inbound message.
    pub fn handle(&mut self, inbound: Inbound<S>) {
        self.stats.messages += 1;
        match inbound {
            Inbound::Init { surface, config } => self.init(surface, config),
            Inbound::Message(message) => self.dispatch(message),
        }
    }

    fn dispatch(&mut self, message: HostMessage) {
        match message {
            // A wire init cannot carry a surface.
            HostMessage::Init { config } => self.init(None, config),
            HostMessage::Pause => {
                self.paused = true;
                tracing::debug!("Paused");
            }
            HostMessage::Resume => {
                self.paused = false;
                self.next_tick = Some(Instant::now());
                tracing::debug!("Resumed");
            }
            HostMessage::Unknown => {
                tracing::debug!("Ignoring unknown message kind");
            }
            other => {
                let now = self.clock.now_ms();
                match self.session.as_mut() {
                    Some(session) => session.apply(&other, now),
                    None => tracing::debug!("No session; dropping '{}'", other.kind()),
                }
            }
        }
    }

    fn init(&mut self, surface: Option<S>, config: Config) {
        let Some(surface) = surface else {
            tracing::debug!("Init without a surface; session not started");
            return;
        };

        let now = self.clock.now_ms();
        if self.session.is_some() {
            tracing::info!("Replacing running session");
        }
        self.session = Some(match self.seed {
            Some(seed) => Session::with_seed(surface, config, now, seed),
            None => Session::start(surface, config, now),
        });
        self.stats.sessions += 1;
        self.paused = false;
        self.next_tick = Some(Instant::now());
    }

    /// Runs one tick now and re-arms the deadline.
    pub fn tick(&mut self) {
        let started = Instant::now();
        let Some(session) = self.session.as_mut() else {
            self.next_tick = None;
            return;
        };

        let report = session.tick(self.clock.millis_at(started));
        for event in report.events() {
            self.publish(event);
        }

        let finished = Instant::now();
        let duration_us = finished.duration_since(started).as_micros() as u64;
        self.stats.record_tick(&report, duration_us);
        self.next_tick = Some(self.cadence.next_deadline(started, finished));
    }

    /// Sends an event to the host, dropping it if the host is behind.
    pub fn publish(&mut self, event: WorkerEvent) {
        match self.events.send(event) {
            SendOutcome::Sent => self.stats.events_sent += 1,
            SendOutcome::Full => {
                self.stats.dropped_events += 1;
                tracing::warn!("Event channel full; dropped {:?}", event);
            }
            SendOutcome::Disconnected => {
                self.stats.dropped_events += 1;
                tracing::debug!("Host gone; dropped {:?}", event);
            }
        }
    }
}
