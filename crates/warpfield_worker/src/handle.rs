//! # Host Handle
//!
//! Spawns the worker thread and gives the host its end of the channels.
//! Dropping the handle (or calling [`HostHandle::shutdown`]) disconnects the
//! inbox, which is the worker's only stop signal.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;
use warpfield_core::RasterSurface;
use warpfield_shared::{Config, ConfigPatch, HostMessage, ResizeRequest, WorkerEvent};

use crate::actor::{Worker, WorkerStats};
use crate::channel::{
    inbox, EventBus, EventReceiver, Inbound, DEFAULT_EVENT_CAPACITY, DEFAULT_INBOX_CAPACITY,
};
use crate::error::{WorkerError, WorkerResult};
use crate::scheduler::{Cadence, FixedInterval};

/// Spawn-time settings.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    /// Host → worker queue depth
    pub inbox_capacity: usize,
    /// Worker → host queue depth; excess events are dropped
    pub event_capacity: usize,
    /// Fixed RNG seed for every session, for reproducible runs
    pub seed: Option<u64>,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            seed: None,
        }
    }
}

/// Spawns a worker on the default 16 ms self-chaining cadence.
///
/// # Errors
///
/// Returns [`WorkerError::Spawn`] if the thread cannot be created.
pub fn spawn<S>(options: WorkerOptions) -> WorkerResult<HostHandle<S>>
where
    S: RasterSurface + Send + 'static,
{
    spawn_with_cadence(FixedInterval::default(), options)
}

/// Spawns a worker driven by `cadence`.
///
/// # Errors
///
/// Returns [`WorkerError::Spawn`] if the thread cannot be created.
pub fn spawn_with_cadence<S, C>(cadence: C, options: WorkerOptions) -> WorkerResult<HostHandle<S>>
where
    S: RasterSurface + Send + 'static,
    C: Cadence + Send + 'static,
{
    let (inbox_tx, inbox_rx) = inbox(options.inbox_capacity.max(1));
    let (event_tx, event_rx) = EventBus::create_pair(options.event_capacity.max(1));

    let worker = Worker::new(inbox_rx, event_tx, cadence).with_seed(options.seed);
    let thread = std::thread::Builder::new()
        .name("warpfield-worker".into())
        .spawn(move || worker.run())?;

    Ok(HostHandle {
        inbox: inbox_tx,
        events: event_rx,
        thread,
    })
}

/// The host's side of a running worker.
pub struct HostHandle<S> {
    inbox: Sender<Inbound<S>>,
    events: EventReceiver,
    thread: JoinHandle<WorkerStats>,
}

impl<S> HostHandle<S> {
    fn post(&self, inbound: Inbound<S>) -> WorkerResult<()> {
        self.inbox.send(inbound).map_err(|_| WorkerError::Disconnected)
    }

    /// Moves `surface` into the worker and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn init(&self, surface: S, config: Config) -> WorkerResult<()> {
        self.post(Inbound::Init {
            surface: Some(surface),
            config,
        })
    }

    /// Sends a protocol message.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn send(&self, message: HostMessage) -> WorkerResult<()> {
        self.post(Inbound::Message(message))
    }

    /// Decodes a JSON wire message and sends it.
    ///
    /// A wire `init` has no surface and will not start a session.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Protocol`] for malformed input and
    /// [`WorkerError::Disconnected`] if the worker has exited.
    pub fn send_json(&self, text: &str) -> WorkerResult<()> {
        let message = HostMessage::from_json(text)?;
        self.send(message)
    }

    /// Reports new surface dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn resize(&self, request: ResizeRequest) -> WorkerResult<()> {
        self.send(HostMessage::Resize(request))
    }

    /// Stops ticking.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn pause(&self) -> WorkerResult<()> {
        self.send(HostMessage::Pause)
    }

    /// Restarts ticking immediately.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn resume(&self) -> WorkerResult<()> {
        self.send(HostMessage::Resume)
    }

    /// Reports anchor readiness.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn set_ready(&self, is_ready: bool) -> WorkerResult<()> {
        self.send(HostMessage::Ready { is_ready })
    }

    /// Merges a partial config into the live one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker has exited.
    pub fn update_config(&self, patch: ConfigPatch) -> WorkerResult<()> {
        self.send(HostMessage::ConfigUpdate { config: patch })
    }

    /// Event receiver
    #[must_use]
    pub const fn events(&self) -> &EventReceiver {
        &self.events
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_event(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.events.recv_timeout(timeout)
    }

    /// Disconnects the worker and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Panicked`] if the worker thread panicked.
    pub fn shutdown(self) -> WorkerResult<WorkerStats> {
        let Self { inbox, thread, .. } = self;
        drop(inbox);
        thread.join().map_err(|_| WorkerError::Panicked)
    }
}
