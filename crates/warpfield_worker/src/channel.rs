//! # Worker Channels
//!
//! The only link between the host and the worker thread.
//!
//! ```text
//! ┌─────────────┐   Inbound<S> (ordered)   ┌─────────────┐
//! │    Host     │─────────────────────────>│   Worker    │
//! │ (HostHandle)│<─────────────────────────│  (Session)  │
//! └─────────────┘   WorkerEvent (lossy)    └─────────────┘
//! ```
//!
//! Host messages are never dropped: the host blocks if the inbox is full.
//! Events go the other way through a bounded channel and are dropped when
//! the host falls behind, so a slow host can never stall the tick.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use warpfield_shared::{Config, HostMessage, WorkerEvent};

/// Default inbox capacity.
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Default event capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// What travels host → worker.
///
/// `Init` is split out of [`HostMessage`] because it is the one message that
/// moves a value (the surface) into the worker.
#[derive(Debug)]
pub enum Inbound<S> {
    /// Start or replace the session. Without a surface nothing starts.
    Init {
        /// Surface to draw to, moved into the worker
        surface: Option<S>,
        /// Full configuration
        config: Config,
    },
    /// Any other protocol message
    Message(HostMessage),
}

impl<S> Inbound<S> {
    /// Message kind as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Message(msg) => msg.kind(),
        }
    }
}

impl<S> From<HostMessage> for Inbound<S> {
    fn from(message: HostMessage) -> Self {
        Self::Message(message)
    }
}

/// Creates the inbox pair.
#[must_use]
pub fn inbox<S>(capacity: usize) -> (Sender<Inbound<S>>, Receiver<Inbound<S>>) {
    bounded(capacity)
}

/// Event channel from worker to host.
pub struct EventBus {
    sender: Sender<WorkerEvent>,
    receiver: Receiver<WorkerEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Worker-side handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Host-side handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a sender/receiver pair and drops the bus.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Why an event was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for the host
    Sent,
    /// Host is behind; event dropped
    Full,
    /// Host is gone; event dropped
    Disconnected,
}

/// Worker-side event handle.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<WorkerEvent>,
}

impl EventSender {
    /// Sends an event without blocking. Drops it if the host is behind.
    #[inline]
    pub fn send(&self, event: WorkerEvent) -> SendOutcome {
        match self.sender.try_send(event) {
            Ok(()) => SendOutcome::Sent,
            Err(TrySendError::Full(_)) => SendOutcome::Full,
            Err(TrySendError::Disconnected(_)) => SendOutcome::Disconnected,
        }
    }
}

/// Host-side event handle.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<WorkerEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<WorkerEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for an event.
    ///
    /// Returns `None` on timeout or once the worker has exited and the
    /// channel is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the first event matching `pred`, discarding
    /// the others.
    pub fn wait_for(
        &self,
        timeout: Duration,
        mut pred: impl FnMut(&WorkerEvent) -> bool,
    ) -> Option<WorkerEvent> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            match self.receiver.recv_deadline(deadline) {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => {}
                Err(_) => return None,
            }
        }
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// True if events are pending.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
