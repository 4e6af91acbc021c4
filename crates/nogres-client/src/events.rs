//! Out-of-band client events.
//!
//! Real clients push `LISTEN/NOTIFY` notifications, notices and background
//! errors to registered listeners. The mock never produces these on its own;
//! tests call [`EventEmitter::emit`] to simulate them and the registered
//! handlers run synchronously, in registration order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, TryLockError};

use nogres_core::ConfiguredError;

use crate::lock;

/// An asynchronous `NOTIFY` delivered on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Backend process that raised the notification.
    pub process_id: i32,
    pub channel: String,
    pub payload: String,
}

impl Notification {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            process_id: 0,
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// An event pushed to listeners.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notification(Notification),
    /// Server notice message.
    Notice(String),
    /// Background error on an idle client.
    Error(ConfiguredError),
    /// The client was closed.
    End,
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::Notification(_) => EventKind::Notification,
            ClientEvent::Notice(_) => EventKind::Notice,
            ClientEvent::Error(_) => EventKind::Error,
            ClientEvent::End => EventKind::End,
        }
    }
}

impl From<Notification> for ClientEvent {
    fn from(notification: Notification) -> Self {
        ClientEvent::Notification(notification)
    }
}

/// Event channel a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Notification,
    Notice,
    Error,
    End,
}

/// Identifies a registered listener, for [`EventEmitter::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Arc<Mutex<dyn FnMut(&ClientEvent) + Send>>;

#[derive(Clone)]
struct Listener {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    handler: Handler,
}

/// Listener registry with synchronous dispatch.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler called for every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&ClientEvent) + Send + 'static,
    {
        self.register(kind, false, Arc::new(Mutex::new(handler)))
    }

    /// Register a handler called for the next event of `kind` only.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&ClientEvent) + Send + 'static,
    {
        self.register(kind, true, Arc::new(Mutex::new(handler)))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        lock(&self.listeners)
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Deliver `event` to every listener of its kind.
    ///
    /// Returns true if at least one listener ran. The listeners are
    /// snapshotted first and run without the registry lock held, so handlers
    /// may call `on`, `once` or `off` (including on themselves). Listeners
    /// added during dispatch are not called for the current event. `once`
    /// listeners are unregistered before they run.
    pub fn emit(&self, event: &ClientEvent) -> bool {
        let kind = event.kind();
        let dispatch: Vec<Listener> = {
            let mut listeners = lock(&self.listeners);
            let snapshot: Vec<Listener> =
                listeners.iter().filter(|l| l.kind == kind).cloned().collect();
            listeners.retain(|l| !(l.kind == kind && l.once));
            snapshot
        };
        if dispatch.is_empty() {
            return false;
        }

        tracing::trace!(?kind, listeners = dispatch.len(), "Emitting client event");
        for listener in dispatch {
            let mut handler = match listener.handler.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                // The handler is already running further up this call stack.
                Err(TryLockError::WouldBlock) => {
                    tracing::trace!(id = listener.id.0, "Skipping re-entrant listener");
                    continue;
                }
            };
            (&mut *handler)(event);
        }
        true
    }

    fn register(&self, kind: EventKind, once: bool, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push(Listener {
            id,
            kind,
            once,
            handler,
        });
        id
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &lock(&self.listeners).len())
            .finish_non_exhaustive()
    }
}
