//! Change subscriptions.
//!
//! A [`Watch`] is a lazy, unbounded sequence of [`WatchEvent`]s for one
//! resource kind. It stays open until it is closed through its
//! [`WatchHandle`] or dropped; a closed watch yields nothing more, even
//! events that were already buffered.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;

/// A change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent<K> {
    /// The resource appeared.
    Added(K),
    /// The resource changed.
    Modified(K),
    /// The resource was removed.
    Deleted(K),
}

impl<K> WatchEvent<K> {
    /// Returns the resource carried by the event.
    pub const fn resource(&self) -> &K {
        match self {
            Self::Added(r) | Self::Modified(r) | Self::Deleted(r) => r,
        }
    }

    /// Consumes the event, returning its resource.
    pub fn into_resource(self) -> K {
        match self {
            Self::Added(r) | Self::Modified(r) | Self::Deleted(r) => r,
        }
    }

    /// Returns true for removals.
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    /// Returns the event type for logging.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Modified(_) => "modified",
            Self::Deleted(_) => "deleted",
        }
    }
}

/// Cancels a [`Watch`] from anywhere.
#[derive(Debug, Clone)]
pub struct WatchHandle {
    closed: Arc<watch::Sender<bool>>,
    task: Option<AbortHandle>,
}

impl WatchHandle {
    fn new(task: Option<AbortHandle>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            closed: Arc::new(closed),
            task,
        }
    }

    /// Closes the subscription and stops its producer task.
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) {
        self.closed.send_replace(true);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Returns true once the subscription has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

/// A subscription to resource changes.
#[derive(Debug)]
pub struct Watch<K> {
    events: mpsc::Receiver<WatchEvent<K>>,
    closed: watch::Receiver<bool>,
    handle: WatchHandle,
}

impl<K> Watch<K> {
    /// Wraps a channel fed by a producer task. Closing the watch aborts
    /// the task.
    pub fn new(events: mpsc::Receiver<WatchEvent<K>>, producer: AbortHandle) -> Self {
        Self::with_handle(events, WatchHandle::new(Some(producer)))
    }

    /// Creates a watch fed directly through the returned sender.
    pub fn channel(capacity: usize) -> (mpsc::Sender<WatchEvent<K>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::with_handle(rx, WatchHandle::new(None)))
    }

    fn with_handle(events: mpsc::Receiver<WatchEvent<K>>, handle: WatchHandle) -> Self {
        Self {
            events,
            closed: handle.closed.subscribe(),
            handle,
        }
    }

    /// Returns a handle that closes this watch.
    #[must_use]
    pub fn handle(&self) -> WatchHandle {
        self.handle.clone()
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the watch is closed or its producer has ended.
    pub async fn next(&mut self) -> Option<WatchEvent<K>> {
        if self.handle.is_closed() {
            return None;
        }

        let event = tokio::select! {
            biased;
            _ = self.closed.wait_for(|closed| *closed) => None,
            event = self.events.recv() => event,
        };

        if self.handle.is_closed() { None } else { event }
    }

    /// Closes the watch.
    pub fn close(&self) {
        self.handle.close();
    }
}

impl<K> Drop for Watch<K> {
    fn drop(&mut self) {
        self.handle.close();
    }
}

/// The set of open subscriptions of a process.
///
/// Every registered watch is closed by [`WatchSet::close_all`] or, at the
/// latest, when the set is dropped.
#[derive(Debug, Default)]
pub struct WatchSet {
    handles: Vec<WatchHandle>,
}

impl WatchSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscription.
    pub fn register(&mut self, handle: WatchHandle) {
        self.handles.push(handle);
    }

    /// Returns the number of registered subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Closes every registered subscription.
    pub fn close_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.close();
        }
    }
}

impl Drop for WatchSet {
    fn drop(&mut self) {
        self.close_all();
    }
}
