//! In-memory resource store.
//!
//! Behaves like the cluster store for the parts the controllers rely on:
//! status writes leave `spec` alone and emit a `Modified` event, and a
//! spec update keeps the stored status.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kc_model::{ManagedResource, ResourceKey, ResourceStatus};
use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::store::ResourceStore;
use crate::watch::{Watch, WatchEvent};

const EVENT_CAPACITY: usize = 256;
const WATCH_BUFFER: usize = 64;

/// Process-local store of one resource kind.
pub struct InMemoryStore<K: ManagedResource> {
    resources: RwLock<BTreeMap<ResourceKey, K>>,
    events: broadcast::Sender<WatchEvent<K>>,
    status_writes: AtomicUsize,
}

impl<K: ManagedResource> InMemoryStore<K> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            resources: RwLock::new(BTreeMap::new()),
            events,
            status_writes: AtomicUsize::new(0),
        }
    }

    /// Creates or updates a resource, as a user would.
    ///
    /// A resource submitted without status keeps the stored one.
    pub fn apply(&self, mut resource: K) {
        let key = resource.key();
        let event = {
            let mut resources = self.resources.write();
            match resources.get(&key) {
                Some(existing) => {
                    if resource.status().is_none() {
                        if let Some(status) = existing.status() {
                            resource.set_status(status.clone());
                        }
                    }
                    resources.insert(key, resource.clone());
                    WatchEvent::Modified(resource)
                }
                None => {
                    resources.insert(key, resource.clone());
                    WatchEvent::Added(resource)
                }
            }
        };
        self.publish(event);
    }

    /// Removes a resource, as a user would. Returns the removed resource.
    pub fn remove(&self, key: &ResourceKey) -> Option<K> {
        let removed = self.resources.write().remove(key);
        if let Some(resource) = &removed {
            self.publish(WatchEvent::Deleted(resource.clone()));
        }
        removed
    }

    /// Returns the stored status of a resource.
    #[must_use]
    pub fn status_of(&self, key: &ResourceKey) -> Option<ResourceStatus> {
        self.resources
            .read()
            .get(key)
            .and_then(|r| r.status().cloned())
    }

    /// Returns how many status writes were accepted so far.
    #[must_use]
    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }

    /// Returns the number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    fn publish(&self, event: WatchEvent<K>) {
        // No subscriber is fine.
        let _ = self.events.send(event);
    }
}

impl<K: ManagedResource> Default for InMemoryStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: ManagedResource> ResourceStore<K> for InMemoryStore<K> {
    async fn list(&self) -> StoreResult<Vec<K>> {
        Ok(self.resources.read().values().cloned().collect())
    }

    async fn get(&self, key: &ResourceKey) -> StoreResult<Option<K>> {
        Ok(self.resources.read().get(key).cloned())
    }

    async fn replace_status(&self, resource: &K) -> StoreResult<()> {
        let key = resource.key();
        let updated = {
            let mut resources = self.resources.write();
            let stored = resources
                .get_mut(&key)
                .ok_or_else(|| StoreError::not_found(K::KIND, &key))?;
            if let Some(status) = resource.status() {
                stored.set_status(status.clone());
            }
            stored.clone()
        };
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        self.publish(WatchEvent::Modified(updated));
        Ok(())
    }

    async fn watch(&self) -> StoreResult<Watch<K>> {
        let mut events = self.events.subscribe();
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);

        let producer = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(kind = K::KIND, missed, "watch fell behind, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Watch::new(rx, producer.abort_handle()))
    }
}
