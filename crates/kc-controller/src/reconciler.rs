//! The generic controller driving one resource kind.
//!
//! A [`Reconciler`] knows how to resolve the parent context of a resource
//! and how to create, update or remove its external counterpart. The
//! [`Controller`] wraps it with the lifecycle shared by every kind:
//! outcome logging, status reporting, the retry sweep and watch dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use kc_model::{ManagedResource, ResourceKey, ResourceStatus};
use kc_store::{ResourceStore, StoreError, Watch, WatchEvent};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::error::ReconcileResult;
use crate::outcome::ReconciliationOutcome;
use crate::status::{needs_retry, needs_status_write};

/// Result of removing an external object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The object existed and was deleted.
    Deleted,
    /// There was nothing to delete.
    Absent,
}

/// Per-kind reconciliation strategy.
#[async_trait]
pub trait Reconciler: Send + Sync + 'static {
    /// The managed resource kind.
    type Resource: ManagedResource;

    /// Resolved parent context.
    type Parent: Send + Sync;

    /// Resolves the parent context.
    ///
    /// Returns `ReconcileError::NotReady` when the parent does not exist.
    async fn parent(&self, resource: &Self::Resource) -> ReconcileResult<Self::Parent>;

    /// Drives the external object toward the declared state.
    async fn reconcile(&self, parent: &Self::Parent, resource: &Self::Resource)
    -> ReconcileResult<()>;

    /// Removes the external object.
    async fn remove(&self, parent: &Self::Parent, resource: &Self::Resource)
    -> ReconcileResult<Removal>;
}

/// Lifecycle driver for one resource kind.
///
/// Calls for the same resource are serialized, whether they come from the
/// watch or from the retry sweep.
pub struct Controller<R: Reconciler> {
    reconciler: R,
    store: Arc<dyn ResourceStore<R::Resource>>,
    locks: DashMap<ResourceKey, Arc<Mutex<()>>>,
}

impl<R: Reconciler> Controller<R> {
    /// Creates a controller.
    pub fn new(reconciler: R, store: Arc<dyn ResourceStore<R::Resource>>) -> Self {
        Self {
            reconciler,
            store,
            locks: DashMap::new(),
        }
    }

    /// Returns the reconciliation strategy.
    pub fn reconciler(&self) -> &R {
        &self.reconciler
    }

    /// Returns the store the controller reads from.
    pub fn store(&self) -> &Arc<dyn ResourceStore<R::Resource>> {
        &self.store
    }

    /// Returns the kind label.
    pub fn kind(&self) -> &'static str {
        <R::Resource as ManagedResource>::KIND
    }

    async fn lock(&self, key: &ResourceKey) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.clone()).or_default().clone();
        lock.lock_owned().await
    }

    /// Reconciles a resource and reports the outcome on its status.
    ///
    /// Never fails: every error ends in a log line or a status write.
    pub async fn apply(&self, resource: &R::Resource) -> ReconciliationOutcome {
        let _guard = self.lock(&resource.key()).await;
        let path = resource.path();

        let result = match self.reconciler.parent(resource).await {
            Ok(parent) => self.reconciler.reconcile(&parent, resource).await,
            Err(e) => Err(e),
        };
        let outcome = ReconciliationOutcome::from(result);
        outcome.log(&path);

        if let Some(error) = outcome.status_error() {
            self.write_status(resource, error, &path).await;
        }
        outcome
    }

    /// Removes the external counterpart of a deleted resource.
    ///
    /// A missing parent or a missing external object both mean there is
    /// nothing to clean up.
    pub async fn delete(&self, resource: &R::Resource) -> ReconciliationOutcome {
        let key = resource.key();
        let path = resource.path();
        let outcome = {
            let _guard = self.lock(&key).await;
            let result = match self.reconciler.parent(resource).await {
                Ok(parent) => self.reconciler.remove(&parent, resource).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(Removal::Deleted) => {
                    info!("{path}: deleted");
                    ReconciliationOutcome::Success
                }
                Ok(Removal::Absent) => {
                    info!("{path}: not found, nothing to delete");
                    ReconciliationOutcome::Success
                }
                Err(e) if e.is_not_ready() => {
                    info!("{path}: {e}, nothing to delete");
                    ReconciliationOutcome::Success
                }
                Err(e) => {
                    let outcome = ReconciliationOutcome::from(Err(e));
                    outcome.log(&path);
                    outcome
                }
            }
        };
        // A caller already waiting on this lock keeps it alive.
        self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        outcome
    }

    /// Re-applies every resource whose last attempt failed or never
    /// finished. Returns how many resources were applied.
    pub async fn retry(&self) -> usize {
        let resources = match self.store.list().await {
            Ok(resources) => resources,
            Err(e) => {
                error!(kind = self.kind(), error = %e, "retry sweep could not list resources");
                return 0;
            }
        };

        // Failed resources plus those without a recorded outcome yet, such
        // as a child skipped while its parent was missing. Resources that
        // recorded a success are never picked.
        let mut applied = 0;
        for resource in resources.iter().filter(|r| needs_retry(r.status())) {
            debug!("{}: retrying", resource.path());
            self.apply(resource).await;
            applied += 1;
        }
        applied
    }

    /// Routes a watch event to `apply` or `delete`.
    pub async fn handle(&self, event: WatchEvent<R::Resource>) -> ReconciliationOutcome {
        debug!(kind = self.kind(), event = event.label(), resource = %event.resource().key(), "event");
        match event {
            WatchEvent::Added(resource) | WatchEvent::Modified(resource) => {
                self.apply(&resource).await
            }
            WatchEvent::Deleted(resource) => self.delete(&resource).await,
        }
    }

    /// Consumes a watch, one event at a time, until it is closed.
    pub async fn run(&self, mut watch: Watch<R::Resource>) {
        info!(kind = self.kind(), "watching");
        while let Some(event) = watch.next().await {
            self.handle(event).await;
        }
        info!(kind = self.kind(), "watch closed");
    }

    /// Writes the outcome to the status subresource unless the stored
    /// status already says the same.
    async fn write_status(&self, resource: &R::Resource, error: Option<String>, path: &str) {
        let current = match self.store.get(&resource.key()).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("{path}: resource is gone, status not written");
                return;
            }
            Err(e) => {
                warn!("{path}: cannot read stored status: {e}");
                resource.clone()
            }
        };

        if !needs_status_write(current.status(), error.as_deref()) {
            debug!("{path}: status unchanged");
            return;
        }

        let mut updated = current;
        updated.set_status(ResourceStatus::now(error));
        match self.store.replace_status(&updated).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => debug!("{path}: resource is gone, status not written"),
            Err(e) => error!("{path}: failed to write status: {e}"),
        }
    }
}
