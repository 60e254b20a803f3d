//! Kubernetes resource store.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::StreamExt;
use kc_model::{ManagedResource, ResourceKey, ResourceStatus};
use kc_store::{ResourceStore, StoreResult, Watch, WatchEvent};
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::runtime::{WatchStreamExt, watcher};
use kube::Client;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::from_kube_error;

const WATCH_BUFFER: usize = 64;

/// Store of one custom resource kind in a cluster.
pub struct KubeStore<K> {
    client: Client,
    namespace: Option<String>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ManagedResource> KubeStore<K> {
    /// Creates a store watching `namespace`, or every namespace if `None`.
    #[must_use]
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        Self {
            client,
            namespace,
            _kind: PhantomData,
        }
    }

    fn scoped(&self) -> Api<K> {
        match &self.namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    fn in_namespace(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Builds the merge patch replacing the status subresource.
///
/// `error` is sent as an explicit `null` so a recovered resource loses its
/// old message.
#[must_use]
pub fn status_patch(status: Option<&ResourceStatus>) -> serde_json::Value {
    serde_json::json!({ "status": status })
}

/// Maps a raw watcher event. Initial listing objects count as additions.
pub fn translate<K>(event: watcher::Event<K>) -> Option<WatchEvent<K>> {
    match event {
        watcher::Event::InitApply(resource) => Some(WatchEvent::Added(resource)),
        watcher::Event::Apply(resource) => Some(WatchEvent::Modified(resource)),
        watcher::Event::Delete(resource) => Some(WatchEvent::Deleted(resource)),
        watcher::Event::Init | watcher::Event::InitDone => None,
    }
}

#[async_trait]
impl<K: ManagedResource> ResourceStore<K> for KubeStore<K> {
    async fn list(&self) -> StoreResult<Vec<K>> {
        let scope = self.namespace.as_deref().unwrap_or("*");
        let list = self
            .scoped()
            .list(&ListParams::default())
            .await
            .map_err(|e| from_kube_error(K::KIND, scope, e))?;
        Ok(list.items)
    }

    async fn get(&self, key: &ResourceKey) -> StoreResult<Option<K>> {
        self.in_namespace(&key.namespace)
            .get_opt(&key.name)
            .await
            .map_err(|e| from_kube_error(K::KIND, &key.to_string(), e))
    }

    async fn replace_status(&self, resource: &K) -> StoreResult<()> {
        let key = resource.key();
        let patch = status_patch(resource.status());
        self.in_namespace(&key.namespace)
            .patch_status(&key.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| from_kube_error(K::KIND, &key.to_string(), e))?;
        debug!(kind = K::KIND, resource = %key, "status replaced");
        Ok(())
    }

    async fn watch(&self) -> StoreResult<Watch<K>> {
        let mut stream = watcher(self.scoped(), watcher::Config::default())
            .default_backoff()
            .boxed();
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);

        let producer = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                let event = match item {
                    Ok(event) => translate(event),
                    Err(e) => {
                        warn!(kind = K::KIND, error = %e, "watch interrupted, resubscribing");
                        None
                    }
                };
                if let Some(event) = event {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            info!(kind = K::KIND, "watch stream ended");
        });

        debug!(kind = K::KIND, namespace = ?self.namespace, "watch opened");
        Ok(Watch::new(rx, producer.abort_handle()))
    }
}
