//! Resource store trait.

use async_trait::async_trait;
use kc_model::{ManagedResource, ResourceKey};

use crate::error::StoreResult;
use crate::watch::Watch;

/// Store of declared resources of one kind.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait ResourceStore<K: ManagedResource>: Send + Sync {
    /// Lists all resources of the kind in scope.
    async fn list(&self) -> StoreResult<Vec<K>>;

    /// Gets one resource.
    async fn get(&self, key: &ResourceKey) -> StoreResult<Option<K>>;

    /// Replaces the status subresource with the status carried by
    /// `resource`. `spec` is not written.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the resource no longer exists.
    async fn replace_status(&self, resource: &K) -> StoreResult<()>;

    /// Subscribes to changes.
    ///
    /// The subscription runs until it is closed or dropped.
    async fn watch(&self) -> StoreResult<Watch<K>>;
}
