//! Common view over the managed resource kinds.

use std::fmt;

use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::{Serialize, de::DeserializeOwned};

use crate::status::ResourceStatus;

/// Identity of a managed resource inside the cluster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    /// Namespace (empty for resources that were never assigned one).
    pub namespace: String,
    /// Object name.
    pub name: String,
}

impl ResourceKey {
    /// Creates a key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A declarative resource reconciled by the controller.
///
/// The controller owns nothing on the object but its status subresource.
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Kind label used in logs.
    const KIND: &'static str;

    /// Returns the current status, if any was ever written.
    fn status(&self) -> Option<&ResourceStatus>;

    /// Replaces the status.
    fn set_status(&mut self, status: ResourceStatus);

    /// Returns the log path of the external object, e.g.
    /// `default/master/client-scopes/profile`.
    fn path(&self) -> String;

    /// Returns the cluster identity of this resource.
    fn key(&self) -> ResourceKey {
        ResourceKey::new(self.namespace().unwrap_or_default(), self.name_any())
    }

    /// Returns the stored error, if the last attempt failed.
    fn error(&self) -> Option<&str> {
        self.status().and_then(|s| s.error.as_deref())
    }
}
