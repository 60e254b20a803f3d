//! Kubernetes error conversion.

use kc_store::StoreError;

/// Converts a `kube` error to a `StoreError`.
#[allow(clippy::needless_pass_by_value)]
pub fn from_kube_error(kind: &'static str, key: &str, err: kube::Error) -> StoreError {
    match &err {
        kube::Error::Api(response) if response.code == 404 => StoreError::not_found(kind, key),
        kube::Error::Api(response) if response.code == 409 => StoreError::conflict(kind, key),
        _ => StoreError::backend(err.to_string()),
    }
}
