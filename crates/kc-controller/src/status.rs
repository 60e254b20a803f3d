//! Status write suppression.

use kc_model::ResourceStatus;

/// Decides whether a status carrying `error` must be written over `current`.
///
/// A write is skipped when a timestamp was already recorded and the stored
/// error equals the new one, so a failure repeating on every retry writes
/// once.
#[must_use]
pub fn needs_status_write(current: Option<&ResourceStatus>, error: Option<&str>) -> bool {
    match current {
        Some(status) if status.is_recorded() => status.error.as_deref() != error,
        _ => true,
    }
}

/// Returns true if the retry sweep should apply a resource again: its last
/// attempt failed, or it never reached a terminal outcome.
#[must_use]
pub fn needs_retry(current: Option<&ResourceStatus>) -> bool {
    match current {
        Some(status) => status.is_failed() || !status.is_recorded(),
        None => true,
    }
}
