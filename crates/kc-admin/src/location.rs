//! Identifier extraction from creation responses.
//!
//! The admin API answers a successful create with `201 Created` and a
//! `Location` header whose path ends in the identifier it assigned.

use uuid::Uuid;

use crate::error::{AdminError, AdminResult};

/// Length of a hyphenated identifier (8-4-4-4-12).
const HYPHENATED_LEN: usize = 36;

/// Returns true if `segment` is a canonical hyphenated identifier.
#[must_use]
pub fn is_canonical_id(segment: &str) -> bool {
    segment.len() == HYPHENATED_LEN && Uuid::try_parse(segment).is_ok()
}

/// Finds the identifier among the path segments of a location.
///
/// Mapper locations contain the owner identifier as well, so the last
/// matching segment wins.
#[must_use]
pub fn extract_id(location: &str) -> Option<&str> {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    path.split('/').rfind(|s| is_canonical_id(s))
}

/// Resolves the identifier of a created object from the raw response parts.
///
/// ## Errors
///
/// Returns `AdminError::Protocol` if the status is an error, the header is
/// missing or no segment is an identifier.
pub fn created_id(status: u16, location: Option<&str>, body: &str) -> AdminResult<String> {
    if status >= 400 {
        return Err(AdminError::protocol(format!(
            "Failed to get id from response because status was {status} and response: {body}"
        )));
    }
    let location = location.ok_or_else(|| {
        AdminError::protocol(format!(
            "Failed to get id from response because status {status} carried no Location header"
        ))
    })?;
    extract_id(location).map(str::to_string).ok_or_else(|| {
        AdminError::protocol(format!(
            "Failed to get id from response because Location '{location}' holds no identifier"
        ))
    })
}
