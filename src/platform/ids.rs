//! Time-ordered identifiers for deployments and dependencies
//!
//! Identifiers are UUID version 7: a 48-bit Unix millisecond timestamp in the
//! high bits, then the version nibble `7`, 74 random bits, and the `10`
//! variant. They sort by creation time and need no coordination between
//! callers.

use uuid::{NoContext, Timestamp, Uuid};

/// Generate a new UUID v7 in canonical dashed form
pub fn new_id() -> String {
    Uuid::new_v7(Timestamp::now(NoContext))
        .hyphenated()
        .to_string()
}

/// Millisecond timestamp embedded in a UUID v7 string
///
/// Returns `None` for anything that is not a version 7 UUID.
pub fn timestamp_millis(id: &str) -> Option<u64> {
    let uuid = Uuid::parse_str(id).ok()?;
    if uuid.get_version_num() != 7 {
        return None;
    }
    Some((uuid.as_u128() >> 80) as u64)
}
