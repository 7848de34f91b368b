//! Timestamp utilities.

use solsync_core::types::Timestamp;

/// Current UTC instant.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
