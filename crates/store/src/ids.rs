//! Record identifier generation.

use uuid::Uuid;

/// Generate a globally-unique, time-ordered record id.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
