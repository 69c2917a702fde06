pub mod activity;
pub mod attachment;
pub mod flight;
pub mod hotel;
pub mod trip;

use chrono::Utc;

/// Millisecond-clock token. Unique enough for a single-user collection;
/// collisions are possible but not worth a heavier scheme here.
pub fn next_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
