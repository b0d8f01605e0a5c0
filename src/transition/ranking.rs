//! Ordering of collected candidates.
//!
//! All sorts here are stable: items with equal keys keep collection order.

use std::cmp::Reverse;

use crate::catalog::TrackSummary;

/// Smart-engine order: preview first, then popularity, then name (all descending).
///
/// Names compare case-insensitively, so ties resolve the same way on every run.
pub fn rank_smart<T: AsRef<TrackSummary>>(items: &mut [T]) {
    items.sort_by(|a, b| smart_key(b.as_ref()).cmp(&smart_key(a.as_ref())));
}

fn smart_key(track: &TrackSummary) -> (bool, u32, String) {
    (track.has_preview(), track.popularity, track.name.to_lowercase())
}

/// Preview first, then popularity (descending)
pub fn rank_by_preview_and_popularity<T: AsRef<TrackSummary>>(items: &mut [T]) {
    items.sort_by_key(|item| {
        let track = item.as_ref();
        Reverse((track.has_preview(), track.popularity))
    });
}

/// Preview first, collection order otherwise
pub fn rank_by_preview<T: AsRef<TrackSummary>>(items: &mut [T]) {
    items.sort_by_key(|item| Reverse(item.as_ref().has_preview()));
}
