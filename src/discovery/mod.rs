//! Catalog lookups that don't need a seed pair: popular tracks, playlist
//! previews and single-track audio features.

pub mod features;
pub mod popular;
pub mod preview;

pub use features::track_features;
pub use popular::{PopularTracks, discover_popular_tracks};
pub use preview::{PlaylistPreview, build_playlist_preview};

/// Input errors of the discovery operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Track IDs are required")]
    NoTrackIds,
}
