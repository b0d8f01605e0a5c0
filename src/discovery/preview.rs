//! Playlist preview: resolve a list of track IDs for transition playback.

use serde::Serialize;

use super::DiscoveryError;
use crate::catalog::{CatalogApi, TrackSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistPreview {
    pub playlist: Vec<TrackSummary>,
    pub tracks_with_preview: usize,
    pub total_tracks: usize,
    /// No track has a preview clip, so playback has to be simulated
    pub simulation_mode: bool,
}

/// Look up each track in order. Tracks that can't be fetched are left out.
pub async fn build_playlist_preview(
    catalog: &dyn CatalogApi,
    track_ids: &[String],
) -> Result<PlaylistPreview, DiscoveryError> {
    if track_ids.is_empty() {
        return Err(DiscoveryError::NoTrackIds);
    }

    let mut playlist = Vec::with_capacity(track_ids.len());
    for id in track_ids {
        match catalog.lookup_track(id).await {
            Ok(Some(track)) => playlist.push(track),
            Ok(None) => tracing::warn!("Track {} not found, leaving it out", id),
            Err(e) => tracing::warn!("Error fetching track {}: {}", id, e),
        }
    }

    let tracks_with_preview = playlist.iter().filter(|t| t.has_preview()).count();
    Ok(PlaylistPreview {
        total_tracks: playlist.len(),
        simulation_mode: tracks_with_preview == 0,
        tracks_with_preview,
        playlist,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::traits::mocks::MockCatalog;
    use crate::test_utils::{track, track_with_preview};

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_preview_keeps_order_and_skips_failures() {
        let mock = MockCatalog::new()
            .with_track(track_with_preview("a", "A"))
            .with_track(track("b", "B"))
            .with_track(track("c", "C"))
            .failing_for("c");

        let preview = build_playlist_preview(&mock, &ids(&["b", "missing", "c", "a"]))
            .await
            .unwrap();

        let names: Vec<_> = preview.playlist.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(preview.total_tracks, 2);
        assert_eq!(preview.tracks_with_preview, 1);
        assert!(!preview.simulation_mode);
    }

    #[tokio::test]
    async fn test_no_previews_means_simulation() {
        let mock = MockCatalog::new().with_track(track("b", "B"));

        let preview = build_playlist_preview(&mock, &ids(&["b"])).await.unwrap();

        assert!(preview.simulation_mode);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let mock = MockCatalog::new();

        let err = build_playlist_preview(&mock, &[]).await.unwrap_err();

        assert!(matches!(err, DiscoveryError::NoTrackIds));
        assert!(mock.calls().is_empty());
    }
}
