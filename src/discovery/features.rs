//! Audio features of a single track.

use crate::catalog::{AudioFeatures, CatalogApi};

/// Features of a track, or the defaults when the catalog can't supply them
pub async fn track_features(catalog: &dyn CatalogApi, track_id: &str) -> AudioFeatures {
    match catalog.audio_features(track_id).await {
        Ok(Some(features)) => features,
        Ok(None) => {
            tracing::debug!("No audio features for track {}", track_id);
            AudioFeatures::default()
        }
        Err(e) => {
            tracing::warn!("Could not get features for track {}: {}", track_id, e);
            AudioFeatures::default()
        }
    }
}
