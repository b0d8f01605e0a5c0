//! Trait definition for the catalog gateway.
//!
//! The suggestion engines, discovery routines and HTTP layer only ever talk to
//! `dyn CatalogApi`. Production code uses [`SpotifyClient`], tests substitute
//! [`mocks::MockCatalog`].
//!
//! # Example
//!
//! ```ignore
//! use trackbridge::catalog::CatalogApi;
//!
//! async fn first_hit(catalog: &dyn CatalogApi, query: &str) -> Option<TrackSummary> {
//!     catalog.search_tracks(query, 1).await.ok()?.into_iter().next()
//! }
//! ```
//!
//! [`SpotifyClient`]: super::spotify::SpotifyClient

use async_trait::async_trait;

use super::domain::{AlbumRef, ArtistRef, AudioFeatures, CatalogError, TrackSummary};
use super::spotify::SpotifyClient;

/// Capability set of the music catalog.
///
/// Every operation is individually fallible. "Not found" is reported as
/// `Ok(None)` where the operation returns a single value.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Look up one track by ID.
    async fn lookup_track(&self, id: &str) -> Result<Option<TrackSummary>, CatalogError>;

    /// Free-text track search.
    async fn search_tracks(&self, query: &str, limit: u32)
    -> Result<Vec<TrackSummary>, CatalogError>;

    /// Free-text artist search.
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>, CatalogError>;

    /// Artists the catalog considers similar to the given one.
    async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistRef>, CatalogError>;

    /// Albums and singles released by an artist.
    async fn artist_albums(&self, artist_id: &str, limit: u32)
    -> Result<Vec<AlbumRef>, CatalogError>;

    /// Tracks on an album, in album order.
    async fn album_tracks(&self, album_id: &str, limit: u32)
    -> Result<Vec<TrackSummary>, CatalogError>;

    /// Audio features of a track, if the catalog has analysed it.
    async fn audio_features(&self, track_id: &str) -> Result<Option<AudioFeatures>, CatalogError>;

    /// Seed-based recommendations steered toward target feature values.
    async fn recommend(
        &self,
        seed_ids: &[String],
        targets: &AudioFeatures,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError>;
}

// Implement trait for the real client

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn lookup_track(&self, id: &str) -> Result<Option<TrackSummary>, CatalogError> {
        self.lookup_track(id).await
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        self.search_tracks(query, limit).await
    }

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>, CatalogError> {
        self.search_artists(query, limit).await
    }

    async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistRef>, CatalogError> {
        self.related_artists(artist_id).await
    }

    async fn artist_albums(
        &self,
        artist_id: &str,
        limit: u32,
    ) -> Result<Vec<AlbumRef>, CatalogError> {
        self.artist_albums(artist_id, limit).await
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        self.album_tracks(album_id, limit).await
    }

    async fn audio_features(&self, track_id: &str) -> Result<Option<AudioFeatures>, CatalogError> {
        self.audio_features(track_id).await
    }

    async fn recommend(
        &self,
        seed_ids: &[String],
        targets: &AudioFeatures,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        self.recommend(seed_ids, targets, limit).await
    }
}
