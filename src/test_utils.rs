//! Test utilities and fixtures for trackbridge tests.
//!
//! Track builders produce catalog summaries with sensible defaults; use struct
//! update syntax to customize them:
//!
//! ```ignore
//! let popular = TrackSummary {
//!     popularity: 90,
//!     ..track("t1", "Song")
//! };
//! ```

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::catalog::{AlbumRef, ArtistRef, AudioFeatures, TrackSummary};
use crate::transition::pipeline::Seeds;

/// Creates a temporary settings database for testing.
///
/// Keep the returned `TempDir` alive for the duration of the test; the
/// database is deleted when it is dropped.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = crate::settings::db_url(Some(&db_path));

    let pool = crate::settings::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// A track without a preview clip
pub fn track(id: &str, name: &str) -> TrackSummary {
    TrackSummary {
        id: id.to_string(),
        name: name.to_string(),
        artist: "Test Artist".to_string(),
        artist_id: None,
        album: None,
        album_id: None,
        preview_url: None,
        popularity: 0,
        duration_ms: Some(180_000),
        external_urls: Default::default(),
    }
}

/// A track with a preview clip
pub fn track_with_preview(id: &str, name: &str) -> TrackSummary {
    TrackSummary {
        preview_url: Some(format!("https://p.scdn.co/mp3-preview/{}", id)),
        ..track(id, name)
    }
}

/// A track as returned by a full lookup, with artist and album references
pub fn seed_track(id: &str, name: &str, artist_id: &str, album_id: &str) -> TrackSummary {
    TrackSummary {
        artist_id: Some(artist_id.to_string()),
        album: Some(format!("Album of {}", name)),
        album_id: Some(album_id.to_string()),
        ..track(id, name)
    }
}

pub fn artist(id: &str, name: &str) -> ArtistRef {
    ArtistRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn album(id: &str, name: &str) -> AlbumRef {
    AlbumRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Resolved seeds with default audio features
pub fn seeds(a: TrackSummary, b: TrackSummary) -> Seeds {
    Seeds {
        tracks: [a, b],
        features: [AudioFeatures::default(); 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;

        let all = crate::settings::get_all_settings(&pool).await.unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_track_defaults() {
        let t = track("t1", "Song");
        assert_eq!(t.id, "t1");
        assert_eq!(t.artist, "Test Artist");
        assert!(!t.has_preview());
        assert!(track_with_preview("t2", "Song").has_preview());
    }

    #[test]
    fn test_seed_track_references() {
        let t = seed_track("s1", "Seed", "ar1", "al1");
        assert_eq!(t.artist_id.as_deref(), Some("ar1"));
        assert_eq!(t.album_id.as_deref(), Some("al1"));
        assert!(t.album.is_some());
    }
}
