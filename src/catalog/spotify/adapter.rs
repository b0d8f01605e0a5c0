//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if Spotify changes their response format,
//! only this file and dto.rs need to change.

use super::dto;
use crate::catalog::domain::{AlbumRef, ArtistRef, AudioFeatures, TrackSummary};

/// Convert a track object into a summary.
///
/// Returns None for tracks without an ID (local files), which can't be
/// looked up or deduplicated.
pub fn to_track_summary(track: dto::Track) -> Option<TrackSummary> {
    let id = track.id?;
    let primary = track.artists.into_iter().next();
    let (artist, artist_id) = match primary {
        Some(a) => (a.name, a.id),
        None => (String::new(), None),
    };
    let (album, album_id) = match track.album {
        Some(a) => (Some(a.name), Some(a.id)),
        None => (None, None),
    };

    Some(TrackSummary {
        id,
        name: track.name,
        artist,
        artist_id,
        album,
        album_id,
        preview_url: track.preview_url.filter(|url| !url.is_empty()),
        popularity: track.popularity.unwrap_or(0),
        duration_ms: track.duration_ms,
        external_urls: track.external_urls,
    })
}

/// Convert a list of (possibly null) tracks, dropping unusable entries
pub fn to_track_summaries(items: Vec<Option<dto::Track>>) -> Vec<TrackSummary> {
    items
        .into_iter()
        .flatten()
        .filter_map(to_track_summary)
        .collect()
}

pub fn to_artist_ref(artist: dto::Artist) -> ArtistRef {
    ArtistRef {
        id: artist.id,
        name: artist.name,
    }
}

pub fn to_album_ref(album: dto::SimplifiedAlbum) -> AlbumRef {
    AlbumRef {
        id: album.id,
        name: album.name,
    }
}

/// Convert audio features, filling any missing dimension with its default
pub fn to_audio_features(features: dto::AudioFeatures) -> AudioFeatures {
    let defaults = AudioFeatures::default();
    AudioFeatures {
        tempo: features.tempo.unwrap_or(defaults.tempo),
        energy: features.energy.unwrap_or(defaults.energy),
        valence: features.valence.unwrap_or(defaults.valence),
        danceability: features.danceability.unwrap_or(defaults.danceability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_track(id: Option<&str>, name: &str) -> dto::Track {
        dto::Track {
            id: id.map(String::from),
            name: name.to_string(),
            artists: vec![
                dto::SimplifiedArtist {
                    id: Some("artist-1".to_string()),
                    name: "First Artist".to_string(),
                },
                dto::SimplifiedArtist {
                    id: Some("artist-2".to_string()),
                    name: "Featured".to_string(),
                },
            ],
            album: Some(dto::SimplifiedAlbum {
                id: "album-1".to_string(),
                name: "The Album".to_string(),
                album_type: Some("album".to_string()),
                release_date: None,
            }),
            preview_url: Some("https://p.scdn.co/mp3-preview/x".to_string()),
            popularity: Some(42),
            duration_ms: Some(180_000),
            external_urls: HashMap::new(),
        }
    }

    #[test]
    fn test_convert_full_track() {
        let summary = to_track_summary(make_track(Some("t1"), "Song")).unwrap();

        assert_eq!(summary.id, "t1");
        assert_eq!(summary.artist, "First Artist");
        assert_eq!(summary.artist_id.as_deref(), Some("artist-1"));
        assert_eq!(summary.album.as_deref(), Some("The Album"));
        assert_eq!(summary.album_id.as_deref(), Some("album-1"));
        assert_eq!(summary.popularity, 42);
        assert!(summary.has_preview());
    }

    #[test]
    fn test_track_without_id_is_dropped() {
        assert!(to_track_summary(make_track(None, "Local")).is_none());
    }

    #[test]
    fn test_simplified_track_defaults() {
        let mut track = make_track(Some("t2"), "Album Cut");
        track.album = None;
        track.popularity = None;
        track.preview_url = Some(String::new());
        track.artists.clear();

        let summary = to_track_summary(track).unwrap();

        assert_eq!(summary.popularity, 0);
        assert!(summary.album.is_none());
        assert!(!summary.has_preview(), "empty preview URL is no preview");
        assert!(summary.artist.is_empty());
    }

    #[test]
    fn test_summaries_skip_nulls() {
        let items = vec![
            Some(make_track(Some("a"), "A")),
            None,
            Some(make_track(None, "Local")),
            Some(make_track(Some("b"), "B")),
        ];

        let summaries = to_track_summaries(items);

        let ids: Vec<_> = summaries.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_partial_audio_features_use_defaults() {
        let features = dto::AudioFeatures {
            id: Some("t1".to_string()),
            tempo: Some(150.0),
            energy: None,
            valence: Some(0.9),
            danceability: None,
            acousticness: None,
            instrumentalness: None,
            liveness: None,
            speechiness: None,
            loudness: None,
        };

        let converted = to_audio_features(features);

        assert_eq!(converted.tempo, 150.0);
        assert_eq!(converted.energy, 0.5);
        assert_eq!(converted.valence, 0.9);
        assert_eq!(converted.danceability, 0.5);
    }
}
