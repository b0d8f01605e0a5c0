//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response of the client-credentials token endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Full or simplified track object.
///
/// Album listings return simplified tracks without `album` and `popularity`.
/// Local files have a null `id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Option<SimplifiedAlbum>,
    pub preview_url: Option<String>,
    pub popularity: Option<u32>,
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// Simplified artist, as embedded in tracks and albums
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: String,
}

/// Simplified album, as embedded in tracks and artist album listings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimplifiedAlbum {
    pub id: String,
    pub name: String,
    pub album_type: Option<String>,
    pub release_date: Option<String>,
}

/// Full artist object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

/// Generic paging wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub total: Option<u32>,
    pub next: Option<String>,
}

/// `GET /search?type=track`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackSearchResponse {
    pub tracks: Option<Paging<Track>>,
}

/// `GET /search?type=artist`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistSearchResponse {
    pub artists: Option<Paging<Artist>>,
}

/// `GET /artists/{id}/related-artists`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelatedArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// `GET /audio-features/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioFeatures {
    pub id: Option<String>,
    pub tempo: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub danceability: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub speechiness: Option<f64>,
    pub loudness: Option<f64>,
}

/// `GET /recommendations`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Error envelope returned by the Web API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
