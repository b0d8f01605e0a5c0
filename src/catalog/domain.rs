//! Internal domain models for catalog lookups.
//!
//! These types are OUR types - they don't change when the catalog API changes.
//! All external API responses get converted into these types via adapters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Summary of a single track, as returned by any catalog operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Catalog track ID
    pub id: String,
    /// Track title
    pub name: String,
    /// Primary artist name
    pub artist: String,
    /// Primary artist ID (used to explore related artists)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    /// Album title (simplified album-track listings don't carry one)
    #[serde(default)]
    pub album: Option<String>,
    /// Album ID (used to explore the rest of the album)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    /// 30 second preview clip, when the catalog has one
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Catalog popularity (0-100)
    #[serde(default)]
    pub popularity: u32,
    /// Track duration in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Links to the track on external sites, keyed by site name
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl TrackSummary {
    /// Whether a preview clip is known to exist for this track
    pub fn has_preview(&self) -> bool {
        self.preview_url.is_some()
    }
}

impl AsRef<TrackSummary> for TrackSummary {
    fn as_ref(&self) -> &TrackSummary {
        self
    }
}

/// Reference to an artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Reference to an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
}

/// The subset of audio features used to steer recommendations.
///
/// `energy`, `valence` and `danceability` are in 0.0..=1.0, `tempo` is in BPM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub tempo: f64,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
}

impl Default for AudioFeatures {
    /// Values substituted whenever the catalog can't supply real ones
    fn default() -> Self {
        Self {
            tempo: 120.0,
            energy: 0.5,
            valence: 0.5,
            danceability: 0.5,
        }
    }
}

impl AudioFeatures {
    /// Arithmetic mean of each dimension across two tracks
    pub fn mean(a: &AudioFeatures, b: &AudioFeatures) -> AudioFeatures {
        AudioFeatures {
            tempo: (a.tempo + b.tempo) / 2.0,
            energy: (a.energy + b.energy) / 2.0,
            valence: (a.valence + b.valence) / 2.0,
            danceability: (a.danceability + b.danceability) / 2.0,
        }
    }
}

/// Errors that can occur while talking to the catalog
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog credentials are not configured")]
    MissingCredentials,

    #[error("Authentication with the catalog failed: {0}")]
    Unauthorized(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}
