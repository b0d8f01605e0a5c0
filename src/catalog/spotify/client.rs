//! Spotify Web API HTTP client
//!
//! Handles communication with the Spotify Web API using an app-level
//! (client-credentials) bearer token.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! ## API Quirks
//!
//! - Album track listings return *simplified* tracks: no album, no popularity.
//!   Callers that rank by popularity re-fetch the full track.
//! - `related-artists`, `audio-features` and `recommendations` are unavailable
//!   to newer applications and answer 403/404. Callers treat those failures as
//!   recoverable.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::auth::TokenProvider;
use super::{adapter, dto};
use crate::catalog::domain::{AlbumRef, ArtistRef, AudioFeatures, CatalogError, TrackSummary};
use crate::config::{CatalogConfig, Credentials};

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    market: Option<String>,
    auth: TokenProvider,
}

impl SpotifyClient {
    /// Create a new client from configured credentials
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send a User-Agent header identifying the application
    /// - Give up on any single request after the configured timeout
    pub fn new(credentials: &Credentials, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let (client_id, client_secret) =
            credentials.pair().ok_or(CatalogError::MissingCredentials)?;

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            auth: TokenProvider::new(
                client_id,
                client_secret,
                &config.token_url,
                http_client.clone(),
            ),
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
        })
    }

    /// Obtain a token up front so misconfigured credentials surface at startup
    pub async fn authenticate(&self) -> Result<(), CatalogError> {
        self.auth.bearer().await.map(|_| ())
    }

    /// Look up a single track. Unknown IDs yield `Ok(None)`.
    pub async fn lookup_track(&self, id: &str) -> Result<Option<TrackSummary>, CatalogError> {
        let path = format!("/tracks/{}", urlencoding::encode(id));
        match self.get_json::<dto::Track>(&path).await {
            Ok(track) => Ok(adapter::to_track_summary(track)),
            Err(CatalogError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        let path = search_path(query, "track", limit, self.market.as_deref());
        let response = self.get_json::<dto::TrackSearchResponse>(&path).await?;
        Ok(response
            .tracks
            .map(|page| adapter::to_track_summaries(page.items))
            .unwrap_or_default())
    }

    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistRef>, CatalogError> {
        let path = search_path(query, "artist", limit, self.market.as_deref());
        let response = self.get_json::<dto::ArtistSearchResponse>(&path).await?;
        Ok(response
            .artists
            .map(|page| {
                page.items
                    .into_iter()
                    .flatten()
                    .map(adapter::to_artist_ref)
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistRef>, CatalogError> {
        let path = format!("/artists/{}/related-artists", urlencoding::encode(artist_id));
        let response = self.get_json::<dto::RelatedArtistsResponse>(&path).await?;
        Ok(response
            .artists
            .into_iter()
            .map(adapter::to_artist_ref)
            .collect())
    }

    pub async fn artist_albums(
        &self,
        artist_id: &str,
        limit: u32,
    ) -> Result<Vec<AlbumRef>, CatalogError> {
        let path = format!(
            "/artists/{}/albums?include_groups=album,single&limit={}",
            urlencoding::encode(artist_id),
            limit
        );
        let page = self.get_json::<dto::Paging<dto::SimplifiedAlbum>>(&path).await?;
        Ok(page
            .items
            .into_iter()
            .flatten()
            .map(adapter::to_album_ref)
            .collect())
    }

    pub async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        let path = format!(
            "/albums/{}/tracks?limit={}",
            urlencoding::encode(album_id),
            limit
        );
        let page = self.get_json::<dto::Paging<dto::Track>>(&path).await?;
        Ok(adapter::to_track_summaries(page.items))
    }

    /// Audio features of a track. Tracks without analysis yield `Ok(None)`.
    pub async fn audio_features(
        &self,
        track_id: &str,
    ) -> Result<Option<AudioFeatures>, CatalogError> {
        let path = format!("/audio-features/{}", urlencoding::encode(track_id));
        match self.get_json::<Option<dto::AudioFeatures>>(&path).await {
            Ok(features) => Ok(features.map(adapter::to_audio_features)),
            Err(CatalogError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Seed-based recommendations steered toward target feature values
    pub async fn recommend(
        &self,
        seed_ids: &[String],
        targets: &AudioFeatures,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, CatalogError> {
        let path = recommendations_path(seed_ids, targets, limit);
        let response = self.get_json::<dto::RecommendationsResponse>(&path).await?;
        Ok(response
            .tracks
            .into_iter()
            .filter_map(adapter::to_track_summary)
            .collect())
    }

    /// Send an authenticated GET and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let token = self.auth.bearer().await?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.auth.invalidate();
            return Err(CatalogError::Unauthorized(format!("HTTP {} for {}", status, path)));
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiErrorResponse>().await {
                return Err(CatalogError::ApiError(format!(
                    "HTTP {}: {}",
                    error.error.status, error.error.message
                )));
            }
            return Err(CatalogError::ApiError(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Build a `/search` path with an encoded query
fn search_path(query: &str, kind: &str, limit: u32, market: Option<&str>) -> String {
    let mut path = format!(
        "/search?q={}&type={}&limit={}",
        urlencoding::encode(query),
        kind,
        limit
    );
    if let Some(market) = market {
        path.push_str("&market=");
        path.push_str(&urlencoding::encode(market));
    }
    path
}

/// Build a `/recommendations` path targeting the given feature values
fn recommendations_path(seed_ids: &[String], targets: &AudioFeatures, limit: u32) -> String {
    let seeds = seed_ids
        .iter()
        .map(|id| urlencoding::encode(id).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "/recommendations?seed_tracks={}&limit={}&target_tempo={:.3}&target_energy={:.3}&target_valence={:.3}&target_danceability={:.3}",
        seeds, limit, targets.tempo, targets.energy, targets.valence, targets.danceability
    )
}
