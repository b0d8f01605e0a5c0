//! Smart transition engine.
//!
//! Explores outward from the two seeds in a fixed order:
//!
//! 1. **Related Artists** - tracks from albums of artists similar to each seed's artist
//! 2. **Album Exploration** - the rest of each seed's album
//! 3. **Audio Features** - catalog recommendations aimed at the seeds' mean features,
//!    falling back to **Genre Matching** keyword searches when unavailable
//! 4. **Popular Tracks** - trending keyword searches, only while results are thin
//!
//! Up to [`SMART_POOL_CAP`] candidates are collected, ranked and cut to
//! [`MAX_SUGGESTIONS`](super::MAX_SUGGESTIONS).

use async_trait::async_trait;

use super::pipeline::{
    Attempts, CandidatePool, Contribution, Seeds, Strategy, resolve_seeds, run_pipeline,
    search_keywords, validate_seed_ids,
};
use super::ranking::rank_smart;
use super::types::{SuggestionResult, TransitionError};
use crate::catalog::{AudioFeatures, CatalogApi, CatalogError, TrackSummary};

/// Candidates collected before ranking
pub const SMART_POOL_CAP: usize = 15;

/// Popular fallback only runs while fewer candidates than this were found
const POPULAR_FALLBACK_BELOW: usize = 10;

const RELATED_ARTISTS_PER_SEED: usize = 3;
const ALBUMS_PER_RELATED_ARTIST: u32 = 2;
const TRACKS_PER_RELATED_ALBUM: u32 = 3;
const TRACKS_PER_SEED_ALBUM: u32 = 10;
const RECOMMENDATION_LIMIT: u32 = 10;
const GENRE_SEARCHES: usize = 3;
const GENRE_SEARCH_LIMIT: u32 = 4;
const POPULAR_SEARCHES: usize = 2;
const POPULAR_SEARCH_LIMIT: u32 = 5;

const GENRE_KEYWORDS: [&str; 5] = ["electronic", "pop", "indie", "rock", "dance"];
const HIGH_ENERGY_KEYWORDS: [&str; 3] = ["electronic dance", "pop hits", "high energy"];
const UPBEAT_KEYWORDS: [&str; 3] = ["happy songs", "pop hits", "upbeat"];
const FAST_KEYWORDS: [&str; 3] = ["fast songs", "electronic", "dance"];
const POPULAR_KEYWORDS: [&str; 4] = [
    "pop hits",
    "trending music",
    "indie favorites",
    "electronic dance",
];

/// Suggest up to eight tracks bridging two seeds, using every strategy.
pub async fn compute_smart_transition(
    catalog: &dyn CatalogApi,
    seed_ids: &[String],
) -> Result<SuggestionResult, TransitionError> {
    let ids = validate_seed_ids(seed_ids)?;
    let seeds = resolve_seeds(catalog, ids, true).await?;

    tracing::info!(
        "Finding transition between '{}' and '{}'",
        seeds.tracks[0].name,
        seeds.tracks[1].name
    );

    let mut pool = CandidatePool::new(&seeds, SMART_POOL_CAP);
    let strategies_used = run_pipeline(&smart_strategies(), &seeds, catalog, &mut pool).await;

    let mut candidates = pool.into_candidates();
    rank_smart(&mut candidates);
    let result = SuggestionResult::from_ranked(candidates, strategies_used);

    tracing::info!(
        "Smart transition found {} suggestions ({} with previews) using strategies: {:?}",
        result.total_found,
        result.preview_count,
        result.strategies_used
    );
    Ok(result)
}

fn smart_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(RelatedArtists),
        Box::new(SameAlbum),
        Box::new(FeatureMatch),
        Box::new(PopularFallback),
    ]
}

/// Re-fetch a track to learn its popularity (album listings don't carry it).
///
/// `None` means the lookup failed and the track should be skipped.
async fn with_popularity(
    catalog: &dyn CatalogApi,
    mut track: TrackSummary,
    attempts: &mut Attempts,
) -> Option<TrackSummary> {
    let full = attempts.check(catalog.lookup_track(&track.id).await, "Track lookup")?;
    if let Some(full) = full {
        track.popularity = full.popularity;
        if track.album.is_none() {
            track.album = full.album;
            track.album_id = full.album_id;
        }
        if track.preview_url.is_none() {
            track.preview_url = full.preview_url;
        }
    }
    Some(track)
}

/// Offer album tracks one by one, re-fetching popularity only for admissible ones
async fn offer_album_tracks(
    catalog: &dyn CatalogApi,
    pool: &mut CandidatePool,
    tracks: Vec<TrackSummary>,
    label: &'static str,
    attempts: &mut Attempts,
) -> usize {
    let mut added = 0;
    for track in tracks {
        if !pool.admits(&track.id) {
            continue;
        }
        if let Some(track) = with_popularity(catalog, track, attempts).await {
            if pool.offer(track, Some(label)) {
                added += 1;
            }
        }
    }
    added
}

// ============================================================================
// Strategies
// ============================================================================

struct RelatedArtists;

#[async_trait]
impl Strategy for RelatedArtists {
    fn name(&self) -> &'static str {
        "Related Artists"
    }

    fn runs_below(&self) -> usize {
        SMART_POOL_CAP
    }

    async fn propose(
        &self,
        seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError> {
        let mut attempts = Attempts::default();

        let mut related = Vec::new();
        for artist_id in seeds.tracks.iter().filter_map(|t| t.artist_id.as_deref()) {
            let found = catalog.related_artists(artist_id).await;
            if let Some(artists) = attempts.check(found, "Related artist lookup") {
                related.extend(artists.into_iter().take(RELATED_ARTISTS_PER_SEED));
            }
        }

        let mut added = 0;
        'artists: for artist in related {
            let albums = catalog
                .artist_albums(&artist.id, ALBUMS_PER_RELATED_ARTIST)
                .await;
            let Some(albums) = attempts.check(albums, "Related artist albums") else {
                continue;
            };
            for album in albums {
                if pool.is_full() {
                    break 'artists;
                }
                let tracks = catalog.album_tracks(&album.id, TRACKS_PER_RELATED_ALBUM).await;
                if let Some(tracks) = attempts.check(tracks, "Related album tracks") {
                    added += offer_album_tracks(catalog, pool, tracks, "Related Artist", &mut attempts)
                        .await;
                }
            }
        }

        attempts.finish(self.name(), added)
    }
}

struct SameAlbum;

#[async_trait]
impl Strategy for SameAlbum {
    fn name(&self) -> &'static str {
        "Album Exploration"
    }

    fn runs_below(&self) -> usize {
        SMART_POOL_CAP
    }

    async fn propose(
        &self,
        seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError> {
        let mut attempts = Attempts::default();
        let mut added = 0;

        for album_id in seeds.tracks.iter().filter_map(|t| t.album_id.as_deref()) {
            if pool.is_full() {
                break;
            }
            let tracks = catalog.album_tracks(album_id, TRACKS_PER_SEED_ALBUM).await;
            if let Some(tracks) = attempts.check(tracks, "Seed album tracks") {
                added += offer_album_tracks(catalog, pool, tracks, "Same Album", &mut attempts).await;
            }
        }

        attempts.finish(self.name(), added)
    }
}

/// Recommendations aimed at the seeds' mean features, or genre searches if
/// the recommendation call fails.
struct FeatureMatch;

#[async_trait]
impl Strategy for FeatureMatch {
    fn name(&self) -> &'static str {
        "Audio Features"
    }

    fn runs_below(&self) -> usize {
        SMART_POOL_CAP
    }

    async fn propose(
        &self,
        seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError> {
        let targets = AudioFeatures::mean(&seeds.features[0], &seeds.features[1]);

        match catalog
            .recommend(&seeds.ids(), &targets, RECOMMENDATION_LIMIT)
            .await
        {
            Ok(tracks) => {
                let added = pool.offer_all(tracks, Some("Audio Features Match"));
                Ok(Contribution {
                    name: self.name(),
                    added,
                })
            }
            Err(e) => {
                tracing::info!("Recommendations unavailable ({}), using genre-based search", e);
                let keywords = genre_keywords(&targets);
                let mut attempts = Attempts::default();
                let added = search_keywords(
                    catalog,
                    pool,
                    &keywords[..GENRE_SEARCHES],
                    GENRE_SEARCH_LIMIT,
                    Some("Genre Match"),
                    &mut attempts,
                )
                .await;
                attempts.finish("Genre Matching", added)
            }
        }
    }
}

/// Genre search terms, led by terms matching the target mood.
///
/// Only the first matching rule applies: energy, then valence, then tempo.
pub fn genre_keywords(targets: &AudioFeatures) -> Vec<&'static str> {
    let lead: &[&'static str] = if targets.energy > 0.7 {
        &HIGH_ENERGY_KEYWORDS
    } else if targets.valence > 0.6 {
        &UPBEAT_KEYWORDS
    } else if targets.tempo > 140.0 {
        &FAST_KEYWORDS
    } else {
        &[]
    };
    lead.iter().chain(GENRE_KEYWORDS.iter()).copied().collect()
}

struct PopularFallback;

#[async_trait]
impl Strategy for PopularFallback {
    fn name(&self) -> &'static str {
        "Popular Tracks"
    }

    fn runs_below(&self) -> usize {
        POPULAR_FALLBACK_BELOW
    }

    async fn propose(
        &self,
        _seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError> {
        let mut attempts = Attempts::default();
        let added = search_keywords(
            catalog,
            pool,
            &POPULAR_KEYWORDS[..POPULAR_SEARCHES],
            POPULAR_SEARCH_LIMIT,
            Some("Popular Music"),
            &mut attempts,
        )
        .await;
        attempts.finish(self.name(), added)
    }
}
