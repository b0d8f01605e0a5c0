//! Popular track discovery.
//!
//! Finds well-known tracks to start from, working hard to surface ones with
//! preview clips:
//!
//! 1. **Known Hit Songs** - searches for specific recent hits
//! 2. **Special Versions** - radio edits and official versions (when previews are scarce)
//! 3. **Popular Artists** - album tracks of chart artists (when previews are very scarce)

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{CatalogApi, TrackSummary};
use crate::transition::ranking::rank_by_preview_and_popularity;

/// Tracks returned to the caller
pub const MAX_POPULAR_TRACKS: usize = 12;

/// Hard ceiling on tracks collected across all strategies
const COLLECT_CAP: usize = 20;
/// Stop issuing known-hit queries once this many tracks are collected
const KNOWN_HITS_ENOUGH: usize = 15;
/// Stop opening further albums once this many tracks are collected
const ARTIST_ALBUMS_ENOUGH: usize = 18;

const KNOWN_HIT_QUERIES: usize = 12;
const KNOWN_HIT_LIMIT: u32 = 3;
const SPECIAL_QUERIES: usize = 3;
const SPECIAL_LIMIT: u32 = 12;
const SPECIAL_BELOW_PREVIEWS: usize = 8;
const POPULAR_ARTISTS_QUERIED: usize = 3;
const POPULAR_ARTISTS_BELOW_PREVIEWS: usize = 3;
const ALBUMS_PER_ARTIST: u32 = 3;
const TRACKS_PER_ALBUM: u32 = 8;

const KNOWN_HITS: [&str; 21] = [
    "flowers miley cyrus",
    "as it was harry styles",
    "heat waves glass animals",
    "stay the kid laroi",
    "good 4 u olivia rodrigo",
    "blinding lights the weeknd",
    "watermelon sugar harry styles",
    "positions ariana grande",
    "drivers license olivia rodrigo",
    "levitating dua lipa",
    "save your tears the weeknd",
    "peaches justin bieber",
    "industry baby lil nas x",
    "ghost justin bieber",
    "bad habits ed sheeran",
    "shivers ed sheeran",
    "enemy imagine dragons",
    "cold heart elton john",
    "about damn time lizzo",
    "running up that hill kate bush",
    "sunroof nicky youre",
];

const SPECIAL_VERSIONS: [&str; 5] = [
    r#"track:"radio edit" year:2020-2024"#,
    r#"track:"official video" year:2021-2024"#,
    r#"track:"single version" year:2020-2024"#,
    r#"track:"remix" year:2022-2024"#,
    r#""greatest hits" year:2020-2024"#,
];

const POPULAR_ARTISTS: [&str; 5] = [
    "drake",
    "taylor swift",
    "ariana grande",
    "post malone",
    "billie eilish",
];

/// Outcome of a popular-track discovery run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularTracks {
    pub tracks: Vec<TrackSummary>,
    pub total_found: usize,
    pub preview_count: usize,
    pub strategies_used: Vec<String>,
}

/// Deduplicating, capped collection that counts previews as it goes
#[derive(Debug, Default)]
struct Collected {
    seen: HashSet<String>,
    tracks: Vec<TrackSummary>,
    previews: usize,
}

impl Collected {
    fn is_full(&self) -> bool {
        self.tracks.len() >= COLLECT_CAP
    }

    /// Add a track; returns true only if it was new and carries a preview
    fn push(&mut self, track: TrackSummary) -> bool {
        if self.is_full() || !self.seen.insert(track.id.clone()) {
            return false;
        }
        let has_preview = track.has_preview();
        if has_preview {
            self.previews += 1;
            tracing::debug!("Found preview: {} by {}", track.name, track.artist);
        }
        self.tracks.push(track);
        has_preview
    }
}

/// Collect well-known tracks, preview-carrying ones first.
///
/// Never fails: each strategy absorbs its own catalog errors, and an empty
/// catalog just yields an empty list.
pub async fn discover_popular_tracks(catalog: &dyn CatalogApi) -> PopularTracks {
    let mut collected = Collected::default();
    let mut strategies_used = Vec::new();

    known_hits(catalog, &mut collected).await;
    if !collected.tracks.is_empty() {
        strategies_used.push("Known Hit Songs".to_string());
    }

    if collected.previews < SPECIAL_BELOW_PREVIEWS && special_versions(catalog, &mut collected).await
    {
        strategies_used.push("Special Versions".to_string());
    }

    if collected.previews < POPULAR_ARTISTS_BELOW_PREVIEWS
        && popular_artists(catalog, &mut collected).await
    {
        strategies_used.push("Popular Artists".to_string());
    }

    if strategies_used.is_empty() {
        strategies_used.push("Basic Search".to_string());
    }

    let mut tracks = collected.tracks;
    rank_by_preview_and_popularity(&mut tracks);
    tracks.truncate(MAX_POPULAR_TRACKS);
    let preview_count = tracks.iter().filter(|t| t.has_preview()).count();

    tracing::info!(
        "Popular discovery: {} tracks, {} with previews",
        tracks.len(),
        preview_count
    );

    PopularTracks {
        total_found: tracks.len(),
        preview_count,
        tracks,
        strategies_used,
    }
}

async fn known_hits(catalog: &dyn CatalogApi, collected: &mut Collected) {
    for query in &KNOWN_HITS[..KNOWN_HIT_QUERIES] {
        match catalog.search_tracks(query, KNOWN_HIT_LIMIT).await {
            Ok(hits) => {
                for track in hits {
                    collected.push(track);
                }
            }
            Err(e) => tracing::warn!("Search for '{}' failed: {}", query, e),
        }
        if collected.tracks.len() >= KNOWN_HITS_ENOUGH {
            break;
        }
    }
}

/// Returns true if any new preview was found
async fn special_versions(catalog: &dyn CatalogApi, collected: &mut Collected) -> bool {
    let mut found_preview = false;
    for query in &SPECIAL_VERSIONS[..SPECIAL_QUERIES] {
        match catalog.search_tracks(query, SPECIAL_LIMIT).await {
            Ok(hits) => {
                for track in hits {
                    found_preview |= collected.push(track);
                }
            }
            Err(e) => tracing::warn!("Special search failed: {}", e),
        }
    }
    found_preview
}

/// Returns true if any new preview was found
async fn popular_artists(catalog: &dyn CatalogApi, collected: &mut Collected) -> bool {
    let mut found_preview = false;
    for name in &POPULAR_ARTISTS[..POPULAR_ARTISTS_QUERIED] {
        let artist = match catalog.search_artists(name, 1).await {
            Ok(artists) => artists.into_iter().next(),
            Err(e) => {
                tracing::warn!("Artist {} search failed: {}", name, e);
                continue;
            }
        };
        let Some(artist) = artist else {
            continue;
        };

        let albums = match catalog.artist_albums(&artist.id, ALBUMS_PER_ARTIST).await {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!("Albums for {} failed: {}", name, e);
                continue;
            }
        };

        for album in albums {
            let tracks = match catalog.album_tracks(&album.id, TRACKS_PER_ALBUM).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    tracing::warn!("Album tracks failed: {}", e);
                    continue;
                }
            };
            for track in tracks {
                if collected.is_full() {
                    break;
                }
                // Album listings are simplified; fetch the full track
                let full = match catalog.lookup_track(&track.id).await {
                    Ok(Some(full)) => full,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::debug!("Lookup of {} failed: {}", track.id, e);
                        continue;
                    }
                };
                let full = if full.artist.is_empty() {
                    TrackSummary {
                        artist: artist.name.clone(),
                        ..full
                    }
                } else {
                    full
                };
                found_preview |= collected.push(full);
            }
            if collected.tracks.len() >= ARTIST_ALBUMS_ENOUGH {
                break;
            }
        }
    }
    found_preview
}
