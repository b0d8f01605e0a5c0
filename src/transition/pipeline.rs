//! Strategy pipeline: seed resolution, the candidate pool and the driver loop.
//!
//! A suggestion request resolves its two seeds, then hands an ordered list of
//! [`Strategy`] objects to [`run_pipeline`]. Each strategy proposes tracks into
//! the request's [`CandidatePool`], which owns deduplication and the cap.

use std::collections::HashSet;

use async_trait::async_trait;

use super::types::{Candidate, TransitionError};
use crate::catalog::{AudioFeatures, CatalogApi, CatalogError, TrackSummary};

/// The two resolved seed tracks of a request
#[derive(Debug, Clone)]
pub struct Seeds {
    pub tracks: [TrackSummary; 2],
    /// Defaults wherever the catalog had no analysis (always defaults for the basic engine)
    pub features: [AudioFeatures; 2],
}

impl Seeds {
    pub fn ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

/// Check the seed count before any catalog call is made
pub fn validate_seed_ids(seed_ids: &[String]) -> Result<[&str; 2], TransitionError> {
    match seed_ids {
        [first, second] => Ok([first.as_str(), second.as_str()]),
        _ => Err(TransitionError::InvalidSeedCount(seed_ids.len())),
    }
}

/// Look up both seed tracks, then (optionally) their audio features.
///
/// A missing or failed track lookup is fatal. Feature lookups never are.
pub async fn resolve_seeds(
    catalog: &dyn CatalogApi,
    seed_ids: [&str; 2],
    with_features: bool,
) -> Result<Seeds, TransitionError> {
    let first = lookup_seed(catalog, seed_ids[0]).await?;
    let second = lookup_seed(catalog, seed_ids[1]).await?;

    let mut features = [AudioFeatures::default(); 2];
    if with_features {
        for (slot, id) in features.iter_mut().zip(seed_ids) {
            *slot = match catalog.audio_features(id).await {
                Ok(Some(found)) => found,
                Ok(None) => AudioFeatures::default(),
                Err(e) => {
                    tracing::warn!("Could not get features for track {}: {}", id, e);
                    AudioFeatures::default()
                }
            };
        }
    }

    Ok(Seeds {
        tracks: [first, second],
        features,
    })
}

async fn lookup_seed(catalog: &dyn CatalogApi, id: &str) -> Result<TrackSummary, TransitionError> {
    match catalog.lookup_track(id).await {
        Ok(Some(track)) => Ok(track),
        Ok(None) => {
            tracing::warn!("Seed track {} not found", id);
            Err(TransitionError::SeedLookup {
                track_id: id.to_string(),
                reason: "not found".to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to fetch seed track {}: {}", id, e);
            Err(TransitionError::SeedLookup {
                track_id: id.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

// ============================================================================
// Candidate Pool
// ============================================================================

/// Request-scoped candidate collection.
///
/// The seen-set starts with the seed IDs and grows with every accepted
/// candidate, so later strategies see what earlier ones added.
#[derive(Debug)]
pub struct CandidatePool {
    seen: HashSet<String>,
    candidates: Vec<Candidate>,
    cap: usize,
}

impl CandidatePool {
    pub fn new(seeds: &Seeds, cap: usize) -> Self {
        Self {
            seen: seeds.tracks.iter().map(|t| t.id.clone()).collect(),
            candidates: Vec::new(),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.cap
    }

    /// Would a track with this ID be accepted right now?
    ///
    /// Lets strategies skip follow-up lookups for tracks that can't be added.
    pub fn admits(&self, id: &str) -> bool {
        !self.is_full() && !self.seen.contains(id)
    }

    /// Add a track unless it is a seed, a duplicate, or the pool is full
    pub fn offer(&mut self, track: TrackSummary, strategy: Option<&'static str>) -> bool {
        if !self.admits(&track.id) {
            return false;
        }
        self.seen.insert(track.id.clone());
        self.candidates.push(Candidate::new(track, strategy));
        true
    }

    /// Offer every track in order, returning how many were accepted
    pub fn offer_all(
        &mut self,
        tracks: impl IntoIterator<Item = TrackSummary>,
        strategy: Option<&'static str>,
    ) -> usize {
        let mut added = 0;
        for track in tracks {
            if self.offer(track, strategy) {
                added += 1;
            }
        }
        added
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// What one strategy invocation added to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    /// Name reported in `strategies_used` (a fallback may report its own)
    pub name: &'static str,
    pub added: usize,
}

/// One discovery method.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// The driver only runs this strategy while the pool holds fewer candidates
    fn runs_below(&self) -> usize;

    async fn propose(
        &self,
        seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError>;
}

/// Run strategies in order, absorbing their failures.
///
/// Returns the names of the strategies that added at least one candidate.
pub async fn run_pipeline(
    strategies: &[Box<dyn Strategy>],
    seeds: &Seeds,
    catalog: &dyn CatalogApi,
    pool: &mut CandidatePool,
) -> Vec<String> {
    let mut used = Vec::new();

    for strategy in strategies {
        if pool.len() >= strategy.runs_below() {
            tracing::debug!(
                "Skipping {}: {} candidates already collected",
                strategy.name(),
                pool.len()
            );
            continue;
        }

        match strategy.propose(seeds, catalog, pool).await {
            Ok(contribution) => {
                tracing::debug!("{} added {} candidates", contribution.name, contribution.added);
                if contribution.added > 0 {
                    used.push(contribution.name.to_string());
                }
            }
            Err(e) => {
                tracing::warn!("{} strategy failed: {}", strategy.name(), e);
            }
        }
    }

    if pool.is_empty() {
        tracing::debug!("No strategy produced a candidate");
    }
    used
}

/// Sub-call bookkeeping for a single strategy invocation.
///
/// Individual failures are skipped. The strategy as a whole only reports
/// failure when every call it made failed.
#[derive(Debug, Default)]
pub(super) struct Attempts {
    succeeded: usize,
    last_error: Option<CatalogError>,
}

impl Attempts {
    pub(super) fn check<T>(&mut self, result: Result<T, CatalogError>, what: &str) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                tracing::debug!("{} failed: {}", what, e);
                self.last_error = Some(e);
                None
            }
        }
    }

    pub(super) fn finish(
        self,
        name: &'static str,
        added: usize,
    ) -> Result<Contribution, CatalogError> {
        match self.last_error {
            Some(e) if self.succeeded == 0 => Err(e),
            _ => Ok(Contribution { name, added }),
        }
    }
}

/// Run keyword searches in order, offering every hit under `label`
pub(super) async fn search_keywords(
    catalog: &dyn CatalogApi,
    pool: &mut CandidatePool,
    keywords: &[&str],
    limit: u32,
    label: Option<&'static str>,
    attempts: &mut Attempts,
) -> usize {
    let mut added = 0;
    for keyword in keywords {
        if pool.is_full() {
            break;
        }
        let result = catalog.search_tracks(keyword, limit).await;
        if let Some(hits) = attempts.check(result, &format!("Search for '{}'", keyword)) {
            added += pool.offer_all(hits, label);
        }
    }
    added
}
