//! Basic transition engine: search only, no audio features.
//!
//! Used when the catalog's recommendation and related-artist endpoints are
//! unavailable. Candidates carry no strategy label and are ordered by preview
//! availability alone.

use async_trait::async_trait;

use super::pipeline::{
    Attempts, CandidatePool, Contribution, Seeds, Strategy, resolve_seeds, run_pipeline,
    search_keywords, validate_seed_ids,
};
use super::ranking::rank_by_preview;
use super::types::{MAX_SUGGESTIONS, SuggestionResult, TransitionError};
use crate::catalog::{CatalogApi, CatalogError};

const ARTIST_SEARCH_LIMIT: u32 = 5;
const GENRE_SEARCHES: usize = 3;
const POPULAR_SEARCHES: usize = 2;
const KEYWORD_SEARCH_LIMIT: u32 = 3;

/// Popular fallback only runs while fewer candidates than this were found
const POPULAR_FALLBACK_BELOW: usize = 6;

const GENRE_KEYWORDS: [&str; 6] = ["pop", "rock", "dance", "electronic", "indie", "hip hop"];
const POPULAR_KEYWORDS: [&str; 3] = ["top hits", "viral songs", "trending now"];

/// Suggest up to eight tracks bridging two seeds using plain searches.
pub async fn compute_basic_transition(
    catalog: &dyn CatalogApi,
    seed_ids: &[String],
) -> Result<SuggestionResult, TransitionError> {
    let ids = validate_seed_ids(seed_ids)?;
    let seeds = resolve_seeds(catalog, ids, false).await?;

    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(ArtistSearch),
        Box::new(KeywordSearch {
            name: "Genre Keywords",
            keywords: &GENRE_KEYWORDS[..GENRE_SEARCHES],
            runs_below: MAX_SUGGESTIONS,
        }),
        Box::new(KeywordSearch {
            name: "Popular Tracks",
            keywords: &POPULAR_KEYWORDS[..POPULAR_SEARCHES],
            runs_below: POPULAR_FALLBACK_BELOW,
        }),
    ];

    let mut pool = CandidatePool::new(&seeds, MAX_SUGGESTIONS);
    let strategies_used = run_pipeline(&strategies, &seeds, catalog, &mut pool).await;

    let mut candidates = pool.into_candidates();
    rank_by_preview(&mut candidates);
    let result = SuggestionResult::from_ranked(candidates, strategies_used);

    tracing::info!(
        "Basic transition found {} suggestions using search-based approach",
        result.total_found
    );
    Ok(result)
}

/// `artist:{name}` search for each seed's primary artist
struct ArtistSearch;

#[async_trait]
impl Strategy for ArtistSearch {
    fn name(&self) -> &'static str {
        "Artist Search"
    }

    fn runs_below(&self) -> usize {
        MAX_SUGGESTIONS
    }

    async fn propose(
        &self,
        seeds: &Seeds,
        catalog: &dyn CatalogApi,
        pool: &mut CandidatePool,
    ) -> Result<Contribution, CatalogError> {
        let queries: Vec<String> = seeds
            .tracks
            .iter()
            .filter(|t| !t.artist.is_empty())
            .map(|t| format!("artist:{}", t.artist))
            .collect();
        let queries: Vec<&str> = queries.iter().map(String::as_str).collect();

        let mut attempts = Attempts::default();
        let added = search_keywords(
            catalog,
            pool,
            &queries,
            ARTIST_SEARCH_LIMIT,
            None,
            &mut attempts,
        )
        .await;
        attempts.finish(self.name(), added)
    }
}

/// Fixed keyword searches
struct KeywordSearch {
    name: &'static str,
    keywords: &'static [&'static str],
    runs_below: usize,
}

#[async_trait]
impl Strategy for KeywordSearch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn runs_below(&self) -> usize {
        self.runs_below
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
            self.keywords,
            KEYWORD_SEARCH_LIMIT,
            None,
            &mut attempts,
        )
        .await;
        attempts.finish(self.name, added)
    }
}
