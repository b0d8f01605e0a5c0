//! Values produced by the suggestion engines.

use serde::Serialize;

use crate::catalog::domain::TrackSummary;

/// Maximum number of suggestions ever returned
pub const MAX_SUGGESTIONS: usize = 8;

/// A proposed bridging track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub track: TrackSummary,

    /// Label of the strategy that discovered it (basic engine: none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'static str>,
}

impl Candidate {
    pub fn new(track: TrackSummary, strategy: Option<&'static str>) -> Self {
        Self { track, strategy }
    }

    pub fn id(&self) -> &str {
        &self.track.id
    }
}

impl AsRef<TrackSummary> for Candidate {
    fn as_ref(&self) -> &TrackSummary {
        &self.track
    }
}

/// Ranked outcome of one suggestion request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<Candidate>,

    /// Strategies that contributed at least one candidate before truncation
    pub strategies_used: Vec<String>,

    pub total_found: usize,
    pub preview_count: usize,
}

impl SuggestionResult {
    /// Truncate already-ranked candidates and compute the summary counts
    pub fn from_ranked(mut candidates: Vec<Candidate>, strategies_used: Vec<String>) -> Self {
        candidates.truncate(MAX_SUGGESTIONS);
        let preview_count = candidates.iter().filter(|c| c.track.has_preview()).count();
        Self {
            total_found: candidates.len(),
            preview_count,
            suggestions: candidates,
            strategies_used,
        }
    }
}

/// Request-level failures of the suggestion engines
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransitionError {
    #[error("Please provide exactly 2 track IDs")]
    InvalidSeedCount(usize),

    #[error("Could not fetch track details")]
    SeedLookup { track_id: String, reason: String },
}

impl TransitionError {
    /// Whether the caller sent bad input (as opposed to the catalog failing us)
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidSeedCount(_))
    }
}
