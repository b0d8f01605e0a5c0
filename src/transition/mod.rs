//! Transition suggestion engines.
//!
//! Given two seed tracks, find tracks that bridge between them:
//!
//! - [`compute_smart_transition`] - related artists, album exploration and
//!   feature-targeted recommendations, with keyword fallbacks
//! - [`compute_basic_transition`] - keyword searches only
//!
//! Both engines validate the seed pair before touching the catalog, treat a
//! failed seed lookup as fatal, and absorb every other catalog failure.

pub mod basic;
pub mod pipeline;
pub mod ranking;
pub mod smart;
pub mod types;

pub use basic::compute_basic_transition;
pub use smart::compute_smart_transition;
pub use types::{Candidate, MAX_SUGGESTIONS, SuggestionResult, TransitionError};
