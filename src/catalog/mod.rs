//! Catalog gateway - everything that talks to the external music catalog.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types the rest of the crate uses
//! - **API DTOs** (`spotify/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Client** - HTTP client with bearer-token handling
//! - **Traits** (`traits.rs`) - The `CatalogApi` capability set consumed by the
//!   suggestion engines, with an in-memory mock for tests
//!
//! Nothing outside this module sees a DTO.

pub mod domain;
pub mod spotify;
pub mod traits;

pub use domain::{AlbumRef, ArtistRef, AudioFeatures, CatalogError, TrackSummary};
pub use spotify::SpotifyClient;
pub use traits::CatalogApi;
