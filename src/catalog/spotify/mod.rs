//! Spotify Web API integration
//!
//! The only catalog backend: track/artist search, album listings, related
//! artists, audio features and seed-based recommendations.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod auth;
mod client;

pub use client::SpotifyClient;
