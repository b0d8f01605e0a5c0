//! Catalog-backed commands: search, transitions and discovery.

use tokio::runtime::Runtime;

use super::catalog_client;
use crate::catalog::TrackSummary;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::{discovery, transition};

/// Search the catalog for tracks
pub fn cmd_search(rt: &Runtime, config: &Config, query: &str, limit: u32) -> Result<()> {
    let client = catalog_client(config)?;
    rt.block_on(async {
        let tracks = client.search_tracks(query, limit).await?;
        if tracks.is_empty() {
            println!("No tracks found for {:?}", query);
        }
        for track in &tracks {
            print_track(track, None);
        }
        Ok::<_, Error>(())
    })
}

/// Suggest tracks bridging two seeds
pub fn cmd_transition(
    rt: &Runtime,
    config: &Config,
    track_ids: &[String],
    basic: bool,
) -> Result<()> {
    let client = catalog_client(config)?;
    rt.block_on(async {
        let result = if basic {
            transition::compute_basic_transition(&client, track_ids).await?
        } else {
            transition::compute_smart_transition(&client, track_ids).await?
        };

        println!(
            "Found {} suggestions ({} with previews)",
            result.total_found, result.preview_count
        );
        if !result.strategies_used.is_empty() {
            println!("Strategies: {}", result.strategies_used.join(", "));
        }
        println!();
        for candidate in &result.suggestions {
            print_track(&candidate.track, candidate.strategy);
        }
        Ok::<_, Error>(())
    })
}

/// List well-known tracks
pub fn cmd_popular(rt: &Runtime, config: &Config) -> Result<()> {
    let client = catalog_client(config)?;
    rt.block_on(async {
        let popular = discovery::discover_popular_tracks(&client).await;

        println!(
            "{} tracks ({} with previews) via {}",
            popular.total_found,
            popular.preview_count,
            popular.strategies_used.join(", ")
        );
        for track in &popular.tracks {
            print_track(track, None);
        }
        Ok::<_, Error>(())
    })
}

/// Show the audio features of a track
pub fn cmd_features(rt: &Runtime, config: &Config, track_id: &str) -> Result<()> {
    let client = catalog_client(config)?;
    rt.block_on(async {
        let features = discovery::track_features(&client, track_id).await;

        println!("Tempo:        {:.1} BPM", features.tempo);
        println!("Energy:       {:.2}", features.energy);
        println!("Valence:      {:.2}", features.valence);
        println!("Danceability: {:.2}", features.danceability);
        Ok::<_, Error>(())
    })
}

/// Look up tracks as a playlist
pub fn cmd_preview(rt: &Runtime, config: &Config, track_ids: &[String]) -> Result<()> {
    let client = catalog_client(config)?;
    rt.block_on(async {
        let preview = discovery::build_playlist_preview(&client, track_ids).await?;

        println!(
            "{} of {} tracks found, {} with previews",
            preview.total_tracks,
            track_ids.len(),
            preview.tracks_with_preview
        );
        if preview.simulation_mode {
            println!("No previews available; playback would be simulated");
        }
        for track in &preview.playlist {
            print_track(track, None);
        }
        Ok::<_, Error>(())
    })
}

fn print_track(track: &TrackSummary, strategy: Option<&str>) {
    let marker = if track.has_preview() { "▶" } else { " " };
    let mut line = format!(
        "{} {} - {} [{}] (popularity {})",
        marker, track.artist, track.name, track.id, track.popularity
    );
    if let Some(strategy) = strategy {
        line.push_str(&format!(" via {}", strategy));
    }
    println!("{}", line);
}
