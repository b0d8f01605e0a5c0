//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `serve`: the HTTP API
//! - `catalog`: search, transitions, popular tracks and audio features
//! - `settings`: the per-track settings store

mod catalog;
mod serve;
mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::SpotifyClient;
use crate::config::{self, Config};
use crate::error::{Result, ResultExt};

pub use catalog::{cmd_features, cmd_popular, cmd_preview, cmd_search, cmd_transition};
pub use serve::cmd_serve;
pub use settings::{cmd_settings_get, cmd_settings_list, cmd_settings_set};

/// Trackbridge CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog API client ID
    #[arg(long, global = true, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Catalog API client secret
    #[arg(long, global = true, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Settings database path
    #[arg(long, global = true, env = "TRACKBRIDGE_DB")]
    pub db: Option<PathBuf>,

    /// HTTP server port
    #[arg(long, global = true, env = "TRACKBRIDGE_PORT")]
    pub port: Option<u16>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (the default)
    Serve,
    /// Search the catalog for tracks
    Search {
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Suggest tracks bridging two seed tracks
    Transition {
        /// The two seed track IDs
        #[arg(required = true)]
        track_ids: Vec<String>,
        /// Use the search-only engine
        #[arg(long)]
        basic: bool,
    },
    /// List well-known tracks, preferring ones with preview clips
    Popular,
    /// Show the audio features of a track
    Features {
        /// Catalog track ID
        track_id: String,
    },
    /// Look up a list of tracks as a playlist
    Preview {
        /// Catalog track IDs, in playlist order
        #[arg(required = true)]
        track_ids: Vec<String>,
    },
    /// Write the effective configuration to the config file
    InitConfig,
    /// Read or write per-track settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the settings of one track
    Get {
        track_id: String,
    },
    /// Save settings for a track, keeping fields that aren't given
    Set {
        track_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        tempo: Option<f64>,
        #[arg(long)]
        energy: Option<f64>,
        /// Custom BPM override
        #[arg(long)]
        bpm: Option<f64>,
        /// Playback speed multiplier
        #[arg(long)]
        speed: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all saved settings, most recently updated first
    List,
}

impl Cli {
    /// Load the config file and apply command-line and environment overrides
    pub fn resolve_config(&self) -> Config {
        let mut config = self.file_config();
        self.apply_overrides(&mut config);
        config
    }

    fn file_config(&self) -> Config {
        match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        }
    }

    /// What `init-config` persists: overrides applied, but the client secret
    /// stays whatever the file already held
    fn config_to_save(&self, file: Config) -> Config {
        let secret = file.credentials.client_secret.clone();
        let mut config = file;
        self.apply_overrides(&mut config);
        config.credentials.client_secret = secret;
        config
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(id) = &self.client_id {
            config.credentials.client_id = Some(id.clone());
        }
        if let Some(secret) = &self.client_secret {
            config.credentials.client_secret = Some(secret.clone());
        }
        if let Some(db) = &self.db {
            config.database.path = Some(db.clone());
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Run the specified CLI command, or the server when none was given.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = cli.resolve_config();

    match &cli.command {
        None | Some(Commands::Serve) => cmd_serve(&rt, &config)?,
        Some(Commands::Search { query, limit }) => cmd_search(&rt, &config, query, *limit)?,
        Some(Commands::Transition { track_ids, basic }) => {
            cmd_transition(&rt, &config, track_ids, *basic)?
        }
        Some(Commands::Popular) => cmd_popular(&rt, &config)?,
        Some(Commands::Features { track_id }) => cmd_features(&rt, &config, track_id)?,
        Some(Commands::Preview { track_ids }) => cmd_preview(&rt, &config, track_ids)?,
        Some(Commands::InitConfig) => cmd_init_config(cli)?,
        Some(Commands::Settings { action }) => match action {
            SettingsAction::Get { track_id } => cmd_settings_get(&rt, &config, track_id)?,
            SettingsAction::Set {
                track_id,
                name,
                artist,
                tempo,
                energy,
                bpm,
                speed,
                notes,
            } => {
                let changes = settings::SettingsChanges {
                    track_name: name.clone(),
                    artist_name: artist.clone(),
                    tempo: *tempo,
                    energy: *energy,
                    custom_bpm: *bpm,
                    speed: *speed,
                    notes: notes.clone(),
                };
                cmd_settings_set(&rt, &config, track_id, changes)?
            }
            SettingsAction::List => cmd_settings_list(&rt, &config)?,
        },
    }
    Ok(())
}

fn cmd_init_config(cli: &Cli) -> Result<()> {
    let config = cli.config_to_save(cli.file_config());
    config::save(&config)?;
    if let Some(path) = config::config_path() {
        println!("Configuration written to {}", path.display());
    }
    if cli.client_secret.is_some() && config.credentials.client_secret != cli.client_secret {
        println!("Client secret not written; keep passing it with CLIENT_SECRET");
    }
    Ok(())
}

// ============================================================================
// Shared helper functions
// ============================================================================

pub(crate) fn catalog_client(config: &Config) -> Result<SpotifyClient> {
    SpotifyClient::new(&config.credentials, &config.catalog).with_context("creating catalog client")
}

pub(crate) async fn open_settings_db(config: &Config) -> Result<sqlx::SqlitePool> {
    let url = crate::settings::db_url(config.database.path.as_deref());
    crate::settings::init_db(&url)
        .await
        .with_context(format!("opening settings database {}", url))
}
