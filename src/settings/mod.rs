//! Per-track settings persistence.
//!
//! Uses SQLx with SQLite. One record per catalog track ID, holding the
//! user's tempo/energy overrides, playback speed and notes.
//!
//! # Example
//!
//! ```ignore
//! use trackbridge::settings::{init_db, save_track_settings, TrackSettings};
//!
//! let pool = init_db("sqlite:settings.db").await?;
//! save_track_settings(&pool, "4uLU6hMCjMI75M1A2tKUQC", &TrackSettings::default()).await?;
//! ```

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "settings.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Settings database ready at {}", db_url);
    Ok(pool)
}

fn default_speed() -> f64 {
    1.0
}

/// Clients send `"speed": null` for "unchanged"
fn speed_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_speed))
}

/// User settings for one track, as sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub custom_bpm: Option<f64>,
    /// Playback speed multiplier
    #[serde(default = "default_speed", deserialize_with = "speed_or_default")]
    pub speed: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            track_name: None,
            artist_name: None,
            tempo: None,
            energy: None,
            custom_bpm: None,
            speed: default_speed(),
            notes: None,
        }
    }
}

impl TrackSettings {
    /// What clients see for a track that has never been configured
    pub fn unsaved() -> Self {
        Self {
            energy: Some(0.5),
            notes: Some(String::new()),
            ..Default::default()
        }
    }
}

/// A settings row as stored
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredTrackSettings {
    pub track_id: String,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub tempo: Option<f64>,
    pub energy: Option<f64>,
    pub custom_bpm: Option<f64>,
    pub speed: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StoredTrackSettings> for TrackSettings {
    fn from(stored: StoredTrackSettings) -> Self {
        Self {
            track_name: stored.track_name,
            artist_name: stored.artist_name,
            tempo: stored.tempo,
            energy: stored.energy,
            custom_bpm: stored.custom_bpm,
            speed: stored.speed,
            notes: stored.notes,
        }
    }
}

/// Errors from the settings store
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Track ID is required")]
    MissingTrackId,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn require_track_id(track_id: &str) -> Result<(), SettingsError> {
    if track_id.trim().is_empty() {
        return Err(SettingsError::MissingTrackId);
    }
    Ok(())
}

/// Fixed-width UTC timestamp, so text order matches time order
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Save or update the settings of a track.
///
/// An existing record keeps its `created_at`; `updated_at` is always refreshed.
pub async fn save_track_settings(
    pool: &SqlitePool,
    track_id: &str,
    settings: &TrackSettings,
) -> Result<(), SettingsError> {
    require_track_id(track_id)?;
    let now = now_timestamp();

    sqlx::query(
        r#"
        INSERT INTO track_settings
            (track_id, track_name, artist_name, tempo, energy, custom_bpm, speed, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(track_id) DO UPDATE SET
            track_name = excluded.track_name,
            artist_name = excluded.artist_name,
            tempo = excluded.tempo,
            energy = excluded.energy,
            custom_bpm = excluded.custom_bpm,
            speed = excluded.speed,
            notes = excluded.notes,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(track_id)
    .bind(&settings.track_name)
    .bind(&settings.artist_name)
    .bind(settings.tempo)
    .bind(settings.energy)
    .bind(settings.custom_bpm)
    .bind(settings.speed)
    .bind(&settings.notes)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    tracing::info!("Settings saved for track {}", track_id);
    Ok(())
}

/// Settings of one track, if any were saved
pub async fn get_track_settings(
    pool: &SqlitePool,
    track_id: &str,
) -> Result<Option<StoredTrackSettings>, SettingsError> {
    require_track_id(track_id)?;

    let row = sqlx::query_as::<_, StoredTrackSettings>(
        r#"
        SELECT track_id, track_name, artist_name, tempo, energy, custom_bpm, speed, notes,
               created_at, updated_at
        FROM track_settings
        WHERE track_id = ?
        "#,
    )
    .bind(track_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All saved settings, most recently updated first
pub async fn get_all_settings(pool: &SqlitePool) -> Result<Vec<StoredTrackSettings>, SettingsError> {
    let rows = sqlx::query_as::<_, StoredTrackSettings>(
        r#"
        SELECT track_id, track_name, artist_name, tempo, energy, custom_bpm, speed, notes,
               created_at, updated_at
        FROM track_settings
        ORDER BY updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::temp_db;

    fn settings(notes: &str, speed: f64) -> TrackSettings {
        TrackSettings {
            track_name: Some("Around the World".to_string()),
            artist_name: Some("Daft Punk".to_string()),
            tempo: Some(121.3),
            energy: Some(0.8),
            custom_bpm: None,
            speed,
            notes: Some(notes.to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_settings() {
        let (pool, _dir) = temp_db().await;

        save_track_settings(&pool, "t1", &settings("intro is long", 1.1))
            .await
            .unwrap();
        let stored = get_track_settings(&pool, "t1").await.unwrap().unwrap();

        assert_eq!(stored.track_id, "t1");
        assert_eq!(stored.tempo, Some(121.3));
        assert_eq!(stored.speed, 1.1);
        assert_eq!(stored.notes.as_deref(), Some("intro is long"));
        assert_eq!(stored.created_at, stored.updated_at);
        assert_eq!(TrackSettings::from(stored), settings("intro is long", 1.1));
    }

    #[tokio::test]
    async fn test_missing_settings_is_none() {
        let (pool, _dir) = temp_db().await;

        assert!(get_track_settings(&pool, "never-saved").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_keeps_created_at() {
        let (pool, _dir) = temp_db().await;

        save_track_settings(&pool, "t1", &settings("first", 1.0))
            .await
            .unwrap();
        let first = get_track_settings(&pool, "t1").await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        save_track_settings(&pool, "t1", &settings("second", 0.9))
            .await
            .unwrap();
        let second = get_track_settings(&pool, "t1").await.unwrap().unwrap();

        assert_eq!(second.notes.as_deref(), Some("second"));
        assert_eq!(second.speed, 0.9);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(get_all_settings(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_settings_most_recent_first() {
        let (pool, _dir) = temp_db().await;

        for id in ["a", "b", "a"] {
            save_track_settings(&pool, id, &settings(id, 1.0)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let all = get_all_settings(&pool).await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.track_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_track_id_rejected() {
        let (pool, _dir) = temp_db().await;

        let save = save_track_settings(&pool, "  ", &TrackSettings::default()).await;
        let get = get_track_settings(&pool, "").await;

        assert!(matches!(save, Err(SettingsError::MissingTrackId)));
        assert!(matches!(get, Err(SettingsError::MissingTrackId)));
        assert!(get_all_settings(&pool).await.unwrap().is_empty());
    }

    #[test]
    fn test_settings_json_defaults() {
        let parsed: TrackSettings = serde_json::from_str(r#"{"custom_bpm": 128}"#).unwrap();

        assert_eq!(parsed.custom_bpm, Some(128.0));
        assert_eq!(parsed.speed, 1.0);
        assert!(parsed.notes.is_none());
    }

    #[test]
    fn test_null_speed_means_default() {
        let parsed: TrackSettings =
            serde_json::from_str(r#"{"speed": null, "notes": "x"}"#).unwrap();
        assert_eq!(parsed.speed, 1.0);

        let parsed: TrackSettings = serde_json::from_str(r#"{"speed": 0.75}"#).unwrap();
        assert_eq!(parsed.speed, 0.75);
    }

    #[test]
    fn test_unsaved_defaults() {
        let json = serde_json::to_value(TrackSettings::unsaved()).unwrap();

        assert_eq!(json["tempo"], serde_json::Value::Null);
        assert_eq!(json["energy"], 0.5);
        assert_eq!(json["custom_bpm"], serde_json::Value::Null);
        assert_eq!(json["speed"], 1.0);
        assert_eq!(json["notes"], "");
    }

    #[test]
    fn test_db_url() {
        assert_eq!(db_url(None), "sqlite:settings.db");
        assert_eq!(
            db_url(Some(Path::new("/tmp/x.db"))),
            "sqlite:/tmp/x.db"
        );
    }
}
