//! Per-track settings commands.

use tokio::runtime::Runtime;

use super::open_settings_db;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::settings::{self, TrackSettings};

/// Fields given on the command line; None keeps the stored value
#[derive(Debug, Default)]
pub struct SettingsChanges {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub tempo: Option<f64>,
    pub energy: Option<f64>,
    pub custom_bpm: Option<f64>,
    pub speed: Option<f64>,
    pub notes: Option<String>,
}

impl SettingsChanges {
    fn apply(self, settings: &mut TrackSettings) {
        if self.track_name.is_some() {
            settings.track_name = self.track_name;
        }
        if self.artist_name.is_some() {
            settings.artist_name = self.artist_name;
        }
        if self.tempo.is_some() {
            settings.tempo = self.tempo;
        }
        if self.energy.is_some() {
            settings.energy = self.energy;
        }
        if self.custom_bpm.is_some() {
            settings.custom_bpm = self.custom_bpm;
        }
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if self.notes.is_some() {
            settings.notes = self.notes;
        }
    }
}

/// Show the settings of one track
pub fn cmd_settings_get(rt: &Runtime, config: &Config, track_id: &str) -> Result<()> {
    rt.block_on(async {
        let pool = open_settings_db(config).await?;
        match settings::get_track_settings(&pool, track_id).await? {
            Some(stored) => {
                println!("Track:   {}", stored.track_id);
                println!("Updated: {}", stored.updated_at);
                print_settings(&stored.into());
            }
            None => {
                println!("No settings saved for {}", track_id);
                print_settings(&TrackSettings::unsaved());
            }
        }
        Ok::<_, Error>(())
    })
}

/// Save settings for a track, merged over what is already stored
pub fn cmd_settings_set(
    rt: &Runtime,
    config: &Config,
    track_id: &str,
    changes: SettingsChanges,
) -> Result<()> {
    rt.block_on(async {
        let pool = open_settings_db(config).await?;
        let mut current = settings::get_track_settings(&pool, track_id)
            .await?
            .map(TrackSettings::from)
            .unwrap_or_default();

        changes.apply(&mut current);
        settings::save_track_settings(&pool, track_id, &current).await?;

        println!("Settings saved for {}", track_id);
        print_settings(&current);
        Ok::<_, Error>(())
    })
}

/// List all saved settings
pub fn cmd_settings_list(rt: &Runtime, config: &Config) -> Result<()> {
    rt.block_on(async {
        let pool = open_settings_db(config).await?;
        let all = settings::get_all_settings(&pool).await?;

        if all.is_empty() {
            println!("No settings saved yet");
        }
        for stored in &all {
            let label = match (&stored.artist_name, &stored.track_name) {
                (Some(artist), Some(name)) => format!("{} - {}", artist, name),
                (None, Some(name)) => name.clone(),
                _ => stored.track_id.clone(),
            };
            let bpm = stored
                .custom_bpm
                .or(stored.tempo)
                .map(|b| format!("{:.1} BPM", b))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}  {}  {}  x{:.2}",
                stored.updated_at, label, bpm, stored.speed
            );
        }
        Ok::<_, Error>(())
    })
}

fn print_settings(settings: &TrackSettings) {
    fn show(value: Option<f64>) -> String {
        value.map(|v| format!("{}", v)).unwrap_or_else(|| "-".to_string())
    }

    println!("Tempo:      {}", show(settings.tempo));
    println!("Energy:     {}", show(settings.energy));
    println!("Custom BPM: {}", show(settings.custom_bpm));
    println!("Speed:      x{:.2}", settings.speed);
    if let Some(notes) = settings.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("Notes:      {}", notes);
    }
}
