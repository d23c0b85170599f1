use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::audio::AudioSettings;

pub const DEFAULT_CUE_VOLUME: f32 = 0.2;
pub const DEFAULT_TICK_RATE_MS: u64 = 100;
pub const MIN_TICK_RATE_MS: u64 = 10;
pub const MAX_TICK_RATE_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Looping track played during work sessions
    pub background_audio: Option<PathBuf>,
    /// One-shot sound played when a session ends
    pub cue_audio: Option<PathBuf>,
    pub cue_volume: f32,
    pub initial_volume: f32,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background_audio: None,
            cue_audio: None,
            cue_volume: DEFAULT_CUE_VOLUME,
            initial_volume: 1.0,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

/// Values supplied on the command line; `None` keeps the stored setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub background_audio: Option<PathBuf>,
    pub cue_audio: Option<PathBuf>,
    pub cue_volume: Option<f32>,
    pub initial_volume: Option<f32>,
    pub tick_rate_ms: Option<u64>,
}

impl Config {
    pub fn with_overrides(self, overrides: &Overrides) -> Self {
        Self {
            background_audio: overrides
                .background_audio
                .clone()
                .or(self.background_audio),
            cue_audio: overrides.cue_audio.clone().or(self.cue_audio),
            cue_volume: overrides.cue_volume.unwrap_or(self.cue_volume),
            initial_volume: overrides.initial_volume.unwrap_or(self.initial_volume),
            tick_rate_ms: overrides.tick_rate_ms.unwrap_or(self.tick_rate_ms),
        }
    }

    /// Clamp every value into its usable range
    pub fn sanitized(self) -> Self {
        Self {
            cue_volume: clamp_level(self.cue_volume, DEFAULT_CUE_VOLUME),
            initial_volume: clamp_level(self.initial_volume, 1.0),
            tick_rate_ms: self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS),
            ..self
        }
    }

    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings {
            background: self.background_audio.clone(),
            cue: self.cue_audio.clone(),
            cue_volume: self.cue_volume,
        }
    }
}

fn clamp_level(level: f32, fallback: f32) -> f32 {
    if level.is_nan() {
        fallback
    } else {
        level.clamp(0.0, 1.0)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
