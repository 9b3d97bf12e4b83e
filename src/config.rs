use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::countdown::TimerConfig;
use crate::session::DEFAULT_PRESETS;

/// Startup defaults. The app only ever reads this file; `--init-config`
/// writes a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub minutes: u32,
    pub seconds: u32,
    pub presets: Vec<u32>,
    pub flash_on_expiry: bool,
    pub mute: bool,
    pub sound_file: Option<PathBuf>,
    pub sound_player: Option<String>,
    /// extra arguments passed to the player before the sound file
    pub sound_player_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minutes: 1,
            seconds: 0,
            presets: DEFAULT_PRESETS.to_vec(),
            flash_on_expiry: true,
            mute: false,
            sound_file: None,
            sound_player: None,
            sound_player_args: Vec::new(),
        }
    }
}

impl Config {
    pub fn duration(&self) -> TimerConfig {
        TimerConfig::new(self.minutes, self.seconds)
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "timeboxer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("timeboxer_config.json")
        };
        Self { path }
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
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
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
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
