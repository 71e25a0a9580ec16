//! Configuration management
//!
//! Settings live in `<config dir>/storyplay/config.toml`. A missing file
//! means defaults; a partial file is completed with defaults field by field.

use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::player::{Millis, DEFAULT_PROGRESS_INTERVAL_MS};
use crate::story::DurationDefaults;

const APP_DIR: &str = "storyplay";
const CONFIG_FILE: &str = "config.toml";

/// Errors from loading or saving the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Playback timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Spacing of progress frames
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: Millis,
    /// Display time of image items without an explicit duration
    #[serde(default = "default_image_ms")]
    pub default_image_ms: Millis,
    /// Display time of text items without an explicit duration
    #[serde(default = "default_text_ms")]
    pub default_text_ms: Millis,
    /// Display time of video items without an explicit duration
    #[serde(default = "default_video_ms")]
    pub default_video_ms: Millis,
}

fn default_progress_interval_ms() -> Millis {
    DEFAULT_PROGRESS_INTERVAL_MS
}

fn default_image_ms() -> Millis {
    DurationDefaults::default().image.get()
}

fn default_text_ms() -> Millis {
    DurationDefaults::default().text.get()
}

fn default_video_ms() -> Millis {
    DurationDefaults::default().video.get()
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
            default_image_ms: default_image_ms(),
            default_text_ms: default_text_ms(),
            default_video_ms: default_video_ms(),
        }
    }
}

/// Where stories come from and where reactions go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory of `<subject>.json` story files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories_dir: Option<PathBuf>,
    /// JSONL file reactions are appended to; reactions are dropped when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions_log: Option<PathBuf>,
}

impl Config {
    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, or defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).map_err(io_err)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would stall playback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playback;
        let fields = [
            ("playback.progress_interval_ms", p.progress_interval_ms),
            ("playback.default_image_ms", p.default_image_ms),
            ("playback.default_text_ms", p.default_text_ms),
            ("playback.default_video_ms", p.default_video_ms),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Per-kind fallback durations for story files.
    pub fn duration_defaults(&self) -> Result<DurationDefaults, ConfigError> {
        let nonzero = |name: &str, ms: Millis| {
            NonZeroU64::new(ms)
                .ok_or_else(|| ConfigError::Invalid(format!("{} must be greater than 0", name)))
        };
        Ok(DurationDefaults {
            image: nonzero("playback.default_image_ms", self.playback.default_image_ms)?,
            text: nonzero("playback.default_text_ms", self.playback.default_text_ms)?,
            video: nonzero("playback.default_video_ms", self.playback.default_video_ms)?,
        })
    }

    /// Configured stories directory, or `<data dir>/storyplay/stories`.
    pub fn stories_dir(&self) -> PathBuf {
        self.library.stories_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("stories")
        })
    }

    pub fn reactions_log(&self) -> Option<&Path> {
        self.library.reactions_log.as_deref()
    }
}
