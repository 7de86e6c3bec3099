//! Configuration file management
//!
//! Loads `framehost.toml`. Every section and field is optional; missing ones
//! take the defaults below, and a missing file yields the defaults as a whole.
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//! title = "My Window"
//!
//! [input]
//! autorepeat = false
//! buffer_size = 16
//!
//! [platform]
//! backend = "auto"   # auto | headless | x11 | win32
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::queue::DEFAULT_CAPACITY;
use crate::platform::BackendKind;
use crate::window::MAX_DIMENSION;

/// Default config path, relative to the working directory.
pub const DEFAULT_PATH: &str = "framehost.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub input: InputConfig,
    pub platform: PlatformConfig,
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Client-area width in pixels
    pub width: i32,
    /// Client-area height in pixels
    pub height: i32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "My Window".to_string(),
        }
    }
}

/// Input settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Initial autorepeat state of the keyboard tracker
    pub autorepeat: bool,
    /// Capacity of every bounded event queue
    pub buffer_size: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            autorepeat: false,
            buffer_size: DEFAULT_CAPACITY,
        }
    }
}

/// Platform settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformConfig {
    pub backend: BackendSetting,
}

/// Backend choice as written in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSetting {
    /// Detect from the target and session.
    #[default]
    Auto,
    Headless,
    X11,
    Win32,
}

impl BackendSetting {
    /// The explicit backend, `None` for auto-detection.
    pub fn kind(self) -> Option<BackendKind> {
        match self {
            BackendSetting::Auto => None,
            BackendSetting::Headless => Some(BackendKind::Headless),
            BackendSetting::X11 => Some(BackendKind::X11),
            BackendSetting::Win32 => Some(BackendKind::Win32),
        }
    }

    /// Whether the frame loop may run on the `resolved` backend. A headless
    /// host reached by auto-detection has no one to post quit.
    pub fn allows(self, resolved: BackendKind) -> bool {
        !(self == BackendSetting::Auto && resolved == BackendKind::Headless)
    }
}

impl Config {
    /// Loads `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("config: {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.window.width, self.window.height);
        if w <= 0 || h <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {w}x{h}"
            )));
        }
        if w > MAX_DIMENSION || h > MAX_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "window size must be at most {MAX_DIMENSION}x{MAX_DIMENSION}, got {w}x{h}"
            )));
        }
        if self.input.buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "input.buffer_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
