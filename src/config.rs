//! Persisted editor settings: log level, default tool, label hotkeys and palette.
//!
//! Stored as versioned JSON in the platform config directory on native hosts
//! and in `localStorage` in the browser.

use serde::{Deserialize, Serialize};

use crate::color_utils::Palette;
use crate::constants::MAX_LABEL_HOTKEYS;
use crate::event::Key;
use crate::keybindings::KeyBindings;
use crate::model::Tool;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,

    /// Label color palette
    #[serde(default)]
    pub palette: Palette,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tool selected when the editor opens
    #[serde(default)]
    pub default_tool: Tool,
}

/// Keybinding configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Hotkey that advances to the next label
    #[serde(default = "default_cycle_label")]
    pub cycle_label: Key,

    /// Hotkeys for label selection (indices 0-9 map to labels 1-10)
    #[serde(default = "default_label_hotkeys")]
    pub label_hotkeys: Vec<Option<Key>>,
}

fn default_cycle_label() -> Key {
    KeyBindings::default().cycle_label
}

fn default_label_hotkeys() -> Vec<Option<Key>> {
    KeyBindings::default().label_hotkeys.to_vec()
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self::from(&KeyBindings::default())
    }
}

impl From<&KeyBindings> for KeyBindingsConfig {
    fn from(bindings: &KeyBindings) -> Self {
        Self {
            cycle_label: bindings.cycle_label,
            label_hotkeys: bindings.label_hotkeys.to_vec(),
        }
    }
}

impl KeyBindingsConfig {
    /// Convert back to KeyBindings, filling missing slots with None.
    pub fn to_keybindings(&self) -> KeyBindings {
        let mut label_hotkeys: [Option<Key>; MAX_LABEL_HOTKEYS] = [None; MAX_LABEL_HOTKEYS];

        for (i, hotkey) in self
            .label_hotkeys
            .iter()
            .take(MAX_LABEL_HOTKEYS)
            .enumerate()
        {
            label_hotkeys[i] = *hotkey;
        }

        KeyBindings {
            cycle_label: self.cycle_label,
            label_hotkeys,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            keybindings: KeyBindingsConfig::default(),
            palette: Palette::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a config document. Documents written by a newer format are refused
    /// rather than silently losing their unknown settings.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "boxlabel-config.json"
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AppConfig {
    /// `<config dir>/boxlabel/boxlabel-config.json`, or `~/.config/boxlabel/...`
    /// on platforms without a config dir.
    pub fn default_path() -> Option<std::path::PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("boxlabel").join(Self::default_filename()))
    }

    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Editor settings read from {}", path.display());
        Ok(config)
    }

    /// Write the config, creating missing parent directories.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Editor settings written to {}", path.display());
        Ok(())
    }

    /// Settings from the default path. A missing or unreadable file yields
    /// `None` and the caller falls back to defaults.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.is_file() {
            log::debug!("No editor settings at {}", path.display());
            return None;
        }
        Self::load_from_path(&path)
            .map_err(|e| log::warn!("Ignoring settings at {}: {}", path.display(), e))
            .ok()
    }

    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no home or config directory",
            ))
        })?;
        self.save_to_path(&path)
    }
}

#[cfg(target_arch = "wasm32")]
impl AppConfig {
    const STORAGE_KEY: &'static str = "boxlabel-config";

    fn storage() -> Result<web_sys::Storage, ConfigError> {
        web_sys::window()
            .ok_or_else(|| ConfigError::Storage("page has no window".to_string()))?
            .local_storage()
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ConfigError::Storage("localStorage disabled".to_string()))
    }

    /// Settings stored by a previous session, if any parse.
    pub fn load_from_local_storage() -> Option<Self> {
        let storage = Self::storage()
            .map_err(|e| log::warn!("{}", e))
            .ok()?;
        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::debug!("No editor settings in localStorage");
                return None;
            }
            Err(e) => {
                log::warn!("localStorage read of '{}' failed: {:?}", Self::STORAGE_KEY, e);
                return None;
            }
        };
        Self::from_json(&json)
            .map_err(|e| log::warn!("Ignoring stored editor settings: {}", e))
            .inspect(|_| log::info!("Editor settings restored from localStorage"))
            .ok()
    }

    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| ConfigError::Storage(format!("write of '{}' failed: {:?}", Self::STORAGE_KEY, e)))?;
        log::info!("Editor settings stored in localStorage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was written by a newer release
    #[error("config format v{found} is not supported (this build reads up to v{supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("config file: {0}")]
    Io(#[from] std::io::Error),

    /// Browser storage unavailable or refused the write
    #[error("browser storage: {0}")]
    Storage(String),
}
