use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::database::DashboardSettings;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_stale_contact_days")]
    pub stale_contact_days: u32,
    #[serde(default = "default_recent_notes_limit")]
    pub recent_notes_limit: usize,
    /// Milliseconds a write waits on a locked database; 0 fails at once
    #[serde(default)]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_mark_done")]
    pub mark_done: String,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_copy_url")]
    pub copy_url: String,
    #[serde(default = "default_reload")]
    pub reload: String,
    #[serde(default = "default_help")]
    pub help: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            stale_contact_days: default_stale_contact_days(),
            recent_notes_limit: default_recent_notes_limit(),
            busy_timeout_ms: 0,
            log_level: default_log_level(),
            sidebar_width_percent: default_sidebar_width(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: default_config_version(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            mark_done: default_mark_done(),
            filter: default_filter(),
            copy_url: default_copy_url(),
            reload: default_reload(),
            help: default_help(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            accent: default_accent(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let preset = |fg: &str, bg: &str, highlight_bg: &str, accent: &str| Theme {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            accent: accent.to_string(),
        };

        HashMap::from([
            ("default".to_string(), preset("white", "black", "blue", "yellow")),
            ("light".to_string(), preset("black", "white", "blue", "magenta")),
            ("green".to_string(), preset("green", "black", "yellow", "lightgreen")),
            ("monochrome".to_string(), preset("white", "black", "white", "gray")),
        ])
    }
}

// Default value functions
fn default_stale_contact_days() -> u32 {
    14
}

fn default_recent_notes_limit() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sidebar_width() -> u16 {
    35
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_mark_done() -> String {
    "Space".to_string()
}

fn default_filter() -> String {
    "f".to_string()
}

fn default_copy_url() -> String {
    "y".to_string()
}

fn default_reload() -> String {
    "r".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_accent() -> String {
    "yellow".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let mut config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            let mut config = Config::default();
            config.save_to(&config_path)?;
            tracing::debug!(path = %config_path.display(), "wrote default config");
            config
        };

        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        Ok(config)
    }

    /// Load an explicit config file. Unlike profile configs it must exist.
    pub fn load_from_path(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Write configuration to `path`, creating its directory
    pub fn save_to(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            return data_dir.join("daybook.db").to_string_lossy().to_string();
        }
        match profile {
            utils::Profile::Dev => "~/.local/share/daybook-dev/daybook.db".to_string(),
            utils::Profile::Prod => "~/.local/share/daybook/daybook.db".to_string(),
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            stale_contact_days: self.stale_contact_days,
            recent_notes_limit: self.recent_notes_limit,
        }
    }

    /// The active theme: a user-defined one, then a preset, then the default
    pub fn get_active_theme(&self) -> Theme {
        self.themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.stale_contact_days, 14);
        assert_eq!(config.recent_notes_limit, 5);
        assert_eq!(config.busy_timeout_ms, 0);
        assert_eq!(config.key_bindings.mark_done, "Space");
        assert_eq!(config.current_theme, "default");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            "stale_contact_days = 30\n[key_bindings]\ncopy_url = \"c\"\n",
        )
        .unwrap();
        assert_eq!(config.dashboard_settings().stale_contact_days, 30);
        assert_eq!(config.dashboard_settings().recent_notes_limit, 5);
        assert_eq!(config.key_bindings.copy_url, "c");
        assert_eq!(config.key_bindings.quit, "q");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            current_theme: "no-such-theme".to_string(),
            ..Config::default()
        };
        assert_eq!(config.get_active_theme().highlight_bg, "blue");

        let light = Config {
            current_theme: "light".to_string(),
            ..Config::default()
        };
        assert_eq!(light.get_active_theme().bg, "white");
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config {
            database_path: "/tmp/daybook-test.db".to_string(),
            recent_notes_limit: 3,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert_eq!(loaded.recent_notes_limit, 3);
        assert_eq!(loaded.get_database_path(), PathBuf::from("/tmp/daybook-test.db"));
    }
}
