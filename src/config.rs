use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the task service, e.g. "http://localhost:5000/api".
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Display name shown as initials in the header.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_toggle_status")]
    pub toggle_status: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_next_page")]
    pub next_page: String,
    #[serde(default = "default_prev_page")]
    pub prev_page: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
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
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_overdue_fg")]
    pub overdue_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            user_name: default_user_name(),
            page_limit: default_page_limit(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            edit: default_edit(),
            delete: default_delete(),
            search: default_search(),
            filter: default_filter(),
            toggle_status: default_toggle_status(),
            refresh: default_refresh(),
            next_page: default_next_page(),
            prev_page: default_prev_page(),
            list_up: default_list_up(),
            list_down: default_list_down(),
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
            highlight_fg: default_highlight_fg(),
            overdue_fg: default_overdue_fg(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available regardless of the config
    /// file's themes table.
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert(
            "light".to_string(),
            Theme {
                fg: "black".to_string(),
                bg: "white".to_string(),
                highlight_bg: "blue".to_string(),
                highlight_fg: "white".to_string(),
                overdue_fg: "red".to_string(),
            },
        );

        themes.insert(
            "green".to_string(),
            Theme {
                fg: "green".to_string(),
                bg: "black".to_string(),
                highlight_bg: "yellow".to_string(),
                highlight_fg: "black".to_string(),
                overdue_fg: "red".to_string(),
            },
        );

        themes
    }
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_user_name() -> String {
    "User".to_string()
}

fn default_page_limit() -> u32 {
    10
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_filter() -> String {
    "f".to_string()
}

fn default_toggle_status() -> String {
    "Space".to_string()
}

fn default_refresh() -> String {
    "r".to_string()
}

fn default_next_page() -> String {
    "Right".to_string()
}

fn default_prev_page() -> String {
    "Left".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
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

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_overdue_fg() -> String {
    "red".to_string()
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
    /// Load configuration from file, or create a default one if missing.
    /// The profile selects separate config directories for dev and prod.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_with_profile(profile)?;
            Ok(config)
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_profile(utils::Profile::Prod)
    }

    /// Save configuration to the profile's config file.
    pub fn save_with_profile(&self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(&config_path, contents).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        utils::get_config_dir(profile)
            .map(|dir| dir.join("config.toml"))
            .ok_or_else(|| {
                ConfigError::ConfigDirError("Could not determine config directory".to_string())
            })
    }

    /// Resolve the active theme: user themes may shadow presets, unknown
    /// names fall back to the default theme.
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            return theme.clone();
        }
        Theme::get_preset_themes()
            .remove(&self.current_theme)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.page_limit, 10);
        assert_eq!(config.key_bindings.quit, "q");
        assert_eq!(config.current_theme, "default");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_base_url = "https://tasks.example.com/api"
            user_name = "Ada Lovelace"

            [key_bindings]
            quit = "Q"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://tasks.example.com/api");
        assert_eq!(config.user_name, "Ada Lovelace");
        assert_eq!(config.key_bindings.quit, "Q");
        assert_eq!(config.key_bindings.new, "n");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            current_theme: "does-not-exist".to_string(),
            ..Config::default()
        };
        let theme = config.get_active_theme();
        assert_eq!(theme.fg, "white");
    }

    #[test]
    fn user_theme_shadows_preset() {
        let mut config = Config::default();
        config.themes.insert(
            "default".to_string(),
            Theme {
                fg: "magenta".to_string(),
                ..Theme::default()
            },
        );
        assert_eq!(config.get_active_theme().fg, "magenta");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            api_token: Some("secret".to_string()),
            page_limit: 25,
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.api_token.as_deref(), Some("secret"));
        assert_eq!(reparsed.page_limit, 25);
    }
}
