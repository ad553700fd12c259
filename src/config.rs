//! Configuration file loading for layerterm.
//!
//! The configuration file is located at `~/.layerterm/config.toml`:
//!
//! ```toml
//! # Number of layers the demo canvas starts with
//! layers = 3
//!
//! [colors]
//! line-ui = "blue"
//! selection = "dark-green"
//! disabled = "gray"
//!
//! [animation]
//! duration-ms = 500
//! double-lines = true
//! ```
//!
//! Color names are the 16 classic palette entries in kebab-case
//! (`black`, `dark-blue`, …, `white`).

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PaletteColor, StyleColors};

/// Configuration loading/saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a home directory")]
    NoHome,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Number of layers the demo canvas starts with
    pub layers: usize,
    /// Style color settings
    pub colors: ColorConfig,
    /// Animation settings
    pub animation: AnimationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layers: 3,
            colors: ColorConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

/// Style color configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorConfig {
    pub line_ui: PaletteColor,
    pub selection: PaletteColor,
    pub disabled: PaletteColor,
}

impl Default for ColorConfig {
    fn default() -> Self {
        let style = StyleColors::default();
        Self {
            line_ui: style.line_ui,
            selection: style.selection,
            disabled: style.disabled,
        }
    }
}

impl ColorConfig {
    /// The live style block the canvas consumes.
    pub fn style(&self) -> StyleColors {
        StyleColors {
            disabled: self.disabled,
            selection: self.selection,
            line_ui: self.line_ui,
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnimationConfig {
    pub duration_ms: u64,
    pub double_lines: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            double_lines: true,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults on any error.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!("ignoring unreadable config: {err}");
                Self::default()
            }
        }
    }

    /// Load configuration from file; `Ok(None)` when no file exists.
    pub fn try_load() -> Result<Option<Self>, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoHome)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoHome)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    fn config_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)?;
        Some(home.join(".layerterm").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.layers, 3);
        assert_eq!(config.colors.line_ui, PaletteColor::Blue);
        assert_eq!(config.colors.selection, PaletteColor::DarkGreen);
        assert_eq!(config.colors.disabled, PaletteColor::Gray);
        assert_eq!(config.animation.duration_ms, 500);
        assert!(config.animation.double_lines);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            layers = 5

            [colors]
            line-ui = "dark-cyan"

            [animation]
            duration-ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.layers, 5);
        assert_eq!(config.colors.line_ui, PaletteColor::DarkCyan);
        // Unspecified fields keep their defaults.
        assert_eq!(config.colors.selection, PaletteColor::DarkGreen);
        assert_eq!(config.animation.duration_ms, 250);
        assert!(config.animation.double_lines);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.colors.selection = PaletteColor::Magenta;
        config.animation.double_lines = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.colors.selection, PaletteColor::Magenta);
        assert!(!parsed.animation.double_lines);
    }
}
