//! Presentation and interaction settings for the annotation overlay.
//!
//! Defaults reproduce the stock overlay behaviour. Settings can be loaded from
//! a TOML file, from environment variables, or built programmatically. The
//! minimum drag size is measured in document-space units and does not change
//! with zoom.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {0}")]
    InvalidValue(String),
}

/// Opacity pair for an element that reacts to hover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverOpacity {
    pub normal: f32,
    pub hovered: f32,
}

impl HoverOpacity {
    pub fn pick(&self, hovered: bool) -> f32 {
        if hovered {
            self.hovered
        } else {
            self.normal
        }
    }
}

/// Settings for the annotation overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// A completed drag creates an annotation only when both sides exceed this (document units)
    pub min_drag_size: f32,
    /// Edge length of the sticky-note icon (pixels)
    pub note_icon_size: f32,
    /// Horizontal gap between a note icon and its dialog (pixels)
    pub note_dialog_offset: f32,
    /// Highlight fill opacity
    pub highlight_opacity: HoverOpacity,
    /// Sticky-note icon fill opacity
    pub note_opacity: HoverOpacity,
    /// Fill opacity of a highlight draft while dragging
    pub draft_highlight_opacity: f32,
    /// Fill opacity of a redaction draft while dragging
    pub draft_redaction_opacity: f32,
    /// Dash pattern for the draft outline (on, off)
    pub draft_dash: [f32; 2],
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_drag_size: 10.0,
            note_icon_size: crate::annotation::STICKY_NOTE_SIZE,
            note_dialog_offset: 40.0,
            highlight_opacity: HoverOpacity {
                normal: 0.3,
                hovered: 0.5,
            },
            note_opacity: HoverOpacity {
                normal: 0.8,
                hovered: 0.9,
            },
            draft_highlight_opacity: 0.3,
            draft_redaction_opacity: 0.5,
            draft_dash: [5.0, 5.0],
        }
    }
}

impl LayerConfig {
    /// Default configuration file location.
    ///
    /// - macOS: ~/Library/Application Support/doc-annotator/layer.toml
    /// - Linux: ~/.config/doc-annotator/layer.toml
    /// - Windows: %APPDATA%\doc-annotator\layer.toml
    pub fn default_path() -> PathBuf {
        config_dir().join("layer.toml")
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOC_ANNOTATOR_MIN_DRAG_SIZE`: minimum drag size (default: 10)
    /// - `DOC_ANNOTATOR_NOTE_ICON_SIZE`: sticky-note icon size (default: 30)
    ///
    /// # Errors
    /// Returns an error if any variable holds an invalid number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// ```toml
    /// min_drag_size = 10.0
    /// note_icon_size = 30.0
    ///
    /// [highlight_opacity]
    /// normal = 0.3
    /// hovered = 0.5
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from a TOML string; missing keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file at [`Self::default_path`] if present, then applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading layer config");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(size) = env_f32("DOC_ANNOTATOR_MIN_DRAG_SIZE")? {
            self.min_drag_size = size;
        }
        if let Some(size) = env_f32("DOC_ANNOTATOR_NOTE_ICON_SIZE")? {
            self.note_icon_size = size;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_drag_size.is_finite() || self.min_drag_size < 0.0 {
            return Err(ConfigError::InvalidValue("min_drag_size".to_string()));
        }
        if !self.note_icon_size.is_finite() || self.note_icon_size <= 0.0 {
            return Err(ConfigError::InvalidValue("note_icon_size".to_string()));
        }
        let opacities = [
            ("highlight_opacity.normal", self.highlight_opacity.normal),
            ("highlight_opacity.hovered", self.highlight_opacity.hovered),
            ("note_opacity.normal", self.note_opacity.normal),
            ("note_opacity.hovered", self.note_opacity.hovered),
            ("draft_highlight_opacity", self.draft_highlight_opacity),
            ("draft_redaction_opacity", self.draft_redaction_opacity),
        ];
        for (key, value) in opacities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue(key.to_string()));
            }
        }
        Ok(())
    }
}

/// Directory holding this application's config files
pub fn config_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("doc-annotator")
    } else {
        PathBuf::from(".doc-annotator")
    }
}

/// Reads an optional numeric environment variable
pub fn env_f32(key: &str) -> Result<Option<f32>, ConfigError> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(None),
    }
}
