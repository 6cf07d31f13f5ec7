//! Highlighter settings persistence
//!
//! Stores user preferences in `~/.config/colorlens/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Visual treatment of a highlighted literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    #[default]
    Background,
    Border,
    Square,
    Underline,
}

/// Which side of the literal the swatch sits on in `Square` style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SquarePosition {
    Before,
    #[default]
    After,
}

/// Highlighter configuration that persists across sessions
///
/// The three scope flags are kept consistent by the setters: "everywhere"
/// excludes the two scoped modes and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub highlight_everywhere: bool,
    pub highlight_in_backticks: bool,
    pub highlight_in_codeblocks: bool,
    pub highlight_style: HighlightStyle,
    pub enable_color_picker: bool,
    pub use_contrasting_border: bool,
    pub square_position: SquarePosition,
    pub scale_square_with_text: bool,
    /// Paths (as shown by the host) that never get decorations
    pub excluded_files: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_everywhere: true,
            highlight_in_backticks: false,
            highlight_in_codeblocks: false,
            highlight_style: HighlightStyle::Background,
            enable_color_picker: true,
            use_contrasting_border: false,
            square_position: SquarePosition::After,
            scale_square_with_text: false,
            excluded_files: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the default config file, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!("Loaded config from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        settings.normalize();
        Ok(settings)
    }

    /// Save to the default config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save to an explicit path, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(io_err)?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Resolve a hand-edited file where "everywhere" and a scoped mode are
    /// both on: "everywhere" wins.
    pub fn normalize(&mut self) {
        if self.highlight_everywhere {
            self.highlight_in_backticks = false;
            self.highlight_in_codeblocks = false;
        }
    }

    pub fn set_highlight_everywhere(&mut self, enabled: bool) {
        self.highlight_everywhere = enabled;
        if enabled {
            self.highlight_in_backticks = false;
            self.highlight_in_codeblocks = false;
        }
    }

    pub fn set_highlight_in_backticks(&mut self, enabled: bool) {
        self.highlight_in_backticks = enabled;
        if enabled {
            self.highlight_everywhere = false;
        }
    }

    pub fn set_highlight_in_codeblocks(&mut self, enabled: bool) {
        self.highlight_in_codeblocks = enabled;
        if enabled {
            self.highlight_everywhere = false;
        }
    }

    /// Whether `path` is on the exclusion list
    ///
    /// Entries match the whole path or, with `/` separators, a trailing
    /// component sequence (so `notes/palette.md` excludes `vault/notes/palette.md`).
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        self.excluded_files.iter().any(|entry| {
            let entry = entry.trim().replace('\\', "/");
            !entry.is_empty()
                && (path == entry || path.ends_with(&format!("/{}", entry.trim_start_matches('/'))))
        })
    }
}
