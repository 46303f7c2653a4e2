//! Editor preferences and their save/load operations

use crate::selection::SelectionMode;
use crate::state::EditorTool;
use directories::ProjectDirs;
use layered_map_core::MapConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PREFERENCES_FILE: &str = "preferences.json";
/// Number of recently opened maps remembered
pub const MAX_RECENT_MAPS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct EditorPreferences {
    /// Size limits for new and loaded maps
    pub map_config: MapConfig,
    pub default_selection_mode: SelectionMode,
    pub default_tool: EditorTool,
    /// Most recent first
    pub recent_maps: Vec<PathBuf>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            map_config: MapConfig::default(),
            default_selection_mode: SelectionMode::Normal,
            default_tool: EditorTool::Select,
            recent_maps: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "layered_map_editor", "layered_map_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, returning defaults if they
    /// are missing or unreadable
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut prefs: Self = serde_json::from_str(&content)?;
        if let Err(e) = prefs.map_config.validate() {
            warn!("Invalid map config in preferences: {}. Using defaults.", e);
            prefs.map_config = MapConfig::default();
        }
        prefs.recent_maps.truncate(MAX_RECENT_MAPS);
        Ok(prefs)
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<PathBuf, PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save preferences to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Move `path` to the front of the recent maps list
    pub fn add_recent_map(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.recent_maps.retain(|p| p != &path);
        self.recent_maps.insert(0, path);
        self.recent_maps.truncate(MAX_RECENT_MAPS);
    }

    pub fn clear_recent_maps(&mut self) {
        self.recent_maps.clear();
    }
}
