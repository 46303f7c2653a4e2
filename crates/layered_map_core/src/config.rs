//! Map size limits and context capacity

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard upper bound on contexts: one collision bit per context in a `u32`
pub const MAX_CONTEXTS: usize = 32;
/// Collision quadrants per tile (NW, NE, SW, SE)
pub const QUADRANTS_PER_TILE: usize = 4;

/// Bounds the map model enforces on structural operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub minimum_map_length: u32,
    pub maximum_map_length: u32,
    pub minimum_map_height: u32,
    pub maximum_map_height: u32,
    /// Clamped to `MAX_CONTEXTS`
    pub max_contexts: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            minimum_map_length: 32,
            maximum_map_length: 1000,
            minimum_map_height: 24,
            maximum_map_height: 1000,
            max_contexts: MAX_CONTEXTS,
        }
    }
}

impl MapConfig {
    /// Load a config from a JSON file. Missing fields use their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: MapConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_map_length == 0 || self.minimum_map_height == 0 {
            return Err(ConfigError::Invalid(
                "minimum map dimensions must be at least 1".to_string(),
            ));
        }
        if self.minimum_map_length > self.maximum_map_length {
            return Err(ConfigError::Invalid(format!(
                "minimum map length {} exceeds maximum {}",
                self.minimum_map_length, self.maximum_map_length
            )));
        }
        if self.minimum_map_height > self.maximum_map_height {
            return Err(ConfigError::Invalid(format!(
                "minimum map height {} exceeds maximum {}",
                self.minimum_map_height, self.maximum_map_height
            )));
        }
        if self.max_contexts == 0 {
            return Err(ConfigError::Invalid(
                "at least one context must be allowed".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective context capacity
    pub fn context_limit(&self) -> usize {
        self.max_contexts.min(MAX_CONTEXTS)
    }

    pub fn is_valid_length(&self, length: u32) -> bool {
        (self.minimum_map_length..=self.maximum_map_length).contains(&length)
    }

    pub fn is_valid_height(&self, height: u32) -> bool {
        (self.minimum_map_height..=self.maximum_map_height).contains(&height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_valid_length(32));
        assert!(!config.is_valid_length(31));
        assert!(config.is_valid_height(1000));
        assert!(!config.is_valid_height(1001));
        assert_eq!(config.context_limit(), 32);
    }

    #[test]
    fn test_context_limit_is_clamped() {
        let config = MapConfig {
            max_contexts: 100,
            ..MapConfig::default()
        };
        assert_eq!(config.context_limit(), MAX_CONTEXTS);
    }

    #[test]
    fn test_validation() {
        let config = MapConfig {
            minimum_map_length: 50,
            maximum_map_length: 40,
            ..MapConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_config.json");
        std::fs::write(&path, r#"{ "minimum_map_length": 8, "max_contexts": 4 }"#).unwrap();

        let config = MapConfig::load(&path).unwrap();
        assert_eq!(config.minimum_map_length, 8);
        assert_eq!(config.minimum_map_height, 24);
        assert_eq!(config.context_limit(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_config.json");
        let config = MapConfig {
            maximum_map_height: 200,
            ..MapConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(MapConfig::load(&path).unwrap(), config);
    }
}
