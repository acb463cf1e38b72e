use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or loading a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field size must be positive on both axes, got {width}x{height}")]
    InvalidFieldSize { width: usize, height: usize },
    #[error("field size {width}x{height} exceeds the supported maximum")]
    FieldTooLarge { width: usize, height: usize },
    #[error("window size must be a positive odd number, got {0}")]
    InvalidWindowSize(usize),
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Construction-time configuration of the simulation
///
/// # Example
///
/// ```rust
/// use snake_env::game::GameConfig;
///
/// let config = GameConfig {
///     window_size: 5,
///     seed: Some(7),
///     ..GameConfig::new(12, 8)
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the field
    pub field_width: usize,
    /// Height of the field
    pub field_height: usize,
    /// Side of the square occupancy window around the head, odd
    pub window_size: usize,
    /// Redraw both field dimensions from `[10, 30]` on every reset
    pub random_field_size: bool,
    /// Seed for the engine's random source, drawn from entropy if absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 20,
            field_height: 20,
            window_size: 7,
            random_field_size: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom field size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            field_width: width,
            field_height: height,
            ..Default::default()
        }
    }

    /// Create a small field for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large field
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Check field and window dimensions
    ///
    /// ```rust
    /// use snake_env::game::GameConfig;
    ///
    /// assert!(GameConfig::new(0, 10).validate().is_err());
    /// assert!(GameConfig::default().with_window_size(4).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width == 0 || self.field_height == 0 {
            return Err(ConfigError::InvalidFieldSize {
                width: self.field_width,
                height: self.field_height,
            });
        }

        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }

        // Both padded sides must be valid i32 coordinates and their area and
        // the window area must fit in usize
        let padded = |side: usize| {
            side.checked_add(self.window_size - 1)
                .filter(|&padded| i32::try_from(padded).is_ok())
        };
        let fits = match (padded(self.field_width), padded(self.field_height)) {
            (Some(width), Some(height)) => {
                width.checked_mul(height).is_some()
                    && self.window_size.checked_mul(self.window_size).is_some()
            }
            _ => false,
        };
        if !fits {
            return Err(ConfigError::FieldTooLarge {
                width: self.field_width,
                height: self.field_height,
            });
        }

        Ok(())
    }

    /// Load and validate a JSON config file; missing keys take defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.field_width, 20);
        assert_eq!(config.field_height, 20);
        assert_eq!(config.window_size, 7);
        assert!(!config.random_field_size);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12).with_seed(3).with_window_size(3);
        assert_eq!(config.field_width, 15);
        assert_eq!(config.field_height, 12);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.window_size, 3);
    }

    #[test]
    fn test_zero_field_rejected() {
        assert!(matches!(
            GameConfig::new(0, 5).validate(),
            Err(ConfigError::InvalidFieldSize { width: 0, height: 5 })
        ));
        assert!(GameConfig::new(5, 0).validate().is_err());
    }

    #[test]
    fn test_window_size_must_be_odd_and_positive() {
        for bad in [0, 2, 8] {
            assert!(matches!(
                GameConfig::default().with_window_size(bad).validate(),
                Err(ConfigError::InvalidWindowSize(w)) if w == bad
            ));
        }
        for good in [1, 3, 7, 11] {
            assert!(GameConfig::default().with_window_size(good).validate().is_ok());
        }
    }

    #[test]
    fn test_padded_field_must_fit() {
        let huge = GameConfig::new(50_000, 50_000).with_seed(1);
        assert!(huge.validate().is_ok());

        let max = i32::MAX as usize;
        assert!(GameConfig::new(max, 10).with_window_size(1).validate().is_ok());
        assert!(matches!(
            GameConfig::new(max, 10).validate(),
            Err(ConfigError::FieldTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new(10, max - 1).with_window_size(3).validate(),
            Err(ConfigError::FieldTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new(10, 10).with_window_size(usize::MAX).validate(),
            Err(ConfigError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "field_width": 12, "window_size": 5, "seed": 9 }"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.field_width, 12);
        assert_eq!(config.field_height, 20);
        assert_eq!(config.window_size, 5);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            GameConfig::from_json_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let garbage = temp_dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            GameConfig::from_json_file(&garbage),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = temp_dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{ "window_size": 4 }"#).unwrap();
        assert!(matches!(
            GameConfig::from_json_file(&invalid),
            Err(ConfigError::InvalidWindowSize(4))
        ));
    }
}
