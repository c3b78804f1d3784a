use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::state::Grid;

/// Configuration for the game
///
/// Reward values are not configurable; see [`REWARD_FOOD`](super::REWARD_FOOD)
/// and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playing field
    pub width: i32,
    /// Height of the playing field
    pub height: i32,
    /// Side length of one cell; every position is a multiple of it
    pub block_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Episode ends once the frame count exceeds this many frames per segment
    pub stall_factor: u32,
    /// Frames per second for real-time drivers
    pub speed: u32,
    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            initial_snake_length: 3,
            stall_factor: 100,
            speed: 20,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom field size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small 10x10-cell field for testing
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height, self.block_size)
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        Ok(config)
    }

    /// Check that the engine can run with this configuration
    ///
    /// Beyond positive sizes this requires the initial snake to fit inside the
    /// field and at least one free cell to remain for food.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.block_size <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }

        if self.width < self.block_size || self.height < self.block_size {
            return Err(GameError::InvalidConfig(format!(
                "field {}x{} is smaller than one block of {}",
                self.width, self.height, self.block_size
            )));
        }

        if self.initial_snake_length == 0 {
            return Err(GameError::InvalidConfig(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        if self.stall_factor == 0 {
            return Err(GameError::InvalidConfig(
                "stall_factor must be at least 1".to_string(),
            ));
        }

        if self.speed == 0 {
            return Err(GameError::InvalidConfig(
                "speed must be at least 1 frame per second".to_string(),
            ));
        }

        let grid = self.grid();
        if grid.cell_count() <= self.initial_snake_length {
            return Err(GameError::InvalidConfig(format!(
                "{} cells leave no room for food next to a snake of length {}",
                grid.cell_count(),
                self.initial_snake_length
            )));
        }

        let does_not_fit = || {
            GameError::InvalidConfig(format!(
                "a snake of length {} does not fit left of the center column",
                self.initial_snake_length
            ))
        };
        let trailing = i32::try_from(self.initial_snake_length - 1)
            .ok()
            .and_then(|segments| segments.checked_mul(self.block_size))
            .ok_or_else(does_not_fit)?;
        if grid.center().x < trailing {
            return Err(does_not_fit());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.block_size, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.stall_factor, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200).with_seed(7);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 200);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grid().columns(), 15);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let mut config = GameConfig::default();
        config.block_size = 0;
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));

        let config = GameConfig::new(10, 480);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_snake_that_does_not_fit() {
        // Center column is x = 20, the tail would sit at x = -20
        let config = GameConfig::new(60, 480);
        assert!(config.validate().is_err());

        let config = GameConfig::new(80, 480);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_oversized_snake_without_overflow() {
        let config = GameConfig {
            initial_snake_length: 200_000_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));

        // Enough cells for the snake, but its trailing span overflows i32
        let config = GameConfig {
            width: i32::MAX,
            height: i32::MAX,
            block_size: 1,
            initial_snake_length: usize::try_from(i32::MAX).unwrap() + 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_field_without_room_for_food() {
        // 3x1 cells: the snake fills the whole row
        let config = GameConfig::new(60, 20);
        assert!(config.validate().is_err());

        let mut config = GameConfig::new(80, 20);
        assert!(config.validate().is_ok());
        config.initial_snake_length = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_stall_factor_and_speed() {
        let mut config = GameConfig::default();
        config.stall_factor = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.speed = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let path = std::env::temp_dir().join(format!(
            "block_snake_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "width": 400, "seed": 42 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.width, 400);
        assert_eq!(config.height, 480);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("block_snake_does_not_exist.json");
        assert!(GameConfig::load(&path).is_err());
    }
}
