use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::action::StartMode;

/// Configuration for the game
///
/// Every field has a default, so a TOML file only needs the keys it wants
/// to change:
///
/// ```toml
/// grid_size = 5
/// four_probability = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Board layout used when a game starts
    pub start_mode: StartMode,
    /// Chance that a spawned tile is a 4 instead of a 2
    pub four_probability: f64,
    /// Largest exponent drawn when scrambling a board (value `2^k`)
    pub scramble_max_exponent: u32,
    /// Force the two starting tiles of a fresh board onto different cells
    pub distinct_start_tiles: bool,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            start_mode: StartMode::Fresh,
            four_probability: 0.25,
            scramble_max_exponent: 11,
            distinct_start_tiles: false,
            seed: None,
        }
    }
}

impl GameConfig {
    pub const MIN_GRID_SIZE: usize = 2;
    pub const MAX_GRID_SIZE: usize = 8;

    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(3)
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_GRID_SIZE..=Self::MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "grid_size must be in [{}, {}], got {}",
                Self::MIN_GRID_SIZE,
                Self::MAX_GRID_SIZE,
                self.grid_size
            ));
        }

        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(format!(
                "four_probability must be in [0, 1], got {}",
                self.four_probability
            ));
        }

        if !(1..=30).contains(&self.scramble_max_exponent) {
            return Err(format!(
                "scramble_max_exponent must be in [1, 30], got {}",
                self.scramble_max_exponent
            ));
        }

        Ok(())
    }
}
