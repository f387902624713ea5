//! Configuration file support for Rigor.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rigor/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub xp: XpRates,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub streak: StreakConfig,

    #[serde(default)]
    pub trend: TrendConfig,
}

/// XP awarded per counted action
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct XpRates {
    #[serde(default = "default_workout_xp")]
    pub workout: u64,

    #[serde(default = "default_habit_completion_xp")]
    pub habit_completion: u64,

    #[serde(default = "default_perfect_day_xp")]
    pub perfect_day: u64,

    #[serde(default = "default_personal_record_xp")]
    pub personal_record: u64,

    #[serde(default = "default_unique_exercise_xp")]
    pub unique_exercise: u64,

    #[serde(default = "default_body_metric_xp")]
    pub body_metric: u64,

    #[serde(default = "default_weight_increase_xp")]
    pub weight_increase: u64,

    /// Tons of lifetime volume per tonnage block
    #[serde(default = "default_tonnage_block_tons")]
    pub tonnage_block_tons: f64,

    /// XP per completed tonnage block
    #[serde(default = "default_tonnage_block_xp")]
    pub tonnage_block: u64,
}

impl Default for XpRates {
    fn default() -> Self {
        Self {
            workout: default_workout_xp(),
            habit_completion: default_habit_completion_xp(),
            perfect_day: default_perfect_day_xp(),
            personal_record: default_personal_record_xp(),
            unique_exercise: default_unique_exercise_xp(),
            body_metric: default_body_metric_xp(),
            weight_increase: default_weight_increase_xp(),
            tonnage_block_tons: default_tonnage_block_tons(),
            tonnage_block: default_tonnage_block_xp(),
        }
    }
}

/// Level curve parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionConfig {
    /// XP needed for level `n` is `level_base * n^2`
    #[serde(default = "default_level_base")]
    pub level_base: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_base: default_level_base(),
        }
    }
}

/// Streak walk parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StreakConfig {
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,

    /// Minutes east of UTC used to decide which day a timestamp belongs to
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            max_lookback_days: default_max_lookback_days(),
            utc_offset_minutes: 0,
        }
    }
}

/// Body-metric trend smoothing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendConfig {
    #[serde(default = "default_trend_window")]
    pub window: u32,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: default_trend_window(),
        }
    }
}

// Default value functions
fn default_workout_xp() -> u64 {
    100
}

fn default_habit_completion_xp() -> u64 {
    20
}

fn default_perfect_day_xp() -> u64 {
    50
}

fn default_personal_record_xp() -> u64 {
    200
}

fn default_unique_exercise_xp() -> u64 {
    75
}

fn default_body_metric_xp() -> u64 {
    30
}

fn default_weight_increase_xp() -> u64 {
    50
}

fn default_tonnage_block_tons() -> f64 {
    5.0
}

fn default_tonnage_block_xp() -> u64 {
    100
}

fn default_level_base() -> u64 {
    100
}

fn default_max_lookback_days() -> u32 {
    400
}

fn default_trend_window() -> u32 {
    7
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| Error::Config("Unable to locate a config directory".into()))?;
        Ok(base.join("rigor").join("config.toml"))
    }

    /// Reject values that would make the level curve or smoothing meaningless
    pub fn validate(&self) -> Result<()> {
        if self.progression.level_base == 0 {
            return Err(Error::Config("progression.level_base must be positive".into()));
        }
        if !(self.xp.tonnage_block_tons.is_finite() && self.xp.tonnage_block_tons > 0.0) {
            return Err(Error::Config("xp.tonnage_block_tons must be positive".into()));
        }
        if self.trend.window == 0 {
            return Err(Error::Config("trend.window must be at least 1".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    ///
    /// Writes to a temp file in the same directory and renames it over the target.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config(format!("Config path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.xp.workout, 100);
        assert_eq!(config.xp.personal_record, 200);
        assert_eq!(config.progression.level_base, 100);
        assert_eq!(config.streak.max_lookback_days, 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[xp]
workout = 150

[streak]
utc_offset_minutes = -300
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.xp.workout, 150);
        assert_eq!(config.xp.habit_completion, 20); // default
        assert_eq!(config.streak.utc_offset_minutes, -300);
        assert_eq!(config.streak.max_lookback_days, 400); // default
    }

    #[test]
    fn test_save_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.trend.window = 14;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.trend.window, 14);
    }

    #[test]
    fn test_invalid_level_base_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[progression]\nlevel_base = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
