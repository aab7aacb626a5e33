use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Gravity timing parameters.
///
/// The drop interval at level `n` is
/// `initial_drop_interval_ms - (n - 1) * speed_step_ms`, saturating at zero.
/// The scheduler re-checks elapsed time `poll_divisor` times per drop
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeedConfig {
    pub initial_drop_interval_ms: u64,
    pub speed_step_ms: u64,
    pub poll_divisor: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial_drop_interval_ms: 500,
            speed_step_ms: 30,
            poll_divisor: 20,
        }
    }
}

impl SpeedConfig {
    #[must_use]
    pub fn initial_drop_interval(&self) -> Duration {
        Duration::from_millis(self.initial_drop_interval_ms)
    }

    #[must_use]
    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }
}

/// Tunable rules of a game session.
///
/// Every field has a default, so a config file only needs to name the values
/// it changes:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "max_level": 15 }"#).unwrap();
/// assert_eq!(config.max_level, 15);
/// assert_eq!(config.lines_per_level, 10);
/// assert_eq!(config.speed.initial_drop_interval_ms, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    /// Highest reachable level; level-ups stop here.
    pub max_level: usize,
    /// Lines needed per level: level `n` ends once `n * lines_per_level`
    /// lines have been cleared in total.
    pub lines_per_level: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: SpeedConfig::default(),
            max_level: 20,
            lines_per_level: 10,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed.initial_drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        if self.speed.poll_divisor == 0 {
            return Err(ConfigError::ZeroPollDivisor);
        }
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        Ok(())
    }
}
