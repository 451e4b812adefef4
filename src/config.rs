//! Game configuration, loaded from TOML. Every section falls back to its
//! defaults, so a config file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub weapons: WeaponConfig,
    pub enemy: EnemyConfig,
    pub formation: FormationConfig,
    pub power_up: PowerUpConfig,
    pub round: RoundConfig,
    pub assets: AssetConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub ticks_per_second: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Cells moved per tick while a direction is held.
    pub speed: f32,
    pub health: u32,
    pub width: f32,
    pub height: f32,
    /// Gap kept between the ship and the bottom edge.
    pub bottom_margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Horizontal distance of the second double-shot bullet (to the left).
    pub double_shot_offset: f32,
    pub bomb_speed: f32,
    pub bomb_size: f32,
    pub explosion_radius: f32,
    pub splash_damage: i32,
    pub enemy_bullet_speed_min: f32,
    pub enemy_bullet_speed_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Free-fall speed of the first round; seeds the round speed scalar.
    pub base_speed: f32,
    /// Upper bound of the per-enemy random speed bonus.
    pub speed_jitter: f32,
    pub fire_probability: f64,
    /// Ticks between fire checks, drawn uniformly from this range.
    pub fire_interval_min: u64,
    pub fire_interval_max: u64,
    /// Free-roaming enemies alive at the start of every round.
    pub free_count: u32,
    /// Probability weights for weak / mid / strong free-roaming enemies.
    pub kind_weights: [u32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub cols: u32,
    pub rows: u32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Lateral speed in the first round, cells per tick.
    pub speed: f32,
    /// Distance from each screen edge at which the formation turns.
    pub margin: f32,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub drop_chance: f64,
    pub fall_speed: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub kill_threshold: u32,
    pub speed_step: f32,
    /// Length of the "Round N" banner in ticks.
    pub announce_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub track: PathBuf,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 0.75,
            health: 3,
            width: 5.0,
            height: 3.0,
            bottom_margin: 1.0,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            bullet_speed: 1.0,
            bullet_width: 1.0,
            bullet_height: 1.0,
            double_shot_offset: 2.0,
            bomb_speed: 0.6,
            bomb_size: 2.0,
            explosion_radius: 8.0,
            splash_damage: 2,
            enemy_bullet_speed_min: 0.25,
            enemy_bullet_speed_max: 0.5,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.08,
            speed_jitter: 0.06,
            fire_probability: 0.25,
            fire_interval_min: 60,
            fire_interval_max: 180,
            free_count: 6,
            kind_weights: [6, 3, 1],
        }
    }
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            cols: 8,
            rows: 3,
            spacing_x: 7.0,
            spacing_y: 3.0,
            speed: 0.25,
            margin: 2.0,
            top: 3.0,
        }
    }
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            drop_chance: 0.12,
            fall_speed: 0.2,
            size: 1.0,
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            kill_threshold: 50,
            speed_step: 0.04,
            announce_ticks: 120,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            track: PathBuf::from("assets/background_music.mp3"),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.ticks_per_second == 0 {
            return Err(ConfigError::Invalid("timing.ticks_per_second must be > 0".into()));
        }
        if self.player.health == 0 {
            return Err(ConfigError::Invalid("player.health must be > 0".into()));
        }
        if self.enemy.base_speed <= 0.0 {
            return Err(ConfigError::Invalid("enemy.base_speed must be > 0".into()));
        }
        if self.enemy.speed_jitter < 0.0 {
            return Err(ConfigError::Invalid("enemy.speed_jitter must be >= 0".into()));
        }
        if self.enemy.fire_interval_min == 0
            || self.enemy.fire_interval_min > self.enemy.fire_interval_max
        {
            return Err(ConfigError::Invalid(
                "enemy.fire_interval_min must be in 1..=fire_interval_max".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.enemy.fire_probability) {
            return Err(ConfigError::Invalid("enemy.fire_probability must be in [0, 1]".into()));
        }
        if self.enemy.kind_weights.iter().all(|&w| w == 0) {
            return Err(ConfigError::Invalid("enemy.kind_weights must not all be zero".into()));
        }
        if self.weapons.enemy_bullet_speed_min <= 0.0
            || self.weapons.enemy_bullet_speed_min > self.weapons.enemy_bullet_speed_max
        {
            return Err(ConfigError::Invalid(
                "weapons.enemy_bullet_speed_min must be in (0, enemy_bullet_speed_max]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.power_up.drop_chance) {
            return Err(ConfigError::Invalid("power_up.drop_chance must be in [0, 1]".into()));
        }
        if self.weapons.bullet_speed <= 0.0 {
            return Err(ConfigError::Invalid("weapons.bullet_speed must be > 0".into()));
        }
        if self.weapons.bomb_speed <= 0.0 {
            return Err(ConfigError::Invalid("weapons.bomb_speed must be > 0".into()));
        }
        if self.weapons.explosion_radius < 0.0 {
            return Err(ConfigError::Invalid("weapons.explosion_radius must be >= 0".into()));
        }
        if self.weapons.splash_damage <= 0 {
            return Err(ConfigError::Invalid("weapons.splash_damage must be > 0".into()));
        }
        if self.round.kill_threshold == 0 {
            return Err(ConfigError::Invalid("round.kill_threshold must be > 0".into()));
        }
        if self.round.speed_step <= 0.0 {
            return Err(ConfigError::Invalid("round.speed_step must be > 0".into()));
        }
        Ok(())
    }
}
