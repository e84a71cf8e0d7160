//! Simulation configuration.
//!
//! Every tunable defaults to the values in [`crate::constants`], so an empty
//! JSON object is a valid configuration. Configurations are validated before a
//! [`GameLoop`](crate::game_loop::GameLoop) accepts them.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    BOSS_HEALTH, BOSS_SPEED, BOSS_STRENGTH, BOSS_WAVE_INTERVAL, CLUSTER_COUNT, COLLECTABLE_COUNT,
    INITIAL_HOSTILES, LOOT_CHANCE, OBSTACLE_COUNT, SPAWN_MARGIN, WORLD_SIZE,
};

/// One row of the enemy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    /// Display name, also carried by spawned hostiles.
    pub name: String,
    /// Starting health.
    pub health: u32,
    /// Pursuit speed; types without one use
    /// [`DEFAULT_HOSTILE_SPEED`](crate::DEFAULT_HOSTILE_SPEED).
    #[serde(default)]
    pub speed: Option<f32>,
    /// Damage the type would deal.
    pub strength: u32,
}

impl EnemyType {
    fn new(name: &str, health: u32, speed: f32, strength: u32) -> Self {
        Self {
            name: name.to_owned(),
            health,
            speed: Some(speed),
            strength,
        }
    }
}

/// One row of the weighted obstacle table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleType {
    /// Display name.
    pub name: String,
    /// Relative draw weight.
    pub weight: u32,
}

impl ObstacleType {
    fn new(name: &str, weight: u32) -> Self {
        Self {
            name: name.to_owned(),
            weight,
        }
    }
}

/// Attributes shared by every boss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossStats {
    /// Hits needed to fell a boss.
    pub health: u32,
    /// Pursuit speed.
    pub speed: f32,
    /// Damage a boss would deal.
    pub strength: u32,
}

impl Default for BossStats {
    fn default() -> Self {
        Self {
            health: BOSS_HEALTH,
            speed: BOSS_SPEED,
            strength: BOSS_STRENGTH,
        }
    }
}

/// Tunables for world generation and combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square world.
    pub world_size: f32,
    /// Size of the first wave.
    pub initial_hostiles: u32,
    /// Scattered obstacles.
    pub obstacle_count: u32,
    /// Obstacle clusters, each of several pieces.
    pub cluster_count: u32,
    /// Chests placed at generation.
    pub collectable_count: u32,
    /// Enemy table drawn from uniformly.
    pub enemies: Vec<EnemyType>,
    /// Weighted obstacle table; the first row is used for clusters.
    pub obstacles: Vec<ObstacleType>,
    /// Boss attributes.
    pub boss: BossStats,
    /// Every this many waves, one boss joins the wave.
    pub boss_wave_interval: u32,
    /// Ticks between clearing a wave and the next one arriving.
    pub wave_delay_ticks: u64,
    /// Chance that a slain hostile leaves loot.
    pub loot_chance: f64,
    /// Whether touching an enemy hurts the player. Off by default: contact
    /// only knocks the player back and damage arrives through
    /// [`GameLoop::damage_player`](crate::game_loop::GameLoop::damage_player).
    pub contact_damage: bool,
    /// Names of the merchants placed at world generation.
    pub merchants: Vec<String>,
    /// Seed for the world RNG; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            initial_hostiles: INITIAL_HOSTILES,
            obstacle_count: OBSTACLE_COUNT,
            cluster_count: CLUSTER_COUNT,
            collectable_count: COLLECTABLE_COUNT,
            enemies: vec![
                EnemyType::new("Skeleton", 100, 70.0, 20),
                EnemyType::new("Slime", 300, 40.0, 50),
                EnemyType::new("Bat", 20, 200.0, 10),
                EnemyType::new("Ghost", 200, 60.0, 30),
                EnemyType::new("Spider", 50, 120.0, 12),
            ],
            obstacles: vec![
                ObstacleType::new("tree", 4),
                ObstacleType::new("shrub", 2),
                ObstacleType::new("pine", 2),
                ObstacleType::new("column", 1),
                ObstacleType::new("rock", 2),
                ObstacleType::new("stump", 1),
                ObstacleType::new("flowers", 1),
            ],
            boss: BossStats::default(),
            boss_wave_interval: BOSS_WAVE_INTERVAL,
            wave_delay_ticks: 120,
            loot_chance: LOOT_CHANCE,
            contact_damage: false,
            merchants: vec!["Merchant".to_owned()],
            seed: None,
        }
    }
}

/// Reasons a configuration cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The JSON did not match the schema.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    /// World too small to keep the spawn margin, or not finite.
    #[error("world size must be finite and larger than twice the spawn margin, got {0}")]
    WorldSize(f32),
    /// Nothing to spawn.
    #[error("enemy table is empty")]
    NoEnemies,
    /// Named enemy type cannot take hits or cannot move.
    #[error("enemy type `{0}` has zero health or a non-positive speed")]
    InvalidEnemy(String),
    /// No obstacle can be drawn.
    #[error("obstacle table is empty or its weights sum to zero")]
    NoObstacleWeight,
    /// Probability outside `[0, 1]`.
    #[error("loot chance must lie within [0, 1], got {0}")]
    LootChance(f64),
    /// Boss cannot take hits or cannot move.
    #[error("boss stats need positive health and speed")]
    InvalidBoss,
}

impl SimConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error described by [`SimConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use skirmish::config::SimConfig;
    /// let config = SimConfig::from_json_str(r#"{ "initial_hostiles": 2 }"#).unwrap();
    /// assert_eq!(config.initial_hostiles, 2);
    /// assert_eq!(config.obstacle_count, 300);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration from disk.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`SimConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks that generation and combat can run with these values.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.world_size.is_finite() || self.world_size <= 2.0 * SPAWN_MARGIN {
            return Err(ConfigError::WorldSize(self.world_size));
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::NoEnemies);
        }
        if let Some(bad) = self
            .enemies
            .iter()
            .find(|e| e.health == 0 || e.speed.is_some_and(|s| !(s > 0.0)))
        {
            return Err(ConfigError::InvalidEnemy(bad.name.clone()));
        }
        if self.total_obstacle_weight() == 0 {
            return Err(ConfigError::NoObstacleWeight);
        }
        if !(0.0..=1.0).contains(&self.loot_chance) {
            return Err(ConfigError::LootChance(self.loot_chance));
        }
        if self.boss.health == 0 || !(self.boss.speed > 0.0) {
            return Err(ConfigError::InvalidBoss);
        }
        Ok(())
    }

    /// Sum of the obstacle table's weights.
    #[must_use]
    pub fn total_obstacle_weight(&self) -> u32 {
        self.obstacles.iter().map(|o| o.weight).sum()
    }
}
