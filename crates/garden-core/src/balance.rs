//! Static balance data: tower types, enemy types, wave configuration,
//! difficulties and rule overrides.
//!
//! A default table is embedded from `data/balance.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{EffectKind, EnemyAbility, EnemyCategory, Resistance};
use crate::error::ConfigError;
use crate::rules::Rules;

const BUILTIN_BALANCE: &str = include_str!("../data/balance.json");

/// Static definition of a tower type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerType {
    pub name: String,
    pub cost: i64,
    pub damage: f64,
    pub range: f64,
    /// Ticks between shots (or between payouts for income towers).
    pub cooldown: u32,
    /// Projectile speed in px/tick; falls back to the rules default.
    #[serde(default)]
    pub projectile_speed: Option<f64>,
    #[serde(default)]
    pub effect: EffectKind,
    #[serde(default)]
    pub is_trap: bool,
    #[serde(default)]
    pub is_hero: bool,
    #[serde(default)]
    pub water_only: bool,
    #[serde(default)]
    pub amphibious: bool,
    #[serde(default)]
    pub camo_detection: bool,
    /// Meta-currency price to unlock in the shop (None = always available).
    #[serde(default)]
    pub shop_price: Option<i64>,
    /// Level at which shots start carrying `burn`.
    #[serde(default)]
    pub fire_unlock_level: Option<u32>,
}

/// Static definition of an enemy type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub base_health: f64,
    pub base_speed: f64,
    pub bounty: i64,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_enemy_radius")]
    pub radius: f64,
    #[serde(default)]
    pub category: EnemyCategory,
    /// Explicit resistance; `None` defers to the category.
    #[serde(default)]
    pub resistance: Option<Resistance>,
    #[serde(default)]
    pub ability: Option<EnemyAbility>,
    /// Lives lost when this enemy leaks; `None` defers to the category.
    #[serde(default)]
    pub lives_damage: Option<i64>,
}

fn default_enemy_radius() -> f64 {
    10.0
}

/// Weighted enemy pool for one wave tier. Weights are relative, not cumulative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPool {
    pub enemies: Vec<String>,
    pub weights: Vec<f64>,
}

/// Pools for the five wave tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRules {
    #[serde(rename = "waves1_10")]
    pub waves_1_10: SpawnPool,
    #[serde(rename = "waves11_25")]
    pub waves_11_25: SpawnPool,
    #[serde(rename = "waves26_40")]
    pub waves_26_40: SpawnPool,
    #[serde(rename = "waves41_60")]
    pub waves_41_60: SpawnPool,
    #[serde(rename = "waves61plus")]
    pub waves_61_plus: SpawnPool,
}

/// Boss injected on every 10th / 50th / 100th wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossTable {
    pub wave10: String,
    pub wave50: String,
    pub wave100: String,
}

/// Wave composition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub base_count: u32,
    pub growth_rate: f64,
    /// Health scaling per wave: health = base × (1 + wave × this).
    pub health_multiplier: f64,
    pub sneak_interval: u32,
    pub sneak_enemy: String,
    pub spawn_rules: SpawnRules,
    pub bosses: BossTable,
}

/// Difficulty selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub start_money: i64,
    pub speed_multiplier: f64,
    pub gold_multiplier: f64,
    pub xp_multiplier: f64,
}

/// The full balance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceTable {
    pub towers: BTreeMap<String, TowerType>,
    pub enemies: BTreeMap<String, EnemyType>,
    pub waves: WaveConfig,
    pub difficulties: BTreeMap<String, Difficulty>,
    #[serde(default)]
    pub rules: Rules,
}

/// Shop state for one tower type, owned by the persistence layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerUnlock {
    pub locked: bool,
    /// Remaining stock for consumable towers; `None` = unlimited.
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Per-session tower availability. Types absent from the map are available.
pub type Loadout = BTreeMap<String, TowerUnlock>;

impl SpawnRules {
    /// Pool for a wave number, with its tier label.
    pub fn pool_for_wave(&self, wave_number: u32) -> (&'static str, &SpawnPool) {
        match wave_number {
            0..=10 => ("waves1_10", &self.waves_1_10),
            11..=25 => ("waves11_25", &self.waves_11_25),
            26..=40 => ("waves26_40", &self.waves_26_40),
            41..=60 => ("waves41_60", &self.waves_41_60),
            _ => ("waves61plus", &self.waves_61_plus),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SpawnPool)> {
        [
            ("waves1_10", &self.waves_1_10),
            ("waves11_25", &self.waves_11_25),
            ("waves26_40", &self.waves_26_40),
            ("waves41_60", &self.waves_41_60),
            ("waves61plus", &self.waves_61_plus),
        ]
        .into_iter()
    }
}

impl EnemyType {
    /// Effective resistance: explicit field first, then category.
    pub fn effective_resistance(&self) -> Resistance {
        match (self.resistance, self.category) {
            (Some(resistance), _) => resistance,
            (None, EnemyCategory::Armored) => Resistance::Armor,
            (None, _) => Resistance::None,
        }
    }
}

impl BalanceTable {
    /// The balance table bundled with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_BALANCE)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "balance table",
            source,
        })
    }

    pub fn tower(&self, id: &str) -> Option<&TowerType> {
        self.towers.get(id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyType> {
        self.enemies.get(id)
    }

    /// Look up a difficulty, surfacing the missing key.
    pub fn difficulty(&self, key: &str) -> Result<&Difficulty, ConfigError> {
        self.difficulties
            .get(key)
            .ok_or_else(|| ConfigError::MissingDifficulty(key.to_string()))
    }

    /// Check that every enemy id the wave config references exists and that
    /// every spawn pool is drawable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let waves = &self.waves;
        let bosses = [
            (&waves.bosses.wave10, "bosses.wave10"),
            (&waves.bosses.wave50, "bosses.wave50"),
            (&waves.bosses.wave100, "bosses.wave100"),
            (&waves.sneak_enemy, "sneak_enemy"),
        ];
        for (id, referenced_by) in bosses {
            self.require_enemy(id, referenced_by)?;
        }

        for (label, pool) in waves.spawn_rules.iter() {
            if pool.enemies.is_empty() {
                return Err(ConfigError::InvalidSpawnPool(
                    label.to_string(),
                    "no enemies".into(),
                ));
            }
            if pool.enemies.len() != pool.weights.len() {
                return Err(ConfigError::InvalidSpawnPool(
                    label.to_string(),
                    format!(
                        "{} enemies but {} weights",
                        pool.enemies.len(),
                        pool.weights.len()
                    ),
                ));
            }
            if pool.weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                || pool.weights.iter().sum::<f64>() <= 0.0
            {
                return Err(ConfigError::InvalidSpawnPool(
                    label.to_string(),
                    "weights must be non-negative with a positive sum".into(),
                ));
            }
            for id in &pool.enemies {
                self.require_enemy(id, label)?;
            }
        }
        Ok(())
    }

    fn require_enemy(&self, id: &str, referenced_by: &str) -> Result<(), ConfigError> {
        if self.enemies.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::MissingEnemyType {
                id: id.to_string(),
                referenced_by: referenced_by.to_string(),
            })
        }
    }
}
