//! Tuning rules threaded through factories, resolvers and systems.
//!
//! Every field defaults to the matching value in [`crate::constants`]; a
//! balance file may override any subset of them.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// All tunable numbers of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub spawn_delay_ticks: u32,
    pub wave_bonus_money: i64,

    pub margin_x: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub tower_collision_radius: f64,
    pub trap_collision_radius: f64,
    pub tower_path_min_distance: f64,
    pub trap_path_max_distance: f64,
    pub hero_limit: usize,

    pub upgrade_cost_multiplier: f64,
    pub sell_value_multiplier: f64,
    pub upgrade_damage_multiplier: f64,
    pub upgrade_range_multiplier: f64,
    pub paragon_merge_level: u32,
    pub paragon_min_wave: u32,
    pub paragon_damage_multiplier: f64,
    pub paragon_range_multiplier: f64,
    pub paragon_cooldown_multiplier: f64,
    pub bank_income: i64,
    pub default_projectile_speed: f64,

    pub barracks_soldier_count: usize,
    pub soldier_base_hp: f64,
    pub soldier_hp_per_level: f64,
    pub soldier_base_damage: f64,
    pub soldier_damage_per_level: f64,
    pub soldier_attack_range: f64,
    pub soldier_combat_rate: u32,
    pub soldier_damage_taken: f64,
    pub soldier_move_speed: f64,
    pub soldier_return_speed: f64,
    pub soldier_regen_rate: u32,
    pub soldier_regen_amount: f64,

    pub freeze_duration: u32,
    pub freeze_slow_multiplier: f64,
    pub burn_duration: u32,
    pub burn_damage: f64,
    pub burn_tick_rate: u32,
    pub poison_duration: u32,
    pub poison_damage: f64,
    pub poison_tick_rate: u32,
    pub void_duration: u32,
    pub speed_buff_duration: u32,
    pub speed_buff_multiplier: f64,

    pub troll_regen_rate: u32,
    pub troll_regen_percent: f64,
    pub healer_cooldown: u32,
    pub healer_heal_amount: f64,
    pub healer_range: f64,
    pub wizard_cooldown: u32,
    pub wizard_buff_count: usize,
    pub wizard_range: f64,

    pub armor_damage_reduction: f64,
    pub reinforced_chip_damage: f64,

    pub stump_range_multiplier: f64,
    pub stump_radius: f64,
    pub glass_floor_min_level: u32,
    pub glass_floor_min_wave: u32,
    pub glass_floor_crack_chance: f64,

    pub starting_lives: i64,
    pub boss_lives_damage: i64,
    pub basic_lives_damage: i64,

    pub meta_gold_base: i64,
    pub meta_gold_per_wave: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            spawn_delay_ticks: SPAWN_DELAY_TICKS,
            wave_bonus_money: WAVE_BONUS_MONEY,

            margin_x: PLACEMENT_MARGIN_X,
            margin_top: PLACEMENT_MARGIN_TOP,
            margin_bottom: PLACEMENT_MARGIN_BOTTOM,
            tower_collision_radius: TOWER_COLLISION_RADIUS,
            trap_collision_radius: TRAP_COLLISION_RADIUS,
            tower_path_min_distance: TOWER_PATH_MIN_DISTANCE,
            trap_path_max_distance: TRAP_PATH_MAX_DISTANCE,
            hero_limit: HERO_LIMIT,

            upgrade_cost_multiplier: UPGRADE_COST_MULTIPLIER,
            sell_value_multiplier: SELL_VALUE_MULTIPLIER,
            upgrade_damage_multiplier: UPGRADE_DAMAGE_MULTIPLIER,
            upgrade_range_multiplier: UPGRADE_RANGE_MULTIPLIER,
            paragon_merge_level: PARAGON_MERGE_LEVEL,
            paragon_min_wave: PARAGON_MIN_WAVE,
            paragon_damage_multiplier: PARAGON_DAMAGE_MULTIPLIER,
            paragon_range_multiplier: PARAGON_RANGE_MULTIPLIER,
            paragon_cooldown_multiplier: PARAGON_COOLDOWN_MULTIPLIER,
            bank_income: BANK_INCOME_AMOUNT,
            default_projectile_speed: DEFAULT_PROJECTILE_SPEED,

            barracks_soldier_count: BARRACKS_SOLDIER_COUNT,
            soldier_base_hp: SOLDIER_BASE_HP,
            soldier_hp_per_level: SOLDIER_HP_PER_LEVEL,
            soldier_base_damage: SOLDIER_BASE_DAMAGE,
            soldier_damage_per_level: SOLDIER_DAMAGE_PER_LEVEL,
            soldier_attack_range: SOLDIER_ATTACK_RANGE,
            soldier_combat_rate: SOLDIER_COMBAT_RATE,
            soldier_damage_taken: SOLDIER_DAMAGE_TAKEN,
            soldier_move_speed: SOLDIER_MOVE_SPEED,
            soldier_return_speed: SOLDIER_RETURN_SPEED,
            soldier_regen_rate: SOLDIER_REGEN_RATE,
            soldier_regen_amount: SOLDIER_REGEN_AMOUNT,

            freeze_duration: FREEZE_DURATION,
            freeze_slow_multiplier: FREEZE_SLOW_MULTIPLIER,
            burn_duration: BURN_DURATION,
            burn_damage: BURN_DAMAGE,
            burn_tick_rate: BURN_TICK_RATE,
            poison_duration: POISON_DURATION,
            poison_damage: POISON_DAMAGE,
            poison_tick_rate: POISON_TICK_RATE,
            void_duration: VOID_DURATION,
            speed_buff_duration: SPEED_BUFF_DURATION,
            speed_buff_multiplier: SPEED_BUFF_MULTIPLIER,

            troll_regen_rate: TROLL_REGEN_RATE,
            troll_regen_percent: TROLL_REGEN_PERCENT,
            healer_cooldown: HEALER_COOLDOWN,
            healer_heal_amount: HEALER_HEAL_AMOUNT,
            healer_range: HEALER_RANGE,
            wizard_cooldown: WIZARD_COOLDOWN,
            wizard_buff_count: WIZARD_BUFF_COUNT,
            wizard_range: WIZARD_RANGE,

            armor_damage_reduction: ARMOR_DAMAGE_REDUCTION,
            reinforced_chip_damage: REINFORCED_CHIP_DAMAGE,

            stump_range_multiplier: STUMP_RANGE_MULTIPLIER,
            stump_radius: STUMP_RADIUS,
            glass_floor_min_level: GLASS_FLOOR_MIN_LEVEL,
            glass_floor_min_wave: GLASS_FLOOR_MIN_WAVE,
            glass_floor_crack_chance: GLASS_FLOOR_CRACK_CHANCE,

            starting_lives: STARTING_LIVES,
            boss_lives_damage: BOSS_LIVES_DAMAGE,
            basic_lives_damage: BASIC_LIVES_DAMAGE,

            meta_gold_base: META_GOLD_BASE,
            meta_gold_per_wave: META_GOLD_PER_WAVE,
        }
    }
}

impl Rules {
    /// Meta-currency earned by a session that ended on `wave_number`.
    pub fn meta_gold_for(&self, wave_number: u32) -> i64 {
        self.meta_gold_base + i64::from(wave_number) * self.meta_gold_per_wave
    }
}
