//! Simulation constants and tuning defaults.
//!
//! These are the default values behind [`crate::rules::Rules`]; systems read
//! the rules struct they are handed, never these constants directly.

/// Nominal frame rate (Hz). One simulated step per frame at normal speed.
pub const TICK_RATE: u32 = 60;

/// Default board width in pixels.
pub const BOARD_WIDTH: f64 = 1000.0;

/// Default board height in pixels.
pub const BOARD_HEIGHT: f64 = 700.0;

// --- Spawn & wave system ---

/// Ticks between enemy spawns while a wave is active.
pub const SPAWN_DELAY_TICKS: u32 = 40;

/// Money awarded on wave completion.
pub const WAVE_BONUS_MONEY: i64 = 20;

// --- Placement & collision ---

/// Minimum distance from the left/right board edge.
pub const PLACEMENT_MARGIN_X: f64 = 20.0;

/// Minimum distance from the top edge (HUD).
pub const PLACEMENT_MARGIN_TOP: f64 = 80.0;

/// Minimum distance from the bottom edge (tower tray).
pub const PLACEMENT_MARGIN_BOTTOM: f64 = 100.0;

/// Minimum distance between two towers.
pub const TOWER_COLLISION_RADIUS: f64 = 40.0;

/// Minimum distance between a trap and any tower.
pub const TRAP_COLLISION_RADIUS: f64 = 25.0;

/// Minimum distance from any path segment for a regular tower.
pub const TOWER_PATH_MIN_DISTANCE: f64 = 40.0;

/// Maximum distance from a path segment for a point to count as on the path.
pub const TRAP_PATH_MAX_DISTANCE: f64 = 35.0;

/// Maximum number of live hero towers.
pub const HERO_LIMIT: usize = 1;

// --- Towers & economy ---

/// Upgrade cost = base cost × this × level.
pub const UPGRADE_COST_MULTIPLIER: f64 = 0.75;

/// Sell value = total investment × this.
pub const SELL_VALUE_MULTIPLIER: f64 = 0.7;

/// Damage multiplier per upgrade.
pub const UPGRADE_DAMAGE_MULTIPLIER: f64 = 1.4;

/// Range multiplier per upgrade.
pub const UPGRADE_RANGE_MULTIPLIER: f64 = 1.1;

/// Sentinel upgrade cost for towers that can no longer be upgraded.
pub const UNAFFORDABLE_COST: i64 = 999_999;

/// Number of towers consumed by a paragon merge.
pub const PARAGON_MERGE_COUNT: usize = 3;

/// Minimum level of each source tower for a paragon merge.
pub const PARAGON_MERGE_LEVEL: u32 = 10;

/// Minimum wave number before paragon merges are allowed.
pub const PARAGON_MIN_WAVE: u32 = 10;

pub const PARAGON_DAMAGE_MULTIPLIER: f64 = 5.0;
pub const PARAGON_RANGE_MULTIPLIER: f64 = 1.5;
pub const PARAGON_COOLDOWN_MULTIPLIER: f64 = 0.5;

/// Income paid by an income tower each time its cooldown divides the tick.
pub const BANK_INCOME_AMOUNT: i64 = 20;

/// Projectile speed (px/tick) for tower types that do not declare one.
pub const DEFAULT_PROJECTILE_SPEED: f64 = 8.0;

// --- Barracks & soldiers ---

/// Soldiers alive per barracks.
pub const BARRACKS_SOLDIER_COUNT: usize = 3;
pub const SOLDIER_BASE_HP: f64 = 60.0;
pub const SOLDIER_HP_PER_LEVEL: f64 = 20.0;
pub const SOLDIER_BASE_DAMAGE: f64 = 2.0;
pub const SOLDIER_DAMAGE_PER_LEVEL: f64 = 1.0;
/// Melee reach of a soldier (px).
pub const SOLDIER_ATTACK_RANGE: f64 = 40.0;
/// Ticks between soldier melee exchanges.
pub const SOLDIER_COMBAT_RATE: u32 = 30;
/// Damage a soldier takes from its opponent per exchange.
pub const SOLDIER_DAMAGE_TAKEN: f64 = 2.0;
pub const SOLDIER_MOVE_SPEED: f64 = 1.5;
pub const SOLDIER_RETURN_SPEED: f64 = 1.0;
/// Ticks between soldier regeneration pulses.
pub const SOLDIER_REGEN_RATE: u32 = 60;
pub const SOLDIER_REGEN_AMOUNT: f64 = 5.0;

// --- Status effects ---

pub const FREEZE_DURATION: u32 = 60;
/// Speed factor while frozen.
pub const FREEZE_SLOW_MULTIPLIER: f64 = 0.5;
pub const BURN_DURATION: u32 = 120;
pub const BURN_DAMAGE: f64 = 5.0;
/// Ticks between burn damage pulses.
pub const BURN_TICK_RATE: u32 = 15;
pub const POISON_DURATION: u32 = 180;
pub const POISON_DAMAGE: f64 = 3.0;
pub const POISON_TICK_RATE: u32 = 20;
/// Voided enemies do not move at all for this many ticks.
pub const VOID_DURATION: u32 = 60;
pub const SPEED_BUFF_DURATION: u32 = 120;
pub const SPEED_BUFF_MULTIPLIER: f64 = 1.5;

// --- Enemy abilities ---

pub const TROLL_REGEN_RATE: u32 = 60;
/// Fraction of max health restored per regeneration pulse.
pub const TROLL_REGEN_PERCENT: f64 = 0.02;
pub const HEALER_COOLDOWN: u32 = 60;
pub const HEALER_HEAL_AMOUNT: f64 = 50.0;
pub const HEALER_RANGE: f64 = 150.0;
pub const WIZARD_COOLDOWN: u32 = 180;
/// Maximum allies hasted per wizard pulse.
pub const WIZARD_BUFF_COUNT: usize = 3;
pub const WIZARD_RANGE: f64 = 150.0;

// --- Resistances ---

/// Armored targets take this fraction of non-fire, non-explosive damage.
pub const ARMOR_DAMAGE_REDUCTION: f64 = 0.2;

/// Chip damage dealt to reinforced targets by a resisted effect.
pub const REINFORCED_CHIP_DAMAGE: f64 = 1.0;

// --- Map-specific ---

pub const STUMP_RANGE_MULTIPLIER: f64 = 2.0;
pub const STUMP_RADIUS: f64 = 35.0;
/// Towers below this level can crack through a glass floor.
pub const GLASS_FLOOR_MIN_LEVEL: u32 = 5;
/// Glass breaking starts once this wave is completed.
pub const GLASS_FLOOR_MIN_WAVE: u32 = 10;
pub const GLASS_FLOOR_CRACK_CHANCE: f64 = 0.5;

// --- Lives ---

pub const STARTING_LIVES: i64 = 20;
/// Lives lost to a boss without a declared lives-damage override.
pub const BOSS_LIVES_DAMAGE: i64 = 20;
pub const BASIC_LIVES_DAMAGE: i64 = 1;

// --- Meta progression ---

pub const META_GOLD_BASE: i64 = 50;
pub const META_GOLD_PER_WAVE: i64 = 10;
