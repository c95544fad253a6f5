//! Status effect engine: timed conditions on enemies.
//!
//! Each kind keeps its own countdown in [`StatusEffects`]. Reapplying a kind
//! overwrites its timer; kinds never interact except through
//! [`movement_factor`].

use garden_core::components::{Enemy, StatusEffects};
use garden_core::enums::{EffectKind, StatusKind};
use garden_core::rules::Rules;

/// Status a hit with this effect inflicts, with its duration.
pub fn status_for_effect(effect: EffectKind, rules: &Rules) -> Option<(StatusKind, u32)> {
    match effect {
        EffectKind::Slow => Some((StatusKind::Frozen, rules.freeze_duration)),
        EffectKind::Burn => Some((StatusKind::Burning, rules.burn_duration)),
        EffectKind::Poison => Some((StatusKind::Poisoned, rules.poison_duration)),
        EffectKind::Void => Some((StatusKind::Voided, rules.void_duration)),
        _ => None,
    }
}

/// Set a status timer, replacing any remaining time.
pub fn apply(effects: &mut StatusEffects, kind: StatusKind, duration: u32) {
    effects.remaining.insert(kind, duration);
    if duration > 0 {
        effects.pulse_counters.entry(kind).or_insert(0);
    }
}

/// Apply the status carried by a hit, if any.
pub fn apply_effect(effects: &mut StatusEffects, effect: EffectKind, rules: &Rules) {
    if let Some((kind, duration)) = status_for_effect(effect, rules) {
        apply(effects, kind, duration);
    }
}

/// Advance every timer on `enemy` by one tick and deal damage-over-time.
///
/// DoT goes straight to health without resistance. Returns the DoT dealt.
pub fn advance(enemy: &mut Enemy, rules: &Rules) -> f64 {
    let mut dealt = 0.0;
    let effects = &mut enemy.effects;
    let active: Vec<StatusKind> = effects.active();
    for kind in active {
        if let Some((damage, rate)) = dot_for(kind, rules) {
            let counter = effects.pulse_counters.entry(kind).or_insert(0);
            *counter += 1;
            if *counter >= rate {
                *counter = 0;
                dealt += damage;
            }
        }
        if let Some(timer) = effects.remaining.get_mut(&kind) {
            *timer = timer.saturating_sub(1);
        }
    }
    effects.remaining.retain(|_, t| *t > 0);
    let remaining = &effects.remaining;
    effects.pulse_counters.retain(|k, _| remaining.contains_key(k));
    enemy.health -= dealt;
    dealt
}

fn dot_for(kind: StatusKind, rules: &Rules) -> Option<(f64, u32)> {
    match kind {
        StatusKind::Burning => Some((rules.burn_damage, rules.burn_tick_rate.max(1))),
        StatusKind::Poisoned => Some((rules.poison_damage, rules.poison_tick_rate.max(1))),
        _ => None,
    }
}

/// Multiplier on an enemy's base speed from its current statuses.
/// Voided enemies do not move at all.
pub fn movement_factor(effects: &StatusEffects, rules: &Rules) -> f64 {
    if effects.is_active(StatusKind::Voided) {
        return 0.0;
    }
    let mut factor = 1.0;
    if effects.is_active(StatusKind::Frozen) {
        factor *= rules.freeze_slow_multiplier;
    }
    if effects.is_active(StatusKind::Hasted) {
        factor *= rules.speed_buff_multiplier;
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::balance::BalanceTable;
    use glam::DVec2;

    use crate::factories::{make_enemy, EnemyScaling};

    fn aphid() -> Enemy {
        let table = BalanceTable::builtin().unwrap();
        make_enemy(
            1,
            "aphid",
            table.enemy("aphid").unwrap(),
            EnemyScaling::default(),
            DVec2::ZERO,
            0,
            &Rules::default(),
        )
    }

    #[test]
    fn freeze_slows_then_expires() {
        let rules = Rules::default();
        let mut enemy = aphid();
        apply_effect(&mut enemy.effects, EffectKind::Slow, &rules);
        assert_eq!(movement_factor(&enemy.effects, &rules), rules.freeze_slow_multiplier);
        for _ in 0..rules.freeze_duration {
            advance(&mut enemy, &rules);
        }
        assert!(!enemy.effects.is_active(StatusKind::Frozen));
        assert_eq!(movement_factor(&enemy.effects, &rules), 1.0);
    }

    #[test]
    fn reapply_overwrites_instead_of_stacking() {
        let rules = Rules::default();
        let mut enemy = aphid();
        apply_effect(&mut enemy.effects, EffectKind::Slow, &rules);
        for _ in 0..10 {
            advance(&mut enemy, &rules);
        }
        apply_effect(&mut enemy.effects, EffectKind::Slow, &rules);
        assert_eq!(enemy.effects.remaining_ticks(StatusKind::Frozen), rules.freeze_duration);
    }

    #[test]
    fn burn_pulses_bypass_resistance() {
        let rules = Rules::default();
        let mut enemy = aphid();
        enemy.resistance = garden_core::enums::Resistance::Armor;
        let start = enemy.health;
        apply_effect(&mut enemy.effects, EffectKind::Burn, &rules);
        let mut total = 0.0;
        for _ in 0..rules.burn_duration {
            total += advance(&mut enemy, &rules);
        }
        let pulses = f64::from(rules.burn_duration / rules.burn_tick_rate);
        assert_eq!(total, pulses * rules.burn_damage);
        assert_eq!(enemy.health, start - total);
        assert!(!enemy.effects.is_active(StatusKind::Burning));
    }

    #[test]
    fn effects_are_orthogonal() {
        let rules = Rules::default();
        let mut enemy = aphid();
        apply_effect(&mut enemy.effects, EffectKind::Slow, &rules);
        apply_effect(&mut enemy.effects, EffectKind::Poison, &rules);
        apply_effect(&mut enemy.effects, EffectKind::Void, &rules);
        assert_eq!(
            enemy.effects.active(),
            vec![StatusKind::Frozen, StatusKind::Poisoned, StatusKind::Voided]
        );
        assert_eq!(movement_factor(&enemy.effects, &rules), 0.0);
    }

    #[test]
    fn haste_speeds_up() {
        let rules = Rules::default();
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Hasted, rules.speed_buff_duration);
        assert_eq!(movement_factor(&effects, &rules), rules.speed_buff_multiplier);
    }

    #[test]
    fn non_status_effects_do_nothing() {
        let rules = Rules::default();
        let mut effects = StatusEffects::default();
        apply_effect(&mut effects, EffectKind::Explosive, &rules);
        apply_effect(&mut effects, EffectKind::Shock, &rules);
        assert!(effects.active().is_empty());
    }
}
