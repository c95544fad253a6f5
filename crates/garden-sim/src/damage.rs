//! Damage resolution: raw hit damage against a target's resistance.

use garden_core::enums::{EffectKind, Resistance};
use garden_core::rules::Rules;

/// Result of resolving one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: f64,
    /// The target's resistance reduced the hit.
    pub resisted: bool,
}

/// Final damage of a hit carrying `effect` against `resistance`. Pure.
///
/// Reinforced targets only take full damage from burn, explosive and shock;
/// anything else deals a fixed chip. Armored targets let burn and explosive
/// through and reduce the rest, never below 1.
pub fn resolve_damage(
    raw: f64,
    effect: EffectKind,
    resistance: Resistance,
    rules: &Rules,
) -> DamageOutcome {
    match resistance {
        Resistance::Reinforced => match effect {
            EffectKind::Burn | EffectKind::Explosive | EffectKind::Shock => full(raw),
            _ => DamageOutcome {
                damage: rules.reinforced_chip_damage,
                resisted: true,
            },
        },
        Resistance::Armor => match effect {
            EffectKind::Burn | EffectKind::Explosive => full(raw),
            _ => DamageOutcome {
                damage: (raw * rules.armor_damage_reduction).floor().max(1.0),
                resisted: true,
            },
        },
        Resistance::None => full(raw),
    }
}

fn full(raw: f64) -> DamageOutcome {
    DamageOutcome {
        damage: raw,
        resisted: false,
    }
}
