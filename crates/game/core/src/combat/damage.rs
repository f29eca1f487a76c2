//! Damage scaling by amplification, resistance and mastery.

use crate::config::CombatConfig;
use crate::stats::{DamageCategory, DamageVector, StatSet};

/// Scales outgoing damage by the attacker's tables.
///
/// # Formula
///
/// ```text
/// value[t] × (1 + amp[t]) × amp_mastery_base ^ mastery[t]
/// ```
pub fn apply_boosts(attacker: &StatSet, mut damage: DamageVector, config: &CombatConfig) -> DamageVector {
    damage.scale_by(|damage_type| {
        let amp = attacker.damage_value(DamageCategory::Amp, damage_type);
        let mastery = attacker.damage_value(DamageCategory::Mastery, damage_type);
        (1.0 + amp) * config.amp_mastery_base.powf(mastery)
    });
    damage
}

/// Scales incoming damage by the defender's tables.
///
/// # Formula
///
/// ```text
/// value[t] × (1 - resist[t]) × resist_mastery_base ^ mastery[t]
/// ```
///
/// Resistance is already capped by its node, so some damage always gets through.
pub fn apply_resistances(
    defender: &StatSet,
    mut damage: DamageVector,
    config: &CombatConfig,
) -> DamageVector {
    damage.scale_by(|damage_type| {
        let resist = defender.damage_value(DamageCategory::Resist, damage_type);
        let mastery = defender.damage_value(DamageCategory::Mastery, damage_type);
        (1.0 - resist) * config.resist_mastery_base.powf(mastery)
    });
    damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DamageType, ModifierKind, ModifierSource, StatTarget, StatTemplate};

    fn stats() -> StatSet {
        StatSet::new(&StatTemplate::with_attributes([10.0; 6]), &CombatConfig::default()).unwrap()
    }

    #[test]
    fn boosts_compound_amp_and_mastery() {
        let config = CombatConfig::default();
        let mut attacker = stats();
        attacker.add_bonus(StatTarget::amp(DamageType::Fire), ModifierKind::Flat, 0.5, ModifierSource::Innate);
        attacker.add_bonus(StatTarget::mastery(DamageType::Fire), ModifierKind::Flat, 2.0, ModifierSource::Innate);

        let boosted = apply_boosts(&attacker, DamageVector::single(DamageType::Fire, 10.0), &config);
        let expected = 10.0 * 1.5 * 1.01f64.powf(2.0);
        assert!((boosted[DamageType::Fire] - expected).abs() < 1e-9);
        assert_eq!(boosted[DamageType::Ice], 0.0);
    }

    #[test]
    fn resistances_are_bounded_by_the_cap() {
        let config = CombatConfig::default();
        let mut defender = stats();
        defender.add_bonus(StatTarget::resist(DamageType::Slashing), ModifierKind::Flat, 3.0, ModifierSource::Innate);

        let taken = apply_resistances(&defender, DamageVector::single(DamageType::Slashing, 8.0), &config);
        assert!((taken[DamageType::Slashing] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn defender_mastery_softens_the_hit() {
        let config = CombatConfig::default();
        let mut defender = stats();
        defender.add_bonus(StatTarget::mastery(DamageType::Acid), ModifierKind::Flat, 1.0, ModifierSource::Innate);

        let taken = apply_resistances(&defender, DamageVector::single(DamageType::Acid, 100.0), &config);
        assert!((taken[DamageType::Acid] - 99.0).abs() < 1e-9);
    }
}
