//! Attack resolution.

use tracing::debug;

use super::damage::{apply_boosts, apply_resistances};
use super::hit::hit_chance;
use crate::config::CombatConfig;
use crate::env::{MessageSink, Tone, capitalize, format_amount};
use crate::state::Combatant;
use crate::stats::{DamageVector, ResourceKind};

/// Whether an attack landed and what it dealt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    /// Damage per type after boosts and resistances.
    Hit { damage: DamageVector },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    pub chance: f64,
    /// Initiative charged to the attacker.
    pub cost: i64,
    /// Xp the defender is worth, if this attack killed it.
    pub kill_xp: Option<u32>,
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, AttackOutcome::Hit { .. })
    }

    /// Total damage dealt; zero on a miss.
    pub fn total_damage(&self) -> f64 {
        match &self.outcome {
            AttackOutcome::Miss => 0.0,
            AttackOutcome::Hit { damage } => damage.total(),
        }
    }
}

/// Resolves one attack of `attacker` against `defender`.
///
/// 1. chance from the attacker's attack rating against the defender's total defense
/// 2. `roll >= chance` misses and leaves HP untouched
/// 3. on a hit, raw damage is boosted by the attacker, then reduced by the defender
/// 4. a positive total is taken from HP without clamping, so lethal hits go below zero
/// 5. the attacker pays its speed-scaled attack cost either way
pub fn resolve_attack(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    roll: f64,
    config: &CombatConfig,
    sink: &mut dyn MessageSink,
) -> AttackResult {
    let tone = if attacker.is_player() {
        Tone::PlayerAttack
    } else {
        Tone::EnemyAttack
    };
    sink.push(
        format!(
            "{} attacks {}.",
            capitalize(attacker.name()),
            capitalize(defender.name())
        ),
        tone,
    );

    let chance = hit_chance(attacker.attack(), defender.total_defense(), config);
    let outcome = if roll < chance {
        let damage = apply_boosts(&attacker.stats, attacker.damage(), config);
        let damage = apply_resistances(&defender.stats, damage, config);
        let total = damage.total();

        if total > 0.0 {
            for (damage_type, amount) in damage.nonzero() {
                sink.push(
                    format!(
                        "The attack does {} {} damage.",
                        format_amount(amount),
                        damage_type.as_ref().to_uppercase()
                    ),
                    tone,
                );
            }
            defender.stats.modify(ResourceKind::Hp, -total, true);
        } else {
            sink.push("The attack does no damage.".to_owned(), tone);
        }
        AttackOutcome::Hit { damage }
    } else {
        sink.push("The attack missed!".to_owned(), tone);
        AttackOutcome::Miss
    };

    let cost = attacker.attack_cost(config);
    attacker.stats.initiative_mut().apply_cost(cost);
    let kill_xp = defender.check_death(sink);

    debug!(
        target: "crawl::combat",
        attacker = %attacker.id(),
        defender = %defender.id(),
        chance,
        roll,
        hit = matches!(outcome, AttackOutcome::Hit { .. }),
        cost,
        "attack resolved"
    );

    AttackResult {
        outcome,
        chance,
        cost,
        kill_xp,
    }
}
