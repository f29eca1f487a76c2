//! Hit chance.

use crate::config::CombatConfig;

/// Chance for an attack to land.
///
/// # Formula
///
/// ```text
/// hit_chance = base + (attack - defense) × per_point
/// clamped to [min_hit_chance, 1]
/// ```
pub fn hit_chance(attack: f64, defense: f64, config: &CombatConfig) -> f64 {
    let chance = config.base_hit_chance + (attack - defense) * config.hit_chance_per_point;
    chance.clamp(config.min_hit_chance, 1.0)
}

/// `roll` is a uniform sample in `[0, 1)`; the attack hits when it falls below the chance.
pub fn check_hit(attack: f64, defense: f64, roll: f64, config: &CombatConfig) -> bool {
    roll < hit_chance(attack, defense, config)
}
