/// Combat configuration constants and tunable parameters.
///
/// Everything the stat graph, damage pipeline and turn engine need to agree on
/// lives here so a host can load one file and hand the same values to every
/// subsystem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Initiative a combatant must reach before it may act.
    pub max_init: i64,

    /// Divisor applied to raw initiative for display (`max_init / factor` = 100).
    pub init_display_factor: i64,

    /// Upper bound applied to every damage resistance node.
    pub resist_cap: f64,

    /// Fraction of carrying capacity that may be worn as equipment.
    pub encumbrance_ratio: f64,

    /// Hit chance when attack equals defense.
    pub base_hit_chance: f64,

    /// Hit chance gained per point of attack above defense.
    pub hit_chance_per_point: f64,

    /// Floor for the hit chance; attacks always have at least this chance.
    pub min_hit_chance: f64,

    /// Wait cost as a fraction of `max_init`.
    pub wait_cost_ratio: f64,

    /// Cost of the Wait substituted for a rejected AI action.
    pub forced_wait_cost_ratio: f64,

    /// Movement cost before the movement speed multiplier is applied.
    pub move_cost_ratio: f64,

    /// Attack cost used when a weapon profile does not declare one.
    pub default_attack_cost_ratio: f64,

    /// Base of the dexterity speed curve: `1 - falloff^DEX`.
    pub speed_falloff: f64,

    /// Per-point mastery multiplier on outgoing damage.
    pub amp_mastery_base: f64,

    /// Per-point mastery multiplier on incoming damage.
    pub resist_mastery_base: f64,
}

impl CombatConfig {
    // ===== compile-time constants =====
    pub const MAX_INIT: i64 = 1_000_000;
    pub const INIT_DISPLAY_FACTOR: i64 = 10_000;
    pub const MESSAGE_LOG_CAPACITY: usize = 256;
    pub const INVENTORY_CAPACITY: usize = 26;
    /// Speed multipliers are floored here so debuffs never divide by zero.
    pub const MIN_SPEED_MULTIPLIER: f64 = 0.1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RESIST_CAP: f64 = 0.75;
    pub const DEFAULT_ENCUMBRANCE_RATIO: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            max_init: Self::MAX_INIT,
            init_display_factor: Self::INIT_DISPLAY_FACTOR,
            resist_cap: Self::DEFAULT_RESIST_CAP,
            encumbrance_ratio: Self::DEFAULT_ENCUMBRANCE_RATIO,
            base_hit_chance: 0.5,
            hit_chance_per_point: 0.025,
            min_hit_chance: 0.05,
            wait_cost_ratio: 0.5,
            forced_wait_cost_ratio: 0.2,
            move_cost_ratio: 0.5,
            default_attack_cost_ratio: 0.5,
            speed_falloff: 0.995,
            amp_mastery_base: 1.01,
            resist_mastery_base: 0.99,
        }
    }

    /// Converts a fraction of a full initiative bar into raw initiative units.
    pub fn init_units(&self, ratio: f64) -> i64 {
        (self.max_init as f64 * ratio).round() as i64
    }

    pub fn wait_cost(&self) -> i64 {
        self.init_units(self.wait_cost_ratio)
    }

    pub fn forced_wait_cost(&self) -> i64 {
        self.init_units(self.forced_wait_cost_ratio)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs_are_fractions_of_a_full_bar() {
        let config = CombatConfig::default();
        assert_eq!(config.wait_cost(), 500_000);
        assert_eq!(config.forced_wait_cost(), 200_000);
        assert_eq!(config.max_init / config.init_display_factor, 100);
    }
}
