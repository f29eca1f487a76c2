//! Experience and levels.

use tracing::info;

use crate::env::{MessageSink, Tone};
use crate::stats::{Attribute, ModifierKind, ModifierSource, StatSet};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// Awarded to whoever kills this combatant.
    pub xp_given: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(1, 2, 0)
    }
}

impl Progression {
    pub fn new(level_up_base: u32, level_up_factor: u32, xp_given: u32) -> Self {
        Self {
            level: 1,
            xp: 0,
            level_up_base,
            level_up_factor,
            xp_given,
        }
    }

    /// `base + factor × (L+1)(L+2) / 2`
    pub fn xp_to_next_level(&self) -> u32 {
        let level = u64::from(self.level);
        let triangle = (level + 1) * (level + 2) / 2;
        let total = u64::from(self.level_up_base) + u64::from(self.level_up_factor) * triangle;
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    pub fn requires_level_up(&self) -> bool {
        self.xp > self.xp_to_next_level()
    }

    /// Adds experience. A zero `level_up_base` means this combatant never levels.
    pub fn add_xp(&mut self, xp: u32, sink: &mut dyn MessageSink) {
        if xp == 0 || self.level_up_base == 0 {
            return;
        }
        self.xp = self.xp.saturating_add(xp);
        sink.push(format!("You gain {xp} experience points."), Tone::Progress);

        if self.requires_level_up() {
            sink.push(
                format!("You advance to level {}!", self.level + 1),
                Tone::Progress,
            );
        }
    }

    /// Spends one level's worth of xp on +1 of `attribute`.
    ///
    /// Returns `false` (and changes nothing) if not enough xp has been earned.
    pub fn increase_stat(
        &mut self,
        attribute: Attribute,
        stats: &mut StatSet,
        sink: &mut dyn MessageSink,
    ) -> bool {
        if !self.requires_level_up() {
            return false;
        }
        self.xp -= self.xp_to_next_level();
        self.level += 1;

        stats.add_bonus(
            attribute.into(),
            ModifierKind::Flat,
            1.0,
            ModifierSource::LevelUp(self.level),
        );
        info!(target: "crawl::progression", level = self.level, %attribute, "level up");
        sink.push(format!("Your {attribute} increases!"), Tone::Progress);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::MessageLog;
    use crate::stats::StatTemplate;

    #[test]
    fn thresholds_grow_triangularly() {
        let mut progression = Progression::default();
        assert_eq!(progression.xp_to_next_level(), 1 + 2 * 3);
        progression.level = 2;
        assert_eq!(progression.xp_to_next_level(), 1 + 2 * 6);
    }

    #[test]
    fn leveling_spends_xp_and_raises_the_attribute() {
        let mut stats =
            StatSet::new(&StatTemplate::with_attributes([10.0; 6]), &CombatConfig::default())
                .unwrap();
        let mut log = MessageLog::new();
        let mut progression = Progression::default();

        progression.add_xp(5, &mut log);
        assert!(!progression.requires_level_up());
        assert!(!progression.increase_stat(Attribute::Strength, &mut stats, &mut log));

        progression.add_xp(5, &mut log);
        assert!(log.contains("You advance to level 2!"));
        assert!(progression.increase_stat(Attribute::Strength, &mut stats, &mut log));

        assert_eq!(progression.level, 2);
        assert_eq!(progression.xp, 3);
        assert_eq!(stats.attribute(Attribute::Strength), 11.0);
        assert!(log.contains("Your strength increases!"));
    }

    #[test]
    fn zero_base_never_levels() {
        let mut progression = Progression::new(0, 2, 10);
        progression.add_xp(100, &mut crate::env::NullSink);
        assert_eq!(progression.xp, 0);
    }
}
