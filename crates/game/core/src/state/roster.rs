//! Every combatant of an encounter, in insertion order.
//!
//! Ids index the roster directly. Dead combatants stay in place as remains
//! so ids remain stable for the whole encounter.

use super::combatant::{Combatant, CombatantId, Control};
use crate::config::CombatConfig;
use crate::env::{ActorDefinition, ItemOracle};
use crate::error::BuildError;
use crate::state::ItemIds;
use crate::stats::StatSet;

#[derive(Debug, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
    item_ids: ItemIds,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> CombatantId {
        CombatantId(self.combatants.len() as u32)
    }

    /// Adds a combatant built around an existing stat set.
    pub fn insert(&mut self, name: impl Into<String>, stats: StatSet, control: Control) -> CombatantId {
        let id = self.next_id();
        self.combatants.push(Combatant::new(id, name, stats, control));
        id
    }

    /// Spawns a combatant from its definition.
    ///
    /// # Errors
    ///
    /// See [`Combatant::spawn`].
    pub fn spawn(
        &mut self,
        definition: &ActorDefinition,
        control: Control,
        config: &CombatConfig,
        items: &dyn ItemOracle,
    ) -> Result<CombatantId, BuildError> {
        let id = self.next_id();
        let combatant =
            Combatant::spawn(id, definition, control, config, items, &mut self.item_ids)?;
        self.combatants.push(combatant);
        Ok(id)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Two distinct combatants borrowed mutably at once.
    pub fn pair_mut(
        &mut self,
        a: CombatantId,
        b: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia.max(ib) >= self.combatants.len() {
            return None;
        }
        if ia < ib {
            let (left, right) = self.combatants.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// The interactive combatant, dead or alive.
    pub fn player(&self) -> Option<&Combatant> {
        self.combatants.iter().find(|combatant| combatant.is_player())
    }

    pub fn player_id(&self) -> Option<CombatantId> {
        self.player().map(Combatant::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    /// Alive combatants with a controller, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(|combatant| combatant.is_alive() && combatant.control() != Control::Inert)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}
