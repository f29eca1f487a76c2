//! Mutable encounter state.
//!
//! Items, equipment, progression and combatants. The turn engine mutates
//! this state; hosts read it between steps.
pub mod combatant;
pub mod equipment;
pub mod item;
pub mod progression;
pub mod roster;

pub use combatant::{Combatant, CombatantId, Control, NaturalWeapon};
pub use equipment::{EquipSlot, Equipment, SlotLayout, ToggleOutcome};
pub use item::{Inventory, Item, ItemId, ItemIds, Refused};
pub use progression::Progression;
pub use roster::Roster;
