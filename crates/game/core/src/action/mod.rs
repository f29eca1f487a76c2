//! Actions a combatant may take on its turn.
//!
//! Every action either completes and charges initiative, or is rejected with
//! a [`Rejection`] and charges nothing.
//!
//! | Action          | Cost                                              |
//! |-----------------|---------------------------------------------------|
//! | `Attack`        | weapon/innate cost ÷ attack speed                 |
//! | `Wait`          | `wait_cost_ratio × max_init`                      |
//! | forced Wait     | `forced_wait_cost_ratio × max_init`               |
//! | `Move`          | `move_cost_ratio × max_init` ÷ movement speed     |
//! | `ToggleEquip`   | free                                              |

pub mod controller;

pub use controller::{Controller, Idle, MeleeBrute, controller_for};

use tracing::debug;

use crate::combat::{AttackResult, resolve_attack};
use crate::config::CombatConfig;
use crate::env::MessageSink;
use crate::error::Rejection;
use crate::state::{CombatantId, ItemId, Roster, ToggleOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Attack { target: CombatantId },
    Wait,
    /// Equip a carried item, or take it off if worn.
    ToggleEquip(ItemId),
    /// One step. Whether the destination is blocked is decided by the map.
    Move { blocked: bool },
}

/// What a completed action did.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Attacked(AttackResult),
    Waited { cost: i64 },
    Moved { cost: i64 },
    Equipment(ToggleOutcome),
}

impl ActionOutcome {
    /// Initiative charged for the action.
    pub fn cost(&self) -> i64 {
        match self {
            Self::Attacked(result) => result.cost,
            Self::Waited { cost } | Self::Moved { cost } => *cost,
            Self::Equipment(_) => 0,
        }
    }

    /// Xp of the combatant this action killed, if any.
    pub fn kill_xp(&self) -> Option<u32> {
        match self {
            Self::Attacked(result) => result.kill_xp,
            _ => None,
        }
    }
}

/// Performs `action` for `actor`.
///
/// `roll` is the uniform hit roll used if the action is an attack.
///
/// # Errors
///
/// - `NothingToAttack`: the target is missing, dead, inert or the actor itself
/// - `DestinationBlocked`: the move was blocked
/// - `NotCarried` / `TooHeavy`: from toggling equipment
pub fn perform(
    actor: CombatantId,
    action: Action,
    roster: &mut Roster,
    config: &CombatConfig,
    roll: f64,
    sink: &mut dyn MessageSink,
) -> Result<ActionOutcome, Rejection> {
    let outcome = match action {
        Action::Attack { target } => {
            let (attacker, defender) = roster
                .pair_mut(actor, target)
                .ok_or(Rejection::NothingToAttack)?;
            if !defender.is_alive() || !attacker.is_alive() {
                return Err(Rejection::NothingToAttack);
            }
            ActionOutcome::Attacked(resolve_attack(attacker, defender, roll, config, sink))
        }
        Action::Wait => {
            let cost = config.wait_cost();
            charge(roster, actor, cost)?;
            ActionOutcome::Waited { cost }
        }
        Action::Move { blocked } => {
            if blocked {
                return Err(Rejection::DestinationBlocked);
            }
            let combatant = roster.get_mut(actor).ok_or(Rejection::DestinationBlocked)?;
            let cost = combatant.move_cost(config);
            combatant.stats.initiative_mut().apply_cost(cost);
            ActionOutcome::Moved { cost }
        }
        Action::ToggleEquip(item) => {
            let combatant = roster.get_mut(actor).ok_or(Rejection::NotCarried)?;
            ActionOutcome::Equipment(combatant.toggle_equip(item, sink)?)
        }
    };

    debug!(
        target: "crawl::action",
        %actor,
        ?action,
        cost = outcome.cost(),
        "action performed"
    );
    Ok(outcome)
}

/// The Wait substituted for a rejected AI action.
pub fn forced_wait(actor: CombatantId, roster: &mut Roster, config: &CombatConfig) -> i64 {
    let cost = config.forced_wait_cost();
    if let Some(combatant) = roster.get_mut(actor) {
        combatant.stats.initiative_mut().apply_cost(cost);
    }
    cost
}

fn charge(roster: &mut Roster, actor: CombatantId, cost: i64) -> Result<(), Rejection> {
    // unknown actors cannot act
    let combatant = roster.get_mut(actor).ok_or(Rejection::NothingToAttack)?;
    combatant.stats.initiative_mut().apply_cost(cost);
    Ok(())
}
