//! AI controllers.
//!
//! A controller picks an action for its combatant from a read-only view of
//! the roster. A rejection, whether from choosing or from performing, is
//! turned into a forced Wait by the turn engine.

use super::Action;
use crate::env::AiKind;
use crate::error::Rejection;
use crate::state::{CombatantId, Roster};

pub trait Controller: Send {
    fn choose(&mut self, me: CombatantId, roster: &Roster) -> Result<Action, Rejection>;
}

/// Attacks the player whenever it is alive.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeleeBrute;

impl Controller for MeleeBrute {
    fn choose(&mut self, me: CombatantId, roster: &Roster) -> Result<Action, Rejection> {
        let target = roster
            .player()
            .filter(|player| player.is_alive() && player.id() != me)
            .ok_or(Rejection::NothingToAttack)?;
        Ok(Action::Attack {
            target: target.id(),
        })
    }
}

/// Always waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl Controller for Idle {
    fn choose(&mut self, _me: CombatantId, _roster: &Roster) -> Result<Action, Rejection> {
        Ok(Action::Wait)
    }
}

pub fn controller_for(kind: AiKind) -> Box<dyn Controller> {
    match kind {
        AiKind::MeleeBrute => Box::new(MeleeBrute),
        AiKind::Idle => Box::new(Idle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::state::Control;
    use crate::stats::{StatSet, StatTemplate};

    fn stats() -> StatSet {
        StatSet::new(&StatTemplate::with_attributes([10.0; 6]), &CombatConfig::default()).unwrap()
    }

    #[test]
    fn brute_targets_the_living_player() {
        let mut roster = Roster::new();
        let orc = roster.insert("orc", stats(), Control::Ai);
        assert_eq!(MeleeBrute.choose(orc, &roster), Err(Rejection::NothingToAttack));

        let hero = roster.insert("hero", stats(), Control::Player);
        assert_eq!(MeleeBrute.choose(orc, &roster), Ok(Action::Attack { target: hero }));
        assert_eq!(controller_for(AiKind::Idle).choose(orc, &roster), Ok(Action::Wait));
    }
}
