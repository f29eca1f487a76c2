//! Initiative scheduling.
//!
//! # Micro-step
//!
//! 1. order active combatants by `max_init - initiative`, ascending and stable
//! 2. `min_diff` = gap of the first; if positive, every living combatant
//!    regenerates by it (initiative and pools alike), inert ones included
//! 3. first is the player → the player's turn
//! 4. otherwise every ready combatant ordered before the player forms the batch
//! 5. batch members act one per `step`; a rejected AI action becomes a
//!    forced Wait

use tracing::{debug, warn};

use super::TurnEngine;
use crate::action::{self, Action, ActionOutcome};
use crate::env::{MessageSink, RngOracle};
use crate::error::Rejection;
use crate::state::{Combatant, CombatantId, Control};

/// What a single call to [`TurnEngine::step`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The player is due; submit an action through `act_player`.
    PlayerTurn(CombatantId),
    /// One AI combatant acted.
    Acted {
        actor: CombatantId,
        action: Action,
        outcome: ActionOutcome,
        /// The chosen action was rejected and replaced by a forced Wait.
        forced: bool,
    },
    /// Nothing could act; no time was consumed.
    Idle,
    PlayerDead,
}

/// Initiative still missing before `combatant` may act. Negative when above max.
pub(super) fn gap(combatant: &Combatant) -> i64 {
    let initiative = combatant.stats.initiative();
    initiative.max() - initiative.value()
}

impl<R: RngOracle> TurnEngine<R> {
    /// Advances the encounter by one micro-step.
    pub fn step(&mut self, sink: &mut dyn MessageSink) -> StepOutcome {
        if self.roster.player().is_some_and(|player| !player.is_alive()) {
            self.pending.clear();
            return StepOutcome::PlayerDead;
        }

        if let Some(actor) = self.next_pending() {
            return self.run_ai(actor, sink);
        }
        if let Some(outcome) = self.schedule() {
            return outcome;
        }
        match self.next_pending() {
            Some(actor) => self.run_ai(actor, sink),
            None => StepOutcome::Idle,
        }
    }

    /// Steps until the player is due, the player is dead, nothing can act,
    /// or `limit` steps have run. Returns the last outcome.
    pub fn run_until_player(&mut self, sink: &mut dyn MessageSink, limit: usize) -> StepOutcome {
        let mut last = StepOutcome::Idle;
        for _ in 0..limit {
            last = self.step(sink);
            if !matches!(last, StepOutcome::Acted { .. }) {
                break;
            }
        }
        last
    }

    fn next_pending(&mut self) -> Option<CombatantId> {
        while let Some(actor) = self.pending.pop_front() {
            let due = self
                .roster
                .get(actor)
                .is_some_and(|combatant| combatant.is_alive() && combatant.control() == Control::Ai);
            if due {
                return Some(actor);
            }
        }
        None
    }

    /// Regenerates everyone up to the next ready combatant and builds the batch.
    ///
    /// Returns an outcome when the step ends here (player's turn or idle).
    fn schedule(&mut self) -> Option<StepOutcome> {
        let mut order: Vec<(CombatantId, i64)> = self
            .roster
            .active()
            .map(|combatant| (combatant.id(), gap(combatant)))
            .collect();
        order.sort_by_key(|(_, gap)| *gap);

        let &(first, min_diff) = order.first()?;
        if min_diff > 0 {
            let living: Vec<CombatantId> = self
                .roster
                .iter()
                .filter(|combatant| combatant.is_alive())
                .map(Combatant::id)
                .collect();
            for id in living {
                if let Some(combatant) = self.roster.get_mut(id) {
                    combatant.stats.regenerate(min_diff);
                }
            }
        }

        let player = self.roster.player_id();
        debug!(
            target: "crawl::engine",
            %first,
            min_diff,
            active = order.len(),
            "scheduled"
        );
        if Some(first) == player {
            return Some(StepOutcome::PlayerTurn(first));
        }

        self.pending = order
            .iter()
            .map(|(id, _)| *id)
            .take_while(|id| Some(*id) != player)
            .filter(|id| {
                self.roster
                    .get(*id)
                    .is_some_and(|combatant| combatant.stats.initiative().is_ready())
            })
            .collect();

        if self.pending.is_empty() {
            Some(StepOutcome::Idle)
        } else {
            None
        }
    }

    fn run_ai(&mut self, actor: CombatantId, sink: &mut dyn MessageSink) -> StepOutcome {
        let roll = self.roll(actor);
        let choice = match self.controllers.get_mut(&actor) {
            Some(controller) => controller.choose(actor, &self.roster),
            None => Err(Rejection::NothingToAttack),
        };
        let result = choice.and_then(|action| {
            action::perform(actor, action, &mut self.roster, &self.config, roll, sink)
                .map(|outcome| (action, outcome))
        });
        self.nonce += 1;

        match result {
            Ok((action, outcome)) => {
                self.settle(action, &outcome, sink);
                StepOutcome::Acted {
                    actor,
                    action,
                    outcome,
                    forced: false,
                }
            }
            Err(rejection) => {
                warn!(target: "crawl::engine", %actor, %rejection, "ai action rejected; forcing a wait");
                let cost = action::forced_wait(actor, &mut self.roster, &self.config);
                StepOutcome::Acted {
                    actor,
                    action: Action::Wait,
                    outcome: ActionOutcome::Waited { cost },
                    forced: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Idle, MeleeBrute};
    use crate::config::CombatConfig;
    use crate::engine::TurnError;
    use crate::env::{FixedRoll, MessageLog, NullSink};
    use crate::stats::{ResourceKind, StatSet, StatTemplate};

    fn stats() -> StatSet {
        StatSet::new(
            &StatTemplate::with_attributes([10.0, 0.0, 10.0, 10.0, 10.0, 10.0]),
            &CombatConfig::default(),
        )
        .unwrap()
    }

    fn set_initiative(engine: &mut TurnEngine<FixedRoll>, id: CombatantId, value: i64) {
        let initiative = engine.roster_mut().get_mut(id).unwrap().stats.initiative_mut();
        let current = initiative.value();
        initiative.apply_cost(current - value);
    }

    #[test]
    fn nearest_to_full_acts_first() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let player = engine.add_player("hero", stats());
        let a = engine.add_combatant("a", stats(), Box::new(Idle));
        let b = engine.add_combatant("b", stats(), Box::new(Idle));
        set_initiative(&mut engine, player, 0);
        set_initiative(&mut engine, a, 990_000);
        set_initiative(&mut engine, b, 500_000);

        let outcome = engine.step(&mut NullSink);
        assert!(matches!(outcome, StepOutcome::Acted { actor, forced: false, .. } if actor == a));
        // everyone advanced by min_diff = 10_000
        assert_eq!(engine.combatant(b).unwrap().stats.initiative().value(), 510_000);
        assert_eq!(engine.combatant(player).unwrap().stats.initiative().value(), 10_000);
        assert_eq!(engine.combatant(a).unwrap().stats.initiative().value(), 500_000);
    }

    #[test]
    fn regeneration_runs_through_the_step() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let player = engine.add_player("hero", stats());
        engine
            .roster_mut()
            .get_mut(player)
            .unwrap()
            .stats
            .modify(ResourceKind::Hp, -10.0, false);
        set_initiative(&mut engine, player, 0);

        assert_eq!(engine.step(&mut NullSink), StepOutcome::PlayerTurn(player));
        let hp = engine.combatant(player).unwrap().stats.hp();
        // hp regen = 10 × 4e-4 + 10 × 1e-4 per full bar
        assert!((hp - (50.0 + 0.005)).abs() < 1e-9);
    }

    #[test]
    fn inert_bystanders_still_regenerate() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let player = engine.add_player("hero", stats());
        let statue = engine.roster_mut().insert("statue", stats(), Control::Inert);
        engine
            .roster_mut()
            .get_mut(statue)
            .unwrap()
            .stats
            .modify(ResourceKind::Hp, -10.0, false);
        set_initiative(&mut engine, player, 990_000);
        set_initiative(&mut engine, statue, 0);
        let wounded = engine.combatant(statue).unwrap().stats.hp();

        assert_eq!(engine.step(&mut NullSink), StepOutcome::PlayerTurn(player));
        let statue = engine.combatant(statue).unwrap();
        assert_eq!(statue.stats.initiative().value(), 10_000);
        assert!(statue.stats.hp() > wounded);
    }

    #[test]
    fn player_first_returns_control_immediately() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let player = engine.add_player("hero", stats());
        engine.add_combatant("orc", stats(), Box::new(MeleeBrute));

        assert!(engine.is_player_turn());
        assert_eq!(engine.step(&mut NullSink), StepOutcome::PlayerTurn(player));
        assert_eq!(engine.step(&mut NullSink), StepOutcome::PlayerTurn(player));
    }

    #[test]
    fn rejected_ai_actions_become_forced_waits() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        // no player at all: the brute has nothing to attack
        let orc = engine.add_combatant("orc", stats(), Box::new(MeleeBrute));

        let outcome = engine.step(&mut NullSink);
        assert_eq!(
            outcome,
            StepOutcome::Acted {
                actor: orc,
                action: Action::Wait,
                outcome: ActionOutcome::Waited { cost: 200_000 },
                forced: true,
            }
        );
        assert_eq!(engine.combatant(orc).unwrap().stats.initiative().value(), 800_000);
    }

    #[test]
    fn batch_runs_one_actor_per_step_before_the_player() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let a = engine.add_combatant("a", stats(), Box::new(Idle));
        let b = engine.add_combatant("b", stats(), Box::new(Idle));
        let player = engine.add_player("hero", stats());

        assert!(!engine.is_player_turn());
        assert!(matches!(engine.step(&mut NullSink), StepOutcome::Acted { actor, .. } if actor == a));
        assert!(matches!(engine.act_player(Action::Wait, &mut NullSink), Err(TurnError::NotPlayersTurn)));
        assert!(matches!(engine.step(&mut NullSink), StepOutcome::Acted { actor, .. } if actor == b));
        assert_eq!(engine.step(&mut NullSink), StepOutcome::PlayerTurn(player));
    }

    #[test]
    fn an_empty_roster_idles() {
        let mut engine = TurnEngine::new(CombatConfig::default(), 0);
        assert_eq!(engine.step(&mut NullSink), StepOutcome::Idle);
    }

    #[test]
    fn player_rejections_cost_nothing_and_explain_themselves() {
        let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.99));
        let player = engine.add_player("hero", stats());
        let mut log = MessageLog::new();

        let err = engine
            .act_player(Action::Move { blocked: true }, &mut log)
            .unwrap_err();
        assert_eq!(err, TurnError::Rejected(Rejection::DestinationBlocked));
        assert!(log.contains("That way is blocked."));
        assert!(engine.combatant(player).unwrap().stats.initiative().is_ready());
        assert_eq!(engine.nonce(), 0);
    }
}
