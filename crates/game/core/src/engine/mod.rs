//! Turn engine.
//!
//! [`TurnEngine`] owns the roster and drives it one micro-step at a time.
//! The host calls [`TurnEngine::step`] until it reports the player's turn,
//! then submits the player's choice through [`TurnEngine::act_player`].
//!
//! ```text
//! host ──step()──► PlayerTurn ──act_player(action)──► step() ...
//!          └─────► Acted { .. } (one AI action), Idle, PlayerDead
//! ```
//!
//! Rolls are derived from `game_seed` and a nonce that advances once per
//! completed action, so an encounter replays identically from its seed.

mod errors;
mod turns;

pub use errors::TurnError;
pub use turns::StepOutcome;

use std::collections::{BTreeMap, VecDeque};

use tracing::info;

use crate::action::{self, Action, ActionOutcome, Controller, controller_for};
use crate::config::CombatConfig;
use crate::env::{ActorDefinition, ItemOracle, MessageSink, PcgRng, RngOracle, Tone, compute_seed};
use crate::error::BuildError;
use crate::state::{Combatant, CombatantId, Control, Roster};
use crate::stats::StatSet;

pub struct TurnEngine<R: RngOracle = PcgRng> {
    roster: Roster,
    controllers: BTreeMap<CombatantId, Box<dyn Controller>>,
    config: CombatConfig,
    rng: R,
    game_seed: u64,
    nonce: u64,
    /// AI combatants due to act in the current micro-step batch.
    pending: VecDeque<CombatantId>,
}

impl TurnEngine<PcgRng> {
    pub fn new(config: CombatConfig, game_seed: u64) -> Self {
        Self::with_rng(config, game_seed, PcgRng)
    }
}

impl<R: RngOracle> TurnEngine<R> {
    pub fn with_rng(config: CombatConfig, game_seed: u64, rng: R) -> Self {
        Self {
            roster: Roster::new(),
            controllers: BTreeMap::new(),
            config,
            rng,
            game_seed,
            nonce: 0,
            pending: VecDeque::new(),
        }
    }

    // ===== roster =====

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn add_player(&mut self, name: impl Into<String>, stats: StatSet) -> CombatantId {
        self.roster.insert(name, stats, Control::Player)
    }

    pub fn add_combatant(
        &mut self,
        name: impl Into<String>,
        stats: StatSet,
        controller: Box<dyn Controller>,
    ) -> CombatantId {
        let id = self.roster.insert(name, stats, Control::Ai);
        self.controllers.insert(id, controller);
        id
    }

    /// Spawns a combatant from its definition. AI combatants get the
    /// definition's built-in controller.
    ///
    /// # Errors
    ///
    /// See [`Combatant::spawn`].
    pub fn spawn(
        &mut self,
        definition: &ActorDefinition,
        control: Control,
        items: &dyn ItemOracle,
    ) -> Result<CombatantId, BuildError> {
        let id = self.roster.spawn(definition, control, &self.config, items)?;
        if control == Control::Ai {
            self.controllers.insert(id, controller_for(definition.ai));
        }
        Ok(id)
    }

    pub fn set_controller(&mut self, id: CombatantId, controller: Box<dyn Controller>) {
        self.controllers.insert(id, controller);
    }

    pub fn has_controller(&self, id: CombatantId) -> bool {
        self.controllers.contains_key(&id)
    }

    // ===== player =====

    /// Whether [`Self::act_player`] would be accepted now.
    ///
    /// The player must be alive and ready, no AI batch may be in flight, and
    /// no ready combatant may precede the player in initiative order.
    pub fn is_player_turn(&self) -> bool {
        let Some(player) = self.roster.player() else {
            return false;
        };
        if !player.is_alive() || !self.pending.is_empty() || !player.stats.initiative().is_ready() {
            return false;
        }
        let player_gap = turns::gap(player);
        !self.roster.active().any(|other| {
            let gap = turns::gap(other);
            other.id() != player.id()
                && (gap < player_gap || (gap == player_gap && other.id() < player.id()))
        })
    }

    /// Performs the player's action.
    ///
    /// # Errors
    ///
    /// - `Rejected`: the action is impossible; its message is pushed to
    ///   `sink` and no initiative is spent, so the player may choose again
    /// - `NotPlayersTurn`, `PlayerDead`, `NoPlayer`
    pub fn act_player(
        &mut self,
        action: Action,
        sink: &mut dyn MessageSink,
    ) -> Result<ActionOutcome, TurnError> {
        let player = self.roster.player().ok_or(TurnError::NoPlayer)?;
        if !player.is_alive() {
            return Err(TurnError::PlayerDead);
        }
        let player_id = player.id();
        if !self.is_player_turn() {
            return Err(TurnError::NotPlayersTurn);
        }

        let roll = self.roll(player_id);
        match action::perform(player_id, action, &mut self.roster, &self.config, roll, sink) {
            Ok(outcome) => {
                self.nonce += 1;
                self.settle(action, &outcome, sink);
                Ok(outcome)
            }
            Err(rejection) => {
                sink.push(rejection.to_string(), Tone::Impossible);
                Err(TurnError::Rejected(rejection))
            }
        }
    }

    // ===== internals =====

    fn roll(&self, actor: CombatantId) -> f64 {
        self.rng
            .unit(compute_seed(self.game_seed, self.nonce, actor.0, 0))
    }

    /// Bookkeeping after a completed action: dead monsters lose their
    /// controller and the player collects their xp.
    fn settle(&mut self, action: Action, outcome: &ActionOutcome, sink: &mut dyn MessageSink) {
        let (Some(xp), Action::Attack { target }) = (outcome.kill_xp(), action) else {
            return;
        };
        self.controllers.remove(&target);
        self.pending.retain(|id| *id != target);

        let Some(player_id) = self.roster.player_id() else {
            return;
        };
        if target == player_id {
            return;
        }
        if let Some(player) = self.roster.get_mut(player_id) {
            if player.is_alive() {
                info!(target: "crawl::engine", %target, xp, "kill rewarded");
                player.progression.add_xp(xp, sink);
            }
        }
    }
}
