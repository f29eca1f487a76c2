//! Arena encounter: one player against a list of monsters, no map.

use anyhow::{Context, Result};
use crawl_content::Content;
use crawl_core::{
    Action, ActorOracle, Attribute, CombatantId, Control, MessageLog, MessageSink, RngOracle,
    StepOutcome, Tone, TurnEngine,
};
use tracing::{debug, info};

/// How an arena run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaOutcome {
    /// Every monster died.
    Victory,
    /// The player died.
    Defeat,
    /// Nothing could act, or the step limit ran out.
    Stalled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaReport {
    pub outcome: ArenaOutcome,
    pub steps: usize,
    /// Actions resolved over the whole run.
    pub actions: u64,
}

/// Message sink that keeps the log and optionally echoes each line.
pub struct Transcript {
    log: MessageLog,
    echo: bool,
}

impl Transcript {
    pub fn new(echo: bool) -> Self {
        Self {
            log: MessageLog::new(),
            echo,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }
}

impl MessageSink for Transcript {
    fn push(&mut self, text: String, tone: Tone) {
        if self.echo {
            println!("{text}");
        }
        self.log.push(text, tone);
    }
}

pub struct Arena<R: RngOracle> {
    engine: TurnEngine<R>,
    player: CombatantId,
    enemies: Vec<CombatantId>,
    /// Attribute raised whenever the player has xp to spend.
    level_up_attribute: Attribute,
}

impl<R: RngOracle> Arena<R> {
    /// Spawns the player and every listed monster into `engine`.
    pub fn new(
        mut engine: TurnEngine<R>,
        content: &Content,
        player_key: &str,
        enemy_keys: &[String],
    ) -> Result<Self> {
        let definition = content
            .actors
            .definition(player_key)
            .with_context(|| format!("unknown player actor '{player_key}'"))?;
        let player = engine.spawn(&definition, Control::Player, &content.items)?;

        let mut enemies = Vec::with_capacity(enemy_keys.len());
        for key in enemy_keys {
            let definition = content
                .actors
                .definition(key)
                .with_context(|| format!("unknown enemy actor '{key}'"))?;
            enemies.push(engine.spawn(&definition, Control::Ai, &content.items)?);
        }

        info!(target: "crawl::sim", enemies = enemies.len(), "arena ready");
        Ok(Self {
            engine,
            player,
            enemies,
            level_up_attribute: Attribute::Strength,
        })
    }

    pub fn engine(&self) -> &TurnEngine<R> {
        &self.engine
    }

    fn first_living_enemy(&self) -> Option<CombatantId> {
        self.enemies
            .iter()
            .copied()
            .find(|id| self.engine.combatant(*id).is_some_and(|c| c.is_alive()))
    }

    fn spend_experience(&mut self, sink: &mut dyn MessageSink) {
        let attribute = self.level_up_attribute;
        if let Some(player) = self.engine.roster_mut().get_mut(self.player) {
            while player
                .progression
                .increase_stat(attribute, &mut player.stats, sink)
            {}
        }
    }

    /// Runs until the player or every monster is dead, nothing can act, or
    /// `max_steps` micro-steps have run.
    pub fn run(&mut self, sink: &mut dyn MessageSink, max_steps: usize) -> Result<ArenaReport> {
        let mut outcome = ArenaOutcome::Stalled;
        let mut steps = 0;

        while steps < max_steps {
            let Some(target) = self.first_living_enemy() else {
                outcome = ArenaOutcome::Victory;
                break;
            };
            steps += 1;

            match self.engine.step(sink) {
                StepOutcome::PlayerTurn(_) => {
                    self.engine.act_player(Action::Attack { target }, sink)?;
                    self.spend_experience(sink);
                }
                StepOutcome::Acted { actor, forced, .. } => {
                    debug!(target: "crawl::sim", %actor, forced, "monster acted");
                }
                StepOutcome::PlayerDead => {
                    outcome = ArenaOutcome::Defeat;
                    break;
                }
                StepOutcome::Idle => break,
            }
        }
        if outcome == ArenaOutcome::Stalled && self.first_living_enemy().is_none() {
            outcome = ArenaOutcome::Victory;
        }

        let report = ArenaReport {
            outcome,
            steps,
            actions: self.engine.nonce(),
        };
        info!(
            target: "crawl::sim",
            outcome = ?report.outcome,
            steps = report.steps,
            actions = report.actions,
            "arena finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crawl_content::{ActorLoader, ContentFactory, ItemLoader};
    use crawl_core::{CombatConfig, FixedRoll, PcgRng};

    use super::*;

    fn content() -> Content {
        let config = CombatConfig::default();
        let items = ItemLoader::parse(
            r#"(items: [("sword", (
                name: "Sword",
                slots: [main_hand],
                weight: 3.0,
                weapon: Some((
                    attack: [(strength, 1.0)],
                    damage: [(slashing, [(strength, 0.5)])],
                )),
            ))])"#,
        )
        .unwrap();
        let actors = ActorLoader::parse(
            r#"(actors: [
                ("hero", (
                    name: "hero",
                    stats: (base: { strength: 10.0, dexterity: 0.0, constitution: 10.0,
                                    intelligence: 10.0, cunning: 10.0, willpower: 10.0 }),
                    equipment: ["sword"],
                )),
                ("rat", (
                    name: "rat",
                    stats: (base: { strength: 4.0, dexterity: 0.0, constitution: 2.0,
                                    intelligence: 1.0, cunning: 1.0, willpower: 1.0 }),
                    xp_given: 20,
                )),
            ])"#,
            &config,
        )
        .unwrap();
        Content {
            config,
            items,
            actors,
        }
    }

    #[test]
    fn sure_hits_clear_the_arena_and_level_up() {
        let content = content();
        let engine = TurnEngine::with_rng(content.config.clone(), 0, FixedRoll(0.0));
        let mut arena =
            Arena::new(engine, &content, "hero", &["rat".to_owned(), "rat".to_owned()]).unwrap();
        let mut transcript = Transcript::new(false);

        let report = arena.run(&mut transcript, 1_000).unwrap();
        assert_eq!(report.outcome, ArenaOutcome::Victory);
        assert!(transcript.log().contains("You advance to level 2!"));
        assert!(transcript.log().contains("Your strength increases!"));

        let player = arena.engine().roster().player().unwrap();
        assert_eq!(player.progression.level, 3);
        assert_eq!(player.stats.attribute(Attribute::Strength), 12.0);
    }

    #[test]
    fn step_limit_stalls_the_run() {
        let content = content();
        let engine = TurnEngine::with_rng(content.config.clone(), 0, FixedRoll(0.9999));
        let mut arena = Arena::new(engine, &content, "hero", &["rat".to_owned()]).unwrap();

        let report = arena.run(&mut Transcript::new(false), 50).unwrap();
        assert_eq!(report.outcome, ArenaOutcome::Stalled);
        assert_eq!(report.steps, 50);
    }

    #[test]
    fn unknown_actors_are_reported() {
        let content = content();
        let engine = TurnEngine::with_rng(content.config.clone(), 0, PcgRng);
        let err = Arena::new(engine, &content, "hero", &["dragon".to_owned()])
            .err()
            .unwrap();
        assert!(err.to_string().contains("dragon"));
    }

    #[test]
    fn bundled_data_runs_deterministically() {
        let content = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
            .load_all()
            .unwrap();
        let enemies = ["orc".to_owned(), "goblin".to_owned(), "fire_imp".to_owned()];
        let run = || {
            let engine = TurnEngine::new(content.config.clone(), 11);
            let mut arena = Arena::new(engine, &content, "hero", &enemies).unwrap();
            let mut transcript = Transcript::new(false);
            let report = arena.run(&mut transcript, 10_000).unwrap();
            let texts: Vec<String> = transcript.log().texts().map(str::to_owned).collect();
            (report, texts)
        };

        let (report, texts) = run();
        assert!(report.actions > 0);
        assert!(texts.iter().any(|text| text.starts_with("Hero attacks")));
        assert_eq!(run(), (report, texts));
    }
}
