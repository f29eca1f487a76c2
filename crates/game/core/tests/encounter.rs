//! End-to-end encounters driven through the turn engine.

use crawl_core::{
    Action, ActorCatalog, ActorDefinition, ActorOracle, AiKind, Attribute, BonusSpec,
    CombatConfig, Control, DamageType, EquipSlot, FixedRoll, ItemCatalog, ItemDefinition,
    MessageLog, ModifierKind, Rejection, ResourceKind, RngOracle, Scaling, StatKey, StepOutcome,
    TurnEngine, TurnError, WeaponProfile,
};

fn items() -> ItemCatalog {
    let mut catalog = ItemCatalog::new();
    catalog
        .insert(
            "short_sword",
            ItemDefinition::new("Short Sword", vec![EquipSlot::MainHand])
                .with_weight(3.0)
                .with_weapon(WeaponProfile {
                    attack: Scaling::of(Attribute::Strength, 1.0),
                    damage: vec![(DamageType::Slashing, Scaling::of(Attribute::Strength, 0.5))],
                    ..WeaponProfile::default()
                }),
        )
        .unwrap();
    catalog
        .insert(
            "dagger",
            ItemDefinition::new("Dagger", vec![EquipSlot::MainHand])
                .with_weight(1.0)
                .with_weapon(WeaponProfile {
                    attack: Scaling::of(Attribute::Dexterity, 1.0),
                    damage: vec![(DamageType::Piercing, Scaling::of(Attribute::Dexterity, 0.25))],
                    ..WeaponProfile::default()
                }),
        )
        .unwrap();
    catalog
        .insert(
            "greataxe",
            ItemDefinition::new("Greataxe", vec![EquipSlot::MainHand, EquipSlot::OffHand])
                .with_weight(8.0)
                .with_weapon(WeaponProfile {
                    attack: Scaling::of(Attribute::Strength, 1.0),
                    damage: vec![(DamageType::Slashing, Scaling::of(Attribute::Strength, 1.0))],
                    init_cost_ratio: Some(0.75),
                    ..WeaponProfile::default()
                }),
        )
        .unwrap();
    catalog
        .insert(
            "plate",
            ItemDefinition::new("Plate Armor", vec![EquipSlot::Torso]).with_weight(80.0),
        )
        .unwrap();
    catalog
        .insert(
            "anvil_helm",
            ItemDefinition::new("Anvil Helm", vec![EquipSlot::Head])
                .with_weight(30.0)
                .with_bonus(BonusSpec::new(StatKey::Hp, ModifierKind::Flat, 50.0)),
        )
        .unwrap();
    catalog
}

fn actors() -> ActorCatalog {
    let mut catalog = ActorCatalog::new();
    catalog.insert(
        "hero",
        ActorDefinition::builder("hero")
            .attributes([10.0, 0.0, 10.0, 10.0, 10.0, 10.0])
            .equip("short_sword")
            .build(),
    );
    catalog.insert(
        "orc",
        ActorDefinition::builder("orc")
            .attributes([10.0, 0.0, 4.0, 10.0, 10.0, 10.0])
            .ai(AiKind::MeleeBrute)
            .xp_given(5)
            .build(),
    );
    catalog
}

/// Player attacks the orc whenever it is due, until the orc dies or the step
/// budget runs out.
fn fight<R: RngOracle>(engine: &mut TurnEngine<R>, log: &mut MessageLog) {
    let orc = engine
        .roster()
        .iter()
        .find(|combatant| !combatant.is_player())
        .map(|combatant| combatant.id())
        .unwrap();

    for _ in 0..200 {
        if !engine.combatant(orc).unwrap().is_alive() {
            break;
        }
        match engine.step(log) {
            StepOutcome::PlayerTurn(_) => {
                engine.act_player(Action::Attack { target: orc }, log).unwrap();
            }
            StepOutcome::Acted { .. } => {}
            StepOutcome::Idle | StepOutcome::PlayerDead => break,
        }
    }
}

fn arena<R: RngOracle>(mut engine: TurnEngine<R>) -> TurnEngine<R> {
    let items = items();
    let actors = actors();
    engine
        .spawn(&actors.definition("hero").unwrap(), Control::Player, &items)
        .unwrap();
    engine
        .spawn(&actors.definition("orc").unwrap(), Control::Ai, &items)
        .unwrap();
    engine
}

#[test]
fn sure_hits_kill_the_orc_and_reward_the_player() {
    let mut engine = arena(TurnEngine::with_rng(CombatConfig::default(), 7, FixedRoll(0.0)));
    let mut log = MessageLog::new();

    fight(&mut engine, &mut log);

    let player_id = engine.roster().player_id().unwrap();
    let orc_id = engine
        .roster()
        .iter()
        .find(|c| !c.is_player())
        .map(|c| c.id())
        .unwrap();
    {
        let player = engine.combatant(player_id).unwrap();
        let orc = engine.combatant(orc_id).unwrap();
        assert!(player.is_alive());
        assert!(!orc.is_alive());
        assert_eq!(orc.name(), "remains of orc");
        assert_eq!(orc.control(), Control::Inert);
        assert_eq!(player.progression.xp, 5);
    }

    assert!(log.contains("Hero attacks Orc."));
    assert!(log.contains("The attack does 5 SLASHING damage."));
    assert!(log.contains("Orc is dead!"));
    assert!(log.contains("You gain 5 experience points."));
    assert!(!engine.has_controller(orc_id));

    // only the player is left; it is always due
    assert_eq!(engine.step(&mut log), StepOutcome::PlayerTurn(player_id));
}

#[test]
fn a_player_with_no_chance_to_hit_never_damages() {
    let mut engine = arena(TurnEngine::with_rng(CombatConfig::default(), 7, FixedRoll(0.9999)));
    let mut log = MessageLog::new();

    fight(&mut engine, &mut log);

    assert!(log.contains("The attack missed!"));
    assert!(!log.contains("Orc is dead!"));
    let orc = engine.roster().iter().find(|c| !c.is_player()).unwrap();
    assert_eq!(orc.stats.hp(), orc.stats.max_value(ResourceKind::Hp));
}

#[test]
fn encounters_replay_identically_from_their_seed() {
    let run = |seed| {
        let mut engine = arena(TurnEngine::new(CombatConfig::default(), seed));
        let mut log = MessageLog::new();
        fight(&mut engine, &mut log);
        let texts: Vec<String> = log.iter().map(|message| message.full_text()).collect();
        let hp: Vec<f64> = engine.roster().iter().map(|c| c.stats.hp()).collect();
        (texts, hp, engine.nonce())
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn overweight_equipment_is_rejected_without_spending_the_turn() {
    let items = items();
    let mut actors = actors();
    actors.insert(
        "porter",
        ActorDefinition::builder("porter")
            .attributes([20.0, 10.0, 10.0, 10.0, 10.0, 10.0])
            .equip("plate")
            .carry("anvil_helm")
            .build(),
    );
    let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.5));
    let player = engine
        .spawn(&actors.definition("porter").unwrap(), Control::Player, &items)
        .unwrap();

    let (helm, hp_before) = {
        let porter = engine.combatant(player).unwrap();
        // STR 20 → capacity 200 → wearable 100; plate already weighs 80
        assert_eq!(porter.stats.max_value(ResourceKind::Encumbrance), 100.0);
        assert_eq!(porter.stats.current(ResourceKind::Encumbrance), 80.0);
        let helm = porter
            .inventory
            .iter()
            .find(|item| item.name() == "Anvil Helm")
            .unwrap()
            .id();
        (helm, porter.stats.max_value(ResourceKind::Hp))
    };

    let mut log = MessageLog::new();
    let err = engine
        .act_player(Action::ToggleEquip(helm), &mut log)
        .unwrap_err();
    assert!(matches!(err, TurnError::Rejected(Rejection::TooHeavy { .. })));

    let porter = engine.combatant(player).unwrap();
    assert!(porter.equipment.is_free(EquipSlot::Head));
    assert_eq!(porter.stats.max_value(ResourceKind::Hp), hp_before);
    assert!(porter.stats.initiative().is_ready());
    assert!(engine.is_player_turn());
}

#[test]
fn two_handers_and_one_handers_share_the_hands() {
    let items = items();
    let mut actors = actors();
    actors.insert(
        "duelist",
        ActorDefinition::builder("duelist")
            .attributes([10.0, 10.0, 10.0, 10.0, 10.0, 10.0])
            .carry("short_sword")
            .carry("dagger")
            .carry("greataxe")
            .build(),
    );
    let mut engine = TurnEngine::with_rng(CombatConfig::default(), 1, FixedRoll(0.5));
    let player = engine
        .spawn(&actors.definition("duelist").unwrap(), Control::Player, &items)
        .unwrap();
    let id_of = |engine: &TurnEngine<FixedRoll>, name: &str| {
        engine
            .combatant(player)
            .unwrap()
            .inventory
            .iter()
            .find(|item| item.name() == name)
            .unwrap()
            .id()
    };
    let (sword, dagger, axe) = (
        id_of(&engine, "Short Sword"),
        id_of(&engine, "Dagger"),
        id_of(&engine, "Greataxe"),
    );
    let mut log = MessageLog::new();

    engine.act_player(Action::ToggleEquip(sword), &mut log).unwrap();
    engine.act_player(Action::ToggleEquip(dagger), &mut log).unwrap();
    {
        let equipment = &engine.combatant(player).unwrap().equipment;
        assert!(equipment.is_dual_wielding());
        assert_eq!(equipment.get(EquipSlot::OffHand).unwrap().id(), dagger);
    }

    engine.act_player(Action::ToggleEquip(axe), &mut log).unwrap();
    {
        let duelist = engine.combatant(player).unwrap();
        assert!(duelist.equipment.is_two_handing());
        assert!(!duelist.equipment.is_dual_wielding());
        assert_eq!(duelist.equipment.items().count(), 1);
        assert_eq!(duelist.stats.current(ResourceKind::Encumbrance), 8.0);
        // swapped-out weapons stay in the pack
        assert_eq!(duelist.inventory.len(), 3);
    }
    assert!(log.contains("You remove the Short Sword."));
    assert!(log.contains("You remove the Dagger."));
    assert!(log.contains("You equip the Greataxe."));

    engine.act_player(Action::ToggleEquip(dagger), &mut log).unwrap();
    let duelist = engine.combatant(player).unwrap();
    assert!(duelist.equipment.is_free(EquipSlot::OffHand));
    assert_eq!(duelist.equipment.get(EquipSlot::MainHand).unwrap().id(), dagger);
    assert!(log.contains("You remove the Greataxe."));
}

#[cfg(feature = "serde")]
#[test]
fn stat_sets_survive_a_bincode_round_trip() {
    use crawl_core::{ModifierSource, StatSet, StatTemplate};

    let config = CombatConfig::default();
    let mut stats =
        StatSet::new(&StatTemplate::with_attributes([12.0, 8.0, 10.0, 6.0, 5.0, 9.0]), &config)
            .unwrap();
    stats.add_bonus(
        StatKey::Strength.into(),
        ModifierKind::PercentAdd,
        0.5,
        ModifierSource::LevelUp(2),
    );
    stats.modify(ResourceKind::Hp, -7.5, false);

    let bytes = stats.to_bytes().unwrap();
    let restored = StatSet::from_bytes(&bytes).unwrap();

    assert_eq!(restored.attribute(Attribute::Strength), 18.0);
    assert_eq!(restored.hp(), stats.hp());
    assert_eq!(
        restored.max_value(ResourceKind::CarryingCapacity),
        stats.max_value(ResourceKind::CarryingCapacity)
    );
}
