//! Actor catalog loader.
//!
//! Loads players and monsters from RON files. Starting equipment is named by
//! item catalog key and resolved when the actor is spawned, so
//! [`ActorLoader::check`] exists to catch dangling keys at load time.

use std::path::Path;

use crawl_core::{
    ActorCatalog, ActorDefinition, ActorOracle, CombatConfig, ItemOracle, StatSet,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Actor catalog structure for RON files.
///
/// ```ron
/// (
///     actors: [
///         ("orc", (
///             name: "orc",
///             stats: (base: { strength: 10.0, dexterity: 5.0, constitution: 6.0,
///                             intelligence: 2.0, cunning: 3.0, willpower: 4.0 }),
///             equipment: ["club"],
///             ai: melee_brute,
///             xp_given: 5,
///         )),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorFile {
    pub actors: Vec<(String, ActorDefinition)>,
}

/// Loader for actor catalog from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load actor catalog from a RON file.
    ///
    /// Each stat template is built once against `config` so that a missing
    /// attribute fails the load rather than the first spawn.
    pub fn load(path: &Path, config: &CombatConfig) -> LoadResult<ActorCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, config)
    }

    pub fn parse(content: &str, config: &CombatConfig) -> LoadResult<ActorCatalog> {
        let file: ActorFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        let mut catalog = ActorCatalog::new();
        for (key, definition) in file.actors {
            if catalog.definition(&key).is_some() {
                anyhow::bail!("Duplicate actor key '{}'", key);
            }
            StatSet::new(&definition.stats, config)
                .map_err(|e| anyhow::anyhow!("Invalid stats for actor '{}': {}", key, e))?;
            catalog.insert(key, definition);
        }

        debug!(target: "crawl::content", actors = catalog.len(), "actor catalog loaded");
        Ok(catalog)
    }

    /// Verifies that every starting item an actor names exists in `items`.
    pub fn check(actors: &ActorCatalog, items: &dyn ItemOracle) -> LoadResult<()> {
        for key in actors.keys() {
            let Some(definition) = actors.definition(key) else {
                continue;
            };
            let missing = definition
                .equipment
                .iter()
                .chain(&definition.inventory)
                .find(|item| items.definition(item).is_none());
            if let Some(item) = missing {
                anyhow::bail!("Actor '{}' references unknown item '{}'", key, item);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crawl_core::{AiKind, Attribute, DamageType, EquipSlot, ItemCatalog, ItemDefinition};

    use super::*;

    const ACTORS: &str = r#"(
        actors: [
            ("hero", (
                name: "hero",
                stats: (
                    base: { strength: 12.0, dexterity: 10.0, constitution: 10.0,
                            intelligence: 8.0, cunning: 8.0, willpower: 8.0 },
                ),
                equipment: ["short_sword"],
                ai: idle,
            )),
            ("fire_imp", (
                name: "fire imp",
                stats: (
                    base: { strength: 4.0, dexterity: 14.0, constitution: 4.0,
                            intelligence: 6.0, cunning: 10.0, willpower: 6.0, hp: 12.0 },
                    resists: { fire: 0.5 },
                    natural_damage: Some([(fire, [(dexterity, 0.25)])]),
                ),
                natural_attack_cost_ratio: Some(0.4),
                xp_given: 3,
            )),
        ],
    )"#;

    fn config() -> CombatConfig {
        CombatConfig::default()
    }

    #[test]
    fn loads_definitions_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ACTORS.as_bytes()).unwrap();

        let catalog = ActorLoader::load(file.path(), &config()).unwrap();
        assert_eq!(catalog.len(), 2);

        let hero = catalog.definition("hero").unwrap();
        assert_eq!(hero.ai, AiKind::Idle);
        assert_eq!(hero.equipment, vec!["short_sword".to_owned()]);
        assert_eq!(hero.level_up_base, ActorDefinition::DEFAULT_LEVEL_UP_BASE);

        let imp = catalog.definition("fire_imp").unwrap();
        assert_eq!(imp.ai, AiKind::MeleeBrute);
        assert_eq!(imp.xp_given, 3);
        assert_eq!(imp.natural_attack_cost_ratio, Some(0.4));

        let stats = StatSet::new(&imp.stats, &config()).unwrap();
        assert_eq!(stats.attribute(Attribute::Dexterity), 14.0);
        assert_eq!(stats.hp(), 12.0);
        assert_eq!(stats.natural_damage()[DamageType::Fire], 3.5);
    }

    #[test]
    fn missing_attributes_fail_the_load() {
        let bad = r#"(actors: [("blob", (
            name: "blob",
            stats: (base: { strength: 1.0 }),
        ))])"#;
        let err = ActorLoader::parse(bad, &config()).unwrap_err();
        assert!(err.to_string().contains("blob"));
    }

    #[test]
    fn check_catches_unknown_items() {
        let actors = ActorLoader::parse(ACTORS, &config()).unwrap();
        let mut items = ItemCatalog::new();

        let err = ActorLoader::check(&actors, &items).unwrap_err();
        assert!(err.to_string().contains("short_sword"));

        items
            .insert(
                "short_sword",
                ItemDefinition::new("Short Sword", vec![EquipSlot::MainHand]),
            )
            .unwrap();
        ActorLoader::check(&actors, &items).unwrap();
    }
}
