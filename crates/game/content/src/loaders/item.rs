//! Item catalog loader.

use std::path::Path;

use crawl_core::{ItemCatalog, ItemDefinition, ItemOracle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
///
/// ```ron
/// (
///     items: [
///         ("short_sword", (
///             name: "Short Sword",
///             slots: [main_hand],
///             weight: 3.0,
///             weapon: Some((
///                 attack: [(strength, 1.0)],
///                 damage: [(slashing, [(strength, 0.5)])],
///             )),
///         )),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<(String, ItemDefinition)>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Every definition is validated as it is inserted; the first invalid slot
    /// layout or duplicate key aborts the load.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut catalog = ItemCatalog::new();
        for (key, definition) in file.items {
            if catalog.definition(&key).is_some() {
                anyhow::bail!("Duplicate item key '{}'", key);
            }
            catalog
                .insert(key.clone(), definition)
                .map_err(|e| anyhow::anyhow!("Invalid item '{}': {}", key, e))?;
        }

        debug!(target: "crawl::content", items = catalog.len(), "item catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crawl_core::{EquipSlot, ModifierKind, StatKey, StatTarget};

    use super::*;

    const ITEMS: &str = r#"(
        items: [
            ("short_sword", (
                name: "Short Sword",
                slots: [main_hand],
                weight: 3.0,
                weapon: Some((
                    attack: [(strength, 1.0)],
                    damage: [(slashing, [(strength, 0.5)])],
                )),
            )),
            ("greataxe", (
                name: "Greataxe",
                slots: [main_hand, off_hand],
                weight: 8.0,
                weapon: Some((
                    attack: [(strength, 1.0)],
                    damage: [(slashing, [(strength, 1.0)])],
                    init_cost_ratio: Some(0.75),
                )),
            )),
            ("ring_of_embers", (
                name: "Ring of Embers",
                slots: [ring1],
                bonuses: [
                    (target: "resist:fire", kind: flat, value: 0.25),
                    (target: "strength", kind: percent_add, value: 0.1),
                ],
            )),
        ],
    )"#;

    #[test]
    fn loads_weapons_and_bonuses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ITEMS.as_bytes()).unwrap();

        let catalog = ItemLoader::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);

        let axe = catalog.definition("greataxe").unwrap();
        assert!(axe.is_two_handed());
        assert_eq!(axe.weapon.as_ref().unwrap().init_cost_ratio, Some(0.75));

        let ring = catalog.definition("ring_of_embers").unwrap();
        assert_eq!(ring.slots, vec![EquipSlot::Ring1]);
        assert_eq!(ring.weight, 0.0);
        assert_eq!(ring.bonuses[0].target, "resist:fire".parse::<StatTarget>().unwrap());
        assert_eq!(ring.bonuses[1].target, StatTarget::from(StatKey::Strength));
        assert_eq!(ring.bonuses[1].kind, ModifierKind::PercentAdd);
    }

    #[test]
    fn rejects_invalid_slot_layouts() {
        let bad = r#"(items: [("helm_sword", (
            name: "Helm Sword",
            slots: [head],
            weapon: Some((attack: [(strength, 1.0)])),
        ))])"#;
        let err = ItemLoader::parse(bad).unwrap_err();
        assert!(err.to_string().contains("helm_sword"));
    }

    #[test]
    fn rejects_unknown_stat_targets() {
        let bad = r#"(items: [("odd", (
            name: "Odd Charm",
            slots: [necklace],
            bonuses: [(target: "luck", kind: flat, value: 1.0)],
        ))])"#;
        assert!(ItemLoader::parse(bad).is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let bad = r#"(items: [
            ("cap", (name: "Cap", slots: [head])),
            ("cap", (name: "Other Cap", slots: [head])),
        ])"#;
        let err = ItemLoader::parse(bad).unwrap_err();
        assert!(err.to_string().contains("Duplicate item key 'cap'"));
    }
}
