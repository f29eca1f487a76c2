//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use crawl_core::{ActorCatalog, CombatConfig, ItemCatalog};
use tracing::info;

use crate::loaders::{ActorLoader, ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// └── actors.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

/// Everything an encounter needs, loaded and cross-checked.
#[derive(Clone, Debug)]
pub struct Content {
    pub config: CombatConfig,
    pub items: ItemCatalog,
    pub actors: ActorCatalog,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load actor catalog from `actors.ron`.
    pub fn load_actors(&self, config: &CombatConfig) -> LoadResult<ActorCatalog> {
        let path = self.data_dir.join("actors.ron");
        ActorLoader::load(&path, config)
    }

    /// Loads config, items and actors, and checks that every starting item
    /// an actor names exists.
    pub fn load_all(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let items = self.load_items()?;
        let actors = self.load_actors(&config)?;
        ActorLoader::check(&actors, &items)?;

        info!(
            target: "crawl::content",
            dir = %self.data_dir.display(),
            items = items.len(),
            actors = actors.len(),
            "content loaded"
        );
        Ok(Content {
            config,
            items,
            actors,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
