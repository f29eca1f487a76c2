//! Combat configuration loader.

use std::path::Path;

use crawl_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`CombatConfig::default`] value.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_init <= 0 {
            anyhow::bail!("max_init must be positive, got {}", config.max_init);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resist_cap = 0.9\nbase_hit_chance = 0.6").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.resist_cap, 0.9);
        assert_eq!(config.base_hit_chance, 0.6);
        assert_eq!(config.max_init, CombatConfig::default().max_init);
        assert_eq!(config.wait_cost(), 500_000);
    }

    #[test]
    fn rejects_non_positive_initiative() {
        let err = ConfigLoader::parse("max_init = 0").unwrap_err();
        assert!(err.to_string().contains("max_init"));
    }

    #[test]
    fn reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read file"));
    }
}
