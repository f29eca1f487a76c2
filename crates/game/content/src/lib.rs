//! Data-driven content definitions and loaders.
//!
//! This crate reads the static combat content from data files:
//! - Item catalogs (RON)
//! - Actor catalogs (RON)
//! - Combat configuration (TOML)
//!
//! Loaded records are handed to the turn engine through the `crawl-core`
//! oracles and never appear in encounter state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, ConfigLoader, Content, ContentFactory, ItemLoader, LoadResult};
