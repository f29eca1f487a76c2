//! Read-only collaborators of the combat core.
//!
//! Oracles expose item and actor definitions, the RNG produces deterministic
//! rolls, and the message sink receives human-readable event text. None of
//! them own combat state.
mod actors;
mod items;
mod messages;
mod rng;

pub use actors::{ActorCatalog, ActorDefinition, ActorDefinitionBuilder, ActorOracle, AiKind};
pub use items::{
    ArmorProfile, BonusSpec, ItemCatalog, ItemDefinition, ItemOracle, WeaponProfile, WeaponRange,
};
pub use messages::{Message, MessageLog, MessageSink, NullSink, Tone, capitalize, format_amount};
pub use rng::{FixedRoll, PcgRng, RngOracle, compute_seed};
