//! Deterministic combat core for a turn-based dungeon crawler.
//!
//! `crawl-core` owns the numeric stat graph, resources, equipment
//! resolution, the damage pipeline and the initiative-driven turn engine. It
//! performs no I/O; definitions come in through the oracles in [`env`] and
//! human-readable events go out through a [`env::MessageSink`]. All encounter
//! mutation flows through [`engine::TurnEngine`].
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use action::{Action, ActionOutcome, Controller, Idle, MeleeBrute};
pub use combat::{AttackOutcome, AttackResult, resolve_attack};
pub use config::CombatConfig;
pub use engine::{StepOutcome, TurnEngine, TurnError};
pub use env::{
    ActorCatalog, ActorDefinition, ActorOracle, AiKind, ArmorProfile, BonusSpec, FixedRoll,
    ItemCatalog, ItemDefinition, ItemOracle, MessageLog, MessageSink, NullSink, PcgRng, RngOracle,
    Tone, WeaponProfile, WeaponRange,
};
pub use error::{BuildError, ErrorSeverity, GameError, GraphError, Rejection};
pub use state::{
    Combatant, CombatantId, Control, EquipSlot, Equipment, Inventory, Item, ItemId, ItemIds,
    Progression, Refused, Roster, ToggleOutcome,
};
pub use stats::{
    Attribute, BodyPart, DamageCategory, DamageType, DamageVector, Modifier, ModifierKind,
    ModifierSource, NodeId, ResourceKind, Scaling, SpeedAxis, StatGraph, StatKey, StatSet,
    StatTarget, StatTemplate,
};
