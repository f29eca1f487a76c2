//! Stat system.
//!
//! # Architecture
//!
//! ```text
//! [ StatGraph: nodes + modifiers ]      arena, lazy, dirty-propagating
//!      ↓
//! [ Resource / Initiative ]             current amounts over graph maximums
//!      ↓
//! [ StatSet ]                           one combatant's attributes, pools,
//!                                       tables, speed and innate combat values
//! ```
//!
//! Modifier calculation order:
//! `base + Flat + Functional → × (1 + ΣPercentAdd) → × ΠPercentMult → + RigidFlat → Clamp`

pub mod damage_tables;
pub mod graph;
pub mod keys;
pub mod modifiers;
pub mod resources;
pub mod scaling;
pub mod set;
pub mod speed;

pub use damage_tables::{DamageTable, DamageVector};
pub use graph::{Bound, Bounds, NodeBase, NodeId, StatGraph};
pub use keys::{Attribute, BodyPart, DamageCategory, DamageType, StatKey, StatTarget};
pub use modifiers::{Formula, Modifier, ModifierKind, ModifierSource, ModifierValue};
pub use resources::{Initiative, Resource};
pub use scaling::Scaling;
pub use set::{ResourceKind, StatSet, StatTemplate};
pub use speed::{SpeedAxis, SpeedMultipliers, scale_cost};
