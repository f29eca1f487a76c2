//! Damage pipeline.
//!
//! # Core Functions
//!
//! - `hit_chance` / `check_hit`: attack rating against total defense
//! - `apply_boosts`: attacker amplification and mastery
//! - `apply_resistances`: defender resistance and mastery
//! - `resolve_attack`: the full sequence, HP deduction and cost included
//!
//! The roll is passed in; callers derive it from the engine's RNG oracle.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{apply_boosts, apply_resistances};
pub use hit::{check_hit, hit_chance};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
