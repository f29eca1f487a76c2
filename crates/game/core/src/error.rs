//! Common error infrastructure for crawl-core.
//!
//! Two families of failure exist and they never mix:
//!
//! - [`Rejection`]: the player or an AI asked for something that is not
//!   possible right now. It is reported as a message, costs no initiative, and
//!   the caller re-prompts (player) or substitutes a Wait (AI).
//! - [`BuildError`] / [`GraphError`]: malformed definitions or impossible graph
//!   wiring detected while constructing objects. These abort construction and
//!   have no runtime recovery path.
//!
//! Resource arithmetic never fails and therefore has no error type.

use crate::stats::{Attribute, NodeId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retry with the same or an alternative action.
    ///
    /// Examples: destination blocked, item too heavy
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Corrupted data, cannot continue.
    ///
    /// Examples: missing base stat, unknown modifier kind
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all crawl-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// An action that cannot be performed right now.
///
/// The display text is the user-facing message pushed to the message sink.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("Nothing to attack.")]
    NothingToAttack,

    #[error("That way is blocked.")]
    DestinationBlocked,

    #[error("Your inventory is full.")]
    InventoryFull,

    #[error("The {item} is too heavy to equip.")]
    TooHeavy {
        item: String,
        weight: f64,
        available: f64,
    },

    #[error("The {item} is too heavy to pick up.")]
    TooHeavyToCarry { item: String },

    #[error("You are not carrying that.")]
    NotCarried,
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NothingToAttack => "NOTHING_TO_ATTACK",
            Self::DestinationBlocked => "DESTINATION_BLOCKED",
            Self::InventoryFull => "INVENTORY_FULL",
            Self::TooHeavy { .. } => "TOO_HEAVY",
            Self::TooHeavyToCarry { .. } => "TOO_HEAVY_TO_CARRY",
            Self::NotCarried => "NOT_CARRIED",
        }
    }
}

/// Errors raised while wiring nodes into a [`crate::stats::StatGraph`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0:?} does not belong to this graph")]
    UnknownNode(NodeId),

    #[error("modifier on {node:?} would make it depend on itself through {via:?}")]
    Cycle { node: NodeId, via: NodeId },
}

impl GameError for GraphError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNode(_) => "UNKNOWN_NODE",
            Self::Cycle { .. } => "DEPENDENCY_CYCLE",
        }
    }
}

/// Malformed definition data detected at construction time.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("base stats are missing required attribute {0}")]
    MissingBaseStat(Attribute),

    #[error("unknown stat key '{0}'")]
    UnknownStatKey(String),

    #[error("unknown modifier kind '{0}'")]
    UnknownModifierKind(String),

    #[error("item '{item}' declares an invalid slot layout: {reason}")]
    InvalidSlotLayout { item: String, reason: &'static str },

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error(transparent)]
    DependencyCycle(#[from] GraphError),
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingBaseStat(_) => "MISSING_BASE_STAT",
            Self::UnknownStatKey(_) => "UNKNOWN_STAT_KEY",
            Self::UnknownModifierKind(_) => "UNKNOWN_MODIFIER_KIND",
            Self::InvalidSlotLayout { .. } => "INVALID_SLOT_LAYOUT",
            Self::UnknownItem(_) => "UNKNOWN_ITEM",
            Self::DependencyCycle(inner) => inner.error_code(),
        }
    }
}
