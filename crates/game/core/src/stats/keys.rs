//! Stat identifiers.
//!
//! Every modifiable value on a combatant is addressed by a [`StatTarget`]:
//! either a plain [`StatKey`] (attribute, resource capacity, regen rate, speed
//! multiplier) or a `(DamageCategory, DamageType)` pair selecting one entry of
//! the resist/amp/mastery tables.
//!
//! Targets have a stable textual form used by data files:
//! `"strength"`, `"hp"`, `"attack_speed"`, `"resist:fire"`, `"mastery:arcane"`.

use core::fmt;
use core::str::FromStr;

use strum::{EnumCount, IntoEnumIterator};

use crate::error::BuildError;

/// The six base attributes every combatant carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Cunning,
    Willpower,
}

impl Attribute {
    /// Dense index used by fixed-size attribute tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Damage types understood by the damage pipeline.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageType {
    // physical
    Bludgeoning,
    Piercing,
    Slashing,
    Sonic,
    // elemental
    Fire,
    Ice,
    Electric,
    Acid,
    Poison,
    // magical
    Arcane,
    Astral,
    Psychic,
    Sacred,
    Profane,
    Eldritch,
}

impl DamageType {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Which per-damage-type table a modifier addresses.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageCategory {
    Resist,
    Amp,
    Mastery,
}

/// Body parts that carry a defense value.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyPart {
    Head,
    Torso,
    Legs,
    Feet,
}

impl BodyPart {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Single-valued stats addressable through [`crate::stats::StatSet::get_stat`].
///
/// Resource keys (`Hp`, `Energy`, `Mana`, `CarryingCapacity`, `Encumbrance`)
/// address the resource's maximum, never its current amount.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKey {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Cunning,
    Willpower,

    Hp,
    HpRegen,
    Energy,
    EnergyRegen,
    Mana,
    ManaRegen,
    CarryingCapacity,
    Encumbrance,

    GlobalSpeed,
    AttackSpeed,
    MovementSpeed,
    CastingSpeed,
}

impl StatKey {
    /// Returns the attribute this key names, if it is one.
    pub const fn attribute(self) -> Option<Attribute> {
        match self {
            Self::Strength => Some(Attribute::Strength),
            Self::Dexterity => Some(Attribute::Dexterity),
            Self::Constitution => Some(Attribute::Constitution),
            Self::Intelligence => Some(Attribute::Intelligence),
            Self::Cunning => Some(Attribute::Cunning),
            Self::Willpower => Some(Attribute::Willpower),
            _ => None,
        }
    }
}

impl From<Attribute> for StatKey {
    fn from(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Strength => Self::Strength,
            Attribute::Dexterity => Self::Dexterity,
            Attribute::Constitution => Self::Constitution,
            Attribute::Intelligence => Self::Intelligence,
            Attribute::Cunning => Self::Cunning,
            Attribute::Willpower => Self::Willpower,
        }
    }
}

/// Anything a modifier may be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum StatTarget {
    Stat(StatKey),
    Damage(DamageCategory, DamageType),
}

impl StatTarget {
    pub const fn resist(damage_type: DamageType) -> Self {
        Self::Damage(DamageCategory::Resist, damage_type)
    }

    pub const fn amp(damage_type: DamageType) -> Self {
        Self::Damage(DamageCategory::Amp, damage_type)
    }

    pub const fn mastery(damage_type: DamageType) -> Self {
        Self::Damage(DamageCategory::Mastery, damage_type)
    }
}

impl From<StatKey> for StatTarget {
    fn from(key: StatKey) -> Self {
        Self::Stat(key)
    }
}

impl From<Attribute> for StatTarget {
    fn from(attribute: Attribute) -> Self {
        Self::Stat(attribute.into())
    }
}

impl fmt::Display for StatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat(key) => write!(f, "{key}"),
            Self::Damage(category, damage_type) => write!(f, "{category}:{damage_type}"),
        }
    }
}

impl FromStr for StatTarget {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || BuildError::UnknownStatKey(s.to_owned());
        match s.split_once(':') {
            Some((category, damage_type)) => {
                let category = DamageCategory::from_str(category.trim()).map_err(|_| unknown())?;
                let damage_type =
                    DamageType::from_str(damage_type.trim()).map_err(|_| unknown())?;
                Ok(Self::Damage(category, damage_type))
            }
            None => StatKey::from_str(s.trim())
                .map(Self::Stat)
                .map_err(|_| unknown()),
        }
    }
}

impl TryFrom<String> for StatTarget {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatTarget> for String {
    fn from(target: StatTarget) -> Self {
        target.to_string()
    }
}
