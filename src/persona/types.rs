//! Core types for the persona catalog.
//!
//! Roles, culture modes, MBTI codes and the immutable persona bundle that
//! every scoring and selection step reads from.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lunar::WesternZodiac;

// ─────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────

/// Executive seats filled by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "CFO")]
    Cfo,
    #[serde(rename = "COO")]
    Coo,
    #[serde(rename = "CTO")]
    Cto,
    #[serde(rename = "CPO")]
    Cpo,
    #[serde(rename = "CMO")]
    Cmo,
    #[serde(rename = "CIO")]
    Cio,
    #[serde(rename = "CLO")]
    Clo,
    #[serde(rename = "CXA")]
    Cxa,
    Chairman,
}

impl Role {
    /// Label used in tables, notes and the catalog file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ceo => "CEO",
            Role::Cfo => "CFO",
            Role::Coo => "COO",
            Role::Cto => "CTO",
            Role::Cpo => "CPO",
            Role::Cmo => "CMO",
            Role::Cio => "CIO",
            Role::Clo => "CLO",
            Role::Cxa => "CXA",
            Role::Chairman => "Chairman",
        }
    }

    /// All roles in catalog order.
    pub fn all() -> &'static [Role] {
        &[
            Role::Ceo,
            Role::Cfo,
            Role::Coo,
            Role::Cto,
            Role::Cpo,
            Role::Cmo,
            Role::Cio,
            Role::Clo,
            Role::Cxa,
            Role::Chairman,
        ]
    }

    /// Executive seats filled on every run, in selection order.
    pub fn executive_order() -> &'static [Role] {
        &Self::all()[..9]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Role::all()
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::invalid_profile(
                    "role",
                    format!(
                        "unknown role '{}'. Valid: CEO, CFO, COO, CTO, CPO, CMO, CIO, CLO, CXA, Chairman",
                        s
                    ),
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Culture Mode
// ─────────────────────────────────────────────────────────────────

/// Organizational culture archetype used to look up culture fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureMode {
    FriendlySafe,
    PerformanceDriven,
    HighVelocityStartup,
    RegulatedEnterprise,
    HighTurnover,
    /// Roleplay intensity setting only
    IntentionallyToxicSimulation,
}

impl CultureMode {
    pub const ALL: [CultureMode; 6] = [
        CultureMode::FriendlySafe,
        CultureMode::PerformanceDriven,
        CultureMode::HighVelocityStartup,
        CultureMode::RegulatedEnterprise,
        CultureMode::HighTurnover,
        CultureMode::IntentionallyToxicSimulation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CultureMode::FriendlySafe => "friendly_safe",
            CultureMode::PerformanceDriven => "performance_driven",
            CultureMode::HighVelocityStartup => "high_velocity_startup",
            CultureMode::RegulatedEnterprise => "regulated_enterprise",
            CultureMode::HighTurnover => "high_turnover",
            CultureMode::IntentionallyToxicSimulation => "intentionally_toxic_simulation",
        }
    }
}

impl fmt::Display for CultureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CultureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        CultureMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| Error::invalid_profile("culture_mode", format!("unknown culture mode '{}'", s)))
    }
}

/// Per-mode culture fit in [0.1, 1.0], derived from trait tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CultureFit(BTreeMap<CultureMode, f64>);

impl CultureFit {
    pub fn new(scores: BTreeMap<CultureMode, f64>) -> Self {
        Self(scores)
    }

    /// Fit for a mode; modes absent from the vector score 0.
    pub fn get(&self, mode: CultureMode) -> f64 {
        self.0.get(&mode).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CultureMode, f64)> + '_ {
        self.0.iter().map(|(mode, score)| (*mode, *score))
    }
}

// ─────────────────────────────────────────────────────────────────
// MBTI
// ─────────────────────────────────────────────────────────────────

/// The four MBTI preference axes, in letter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MbtiAxis {
    #[serde(rename = "EI")]
    EnergyEI,
    #[serde(rename = "SN")]
    PerceptionSN,
    #[serde(rename = "TF")]
    JudgmentTF,
    #[serde(rename = "JP")]
    LifestyleJP,
}

impl MbtiAxis {
    pub const ALL: [MbtiAxis; 4] = [
        MbtiAxis::EnergyEI,
        MbtiAxis::PerceptionSN,
        MbtiAxis::JudgmentTF,
        MbtiAxis::LifestyleJP,
    ];

    /// (positive letter, negative letter)
    pub fn poles(&self) -> (char, char) {
        match self {
            MbtiAxis::EnergyEI => ('E', 'I'),
            MbtiAxis::PerceptionSN => ('S', 'N'),
            MbtiAxis::JudgmentTF => ('T', 'F'),
            MbtiAxis::LifestyleJP => ('J', 'P'),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MbtiAxis::EnergyEI => 0,
            MbtiAxis::PerceptionSN => 1,
            MbtiAxis::JudgmentTF => 2,
            MbtiAxis::LifestyleJP => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MbtiAxis::EnergyEI => "EI",
            MbtiAxis::PerceptionSN => "SN",
            MbtiAxis::JudgmentTF => "TF",
            MbtiAxis::LifestyleJP => "JP",
        }
    }
}

/// A validated four-letter MBTI code such as `ENTJ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MbtiType([char; 4]);

impl MbtiType {
    /// Build a code from one letter per axis.
    pub fn from_letters(letters: [char; 4]) -> Result<Self> {
        for (axis, letter) in MbtiAxis::ALL.iter().zip(letters) {
            let (pos, neg) = axis.poles();
            if letter != pos && letter != neg {
                return Err(Error::invalid_profile(
                    "mbti",
                    format!("'{}' is not a valid {} letter", letter, axis.as_str()),
                ));
            }
        }
        Ok(Self(letters))
    }

    pub fn letter(&self, axis: MbtiAxis) -> char {
        self.0[axis.index()]
    }

    /// The same code with one axis switched to its opposite pole.
    pub fn flipped(&self, axis: MbtiAxis) -> Self {
        let (pos, neg) = axis.poles();
        let mut letters = self.0;
        let current = letters[axis.index()];
        letters[axis.index()] = if current == pos { neg } else { pos };
        Self(letters)
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

impl FromStr for MbtiType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper: Vec<char> = s.trim().to_ascii_uppercase().chars().collect();
        let letters: [char; 4] = upper.try_into().map_err(|_| {
            Error::invalid_profile("mbti", format!("'{}' must have exactly 4 letters", s))
        })?;
        Self::from_letters(letters)
    }
}

impl TryFrom<String> for MbtiType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MbtiType> for String {
    fn from(value: MbtiType) -> Self {
        value.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Bundle
// ─────────────────────────────────────────────────────────────────

/// A candidate executive profile. Built once by the library, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaBundle {
    pub persona_id: String,
    pub role: Role,
    /// Enneagram core type, 1 through 9
    pub enneagram_core: u8,
    pub wing: String,
    pub mbti: MbtiType,
    pub western_zodiac: WesternZodiac,
    pub chinese_zodiac: String,
    pub trait_tags: Vec<String>,
    /// Static role suitability in [0, 1]
    pub role_fit_weight: f64,
    pub culture_fit: CultureFit,
}

impl PersonaBundle {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.trait_tags.iter().any(|t| t == tag)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
