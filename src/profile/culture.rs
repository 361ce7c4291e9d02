//! Company culture profile and the preset culture-card deck.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::persona::CultureMode;

/// Cards offered per draw
pub const HAND_SIZE: usize = 3;

/// Ordinal organizational setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(Error::invalid_profile("level", format!("'{}' (expected low, medium or high)", other))),
        }
    }
}

/// Organizational configuration that weights trait compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultureProfile {
    pub culture_mode: CultureMode,
    pub tolerance_for_conflict: Level,
    pub conflict_emphasis: Level,
    pub tolerance_for_burnout: Level,
    pub governance_level: Level,
    pub innovation_level: Level,
    pub risk_appetite: Level,
    pub hiring_bar: Level,
    pub quality_bar: Level,
}

impl Default for CultureProfile {
    fn default() -> Self {
        Self {
            culture_mode: CultureMode::FriendlySafe,
            tolerance_for_conflict: Level::Medium,
            conflict_emphasis: Level::Medium,
            tolerance_for_burnout: Level::Medium,
            governance_level: Level::Medium,
            innovation_level: Level::Medium,
            risk_appetite: Level::Medium,
            hiring_bar: Level::Medium,
            quality_bar: Level::Medium,
        }
    }
}

impl CultureProfile {
    /// One-line summary, e.g. for logs.
    pub fn summary(&self) -> String {
        format!(
            "mode {}; conflict tolerance {}; conflict emphasis {}; burnout tolerance {}; governance {}; innovation {}; risk {}; hiring bar {}; quality bar {}",
            self.culture_mode,
            self.tolerance_for_conflict,
            self.conflict_emphasis,
            self.tolerance_for_burnout,
            self.governance_level,
            self.innovation_level,
            self.risk_appetite,
            self.hiring_bar,
            self.quality_bar,
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Culture cards
// ─────────────────────────────────────────────────────────────────

/// A named preset culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CultureCard {
    pub name: &'static str,
    pub description: &'static str,
    pub profile: CultureProfile,
}

const fn card(
    name: &'static str,
    description: &'static str,
    culture_mode: CultureMode,
    levels: [Level; 8],
) -> CultureCard {
    CultureCard {
        name,
        description,
        profile: CultureProfile {
            culture_mode,
            tolerance_for_conflict: levels[0],
            conflict_emphasis: levels[1],
            tolerance_for_burnout: levels[2],
            governance_level: levels[3],
            innovation_level: levels[4],
            risk_appetite: levels[5],
            hiring_bar: levels[6],
            quality_bar: levels[7],
        },
    }
}

use Level::{High as H, Low as L, Medium as M};

/// The preset deck. Levels are in [`CultureProfile`] field order.
pub static CULTURE_CARDS: [CultureCard; 8] = [
    card("Calm Craft", "steady pace, care-first, polish over rush",
        CultureMode::FriendlySafe, [L, L, L, M, M, L, M, H]),
    card("Competitive Drive", "goal-forward, crisp feedback, wins as fuel",
        CultureMode::PerformanceDriven, [H, H, M, M, M, M, H, M]),
    card("Exploration Lab", "experiments over certainty, fast learning loops",
        CultureMode::HighVelocityStartup, [M, M, M, L, H, H, M, M]),
    card("Guarded Precision", "high standards, guardrails, low variance",
        CultureMode::RegulatedEnterprise, [L, M, L, H, L, L, H, H]),
    card("Builder's Sprint", "short iterations, bold bets, playful urgency",
        CultureMode::HighVelocityStartup, [M, H, H, L, H, H, H, M]),
    card("Resilient Core", "steady trust, low drama, long-horizon focus",
        CultureMode::FriendlySafe, [L, L, L, M, L, L, M, H]),
    card("Operator's Rhythm", "process-first, dependable tempo, measured risk",
        CultureMode::RegulatedEnterprise, [M, M, L, H, L, L, M, H]),
    card("Pressure Heat", "simulated intensity, thin buffers, fast cycles",
        CultureMode::HighTurnover, [H, H, H, L, M, H, M, M]),
];

impl CultureCard {
    /// Find a card by name, ignoring case.
    pub fn find(name: &str) -> Result<&'static CultureCard> {
        CULTURE_CARDS
            .iter()
            .find(|card| card.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = CULTURE_CARDS.iter().map(|c| c.name).collect();
                Error::invalid_profile(
                    "culture card",
                    format!("unknown card '{}'. Available: {}", name, names.join(", ")),
                )
            })
    }
}

/// Draw `HAND_SIZE` distinct cards with the session generator.
pub fn draw_hand<R: Rng + ?Sized>(rng: &mut R) -> Vec<&'static CultureCard> {
    let hand: Vec<&'static CultureCard> = CULTURE_CARDS
        .choose_multiple(rng, HAND_SIZE.min(CULTURE_CARDS.len()))
        .collect();
    debug!(cards = ?hand.iter().map(|c| c.name).collect::<Vec<_>>(), "Drew culture hand");
    hand
}

// ─────────────────────────────────────────────────────────────────
// Culture settings (session input)
// ─────────────────────────────────────────────────────────────────

/// Culture as written in a session file: an optional card plus any
/// individual overrides. Unset fields come from the card, or the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CultureSettings {
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub culture_mode: Option<CultureMode>,
    #[serde(default)]
    pub tolerance_for_conflict: Option<Level>,
    #[serde(default)]
    pub conflict_emphasis: Option<Level>,
    #[serde(default)]
    pub tolerance_for_burnout: Option<Level>,
    #[serde(default)]
    pub governance_level: Option<Level>,
    #[serde(default)]
    pub innovation_level: Option<Level>,
    #[serde(default)]
    pub risk_appetite: Option<Level>,
    #[serde(default)]
    pub hiring_bar: Option<Level>,
    #[serde(default)]
    pub quality_bar: Option<Level>,
}

impl CultureSettings {
    pub fn resolve(&self) -> Result<CultureProfile> {
        let base = match &self.card {
            Some(name) => CultureCard::find(name)?.profile,
            None => CultureProfile::default(),
        };

        let profile = CultureProfile {
            culture_mode: self.culture_mode.unwrap_or(base.culture_mode),
            tolerance_for_conflict: self.tolerance_for_conflict.unwrap_or(base.tolerance_for_conflict),
            conflict_emphasis: self.conflict_emphasis.unwrap_or(base.conflict_emphasis),
            tolerance_for_burnout: self.tolerance_for_burnout.unwrap_or(base.tolerance_for_burnout),
            governance_level: self.governance_level.unwrap_or(base.governance_level),
            innovation_level: self.innovation_level.unwrap_or(base.innovation_level),
            risk_appetite: self.risk_appetite.unwrap_or(base.risk_appetite),
            hiring_bar: self.hiring_bar.unwrap_or(base.hiring_bar),
            quality_bar: self.quality_bar.unwrap_or(base.quality_bar),
        };

        if profile.culture_mode == CultureMode::IntentionallyToxicSimulation {
            warn!(
                "Culture mode intentionally_toxic_simulation is a roleplay intensity setting only; \
                 no real-world harmful practices are recommended"
            );
        }
        Ok(profile)
    }
}
