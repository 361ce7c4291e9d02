//! Session-level profiles: the acting human, the CEO vibe target and the
//! company culture. All are built once per run and never mutated.

pub mod culture;
pub mod human;
pub mod vibe;

pub use culture::{draw_hand, CultureCard, CultureProfile, CultureSettings, Level, CULTURE_CARDS};
pub use human::{infer_enneagram, infer_mbti, HumanProfile, Ranked};
pub use vibe::{AxisScores, ChallengePreference, MbtiFamily, VibeAxis, VibeProfile};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The acting human's seat in the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    Chairman,
    #[serde(rename = "CEO")]
    Ceo,
    #[default]
    Other,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Chairman => "Chairman",
            Position::Ceo => "CEO",
            Position::Other => "Other",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chairman" => Ok(Position::Chairman),
            "ceo" => Ok(Position::Ceo),
            "other" => Ok(Position::Other),
            other => Err(Error::invalid_profile(
                "position",
                format!("'{}' (expected Chairman, CEO or Other)", other),
            )),
        }
    }
}
